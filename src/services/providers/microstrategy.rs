//! MicroStrategy bitcoin holdings, reduced to an average cost basis

use super::client::{AuthStyle, ProviderClient};
use super::{IndicatorProvider, ProviderKind, ProviderSnapshot};
use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

const PATH: &str = "/api/v1/bitcoin/holdings";

pub struct MicroStrategyProvider {
    client: ProviderClient,
}

impl MicroStrategyProvider {
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = ProviderClient::new(ProviderKind::MicroStrategy, settings, AuthStyle::None, timeout)?;
        Ok(Self { client })
    }
}

/// Average USD paid per coin; 0 when no coins are held
pub fn cost_basis(total_investment: f64, total_bitcoin: f64) -> f64 {
    if total_bitcoin > 0.0 {
        total_investment / total_bitcoin
    } else {
        0.0
    }
}

#[async_trait]
impl IndicatorProvider for MicroStrategyProvider {
    fn name(&self) -> &str {
        self.client.kind().name()
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        let body = self.client.get_json(PATH, &[]).await?;
        let investment = self.client.value_or_zero(&body, "/totalInvestment", "totalInvestment");
        let bitcoin = self.client.value_or_zero(&body, "/totalBitcoin", "totalBitcoin");

        Ok(ProviderSnapshot::from([(
            "costBasis".to_string(),
            cost_basis(investment, bitcoin),
        )]))
    }
}
