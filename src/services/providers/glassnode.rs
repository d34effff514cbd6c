//! Glassnode on-chain metrics

use super::client::{AuthStyle, ProviderClient};
use super::{IndicatorProvider, ProviderKind, ProviderSnapshot};
use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

const ENDPOINTS: &[(&str, &str)] = &[
    ("nupl", "/v1/metrics/indicators/net_unrealized_profit_loss"),
    ("rhodl", "/v1/metrics/indicators/rhodl_ratio"),
    ("puell", "/v1/metrics/indicators/puell_multiple"),
    ("reserveRisk", "/v1/metrics/indicators/reserve_risk"),
    ("mvrv", "/v1/metrics/market/mvrv_z_score"),
    ("stHolderSupply", "/v1/metrics/supply/short_term_holder_supply"),
    ("ltHolderOutflow", "/v1/metrics/transactions/long_term_holder_outflow"),
];

pub struct GlassnodeProvider {
    client: ProviderClient,
}

impl GlassnodeProvider {
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = ProviderClient::new(
            ProviderKind::Glassnode,
            settings,
            AuthStyle::QueryParam("api_key"),
            timeout,
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IndicatorProvider for GlassnodeProvider {
    fn name(&self) -> &str {
        self.client.kind().name()
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        // Series endpoints; the first point is the latest daily value
        self.client
            .fetch_endpoints(ENDPOINTS, &[("resolution", "24h")], "/0/value")
            .await
    }
}
