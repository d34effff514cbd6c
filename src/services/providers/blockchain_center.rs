//! BlockchainCenter temperature and rainbow chart

use super::client::{AuthStyle, ProviderClient};
use super::{IndicatorProvider, ProviderKind, ProviderSnapshot};
use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

const ENDPOINTS: &[(&str, &str)] = &[
    ("btIndex", "/api/v1/metrics/bitcoin_temperature"),
    ("rainbowChart", "/api/v1/metrics/rainbow_chart"),
];

pub struct BlockchainCenterProvider {
    client: ProviderClient,
}

impl BlockchainCenterProvider {
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = ProviderClient::new(
            ProviderKind::BlockchainCenter,
            settings,
            AuthStyle::Bearer,
            timeout,
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IndicatorProvider for BlockchainCenterProvider {
    fn name(&self) -> &str {
        self.client.kind().name()
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        self.client.fetch_endpoints(ENDPOINTS, &[], "/value").await
    }
}
