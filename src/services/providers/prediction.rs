//! Cycle-top and price prediction models

use super::client::{AuthStyle, ProviderClient};
use super::{IndicatorProvider, ProviderKind, ProviderSnapshot};
use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

const ENDPOINTS: &[(&str, &str)] = &[
    ("piCycleTop", "/api/v1/indicators/pi_cycle_top"),
    ("sminstonForecast", "/api/v1/indicators/sminston_forecast"),
    ("goldBtcRatio", "/api/v1/indicators/gold_btc_ratio"),
    ("pricePrediction", "/api/v1/indicators/price_prediction"),
];

pub struct PredictionProvider {
    client: ProviderClient,
}

impl PredictionProvider {
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = ProviderClient::new(ProviderKind::Prediction, settings, AuthStyle::Bearer, timeout)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IndicatorProvider for PredictionProvider {
    fn name(&self) -> &str {
        self.client.kind().name()
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        self.client.fetch_endpoints(ENDPOINTS, &[], "/value").await
    }
}
