//! TradingView technical indicators

use super::client::{AuthStyle, ProviderClient};
use super::{IndicatorProvider, ProviderKind, ProviderSnapshot};
use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

const ENDPOINTS: &[(&str, &str)] = &[
    ("ahr999TopSignal", "/technical/ahr999_top"),
    ("ahr999Accumulation", "/technical/ahr999_acc"),
    ("mayerMultiple", "/technical/mayer_multiple"),
    ("ma2yMultiplier", "/technical/2y_ma_multiplier"),
    ("ma4y", "/technical/4y_ma"),
    ("rsi22", "/technical/rsi_22"),
    ("oscillatorBMO", "/technical/oscillator_bmo"),
];

pub struct TradingViewProvider {
    client: ProviderClient,
}

impl TradingViewProvider {
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = ProviderClient::new(
            ProviderKind::TradingView,
            settings,
            AuthStyle::Header("X-TV-KEY"),
            timeout,
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IndicatorProvider for TradingViewProvider {
    fn name(&self) -> &str {
        self.client.kind().name()
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        self.client.fetch_endpoints(ENDPOINTS, &[], "/value").await
    }
}
