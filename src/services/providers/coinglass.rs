//! Coinglass market-structure and sentiment indicators
//!
//! All metrics come from a single `/public/v2/indicator` call.

use super::client::{AuthStyle, ProviderClient};
use super::{IndicatorProvider, ProviderKind, ProviderSnapshot};
use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

const PATH: &str = "/public/v2/indicator";

const METRICS: &[&str] = &[
    "altSeasonBtcTop",
    "altSeasonIndex",
    "cbi",
    "etfNetOutflow",
    "etfBtcRatio",
    "annualRate3m",
    "usdtSavingsRate",
];

pub struct CoinglassProvider {
    client: ProviderClient,
}

impl CoinglassProvider {
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = ProviderClient::new(
            ProviderKind::Coinglass,
            settings,
            AuthStyle::Header("coinglassSecret"),
            timeout,
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl IndicatorProvider for CoinglassProvider {
    fn name(&self) -> &str {
        self.client.kind().name()
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        let body = self.client.get_json(PATH, &[]).await?;

        Ok(METRICS
            .iter()
            .map(|metric| {
                let pointer = format!("/data/{}", metric);
                (metric.to_string(), self.client.value_or_zero(&body, &pointer, metric))
            })
            .collect())
    }
}
