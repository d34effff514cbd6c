//! Provider adapters
//!
//! Each adapter wraps one external API and emits a `ProviderSnapshot` keyed by
//! the normalized metric names used in the indicator catalog.

pub mod blockchain_center;
pub mod client;
pub mod coinglass;
pub mod glassnode;
pub mod microstrategy;
pub mod prediction;
pub mod tradingview;

pub use blockchain_center::BlockchainCenterProvider;
pub use client::{AuthStyle, ProviderClient};
pub use coinglass::CoinglassProvider;
pub use glassnode::GlassnodeProvider;
pub use microstrategy::MicroStrategyProvider;
pub use prediction::PredictionProvider;
pub use tradingview::TradingViewProvider;

use crate::config::ProvidersConfig;
use crate::error::{ConfigurationError, ProviderError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Normalized metric name -> value, produced once per fetch
pub type ProviderSnapshot = HashMap<String, f64>;

/// Common fetch capability; the aggregator only depends on this trait
#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Glassnode,
    Coinglass,
    TradingView,
    BlockchainCenter,
    MicroStrategy,
    Prediction,
}

impl ProviderKind {
    pub fn all() -> [ProviderKind; 6] {
        [
            ProviderKind::Glassnode,
            ProviderKind::Coinglass,
            ProviderKind::TradingView,
            ProviderKind::BlockchainCenter,
            ProviderKind::MicroStrategy,
            ProviderKind::Prediction,
        ]
    }

    /// Lowercase identifier used in `PROVIDERS_ENABLED` and log fields
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Glassnode => "glassnode",
            ProviderKind::Coinglass => "coinglass",
            ProviderKind::TradingView => "tradingview",
            ProviderKind::BlockchainCenter => "blockchaincenter",
            ProviderKind::MicroStrategy => "microstrategy",
            ProviderKind::Prediction => "prediction",
        }
    }

    /// Value stored as the indicator's `dataSource`
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Glassnode => "Glassnode",
            ProviderKind::Coinglass => "Coinglass",
            ProviderKind::TradingView => "TradingView",
            ProviderKind::BlockchainCenter => "BlockchainCenter",
            ProviderKind::MicroStrategy => "MicroStrategy",
            ProviderKind::Prediction => "Prediction",
        }
    }

    pub fn env_prefix(&self) -> &'static str {
        match self {
            ProviderKind::Glassnode => "GLASSNODE",
            ProviderKind::Coinglass => "COINGLASS",
            ProviderKind::TradingView => "TRADINGVIEW",
            ProviderKind::BlockchainCenter => "BLOCKCHAINCENTER",
            ProviderKind::MicroStrategy => "MICROSTRATEGY",
            ProviderKind::Prediction => "PREDICTION",
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Glassnode => Some("https://api.glassnode.com"),
            ProviderKind::Coinglass => Some("https://open-api.coinglass.com"),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ProviderKind::all()
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| format!("unknown provider '{}'", s))
    }
}

/// Construct every enabled adapter, failing fast on missing settings
pub fn build_providers(
    config: &ProvidersConfig,
    timeout: Duration,
) -> Result<Vec<Arc<dyn IndicatorProvider>>, ConfigurationError> {
    config
        .enabled
        .iter()
        .map(|kind| {
            let settings = config.settings(*kind);
            let provider: Arc<dyn IndicatorProvider> = match kind {
                ProviderKind::Glassnode => Arc::new(GlassnodeProvider::new(&settings, timeout)?),
                ProviderKind::Coinglass => Arc::new(CoinglassProvider::new(&settings, timeout)?),
                ProviderKind::TradingView => Arc::new(TradingViewProvider::new(&settings, timeout)?),
                ProviderKind::BlockchainCenter => {
                    Arc::new(BlockchainCenterProvider::new(&settings, timeout)?)
                }
                ProviderKind::MicroStrategy => {
                    Arc::new(MicroStrategyProvider::new(&settings, timeout)?)
                }
                ProviderKind::Prediction => Arc::new(PredictionProvider::new(&settings, timeout)?),
            };
            Ok(provider)
        })
        .collect()
}
