pub mod aggregator;
pub mod providers;

pub use aggregator::Aggregator;
pub use providers::{IndicatorProvider, ProviderKind, ProviderSnapshot};
