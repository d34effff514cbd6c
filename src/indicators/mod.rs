//! Indicator catalog and metric registry

pub mod catalog;
pub mod registry;

pub use catalog::{IndicatorCatalog, IndicatorDefinition};
pub use registry::MetricRegistry;
