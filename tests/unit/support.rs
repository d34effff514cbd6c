//! Fakes shared by the unit tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use indicator_monitor::error::{NotificationChannelError, ProviderError};
use indicator_monitor::models::{Category, Comparison, HistoryPoint, Indicator};
use indicator_monitor::notifications::NotificationChannel;
use indicator_monitor::services::{IndicatorProvider, ProviderSnapshot};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// History window oldest to newest, one minute apart
pub fn window(indicator_id: u32, values: &[f64]) -> Vec<HistoryPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| HistoryPoint::new(indicator_id, *v, base_time() + Duration::minutes(i as i64)))
        .collect()
}

pub fn indicator(id: u32, value: f64, target: Option<f64>, comparison: Comparison) -> Indicator {
    Indicator {
        id,
        category: Category::OnChain,
        name_en: format!("Indicator {}", id),
        name_zh: format!("指标{}", id),
        principle: String::new(),
        calculation: String::new(),
        usage: String::new(),
        data_source: "Test".to_string(),
        current_value: value,
        target_value: target,
        comparison,
        is_triggered: target.is_some_and(|t| comparison.is_met(value, t)),
        updated_at: base_time(),
    }
}

/// Channel failing `failures` times before succeeding
pub struct FlakyChannel {
    pub name: &'static str,
    pub failures: usize,
    pub configured: bool,
    pub delay: std::time::Duration,
    pub calls: AtomicUsize,
}

impl FlakyChannel {
    pub fn new(name: &'static str, failures: usize) -> Self {
        Self {
            name,
            failures,
            configured: true,
            delay: std::time::Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_failing(name: &'static str) -> Self {
        Self::new(name, usize::MAX)
    }

    pub fn unconfigured(name: &'static str) -> Self {
        Self {
            configured: false,
            ..Self::new(name, 0)
        }
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationChannel for FlakyChannel {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, _title: &str, _message: &str) -> Result<(), NotificationChannelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if call <= self.failures {
            Err(NotificationChannelError::Status(503))
        } else {
            Ok(())
        }
    }
}

/// Provider returning a fixed snapshot, or failing with HTTP 503
pub struct FakeProvider {
    pub name: &'static str,
    pub snapshot: Option<ProviderSnapshot>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn ok(name: &'static str, fields: &[(&str, f64)]) -> Self {
        Self {
            name,
            snapshot: Some(fields.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            snapshot: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndicatorProvider for FakeProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> Result<ProviderSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone().ok_or_else(|| ProviderError::Status {
            provider: self.name.to_string(),
            endpoint: "/fake".to_string(),
            status: 503,
        })
    }
}
