//! Market indicator monitor
//!
//! Fetches indicators from external providers on a schedule, keeps current
//! values and history, detects threshold breaches, trends and volatility
//! spikes, and fans alerts out to email and chat webhooks.

pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod detection;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod notifications;
pub mod services;
