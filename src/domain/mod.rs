//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod holdings;
pub mod metrics;
pub mod performance;
pub mod portfolio;
pub mod position;
pub mod price_series;
pub mod tracker;
pub mod trade;
