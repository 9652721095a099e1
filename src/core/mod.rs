//! Core business logic: rates, classification and configuration

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod log;
pub mod rate;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use classify::{ClassificationTable, Favorability};
pub use error::FxError;
pub use rate::{CurrencyMetric, CurrencyObservation, ObservationProvider};
pub use snapshot::{DashboardSnapshot, build_snapshot};
