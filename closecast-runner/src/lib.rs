//! CloseCast Runner — prediction orchestration on top of `closecast-core`.
//!
//! This crate provides:
//! - TOML configuration with validation
//! - Bar sources (CSV files, deterministic synthetic data)
//! - The single-pass strategy runner (split, scale, fit, predict, invert)
//! - Structured prediction reports and feature-matrix CSV export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod report;
pub mod runner;

pub use config::{ConfigError, PredictorConfig};
pub use data_loader::{BarSource, CsvBarSource, LoadError, SyntheticBarSource};
pub use export::{features_to_csv, ExportError};
pub use report::PredictionReport;
pub use runner::{run_strategy, RunError, StrategyRunner};
