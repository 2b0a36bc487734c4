//! Error types for loading and exporting dashboard data.
//!
//! Library modules return `DashboardError`; `main` wraps everything in
//! `anyhow` for reporting.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: &'static str },
}
