pub mod config;
pub use config::{Config, DataConfig, DisplayConfig, ExportConfig, HistogramConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FlightLensError>;
