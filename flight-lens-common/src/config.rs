use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_colormap")]
    pub colormap: String,
    #[serde(default)]
    pub sidebar_width: Option<u16>, // falls back to 34 when None
}

fn default_theme() -> String {
    "dark".into()
}
fn default_colormap() -> String {
    "RdBu_r".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            colormap: default_colormap(),
            sidebar_width: None,
        }
    }
}

/// Locations of the precomputed summary tables. File names are resolved against
/// `data_dir`; a `.parquet` name is read with the parquet reader instead of CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_flights_file")]
    pub flights_file: String,
    #[serde(default = "default_correlation_file")]
    pub correlation_file: String,
    #[serde(default = "default_histogram_file")]
    pub histogram_file: String,
    #[serde(default = "default_boxplot_file")]
    pub boxplot_file: String,
    #[serde(default = "default_qq_file")]
    pub qq_file: String,
}

fn default_data_dir() -> String {
    "DATA".into()
}
fn default_flights_file() -> String {
    "summarized_flight_data.csv".into()
}
fn default_correlation_file() -> String {
    "correlation_matrix.csv".into()
}
fn default_histogram_file() -> String {
    "histogram_summary_ground_time.csv".into()
}
fn default_boxplot_file() -> String {
    "boxplot_summary.csv".into()
}
fn default_qq_file() -> String {
    "qq_sample.csv".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            flights_file: default_flights_file(),
            correlation_file: default_correlation_file(),
            histogram_file: default_histogram_file(),
            boxplot_file: default_boxplot_file(),
            qq_file: default_qq_file(),
        }
    }
}

impl DataConfig {
    pub fn resolve(&self, file: &str) -> PathBuf {
        Path::new(&self.data_dir).join(file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "default_bins")]
    pub default_bins: usize,
    #[serde(default = "default_distribution")]
    pub default_distribution: String,
}

fn default_bins() -> usize {
    10
}
fn default_distribution() -> String {
    "norm".into()
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            default_bins: default_bins(),
            default_distribution: default_distribution(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flight-lens")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("FLIGHT_LENS_CONFIG") {
            PathBuf::from(env_path) // $FLIGHT_LENS_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::FlightLensError::Config(e.to_string()))
    }
}
