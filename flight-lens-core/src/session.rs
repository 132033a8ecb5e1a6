use crate::binning::HistogramSummary;
use crate::boxplot::BoxplotSample;
use crate::correlation::CorrelationMatrix;
use crate::flights::FlightSummaryRow;
use crate::loader;
use flight_lens_common::{DataConfig, FlightLensError, Result};
use std::path::{Path, PathBuf};

/// Everything the dashboard reads, loaded once per session and never mutated.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub flights: Vec<FlightSummaryRow>,
    pub correlation: CorrelationMatrix,
    pub histogram: HistogramSummary,
    pub boxplot: Vec<BoxplotSample>,
    pub qq: Vec<f64>,
    pub source_dir: PathBuf,
}

impl DashboardData {
    pub fn load(cfg: &DataConfig) -> Result<Self> {
        let dir = PathBuf::from(&cfg.data_dir);
        if !dir.is_dir() {
            return Err(FlightLensError::NotFound(format!("data directory {}", dir.display())));
        }
        let flights = with_file(&cfg.resolve(&cfg.flights_file), loader::load_flight_summary)?;
        let correlation = with_file(&cfg.resolve(&cfg.correlation_file), loader::load_correlation_matrix)?;
        let histogram = with_file(&cfg.resolve(&cfg.histogram_file), loader::load_histogram_summary)?;
        let boxplot = with_file(&cfg.resolve(&cfg.boxplot_file), loader::load_boxplot_samples)?;
        let qq = with_file(&cfg.resolve(&cfg.qq_file), loader::load_qq_sample)?;
        tracing::info!(
            dir = %dir.display(),
            flights = flights.len(),
            features = correlation.len(),
            bins = histogram.len(),
            box_samples = boxplot.len(),
            qq_samples = qq.len(),
            "dashboard data loaded"
        );
        Ok(Self { flights, correlation, histogram, boxplot, qq, source_dir: dir })
    }
}

// prefix the failing file so the status bar says which table broke
fn with_file<T>(path: &Path, load: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
    load(path).map_err(|e| {
        let p = path.display();
        match e {
            FlightLensError::MissingColumn { .. } => e,
            FlightLensError::InvalidArgument(m) => FlightLensError::InvalidArgument(format!("{p}: {m}")),
            FlightLensError::NotFound(m) => FlightLensError::NotFound(format!("{p}: {m}")),
            FlightLensError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                FlightLensError::NotFound(p.to_string())
            }
            other => FlightLensError::Other(format!("{p}: {other}")),
        }
    })
}
