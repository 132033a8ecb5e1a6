pub mod binning;
pub mod boxplot;
pub mod colormap;
pub mod correlation;
pub mod dashboard;
pub mod drop_test;
pub mod export;
pub mod flights;
pub mod loader;
pub mod qq;
pub mod session;
pub use flight_lens_common::{FlightLensError, Result};
pub use binning::{aggregate, render_edges, AggregatedBin, HistogramBin, HistogramSummary};
pub use colormap::Colormap;
pub use correlation::{slice, CorrelationMatrix, MatrixView, Selection};
pub use dashboard::{Controls, Snapshot};
pub use qq::{probplot, Distribution, QqPlot};
pub use session::DashboardData;
