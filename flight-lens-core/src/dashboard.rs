use crate::binning::{self, AggregatedBin, MAX_BINS, MIN_BINS};
use crate::boxplot::{self, BoxGroup};
use crate::colormap::Colormap;
use crate::correlation::{self, MatrixView, Selection};
use crate::drop_test::{drop_test_results, DropTestRow};
use crate::flights::{self, ConfigMean, ConfigSeries, FlightSummaryRow};
use crate::qq::{self, Distribution, QqPlot};
use crate::session::DashboardData;
use flight_lens_common::{Config, Result};
use serde::{Deserialize, Serialize};

/// Widget values. Every change produces a fresh `Snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub years: Vec<i32>,
    pub configs: Vec<String>,
    pub bins: usize,
    pub colormap: Colormap,
    pub selection: Selection,
    pub distribution: Distribution,
    pub box_years: Vec<i32>,
    pub box_configs: Vec<String>,
}

impl Controls {
    /// All years and configurations selected; boxplot configurations start on
    /// freight and passenger when present.
    pub fn defaults_for(data: &DashboardData, config: &Config) -> Self {
        let want = config.histogram.default_bins;
        let bins = want.clamp(MIN_BINS, MAX_BINS);
        if bins != want {
            tracing::warn!(configured = want, using = bins, "default_bins outside slider range");
        }
        let colormap = Colormap::parse(&config.display.colormap).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to RdBu_r");
            Colormap::RdBuR
        });
        let distribution = Distribution::parse(&config.histogram.default_distribution).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to norm");
            Distribution::Normal
        });
        Self {
            years: flights::distinct_years(&data.flights),
            configs: flights::distinct_configs(&data.flights),
            bins,
            colormap,
            selection: Selection::Full,
            distribution,
            box_years: flights::unique_in_order(data.boxplot.iter().map(|s| s.year)),
            box_configs: boxplot::default_configs(&data.boxplot),
        }
    }

    /// Carry these controls over to reloaded tables. Choices that still name something in
    /// `data` survive, values that `previous` did not offer are selected, and a correlation
    /// feature that disappeared falls back to the full matrix.
    pub fn carried_over(&self, previous: &DashboardData, data: &DashboardData) -> Self {
        let selection = match &self.selection {
            Selection::Feature(f) if data.correlation.index_of(f).is_none() => {
                tracing::info!(feature = %f, "feature gone after reload, showing full matrix");
                Selection::Full
            }
            s => s.clone(),
        };
        let new_box_configs = boxplot::default_configs(&data.boxplot);
        let box_configs = merge_selected(
            &self.box_configs,
            &flights::unique_in_order(previous.boxplot.iter().map(|s| s.aircraft_config.clone())),
            &flights::unique_in_order(data.boxplot.iter().map(|s| s.aircraft_config.clone())),
        )
        .into_iter()
        .filter(|c| self.box_configs.contains(c) || new_box_configs.contains(c))
        .collect();
        Self {
            years: merge_selected(&self.years, &flights::distinct_years(&previous.flights), &flights::distinct_years(&data.flights)),
            configs: merge_selected(&self.configs, &flights::distinct_configs(&previous.flights), &flights::distinct_configs(&data.flights)),
            bins: self.bins,
            colormap: self.colormap,
            selection,
            distribution: self.distribution,
            box_years: merge_selected(
                &self.box_years,
                &flights::unique_in_order(previous.boxplot.iter().map(|s| s.year)),
                &flights::unique_in_order(data.boxplot.iter().map(|s| s.year)),
            ),
            box_configs,
        }
    }
}

// options of the new data, keeping the old choices and adding options that are new
fn merge_selected<T: PartialEq + Clone>(selected: &[T], old_options: &[T], new_options: &[T]) -> Vec<T> {
    new_options
        .iter()
        .filter(|v| selected.contains(v) || !old_options.contains(v))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramView {
    pub bins: Vec<AggregatedBin>,
    pub edges: Vec<f64>,  // left edges plus one trailing edge
    pub widths: Vec<f64>, // bar width per aggregated bin
}

/// Derived data for every panel under one set of controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub controls: Controls,
    pub filtered: Vec<FlightSummaryRow>,
    pub flights_over_time: Vec<ConfigSeries>,
    pub ground_time_by_config: Vec<ConfigMean>,
    pub correlation: MatrixView,
    pub histogram: HistogramView,
    pub boxplot: Vec<BoxGroup>,
    /// `None` when the QQ sample cannot be plotted; `qq_error` says why.
    pub qq: Option<QqPlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qq_error: Option<String>,
    pub drop_test: Vec<DropTestRow>,
}

impl Snapshot {
    pub fn compute(data: &DashboardData, controls: &Controls) -> Result<Self> {
        let filtered = flights::filter_rows(&data.flights, &controls.years, &controls.configs);
        let flights_over_time = flights::flights_over_time(&filtered);
        let ground_time_by_config = flights::average_ground_time_by_config(&filtered);
        let correlation = correlation::slice(&data.correlation, &controls.selection)?;
        let bins = binning::aggregate(data.histogram.bins(), controls.bins)?;
        let histogram = HistogramView { edges: binning::render_edges(&bins), widths: binning::bar_widths(&bins), bins };
        let boxplot = boxplot::summarize(&data.boxplot, &controls.box_years, &controls.box_configs);
        // the QQ sample feeds only its own panel
        let (qq, qq_error) = match qq::probplot(&data.qq, controls.distribution) {
            Ok(plot) => (Some(plot), None),
            Err(e) => {
                tracing::warn!(error = %e, "QQ panel unavailable");
                (None, Some(e.to_string()))
            }
        };
        tracing::debug!(
            rows = filtered.len(),
            bins = histogram.bins.len(),
            boxes = boxplot.len(),
            selection = controls.selection.label(),
            "snapshot computed"
        );
        Ok(Self {
            controls: controls.clone(),
            filtered,
            flights_over_time,
            ground_time_by_config,
            correlation,
            histogram,
            boxplot,
            qq,
            qq_error,
            drop_test: drop_test_results(),
        })
    }
}
