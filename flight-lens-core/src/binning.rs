use flight_lens_common::{FlightLensError, Result};
use serde::{Deserialize, Serialize};

pub const MIN_BINS: usize = 5;
pub const MAX_BINS: usize = 30;
/// width given to the last aggregated bin, which has no right neighbour
pub const TRAILING_EDGE_WIDTH: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub left_edge: f64, // log(ground time)
    pub frequency: u64,
}

/// A re-aggregated bin has the same shape as a source bin.
pub type AggregatedBin = HistogramBin;

/// Fine-grained bins as loaded from the histogram summary: ascending, no duplicate edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    bins: Vec<HistogramBin>,
}

impl HistogramSummary {
    pub fn new(bins: Vec<HistogramBin>) -> Result<Self> {
        for (i, w) in bins.windows(2).enumerate() {
            if !(w[0].left_edge < w[1].left_edge) {
                return Err(FlightLensError::InvalidArgument(format!(
                    "histogram edges must be strictly ascending: bin {} ({}) >= bin {} ({})",
                    i,
                    w[0].left_edge,
                    i + 1,
                    w[1].left_edge
                )));
            }
        }
        Ok(Self { bins })
    }
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }
    pub fn len(&self) -> usize {
        self.bins.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
    pub fn total_frequency(&self) -> u64 {
        self.bins.iter().map(|b| b.frequency).sum()
    }
    pub fn aggregate(&self, target_count: usize) -> Result<Vec<AggregatedBin>> {
        aggregate(&self.bins, target_count)
    }
}

pub fn validate_bin_count(target_count: usize) -> Result<()> {
    if (MIN_BINS..=MAX_BINS).contains(&target_count) {
        Ok(())
    } else {
        Err(FlightLensError::InvalidArgument(format!(
            "bin count must be in [{MIN_BINS}, {MAX_BINS}], got {target_count}"
        )))
    }
}

/// number of source bins folded into one output bin; never 0
pub fn bin_step(len: usize, target_count: usize) -> usize {
    (len / target_count.max(1)).max(1)
}

/// Fold `bins` into roughly `target_count` groups of `bin_step` consecutive bins.
///
/// The result has `ceil(len / step)` entries, which only equals `target_count` when the
/// bin count divides evenly. Each group keeps the left edge of its first bin and the sum
/// of its frequencies, so the total frequency is unchanged.
pub fn aggregate(bins: &[HistogramBin], target_count: usize) -> Result<Vec<AggregatedBin>> {
    validate_bin_count(target_count)?;
    Ok(regroup(bins, bin_step(bins.len(), target_count)))
}

/// fixed-size grouping behind `aggregate`; a `step` of 0 is treated as 1
pub fn regroup(bins: &[HistogramBin], step: usize) -> Vec<AggregatedBin> {
    bins.chunks(step.max(1))
        .map(|group| AggregatedBin {
            left_edge: group
                .iter()
                .map(|b| b.left_edge)
                .fold(f64::INFINITY, f64::min),
            frequency: group.iter().map(|b| b.frequency).sum(),
        })
        .collect()
}

/// Left edges plus one synthetic trailing edge, so every bar has a right boundary.
pub fn render_edges(aggregated: &[AggregatedBin]) -> Vec<f64> {
    let Some(last) = aggregated.last() else { return Vec::new() };
    let mut edges: Vec<f64> = aggregated.iter().map(|b| b.left_edge).collect();
    edges.push(last.left_edge + TRAILING_EDGE_WIDTH);
    edges
}

pub fn bar_widths(aggregated: &[AggregatedBin]) -> Vec<f64> {
    render_edges(aggregated).windows(2).map(|w| w[1] - w[0]).collect()
}
