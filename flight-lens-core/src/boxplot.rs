use crate::flights::unique_in_order;
use serde::{Deserialize, Serialize};

/// y-axis range of the boxplot panel
pub const Y_RANGE: (f64, f64) = (0.0, 15.0);
pub const WHISKER_IQR: f64 = 1.5;
pub const DEFAULT_CONFIGS: [&str; 2] = ["Freight Configuration", "Passenger Configuration"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSample {
    pub year: i32,
    pub aircraft_config: String,
    pub log_ground_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub year: i32,
    pub aircraft_config: String,
    pub stats: BoxStats,
}

/// Percentile of an already sorted slice, linear interpolation between nearest ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
}

impl BoxStats {
    /// `None` when there are no finite samples.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lo_fence = q1 - WHISKER_IQR * iqr;
        let hi_fence = q3 + WHISKER_IQR * iqr;
        // whiskers stop at the furthest sample still inside the fence
        let whisker_low = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
        let whisker_high = sorted.iter().rev().copied().find(|&v| v <= hi_fence).unwrap_or(q3);
        Some(Self { q1, median, q3, iqr, whisker_low, whisker_high, count: sorted.len() })
    }
}

pub fn default_configs(samples: &[BoxplotSample]) -> Vec<String> {
    let all = unique_in_order(samples.iter().map(|s| s.aircraft_config.clone()));
    let preferred: Vec<String> = all.iter().filter(|c| DEFAULT_CONFIGS.contains(&c.as_str())).cloned().collect();
    if preferred.is_empty() { all } else { preferred }
}

/// One box per (year, configuration) pair left after filtering; ordered by year, then by
/// the order configurations first appear in `samples`.
pub fn summarize(samples: &[BoxplotSample], years: &[i32], configs: &[String]) -> Vec<BoxGroup> {
    let kept: Vec<&BoxplotSample> = samples
        .iter()
        .filter(|s| years.contains(&s.year) && configs.contains(&s.aircraft_config))
        .collect();
    let mut year_order = unique_in_order(kept.iter().map(|s| s.year));
    year_order.sort_unstable();
    let cfg_order = unique_in_order(kept.iter().map(|s| s.aircraft_config.clone()));
    let mut out = Vec::new();
    for &year in &year_order {
        for cfg in &cfg_order {
            let vals: Vec<f64> = kept
                .iter()
                .filter(|s| s.year == year && &s.aircraft_config == cfg)
                .map(|s| s.log_ground_time)
                .collect();
            if let Some(stats) = BoxStats::from_samples(&vals) {
                out.push(BoxGroup { year, aircraft_config: cfg.clone(), stats });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bs(year: i32, cfg: &str, v: f64) -> BoxplotSample {
        BoxplotSample { year, aircraft_config: cfg.into(), log_ground_time: v }
    }

    #[test]
    fn percentile_endpoints() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&s, 0.0), 1.0);
        assert_eq!(percentile(&s, 100.0), 5.0);
        assert_eq!(percentile(&s, 50.0), 3.0);
    }

    #[test]
    fn percentile_interpolates() {
        let s = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&s, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&s, 75.0) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn percentile_degenerate() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[7.0], 90.0), 7.0);
    }

    #[test]
    fn whiskers_clamp_to_data() {
        // q1=2, q3=4, iqr=2, fences at -1 and 7; 100 lies outside
        let s = BoxStats::from_samples(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0, 2.0, 4.0, 3.0]).unwrap();
        assert_eq!(s.count, 9);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.whisker_low, 1.0);
        assert_eq!(s.whisker_high, 5.0);
        assert!(BoxStats::from_samples(&[f64::NAN]).is_none());
    }

    #[test]
    fn groups_ordered_by_year_then_config() {
        let samples = vec![
            bs(2020, "Passenger Configuration", 6.0),
            bs(2019, "Freight Configuration", 7.0),
            bs(2019, "Passenger Configuration", 5.0),
            bs(2020, "Freight Configuration", 8.0),
            bs(2020, "Seaplane", 2.0),
        ];
        let cfgs = default_configs(&samples);
        assert_eq!(cfgs, vec!["Passenger Configuration", "Freight Configuration"]);
        let groups = summarize(&samples, &[2019, 2020], &cfgs);
        let keys: Vec<(i32, &str)> = groups.iter().map(|g| (g.year, g.aircraft_config.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                (2019, "Passenger Configuration"),
                (2019, "Freight Configuration"),
                (2020, "Passenger Configuration"),
                (2020, "Freight Configuration"),
            ]
        );
        assert!(summarize(&samples, &[2021], &cfgs).is_empty());
    }

    #[test]
    fn default_configs_fall_back_to_all() {
        let samples = vec![bs(2020, "Seaplane", 2.0), bs(2020, "Combi", 3.0)];
        assert_eq!(default_configs(&samples), vec!["Seaplane", "Combi"]);
    }
}
