use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummaryRow {
    pub year: i32,
    pub aircraft_config: String,
    pub total_flights: i64,
    pub average_ground_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSeries {
    pub aircraft_config: String,
    pub points: Vec<(i32, i64)>, // (year, total_flights), ascending by year
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMean {
    pub aircraft_config: String,
    pub average_ground_time: f64,
    pub groups: usize, // number of summary rows averaged
}

/// Unique values in first-appearance order.
pub fn unique_in_order<T: PartialEq + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for it in items {
        if !out.contains(&it) {
            out.push(it);
        }
    }
    out
}

pub fn distinct_years(rows: &[FlightSummaryRow]) -> Vec<i32> {
    unique_in_order(rows.iter().map(|r| r.year))
}

pub fn distinct_configs(rows: &[FlightSummaryRow]) -> Vec<String> {
    unique_in_order(rows.iter().map(|r| r.aircraft_config.clone()))
}

pub fn filter_rows(rows: &[FlightSummaryRow], years: &[i32], configs: &[String]) -> Vec<FlightSummaryRow> {
    rows.iter()
        .filter(|r| years.contains(&r.year) && configs.contains(&r.aircraft_config))
        .cloned()
        .collect()
}

// --- line chart: total flights over time, one line per configuration ---

pub fn flights_over_time(rows: &[FlightSummaryRow]) -> Vec<ConfigSeries> {
    distinct_configs(rows)
        .into_iter()
        .map(|cfg| {
            let mut points: Vec<(i32, i64)> = rows
                .iter()
                .filter(|r| r.aircraft_config == cfg)
                .map(|r| (r.year, r.total_flights))
                .collect();
            points.sort_by_key(|p| p.0);
            ConfigSeries { aircraft_config: cfg, points }
        })
        .collect()
}

// --- bar chart: average ground time by configuration ---

/// Mean of the per-row `average_ground_time` values for each configuration.
///
/// Rows are already averages, so this is a mean of means and is not weighted by
/// `total_flights`.
pub fn average_ground_time_by_config(rows: &[FlightSummaryRow]) -> Vec<ConfigMean> {
    let mut out: Vec<ConfigMean> = distinct_configs(rows)
        .into_iter()
        .map(|cfg| {
            let vals: Vec<f64> = rows
                .iter()
                .filter(|r| r.aircraft_config == cfg)
                .map(|r| r.average_ground_time)
                .collect();
            ConfigMean {
                aircraft_config: cfg,
                average_ground_time: vals.iter().sum::<f64>() / vals.len() as f64,
                groups: vals.len(),
            }
        })
        .collect();
    // groupby output is ordered by key
    out.sort_by(|a, b| a.aircraft_config.cmp(&b.aircraft_config));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, cfg: &str, total: i64, avg: f64) -> FlightSummaryRow {
        FlightSummaryRow { year, aircraft_config: cfg.into(), total_flights: total, average_ground_time: avg }
    }

    fn table() -> Vec<FlightSummaryRow> {
        vec![
            row(2019, "Passenger Configuration", 900, 40.0),
            row(2018, "Passenger Configuration", 850, 50.0),
            row(2018, "Freight Configuration", 120, 90.0),
            row(2019, "Freight Configuration", 130, 110.0),
            row(2019, "Seaplane", 3, 20.0),
        ]
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        assert_eq!(distinct_years(&table()), vec![2019, 2018]);
        assert_eq!(
            distinct_configs(&table()),
            vec!["Passenger Configuration", "Freight Configuration", "Seaplane"]
        );
    }

    #[test]
    fn filter_needs_both_year_and_config() {
        let out = filter_rows(&table(), &[2019], &["Freight Configuration".into(), "Seaplane".into()]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.year == 2019));
        assert!(filter_rows(&table(), &[], &distinct_configs(&table())).is_empty());
    }

    #[test]
    fn series_sorted_by_year() {
        let s = flights_over_time(&table());
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].aircraft_config, "Passenger Configuration");
        assert_eq!(s[0].points, vec![(2018, 850), (2019, 900)]);
        assert_eq!(s[2].points, vec![(2019, 3)]);
    }

    #[test]
    fn mean_of_means_per_config() {
        let m = average_ground_time_by_config(&table());
        assert_eq!(m.len(), 3);
        assert_eq!(m[0].aircraft_config, "Freight Configuration");
        assert!((m[0].average_ground_time - 100.0).abs() < 1e-9);
        assert_eq!(m[0].groups, 2);
        assert!((m[1].average_ground_time - 45.0).abs() < 1e-9);
        assert!(average_ground_time_by_config(&[]).is_empty());
    }
}
