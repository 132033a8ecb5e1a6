use crate::tui::theme::Theme;
use flight_lens_common::Config;
use flight_lens_core::binning::{MAX_BINS, MIN_BINS};
use flight_lens_core::flights::{distinct_configs, distinct_years, unique_in_order};
use flight_lens_core::{Colormap, Controls, DashboardData, Distribution, Selection, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Flights,
    GroundTime,
    Correlation,
    Histogram,
    Boxplot,
    Qq,
    DropTest,
    Docs,
    Help,
}

impl View {
    pub const PANELS: [View; 8] = [
        View::Flights,
        View::GroundTime,
        View::Correlation,
        View::Histogram,
        View::Boxplot,
        View::Qq,
        View::DropTest,
        View::Docs,
    ];
    pub fn title(self) -> &'static str {
        match self {
            View::Flights => "Flight Statistics",
            View::GroundTime => "Average Ground Time",
            View::Correlation => "Correlation",
            View::Histogram => "Histogram",
            View::Boxplot => "Boxplot",
            View::Qq => "QQ Plot",
            View::DropTest => "Drop Test",
            View::Docs => "Docs",
            View::Help => "Help",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    Sidebar,
    Main,
}

/// One row of the sidebar. Which rows exist depends on the active panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Year(i32),
    Config(String),
    Colormap,
    Feature,
    Bins,
    BoxYear(i32),
    BoxConfig(String),
    Distribution,
}

pub struct App {
    pub data_dir: String,
    pub data: Option<DashboardData>,
    pub controls: Option<Controls>,
    pub snapshot: Option<Snapshot>,
    pub view: View,
    pub last_panel: View, // restored when help closes
    pub focus: Focus,
    pub sidebar_selected: usize,
    pub status_msg: String,
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub help_scroll: usize,
    pub main_scroll: usize, // table rows scrolled off in the flights / drop-test panels
    pub watch_rx: Option<std::sync::mpsc::Receiver<()>>, // reload events from filesystem watcher
    pub sidebar_width: u16, // runtime-adjustable, clamped 20..=60
    pub sidebar_visible: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let sidebar_width = config.display.sidebar_width.unwrap_or(34);
        Self {
            data_dir: config.data.data_dir.clone(),
            data: None,
            controls: None,
            snapshot: None,
            view: View::Flights,
            last_panel: View::Flights,
            focus: Focus::Sidebar,
            sidebar_selected: 0,
            status_msg: String::from("Loading..."),
            should_quit: false,
            theme: Theme::from_name(&config.display.theme),
            config,
            help_scroll: 0,
            main_scroll: 0,
            watch_rx: None,
            sidebar_width,
            sidebar_visible: true,
        }
    }

    /// Install freshly loaded tables. On a reload the user's filters carry over to the new
    /// tables instead of resetting.
    pub fn set_data(&mut self, data: DashboardData) {
        self.controls = Some(match (&self.controls, &self.data) {
            (Some(c), Some(previous)) => c.carried_over(previous, &data),
            _ => Controls::defaults_for(&data, &self.config),
        });
        self.data = Some(data);
        let items = self.sidebar_items().len();
        self.sidebar_selected = self.sidebar_selected.min(items.saturating_sub(1));
        self.recompute();
    }

    pub fn reload(&mut self) {
        match DashboardData::load(&self.config.data) {
            Ok(d) => {
                self.set_data(d);
                if self.snapshot.is_some() {
                    self.status_msg = format!("reloaded {}", self.data_dir);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.status_msg = format!("reload failed: {e}");
            }
        }
    }

    /// Rerun every chart transformation. A failure keeps the last good snapshot on screen.
    pub fn recompute(&mut self) {
        let (Some(data), Some(controls)) = (&self.data, &self.controls) else { return };
        match Snapshot::compute(data, controls) {
            Ok(s) => {
                self.snapshot = Some(s);
                self.status_msg = "Ready | q:quit ?:help".into();
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot failed");
                self.status_msg = format!("error: {e}");
            }
        }
    }

    pub fn show(&mut self, view: View) {
        if view != View::Help {
            self.last_panel = view;
        }
        self.view = view;
        self.sidebar_selected = 0;
        self.main_scroll = 0;
    }

    pub fn next_panel(&mut self, forward: bool) {
        let n = View::PANELS.len();
        let i = View::PANELS.iter().position(|v| *v == self.last_panel).unwrap_or(0);
        let j = if forward { (i + 1) % n } else { (i + n - 1) % n };
        self.show(View::PANELS[j]);
    }

    pub fn sidebar_items(&self) -> Vec<Item> {
        let Some(data) = &self.data else { return Vec::new() };
        let panel = if self.view == View::Help { self.last_panel } else { self.view };
        match panel {
            View::Flights | View::GroundTime => distinct_years(&data.flights)
                .into_iter()
                .map(Item::Year)
                .chain(distinct_configs(&data.flights).into_iter().map(Item::Config))
                .collect(),
            View::Correlation => vec![Item::Colormap, Item::Feature],
            View::Histogram => vec![Item::Bins],
            View::Boxplot => unique_in_order(data.boxplot.iter().map(|s| s.year))
                .into_iter()
                .map(Item::BoxYear)
                .chain(unique_in_order(data.boxplot.iter().map(|s| s.aircraft_config.clone())).into_iter().map(Item::BoxConfig))
                .collect(),
            View::Qq => vec![Item::Distribution],
            View::DropTest | View::Docs | View::Help => Vec::new(),
        }
    }

    pub fn sidebar_down(&mut self) {
        let max = self.sidebar_items().len().saturating_sub(1);
        if self.sidebar_selected < max {
            self.sidebar_selected += 1;
        }
    }
    pub fn sidebar_up(&mut self) {
        if self.sidebar_selected > 0 {
            self.sidebar_selected -= 1;
        }
    }
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Main,
            Focus::Main => Focus::Sidebar,
        };
    }

    pub fn is_checked(&self, item: &Item) -> bool {
        let Some(c) = &self.controls else { return false };
        match item {
            Item::Year(y) => c.years.contains(y),
            Item::Config(s) => c.configs.contains(s),
            Item::BoxYear(y) => c.box_years.contains(y),
            Item::BoxConfig(s) => c.box_configs.contains(s),
            _ => false,
        }
    }

    /// Space/Enter on the selected row: toggle a checkbox or step a selector forward.
    pub fn activate(&mut self) {
        self.adjust(1);
    }

    /// Left/right on the selected row. `delta` is +1 or -1.
    pub fn adjust(&mut self, delta: i32) {
        let Some(item) = self.sidebar_items().get(self.sidebar_selected).cloned() else { return };
        let Some(data) = &self.data else { return };
        let all_years = distinct_years(&data.flights);
        let all_configs = distinct_configs(&data.flights);
        let box_years = unique_in_order(data.boxplot.iter().map(|s| s.year));
        let box_configs = unique_in_order(data.boxplot.iter().map(|s| s.aircraft_config.clone()));
        let options = data.correlation.selector_options();
        let Some(c) = self.controls.as_mut() else { return };
        match item {
            Item::Year(y) => toggle(&mut c.years, y, &all_years),
            Item::Config(s) => toggle(&mut c.configs, s, &all_configs),
            Item::BoxYear(y) => toggle(&mut c.box_years, y, &box_years),
            Item::BoxConfig(s) => toggle(&mut c.box_configs, s, &box_configs),
            Item::Bins => {
                let b = c.bins as i64 + delta as i64;
                c.bins = b.clamp(MIN_BINS as i64, MAX_BINS as i64) as usize;
            }
            Item::Colormap => {
                c.colormap = if delta >= 0 { c.colormap.next() } else { step_back(c.colormap, Colormap::next) };
            }
            Item::Distribution => {
                c.distribution = if delta >= 0 { c.distribution.next() } else { step_back(c.distribution, Distribution::next) };
            }
            Item::Feature => {
                let n = options.len();
                if n == 0 {
                    return;
                }
                let i = options.iter().position(|o| o == c.selection.label()).unwrap_or(0);
                let j = if delta >= 0 { (i + 1) % n } else { (i + n - 1) % n };
                c.selection = Selection::parse(&options[j]);
            }
        }
        self.recompute();
    }

    /// Select every option of the multi-selects shown in the sidebar, or none.
    pub fn select_all(&mut self, on: bool) {
        let items = self.sidebar_items();
        let Some(c) = self.controls.as_mut() else { return };
        for item in items {
            match item {
                Item::Year(y) => set_member(&mut c.years, y, on),
                Item::Config(s) => set_member(&mut c.configs, s, on),
                Item::BoxYear(y) => set_member(&mut c.box_years, y, on),
                Item::BoxConfig(s) => set_member(&mut c.box_configs, s, on),
                _ => {}
            }
        }
        self.recompute();
    }
}

// keeps selections in the order options are offered
fn toggle<T: PartialEq + Clone>(selected: &mut Vec<T>, v: T, order: &[T]) {
    if let Some(pos) = selected.iter().position(|s| *s == v) {
        selected.remove(pos);
    } else {
        selected.push(v);
        let rank = |x: &T| order.iter().position(|o| o == x).unwrap_or(usize::MAX);
        selected.sort_by_key(|x| rank(x));
    }
}

fn set_member<T: PartialEq>(selected: &mut Vec<T>, v: T, on: bool) {
    let present = selected.contains(&v);
    if on && !present {
        selected.push(v);
    } else if !on && present {
        selected.retain(|s| *s != v);
    }
}

// previous value of a cyclic enum that only exposes `next`
fn step_back<T: Copy + PartialEq>(cur: T, next: impl Fn(T) -> T) -> T {
    let mut prev = cur;
    let mut cand = next(cur);
    while cand != cur {
        prev = cand;
        cand = next(cand);
    }
    prev
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flight_lens_core::binning::{HistogramBin, HistogramSummary};
    use flight_lens_core::boxplot::BoxplotSample;
    use flight_lens_core::flights::FlightSummaryRow;
    use flight_lens_core::CorrelationMatrix;

    pub(crate) fn sample_data() -> DashboardData {
        let flights = vec![
            FlightSummaryRow { year: 2018, aircraft_config: "Passenger Configuration".into(), total_flights: 850, average_ground_time: 50.0 },
            FlightSummaryRow { year: 2019, aircraft_config: "Passenger Configuration".into(), total_flights: 900, average_ground_time: 40.0 },
            FlightSummaryRow { year: 2019, aircraft_config: "Freight Configuration".into(), total_flights: 130, average_ground_time: 110.0 },
        ];
        let correlation = CorrelationMatrix::new(
            vec!["DISTANCE".into(), "GROUND_TIME".into()],
            vec![vec![1.0, -0.2], vec![-0.2, 1.0]],
        )
        .unwrap();
        let histogram = HistogramSummary::new(
            (0..30).map(|i| HistogramBin { left_edge: i as f64 * 0.3, frequency: (i % 7) as u64 }).collect(),
        )
        .unwrap();
        let boxplot = (0..20)
            .map(|i| BoxplotSample {
                year: 2018 + (i % 2),
                aircraft_config: if i % 4 < 2 { "Freight Configuration".into() } else { "Passenger Configuration".into() },
                log_ground_time: 2.0 + i as f64 * 0.25,
            })
            .collect();
        let qq = (1..=25).map(|i| (i as f64).sqrt()).collect();
        DashboardData { flights, correlation, histogram, boxplot, qq, source_dir: "DATA".into() }
    }

    pub(crate) fn loaded_app() -> App {
        let mut app = App::new(Config::default());
        app.set_data(sample_data());
        app
    }

    #[test]
    fn initial_snapshot_computed() {
        let app = loaded_app();
        assert!(app.snapshot.is_some());
        assert_eq!(app.controls.as_ref().unwrap().bins, 10);
    }

    #[test]
    fn toggling_year_refilters() {
        let mut app = loaded_app();
        assert_eq!(app.sidebar_items()[0], Item::Year(2018));
        app.activate();
        assert_eq!(app.snapshot.as_ref().unwrap().filtered.len(), 2);
        app.activate();
        assert_eq!(app.controls.as_ref().unwrap().years, vec![2018, 2019]);
    }

    #[test]
    fn bins_clamped_to_slider() {
        let mut app = loaded_app();
        app.show(View::Histogram);
        for _ in 0..40 {
            app.adjust(1);
        }
        assert_eq!(app.controls.as_ref().unwrap().bins, MAX_BINS);
        for _ in 0..40 {
            app.adjust(-1);
        }
        assert_eq!(app.controls.as_ref().unwrap().bins, MIN_BINS);
        assert_eq!(app.snapshot.as_ref().unwrap().histogram.bins.len(), 5);
    }

    #[test]
    fn feature_selector_cycles_through_sentinel() {
        let mut app = loaded_app();
        app.show(View::Correlation);
        app.sidebar_down();
        app.adjust(1);
        assert_eq!(app.controls.as_ref().unwrap().selection, Selection::Feature("DISTANCE".into()));
        app.adjust(-1);
        app.adjust(-1);
        assert_eq!(app.controls.as_ref().unwrap().selection, Selection::Feature("GROUND_TIME".into()));
    }

    #[test]
    fn colormap_steps_both_ways() {
        let mut app = loaded_app();
        app.show(View::Correlation);
        app.adjust(-1);
        assert_eq!(app.controls.as_ref().unwrap().colormap, Colormap::Magma);
        app.adjust(1);
        assert_eq!(app.controls.as_ref().unwrap().colormap, Colormap::RdBuR);
    }

    #[test]
    fn select_none_then_all() {
        let mut app = loaded_app();
        app.show(View::Boxplot);
        app.select_all(false);
        assert!(app.snapshot.as_ref().unwrap().boxplot.is_empty());
        app.select_all(true);
        assert_eq!(app.snapshot.as_ref().unwrap().boxplot.len(), 4);
    }

    #[test]
    fn reload_carries_controls_to_new_tables() {
        let mut app = loaded_app();
        app.show(View::Correlation);
        app.sidebar_down();
        app.adjust(-1);
        assert_eq!(app.controls.as_ref().unwrap().selection, Selection::Feature("GROUND_TIME".into()));

        let mut data = sample_data();
        data.correlation = CorrelationMatrix::new(vec!["DISTANCE".into()], vec![vec![1.0]]).unwrap();
        data.flights.push(FlightSummaryRow {
            year: 2020,
            aircraft_config: "Passenger Configuration".into(),
            total_flights: 700,
            average_ground_time: 45.0,
        });
        app.set_data(data);
        assert_eq!(app.status_msg, "Ready | q:quit ?:help");
        let c = app.controls.as_ref().unwrap();
        assert_eq!(c.selection, Selection::Full);
        assert_eq!(c.years, vec![2018, 2019, 2020]);

        app.show(View::Flights);
        app.activate(); // deselect 2018
        assert_eq!(app.snapshot.as_ref().unwrap().filtered.len(), 3);
    }

    const FLIGHTS_CSV: &str = "YEAR,AIRCRAFT_CONFIG_DESC,total_flights,average_ground_time
2018,Passenger Configuration,850,50.5
2019,Freight Configuration,130,110.0
";

    fn write_data_dir(dir: &std::path::Path, flights: &str) {
        std::fs::write(dir.join("summarized_flight_data.csv"), flights).unwrap();
        std::fs::write(dir.join("correlation_matrix.csv"), ",DISTANCE,GROUND_TIME\nDISTANCE,1.0,-0.2\nGROUND_TIME,-0.2,1.0\n").unwrap();
        std::fs::write(dir.join("histogram_summary_ground_time.csv"), "bin_edges,frequency\n0.0,5\n0.5,10\n1.0,7\n1.5,3\n2.0,1\n").unwrap();
        std::fs::write(
            dir.join("boxplot_summary.csv"),
            "YEAR,AIRCRAFT_CONFIG_DESC,LOG_GROUND_TIME\n2018,Freight Configuration,3.0\n2018,Passenger Configuration,4.0\n",
        )
        .unwrap();
        std::fs::write(dir.join("qq_sample.csv"), "LOG_GROUND_TIME\n3.1\n2.7\n4.0\n").unwrap();
    }

    #[test]
    fn reload_reads_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_data_dir(dir.path(), FLIGHTS_CSV);
        let mut config = Config::default();
        config.data.data_dir = dir.path().display().to_string();
        let mut app = App::new(config);
        app.reload();
        assert_eq!(app.snapshot.as_ref().unwrap().filtered.len(), 2);

        write_data_dir(dir.path(), &format!("{FLIGHTS_CSV}2020,Passenger Configuration,700,45.0\n"));
        app.reload();
        assert!(app.status_msg.starts_with("reloaded"), "{}", app.status_msg);
        assert_eq!(app.snapshot.as_ref().unwrap().filtered.len(), 3);
        assert_eq!(app.controls.as_ref().unwrap().years, vec![2018, 2019, 2020]);
    }

    #[test]
    fn failed_reload_keeps_last_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_data_dir(dir.path(), FLIGHTS_CSV);
        let mut config = Config::default();
        config.data.data_dir = dir.path().display().to_string();
        let mut app = App::new(config);
        app.reload();
        std::fs::remove_file(dir.path().join("qq_sample.csv")).unwrap();
        app.reload();
        assert!(app.status_msg.starts_with("reload failed"), "{}", app.status_msg);
        assert_eq!(app.snapshot.as_ref().unwrap().filtered.len(), 2);
    }
}
