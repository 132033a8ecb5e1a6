mod tui;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flight_lens_common::Config;
use flight_lens_core::binning::{MAX_BINS, MIN_BINS};
use flight_lens_core::export::{export_json, print_summary};
use flight_lens_core::{Colormap, Controls, DashboardData, Distribution, Selection, Snapshot};
use notify::{RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::{io, time::Duration};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tui::app::{App, Focus};
use tui::events::handle_key;
use tui::ui::render;

fn parse_bins(s: &str) -> Result<usize, String> { // validate slider range at CLI parse time
    let v: usize = s.parse().map_err(|_| format!("not an integer: {s}"))?;
    if (MIN_BINS..=MAX_BINS).contains(&v) { Ok(v) } else { Err(format!("bins must be in [{MIN_BINS}, {MAX_BINS}], got {v}")) }
}

#[derive(Parser)]
#[command(name = "flight-lens", version, about = "Terminal dashboard for precomputed flight statistics")]
struct Cli {
    /// debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard
    Dashboard {
        #[arg(long)] data_dir: Option<String>,
        /// reload when files in the data directory change
        #[arg(long)] watch: bool,
    },
    /// Print table counts and totals
    Summary { #[arg(long)] data_dir: Option<String> },
    /// Write every panel's derived data as JSON
    Export {
        #[arg(long)] data_dir: Option<String>,
        #[arg(long, value_parser = parse_bins)] bins: Option<usize>,
        /// correlation feature; omit for the full matrix
        #[arg(long)] feature: Option<String>,
        #[arg(long)] distribution: Option<String>,
        #[arg(long)] colormap: Option<String>,
        #[arg(long)] output: Option<String>,
    },
    /// Shell completion script
    Completions { shell: Shell },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load().unwrap_or_default();
    match cli.command {
        Commands::Dashboard { data_dir, watch } => {
            init_logging(cli.verbose, true);
            override_dir(&mut config, data_dir);
            run_dashboard(config, watch)?
        }
        Commands::Summary { data_dir } => {
            init_logging(cli.verbose, false);
            override_dir(&mut config, data_dir);
            run_summary(&config)?
        }
        Commands::Export { data_dir, bins, feature, distribution, colormap, output } => {
            init_logging(cli.verbose, false);
            override_dir(&mut config, data_dir);
            run_export(&config, bins, feature, distribution, colormap, output)?
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "flight-lens", &mut io::stdout());
        }
    }
    Ok(())
}

fn override_dir(config: &mut Config, data_dir: Option<String>) {
    if let Some(d) = data_dir {
        config.data.data_dir = d;
    }
}

fn log_path() -> Option<PathBuf> {
    Some(dirs::cache_dir()?.join("flight-lens").join("flight-lens.log"))
}

/// The dashboard owns the terminal, so it logs to a file; headless commands log to stderr.
fn init_logging(verbose: bool, to_file: bool) {
    let default = if verbose { "flight_lens=debug,flight_lens_core=debug" } else { "flight_lens=info,flight_lens_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if !to_file {
        let _ = tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(io::stderr)).try_init();
        return;
    }
    let Some(path) = log_path() else { return };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() { return; }
    }
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) else { return };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(std::sync::Mutex::new(file)))
        .try_init();
}

fn spawn_watcher(dir: &Path) -> anyhow::Result<(notify::RecommendedWatcher, Receiver<()>)> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(ev) = res {
            if ev.kind.is_modify() || ev.kind.is_create() || ev.kind.is_remove() {
                let _ = tx.send(()); // receiver gone means the UI is shutting down
            }
        }
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, rx))
}

fn run_dashboard(config: Config, watch: bool) -> anyhow::Result<()> {
    let mut app = App::new(config);
    match DashboardData::load(&app.config.data) {
        Ok(d) => app.set_data(d),
        Err(e) => {
            tracing::error!(error = %e, "initial load failed");
            app.status_msg = format!("load failed: {e}");
        }
    }
    // kept alive for the whole session; dropping it stops the events
    let _watcher = if watch {
        match spawn_watcher(Path::new(&app.config.data.data_dir)) {
            Ok((w, rx)) => {
                app.watch_rx = Some(rx);
                tracing::info!(dir = %app.data_dir, "watching data directory");
                Some(w)
            }
            Err(e) => {
                app.status_msg = format!("--watch unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = event_loop(&mut terminal, &mut app);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    res
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> anyhow::Result<()> {
    let tick = Duration::from_millis(66); // 15Hz
    loop {
        terminal.draw(|f| render(f, app))?;
        // collapse a burst of file events into one reload
        let changed = app.watch_rx.as_ref().map(|rx| {
            let mut any = false;
            while rx.try_recv().is_ok() { any = true; }
            any
        }).unwrap_or(false);
        if changed {
            tracing::info!("data directory changed, reloading");
            app.reload();
        }
        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) => handle_key(app, key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        if app.focus == Focus::Sidebar { app.sidebar_down(); } else { app.main_scroll += 1; }
                    }
                    MouseEventKind::ScrollUp => {
                        if app.focus == Focus::Sidebar { app.sidebar_up(); } else { app.main_scroll = app.main_scroll.saturating_sub(1); }
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        if app.should_quit { break; }
    }
    Ok(())
}

fn load_data(config: &Config) -> anyhow::Result<DashboardData> {
    DashboardData::load(&config.data).with_context(|| format!("loading data from {}", config.data.data_dir))
}

fn run_summary(config: &Config) -> anyhow::Result<()> {
    let data = load_data(config)?;
    print_summary(&data);
    Ok(())
}

fn run_export(
    config: &Config,
    bins: Option<usize>,
    feature: Option<String>,
    distribution: Option<String>,
    colormap: Option<String>,
    output: Option<String>,
) -> anyhow::Result<()> {
    let data = load_data(config)?;
    let mut controls = Controls::defaults_for(&data, config);
    if let Some(b) = bins { controls.bins = b; }
    if let Some(f) = feature { controls.selection = Selection::parse(&f); }
    if let Some(d) = distribution { controls.distribution = Distribution::parse(&d)?; }
    if let Some(c) = colormap { controls.colormap = Colormap::parse(&c)?; }
    let snapshot = Snapshot::compute(&data, &controls)?;
    let out_path: PathBuf = match output {
        Some(o) => PathBuf::from(o),
        None => Path::new(&config.export.output_dir).join("flight-lens-snapshot.json"),
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
    }
    export_json(&out_path, &snapshot)?;
    println!("Exported to {}", out_path.display());
    Ok(())
}
