use crate::dashboard::Snapshot;
use crate::flights;
use crate::session::DashboardData;
use flight_lens_common::{FlightLensError, Result};
use std::io::Write;
use std::path::Path;

// --- headless summary output ---

pub fn print_summary(data: &DashboardData) {
    let stdout = std::io::stdout();
    // a closed pipe (`| head`) is not worth an error
    let _ = write_summary(&mut stdout.lock(), data);
}

pub fn write_summary(out: &mut impl Write, data: &DashboardData) -> std::io::Result<()> {
    let years = flights::distinct_years(&data.flights);
    let configs = flights::distinct_configs(&data.flights);
    let total: i64 = data.flights.iter().map(|r| r.total_flights).sum();
    writeln!(out, "{:<16} {}", "Data dir:", data.source_dir.display())?;
    writeln!(out, "{:<16} {}", "Summary rows:", data.flights.len())?;
    writeln!(out, "{:<16} {}", "Total flights:", total)?;
    match (years.iter().min(), years.iter().max()) {
        (Some(lo), Some(hi)) => writeln!(out, "{:<16} {lo}-{hi} ({} years)", "Years:", years.len())?,
        _ => writeln!(out, "{:<16} -", "Years:")?,
    }
    writeln!(out, "{:<16} {}", "Configs:", configs.len())?;
    for m in flights::average_ground_time_by_config(&data.flights) {
        writeln!(out, "  {:<36} {:>8.2} min", m.aircraft_config, m.average_ground_time)?;
    }
    writeln!(out, "{:<16} {}", "Features:", data.correlation.len())?;
    writeln!(
        out,
        "{:<16} {} ({} observations)",
        "Hist bins:",
        data.histogram.len(),
        data.histogram.total_frequency()
    )?;
    writeln!(out, "{:<16} {}", "Box samples:", data.boxplot.len())?;
    writeln!(out, "{:<16} {}", "QQ samples:", data.qq.len())?;
    Ok(())
}

// --- JSON export ---

pub fn export_json(output_path: &Path, snapshot: &Snapshot) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, snapshot).map_err(|e| FlightLensError::Other(e.to_string()))?;
    writeln!(file)?;
    tracing::info!(path = %output_path.display(), "snapshot exported");
    Ok(())
}
