use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn, Level};

use warptail_stats::logging::{init_logging, level_from_verbosity};
use warptail_stats::{
    build_chart, format_duration, ChartView, DashboardData, DataSource, FileSource,
    RouteSelection, SamplePolicy, SeriesConfig, Settings, SettingsOverrides,
};
use warptail_types::Service;

#[derive(Parser, Debug)]
#[command(name = "warptail-stats")]
#[command(about = "Chart-ready traffic series for warptail routes")]
struct Args {
    /// Path to a service snapshot JSON file
    #[arg(short, long, default_value = "services.json")]
    file: PathBuf,

    /// Settings file (TOML, YAML or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service to chart by name (defaults to the first in the snapshot)
    #[arg(short, long)]
    service: Option<String>,

    /// Route key to chart, or "all" for the summary of every route
    #[arg(short, long, default_value = "all")]
    route: RouteSelection,

    /// Trailing window to show (e.g., "10m", "90s")
    #[arg(long)]
    window: Option<String>,

    /// Sampling interval; longer gaps are filled (e.g., "60s")
    #[arg(long)]
    interval: Option<String>,

    /// Moving average width in samples
    #[arg(long)]
    smoothing: Option<usize>,

    /// What to do with malformed samples: drop or reject
    #[arg(long)]
    on_malformed: Option<SamplePolicy>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Export the chart view to a JSON file and exit
    #[arg(short, long, conflicts_with = "watch")]
    export: Option<PathBuf>,

    /// Keep polling the file and print the chart on every refresh
    #[arg(short, long)]
    watch: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    let level = if args.verbose > 0 {
        level_from_verbosity(args.verbose)
    } else {
        settings.level()?.unwrap_or(Level::WARN)
    };
    init_logging(level);

    let series = settings.series_config()?;
    debug!(?settings, "Resolved settings");

    if let Some(export_path) = &args.export {
        return export_to_file(&args, export_path, settings.on_malformed, &series);
    }

    if args.watch {
        return run_watch(&args, settings.on_malformed, &series, settings.refresh_interval()?);
    }

    let data = DashboardData::load(&args.file, settings.on_malformed)?;
    let service = find_service(&data, args.service.as_deref())?;
    print!("{}", render(service, &args.route, &series, args.format)?);
    Ok(())
}

/// Settings file and environment first, then explicit flags on top.
fn resolve_settings(args: &Args) -> Result<Settings> {
    let overrides = SettingsOverrides {
        window: args.window.clone(),
        interval: args.interval.clone(),
        smoothing: args.smoothing,
        on_malformed: args.on_malformed,
    };
    let settings = Settings::load(args.config.as_deref())?.with_overrides(&overrides);

    settings.validate()?;
    Ok(settings)
}

fn find_service<'a>(data: &'a DashboardData, name: Option<&str>) -> Result<&'a Service> {
    data.service(name).ok_or_else(|| match name {
        Some(name) => anyhow!("Service {:?} not found", name),
        None => anyhow!("Snapshot contains no services"),
    })
}

fn render(
    service: &Service,
    selection: &RouteSelection,
    series: &SeriesConfig,
    format: OutputFormat,
) -> Result<String> {
    let view = build_chart(&service.routes, selection, Utc::now(), series);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&view)? + "\n"),
        OutputFormat::Text => Ok(render_text(service, selection, &view)?),
    }
}

fn render_text(
    service: &Service,
    selection: &RouteSelection,
    view: &ChartView,
) -> Result<String, std::fmt::Error> {
    let latency = match selection {
        RouteSelection::All => service.latency,
        RouteSelection::Route(key) => service
            .routes
            .iter()
            .enumerate()
            .find(|(index, route)| route.selection_key(*index) == *key)
            .and_then(|(_, route)| route.latency),
    };

    let mut out = String::new();
    writeln!(out, "{} ({})", service.name, view.label)?;
    writeln!(
        out,
        "total sent {}  received {}  latency {}",
        view.total_sent,
        view.total_received,
        format_duration(latency)
    )?;

    if view.is_empty() {
        writeln!(out, "no traffic in window")?;
        return Ok(out);
    }

    writeln!(out, "{:<10}{:>12}{:>12}", "TIME", "SENT", "RECEIVED")?;
    for (tick, sent, received) in view.rows() {
        writeln!(out, "{:<10}{:>12}{:>12}", tick, sent, received)?;
    }
    Ok(out)
}

/// Poll the snapshot file and print the chart on every refresh.
///
/// The last accepted snapshot is kept, so the trailing window keeps moving
/// while the file is unchanged.
fn run_watch(
    args: &Args,
    policy: SamplePolicy,
    series: &SeriesConfig,
    refresh: Duration,
) -> Result<()> {
    let mut source = FileSource::new(&args.file);
    let mut current: Option<DashboardData> = None;
    info!(source = source.description(), ?refresh, "Watching snapshot");

    loop {
        match source.poll() {
            Some(snapshot) => match DashboardData::from_snapshot(snapshot, policy) {
                Ok(data) => current = Some(data),
                Err(e) => warn!(error = %e, "Rejected snapshot"),
            },
            None => {
                if let Some(error) = source.error() {
                    debug!(error, "Poll failed");
                }
            }
        }

        if let Some(data) = &current {
            match find_service(data, args.service.as_deref()) {
                Ok(service) => print!("{}", render(service, &args.route, series, args.format)?),
                Err(e) => warn!(error = %e, "Nothing to chart"),
            }
        }

        thread::sleep(refresh);
    }
}

/// Export the current chart view to a JSON file
fn export_to_file(
    args: &Args,
    export_path: &Path,
    policy: SamplePolicy,
    series: &SeriesConfig,
) -> Result<()> {
    let data = DashboardData::load(&args.file, policy)?;
    let service = find_service(&data, args.service.as_deref())?;
    let view = build_chart(&service.routes, &args.route, Utc::now(), series);

    let json = serde_json::to_string_pretty(&view)?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported chart view to: {}", export_path.display());
    Ok(())
}
