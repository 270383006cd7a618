//! Water KPI calculator entry point: CLI wiring and config-driven source construction.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use water_kpi::calculator::{KpiCalculator, KpiRun};
use water_kpi::config::CalculatorConfig;
use water_kpi::io::export::{export_breakdown, export_monthly, export_zones};
use water_kpi::source::{CsvSource, JsonSource, RecordFilter, RecordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecordFormat {
    /// Pick by file extension, CSV unless it ends in `.json`.
    Auto,
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "water-kpi")]
#[command(about = "Water distribution hierarchy KPI calculator")]
struct Args {
    /// Meter records file (CSV export or JSON array of rows)
    #[arg(long)]
    records: PathBuf,

    /// Record file format
    #[arg(long, value_enum, default_value_t = RecordFormat::Auto)]
    format: RecordFormat,

    /// Load calculator configuration from a TOML file
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (canonical, extended_l4)
    #[arg(long)]
    preset: Option<String>,

    /// Only include meters in this zone
    #[arg(long)]
    zone: Option<String>,

    /// Only include meters of this type
    #[arg(long = "type")]
    meter_type: Option<String>,

    /// Only include meters whose label contains this text
    #[arg(long)]
    search: Option<String>,

    /// Export the consumption-by-level breakdown to CSV
    #[arg(long)]
    breakdown_out: Option<PathBuf>,

    /// Export the monthly KPI series to CSV
    #[arg(long)]
    monthly_out: Option<PathBuf>,

    /// Export zone balances to CSV
    #[arg(long)]
    zones_out: Option<PathBuf>,

    /// Start REST API server after computing
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

/// Resolves the configuration from `--config`, `--preset`, or the canonical default.
fn load_config(args: &Args) -> CalculatorConfig {
    let loaded = match (&args.config, &args.preset) {
        (Some(path), _) => CalculatorConfig::from_toml_file(path),
        (None, Some(name)) => CalculatorConfig::from_preset(name),
        (None, None) => Ok(CalculatorConfig::canonical()),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

fn build_source(path: &Path, format: RecordFormat) -> Box<dyn RecordSource> {
    let is_json = match format {
        RecordFormat::Json => true,
        RecordFormat::Csv => false,
        RecordFormat::Auto => path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json")),
    };
    if is_json {
        Box::new(JsonSource::new(path))
    } else {
        Box::new(CsvSource::new(path))
    }
}

fn print_run(run: &KpiRun) {
    println!("{}", run.report.metrics);
    println!();
    println!("--- Consumption by Level ---");
    for row in &run.breakdown {
        println!(
            "{:<34} {:>14.2} m³  {:>4} meters  {:>6.2}%",
            row.level, row.consumption, row.meter_count, row.percentage
        );
    }
    println!();
    println!("--- Ratings ---");
    println!("Efficiency:          {}", run.ratings.efficiency);
    println!("Stage 1 loss:        {}", run.ratings.stage1_loss);
    println!("Stage 2 loss:        {}", run.ratings.stage2_loss);
    println!("Total loss:          {}", run.ratings.total_loss);

    if !run.report.warnings.is_empty() {
        println!();
        println!("--- Data Quality ---");
        for warning in &run.report.warnings {
            println!("warning: {warning}");
        }
    }
}

fn export_or_exit(result: std::io::Result<()>, what: &str, path: &Path) {
    if let Err(e) = result {
        eprintln!("error: failed to export {what} to {}: {e}", path.display());
        process::exit(1);
    }
    eprintln!("{what} exported to {}", path.display());
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args);

    let source = build_source(&args.records, args.format);
    let calculator = KpiCalculator::from_config(source, &config);
    let filter = RecordFilter {
        zone: args.zone.clone(),
        meter_type: args.meter_type.clone(),
        label_contains: args.search.clone(),
    };

    let run = calculator.run(&filter).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    print_run(&run);

    if let Some(path) = &args.breakdown_out {
        export_or_exit(export_breakdown(&run.breakdown, path), "breakdown", path);
    }
    if let Some(path) = &args.monthly_out {
        export_or_exit(export_monthly(&run.monthly, path), "monthly series", path);
    }
    if let Some(path) = &args.zones_out {
        export_or_exit(export_zones(&run.zones, path), "zone balances", path);
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(water_kpi::api::AppState {
            month_schema_version: config.months.version,
            run,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(water_kpi::api::serve(state, addr)) {
            eprintln!("error: API server failed on {addr}: {e}");
            process::exit(1);
        }
    }
}
