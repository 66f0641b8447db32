use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use delay_analysis::config::{parse_thresholds, AnalysisConfig};
use delay_analysis::loader::{categorized_frame, load_records, write_csv};
use delay_analysis::normalize::normalize_delays;
use delay_analysis::report::DelayReport;
use delay_analysis::threshold::{analyze_thresholds, ThresholdImpactResult};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "delay-analysis")]
#[command(about = "Checkout delay analysis for shared-car rentals")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analysis and print the report
    Report {
        /// Rental table (CSV or Parquet)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Threshold for the detailed impact (minutes)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Comma-separated thresholds for the sweep
        #[arg(long)]
        thresholds: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the normalized table with its delay category column
    Categorize {
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(short, long)]
        out: PathBuf,
    },
    /// Print the impact of each threshold
    Thresholds {
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(long)]
        thresholds: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Report { data, config, threshold, thresholds, json } => {
            let mut config = resolve_config(config, data)?;
            if let Some(list) = thresholds {
                config.thresholds = parse_thresholds(&list)?;
                config.validate()?;
            }
            if let Some(t) = threshold {
                config.selected_threshold = t;
            }
            run_report(&config, json)
        }
        Commands::Categorize { data, out } => {
            let config = resolve_config(None, data)?;
            run_categorize(&config, out)
        }
        Commands::Thresholds { data, thresholds } => {
            let mut config = resolve_config(None, data)?;
            if let Some(list) = thresholds {
                config.thresholds = parse_thresholds(&list)?;
                config.validate()?;
            }
            run_thresholds(&config)
        }
    }
}

/// File config (if any), then environment, then the command line
fn resolve_config(config_file: Option<PathBuf>, data: Option<PathBuf>) -> Result<AnalysisConfig> {
    let base = match config_file {
        Some(path) => AnalysisConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let mut config = base.with_env()?;
    if let Some(path) = data {
        config.data_path = path;
    }
    Ok(config)
}

fn run_report(config: &AnalysisConfig, json: bool) -> Result<()> {
    info!("Loading rentals from {:?}", config.data_path);
    let records = load_records(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;

    let report = DelayReport::build(&records, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn run_categorize(config: &AnalysisConfig, out: PathBuf) -> Result<()> {
    let mut records = load_records(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;
    normalize_delays(&mut records);

    let mut df = categorized_frame(&records)?;
    write_csv(&mut df, &out)?;
    println!("Wrote {} categorized rows to {}", df.height(), out.display());
    Ok(())
}

fn run_thresholds(config: &AnalysisConfig) -> Result<()> {
    let mut records = load_records(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;
    normalize_delays(&mut records);

    let results = analyze_thresholds(&records, &config.thresholds);
    print_threshold_table(&results);
    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}

fn print_summary(report: &DelayReport) {
    println!("\n{}", "=".repeat(80));
    println!(" DELAY ANALYSIS ({} rentals)", report.total_records);
    println!("{}", "=".repeat(80));

    println!("\n Delay categories:");
    for c in &report.category_counts {
        println!("   {:<14} {:>8}", c.category.label(), c.count);
    }

    println!("\n Average delay per checkin type:");
    for (checkin, mean) in &report.mean_delay_by_checkin {
        println!("   {:<14} {:>10.2} min", checkin, mean);
    }
    println!(
        "\n The average delay is {} minutes.",
        fmt_opt(report.overall_mean_delay_rounded)
    );
    println!(
        " {}% of drivers are late for the next check-in.",
        fmt_opt(report.late_percentage)
    );

    println!("\n Late check-ins by type:");
    for (checkin, count) in &report.late_by_checkin {
        println!("   {:<14} {:>8}", checkin, count);
    }

    println!("\n Check-in types:");
    for share in &report.checkin_type_shares {
        println!("   {:<14} {:>8} ({:.1}%)", share.value, share.count, share.fraction * 100.0);
    }
    println!("\n Booking states:");
    for share in &report.state_shares {
        println!("   {:<14} {:>8} ({:.1}%)", share.value, share.count, share.fraction * 100.0);
    }

    let selected = &report.selected_threshold;
    println!("\n{}", "-".repeat(80));
    println!(
        " A {} minute threshold on connect rentals would affect {}% of owners' revenue",
        selected.threshold,
        fmt_opt(selected.percentage_of_total_affected)
    );
    println!(
        " and resolve {} problematic cases.",
        selected.canceled_cases_resolved
    );

    println!("\n Remaining gaps (minutes) by checkin type and state:");
    for g in &report.remaining_gaps {
        println!(
            "   {:<10} {:<10} count={:<6} mean={:<10} median={:<10} max={}",
            g.checkin_type,
            g.state,
            g.count,
            fmt_opt(g.mean.map(|m| format!("{:.1}", m))),
            fmt_opt(g.p50),
            fmt_opt(g.max)
        );
    }

    println!();
    print_threshold_table(&report.threshold_sweep);
}

fn print_threshold_table(results: &[ThresholdImpactResult]) {
    println!(" {:>10} {:>16} {:>12} {:>16}", "threshold", "connect removed", "% affected", "cases resolved");
    for r in results {
        println!(
            " {:>10} {:>16} {:>12} {:>16}",
            r.threshold,
            r.records_removed_connect_ended,
            fmt_opt(r.percentage_of_total_affected),
            r.canceled_cases_resolved
        );
    }
}
