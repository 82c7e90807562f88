//! CLI entry point for the OTP fare inspector.
//!
//! Reads an OTP plan response from a file, stdin or URL and reports fare
//! totals, reused fare products and fare products that vary between legs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use otp_fare_inspector::{
    analyzers::analyze_plan,
    config::Settings,
    fetch::{BasicClient, fetch_bytes},
    format::format_totals,
    model::Plan,
    output::{append_records, print_pretty, write_json, write_report},
    parser::parse_plan_bytes,
    stats::ItineraryStats,
};
use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "otp_fare_inspector")]
#[command(about = "Inspect fare products in OTP trip-planning responses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Path to a plan JSON file, `-` for stdin, or a URL to fetch
    #[arg(value_name = "FILE_OR_URL")]
    source: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze fare products of every itinerary in a plan
    Analyze {
        #[command(flatten)]
        input: SourceArgs,

        /// Report format written to stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// CSV file to append per-itinerary rows to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Print one line per itinerary with totals, reused and varied products
    Summarize {
        #[command(flatten)]
        input: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("otp_fare_inspector.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, format, csv } => {
            let Some(plan) = load_plan(&input).await? else {
                return Ok(());
            };
            let analysis = analyze_plan(&plan);
            print_pretty(&analysis);

            let stdout = std::io::stdout().lock();
            match format {
                OutputFormat::Text => write_report(stdout, &analysis)?,
                OutputFormat::Json => write_json(stdout, &analysis)?,
            }

            if let Some(path) = csv {
                let rows: Vec<_> = ItineraryStats::from_analysis(&analysis)
                    .into_iter()
                    .map(|row| row.with_source(&input.source))
                    .collect();
                append_records(&path, &rows)?;
                info!(path = %path, rows = rows.len(), "CSV rows appended");
            }
        }
        Commands::Summarize { input } => {
            let Some(plan) = load_plan(&input).await? else {
                return Ok(());
            };
            let analysis = analyze_plan(&plan);

            for itinerary in &analysis.itineraries {
                println!(
                    "#{} {} | reused {} | varied {}",
                    itinerary.itinerary_index + 1,
                    format_totals(&itinerary.totals_by_currency),
                    itinerary.summary.reused_products.len(),
                    itinerary.summary.variation_products.len(),
                );
            }
            info!(itineraries = analysis.itineraries.len(), "Summary complete");
        }
    }

    Ok(())
}

/// Reads and parses the plan, returning `None` for blank input.
#[tracing::instrument(skip_all, fields(source = %input.source))]
async fn load_plan(input: &SourceArgs) -> Result<Option<Plan>> {
    let bytes = read_source(&input.source).await?;
    match parse_plan_bytes(&bytes) {
        Ok(Some(plan)) => {
            info!(itineraries = plan.itineraries.len(), "Plan loaded");
            Ok(Some(plan))
        }
        Ok(None) => {
            warn!("Input is empty; paste or pipe an OTP plan response");
            Ok(None)
        }
        Err(e) => {
            error!(error = %e, "Plan parse failed");
            Err(e)
        }
    }
}

/// Loads plan text from stdin, a local file path, or over HTTP.
async fn read_source(source: &str) -> Result<Vec<u8>> {
    if source == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        info!("Fetching plan over HTTP");
        return fetch_bytes(&BasicClient::new(), source).await;
    }

    std::fs::read(source).with_context(|| format!("Failed to read '{source}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "otp_fare_inspector",
            "analyze",
            "plan.json",
            "--format",
            "json",
            "--csv",
            "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { input, format, csv } => {
                assert_eq!(input.source, "plan.json");
                assert!(matches!(format, OutputFormat::Json));
                assert_eq!(csv.as_deref(), Some("out.csv"));
            }
            Commands::Summarize { .. } => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_parses_summarize_from_stdin() {
        let cli = Cli::try_parse_from(["otp_fare_inspector", "summarize", "-"]).unwrap();
        let Commands::Summarize { input } = cli.command else {
            panic!("expected summarize");
        };
        assert_eq!(input.source, "-");
    }

    #[test]
    fn test_cli_rejects_credential_and_timeout_flags() {
        for flag in ["--api-key", "--timeout"] {
            let result = Cli::try_parse_from(["otp_fare_inspector", "analyze", "plan.json", flag, "1"]);
            assert!(result.is_err(), "{flag}");
        }
    }

    #[tokio::test]
    async fn test_read_source_from_file() {
        let path = format!("{}/otp_fare_inspector_cli_source.json", std::env::temp_dir().display());
        std::fs::write(&path, r#"{"plan":{"itineraries":[]}}"#).unwrap();

        let input = SourceArgs { source: path.clone() };
        let plan = load_plan(&input).await.unwrap();
        assert_eq!(plan, Some(Plan::default()));

        std::fs::remove_file(&path).unwrap();
    }
}
