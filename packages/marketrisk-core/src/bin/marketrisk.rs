//! Market risk CLI - Command line interface for risk analysis.
//!
//! Output is a JSON envelope on stdout; logs go to stderr.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use marketrisk_core::{analyze, parse_symbols, AnalysisConfig, ApiResponse, JsonFileProvider};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "marketrisk")]
#[command(about = "Market risk CLI - volatility, VaR, drawdown and correlation")]
#[command(version)]
struct Cli {
    /// Config file (defaults to MARKETRISK_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a risk analysis over a price file
    Analyze {
        /// JSON file mapping symbol -> date -> close
        #[arg(short, long)]
        prices: PathBuf,
        /// Symbols to analyze (comma-separated)
        #[arg(short = 'y', long)]
        symbols: Option<String>,
        /// First date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// End date, exclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<NaiveDate>,
        /// Confidence level for VaR (0.95 = 95%)
        #[arg(short, long)]
        confidence: Option<f64>,
        /// Rolling volatility window in trading days
        #[arg(short, long)]
        window: Option<usize>,
        /// Print only the risk summary
        #[arg(long)]
        summary: bool,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let (output, ok) = match run(cli) {
        Ok(output) => (output, true),
        Err(e) => {
            tracing::error!("{:#}", e);
            (
                render(&ApiResponse::<()>::err(format!("{:#}", e)))
                    .unwrap_or_else(|_| format!("{{\"ok\":false,\"error\":{:?}}}", e.to_string())),
                false,
            )
        }
    };

    println!("{}", output);
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let config_path = cli.config.unwrap_or_else(AnalysisConfig::default_path);

    match cli.command {
        Commands::Analyze {
            prices,
            symbols,
            start,
            end,
            confidence,
            window,
            summary,
        } => {
            let mut config = AnalysisConfig::load_or_default(&config_path)?;
            if let Some(symbols) = symbols {
                config.symbols = parse_symbols(&symbols);
            }
            if let Some(start) = start {
                config.start = start;
            }
            if let Some(end) = end {
                config.end = end;
            }
            if let Some(confidence) = confidence {
                config.confidence = confidence;
            }
            if let Some(window) = window {
                config.window = window;
            }

            let provider = JsonFileProvider::open(&prices)?;
            let report = analyze(&config, &provider)?;

            if summary {
                render(&ApiResponse::ok(json!({
                    "symbols": report.symbols,
                    "start": report.start,
                    "end": report.end,
                    "risk": report.risk,
                    "max_drawdown": report.max_drawdown,
                    "period_return": report.period_return,
                })))
            } else {
                render(&ApiResponse::ok(report))
            }
        }
        Commands::Config => {
            let config = AnalysisConfig::load_or_default(&config_path)?;
            render(&ApiResponse::ok(json!({
                "path": config_path,
                "exists": config_path.exists(),
                "config": config,
            })))
        }
    }
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}
