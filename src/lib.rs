pub mod config;
pub mod draw;
pub mod encode;
pub mod load_config;
pub mod process;
pub mod ticket;
pub mod transcode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use encode::DataMatrixEncoder;
use load_config::load_config;
use process::{process, BetResult, ProcessConfig, ProcessReport};

#[derive(Parser)]
#[clap(
    name = "draw-codes",
    version,
    about = "Transcode a lottery draw export into per-bet protocol strings and Data Matrix codes"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one draw export file and report per-bet results
    Process {
        /// Path to the XML draw export
        #[clap(long)]
        input: PathBuf,
        /// Path to the YAML config file (defaults apply when omitted)
        #[clap(long)]
        config: Option<PathBuf>,
        /// Render each generated Data Matrix as Unicode blocks
        #[clap(long)]
        show_codes: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            input,
            config,
            show_codes,
        } => {
            let config = match config {
                Some(path) => load_config(path)?,
                None => ProcessConfig::default(),
            };
            tracing::info!(input = ?input, "Processing draw export");
            let xml = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read draw export {:?}", input))?;

            let encoder = DataMatrixEncoder::new(config.encode.clone());
            println!("Processing draw export...");
            let report = process(&config, &encoder, &xml)
                .await
                .map_err(anyhow::Error::msg)?;
            print_report(&report, show_codes);
            Ok(())
        }
    }
}

/// Presentation for the terminal: ordered data strings, optional code
/// rendering, then the generation summary with per-ordinal failures.
fn print_report(report: &ProcessReport, show_codes: bool) {
    println!(
        "Draw {} (weekday {}, multiplier {})",
        report.local_draw_date_time, report.weekday, report.multiplier
    );

    for (ordinal, data) in report.aggregated_data() {
        println!("Ordinal {}: {}", ordinal, data);
    }

    if show_codes {
        for bet in &report.bets {
            if let BetResult::Encoded { image, .. } = &bet.result {
                println!("Ordinal {}:", bet.ordinal);
                println!("{}", image.unicode);
            }
        }
    }

    println!("Data Matrix generation results:");
    println!(
        "- Successful: {}/{}",
        report.encoded,
        report.encoded + report.failed
    );
    if report.skipped > 0 {
        println!("- Skipped: {}", report.skipped);
        for bet in &report.bets {
            if let BetResult::Skipped { reason } = &bet.result {
                println!("  - Ordinal {}: {:?}", bet.ordinal, reason);
            }
        }
    }
    if report.failed > 0 {
        println!("- Errors: {}", report.failed);
        for bet in &report.bets {
            if let BetResult::EncodeFailed { error, .. } = &bet.result {
                println!("  - Ordinal {}: {}", bet.ordinal, error);
            }
        }
    }
}
