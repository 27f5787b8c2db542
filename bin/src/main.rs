//! barloom CLI - OHLCV bar fetching and ML dataset building.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "barloom")]
#[command(about = "Fetch OHLCV bars and build ML-ready datasets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch bars and write one parquet file per symbol
    Fetch {
        /// Comma-separated tickers (e.g. AAPL,MSFT)
        #[arg(long)]
        symbols: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Bar interval (1min, 5min, 15min, 1h, 1d)
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Keep only regular trading hours (intraday intervals)
        #[arg(long)]
        rth_only: bool,

        /// Output directory
        #[arg(short, long, default_value = "data/raw")]
        out_dir: PathBuf,
    },

    /// Build stacked feature/label artifacts for training
    BuildFeatures {
        /// Comma-separated tickers
        #[arg(long)]
        symbols: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Bar interval to fetch at
        #[arg(short, long, default_value = "1d")]
        base_interval: String,

        /// Comma-separated forward horizons in bars
        #[arg(long, default_value = "20")]
        label_horizons: String,

        /// Keep only regular trading hours (intraday intervals)
        #[arg(long)]
        rth_only: bool,

        /// Output directory
        #[arg(short, long, default_value = "data/processed")]
        out_dir: PathBuf,
    },

    /// Incrementally fetch daily bars into per-symbol tables
    DeltaIngest {
        /// Comma-separated tickers
        #[arg(long)]
        symbols: String,

        /// Start date for new symbols (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today
        #[arg(long)]
        end: Option<String>,

        /// Keep only regular trading hours (intraday intervals)
        #[arg(long)]
        rth_only: bool,

        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Rebuild date-partitioned features from ingested tables
    FeatureUpdate {
        /// Forward horizon in trading days
        #[arg(long, default_value = "126")]
        horizon: usize,

        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Emit matured forward-return labels per date partition
    LabelMature {
        /// Forward horizon in trading days
        #[arg(long, default_value = "126")]
        horizon: usize,

        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Join month-end features with matured labels into a panel
    BuildPanel {
        /// Base data directory
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "data/panel")]
        out: PathBuf,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fetch {
            symbols,
            start,
            end,
            interval,
            rth_only,
            out_dir,
        } => {
            commands::fetch::fetch(&symbols, &start, &end, &interval, rth_only, &out_dir, cli.quiet)
                .await
        }
        Commands::BuildFeatures {
            symbols,
            start,
            end,
            base_interval,
            label_horizons,
            rth_only,
            out_dir,
        } => {
            commands::build_features::build_features(
                &symbols,
                &start,
                &end,
                &base_interval,
                &label_horizons,
                rth_only,
                &out_dir,
                cli.quiet,
            )
            .await
        }
        Commands::DeltaIngest {
            symbols,
            start,
            end,
            rth_only,
            data_dir,
        } => {
            commands::delta_ingest::delta_ingest(
                &symbols,
                start.as_deref(),
                end.as_deref(),
                rth_only,
                &data_dir,
                cli.quiet,
            )
            .await
        }
        Commands::FeatureUpdate { horizon, data_dir } => {
            commands::feature_update::feature_update(horizon, &data_dir, cli.quiet)
        }
        Commands::LabelMature { horizon, data_dir } => {
            commands::label_mature::label_mature(horizon, &data_dir, cli.quiet)
        }
        Commands::BuildPanel { data_dir, out } => {
            commands::build_panel::build_panel(&data_dir, &out, cli.quiet)
        }
    }
}
