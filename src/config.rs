use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Supply-chain order log analysis: key metrics, period series and a
/// three-month trend forecast.
#[derive(Parser, Debug, Clone)]
#[command(name = "supply_report", version, about)]
pub struct Cli {
    /// Order log CSV with a header row.
    pub input: PathBuf,

    /// Directory that receives analysis.json and the forecast CSVs.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Rows shown per console table.
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Print the tables only; write no files.
    #[arg(long)]
    pub no_export: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    // A subscriber may already be set (tests, embedding); keep the existing one.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
