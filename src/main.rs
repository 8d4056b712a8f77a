//! Papago clipboard launcher
//!
//! Entry point: parses the window flags, sets up logging and runs one
//! launcher invocation.

use clap::{ArgAction, Parser};
use papago_core::{launch, BrowserShell, LaunchConfig, LaunchOutcome, SystemClipboard};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "papago")]
#[command(about = "Open the clipboard text in the Papago translator", long_about = None)]
#[command(version)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Window width
    #[arg(short = 'w', long, env = "PAPAGO_WIDTH", default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Window height
    #[arg(short = 'h', long, env = "PAPAGO_HEIGHT", default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Language of the clipboard text
    #[arg(long, default_value = "auto")]
    source_lang: String,

    /// Language to translate into
    #[arg(long, default_value = "vi")]
    target_lang: String,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn into_config(self) -> LaunchConfig {
        LaunchConfig {
            width: self.width,
            height: self.height,
            source_lang: self.source_lang,
            target_lang: self.target_lang,
            ..LaunchConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Papago launcher v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = cli.into_config();
    let mut shell = BrowserShell::new();

    match launch(&config, &SystemClipboard::new(), &mut shell).await {
        Ok(LaunchOutcome::Navigated { url }) => debug!("Finished showing {}", url),
        Ok(outcome) => debug!("Launch ended early: {:?}", outcome),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
