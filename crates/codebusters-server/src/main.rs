//! Codebusters console binary.
//!
//! # Usage
//!
//! ```bash
//! # Play against the default quote file
//! codebusters
//!
//! # Custom quote file and prefix
//! codebusters --quotes my_quotes.json --prefix '?'
//! ```
//!
//! Type commands such as `!newpuzzle` or `!guess Q a`. Prefix a line with
//! `@name` to send it as another user.

use std::path::PathBuf;

use clap::Parser;
use codebusters_server::{BotConfig, RuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Codebusters cipher puzzle bot
#[derive(Parser, Debug)]
#[command(name = "codebusters")]
#[command(about = "Substitution-cipher puzzles, one per user")]
#[command(version)]
struct Args {
    /// Path to the JSON quote database
    #[arg(short, long, default_value = "quotes.json")]
    quotes: PathBuf,

    /// Command prefix
    #[arg(short, long, default_value = "!")]
    prefix: String,

    /// User for lines without an @name address
    #[arg(short, long, default_value = "local")]
    user: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!("Codebusters starting");

    let config = RuntimeConfig {
        quotes_path: args.quotes,
        default_user: args.user.into(),
        bot: BotConfig { command_prefix: args.prefix },
    };

    codebusters_server::run_stdio(config).await?;

    Ok(())
}
