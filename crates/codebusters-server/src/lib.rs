//! Codebusters bot.
//!
//! Production glue around [`codebusters_core`]: a chat-command layer, a quote
//! database and a console runtime.
//!
//! # Architecture
//!
//! [`BotDriver`] follows the Sans-IO pattern. It turns a user's message into a
//! list of [`BotAction`]s without touching a terminal or network. [`Console`]
//! executes those actions over a pair of async byte streams, and
//! [`Presenter`] renders replies as text.
//!
//! # Components
//!
//! - [`Command`]: parsed chat command
//! - [`BotDriver`]: action-based orchestrator (pure logic, no I/O)
//! - [`QuoteStore`]: quote database, in memory or as a JSON file
//! - [`Console`]: line-oriented runtime that executes driver actions
//! - [`SystemEnv`]: production environment (OS RNG)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod driver;
mod error;
pub mod quotes;
mod render;
mod runtime;
mod system_env;

use std::path::PathBuf;

pub use command::Command;
use codebusters_core::UserId;
pub use driver::{BotAction, BotConfig, BotDriver, Reply, SessionEnd};
pub use error::{CommandError, ServerError};
pub use quotes::{JsonQuoteStore, MemoryQuoteStore, QuoteStore, StorageError};
pub use render::{Presenter, PuzzleView};
pub use runtime::Console;
pub use system_env::SystemEnv;

/// Configuration for the console runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// JSON quote file
    pub quotes_path: PathBuf,
    /// User for lines without an `@name` address
    pub default_user: UserId,
    /// Driver configuration (command prefix)
    pub bot: BotConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            quotes_path: PathBuf::from("quotes.json"),
            default_user: UserId::from("local"),
            bot: BotConfig::default(),
        }
    }
}

/// Run the bot on stdin and stdout until stdin closes.
///
/// Uses the OS RNG and the JSON quote file named in `config`.
pub async fn run_stdio(config: RuntimeConfig) -> Result<(), ServerError> {
    if config.bot.command_prefix.trim().is_empty() {
        return Err(ServerError::Config("command prefix must not be empty".to_string()));
    }

    let quotes = JsonQuoteStore::open(&config.quotes_path);
    let count = quotes.len()?;
    tracing::info!(path = %config.quotes_path.display(), count, "quote database loaded");

    let driver = BotDriver::new(SystemEnv::new(), quotes, config.bot);
    let console = Console::new(driver, config.default_user);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console.run(stdin, tokio::io::stdout()).await
}
