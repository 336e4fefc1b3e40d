//! Error types for the command layer and the console runtime.

use thiserror::Error;

use crate::quotes::StorageError;

/// Errors produced while parsing or executing a chat command.
///
/// None of these end the program. The driver renders each one as a reply to
/// the user who sent the command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The user has no session in the registry.
    #[error("no active puzzle")]
    NoActivePuzzle,

    /// A letter argument was not a single ASCII letter.
    #[error("invalid letter {token:?}")]
    InvalidGuessFormat {
        /// Offending argument as typed
        token: String,
    },

    /// The quote store holds no quotes, so no puzzle can start.
    #[error("quote store is empty")]
    EmptyQuoteStore,

    /// First word after the prefix is not a known command.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// A required argument was not supplied.
    #[error("{command} requires <{argument}>")]
    MissingArgument {
        /// Command name without prefix
        command: &'static str,
        /// Argument placeholder as shown in help
        argument: &'static str,
    },

    /// Reading or writing the quote store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors that stop the console runtime.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The quote store could not be read at startup.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
