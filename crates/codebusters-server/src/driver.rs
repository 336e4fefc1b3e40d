//! Bot driver.
//!
//! Ties together the command parser, the puzzle registry and the quote store.
//! The driver performs no I/O of its own: every call returns the actions the
//! runtime should carry out, so the same driver runs under the console
//! runtime, a chat gateway or a test.

use codebusters_core::{CipherLetter, Environment, PlainLetter, Puzzle, PuzzleRegistry, UserId};

use crate::{
    command::Command,
    error::CommandError,
    quotes::QuoteStore,
    render::PuzzleView,
};

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Prefix that marks a message as a command
    pub command_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self { command_prefix: "!".to_string() }
    }
}

/// Why a session left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every letter was revealed or the phrase was solved outright
    Solved,
    /// The user asked for the answer
    Answered,
    /// A new puzzle replaced an unfinished one
    Abandoned,
}

/// Something to tell a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Current state of the user's puzzle
    Puzzle(PuzzleView),
    /// The puzzle is solved and the session is over
    Solved,
    /// The guessed pair is not part of the mapping
    IncorrectGuess {
        /// Cipher side of the guess
        cipher: CipherLetter,
        /// Plain side of the guess
        plain: PlainLetter,
    },
    /// Undo for a letter that had no guess
    NoGuessFound {
        /// Letter named in the undo
        cipher: CipherLetter,
    },
    /// A whole-phrase attempt did not match
    SolveMismatch,
    /// A letter was revealed
    Hint {
        /// Revealed cipher letter
        cipher: CipherLetter,
        /// Its plaintext letter
        plain: PlainLetter,
    },
    /// Hint requested for a puzzle that is already solved
    AlreadySolved,
    /// Hint requested but no letter is left to reveal
    NothingToHint,
    /// The plaintext, shown when the user gives up
    Answer {
        /// Lowercased phrase
        plaintext: String,
    },
    /// A quote was stored
    QuoteAdded,
    /// Command list
    Help,
    /// The user has no session
    NoActivePuzzle,
    /// The quote store is empty
    NoQuotes,
    /// A letter argument was malformed
    InvalidGuessFormat {
        /// Argument as typed
        token: String,
    },
    /// The command name is not known
    UnknownCommand {
        /// Name as typed, without prefix
        name: String,
    },
    /// A required argument was missing
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Missing argument placeholder
        argument: &'static str,
    },
    /// The quote store could not be read or written
    StorageFailure,
}

impl From<&CommandError> for Reply {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::NoActivePuzzle => Self::NoActivePuzzle,
            CommandError::InvalidGuessFormat { token } => {
                Self::InvalidGuessFormat { token: token.clone() }
            },
            CommandError::EmptyQuoteStore => Self::NoQuotes,
            CommandError::UnknownCommand(name) => Self::UnknownCommand { name: name.clone() },
            CommandError::MissingArgument { command, argument } => {
                Self::MissingArgument { command: *command, argument: *argument }
            },
            CommandError::Storage(_) => Self::StorageFailure,
        }
    }
}

/// Actions that the driver produces.
///
/// These are executed by the runtime (console, chat gateway or test).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    /// Send a reply to a user
    Reply {
        /// Recipient
        user_id: UserId,
        /// What to say
        reply: Reply,
    },

    /// A user's session left the registry
    SessionEnded {
        /// Owner of the session
        user_id: UserId,
        /// How it ended
        reason: SessionEnd,
    },
}

/// Action-based bot driver.
///
/// Methods take `&self`: all shared state lives in the registry and the quote
/// store, both of which synchronize internally, so one driver may serve many
/// users from many tasks.
#[derive(Clone)]
pub struct BotDriver<E, S>
where
    E: Environment,
    S: QuoteStore,
{
    /// Active puzzles, one per user
    registry: PuzzleRegistry,
    /// Phrases to draw puzzles from
    quotes: S,
    /// Randomness for ciphers, hints and quote picks
    env: E,
    /// Driver configuration
    config: BotConfig,
}

impl<E, S> BotDriver<E, S>
where
    E: Environment,
    S: QuoteStore,
{
    /// Create a driver with an empty registry.
    pub fn new(env: E, quotes: S, config: BotConfig) -> Self {
        Self { registry: PuzzleRegistry::new(), quotes, env, config }
    }

    /// Active sessions.
    pub fn registry(&self) -> &PuzzleRegistry {
        &self.registry
    }

    /// Backing quote store.
    pub fn quotes(&self) -> &S {
        &self.quotes
    }

    /// Driver configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Parse and run one chat message.
    ///
    /// Messages without the command prefix produce no actions. Errors become
    /// replies to the sender, so this never fails.
    pub fn process_line(&self, user: &UserId, line: &str) -> Vec<BotAction> {
        let result = Command::parse(line, &self.config.command_prefix)
            .and_then(|command| match command {
                Some(command) => self.process(user, command),
                None => Ok(Vec::new()),
            });

        result.unwrap_or_else(|err| {
            match &err {
                CommandError::Storage(cause) => {
                    tracing::warn!(%user, error = %cause, "quote store failure");
                },
                other => tracing::debug!(%user, error = %other, "command rejected"),
            }
            vec![reply(user, Reply::from(&err))]
        })
    }

    /// Run a parsed command for `user` and return actions to execute.
    ///
    /// This is the main entry point for the driver.
    pub fn process(&self, user: &UserId, command: Command) -> Result<Vec<BotAction>, CommandError> {
        tracing::debug!(%user, command = command.name(), "processing command");

        match command {
            Command::NewPuzzle => self.handle_new_puzzle(user),
            Command::Guess { cipher, plain } => self.handle_guess(user, cipher, plain),
            Command::Undo { cipher } => self.handle_undo(user, cipher),
            Command::Clear => self.handle_clear(user),
            Command::Solve { text } => self.handle_solve(user, &text),
            Command::Hint => self.handle_hint(user),
            Command::Answer => self.handle_answer(user),
            Command::AddQuote { quote } => self.handle_add_quote(user, quote),
            Command::Help => Ok(vec![reply(user, Reply::Help)]),
        }
    }

    fn handle_new_puzzle(&self, user: &UserId) -> Result<Vec<BotAction>, CommandError> {
        let quote = self.quotes.pick_random(&self.env)?.ok_or(CommandError::EmptyQuoteStore)?;

        let puzzle = Puzzle::new(&quote, &self.env);
        let view = PuzzleView::of(&puzzle);

        let mut actions = Vec::new();
        if self.registry.insert(user.clone(), puzzle).is_some() {
            actions.push(BotAction::SessionEnded {
                user_id: user.clone(),
                reason: SessionEnd::Abandoned,
            });
        }
        actions.push(reply(user, Reply::Puzzle(view)));

        Ok(actions)
    }

    fn handle_guess(
        &self,
        user: &UserId,
        cipher: CipherLetter,
        plain: PlainLetter,
    ) -> Result<Vec<BotAction>, CommandError> {
        let (correct, solved, view) = self
            .registry
            .with_puzzle_mut(user, |puzzle| {
                let correct = puzzle.make_guess(cipher, plain);
                (correct, puzzle.is_solved(), PuzzleView::of(puzzle))
            })
            .ok_or(CommandError::NoActivePuzzle)?;

        if !correct {
            return Ok(vec![reply(user, Reply::IncorrectGuess { cipher, plain })]);
        }
        if solved {
            return Ok(self.finish_solved(user, Vec::new(), Puzzle::is_solved));
        }
        Ok(vec![reply(user, Reply::Puzzle(view))])
    }

    fn handle_undo(
        &self,
        user: &UserId,
        cipher: CipherLetter,
    ) -> Result<Vec<BotAction>, CommandError> {
        let (removed, view) = self
            .registry
            .with_puzzle_mut(user, |puzzle| (puzzle.undo_guess(cipher), PuzzleView::of(puzzle)))
            .ok_or(CommandError::NoActivePuzzle)?;

        let response = if removed { Reply::Puzzle(view) } else { Reply::NoGuessFound { cipher } };
        Ok(vec![reply(user, response)])
    }

    fn handle_clear(&self, user: &UserId) -> Result<Vec<BotAction>, CommandError> {
        let view = self
            .registry
            .with_puzzle_mut(user, |puzzle| {
                puzzle.clear_guesses();
                PuzzleView::of(puzzle)
            })
            .ok_or(CommandError::NoActivePuzzle)?;

        Ok(vec![reply(user, Reply::Puzzle(view))])
    }

    fn handle_solve(&self, user: &UserId, text: &str) -> Result<Vec<BotAction>, CommandError> {
        let matched = self
            .registry
            .with_puzzle(user, |puzzle| puzzle.solve_attempt(text))
            .ok_or(CommandError::NoActivePuzzle)?;

        if !matched {
            return Ok(vec![reply(user, Reply::SolveMismatch)]);
        }
        Ok(self.finish_solved(user, Vec::new(), |puzzle| puzzle.solve_attempt(text)))
    }

    fn handle_hint(&self, user: &UserId) -> Result<Vec<BotAction>, CommandError> {
        let (hint, solved, view) = self
            .registry
            .with_puzzle_mut(user, |puzzle| {
                let hint = puzzle.give_hint(&self.env);
                (hint, puzzle.is_solved(), PuzzleView::of(puzzle))
            })
            .ok_or(CommandError::NoActivePuzzle)?;

        let Some((cipher, plain)) = hint else {
            let response = if solved { Reply::AlreadySolved } else { Reply::NothingToHint };
            return Ok(vec![reply(user, response)]);
        };

        let hinted = vec![reply(user, Reply::Hint { cipher, plain })];
        if solved {
            return Ok(self.finish_solved(user, hinted, Puzzle::is_solved));
        }

        let mut actions = hinted;
        actions.push(reply(user, Reply::Puzzle(view)));
        Ok(actions)
    }

    fn handle_answer(&self, user: &UserId) -> Result<Vec<BotAction>, CommandError> {
        let puzzle = self.registry.end(user).ok_or(CommandError::NoActivePuzzle)?;

        Ok(vec![
            reply(user, Reply::Answer { plaintext: puzzle.plaintext().to_string() }),
            BotAction::SessionEnded { user_id: user.clone(), reason: SessionEnd::Answered },
        ])
    }

    fn handle_add_quote(
        &self,
        user: &UserId,
        quote: String,
    ) -> Result<Vec<BotAction>, CommandError> {
        self.quotes.append(quote)?;
        tracing::info!(%user, "quote added");

        Ok(vec![reply(user, Reply::QuoteAdded)])
    }

    /// Congratulate the user and end the session if `finished` still holds
    /// for the registered puzzle. Otherwise show the puzzle as it now stands.
    fn finish_solved(
        &self,
        user: &UserId,
        mut actions: Vec<BotAction>,
        finished: impl FnOnce(&Puzzle) -> bool,
    ) -> Vec<BotAction> {
        if self.registry.end_if(user, finished).is_some() {
            tracing::info!(%user, "puzzle solved");
            actions.push(reply(user, Reply::Solved));
            actions.push(BotAction::SessionEnded {
                user_id: user.clone(),
                reason: SessionEnd::Solved,
            });
            return actions;
        }

        let current = self.registry.with_puzzle(user, PuzzleView::of);
        tracing::debug!(%user, active = current.is_some(), "puzzle no longer solved");
        actions.push(reply(user, current.map_or(Reply::NoActivePuzzle, Reply::Puzzle)));
        actions
    }
}

fn reply(user: &UserId, reply: Reply) -> BotAction {
    BotAction::Reply { user_id: user.clone(), reply }
}
