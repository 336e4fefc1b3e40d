//! Console runtime.
//!
//! Executes driver actions against a line-oriented stream pair, normally stdin
//! and stdout. Each input line is one chat message. A line of the form
//! `@name message` is sent as user `name`, which lets one terminal play
//! several users; any other line is sent as the default user.

use codebusters_core::{Environment, UserId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    driver::{BotAction, BotDriver},
    error::ServerError,
    quotes::QuoteStore,
    render::Presenter,
};

/// Line-oriented runtime around a [`BotDriver`].
pub struct Console<E, S>
where
    E: Environment,
    S: QuoteStore,
{
    driver: BotDriver<E, S>,
    presenter: Presenter,
    default_user: UserId,
}

impl<E, S> Console<E, S>
where
    E: Environment,
    S: QuoteStore,
{
    /// Wrap `driver`; unaddressed lines are sent as `default_user`.
    pub fn new(driver: BotDriver<E, S>, default_user: UserId) -> Self {
        let presenter = Presenter::new(driver.config().command_prefix.clone());
        Self { driver, presenter, default_user }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &BotDriver<E, S> {
        &self.driver
    }

    /// Process lines from `input` until end of stream, writing rendered
    /// replies to `output`.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            let (user, message) = route(&line, &self.default_user);

            for action in self.driver.process_line(&user, message) {
                match action {
                    BotAction::Reply { user_id, reply } => {
                        let text = self.presenter.render(&reply);
                        output.write_all(format!("[{user_id}]\n{text}\n\n").as_bytes()).await?;
                    },
                    BotAction::SessionEnded { user_id, reason } => {
                        tracing::info!(user = %user_id, ?reason, "session ended");
                    },
                }
            }
            output.flush().await?;
        }

        tracing::info!("input closed, console stopping");
        Ok(())
    }
}

/// Split an `@name message` line into its sender and message.
fn route<'a>(line: &'a str, default_user: &UserId) -> (UserId, &'a str) {
    if let Some(addressed) = line.strip_prefix('@') {
        let (name, message) = addressed.split_once(char::is_whitespace).unwrap_or((addressed, ""));
        if !name.is_empty() {
            return (UserId::from(name), message.trim_start());
        }
    }
    (default_user.clone(), line)
}
