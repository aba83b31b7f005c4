//! The Telegram Bot API transport.
//!
//! Long-polls `getUpdates` and classifies each inbound message into an
//! [`InboundEvent`]; replies go out through [`TelegramClient::send_message`].

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::sleep;

const API_BASE: &str = "https://api.telegram.org";

/// How long the server may hold a `getUpdates` call open.
const POLL_TIMEOUT_SECS: u32 = 30;

/// How long to back off after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// An inbound transport event, tagged with the originating chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub kind: EventKind,
}

/// What the user asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Session start (`/start`).
    Start,
    /// Explicit history reset (`/clear`).
    Clear,
    /// Capability listing (`/help`).
    Help,
    /// A generic text message.
    Text(String),
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    update_id: i64,
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u32,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct BotCommand {
    command: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct SetMyCommandsRequest {
    commands: [BotCommand; 3],
}

/// A thin client for the Bot API methods this bot uses.
pub struct TelegramClient {
    token: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    /// Sends a plain-text reply to a chat.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        let resp: ApiResponse<serde_json::Value> = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await?
            .json()
            .await?;
        check_ok(resp.ok, resp.description, "sendMessage")
    }

    /// Registers the bot's command menu.
    pub async fn set_my_commands(&self) -> Result<(), TransportError> {
        let commands = SetMyCommandsRequest {
            commands: [
                BotCommand {
                    command: "start",
                    description: "Start a new conversation",
                },
                BotCommand {
                    command: "help",
                    description: "Show help information",
                },
                BotCommand {
                    command: "clear",
                    description: "Clear conversation history",
                },
            ],
        };
        let resp: ApiResponse<serde_json::Value> = self
            .client
            .post(self.api_url("setMyCommands"))
            .json(&commands)
            .send()
            .await?
            .json()
            .await?;
        check_ok(resp.ok, resp.description, "setMyCommands")
    }

    async fn get_updates(
        &self,
        offset: i64,
    ) -> Result<Vec<Update>, TransportError> {
        let resp: ApiResponse<Vec<Update>> = self
            .client
            .post(self.api_url("getUpdates"))
            .json(&GetUpdatesRequest {
                offset,
                timeout: POLL_TIMEOUT_SECS,
                allowed_updates: ["message"],
            })
            .send()
            .await?
            .json()
            .await?;
        check_ok(resp.ok, resp.description, "getUpdates")?;
        Ok(resp.result.unwrap_or_default())
    }

    /// Long-polls for updates forever, feeding inbound events into `tx`.
    ///
    /// Poll failures are logged and retried after a short delay; the
    /// loop only ends when the receiving side goes away.
    pub async fn listen(&self, tx: mpsc::UnboundedSender<InboundEvent>) {
        let mut offset: i64 = 0;

        info!("listening for messages");
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(err) => {
                    warn!("poll error: {err}");
                    sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(event) = classify_update(update) else {
                    continue;
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
    }
}

fn check_ok(
    ok: bool,
    description: Option<String>,
    method: &str,
) -> Result<(), TransportError> {
    if ok {
        return Ok(());
    }
    Err(TransportError {
        message: format!(
            "{method} failed: {}",
            description.as_deref().unwrap_or("no description")
        ),
    })
}

/// Turns a raw update into an event, skipping non-text updates.
fn classify_update(update: Update) -> Option<InboundEvent> {
    let message = update.message?;
    let text = message.text?;
    Some(InboundEvent {
        chat_id: message.chat.id,
        kind: classify_text(&text),
    })
}

fn classify_text(text: &str) -> EventKind {
    let trimmed = text.trim();
    if let Some(command) = trimmed.strip_prefix('/') {
        // Commands can be addressed as `/start@botname` in groups.
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or("")
            .split('@')
            .next()
            .unwrap_or("");
        match name {
            "start" => return EventKind::Start,
            "clear" => return EventKind::Clear,
            "help" => return EventKind::Help,
            // Unknown commands fall through to the agent as plain text.
            _ => {}
        }
    }
    EventKind::Text(trimmed.to_owned())
}

/// An error from the Bot API or the HTTP layer beneath it.
#[derive(Debug)]
pub struct TransportError {
    message: String,
}

impl Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError {
            message: format!("{err}"),
        }
    }
}
