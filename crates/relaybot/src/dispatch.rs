//! Per-user event dispatch.
//!
//! Every chat gets its own worker task fed by an unbounded channel, so
//! events from one user are handled strictly in arrival order even when
//! they overlap in time; a user sending two messages before the first
//! reply arrives can never interleave on their own history. Different
//! users' workers run concurrently and never contend beyond the short
//! store lock, which is only held for store operations, never across a
//! network call.

use std::collections::HashMap;
use std::sync::Arc;

use relaybot_core::conversation::{ConversationStore, Turn};
use relaybot_core::{Agent, prompt};
use tokio::sync::{Mutex, mpsc};

use crate::messages;
use crate::telegram::{EventKind, InboundEvent, TelegramClient};

/// Routes inbound events to per-chat workers.
pub struct Dispatcher {
    workers: HashMap<i64, mpsc::UnboundedSender<EventKind>>,
    shared: Arc<Shared>,
}

struct Shared {
    agent: Agent,
    telegram: Arc<TelegramClient>,
    store: Mutex<ConversationStore>,
}

impl Dispatcher {
    pub fn new(agent: Agent, telegram: Arc<TelegramClient>) -> Self {
        Self {
            workers: HashMap::new(),
            shared: Arc::new(Shared {
                agent,
                telegram,
                store: Mutex::new(ConversationStore::new()),
            }),
        }
    }

    /// Routes an event to its chat's worker, spawning one on first
    /// contact.
    pub fn dispatch(&mut self, event: InboundEvent) {
        let InboundEvent { chat_id, kind } = event;
        let tx = self
            .workers
            .entry(chat_id)
            .or_insert_with(|| spawn_worker(chat_id, &self.shared));
        if let Err(unsent) = tx.send(kind) {
            // The worker is gone (it can only die by panicking); start
            // a fresh one and replay the event.
            warn!("worker for chat {chat_id} is gone, respawning");
            let tx = spawn_worker(chat_id, &self.shared);
            tx.send(unsent.0).ok();
            self.workers.insert(chat_id, tx);
        }
    }
}

fn spawn_worker(
    chat_id: i64,
    shared: &Arc<Shared>,
) -> mpsc::UnboundedSender<EventKind> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        // The store is keyed by the decimal string form of the chat id.
        let user_id = chat_id.to_string();
        while let Some(kind) = rx.recv().await {
            handle_event(chat_id, &user_id, kind, &shared).await;
        }
    });
    tx
}

async fn handle_event(
    chat_id: i64,
    user_id: &str,
    kind: EventKind,
    shared: &Shared,
) {
    match kind {
        EventKind::Start => {
            shared.store.lock().await.reset(user_id);
            send(shared, chat_id, messages::GREETING).await;
        }
        EventKind::Clear => {
            shared.store.lock().await.reset(user_id);
            send(shared, chat_id, messages::CLEAR_ACK).await;
        }
        EventKind::Help => {
            send(shared, chat_id, messages::HELP).await;
        }
        EventKind::Text(text) => {
            info!("received message from {user_id}: {text}");

            let assembled = {
                let mut store = shared.store.lock().await;
                store.append(user_id, Turn::user(text));
                prompt::assemble(store.get(user_id))
            };

            match shared.agent.prompt(&assembled).await {
                Ok(response) => {
                    info!("generated response for {user_id}: {response}");
                    shared
                        .store
                        .lock()
                        .await
                        .append(user_id, Turn::assistant(response.clone()));
                    send(shared, chat_id, &response).await;
                }
                Err(err) => {
                    error!("error generating response for {user_id}: {err}");
                    send(shared, chat_id, messages::GENERIC_ERROR).await;
                }
            }
        }
    }
}

async fn send(shared: &Shared, chat_id: i64, text: &str) {
    if let Err(err) = shared.telegram.send_message(chat_id, text).await {
        error!("failed to send reply to chat {chat_id}: {err}");
    }
}
