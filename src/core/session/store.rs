//! Session Store: sole owner of the transcript and of the in-flight run slot.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{AgentStep, Message, MessagePatch, generate_id};

const EVENT_CAPACITY: usize = 256;

/// Change notifications for renderers and streaming endpoints.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MessageAppended(Message),
    StepUpserted { message_id: String, step: AgentStep },
    MessageUpdated(Message),
    RunStarted { run_id: String },
    RunFinished { run_id: String },
}

struct ActiveRun {
    run_id: String,
    cancel: CancellationToken,
}

#[derive(Default)]
struct SessionState {
    messages: Vec<Message>,
    active_run: Option<ActiveRun>,
}

/// Cheap to clone; all clones share one transcript.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            events,
        }
    }

    /// A fresh interactive session, opened by the welcome message.
    pub fn with_welcome() -> Self {
        let store = Self::new();
        store.append_message(Message::welcome());
        store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn append_message(&self, message: Message) {
        self.state.lock().messages.push(message.clone());
        self.publish(SessionEvent::MessageAppended(message));
    }

    /// Applies `patch` to the message with `id`. Returns the updated message,
    /// or `None` when no such message exists.
    pub fn update_message(&self, id: &str, patch: MessagePatch) -> Option<Message> {
        let updated = {
            let mut state = self.state.lock();
            let msg = state.messages.iter_mut().find(|m| m.id == id)?;
            if let Some(content) = patch.content {
                msg.content = content;
            }
            if let Some(thinking) = patch.is_thinking {
                msg.is_thinking = thinking;
            }
            msg.clone()
        };
        self.publish(SessionEvent::MessageUpdated(updated.clone()));
        Some(updated)
    }

    /// Settles a message whose run stopped without finishing it: every
    /// non-terminal step becomes `failed` with `note`, then `content` is
    /// written and the thinking flag cleared, all under one lock.
    pub fn abandon_message(&self, id: &str, content: &str, note: &str) -> Option<Message> {
        let (failed, updated) = {
            let mut state = self.state.lock();
            let msg = state.messages.iter_mut().find(|m| m.id == id)?;
            let failed: Vec<AgentStep> = msg
                .steps
                .steps()
                .iter()
                .filter(|s| !s.status.is_terminal())
                .map(|s| s.failed(note, None))
                .collect();
            for step in &failed {
                msg.steps.upsert(step.clone());
            }
            msg.content = content.to_string();
            msg.is_thinking = false;
            (failed, msg.clone())
        };
        warn!(
            "Message {} abandoned with {} unfinished step(s)",
            id,
            failed.len()
        );
        for step in failed {
            self.publish(SessionEvent::StepUpserted {
                message_id: id.to_string(),
                step,
            });
        }
        self.publish(SessionEvent::MessageUpdated(updated.clone()));
        Some(updated)
    }

    /// Folds `step` into the ledger of message `message_id`.
    pub fn upsert_step(&self, message_id: &str, step: AgentStep) -> bool {
        {
            let mut state = self.state.lock();
            let Some(msg) = state.messages.iter_mut().find(|m| m.id == message_id) else {
                warn!("Dropping step [{}] for unknown message {}", step.id, message_id);
                return false;
            };
            msg.steps.upsert(step.clone());
        }
        debug!(
            "Step [{}] {} {}: {}",
            step.id,
            step.agent_kind.as_str(),
            step.status.as_str(),
            step.description
        );
        self.publish(SessionEvent::StepUpserted {
            message_id: message_id.to_string(),
            step,
        });
        true
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages.clone()
    }

    pub fn message(&self, id: &str) -> Option<Message> {
        self.state.lock().messages.iter().find(|m| m.id == id).cloned()
    }

    pub fn is_thinking(&self) -> bool {
        self.state.lock().active_run.is_some()
    }

    /// Claims the single in-flight slot. `None` while another run holds it.
    pub fn try_begin_run(&self) -> Option<RunGuard> {
        let run_id = generate_id();
        let cancel = CancellationToken::new();
        {
            let mut state = self.state.lock();
            if state.active_run.is_some() {
                return None;
            }
            state.active_run = Some(ActiveRun {
                run_id: run_id.clone(),
                cancel: cancel.clone(),
            });
        }
        info!("Run {} started", run_id);
        self.publish(SessionEvent::RunStarted {
            run_id: run_id.clone(),
        });
        Some(RunGuard {
            store: self.clone(),
            run_id,
            cancel,
        })
    }

    /// Trips the cancellation token of the in-flight run, if any.
    pub fn cancel_run(&self) -> bool {
        let state = self.state.lock();
        match state.active_run.as_ref() {
            Some(run) => {
                warn!("Cancellation requested for run {}", run.run_id);
                run.cancel.cancel();
                true
            }
            None => false,
        }
    }

    fn finish_run(&self, run_id: &str) {
        {
            let mut state = self.state.lock();
            match state.active_run.as_ref() {
                Some(run) if run.run_id == run_id => state.active_run = None,
                _ => return,
            }
        }
        info!("Run {} finished", run_id);
        self.publish(SessionEvent::RunFinished {
            run_id: run_id.to_string(),
        });
    }
}

/// Holds the in-flight slot; dropping it releases the slot on every exit path.
pub struct RunGuard {
    store: SessionStore,
    run_id: String,
    cancel: CancellationToken,
}

impl RunGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.store.finish_run(&self.run_id);
    }
}
