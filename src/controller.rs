//! Chat controller
//!
//! Owns the transcript and the processing state, and turns each submitted
//! line into transcript entries. At most one agent runs at a time: a
//! submission made while an agent is working is refused with
//! [`TurnOutcome::Busy`] and leaves the transcript untouched.
//!
//! Locks are never held across an `.await`. The processing state is reset by
//! a guard, so it returns to [`ProcessingState::Idle`] on every exit path,
//! including when the `submit` future is dropped mid-flight.

use crate::config::ConfigError;
use crate::error::{ErrorKind, HubResult};
use crate::registry::AgentRegistry;
use crate::render::welcome_text;
use crate::routing::{FallbackPolicy, MessageRouter, RouteDecision, MENTION_USAGE_HINT};
use crate::transcript::{ChatMessage, MessageContent, Sender, Transcript};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

const NOTIFICATION_CAPACITY: usize = 16;

pub const WORKING_SETTLED_OK: &str = "Processing complete. Here's the result:";
pub const WORKING_SETTLED_ERROR: &str = "Error processing task.";
pub const WORKING_SETTLED_CANCELLED: &str = "Task cancelled.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingState {
    Idle,
    /// An agent with this tag is working
    Awaiting(String),
}

/// What a call to [`ChatController::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing appended
    Ignored,
    /// Another task is in progress; nothing appended
    Busy,
    /// Unknown tag or no mention; a system message explains why
    Unrouted,
    Completed { tag: String },
    Failed { tag: String, kind: ErrorKind },
}

/// Transient alert for a failed task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

pub struct ChatController {
    router: MessageRouter,
    hub_name: String,
    transcript: Mutex<Transcript>,
    state: Mutex<ProcessingState>,
    notifications: broadcast::Sender<Notification>,
}

/// Resets the processing state when dropped, and settles a working message
/// that was left in progress
struct ProcessingGuard<'a> {
    controller: &'a ChatController,
    working: Option<Uuid>,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.working {
            if self
                .controller
                .lock_transcript()
                .settle(id, WORKING_SETTLED_CANCELLED)
            {
                warn!("Agent task dropped before completion");
            }
        }
        *self.controller.lock_state() = ProcessingState::Idle;
    }
}

impl ChatController {
    /// Create a controller and append the welcome message.
    ///
    /// Fails if the fallback policy names an agent that is not registered.
    pub fn new(router: MessageRouter, hub_name: impl Into<String>) -> HubResult<Self> {
        if let FallbackPolicy::DefaultAgent(tag) = router.fallback() {
            if !router.registry().contains(tag) {
                return Err(ConfigError::InvalidConfig(format!(
                    "default agent {tag} is not registered"
                ))
                .into());
            }
        }

        let hub_name = hub_name.into();
        let mut transcript = Transcript::new();
        transcript.append(
            Sender::System,
            MessageContent::text(welcome_text(&hub_name, &router.registry().agents())),
        );

        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Ok(Self {
            router,
            hub_name,
            transcript: Mutex::new(transcript),
            state: Mutex::new(ProcessingState::Idle),
            notifications,
        })
    }

    pub fn hub_name(&self) -> &str {
        &self.hub_name
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        self.router.registry()
    }

    pub fn state(&self) -> ProcessingState {
        self.lock_state().clone()
    }

    /// Snapshot of the whole transcript
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock_transcript().messages().to_vec()
    }

    /// Messages appended after the first `start`
    pub fn messages_since(&self, start: usize) -> Vec<ChatMessage> {
        self.lock_transcript().since(start).to_vec()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// The working message `submit` would show for `raw`, or `None` when `raw`
    /// would not start an agent. Lets a caller show progress before awaiting.
    pub fn working_notice(&self, raw: &str) -> Option<String> {
        if *self.lock_state() != ProcessingState::Idle {
            return None;
        }
        match self.router.route(raw) {
            RouteDecision::Agent { tag, .. } => self
                .router
                .registry()
                .lookup(&tag)
                .map(|handler| working_text(&handler.descriptor().name)),
            _ => None,
        }
    }

    /// Route one line of user input and run the chosen agent
    pub async fn submit(&self, raw: &str) -> TurnOutcome {
        let span = crate::route_span!(input_len = raw.len());
        let decision = span.in_scope(|| self.router.route(raw));

        if decision == RouteDecision::Empty {
            return TurnOutcome::Ignored;
        }

        let mut guard = {
            let mut state = self.lock_state();
            if let ProcessingState::Awaiting(tag) = &*state {
                info!(busy_with = %tag, "Submission refused while an agent is working");
                return TurnOutcome::Busy;
            }
            match &decision {
                RouteDecision::Agent { tag, .. } => {
                    *state = ProcessingState::Awaiting(tag.clone());
                    Some(ProcessingGuard {
                        controller: self,
                        working: None,
                    })
                }
                _ => None,
            }
        };

        self.append(Sender::User, MessageContent::text(raw.trim()));

        match (decision, guard.as_mut()) {
            (RouteDecision::Agent { tag, task }, Some(guard)) => {
                self.run_agent(guard, tag, task).await
            }
            (RouteDecision::UnknownAgent { tag }, _) => {
                self.append(Sender::System, MessageContent::text(not_found(&tag)));
                TurnOutcome::Unrouted
            }
            _ => {
                self.append(Sender::System, MessageContent::text(MENTION_USAGE_HINT));
                TurnOutcome::Unrouted
            }
        }
    }

    async fn run_agent(
        &self,
        guard: &mut ProcessingGuard<'_>,
        tag: String,
        task: String,
    ) -> TurnOutcome {
        let Some(handler) = self.router.registry().lookup(&tag) else {
            self.append(Sender::System, MessageContent::text(not_found(&tag)));
            return TurnOutcome::Unrouted;
        };
        let descriptor = handler.descriptor().clone();
        let sender = Sender::Agent {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
        };

        let working_id = self
            .lock_transcript()
            .append_working(sender.clone(), working_text(&descriptor.name));
        guard.working = Some(working_id);

        let span = crate::agent_span!(tag = %tag, agent = %descriptor.id);
        let result = handler.invoke(&task).instrument(span).await;

        match result {
            Ok(output) => {
                {
                    let mut transcript = self.lock_transcript();
                    transcript.settle(working_id, WORKING_SETTLED_OK);
                    transcript.append(sender, MessageContent::Output { output });
                }
                info!(tag = %tag, "Agent task completed");
                TurnOutcome::Completed { tag }
            }
            Err(error) => {
                let kind = error.kind();
                let message = error.user_message();
                warn!(tag = %tag, ?kind, error = %message, "Agent task failed");

                let hint = descriptor
                    .input_hint
                    .as_ref()
                    .map(|hint| format!("Please check the input format: {} {}", tag, hint));
                {
                    let mut transcript = self.lock_transcript();
                    transcript.settle(working_id, WORKING_SETTLED_ERROR);
                    transcript.append(
                        sender,
                        MessageContent::Error {
                            message: message.clone(),
                            hint,
                        },
                    );
                }

                // Nobody listening is fine
                let _ = self.notifications.send(Notification {
                    title: format!("Error with {}", descriptor.name),
                    description: message,
                });
                TurnOutcome::Failed { tag, kind }
            }
        }
    }

    fn append(&self, sender: Sender, content: MessageContent) -> Uuid {
        self.lock_transcript().append(sender, content)
    }

    fn lock_transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_state(&self) -> MutexGuard<'_, ProcessingState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn working_text(agent_name: &str) -> String {
    format!("Understood! Working on task for {agent_name}...")
}

fn not_found(tag: &str) -> String {
    format!("Agent with mention tag \"{tag}\" not found.")
}
