//! Chat session engine.
//!
//! `ChatEngine` owns the single live `Session` of a chat widget and is the
//! only way to mutate it. It runs the request lifecycle (one completion call
//! per user turn, serialized by the busy flag), hands successful replies to
//! the reveal scheduler and rebuilds the session on reset, cancelling any
//! reveal still running and discarding late responses via the session
//! generation.

use async_trait::async_trait;
use charla_core::completion::{CompletionClient, CompletionRequest};
use charla_core::config::EngineConfig;
use charla_core::error::{ChatError, Result};
use charla_core::prompt;
use charla_core::session::{AttachmentRef, ConversationMode, PendingRequest, Session, TurnId};
use charla_core::topic;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

use crate::reveal::{RevealHandle, RevealScheduler, RevealStart, RevealTarget};

/// What happened to an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply is being revealed; `busy` clears when it finishes.
    Revealing { reply_turn: TurnId, step: Duration },
    /// The reply was empty and was finalised without a timer.
    Revealed { reply_turn: TurnId },
    /// The completion failed and the fallback reply was appended.
    Fallback { reply_turn: TurnId, error: ChatError },
    /// The session was reset while the request was in flight; the response
    /// was dropped.
    Discarded,
}

/// State shared between the engine and its background tasks.
struct Shared {
    session: RwLock<Session>,
    reveal: Mutex<Option<RevealHandle>>,
    revision: watch::Sender<u64>,
    reveals_started: AtomicUsize,
}

impl Shared {
    fn notify(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    fn replace_reveal(&self, handle: Option<RevealHandle>) -> Option<RevealHandle> {
        match self.reveal.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, handle),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), handle),
        }
    }
}

/// Reveal target writing into one assistant turn of one session generation.
struct SessionTurn {
    shared: Arc<Shared>,
    turn: TurnId,
    generation: u64,
}

#[async_trait]
impl RevealTarget for SessionTurn {
    async fn show(&self, prefix: &str, done: bool) -> bool {
        let mut session = self.shared.session.write().await;
        if session.generation != self.generation {
            return false;
        }
        if !session.set_assistant_text(self.turn, prefix) {
            tracing::warn!("[SessionEngine] reveal target {} vanished", self.turn);
            return false;
        }
        if done {
            session.finish_reveal();
            tracing::info!("[SessionEngine] reply {} fully revealed", self.turn);
        }
        drop(session);
        self.shared.notify();
        true
    }
}

/// Manages the conversational session of one chat widget.
///
/// `ChatEngine` is responsible for:
/// - Seeding the opening topic on creation and reset
/// - Submitting user turns to the completion service, one at a time
/// - Revealing replies and writing fallback replies on failure
/// - Exposing snapshots and change notifications to a renderer
pub struct ChatEngine {
    config: Arc<EngineConfig>,
    client: Arc<dyn CompletionClient>,
    scheduler: RevealScheduler,
    shared: Arc<Shared>,
    rng: Mutex<StdRng>,
}

impl ChatEngine {
    /// Creates an engine with an entropy-seeded topic RNG.
    pub fn new(config: Arc<EngineConfig>, client: Arc<dyn CompletionClient>) -> Result<Self> {
        Self::with_rng(config, client, StdRng::from_entropy())
    }

    /// Creates an engine with a caller-supplied RNG for topic seeding.
    pub fn with_rng(
        config: Arc<EngineConfig>,
        client: Arc<dyn CompletionClient>,
        mut rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let starter = topic::seed(&config.catalog, &mut rng)?;
        let session = Session::new(config.default_mode, starter);
        tracing::info!(
            "[SessionEngine] session {} created (topic: {})",
            session.id,
            session.last_topic.as_deref().unwrap_or("-")
        );

        let (revision, _) = watch::channel(0);
        Ok(Self {
            scheduler: RevealScheduler::new(config.reveal),
            config,
            client,
            shared: Arc::new(Shared {
                session: RwLock::new(session),
                reveal: Mutex::new(None),
                revision,
                reveals_started: AtomicUsize::new(0),
            }),
            rng: Mutex::new(rng),
        })
    }

    /// Returns a copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.shared.session.read().await.clone()
    }

    pub async fn is_busy(&self) -> bool {
        self.shared.session.read().await.busy
    }

    /// Subscribes to change notifications; the value is a revision counter
    /// bumped on every session mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Number of reveal timers started over the engine's lifetime.
    pub fn reveals_started(&self) -> usize {
        self.shared.reveals_started.load(Ordering::SeqCst)
    }

    /// Resolves once no request or reveal is in progress.
    pub async fn wait_idle(&self) {
        let mut revisions = self.subscribe();
        loop {
            if !self.is_busy().await {
                return;
            }
            if revisions.changed().await.is_err() {
                return;
            }
        }
    }

    /// Switches the persona used for subsequent prompts.
    pub async fn set_mode(&self, mode: ConversationMode) {
        let mut session = self.shared.session.write().await;
        if session.mode != mode {
            tracing::info!("[SessionEngine] mode {} -> {}", session.mode, mode);
            session.mode = mode;
            drop(session);
            self.shared.notify();
        }
    }

    /// Stores an attachment for the next submission, replacing any pending one.
    pub async fn attach(&self, attachment: AttachmentRef) {
        tracing::debug!("[SessionEngine] attachment pending: {}", attachment.name);
        self.shared.session.write().await.attach(attachment);
        self.shared.notify();
    }

    /// Drops the pending attachment, if any.
    pub async fn detach(&self) -> Option<AttachmentRef> {
        let removed = self.shared.session.write().await.detach();
        if removed.is_some() {
            self.shared.notify();
        }
        removed
    }

    /// Submits a user turn.
    ///
    /// Fails with `Busy` while another submission or reveal is in progress
    /// and with `EmptyInput` for blank text; both leave the session untouched.
    /// Completion failures are not errors here: they produce
    /// `SubmitOutcome::Fallback` after the fallback reply is appended.
    ///
    /// The request runs on its own task, so dropping the returned future
    /// does not leave the session stuck busy.
    pub async fn submit(
        &self,
        user_text: &str,
        attachment: Option<AttachmentRef>,
    ) -> Result<SubmitOutcome> {
        let (pending, request) = {
            let mut session = self.shared.session.write().await;
            let pending = session.begin_request(user_text, attachment)?;
            let prompt = prompt::compose(&session, &pending.user_text, pending.attachment.as_ref());
            let request = CompletionRequest::new(prompt, session.mode, pending.attachment.as_ref());
            (pending, request)
        };
        self.shared.notify();

        tracing::info!(
            "[SessionEngine] submitting {} (generation {}, mode {}, attachment: {})",
            pending.user_turn,
            pending.generation,
            request.mode,
            pending
                .attachment
                .as_ref()
                .map(|a| a.name.as_str())
                .unwrap_or("-")
        );

        let generation = pending.generation;
        let task = tokio::spawn(complete_and_route(
            self.shared.clone(),
            self.client.clone(),
            self.config.clone(),
            self.scheduler.clone(),
            pending,
            request,
        ));

        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::error!("[SessionEngine] request task failed: {}", err);
                let mut session = self.shared.session.write().await;
                if session.generation == generation && session.busy {
                    session.fail_request(&self.config.fallback_reply);
                    drop(session);
                    self.shared.notify();
                }
                Err(ChatError::internal(format!("Request task failed: {err}")))
            }
        }
    }

    /// Replaces the session with a freshly seeded one.
    ///
    /// Allowed at any time. A running reveal is cancelled before the
    /// transcript is replaced, and a request still in flight becomes stale:
    /// its response is discarded when it arrives. The mode is preserved.
    pub async fn reset(&self) -> Result<Session> {
        let starter = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| ChatError::internal("Topic RNG lock poisoned"))?;
            topic::seed(&self.config.catalog, &mut *rng)?
        };

        let mut session = self.shared.session.write().await;
        if let Some(reveal) = self.shared.replace_reveal(None) {
            if !reveal.is_finished() {
                tracing::debug!("[SessionEngine] cancelling reveal of {}", reveal.turn());
            }
            reveal.cancel();
        }

        if session.busy {
            tracing::debug!(
                "[SessionEngine] reset while busy; generation {} becomes stale",
                session.generation
            );
        }

        let fresh = session.reseeded(starter);
        tracing::info!(
            "[SessionEngine] session reset {} -> {} (topic: {})",
            session.id,
            fresh.id,
            fresh.last_topic.as_deref().unwrap_or("-")
        );
        *session = fresh;
        let snapshot = session.clone();
        drop(session);
        self.shared.notify();

        Ok(snapshot)
    }
}

/// Issues the completion call and routes its result into the session.
async fn complete_and_route(
    shared: Arc<Shared>,
    client: Arc<dyn CompletionClient>,
    config: Arc<EngineConfig>,
    scheduler: RevealScheduler,
    pending: PendingRequest,
    request: CompletionRequest,
) -> SubmitOutcome {
    let result = client.complete(&request).await;

    let mut session = shared.session.write().await;
    if session.generation != pending.generation {
        tracing::debug!(
            "[SessionEngine] dropping stale response for generation {} (now {})",
            pending.generation,
            session.generation
        );
        return SubmitOutcome::Discarded;
    }

    let outcome = match result {
        Ok(reply) => {
            let reply_turn = session.open_reply();
            let target = SessionTurn {
                shared: shared.clone(),
                turn: reply_turn,
                generation: pending.generation,
            };
            match scheduler.start(reply_turn, reply.text, target) {
                RevealStart::Immediate => {
                    session.finish_reveal();
                    SubmitOutcome::Revealed { reply_turn }
                }
                RevealStart::Scheduled(handle) => {
                    let step = handle.plan().step;
                    shared.reveals_started.fetch_add(1, Ordering::SeqCst);
                    if let Some(previous) = shared.replace_reveal(Some(handle)) {
                        previous.cancel();
                    }
                    SubmitOutcome::Revealing { reply_turn, step }
                }
            }
        }
        Err(error) => {
            tracing::warn!(
                "[SessionEngine] completion failed ({}): {}",
                error.kind(),
                error
            );
            let reply_turn = session.fail_request(&config.fallback_reply);
            SubmitOutcome::Fallback { reply_turn, error }
        }
    };

    drop(session);
    shared.notify();
    outcome
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
