//! Reveal scheduler.
//!
//! Drains a complete reply into its transcript turn one character per tick.
//! Each reveal is an owned tokio task with its own `CancellationToken`, so a
//! reset can stop it before the transcript it targets is replaced.

use async_trait::async_trait;
use charla_core::reveal::{Prefixes, RevealPlan, RevealTiming};
use charla_core::session::TurnId;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Where revealed text goes.
#[async_trait]
pub trait RevealTarget: Send + Sync + 'static {
    /// Shows `prefix`; `done` is set for the final, full text.
    ///
    /// Returns false when the target no longer accepts updates (for example
    /// the session was reset), which ends the reveal.
    async fn show(&self, prefix: &str, done: bool) -> bool;
}

/// How a reveal task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The full text was written.
    Completed,
    /// The cancellation token fired.
    Cancelled,
    /// The target refused an update.
    Superseded,
}

/// Result of asking the scheduler to reveal a reply.
#[derive(Debug)]
pub enum RevealStart {
    /// Nothing to reveal; no timer was created. The caller finalises the
    /// turn itself.
    Immediate,
    /// A reveal task is running.
    Scheduled(RevealHandle),
}

/// Owning handle to a running reveal task.
#[derive(Debug)]
pub struct RevealHandle {
    turn: TurnId,
    plan: RevealPlan,
    token: CancellationToken,
    task: JoinHandle<RevealOutcome>,
}

impl RevealHandle {
    /// Turn this reveal writes into.
    pub fn turn(&self) -> TurnId {
        self.turn
    }

    pub fn plan(&self) -> RevealPlan {
        self.plan
    }

    /// Stops the timer. The target sees no further updates once the task
    /// observes the token.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task to end.
    pub async fn join(self) -> RevealOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => RevealOutcome::Cancelled,
            Err(err) => {
                tracing::error!("[Reveal] task for {} panicked: {}", self.turn, err);
                RevealOutcome::Superseded
            }
        }
    }
}

/// Starts reveal tasks with a fixed cadence configuration.
#[derive(Debug, Clone, Default)]
pub struct RevealScheduler {
    timing: RevealTiming,
}

impl RevealScheduler {
    pub fn new(timing: RevealTiming) -> Self {
        Self { timing }
    }

    /// Reveals `text` into `target` as turn `turn`.
    ///
    /// Empty text returns `RevealStart::Immediate` without spawning a task.
    pub fn start<T: RevealTarget>(&self, turn: TurnId, text: String, target: T) -> RevealStart {
        let Some(plan) = self.timing.plan(&text) else {
            tracing::debug!("[Reveal] empty reply for {}, nothing to schedule", turn);
            return RevealStart::Immediate;
        };

        tracing::debug!(
            "[Reveal] {} chars into {} every {:?}",
            plan.chars,
            turn,
            plan.step
        );

        let token = CancellationToken::new();
        let task = tokio::spawn(run_reveal(plan, text, target, token.clone()));

        RevealStart::Scheduled(RevealHandle {
            turn,
            plan,
            token,
            task,
        })
    }
}

/// Tick loop behind a reveal task. The first tick fires one step after start.
pub async fn run_reveal<T: RevealTarget>(
    plan: RevealPlan,
    text: String,
    target: T,
    token: CancellationToken,
) -> RevealOutcome {
    let mut ticker = time::interval_at(Instant::now() + plan.step, plan.step);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let total = plan.chars;
    for (index, prefix) in Prefixes::new(&text).enumerate() {
        tokio::select! {
            biased;
            _ = token.cancelled() => return RevealOutcome::Cancelled,
            _ = ticker.tick() => {}
        }

        if !target.show(prefix, index + 1 == total).await {
            return RevealOutcome::Superseded;
        }
    }

    RevealOutcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Recorder {
        frames: Arc<Mutex<Vec<(String, bool, Instant)>>>,
        refuse_after: Option<usize>,
    }

    #[async_trait]
    impl RevealTarget for Recorder {
        async fn show(&self, prefix: &str, done: bool) -> bool {
            let mut frames = self.frames.lock().unwrap();
            if let Some(limit) = self.refuse_after {
                if frames.len() >= limit {
                    return false;
                }
            }
            frames.push((prefix.to_string(), done, Instant::now()));
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_writes_every_prefix_then_full_text() {
        let recorder = Recorder::default();
        let scheduler = RevealScheduler::default();

        let RevealStart::Scheduled(handle) =
            scheduler.start(TurnId(3), "¡Sí, ñ!".to_string(), recorder.clone())
        else {
            panic!("expected a scheduled reveal");
        };
        assert_eq!(handle.turn(), TurnId(3));
        assert_eq!(handle.join().await, RevealOutcome::Completed);

        let frames = recorder.frames.lock().unwrap();
        let texts: Vec<&str> = frames.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["¡", "¡S", "¡Sí", "¡Sí,", "¡Sí, ", "¡Sí, ñ", "¡Sí, ñ!"]);
        assert!(frames[..frames.len() - 1].iter().all(|(_, done, _)| !done));
        assert!(frames.last().unwrap().1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_planned_step() {
        let recorder = Recorder::default();
        let scheduler = RevealScheduler::default();
        let started = Instant::now();

        let RevealStart::Scheduled(handle) =
            scheduler.start(TurnId(1), "hola".into(), recorder.clone())
        else {
            panic!("expected a scheduled reveal");
        };
        let step = handle.plan().step;
        assert_eq!(step, Duration::from_millis(75));
        handle.join().await;

        let frames = recorder.frames.lock().unwrap();
        assert_eq!(frames.len(), 4);
        let mut previous = started;
        for (_, _, at) in frames.iter() {
            let gap = *at - previous;
            assert!(gap >= step && gap <= step + Duration::from_millis(1), "gap {gap:?}");
            previous = *at;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_schedules_nothing() {
        let recorder = Recorder::default();
        let start = RevealScheduler::default().start(TurnId(0), String::new(), recorder.clone());

        assert!(matches!(start, RevealStart::Immediate));
        assert!(recorder.frames.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_updates() {
        let recorder = Recorder::default();
        let text = "a".repeat(40);
        let RevealStart::Scheduled(handle) =
            RevealScheduler::default().start(TurnId(0), text, recorder.clone())
        else {
            panic!("expected a scheduled reveal");
        };

        time::sleep(handle.plan().step * 5 + Duration::from_millis(1)).await;
        handle.cancel();
        assert_eq!(handle.join().await, RevealOutcome::Cancelled);

        let written = recorder.frames.lock().unwrap().len();
        assert_eq!(written, 5);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(recorder.frames.lock().unwrap().len(), written);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refusing_target_supersedes_reveal() {
        let recorder = Recorder {
            refuse_after: Some(2),
            ..Recorder::default()
        };
        let RevealStart::Scheduled(handle) =
            RevealScheduler::default().start(TurnId(0), "abcdef".into(), recorder.clone())
        else {
            panic!("expected a scheduled reveal");
        };

        assert_eq!(handle.join().await, RevealOutcome::Superseded);
        assert_eq!(recorder.frames.lock().unwrap().len(), 2);
    }
}
