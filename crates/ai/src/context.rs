use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::error::{AiError, AiResult};

/// Cancellation signals and deadline for one move-selection call.
///
/// Cloning is cheap and clones observe the same signals. A context never
/// expires unless a deadline or a cancel handle was attached. Derived
/// contexts keep every signal of their parent.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    cancel: Vec<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every context derived from the `with_cancel` call that made it.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl SearchContext {
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach a fresh cancel signal on top of the inherited ones.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let mut cancel = self.cancel.clone();
        cancel.push(rx);
        let ctx = Self {
            cancel,
            deadline: self.deadline,
        };
        (ctx, CancelHandle(tx))
    }

    /// A timeout too large to represent leaves the deadline unchanged.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Keeps the earlier of the existing and the new deadline.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            cancel: self.cancel.clone(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.iter().any(|rx| *rx.borrow())
    }

    /// Non-blocking poll of cancellation and deadline.
    pub fn check(&self) -> AiResult<()> {
        if self.is_cancelled() {
            return Err(AiError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(AiError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Sleep for `duration`, waking early with an error on cancel or deadline.
    pub async fn sleep(&self, duration: Duration) -> AiResult<()> {
        self.check()?;
        if duration.is_zero() {
            return Ok(());
        }

        // `None` wakes only on cancellation or the deadline
        let wake = Instant::now().checked_add(duration);
        let (until, cut_short) = match (self.deadline, wake) {
            (Some(deadline), Some(wake)) if deadline < wake => (Some(deadline), true),
            (Some(deadline), None) => (Some(deadline), true),
            (_, wake) => (wake, false),
        };

        tokio::select! {
            _ = sleep_until(until) => {}
            _ = wait_cancelled(self.cancel.clone()) => return Err(AiError::Cancelled),
        }

        if cut_short {
            return Err(AiError::DeadlineExceeded);
        }
        Ok(())
    }
}

async fn sleep_until(until: Option<Instant>) {
    match until {
        Some(until) => tokio::time::sleep_until(until).await,
        None => std::future::pending::<()>().await,
    }
}

/// Resolves once any signal flips to true. Signals whose handle was dropped
/// uncancelled never fire.
async fn wait_cancelled(cancel: Vec<watch::Receiver<bool>>) {
    let mut waiters = JoinSet::new();
    for mut rx in cancel {
        waiters.spawn(async move { rx.wait_for(|cancelled| *cancelled).await.is_ok() });
    }
    while let Some(fired) = waiters.join_next().await {
        if matches!(fired, Ok(true)) {
            return;
        }
    }
    std::future::pending::<()>().await
}
