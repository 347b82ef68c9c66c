//! Generic three-state lifecycle around any asynchronous action.
//!
//! ```text
//! Idle ──execute──▶ Pending ──▶ Success | Failed ──reset──▶ Idle
//! ```
//!
//! The escalation flag lives in a separate [`ErrorSurface`] so it can be
//! raised and dismissed independently of the operation state.

use crate::OperationError;
use pitchside_types::{Notification, NotificationSink};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Observable state of an [`AsyncOperation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AsyncState<T> {
    #[default]
    Idle,
    Pending,
    Success(T),
    Failed(OperationError),
}

impl<T> AsyncState<T> {
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Per-call notification and escalation settings.
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct ExecuteOptions {
    /// Shown (default variant) when the action resolves.
    #[builder(into)]
    pub success_message: Option<String>,
    /// Shown (destructive variant) when the action fails.
    #[builder(into)]
    pub error_message: Option<String>,
    /// Raise the blocking error surface on failure.
    #[builder(default)]
    pub escalate: bool,
}

/// Blocking, user-dismissible error display.
///
/// `Some(message)` means the modal is open.
pub struct ErrorSurface {
    state: watch::Sender<Option<String>>,
}

impl ErrorSurface {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    pub fn raise(&self, message: impl Into<String>) {
        self.state.send_replace(Some(message.into()));
    }

    /// The modal's single dismiss action.
    pub fn dismiss(&self) {
        self.state.send_replace(None);
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.borrow().is_some()
    }

    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.state.subscribe()
    }
}

impl Default for ErrorSurface {
    fn default() -> Self {
        Self::new()
    }
}

const SUCCESS_TITLE: &str = "Success";
const ERROR_TITLE: &str = "Error";

/// State container giving an async action a uniform lifecycle.
///
/// Overlapping `execute` calls are not merged: each call takes a generation
/// number and only the most recent one records its outcome, notifies, or
/// escalates. Superseded calls still return their own result to the caller.
pub struct AsyncOperation<T> {
    state: watch::Sender<AsyncState<T>>,
    generation: AtomicU64,
    sink: Arc<dyn NotificationSink>,
    surface: Arc<ErrorSurface>,
}

impl<T: Clone> AsyncOperation<T> {
    pub fn new(sink: Arc<dyn NotificationSink>, surface: Arc<ErrorSurface>) -> Self {
        let (state, _) = watch::channel(AsyncState::Idle);
        Self {
            state,
            generation: AtomicU64::new(0),
            sink,
            surface,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AsyncState<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AsyncState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn surface(&self) -> &Arc<ErrorSurface> {
        &self.surface
    }

    /// Run `action`, tracking its lifecycle.
    ///
    /// The state becomes `Pending` during this call, before the returned
    /// future is first polled. The future resolves to the action's own
    /// result after the state, notifications, and escalation are handled.
    /// Dropping the future before it resolves returns the state to `Idle`,
    /// unless a newer call has taken over.
    pub fn execute<F>(
        &self,
        action: F,
        options: ExecuteOptions,
    ) -> impl Future<Output = Result<T, OperationError>>
    where
        F: Future<Output = Result<T, OperationError>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(AsyncState::Pending);
        let mut guard = PendingGuard {
            op: self,
            generation,
            armed: true,
        };
        async move {
            let result = action.await;
            guard.disarm();
            self.settle(generation, &result, &options);
            result
        }
    }

    /// Return to `Idle`. The escalation flag is left alone, and any call still
    /// in flight will no longer record its outcome.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(AsyncState::Idle);
    }

    fn settle(&self, generation: u64, result: &Result<T, OperationError>, options: &ExecuteOptions) {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "superseded operation settled, ignoring");
            return;
        }
        match result {
            Ok(data) => {
                self.state.send_replace(AsyncState::Success(data.clone()));
                if let Some(message) = &options.success_message {
                    self.sink.notify(Notification::info(SUCCESS_TITLE, message));
                }
            }
            Err(err) => {
                self.state.send_replace(AsyncState::Failed(err.clone()));
                if err.is_sentinel() {
                    return;
                }
                tracing::debug!(error = %err, escalate = options.escalate, "operation failed");
                if let Some(message) = &options.error_message {
                    self.sink.notify(Notification::destructive(ERROR_TITLE, message));
                }
                if options.escalate {
                    self.surface.raise(err.to_string());
                }
            }
        }
    }
}

/// Returns a still-current `Pending` state to `Idle` when an `execute`
/// future is dropped before it settles.
struct PendingGuard<'a, T> {
    op: &'a AsyncOperation<T>,
    generation: u64,
    armed: bool,
}

impl<T> PendingGuard<'_, T> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T> Drop for PendingGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed && self.op.generation.load(Ordering::SeqCst) == self.generation {
            tracing::debug!(generation = self.generation, "operation dropped while pending");
            self.op.state.send_replace(AsyncState::Idle);
        }
    }
}
