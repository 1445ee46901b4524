//! Debounced Draft Persister
//!
//! Watches a changing form value and saves it once changes have been quiet
//! for a fixed period. At most one save is scheduled at any instant: every
//! change cancels the pending one and schedules a replacement.
//!
//! States:
//! - `Idle`: nothing scheduled, nothing in flight
//! - `PendingSave`: a save is scheduled for the end of the quiet period
//! - `Saving`: a save is in flight and nothing newer is scheduled
//!
//! A change moves any state to `PendingSave`. The quiet period elapsing
//! moves `PendingSave` to `Saving`. Completion moves `Saving` to `Idle`; on
//! failure the last-saved snapshot is left alone so the same value is saved
//! again on the next change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{DraftPayload, DraftSaver, DEFAULT_QUIET_PERIOD_MS};
use crate::config::Config;
use crate::error::PersistError;

// == Public Types ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistState {
    Idle,
    PendingSave,
    Saving,
}

/// Identifies whose draft is being saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftContext {
    pub email: String,
    pub paypal_transaction_id: Option<String>,
}

impl DraftContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            paypal_transaction_id: None,
        }
    }

    pub fn with_transaction(mut self, transaction_id: impl Into<String>) -> Self {
        self.paypal_transaction_id = Some(transaction_id.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct PersisterConfig {
    /// Time without changes before a save fires
    pub quiet_period: Duration,
    /// Whether changes are persisted at all
    pub enabled: bool,
}

impl Default for PersisterConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(DEFAULT_QUIET_PERIOD_MS),
            enabled: true,
        }
    }
}

/// Quiet period from `AUTOSAVE_QUIET_MS`, persistence enabled.
impl From<&Config> for PersisterConfig {
    fn from(config: &Config) -> Self {
        Self {
            quiet_period: config.autosave_quiet_period(),
            enabled: true,
        }
    }
}

/// Why a change was ignored. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    MissingEmail,
    ShutDown,
}

/// What `on_change` did with a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// A save is scheduled for the end of the quiet period
    Scheduled,
    /// The value equals the last successfully saved snapshot
    Unchanged,
    /// Persistence preconditions were not met
    Skipped(SkipReason),
    /// The value could not be serialized; recorded as `last_error`
    Unserializable,
}

/// Observable state for UI binding.
#[derive(Debug, Clone, PartialEq)]
pub struct PersisterStatus {
    pub state: PersistState,
    /// True while at least one save is in flight
    pub is_saving: bool,
    /// Error of the newest save to complete; a late older save cannot touch it
    pub last_error: Option<PersistError>,
    /// Token returned by the most recent successful save
    pub resume_token: Option<String>,
}

// == Internal State ==
struct Inner {
    state: PersistState,
    /// Serialized form of the last successfully saved value
    last_saved: Option<String>,
    /// Generation of the save that produced `last_saved`
    saved_generation: u64,
    /// Bumped on every scheduled save; a timer only fires for the latest
    generation: u64,
    /// Newest generation whose save has completed, successfully or not
    settled_generation: u64,
    pending: Option<JoinHandle<()>>,
    in_flight: usize,
    last_error: Option<PersistError>,
    resume_token: Option<String>,
    enabled: bool,
    closed: bool,
}

impl Inner {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn settle(&mut self) {
        self.state = if self.in_flight > 0 {
            PersistState::Saving
        } else {
            PersistState::Idle
        };
    }

    fn status(&self) -> PersisterStatus {
        PersisterStatus {
            state: self.state,
            is_saving: self.in_flight > 0,
            last_error: self.last_error.clone(),
            resume_token: self.resume_token.clone(),
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    status_tx: watch::Sender<PersisterStatus>,
    saver: Arc<dyn DraftSaver>,
    quiet_period: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.status_tx.send_replace(inner.status());
    }
}

// == Debounced Persister ==
/// Per-session autosave controller.
///
/// Dropping the persister ends the session and cancels any pending save.
pub struct DebouncedPersister {
    shared: Arc<Shared>,
}

impl DebouncedPersister {
    pub fn new(saver: Arc<dyn DraftSaver>, config: PersisterConfig) -> Self {
        let inner = Inner {
            state: PersistState::Idle,
            last_saved: None,
            saved_generation: 0,
            generation: 0,
            settled_generation: 0,
            pending: None,
            in_flight: 0,
            last_error: None,
            resume_token: None,
            enabled: config.enabled,
            closed: false,
        };
        let (status_tx, _) = watch::channel(inner.status());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                status_tx,
                saver,
                quiet_period: config.quiet_period,
            }),
        }
    }

    // == On Change ==
    /// Reacts to a new form value.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_change<T: Serialize>(&self, value: &T, context: &DraftContext) -> ChangeOutcome {
        let mut inner = self.shared.lock();

        if inner.closed {
            return ChangeOutcome::Skipped(SkipReason::ShutDown);
        }
        if !inner.enabled {
            return ChangeOutcome::Skipped(SkipReason::Disabled);
        }
        if context.email.trim().is_empty() {
            return ChangeOutcome::Skipped(SkipReason::MissingEmail);
        }

        let form_data = match serde_json::to_value(value) {
            Ok(form_data) => form_data,
            Err(e) => {
                inner.last_error = Some(PersistError::Serialize(e.to_string()));
                self.shared.publish(&inner);
                return ChangeOutcome::Unserializable;
            }
        };
        let snapshot = form_data.to_string();

        // Any change, including a revert to the saved value, replaces the pending save
        inner.cancel_pending();

        if inner.last_saved.as_deref() == Some(snapshot.as_str()) {
            inner.settle();
            self.shared.publish(&inner);
            return ChangeOutcome::Unchanged;
        }

        inner.generation += 1;
        let generation = inner.generation;
        let payload = DraftPayload {
            email: context.email.clone(),
            paypal_transaction_id: context.paypal_transaction_id.clone(),
            form_data,
        };

        inner.pending = Some(tokio::spawn(run_scheduled_save(
            Arc::clone(&self.shared),
            generation,
            payload,
            snapshot,
        )));
        inner.state = PersistState::PendingSave;
        self.shared.publish(&inner);

        debug!(generation, email = %context.email, "draft save rescheduled");
        ChangeOutcome::Scheduled
    }

    /// Turns persistence on or off. Turning it off cancels a pending save.
    pub fn set_enabled(&self, enabled: bool) {
        let mut inner = self.shared.lock();
        inner.enabled = enabled;
        if !enabled {
            inner.cancel_pending();
            inner.settle();
        }
        self.shared.publish(&inner);
    }

    // == Shutdown ==
    /// Ends the session. A pending save is cancelled and later changes are
    /// ignored; a save already in flight is allowed to finish.
    pub fn shutdown(&self) {
        let mut inner = self.shared.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.cancel_pending();
        inner.settle();
        self.shared.publish(&inner);
        debug!("draft persister shut down");
    }

    pub fn status(&self) -> PersisterStatus {
        self.shared.lock().status()
    }

    pub fn is_saving(&self) -> bool {
        self.status().is_saving
    }

    pub fn last_error(&self) -> Option<PersistError> {
        self.shared.lock().last_error.clone()
    }

    /// Subscribes to status changes.
    pub fn subscribe(&self) -> watch::Receiver<PersisterStatus> {
        self.shared.status_tx.subscribe()
    }
}

impl Drop for DebouncedPersister {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of the scheduled save: wait out the quiet period, then save unless
/// a newer change or shutdown has superseded this one.
async fn run_scheduled_save(
    shared: Arc<Shared>,
    generation: u64,
    payload: DraftPayload,
    snapshot: String,
) {
    tokio::time::sleep(shared.quiet_period).await;

    {
        let mut inner = shared.lock();
        if inner.closed || inner.generation != generation {
            return;
        }
        // Past this point a new change no longer aborts this task
        inner.pending = None;
        inner.in_flight += 1;
        inner.state = PersistState::Saving;
        shared.publish(&inner);
    }

    let email = payload.email.clone();
    let result = shared.saver.save_draft(payload).await;

    let mut inner = shared.lock();
    inner.in_flight -= 1;
    // Only the newest completion decides `last_error`
    let latest = generation >= inner.settled_generation;
    if latest {
        inner.settled_generation = generation;
    }
    match result {
        Ok(receipt) => {
            // An older save finishing late must not roll the snapshot back
            if generation > inner.saved_generation {
                inner.saved_generation = generation;
                inner.last_saved = Some(snapshot);
                inner.resume_token = Some(receipt.resume_token);
            }
            if latest {
                inner.last_error = None;
            }
            info!(generation, email = %email, "draft saved");
        }
        Err(e) => {
            warn!(generation, email = %email, error = %e, stale = !latest, "draft autosave failed");
            if latest {
                inner.last_error = Some(e);
            }
        }
    }
    if inner.state == PersistState::Saving {
        inner.settle();
    }
    shared.publish(&inner);
}
