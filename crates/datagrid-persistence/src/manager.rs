//! Per-grid persistence manager.
//!
//! The manager moves through `Uninitialized → Loading → Ready`. Autosave is
//! disabled until `Ready`, which is reached after the stored record was
//! applied (or found missing) and the settle delay elapsed. Each save
//! resolves the key again, so a grid whose options turn persistence on after
//! load starts saving with its next change.
//!
//! Save, load and clear go through one async I/O gate, so at most one storage
//! operation per grid is in flight. `reset()` cancels the pending save before
//! taking the gate and clears the dirty flag with it, so a save that was
//! already waiting on the gate finds nothing to write.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use datagrid_model::{PersistPolicy, StorageBackend};
use datagrid_state::{GridHandle, StateChange, SubscriptionId};
use datagrid_storage::{SaveOutcome, StateStorage};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::autosave::{AutoSaveConfig, DebounceTimer, DirtyTracker};
use crate::convert;

/// Lifecycle phase of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Result of [`PersistenceManager::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Persistence is off for this grid; no I/O happened.
    Disabled,
    /// Nothing (readable) was stored under the key.
    NotFound,
    /// A stored record was applied.
    Applied,
    /// `load` already ran.
    AlreadyLoaded,
}

/// Snapshot of the manager's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistStatus {
    pub phase: Phase,
    pub dirty: bool,
    pub saving: bool,
    pub save_pending: bool,
    pub saves_completed: u64,
    pub last_saved_at: Option<u64>,
    pub last_outcome: Option<SaveOutcome>,
}

/// Resolved persistence target of a grid.
struct Target {
    key: String,
    backend: StorageBackend,
    policy: PersistPolicy,
}

fn resolve_target(handle: &GridHandle) -> Option<Target> {
    handle.read(|store| {
        let options = store.options();
        if !options.persist.enabled {
            return None;
        }
        let key = options.storage_key()?;
        Some(Target {
            key: key.to_string(),
            backend: options.persist.storage,
            policy: options.persist.clone(),
        })
    })
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner {
    handle: GridHandle,
    storage: Arc<StateStorage>,
    config: AutoSaveConfig,
    phase: watch::Sender<Phase>,
    timer: Mutex<Option<DebounceTimer>>,
    tracker: Mutex<DirtyTracker>,
    last_outcome: Mutex<Option<SaveOutcome>>,
    io: tokio::sync::Mutex<()>,
}

impl Inner {
    fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Observer entry point. Runs while the store is locked: touches only
    /// the manager's own state. Whether the grid persists is decided when
    /// the save runs.
    fn on_change(self: &Arc<Self>, change: &StateChange) {
        if self.phase() != Phase::Ready {
            return;
        }
        let mut timer = lock(&self.timer);
        let Some(timer) = timer.as_mut() else {
            return;
        };
        lock(&self.tracker).mark_dirty(change.revision);

        let inner = Arc::clone(self);
        timer.schedule(async move {
            inner.save_if_dirty().await;
        });
        tracing::trace!(field = %change.field, revision = change.revision, "save scheduled");
    }

    fn cancel_pending(&self) -> bool {
        lock(&self.timer).as_mut().is_some_and(DebounceTimer::cancel)
    }

    async fn save_if_dirty(&self) -> Option<SaveOutcome> {
        let _io = self.io.lock().await;
        if !lock(&self.tracker).is_dirty() {
            tracing::trace!("nothing to save");
            return None;
        }
        self.save_locked().await
    }

    /// Capture and write the current state. The caller holds the I/O gate.
    async fn save_locked(&self) -> Option<SaveOutcome> {
        let Some(target) = resolve_target(&self.handle) else {
            tracing::trace!("save skipped: persistence disabled");
            lock(&self.tracker).clear();
            return None;
        };
        let (record, revision) = self.handle.read(|store| {
            let record = convert::capture(store.state(), &target.policy.state, now_millis());
            (record, store.revision())
        });

        lock(&self.tracker).start_save();
        let outcome = self
            .storage
            .save(&target.key, &record, target.backend)
            .await;

        {
            let mut tracker = lock(&self.tracker);
            if outcome.is_saved() {
                tracker.save_complete(revision, record.updated_at);
            } else {
                tracker.save_failed();
            }
        }
        *lock(&self.last_outcome) = Some(outcome);
        tracing::info!(key = %target.key, ?outcome, revision, "grid state saved");
        Some(outcome)
    }
}

/// Loads, autosaves and resets the persisted state of one grid.
///
/// Dropping the manager cancels a pending save and unsubscribes from the
/// store. A save that already started still completes.
pub struct PersistenceManager {
    inner: Arc<Inner>,
    subscription: SubscriptionId,
}

impl fmt::Debug for PersistenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceManager")
            .field("phase", &self.inner.phase())
            .field("config", &self.inner.config)
            .field("storage", &self.inner.storage)
            .finish_non_exhaustive()
    }
}

impl PersistenceManager {
    /// Attach a manager to `handle`. Nothing is read until [`Self::load`].
    pub fn new(handle: GridHandle, storage: Arc<StateStorage>, config: AutoSaveConfig) -> Self {
        let (phase, _) = watch::channel(Phase::Uninitialized);
        let inner = Arc::new(Inner {
            handle,
            storage,
            config,
            phase,
            timer: Mutex::new(None),
            tracker: Mutex::new(DirtyTracker::new()),
            last_outcome: Mutex::new(None),
            io: tokio::sync::Mutex::new(()),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let subscription = inner.handle.update(|store| {
            store.subscribe(move |change| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_change(change);
                }
            })
        });

        Self {
            inner,
            subscription,
        }
    }

    pub fn handle(&self) -> &GridHandle {
        &self.inner.handle
    }

    pub fn config(&self) -> &AutoSaveConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase()
    }

    /// Wait until autosave is active.
    pub async fn ready(&self) {
        let mut phase = self.inner.phase.subscribe();
        // The sender lives as long as `self`.
        let _ = phase.wait_for(|phase| *phase == Phase::Ready).await;
    }

    /// Whether persistence is enabled and a storage key resolves.
    pub fn should_persist(&self) -> bool {
        resolve_target(&self.inner.handle).is_some()
    }

    /// The resolved storage key, when persistence is on.
    pub fn storage_key(&self) -> Option<String> {
        resolve_target(&self.inner.handle).map(|target| target.key)
    }

    pub fn status(&self) -> PersistStatus {
        let tracker = lock(&self.inner.tracker).clone();
        let save_pending = lock(&self.inner.timer)
            .as_ref()
            .is_some_and(DebounceTimer::is_pending);
        PersistStatus {
            phase: self.inner.phase(),
            dirty: tracker.is_dirty(),
            saving: tracker.is_saving(),
            save_pending,
            saves_completed: tracker.saves_completed(),
            last_saved_at: tracker.last_saved_at(),
            last_outcome: *lock(&self.inner.last_outcome),
        }
    }

    // =========================================================================
    // LOAD
    // =========================================================================

    /// Read the stored record and apply its policy-included fields, then
    /// enable autosave after the settle delay.
    ///
    /// Runs once; later calls return [`LoadOutcome::AlreadyLoaded`]. Applying
    /// the record does not schedule a save.
    pub async fn load(&self) -> LoadOutcome {
        let inner = &self.inner;
        let started = inner.phase.send_if_modified(|phase| {
            if *phase == Phase::Uninitialized {
                *phase = Phase::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            tracing::debug!(phase = %inner.phase(), "load skipped");
            return LoadOutcome::AlreadyLoaded;
        }

        // Installed even when persistence is off: options may enable it later,
        // and every save re-resolves the target.
        match Handle::try_current() {
            Ok(runtime) => {
                *lock(&inner.timer) = Some(DebounceTimer::new(runtime, inner.config.debounce()));
            }
            Err(e) => tracing::warn!(error = %e, "autosave disabled: no tokio runtime"),
        }

        let Some(target) = resolve_target(&inner.handle) else {
            tracing::debug!("persistence disabled for grid");
            inner.phase.send_replace(Phase::Ready);
            return LoadOutcome::Disabled;
        };

        let record = {
            let _io = inner.io.lock().await;
            inner.storage.load(&target.key, target.backend).await
        };

        let outcome = match record {
            Some(record) => {
                inner.handle.update(|store| {
                    store.apply_silently(|state| {
                        convert::apply(&record, &target.policy.state, state);
                    });
                });
                tracing::info!(key = %target.key, updated_at = record.updated_at, "grid state restored");
                LoadOutcome::Applied
            }
            None => {
                tracing::debug!(key = %target.key, "no stored grid state");
                LoadOutcome::NotFound
            }
        };

        tokio::time::sleep(inner.config.settle()).await;
        inner.phase.send_replace(Phase::Ready);
        tracing::debug!(key = %target.key, "autosave enabled");
        outcome
    }

    // =========================================================================
    // SAVE
    // =========================================================================

    /// Save the current state right away, replacing a pending save.
    ///
    /// Returns `None` when persistence is off for this grid.
    pub async fn save_now(&self) -> Option<SaveOutcome> {
        self.inner.cancel_pending();
        let _io = self.inner.io.lock().await;
        self.inner.save_locked().await
    }

    /// Save now if there are unsaved changes. For host teardown.
    pub async fn flush(&self) -> Option<SaveOutcome> {
        self.inner.cancel_pending();
        self.inner.save_if_dirty().await
    }

    // =========================================================================
    // RESET
    // =========================================================================

    /// Clear the stored record and restore the default view state.
    ///
    /// No-op when persistence is off. A pending save is cancelled and an
    /// in-flight one finishes before the record is cleared; the defaults are
    /// applied without scheduling a new save.
    pub async fn reset(&self) -> bool {
        let Some(target) = resolve_target(&self.inner.handle) else {
            tracing::debug!("reset skipped: persistence disabled");
            return false;
        };

        let cancelled = self.inner.cancel_pending();
        let _io = self.inner.io.lock().await;
        self.inner
            .storage
            .clear(&target.key, target.backend)
            .await;
        self.inner.handle.update(|store| store.reset_to_defaults());
        lock(&self.inner.tracker).clear();

        tracing::info!(key = %target.key, cancelled_pending_save = cancelled, "grid state reset");
        true
    }
}

impl Drop for PersistenceManager {
    fn drop(&mut self) {
        self.inner.cancel_pending();
        let subscription = self.subscription;
        self.inner
            .handle
            .update(|store| store.unsubscribe(subscription));
    }
}
