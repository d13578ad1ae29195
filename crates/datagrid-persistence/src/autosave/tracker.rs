//! Dirty state tracking for autosave.

/// Tracks unsaved changes of one grid.
///
/// Changes are identified by the store revision that produced them, so a
/// save only clears the dirty flag when no newer change arrived while it ran.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Revision of the most recent unsaved change.
    dirty_revision: Option<u64>,

    /// Whether a save is currently in progress.
    saving: bool,

    /// Saves that wrote a record (primary or fallback).
    saves_completed: u64,

    /// Epoch milliseconds of the last successful save.
    last_saved_at: Option<u64>,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty_revision.is_some()
    }

    /// Check if a save is in progress.
    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn saves_completed(&self) -> u64 {
        self.saves_completed
    }

    pub fn last_saved_at(&self) -> Option<u64> {
        self.last_saved_at
    }

    /// Record a change made at `revision`.
    pub fn mark_dirty(&mut self, revision: u64) {
        self.dirty_revision = Some(self.dirty_revision.map_or(revision, |r| r.max(revision)));
    }

    /// Mark that a save has started.
    pub fn start_save(&mut self) {
        self.saving = true;
    }

    /// Mark that a save of the state at `revision` completed.
    pub fn save_complete(&mut self, revision: u64, saved_at: u64) {
        self.saving = false;
        self.saves_completed += 1;
        self.last_saved_at = Some(saved_at);
        if self.dirty_revision.is_some_and(|dirty| dirty <= revision) {
            self.dirty_revision = None;
        }
    }

    /// Mark that a save wrote nothing. Changes stay unsaved.
    pub fn save_failed(&mut self) {
        self.saving = false;
    }

    /// Forget unsaved changes.
    pub fn clear(&mut self) {
        self.dirty_revision = None;
    }
}
