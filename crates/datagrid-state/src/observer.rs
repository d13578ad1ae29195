//! Observer registry.
//!
//! Observers are plain callbacks notified synchronously after a mutation that
//! changed a value. They see which field changed and the store revision, and
//! nothing else: a callback cannot read derived values during the pass that
//! wrote them.

use std::fmt;

/// Observed slices of the grid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    View,
    Pagination,
    Search,
    Sorting,
    Filters,
    Sizing,
    ColumnOrder,
    ColumnVisibility,
}

impl StateField {
    pub const ALL: [StateField; 8] = [
        Self::View,
        Self::Pagination,
        Self::Search,
        Self::Sorting,
        Self::Filters,
        Self::Sizing,
        Self::ColumnOrder,
        Self::ColumnVisibility,
    ];
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::View => "view",
            Self::Pagination => "pagination",
            Self::Search => "search",
            Self::Sorting => "sorting",
            Self::Filters => "filters",
            Self::Sizing => "sizing",
            Self::ColumnOrder => "columnOrder",
            Self::ColumnVisibility => "columnVisibility",
        };
        f.write_str(name)
    }
}

/// Notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub field: StateField,
    /// Store revision after the change. Strictly increasing.
    pub revision: u64,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type Observer = Box<dyn Fn(&StateChange) + Send>;

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&self, change: StateChange) {
        tracing::trace!(
            field = %change.field,
            revision = change.revision,
            observers = self.observers.len(),
            "state changed"
        );
        for (_, observer) in &self.observers {
            observer(&change);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_subscribe_notify_unsubscribe() {
        let mut registry = ObserverRegistry::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = registry.subscribe(Box::new(move |change| sink.lock().unwrap().push(*change)));

        let change = StateChange {
            field: StateField::Sorting,
            revision: 1,
        };
        registry.notify(change);
        assert_eq!(*seen.lock().unwrap(), vec![change]);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify(change);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = ObserverRegistry::default();
        let a = registry.subscribe(Box::new(|_| {}));
        let b = registry.subscribe(Box::new(|_| {}));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
