//! Conversion between live grid state and persisted records.
//!
//! Both directions are gated by [`StateInclusion`]: a field switched off is
//! never written, and never applied even when a stored record carries it.

use datagrid_model::{GridState, PaginationState, PersistedState, StateInclusion};

/// Snapshot the included fields of `state`, stamped with `updated_at`.
pub fn capture(state: &GridState, include: &StateInclusion, updated_at: u64) -> PersistedState {
    PersistedState {
        view: include.view.then_some(state.view),
        pagination: include.pagination.then(|| PaginationState {
            page_index: state.page_index,
            page_size: state.page_size,
        }),
        search: include.search.then(|| state.search_query.clone()),
        sorting: include.sorting.then(|| state.sorting.clone()),
        column_order: include.column_order.then(|| state.column_order.clone()),
        column_visibility: include
            .column_visibility
            .then(|| state.column_visibility.clone()),
        column_filters: include.filters.then(|| state.column_filters.clone()),
        column_sizing: include.column_sizing.then(|| state.column_sizing.clone()),
        updated_at,
    }
}

/// Write the included fields of `record` into `state`.
///
/// A page size below 1 leaves pagination untouched. Duplicate sort and filter
/// ids are left for the store to drop when the state is applied.
pub fn apply(record: &PersistedState, include: &StateInclusion, state: &mut GridState) {
    if include.view
        && let Some(view) = record.view
    {
        state.view = view;
    }
    if include.pagination
        && let Some(pagination) = record.pagination
    {
        if pagination.page_size >= 1 {
            state.page_index = pagination.page_index;
            state.page_size = pagination.page_size;
        } else {
            tracing::debug!(page_size = pagination.page_size, "ignoring stored page size");
        }
    }
    if include.search
        && let Some(search) = &record.search
    {
        state.search_query.clone_from(search);
    }
    if include.sorting
        && let Some(sorting) = &record.sorting
    {
        state.sorting.clone_from(sorting);
    }
    if include.filters
        && let Some(filters) = &record.column_filters
    {
        state.column_filters.clone_from(filters);
    }
    if include.column_sizing
        && let Some(sizing) = &record.column_sizing
    {
        state.column_sizing.clone_from(sizing);
    }
    if include.column_order
        && let Some(order) = &record.column_order
    {
        state.column_order.clone_from(order);
    }
    if include.column_visibility
        && let Some(visibility) = &record.column_visibility
    {
        state.column_visibility.clone_from(visibility);
    }
}
