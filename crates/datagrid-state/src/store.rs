//! The grid state store.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use datagrid_columns::{ColumnDef, ColumnDescriptor, EditCallback, parse_columns};
use datagrid_model::{
    ColumnFilter, GridOptions, GridState, Row, SortEntry, ViewMode, dedupe_filters, dedupe_sorting,
};
use serde_json::Value;

use crate::filter::FilterFn;
use crate::observer::{Observer, ObserverRegistry, StateChange, StateField, SubscriptionId};
use crate::row_model::{self, RowModel};
use crate::sizing::{ColumnSizeMap, build_size_map, clamp_size};

/// Host callback for the detail button, invoked with the full row.
pub type DetailCallback = Arc<dyn Fn(&Row) + Send + Sync>;

type EditSlot = Arc<RwLock<Option<EditCallback>>>;

/// Live, observable view state of one grid.
pub struct GridStore {
    state: GridState,
    rows: Vec<Row>,
    columns: Vec<ColumnDef>,
    descriptors: Vec<ColumnDescriptor>,
    options: GridOptions,
    filter_fns: HashMap<String, FilterFn>,
    last_added_filter: Option<String>,

    edit_slot: EditSlot,
    forward_edit: EditCallback,
    on_detail_click: Option<DetailCallback>,

    observers: ObserverRegistry,
    revision: u64,
    /// Bumped whenever sizing or the column set changes.
    sizing_epoch: u64,
    size_map: RefCell<Option<(u64, Arc<ColumnSizeMap>)>>,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("state", &self.state)
            .field("rows", &self.rows.len())
            .field("columns", &self.descriptors.len())
            .field("options", &self.options)
            .field("observers", &self.observers)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for GridStore {
    fn default() -> Self {
        Self::new(GridOptions::default())
    }
}

impl GridStore {
    pub fn new(options: GridOptions) -> Self {
        let edit_slot: EditSlot = Arc::new(RwLock::new(None));
        let slot = Arc::clone(&edit_slot);
        let forward_edit: EditCallback = Arc::new(move |row| {
            let callback = slot.read().unwrap_or_else(PoisonError::into_inner).clone();
            match callback {
                Some(callback) => callback(row),
                None => tracing::debug!("cell edit dropped: no edit callback registered"),
            }
        });

        Self {
            state: GridState::default(),
            rows: Vec::new(),
            columns: Vec::new(),
            descriptors: Vec::new(),
            options,
            filter_fns: HashMap::new(),
            last_added_filter: None,
            edit_slot,
            forward_edit,
            on_detail_click: None,
            observers: ObserverRegistry::default(),
            revision: 0,
            sizing_epoch: 0,
            size_map: RefCell::new(None),
        }
    }

    /// Store with a schema and rows.
    pub fn with_data(options: GridOptions, columns: Vec<ColumnDef>, rows: Vec<Row>) -> Self {
        let mut store = Self::new(options);
        store.set_columns(columns);
        store.set_rows(rows);
        store
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    /// Register an observer. It runs synchronously after every mutation that
    /// changed a value, while the store is still borrowed: it must not call
    /// back into the store.
    pub fn subscribe(&mut self, observer: impl Fn(&StateChange) + Send + 'static) -> SubscriptionId {
        let boxed: Observer = Box::new(observer);
        self.observers.subscribe(boxed)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mutate the state without notifying observers. The result is
    /// normalized: sort and filter ids are de-duplicated, page size is at
    /// least 1 and sizes are clamped.
    pub fn apply_silently(&mut self, f: impl FnOnce(&mut GridState)) {
        f(&mut self.state);

        let state = &mut self.state;
        state.page_size = state.page_size.max(1);
        state.sorting = dedupe_sorting(std::mem::take(&mut state.sorting));
        state.column_filters = dedupe_filters(std::mem::take(&mut state.column_filters));
        for size in state.column_sizing.values_mut() {
            *size = clamp_size(*size);
        }
        self.sizing_epoch += 1;
        self.revision += 1;
        tracing::debug!(revision = self.revision, "state applied silently");
    }

    fn changed(&mut self, field: StateField) {
        self.revision += 1;
        if matches!(
            field,
            StateField::Sizing | StateField::ColumnOrder | StateField::ColumnVisibility
        ) {
            self.sizing_epoch += 1;
        }
        self.observers.notify(StateChange {
            field,
            revision: self.revision,
        });
    }

    // =========================================================================
    // DATA, SCHEMA, OPTIONS
    // =========================================================================

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) {
        self.options = options;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        tracing::debug!(rows = rows.len(), "rows replaced");
        self.rows = rows;
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Replace the schema and re-run the parser for every column.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.descriptors = parse_columns(&columns, &self.forward_edit);
        self.columns = columns;
        self.sizing_epoch += 1;
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Columns whose filterability flag is on.
    pub fn filterable_columns(&self) -> Vec<&ColumnDescriptor> {
        self.descriptors.iter().filter(|d| d.enable_filter).collect()
    }

    /// Visible columns: explicit order first, the rest in schema order.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        let mut placed = HashSet::new();
        let mut ordered = Vec::with_capacity(self.descriptors.len());
        for id in &self.state.column_order {
            if let Some(d) = self.descriptor(id)
                && placed.insert(d.id.as_str())
            {
                ordered.push(d);
            }
        }
        for d in &self.descriptors {
            if placed.insert(d.id.as_str()) {
                ordered.push(d);
            }
        }
        ordered.retain(|d| self.state.is_visible(&d.id));
        ordered
    }

    // =========================================================================
    // CALLBACKS
    // =========================================================================

    /// Callback receiving merged rows from every editable cell.
    pub fn set_on_edit(&mut self, callback: impl Fn(Row) + Send + Sync + 'static) {
        let callback: EditCallback = Arc::new(callback);
        *self.edit_slot.write().unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    pub fn set_on_detail_click(&mut self, callback: impl Fn(&Row) + Send + Sync + 'static) {
        self.on_detail_click = Some(Arc::new(callback));
    }

    /// Invoke the detail callback for a row. Returns whether it ran.
    pub fn click_detail(&self, row_index: usize) -> bool {
        match (&self.on_detail_click, self.rows.get(row_index)) {
            (Some(callback), Some(row)) => {
                callback(row);
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    pub fn gallery_available(&self) -> bool {
        self.options.title_field.is_some() && self.options.description_field.is_some()
    }

    pub fn calendar_available(&self) -> bool {
        self.options.start_date_field.is_some()
            && self.options.end_date_field.is_some()
            && self.options.title_field.is_some()
    }

    pub fn view_available(&self, view: ViewMode) -> bool {
        match view {
            ViewMode::Table => true,
            ViewMode::Gallery => self.gallery_available(),
            ViewMode::Calendar => self.calendar_available(),
        }
    }

    /// Switch view mode. Returns `false` when the view lacks its field
    /// mappings.
    pub fn set_view(&mut self, view: ViewMode) -> bool {
        if !self.view_available(view) {
            tracing::debug!(view = view.label(), "view unavailable without field mappings");
            return false;
        }
        if self.state.view != view {
            self.state.view = view;
            self.changed(StateField::View);
        }
        true
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.state.search_query != query {
            self.state.search_query = query;
            self.changed(StateField::Search);
            self.reset_page_index();
        }
    }

    // =========================================================================
    // ROW MODEL & PAGINATION
    // =========================================================================

    /// Run search, filters, sorting and pagination over the rows.
    pub fn row_model(&self) -> RowModel {
        row_model::build(&self.rows, &self.descriptors, &self.state, &self.filter_fns)
    }

    pub fn page_count(&self) -> usize {
        self.row_model().page_count
    }

    /// Page index clamped to `[0, page_count)`.
    pub fn page_index(&self) -> usize {
        self.row_model().page_index
    }

    fn set_page_index_raw(&mut self, index: usize) {
        if self.state.page_index != index {
            self.state.page_index = index;
            self.changed(StateField::Pagination);
        }
    }

    fn reset_page_index(&mut self) {
        self.set_page_index_raw(0);
    }

    pub fn set_page_index(&mut self, index: usize) {
        let last = self.page_count() - 1;
        self.set_page_index_raw(index.min(last));
    }

    pub fn next_page(&mut self) {
        let model = self.row_model();
        if model.can_next_page() {
            self.set_page_index_raw(model.page_index + 1);
        }
    }

    pub fn previous_page(&mut self) {
        let model = self.row_model();
        if model.can_previous_page() {
            self.set_page_index_raw(model.page_index - 1);
        }
    }

    pub fn first_page(&mut self) {
        self.set_page_index_raw(0);
    }

    pub fn last_page(&mut self) {
        let last = self.page_count() - 1;
        self.set_page_index_raw(last);
    }

    /// Change the page size, keeping the first visible row on screen.
    pub fn set_page_size(&mut self, size: usize) {
        let size = size.max(1);
        let first_row = self.page_index() * self.state.page_size.max(1);
        let index = first_row / size;
        if self.state.page_size != size || self.state.page_index != index {
            self.state.page_size = size;
            self.state.page_index = index;
            self.changed(StateField::Pagination);
        }
    }

    // =========================================================================
    // SORTING
    // =========================================================================

    fn sortable(&self, id: &str) -> bool {
        self.descriptor(id).is_some_and(|d| d.enable_sorting)
    }

    /// Cycle a column through ascending, descending and unsorted. The
    /// toggled column becomes the highest-precedence entry; with
    /// `multi = false` it becomes the only entry.
    pub fn toggle_sorting(&mut self, id: &str, multi: bool) {
        if !self.sortable(id) {
            tracing::debug!(column = id, "sorting ignored for non-sortable column");
            return;
        }
        let next = match self.state.sort_entry(id) {
            None => Some(SortEntry::asc(id)),
            Some(entry) if !entry.desc => Some(SortEntry::desc(id)),
            Some(_) => None,
        };

        let mut sorting = if multi {
            let mut rest = self.state.sorting.clone();
            rest.retain(|entry| entry.id != id);
            rest
        } else {
            Vec::new()
        };
        if let Some(entry) = next {
            sorting.insert(0, entry);
        }
        self.replace_sorting(sorting);
    }

    /// Replace the sort list. Duplicate ids keep their first entry and
    /// non-sortable columns are dropped.
    pub fn set_sorting(&mut self, sorting: Vec<SortEntry>) {
        let sorting: Vec<SortEntry> = dedupe_sorting(sorting)
            .into_iter()
            .filter(|entry| self.descriptor(&entry.id).is_none_or(|d| d.enable_sorting))
            .collect();
        self.replace_sorting(sorting);
    }

    pub fn clear_sorting(&mut self) {
        self.replace_sorting(Vec::new());
    }

    fn replace_sorting(&mut self, sorting: Vec<SortEntry>) {
        if self.state.sorting != sorting {
            self.state.sorting = sorting;
            self.changed(StateField::Sorting);
            self.reset_page_index();
        }
    }

    // =========================================================================
    // FILTERS
    // =========================================================================

    /// Accept a filter set reported by the table model. Ids that were
    /// present before but are missing now are kept with an empty value;
    /// only [`remove_filter`](Self::remove_filter) deletes an entry.
    pub fn on_filters_changed(&mut self, filters: Vec<ColumnFilter>) {
        let merged = merge_filters(&self.state.column_filters, filters);
        self.replace_filters(merged);
    }

    /// Add an empty-or-valued filter for a column. No-op when one exists.
    pub fn add_filter(&mut self, id: &str, value: impl Into<Value>) {
        if self.state.filter(id).is_some() {
            return;
        }
        let mut filters = self.state.column_filters.clone();
        filters.push(ColumnFilter::new(id, value));
        self.last_added_filter = Some(id.to_string());
        self.replace_filters(filters);
    }

    /// Update a filter's value, adding the filter when missing.
    pub fn set_filter_value(&mut self, id: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut filters = self.state.column_filters.clone();
        match filters.iter_mut().find(|f| f.id == id) {
            Some(existing) => existing.value = value,
            None => filters.push(ColumnFilter::new(id, value)),
        }
        self.replace_filters(filters);
    }

    /// Delete a filter entry.
    pub fn remove_filter(&mut self, id: &str) {
        let mut filters = self.state.column_filters.clone();
        filters.retain(|f| f.id != id);
        self.replace_filters(filters);
    }

    /// Id of the most recently added filter, for autofocus.
    pub fn last_added_filter(&self) -> Option<&str> {
        self.last_added_filter.as_deref()
    }

    pub fn take_last_added_filter(&mut self) -> Option<String> {
        self.last_added_filter.take()
    }

    fn replace_filters(&mut self, filters: Vec<ColumnFilter>) {
        if self.state.column_filters != filters {
            self.state.column_filters = filters;
            self.changed(StateField::Filters);
            self.reset_page_index();
        }
    }

    /// Filter function in effect for a column.
    pub fn filter_fn(&self, id: &str) -> Option<FilterFn> {
        self.filter_fns
            .get(id)
            .copied()
            .or_else(|| self.descriptor(id).and_then(|d| FilterFn::default_for(d.column_type())))
    }

    /// Override a column's filter function. Rejected unless the function is
    /// offered for the column's type.
    pub fn set_filter_fn(&mut self, id: &str, filter_fn: FilterFn) -> bool {
        let Some(descriptor) = self.descriptor(id) else {
            return false;
        };
        if !FilterFn::available_for(descriptor.column_type()).contains(&filter_fn) {
            tracing::debug!(column = id, %filter_fn, "filter function not offered for column type");
            return false;
        }
        self.filter_fns.insert(id.to_string(), filter_fn);
        true
    }

    // =========================================================================
    // SIZING
    // =========================================================================

    pub fn set_column_size(&mut self, id: &str, size: f64) {
        let mut sizing = self.state.column_sizing.clone();
        sizing.insert(id.to_string(), clamp_size(size));
        self.replace_sizing(sizing);
    }

    pub fn reset_column_size(&mut self, id: &str) {
        let mut sizing = self.state.column_sizing.clone();
        sizing.remove(id);
        self.replace_sizing(sizing);
    }

    /// Accept a sizing map reported by the table model.
    pub fn on_sizing_changed(&mut self, sizing: BTreeMap<String, f64>) {
        let sizing = sizing
            .into_iter()
            .map(|(id, size)| (id, clamp_size(size)))
            .collect();
        self.replace_sizing(sizing);
    }

    fn replace_sizing(&mut self, sizing: BTreeMap<String, f64>) {
        if self.state.column_sizing != sizing {
            self.state.column_sizing = sizing;
            self.changed(StateField::Sizing);
        }
    }

    /// Pixel widths of every visible column, memoized until sizing or the
    /// column set changes.
    pub fn column_size_map(&self) -> Arc<ColumnSizeMap> {
        let mut cache = self.size_map.borrow_mut();
        if let Some((epoch, map)) = cache.as_ref()
            && *epoch == self.sizing_epoch
        {
            return Arc::clone(map);
        }
        let map = Arc::new(build_size_map(
            &self.state.column_sizing,
            self.visible_columns().into_iter().map(|d| d.id.as_str()),
        ));
        *cache = Some((self.sizing_epoch, Arc::clone(&map)));
        map
    }

    // =========================================================================
    // ORDER & VISIBILITY
    // =========================================================================

    pub fn set_column_order(&mut self, order: Vec<String>) {
        let mut seen = HashSet::new();
        let order: Vec<String> = order.into_iter().filter(|id| seen.insert(id.clone())).collect();
        if self.state.column_order != order {
            self.state.column_order = order;
            self.changed(StateField::ColumnOrder);
        }
    }

    pub fn set_column_visibility(&mut self, id: &str, visible: bool) {
        if self.state.column_visibility.get(id) == Some(&visible) {
            return;
        }
        self.state.column_visibility.insert(id.to_string(), visible);
        self.changed(StateField::ColumnVisibility);
    }

    /// Restore every field to its default without notifying.
    pub fn reset_to_defaults(&mut self) {
        self.apply_silently(|state| *state = GridState::default());
        self.last_added_filter = None;
    }
}

/// The filter merge law: every entry of `next`, then every id of `previous`
/// missing from `next` with an empty value. Ids are unique in the result.
pub fn merge_filters(previous: &[ColumnFilter], next: Vec<ColumnFilter>) -> Vec<ColumnFilter> {
    let mut merged = dedupe_filters(next);
    for old in previous {
        if !merged.iter().any(|f| f.id == old.id) {
            merged.push(ColumnFilter::empty(old.id.clone()));
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_columns::{CellEditor, CellOutput, ColumnDef};
    use serde_json::json;
    use std::sync::Mutex;

    fn store() -> GridStore {
        let rows = (0..25)
            .map(|i| {
                json!({"name": format!("item {i:02}"), "qty": i % 5, "tags": ["t"]})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();
        GridStore::with_data(
            GridOptions::with_id("grid"),
            vec![
                ColumnDef::row_number(),
                ColumnDef::text("name"),
                ColumnDef::number("qty"),
                ColumnDef::array("tags", None).sortable(false),
            ],
            rows,
        )
    }

    fn recorded(store: &mut GridStore) -> Arc<Mutex<Vec<StateField>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |change| sink.lock().unwrap().push(change.field));
        seen
    }

    #[test]
    fn test_toggle_cycles_and_moves_to_front() {
        let mut s = store();
        s.toggle_sorting("name", true);
        s.toggle_sorting("qty", true);
        assert_eq!(s.state().sorting, vec![SortEntry::asc("qty"), SortEntry::asc("name")]);

        s.toggle_sorting("name", true);
        assert_eq!(s.state().sorting, vec![SortEntry::desc("name"), SortEntry::asc("qty")]);

        s.toggle_sorting("name", true);
        assert_eq!(s.state().sorting, vec![SortEntry::asc("qty")]);
    }

    #[test]
    fn test_single_toggle_replaces_list() {
        let mut s = store();
        s.toggle_sorting("name", true);
        s.toggle_sorting("qty", false);
        assert_eq!(s.state().sorting, vec![SortEntry::asc("qty")]);
    }

    #[test]
    fn test_non_sortable_ignored() {
        let mut s = store();
        s.toggle_sorting("tags", false);
        s.toggle_sorting("row_number", false);
        assert!(s.state().sorting.is_empty());
        s.set_sorting(vec![SortEntry::asc("tags"), SortEntry::asc("qty"), SortEntry::desc("qty")]);
        assert_eq!(s.state().sorting, vec![SortEntry::asc("qty")]);
    }

    #[test]
    fn test_add_filter_is_noop_when_present() {
        let mut s = store();
        s.add_filter("name", "");
        assert_eq!(s.take_last_added_filter().as_deref(), Some("name"));
        s.set_filter_value("name", "x");
        s.add_filter("name", "");
        assert_eq!(s.state().filter("name").unwrap().value, json!("x"));
        assert!(s.last_added_filter().is_none());
        assert_eq!(s.state().column_filters.len(), 1);
    }

    #[test]
    fn test_filters_changed_keeps_dropped_ids() {
        let mut s = store();
        s.set_filter_value("name", "item");
        s.set_filter_value("qty", 3);
        s.on_filters_changed(vec![ColumnFilter::new("qty", 4)]);
        assert_eq!(
            s.state().column_filters,
            vec![ColumnFilter::new("qty", 4), ColumnFilter::empty("name")]
        );
        s.remove_filter("name");
        assert_eq!(s.state().column_filters, vec![ColumnFilter::new("qty", 4)]);
    }

    #[test]
    fn test_set_filter_fn_respects_available_set() {
        let mut s = store();
        assert_eq!(s.filter_fn("qty"), Some(FilterFn::Equals));
        assert!(s.set_filter_fn("qty", FilterFn::InNumberRange));
        assert_eq!(s.filter_fn("qty"), Some(FilterFn::InNumberRange));
        assert!(!s.set_filter_fn("qty", FilterFn::ArrIncludes));
        assert!(!s.set_filter_fn("missing", FilterFn::Equals));
    }

    #[test]
    fn test_pagination_navigation() {
        let mut s = store();
        assert_eq!(s.page_count(), 3);
        s.next_page();
        s.next_page();
        s.next_page();
        assert_eq!(s.page_index(), 2);
        s.previous_page();
        assert_eq!(s.page_index(), 1);
        s.last_page();
        assert_eq!(s.row_model().page_rows().len(), 5);
        s.first_page();
        assert_eq!(s.page_index(), 0);
        s.set_page_index(99);
        assert_eq!(s.state().page_index, 2);
    }

    #[test]
    fn test_page_size_keeps_first_visible_row() {
        let mut s = store();
        s.set_page_index(2);
        // First visible row is 20.
        s.set_page_size(8);
        assert_eq!(s.state().page_size, 8);
        assert_eq!(s.page_index(), 2);
        s.set_page_size(0);
        assert_eq!(s.state().page_size, 1);
    }

    #[test]
    fn test_search_and_filters_reset_page() {
        let mut s = store();
        s.set_page_index(2);
        s.set_search("item 2");
        assert_eq!(s.state().page_index, 0);
        assert_eq!(s.row_model().total(), 5);
    }

    #[test]
    fn test_notifications_only_on_change() {
        let mut s = store();
        let seen = recorded(&mut s);
        s.set_search("");
        s.clear_sorting();
        s.set_view(ViewMode::Table);
        assert!(seen.lock().unwrap().is_empty());

        s.toggle_sorting("qty", false);
        s.set_column_size("name", 300.0);
        s.set_column_size("name", 300.0);
        assert_eq!(*seen.lock().unwrap(), vec![StateField::Sorting, StateField::Sizing]);
    }

    #[test]
    fn test_apply_silently_does_not_notify() {
        let mut s = store();
        let seen = recorded(&mut s);
        let before = s.revision();
        s.apply_silently(|state| {
            state.sorting = vec![SortEntry::asc("qty"), SortEntry::desc("qty")];
            state.page_size = 0;
        });
        assert!(seen.lock().unwrap().is_empty());
        assert!(s.revision() > before);
        assert_eq!(s.state().sorting.len(), 1);
        assert_eq!(s.state().page_size, 1);
    }

    #[test]
    fn test_size_map_memoized_by_sizing() {
        let mut s = store();
        let first = s.column_size_map();
        assert_eq!(first["--col-name-size"], "150px");
        assert!(Arc::ptr_eq(&first, &s.column_size_map()));

        s.set_column_size("name", 10.0);
        let second = s.column_size_map();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second["--header-name-size"], "20px");
    }

    #[test]
    fn test_views_require_field_mappings() {
        let mut s = store();
        assert!(!s.set_view(ViewMode::Gallery));
        let mut options = GridOptions::with_id("grid");
        options.title_field = Some("name".into());
        options.description_field = Some("name".into());
        s.set_options(options);
        assert!(s.set_view(ViewMode::Gallery));
        assert!(!s.calendar_available());
        assert_eq!(s.state().view, ViewMode::Gallery);
    }

    #[test]
    fn test_visible_columns_follow_order() {
        let mut s = store();
        s.set_column_order(vec!["qty".into(), "qty".into(), "ghost".into()]);
        s.set_column_visibility("tags", false);
        let ids: Vec<_> = s.visible_columns().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["qty", "row_number", "name"]);
        assert_eq!(s.state().column_order, vec!["qty", "ghost"]);
    }

    #[test]
    fn test_callbacks() {
        let mut s = store();
        let edits = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&edits);
        // Registered after parsing: editors forward to the current callback.
        s.set_columns(vec![ColumnDef::text("name").editable()]);
        s.set_on_edit(move |row| sink.lock().unwrap().push(row));

        let row = s.row(3).cloned().unwrap();
        if let CellOutput::Editor(cell) = s.descriptors()[0].render(&row, 3) {
            cell.commit(json!("renamed"));
        } else {
            panic!("expected editor");
        }
        assert_eq!(edits.lock().unwrap()[0]["name"], json!("renamed"));

        let clicked = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&clicked);
        s.set_on_detail_click(move |row| *sink.lock().unwrap() = Some(row["name"].clone()));
        assert!(s.click_detail(1));
        assert!(!s.click_detail(100));
        assert_eq!(*clicked.lock().unwrap(), Some(json!("item 01")));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut s = store();
        s.toggle_sorting("qty", false);
        s.set_search("x");
        s.set_column_size("name", 400.0);
        s.add_filter("name", "");
        let seen = recorded(&mut s);
        s.reset_to_defaults();
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(s.state(), &GridState::default());
    }
}
