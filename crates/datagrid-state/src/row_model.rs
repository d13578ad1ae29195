//! Derived row model: search, column filters, sorting, pagination.
//!
//! Rows are identified by their index in the source data. The model holds
//! indices only and is rebuilt on every access.

use std::collections::HashMap;

use datagrid_columns::{ColumnDescriptor, display_value};
use datagrid_model::{GridState, Row};

use crate::filter::FilterFn;
use crate::sort::compare_cells;

/// Result of running the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowModel {
    /// Every matching row, sorted.
    pub rows: Vec<usize>,
    /// Clamped page index.
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
}

impl RowModel {
    /// Number of rows that passed search and filters.
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> &[usize] {
        let start = (self.page_index * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// `ceil(rows / page_size)`, at least 1.
pub fn page_count(row_count: usize, page_size: usize) -> usize {
    row_count.div_ceil(page_size.max(1)).max(1)
}

pub(crate) fn build(
    rows: &[Row],
    columns: &[ColumnDescriptor],
    state: &GridState,
    filter_fns: &HashMap<String, FilterFn>,
) -> RowModel {
    let query = state.search_query.trim().to_lowercase();
    let searchable: Vec<&ColumnDescriptor> = columns
        .iter()
        .filter(|c| c.enable_filter && c.accessor_key.is_some())
        .collect();

    let active_filters: Vec<(&ColumnDescriptor, FilterFn, &serde_json::Value)> = state
        .column_filters
        .iter()
        .filter(|f| !f.is_blank())
        .filter_map(|f| {
            let column = columns.iter().find(|c| c.id == f.id && c.enable_filter)?;
            let filter_fn = filter_fns
                .get(&f.id)
                .copied()
                .or_else(|| FilterFn::default_for(column.column_type()))?;
            Some((column, filter_fn, &f.value))
        })
        .collect();

    let mut matched: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            query.is_empty()
                || searchable.iter().any(|c| {
                    display_value(c.value(row))
                        .to_lowercase()
                        .contains(&query)
                })
        })
        .filter(|(_, row)| {
            active_filters
                .iter()
                .all(|(c, filter_fn, value)| filter_fn.matches(c.value(row), value))
        })
        .map(|(index, _)| index)
        .collect();

    let sort_keys: Vec<(&ColumnDescriptor, bool)> = state
        .sorting
        .iter()
        .filter_map(|entry| {
            columns
                .iter()
                .find(|c| c.id == entry.id && c.enable_sorting && c.accessor_key.is_some())
                .map(|c| (c, entry.desc))
        })
        .collect();

    if !sort_keys.is_empty() {
        // `sort_by` is stable: ties keep source order.
        matched.sort_by(|&a, &b| {
            sort_keys
                .iter()
                .map(|(c, desc)| {
                    compare_cells(c.column_type(), c.value(&rows[a]), c.value(&rows[b]), *desc)
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let page_size = state.page_size.max(1);
    let page_count = page_count(matched.len(), page_size);
    RowModel {
        rows: matched,
        page_index: state.page_index.min(page_count - 1),
        page_size,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_columns::{ColumnDef, EditCallback, parse_columns};
    use datagrid_model::{ColumnFilter, SortEntry};
    use serde_json::json;
    use std::sync::Arc;

    fn fixture() -> (Vec<Row>, Vec<ColumnDescriptor>) {
        let rows = [
            json!({"name": "delta", "qty": 4, "tags": ["x"]}),
            json!({"name": "Alpha", "qty": 2, "tags": ["x", "y"]}),
            json!({"name": "charlie", "qty": null, "tags": []}),
            json!({"name": "bravo", "qty": 2, "tags": ["y"]}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();
        let on_edit: EditCallback = Arc::new(|_| {});
        let columns = parse_columns(
            &[
                ColumnDef::row_number(),
                ColumnDef::text("name"),
                ColumnDef::number("qty"),
                ColumnDef::array("tags", None),
            ],
            &on_edit,
        );
        (rows, columns)
    }

    #[test]
    fn test_page_count_minimum_one() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (rows, columns) = fixture();
        let state = GridState {
            search_query: "ALP".into(),
            ..GridState::default()
        };
        let model = build(&rows, &columns, &state, &HashMap::new());
        assert_eq!(model.rows, vec![1]);
    }

    #[test]
    fn test_multi_sort_is_stable_with_nulls_last() {
        let (rows, columns) = fixture();
        let state = GridState {
            sorting: vec![SortEntry::desc("qty"), SortEntry::asc("name")],
            ..GridState::default()
        };
        let model = build(&rows, &columns, &state, &HashMap::new());
        // qty desc: 4, then the two 2s by name, null last.
        assert_eq!(model.rows, vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_filters_use_type_defaults_and_overrides() {
        let (rows, columns) = fixture();
        let state = GridState {
            column_filters: vec![ColumnFilter::new("tags", "y")],
            ..GridState::default()
        };
        let model = build(&rows, &columns, &state, &HashMap::new());
        assert_eq!(model.rows, vec![1, 3]);

        let state = GridState {
            column_filters: vec![ColumnFilter::new("qty", json!([3, null]))],
            ..GridState::default()
        };
        let overrides = HashMap::from([("qty".to_string(), FilterFn::InNumberRange)]);
        let model = build(&rows, &columns, &state, &overrides);
        assert_eq!(model.rows, vec![0]);
    }

    #[test]
    fn test_blank_filter_keeps_all_rows() {
        let (rows, columns) = fixture();
        let state = GridState {
            column_filters: vec![ColumnFilter::empty("name")],
            ..GridState::default()
        };
        assert_eq!(build(&rows, &columns, &state, &HashMap::new()).total(), 4);
    }

    #[test]
    fn test_page_index_is_clamped() {
        let (rows, columns) = fixture();
        let state = GridState {
            page_index: 9,
            page_size: 3,
            ..GridState::default()
        };
        let model = build(&rows, &columns, &state, &HashMap::new());
        assert_eq!(model.page_count, 2);
        assert_eq!(model.page_index, 1);
        assert_eq!(model.page_rows(), &[3]);
        assert!(!model.can_next_page());
        assert!(model.can_previous_page());
    }
}
