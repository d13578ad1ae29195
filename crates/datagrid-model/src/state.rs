//! Live grid view state.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Active presentation of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Gallery,
    Calendar,
}

impl ViewMode {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Table => "Table",
            Self::Gallery => "Gallery",
            Self::Calendar => "Calendar",
        }
    }
}

/// Direction of one sort entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One entry of the sorting list. The first entry has the highest precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    /// Column id.
    pub id: String,
    /// Whether the column sorts descending.
    pub desc: bool,
}

impl SortEntry {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }

    #[inline]
    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// A filter applied to one column.
///
/// The value is opaque here; its meaning depends on the column's filter
/// function. An empty string means "filter widget present, nothing entered".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column id.
    pub id: String,
    /// Filter value.
    pub value: Value,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// A filter entry with an empty value.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, Value::String(String::new()))
    }

    /// Whether the value would match every row.
    pub fn is_blank(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// Mutable view state of one grid instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    pub view: ViewMode,
    pub page_index: usize,
    pub page_size: usize,
    pub search_query: String,
    pub sorting: Vec<SortEntry>,
    pub column_filters: Vec<ColumnFilter>,
    /// Column/header id to pixel width.
    pub column_sizing: BTreeMap<String, f64>,
    pub column_order: Vec<String>,
    pub column_visibility: BTreeMap<String, bool>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            view: ViewMode::Table,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search_query: String::new(),
            sorting: Vec::new(),
            column_filters: Vec::new(),
            column_sizing: BTreeMap::new(),
            column_order: Vec::new(),
            column_visibility: BTreeMap::new(),
        }
    }
}

impl GridState {
    /// Look up the filter entry for a column.
    pub fn filter(&self, id: &str) -> Option<&ColumnFilter> {
        self.column_filters.iter().find(|f| f.id == id)
    }

    /// Look up the sort entry for a column.
    pub fn sort_entry(&self, id: &str) -> Option<&SortEntry> {
        self.sorting.iter().find(|s| s.id == id)
    }

    /// Whether a column is visible. Columns without an entry are visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.column_visibility.get(id).copied().unwrap_or(true)
    }
}

/// Drop repeated sort ids, keeping the first occurrence.
pub fn dedupe_sorting(sorting: Vec<SortEntry>) -> Vec<SortEntry> {
    let mut seen = HashSet::new();
    sorting
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .collect()
}

/// Drop repeated filter ids, keeping the first occurrence.
pub fn dedupe_filters(filters: Vec<ColumnFilter>) -> Vec<ColumnFilter> {
    let mut seen = HashSet::new();
    filters
        .into_iter()
        .filter(|filter| seen.insert(filter.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_state() {
        let state = GridState::default();
        assert_eq!(state.view, ViewMode::Table);
        assert_eq!(state.page_index, 0);
        assert_eq!(state.page_size, 10);
        assert!(state.sorting.is_empty());
        assert!(state.column_sizing.is_empty());
    }

    #[test]
    fn test_filter_blankness() {
        assert!(ColumnFilter::empty("name").is_blank());
        assert!(ColumnFilter::new("tags", json!([])).is_blank());
        assert!(ColumnFilter::new("tags", Value::Null).is_blank());
        assert!(!ColumnFilter::new("age", json!(0)).is_blank());
        assert!(!ColumnFilter::new("name", "bo").is_blank());
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let sorting = dedupe_sorting(vec![
            SortEntry::asc("a"),
            SortEntry::desc("b"),
            SortEntry::desc("a"),
        ]);
        assert_eq!(sorting, vec![SortEntry::asc("a"), SortEntry::desc("b")]);

        let filters = dedupe_filters(vec![
            ColumnFilter::new("a", "x"),
            ColumnFilter::new("a", "y"),
        ]);
        assert_eq!(filters, vec![ColumnFilter::new("a", "x")]);
    }

    #[test]
    fn test_visibility_defaults_to_visible() {
        let mut state = GridState::default();
        assert!(state.is_visible("name"));
        state.column_visibility.insert("name".into(), false);
        assert!(!state.is_visible("name"));
    }
}
