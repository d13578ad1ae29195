//! Command-line flags replayed as user interactions.

use std::str::FromStr;

use datagrid_model::{SortEntry, ViewMode};
use datagrid_state::GridStore;
use serde_json::Value;

use crate::input::infer_value;

/// `COLUMN[:asc|:desc]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg(pub SortEntry);

impl FromStr for SortArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, direction) = match s.rsplit_once(':') {
            Some((id, direction)) => (id, Some(direction)),
            None => (s, None),
        };
        if id.is_empty() {
            return Err(format!("missing column in sort '{s}'"));
        }
        match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => Ok(Self(SortEntry::asc(id))),
            Some("desc") => Ok(Self(SortEntry::desc(id))),
            Some(other) => Err(format!("unknown sort direction '{other}' (use asc or desc)")),
        }
    }
}

/// `COLUMN=VALUE`. The value is inferred like a CSV cell, so `[1,5]` is a
/// range and `42` a number.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterArg {
    pub id: String,
    pub value: Value,
}

impl FromStr for FilterArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((id, value)) = s.split_once('=') else {
            return Err(format!("expected COLUMN=VALUE, got '{s}'"));
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("missing column in filter '{s}'"));
        }
        Ok(Self {
            id: id.to_string(),
            value: match infer_value(value) {
                Value::Null => Value::String(String::new()),
                value => value,
            },
        })
    }
}

/// Interactions to replay, in the order a user would perform them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interactions {
    pub view: Option<ViewMode>,
    pub search: Option<String>,
    pub sorting: Vec<SortArg>,
    pub filters: Vec<FilterArg>,
    pub page_size: Option<usize>,
    /// 1-based page number.
    pub page: Option<usize>,
}

impl Interactions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to `store` through its public mutators, so observers see
    /// ordinary changes. Returns notes about ignored interactions.
    pub fn apply(&self, store: &mut GridStore) -> Vec<String> {
        let mut notes = Vec::new();

        if let Some(view) = self.view
            && !store.set_view(view)
        {
            notes.push(format!(
                "{} view needs field mappings in the options file",
                view.label()
            ));
        }
        if let Some(search) = &self.search {
            store.set_search(search.clone());
        }
        if !self.sorting.is_empty() {
            for SortArg(entry) in &self.sorting {
                if store.descriptor(&entry.id).is_none() {
                    notes.push(format!("unknown sort column '{}'", entry.id));
                }
            }
            store.set_sorting(self.sorting.iter().map(|arg| arg.0.clone()).collect());
        }
        for filter in &self.filters {
            let filterable = store.descriptor(&filter.id).map(|column| column.enable_filter);
            match filterable {
                Some(true) => store.set_filter_value(&filter.id, filter.value.clone()),
                Some(false) => notes.push(format!("column '{}' is not filterable", filter.id)),
                None => notes.push(format!("unknown filter column '{}'", filter.id)),
            }
        }
        if let Some(size) = self.page_size {
            store.set_page_size(size);
        }
        if let Some(page) = self.page {
            store.set_page_index(page.saturating_sub(1));
        }

        for note in &notes {
            tracing::warn!("{note}");
        }
        notes
    }
}
