//! Persisted state record.
//!
//! The record is the wire format shared by both storage backends. Every field
//! except `updatedAt` is optional: a field is present only when the
//! persistence policy included it at save time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{ColumnFilter, SortEntry, ViewMode};

/// Pagination snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

/// Serializable snapshot of a policy-selected subset of the grid state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Vec<SortEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_visibility: Option<BTreeMap<String, bool>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_filters: Option<Vec<ColumnFilter>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_sizing: Option<BTreeMap<String, f64>>,

    /// Epoch milliseconds of the save that produced this record.
    #[serde(default)]
    pub updated_at: u64,
}

impl PersistedState {
    /// An empty record stamped with the given time.
    pub fn stamped(updated_at: u64) -> Self {
        Self {
            updated_at,
            ..Self::default()
        }
    }

    /// Serialize to compact JSON text.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_fields_are_not_written() {
        let record = PersistedState {
            view: Some(ViewMode::Table),
            pagination: Some(PaginationState {
                page_index: 2,
                page_size: 25,
            }),
            search: Some("alice".to_string()),
            sorting: Some(vec![SortEntry::desc("created")]),
            ..PersistedState::stamped(1_700_000_000_000)
        };

        insta::assert_json_snapshot!(record, @r#"
        {
          "view": "table",
          "pagination": {
            "pageIndex": 2,
            "pageSize": 25
          },
          "search": "alice",
          "sorting": [
            {
              "id": "created",
              "desc": true
            }
          ],
          "updatedAt": 1700000000000
        }
        "#);
    }

    #[test]
    fn test_missing_updated_at_defaults_to_zero() {
        let record = PersistedState::from_json(r#"{"view":"gallery"}"#).unwrap();
        assert_eq!(record.view, Some(ViewMode::Gallery));
        assert_eq!(record.updated_at, 0);
        assert!(record.sorting.is_none());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let record =
            PersistedState::from_json(r#"{"updatedAt":5,"futureField":{"x":1}}"#).unwrap();
        assert_eq!(record.updated_at, 5);
    }
}
