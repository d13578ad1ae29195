//! Filter merge law and end-to-end filtering through the store.

use std::collections::HashSet;

use datagrid_columns::ColumnDef;
use datagrid_model::{ColumnFilter, GridOptions, Row};
use datagrid_state::{GridStore, merge_filters};
use proptest::prelude::*;
use serde_json::{Value, json};

fn filter_set() -> impl Strategy<Value = Vec<ColumnFilter>> {
    prop::collection::vec(("[a-e]", "[a-z]{0,3}"), 0..6).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(id, _)| seen.insert(id.clone()))
            .map(|(id, value)| ColumnFilter::new(id, value))
            .collect()
    })
}

proptest! {
    #[test]
    fn merge_keeps_new_values_and_blanks_dropped_ids(
        previous in filter_set(),
        next in filter_set(),
    ) {
        let merged = merge_filters(&previous, next.clone());

        let ids: Vec<&str> = merged.iter().map(|f| f.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());

        for filter in &next {
            prop_assert!(merged.contains(filter));
        }
        for old in &previous {
            if !next.iter().any(|f| f.id == old.id) {
                prop_assert!(merged.contains(&ColumnFilter::empty(old.id.clone())));
            }
        }
        prop_assert_eq!(merged.len(), unique.len());
        let all_known = merged.iter().all(|f| {
            next.iter().any(|n| n.id == f.id) || previous.iter().any(|p| p.id == f.id)
        });
        prop_assert!(all_known);
    }

    #[test]
    fn store_merge_matches_free_function(
        previous in filter_set(),
        next in filter_set(),
    ) {
        let mut store = GridStore::default();
        store.apply_silently(|state| state.column_filters = previous.clone());
        store.on_filters_changed(next.clone());
        prop_assert_eq!(&store.state().column_filters, &merge_filters(&previous, next));
    }
}

fn people() -> GridStore {
    let rows: Vec<Row> = [
        json!({"name": "Ada", "age": 36, "active": true, "roles": ["admin", "dev"]}),
        json!({"name": "Grace", "age": 45, "active": false, "roles": ["dev"]}),
        json!({"name": "Linus", "age": 28, "active": true, "roles": ["ops"]}),
    ]
    .into_iter()
    .filter_map(|v| v.as_object().cloned())
    .collect();
    GridStore::with_data(
        GridOptions::default(),
        vec![
            ColumnDef::row_number(),
            ColumnDef::text("name"),
            ColumnDef::number("age"),
            ColumnDef::boolean("active"),
            ColumnDef::array("roles", None),
        ],
        rows,
    )
}

fn names(store: &GridStore) -> Vec<Value> {
    store
        .row_model()
        .page_rows()
        .iter()
        .map(|&i| store.rows()[i]["name"].clone())
        .collect()
}

#[test]
fn combined_filters_intersect() {
    let mut store = people();
    store.set_filter_value("active", "true");
    store.set_filter_value("roles", "dev");
    assert_eq!(names(&store), vec![json!("Ada")]);
}

#[test]
fn cleared_filter_widget_survives_recalculation() {
    let mut store = people();
    store.set_filter_value("name", "gr");
    assert_eq!(names(&store), vec![json!("Grace")]);

    // The table model drops the cleared filter; the entry stays with "".
    store.on_filters_changed(Vec::new());
    assert_eq!(store.state().column_filters, vec![ColumnFilter::empty("name")]);
    assert_eq!(names(&store).len(), 3);
}

#[test]
fn row_number_column_is_not_filterable() {
    let store = people();
    let ids: Vec<&str> = store
        .filterable_columns()
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(ids, vec!["name", "age", "active", "roles"]);
}

#[test]
fn search_covers_array_columns() {
    let mut store = people();
    store.set_search("OPS");
    assert_eq!(names(&store), vec![json!("Linus")]);
}
