//! Column sizing.

use std::collections::BTreeMap;

/// Width of a column with no sizing entry.
pub const DEFAULT_COLUMN_SIZE: f64 = 150.0;
pub const MIN_COLUMN_SIZE: f64 = 20.0;
pub const MAX_COLUMN_SIZE: f64 = 2000.0;

/// Clamp a requested width. Non-finite widths fall back to the default.
pub fn clamp_size(size: f64) -> f64 {
    if size.is_finite() {
        size.clamp(MIN_COLUMN_SIZE, MAX_COLUMN_SIZE)
    } else {
        DEFAULT_COLUMN_SIZE
    }
}

/// Effective width of a column.
pub fn column_size(sizing: &BTreeMap<String, f64>, id: &str) -> f64 {
    sizing
        .get(id)
        .copied()
        .map_or(DEFAULT_COLUMN_SIZE, clamp_size)
}

/// Pixel-size variables keyed `--header-<id>-size` and `--col-<id>-size`.
pub type ColumnSizeMap = BTreeMap<String, String>;

pub(crate) fn build_size_map<'a>(
    sizing: &BTreeMap<String, f64>,
    ids: impl IntoIterator<Item = &'a str>,
) -> ColumnSizeMap {
    let mut map = ColumnSizeMap::new();
    for id in ids {
        let px = format!("{}px", column_size(sizing, id));
        map.insert(format!("--header-{id}-size"), px.clone());
        map.insert(format!("--col-{id}-size"), px);
    }
    map
}
