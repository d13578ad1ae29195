//! Terminal tables for grid pages, column descriptors and stored state.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use datagrid_columns::ColumnDescriptor;
use datagrid_model::ColumnType;
use datagrid_persistence::PersistStatus;
use datagrid_state::{GridStore, column_size};

/// Rough pixels per terminal character, for mapping column widths.
const PIXELS_PER_CHAR: f64 = 8.0;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn flag_cell(on: bool) -> Cell {
    if on {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

/// Header label with the column's sort marker, e.g. `Name ▼2`.
fn header_label(store: &GridStore, column: &ColumnDescriptor) -> String {
    let sorting = &store.state().sorting;
    let Some(position) = sorting.iter().position(|entry| entry.id == column.id) else {
        return column.header.clone();
    };
    let arrow = if sorting[position].desc { '▼' } else { '▲' };
    if sorting.len() > 1 {
        format!("{} {arrow}{}", column.header, position + 1)
    } else {
        format!("{} {arrow}", column.header)
    }
}

/// The current page of `store` as a table of visible columns.
pub fn page_table(store: &GridStore) -> Table {
    let columns = store.visible_columns();
    let model = store.row_model();

    let mut table = Table::new();
    table.set_header(
        columns
            .iter()
            .map(|column| header_cell(&header_label(store, column)))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    table.set_constraints(columns.iter().map(|column| {
        let chars = column_size(&store.state().column_sizing, &column.id) / PIXELS_PER_CHAR;
        ColumnConstraint::UpperBoundary(Width::Fixed(chars.round().clamp(3.0, 200.0) as u16))
    }));

    for &row_index in model.page_rows() {
        let Some(row) = store.row(row_index) else {
            continue;
        };
        table.add_row(
            columns
                .iter()
                .map(|column| Cell::new(column.render(row, row_index).to_display_string()))
                .collect::<Vec<_>>(),
        );
    }

    for (index, column) in columns.iter().enumerate() {
        let alignment = match column.column_type() {
            ColumnType::RowNumber | ColumnType::Number => CellAlignment::Right,
            _ => CellAlignment::Left,
        };
        if let Some(table_column) = table.column_mut(index) {
            table_column.set_cell_alignment(alignment);
        }
    }
    table
}

/// `Page 2 of 3 · 24 rows (of 30)`.
pub fn page_summary(store: &GridStore) -> String {
    let model = store.row_model();
    let mut summary = format!(
        "Page {} of {} · {} rows",
        model.page_index + 1,
        model.page_count,
        model.total()
    );
    if model.total() != store.rows().len() {
        summary.push_str(&format!(" (of {})", store.rows().len()));
    }
    summary
}

/// One line per descriptor: id, header, type, strategy, flags, items.
pub fn columns_table(descriptors: &[ColumnDescriptor]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Header"),
        header_cell("Type"),
        header_cell("Render"),
        header_cell("Filter"),
        header_cell("Sort"),
        header_cell("Items"),
    ]);
    apply_table_style(&mut table);
    for descriptor in descriptors {
        let items = descriptor
            .meta
            .items
            .as_ref()
            .map_or_else(|| dim_cell("-"), |items| Cell::new(items.join(", ")));
        table.add_row(vec![
            Cell::new(&descriptor.id),
            Cell::new(&descriptor.header),
            Cell::new(descriptor.column_type().as_str()),
            Cell::new(descriptor.strategy().label()),
            flag_cell(descriptor.enable_filter),
            flag_cell(descriptor.enable_sorting),
            items,
        ]);
    }
    table
}

/// One-line persistence status for stderr.
pub fn status_line(key: Option<&str>, status: &PersistStatus) -> String {
    match key {
        None => "persistence: off (no grid id or key)".to_string(),
        Some(key) => {
            let outcome = status
                .last_outcome
                .map_or_else(|| "nothing saved".to_string(), |o| format!("{o:?}").to_lowercase());
            format!(
                "persistence: key '{key}', {} save(s), last: {outcome}",
                status.saves_completed
            )
        }
    }
}
