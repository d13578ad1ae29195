//! Column definition variants.

use std::fmt;
use std::sync::Arc;

use datagrid_model::{ColumnType, Row};
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// SHARED PIECES
// =============================================================================

/// Everything a formatter can see about a cell.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// The full row.
    pub row: &'a Row,
    /// Index of the row in the original data.
    pub row_index: usize,
    /// Column id.
    pub column_id: &'a str,
    /// The cell's raw value.
    pub value: &'a Value,
}

/// Custom cell formatter.
pub type Formatter = Arc<dyn Fn(&CellContext<'_>) -> String + Send + Sync>;

/// How a column finds its value in a row.
#[derive(Clone)]
pub enum FieldAccessor {
    /// A literal row key.
    Key(String),
    /// A function that yields the row key. Called once at parse time.
    Derived(Arc<dyn Fn() -> String + Send + Sync>),
}

impl FieldAccessor {
    /// Accessor computed by a function.
    pub fn derived(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Derived(Arc::new(f))
    }

    /// Resolve to the row key.
    pub fn resolve(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Derived(f) => f(),
        }
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl From<&str> for FieldAccessor {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for FieldAccessor {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// Editability of a column: off, on, or on with type-specific options.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Editable<T> {
    #[default]
    Disabled,
    Enabled,
    With(T),
}

impl<T: Clone + Default> Editable<T> {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Options in effect when editing, `None` when disabled.
    pub fn options(&self) -> Option<T> {
        match self {
            Self::Disabled => None,
            Self::Enabled => Some(T::default()),
            Self::With(options) => Some(options.clone()),
        }
    }
}

impl<T> From<bool> for Editable<T> {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// Fields shared by every column variant.
#[derive(Clone, Default)]
pub struct ColumnCommon {
    /// Header text. Defaults to the field key.
    pub header: Option<String>,
    /// Show a detail button for this column.
    pub detail: bool,
    pub primary: bool,
    /// Defaults to sortable.
    pub sortable: Option<bool>,
    /// Defaults to filterable.
    pub filterable: Option<bool>,
    pub header_icon: Option<String>,
    pub formatter: Option<Formatter>,
}

impl fmt::Debug for ColumnCommon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCommon")
            .field("header", &self.header)
            .field("detail", &self.detail)
            .field("primary", &self.primary)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("header_icon", &self.header_icon)
            .field("formatter", &self.formatter.as_ref().map(|_| ".."))
            .finish()
    }
}

// =============================================================================
// EDIT OPTIONS
// =============================================================================

/// Bounds for the date editor, as date strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateEditOptions {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumberEditOptions {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListEditOptions {
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrayEditOptions {
    pub allow_additions: bool,
    pub items: Option<Vec<String>>,
}

// =============================================================================
// VARIANTS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct RowNumberColumn {
    pub common: ColumnCommon,
}

#[derive(Debug, Clone)]
pub struct TextColumn {
    pub common: ColumnCommon,
    pub field: FieldAccessor,
    pub editable: bool,
    pub max_length: Option<usize>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DateColumn {
    pub common: ColumnCommon,
    pub field: FieldAccessor,
    /// Display format, e.g. `YYYY-MM-DD HH:mm`.
    pub date_format: Option<String>,
    pub editable: Editable<DateEditOptions>,
}

#[derive(Debug, Clone)]
pub struct NumberColumn {
    pub common: ColumnCommon,
    pub field: FieldAccessor,
    pub editable: Editable<NumberEditOptions>,
}

#[derive(Debug, Clone)]
pub struct BooleanColumn {
    pub common: ColumnCommon,
    pub field: FieldAccessor,
    pub editable: bool,
}

#[derive(Debug, Clone)]
pub struct ListColumn {
    pub common: ColumnCommon,
    pub field: FieldAccessor,
    /// Candidate values.
    pub items: Option<Vec<String>>,
    pub editable: Editable<ListEditOptions>,
}

#[derive(Debug, Clone)]
pub struct ArrayColumn {
    pub common: ColumnCommon,
    pub field: FieldAccessor,
    /// Candidate values.
    pub items: Option<Vec<String>>,
    pub editable: Editable<ArrayEditOptions>,
}

/// A column definition: exactly one type tag per definition.
#[derive(Debug, Clone)]
pub enum ColumnDef {
    RowNumber(RowNumberColumn),
    Text(TextColumn),
    Date(DateColumn),
    Number(NumberColumn),
    Boolean(BooleanColumn),
    Array(ArrayColumn),
    List(ListColumn),
}

impl ColumnDef {
    pub fn row_number() -> Self {
        Self::RowNumber(RowNumberColumn::default())
    }

    pub fn text(field: impl Into<FieldAccessor>) -> Self {
        Self::Text(TextColumn {
            common: ColumnCommon::default(),
            field: field.into(),
            editable: false,
            max_length: None,
            placeholder: None,
        })
    }

    pub fn date(field: impl Into<FieldAccessor>) -> Self {
        Self::Date(DateColumn {
            common: ColumnCommon::default(),
            field: field.into(),
            date_format: None,
            editable: Editable::Disabled,
        })
    }

    pub fn number(field: impl Into<FieldAccessor>) -> Self {
        Self::Number(NumberColumn {
            common: ColumnCommon::default(),
            field: field.into(),
            editable: Editable::Disabled,
        })
    }

    pub fn boolean(field: impl Into<FieldAccessor>) -> Self {
        Self::Boolean(BooleanColumn {
            common: ColumnCommon::default(),
            field: field.into(),
            editable: false,
        })
    }

    pub fn list(field: impl Into<FieldAccessor>, items: Option<Vec<String>>) -> Self {
        Self::List(ListColumn {
            common: ColumnCommon::default(),
            field: field.into(),
            items,
            editable: Editable::Disabled,
        })
    }

    pub fn array(field: impl Into<FieldAccessor>, items: Option<Vec<String>>) -> Self {
        Self::Array(ArrayColumn {
            common: ColumnCommon::default(),
            field: field.into(),
            items,
            editable: Editable::Disabled,
        })
    }

    /// The type tag.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::RowNumber(_) => ColumnType::RowNumber,
            Self::Text(_) => ColumnType::Text,
            Self::Date(_) => ColumnType::Date,
            Self::Number(_) => ColumnType::Number,
            Self::Boolean(_) => ColumnType::Boolean,
            Self::Array(_) => ColumnType::Array,
            Self::List(_) => ColumnType::List,
        }
    }

    pub fn common(&self) -> &ColumnCommon {
        match self {
            Self::RowNumber(c) => &c.common,
            Self::Text(c) => &c.common,
            Self::Date(c) => &c.common,
            Self::Number(c) => &c.common,
            Self::Boolean(c) => &c.common,
            Self::Array(c) => &c.common,
            Self::List(c) => &c.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ColumnCommon {
        match self {
            Self::RowNumber(c) => &mut c.common,
            Self::Text(c) => &mut c.common,
            Self::Date(c) => &mut c.common,
            Self::Number(c) => &mut c.common,
            Self::Boolean(c) => &mut c.common,
            Self::Array(c) => &mut c.common,
            Self::List(c) => &mut c.common,
        }
    }

    /// Field accessor; `None` only for row-number columns.
    pub fn field(&self) -> Option<&FieldAccessor> {
        match self {
            Self::RowNumber(_) => None,
            Self::Text(c) => Some(&c.field),
            Self::Date(c) => Some(&c.field),
            Self::Number(c) => Some(&c.field),
            Self::Boolean(c) => Some(&c.field),
            Self::Array(c) => Some(&c.field),
            Self::List(c) => Some(&c.field),
        }
    }

    /// Whether the column is editable (`true` or an options object).
    pub fn is_editable(&self) -> bool {
        match self {
            Self::RowNumber(_) => false,
            Self::Text(c) => c.editable,
            Self::Date(c) => c.editable.is_enabled(),
            Self::Number(c) => c.editable.is_enabled(),
            Self::Boolean(c) => c.editable,
            Self::Array(c) => c.editable.is_enabled(),
            Self::List(c) => c.editable.is_enabled(),
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.common_mut().header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&CellContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.common_mut().formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.common_mut().header_icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.common_mut().sortable = Some(sortable);
        self
    }

    #[must_use]
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.common_mut().filterable = Some(filterable);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: bool) -> Self {
        self.common_mut().detail = detail;
        self
    }

    /// Turn editing on with default options. No effect on row-number columns.
    #[must_use]
    pub fn editable(mut self) -> Self {
        match &mut self {
            Self::RowNumber(_) => {}
            Self::Text(c) => c.editable = true,
            Self::Date(c) => c.editable = Editable::Enabled,
            Self::Number(c) => c.editable = Editable::Enabled,
            Self::Boolean(c) => c.editable = true,
            Self::Array(c) => c.editable = Editable::Enabled,
            Self::List(c) => c.editable = Editable::Enabled,
        }
        self
    }
}

impl From<RowNumberColumn> for ColumnDef {
    fn from(column: RowNumberColumn) -> Self {
        Self::RowNumber(column)
    }
}

impl From<TextColumn> for ColumnDef {
    fn from(column: TextColumn) -> Self {
        Self::Text(column)
    }
}

impl From<DateColumn> for ColumnDef {
    fn from(column: DateColumn) -> Self {
        Self::Date(column)
    }
}

impl From<NumberColumn> for ColumnDef {
    fn from(column: NumberColumn) -> Self {
        Self::Number(column)
    }
}

impl From<BooleanColumn> for ColumnDef {
    fn from(column: BooleanColumn) -> Self {
        Self::Boolean(column)
    }
}

impl From<ArrayColumn> for ColumnDef {
    fn from(column: ArrayColumn) -> Self {
        Self::Array(column)
    }
}

impl From<ListColumn> for ColumnDef {
    fn from(column: ListColumn) -> Self {
        Self::List(column)
    }
}
