//! Column type tags.

use serde::{Deserialize, Serialize};

/// Type tag of a column definition.
///
/// Serialized in camelCase (`rowNumber`, `text`, ...) to match column
/// schemas written by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    RowNumber,
    #[default]
    Text,
    Date,
    Number,
    Boolean,
    Array,
    List,
}

impl ColumnType {
    /// All column types, in declaration order.
    pub const ALL: [ColumnType; 7] = [
        Self::RowNumber,
        Self::Text,
        Self::Date,
        Self::Number,
        Self::Boolean,
        Self::Array,
        Self::List,
    ];

    /// Schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RowNumber => "rowNumber",
            Self::Text => "text",
            Self::Date => "date",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::List => "list",
        }
    }

    /// Whether cells of this type hold a set of candidate items.
    #[inline]
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Array | Self::List)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        for ty in ColumnType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn test_default_is_text() {
        assert_eq!(ColumnType::default(), ColumnType::Text);
    }
}
