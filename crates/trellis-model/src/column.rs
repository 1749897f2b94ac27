use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrellisError};

/// Semantic kind of a cognostic column as understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Continuous numeric values.
    Numeric,
    /// Whole-number values.
    Integer,
    /// Free text.
    String,
    /// Calendar dates.
    Date,
    /// Date and time of day.
    Datetime,
    /// Categorical values drawn from an ordered set of levels.
    Factor,
    /// Links rendered as anchors.
    Href,
    /// Panel identifier.
    Key,
}

impl ColumnKind {
    /// All kinds in declaration order.
    pub const ALL: [ColumnKind; 8] = [
        ColumnKind::Numeric,
        ColumnKind::Integer,
        ColumnKind::String,
        ColumnKind::Date,
        ColumnKind::Datetime,
        ColumnKind::Factor,
        ColumnKind::Href,
        ColumnKind::Key,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Integer => "integer",
            ColumnKind::String => "string",
            ColumnKind::Date => "date",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Factor => "factor",
            ColumnKind::Href => "href",
            ColumnKind::Key => "key",
        }
    }

    /// Returns true if values of this kind are stored as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric | ColumnKind::Integer)
    }

    /// Returns true if raw values of this kind must keep their original text.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            ColumnKind::String | ColumnKind::Href | ColumnKind::Key | ColumnKind::Factor
        )
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    /// Case-insensitive; accepts a few common aliases (`categorical`, `number`, `text`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" | "number" | "double" => Ok(ColumnKind::Numeric),
            "integer" | "int" => Ok(ColumnKind::Integer),
            "string" | "text" | "character" => Ok(ColumnKind::String),
            "date" => Ok(ColumnKind::Date),
            "datetime" | "time" | "timestamp" => Ok(ColumnKind::Datetime),
            "factor" | "categorical" => Ok(ColumnKind::Factor),
            "href" | "url" => Ok(ColumnKind::Href),
            "key" | "panelkey" => Ok(ColumnKind::Key),
            _ => Err(format!("Unknown column kind: {}", s)),
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Metadata describing one cognostic column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    /// Ordered level labels; only populated for factor columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub filterable: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub sortable: bool,
}

impl ColumnMeta {
    /// Create a non-factor column. Use [`ColumnMeta::factor`] for categorical columns.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            levels: Vec::new(),
            description: None,
            group: None,
            filterable: true,
            sortable: true,
        }
    }

    /// Create a factor column with the given ordered levels.
    pub fn factor<I, S>(name: impl Into<String>, levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let column = Self {
            levels: levels.into_iter().map(Into::into).collect(),
            ..Self::new(name, ColumnKind::Factor)
        };
        column.validate()?;
        Ok(column)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    #[must_use]
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn is_factor(&self) -> bool {
        self.kind == ColumnKind::Factor
    }

    /// Check the per-column invariants: a name, and levels iff the column is a factor.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrellisError::EmptyColumnName);
        }
        match (self.is_factor(), self.levels.is_empty()) {
            (true, true) => Err(TrellisError::EmptyLevels {
                column: self.name.clone(),
            }),
            (false, false) => Err(TrellisError::UnexpectedLevels {
                column: self.name.clone(),
                kind: self.kind.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// 0-based position of the first level equal to `label`.
    pub fn level_position(&self, label: &str) -> Option<usize> {
        self.levels.iter().position(|level| level == label)
    }

    /// Resolve a 1-based serialized code the way the viewer does (`levels[code - 1]`).
    pub fn level_label(&self, code: u32) -> Option<&str> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        self.levels.get(index).map(String::as_str)
    }
}
