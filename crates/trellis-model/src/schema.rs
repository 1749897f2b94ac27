use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column::ColumnMeta;
use crate::error::{Result, TrellisError};

/// Ordered, validated set of column metadata.
///
/// Column names are unique and every column satisfies
/// [`ColumnMeta::validate`]. Declaration order is the order in which
/// columns appear in every serialized row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaRepr", into = "Vec<ColumnMeta>")]
pub struct Schema {
    columns: Vec<ColumnMeta>,
    index: BTreeMap<String, usize>,
}

/// Accepted on-disk shapes: `{"columns": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaRepr {
    Wrapped { columns: Vec<ColumnMeta> },
    Bare(Vec<ColumnMeta>),
}

impl TryFrom<SchemaRepr> for Schema {
    type Error = TrellisError;

    fn try_from(repr: SchemaRepr) -> Result<Self> {
        match repr {
            SchemaRepr::Wrapped { columns } | SchemaRepr::Bare(columns) => Schema::new(columns),
        }
    }
}

impl From<Schema> for Vec<ColumnMeta> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}

impl Schema {
    pub fn new(columns: Vec<ColumnMeta>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (position, column) in columns.iter().enumerate() {
            column.validate()?;
            if index.insert(column.name.clone(), position).is_some() {
                return Err(TrellisError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }
        Ok(Self { columns, index })
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.position(name).map(|position| &self.columns[position])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of factor columns.
    pub fn factor_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_factor()).count()
    }
}
