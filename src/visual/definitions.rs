// src/visual/definitions.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Semantic kind of a column, inferred once from the host's type tag and
/// then fixed for the session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub enum ColumnKind {
    #[default]
    String,
    Boolean,
    Number,
    Date,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Synthetic in-session identity for an accepted column. The host only ever
/// correlates columns by display label, which is neither unique nor stable;
/// the id makes references between the column-state list and live ranking
/// columns unambiguous for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(Uuid);

impl ColumnId {
    pub fn new() -> Self {
        ColumnId(Uuid::new_v4())
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        ColumnId::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One member of a categorical column's enumeration, in host-declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub value: String,
}

/// One accepted column of the ranked table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    /// Display name; the only correlation key across snapshots.
    pub label: String,
    pub kind: ColumnKind,
    /// Position in the snapshot that most recently carried this column.
    /// Volatile; refreshed on reconciliation, never used as identity.
    pub source_index: usize,
    /// Palette color; present only for number columns.
    #[serde(default)]
    pub color: Option<String>,
    /// [min, max] over the current snapshot's rows; NaN bounds when the
    /// snapshot had no rows. Present only for number columns.
    #[serde(default)]
    pub domain: Option<[f64; 2]>,
    /// Enumeration members; populated only for categorical columns.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ColumnDescriptor {
    pub fn new_basic(label: impl Into<String>, kind: ColumnKind, source_index: usize) -> Self {
        ColumnDescriptor {
            id: ColumnId::new(),
            label: label.into(),
            kind,
            source_index,
            color: None,
            domain: None,
            categories: Vec::new(),
        }
    }
}

/// One entry of the ranking's sort order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub label: String,
    pub ascending: bool,
}

/// One active grouping column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCriterion {
    pub label: String,
}

/// The single remembered numeric filter (last filter wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInfo {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

/// One cell of a host row. Rows pass through the engine untouched except for
/// numeric-domain computation during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One host row: cells addressed by the host column `index`.
pub type Row = Vec<CellValue>;
