// src/host.rs
//
// Inbound contract with the host application. This module defines only the
// shapes the host hands to the plugin (table snapshots, column metadata with
// semantic type tags, sort directives) and the color-palette service it
// provides at construction. No reconciliation logic belongs here.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::visual::definitions::Row;

/// Direction of a host-declared sort directive on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One member of a host enumeration type, in host-declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub display_name: String,
    pub value: String,
}

/// Semantic type tag the host's query layer attaches to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Bool,
    Integer,
    Numeric,
    DateTime,
    Enumeration(Vec<EnumMember>),
}

/// Column metadata as delivered by the host inside one snapshot.
///
/// `display_name` is the only correlation key the host offers across
/// snapshots; `index` is the position of the column's cells within each row
/// and is only valid for the snapshot that carried it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostColumn {
    pub display_name: String,
    pub index: usize,
    /// True when the host tagged this column as a row identifier.
    #[serde(default)]
    pub row_role: bool,
    #[serde(default)]
    pub type_descriptor: Option<TypeDescriptor>,
    #[serde(default)]
    pub sort: Option<SortDirection>,
    /// Host-declared sort priority; lower values sort first.
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl HostColumn {
    pub fn new(display_name: impl Into<String>, index: usize) -> Self {
        HostColumn {
            display_name: display_name.into(),
            index,
            row_role: false,
            type_descriptor: None,
            sort: None,
            sort_order: None,
        }
    }

    pub fn with_type(mut self, type_descriptor: TypeDescriptor) -> Self {
        self.type_descriptor = Some(type_descriptor);
        self
    }
}

/// One host-delivered flat table: ordered rows plus ordered column metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    #[serde(default)]
    pub rows: Vec<Row>,
    pub columns: Vec<HostColumn>,
}

/// Color service the host provides at construction. Keys are opaque strings;
/// the same key always yields the same color within a session.
pub trait ColorPalette: Send + Sync {
    fn color_for(&mut self, key: &str) -> String;
}

/// Deterministic fallback palette used when the host does not install one.
/// Colors are handed out in fixed order, one per previously unseen key, and
/// cached so repeat lookups stay stable.
#[derive(Debug, Default)]
pub struct ThemePalette {
    assigned: HashMap<String, String>,
}

const THEME_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
    "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

impl ColorPalette for ThemePalette {
    fn color_for(&mut self, key: &str) -> String {
        if let Some(color) = self.assigned.get(key) {
            return color.clone();
        }
        let color = THEME_COLORS[self.assigned.len() % THEME_COLORS.len()].to_string();
        self.assigned.insert(key.to_string(), color.clone());
        color
    }
}

/// Resource wrapping the host's palette service. The host may insert its own
/// implementation before adding the plugin; otherwise the theme palette is
/// used.
#[derive(Resource)]
pub struct HostPalette(pub Box<dyn ColorPalette>);

impl Default for HostPalette {
    fn default() -> Self {
        HostPalette(Box::new(ThemePalette::default()))
    }
}
