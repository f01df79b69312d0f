// src/visual/extract.rs
//
// Snapshot extraction: normalizes one host-delivered flat table into column
// descriptors with inferred kinds, numeric domains and category lists, plus
// the host's explicit sort hints. Pure over well-formed input; no model or
// widget knowledge belongs here.

use std::collections::HashMap;

use crate::host::{ColorPalette, HostColumn, SortDirection, TableSnapshot, TypeDescriptor};
use crate::visual::definitions::{
    Category, CellValue, ColumnDescriptor, ColumnKind, Row, SortCriterion,
};

/// Result of normalizing one snapshot.
#[derive(Debug, Clone)]
pub struct TableExtract {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnDescriptor>,
    /// Host-declared sort directives, ordered by sort priority ascending.
    pub sort_hints: Vec<SortCriterion>,
}

/// Session-wide record of palette assignments to number columns. The cursor
/// advances only when a previously unseen column needs a color and is never
/// reset or reclaimed, so the n-th distinct number column of the session
/// receives the n-th palette color even after earlier columns disappear,
/// and a reappearing column keeps its original color.
#[derive(Debug, Clone, Default)]
pub struct ColorLedger {
    assigned: HashMap<String, String>,
    cursor: usize,
}

impl ColorLedger {
    pub fn color_for(&mut self, label: &str, palette: &mut dyn ColorPalette) -> String {
        if let Some(color) = self.assigned.get(label) {
            return color.clone();
        }
        let color = palette.color_for(&self.cursor.to_string());
        self.cursor += 1;
        self.assigned.insert(label.to_string(), color.clone());
        color
    }

    /// Number of distinct number columns assigned so far.
    pub fn assigned_count(&self) -> usize {
        self.cursor
    }
}

/// Normalizes a snapshot, drawing colors for number columns from the
/// session-wide ledger.
pub fn extract(
    table: &TableSnapshot,
    palette: &mut dyn ColorPalette,
    colors: &mut ColorLedger,
) -> TableExtract {
    let rows = table.rows.clone();

    let columns = table
        .columns
        .iter()
        .map(|col| {
            let kind = infer_kind(col);
            let mut desc = ColumnDescriptor::new_basic(col.display_name.clone(), kind, col.index);
            match kind {
                ColumnKind::Number => {
                    desc.color = Some(colors.color_for(&col.display_name, palette));
                    desc.domain = Some(numeric_domain(&rows, col.index));
                }
                ColumnKind::Categorical => {
                    if let Some(TypeDescriptor::Enumeration(members)) = &col.type_descriptor {
                        desc.categories = members
                            .iter()
                            .map(|m| Category {
                                label: m.display_name.clone(),
                                value: m.value.clone(),
                            })
                            .collect();
                    }
                }
                _ => {}
            }
            desc
        })
        .collect();

    let mut hinted: Vec<&HostColumn> =
        table.columns.iter().filter(|c| c.sort.is_some()).collect();
    hinted.sort_by_key(|c| c.sort_order.unwrap_or(0));
    let sort_hints = hinted
        .into_iter()
        .map(|c| SortCriterion {
            label: c.display_name.clone(),
            ascending: c.sort == Some(SortDirection::Ascending),
        })
        .collect();

    TableExtract {
        rows,
        columns,
        sort_hints,
    }
}

/// Maps the host type tag to a column kind, first match wins. Row
/// identifiers are always strings regardless of their declared type.
pub(crate) fn infer_kind(col: &HostColumn) -> ColumnKind {
    let descriptor = match &col.type_descriptor {
        Some(d) if !col.row_role => d,
        _ => return ColumnKind::String,
    };
    match descriptor {
        TypeDescriptor::Bool => ColumnKind::Boolean,
        TypeDescriptor::Integer | TypeDescriptor::Numeric => ColumnKind::Number,
        TypeDescriptor::DateTime => ColumnKind::Date,
        TypeDescriptor::Enumeration(_) => ColumnKind::Categorical,
    }
}

/// [min, max] over the numeric cells of one column. Yields the NaN sentinel
/// domain when the snapshot has no rows (or no numeric cells in them).
fn numeric_domain(rows: &[Row], index: usize) -> [f64; 2] {
    let mut min = f64::NAN;
    let mut max = f64::NAN;
    for row in rows {
        if let Some(v) = row.get(index).and_then(CellValue::as_number) {
            if min.is_nan() || v < min {
                min = v;
            }
            if max.is_nan() || v > max {
                max = v;
            }
        }
    }
    [min, max]
}
