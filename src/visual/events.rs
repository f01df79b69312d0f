// src/visual/events.rs

use bevy::prelude::*;
use serde_json::Value;
use std::sync::Arc;

use crate::host::TableSnapshot;
use crate::visual::definitions::{GroupCriterion, SortCriterion};

/// One host update cycle: a fresh table snapshot plus the raw settings
/// payload from the property pane, if any. The host never re-delivers the
/// same snapshot object; snapshot identity (the `Arc` pointer) is what the
/// engine's data-change test compares.
#[derive(Event, Debug, Clone)]
pub struct HostUpdateEvent {
    pub table: Arc<TableSnapshot>,
    pub settings_payload: Option<Value>,
}

/// Host teardown callback: release the view and the model.
#[derive(Event, Debug, Clone)]
pub struct HostTeardownEvent;

/// User dragged a column to a new position in the widget. Indices address
/// the ranking's full child list, structural prefix included.
#[derive(Event, Debug, Clone)]
pub struct ColumnMovedEvent {
    pub from: usize,
    pub to: usize,
}

/// User removed a column from the widget.
#[derive(Event, Debug, Clone)]
pub struct ColumnRemovedEvent {
    pub label: String,
}

/// User changed the ranking's sort order.
#[derive(Event, Debug, Clone)]
pub struct SortChangedEvent {
    pub criteria: Vec<SortCriterion>,
}

/// User changed the active grouping columns.
#[derive(Event, Debug, Clone)]
pub struct GroupChangedEvent {
    pub criteria: Vec<GroupCriterion>,
}

/// User changed the sort order applied within groups.
#[derive(Event, Debug, Clone)]
pub struct GroupSortChangedEvent {
    pub criteria: Vec<SortCriterion>,
}

/// User changed a column's numeric filter. `None` clears it.
#[derive(Event, Debug, Clone)]
pub struct FilterChangedEvent {
    pub label: String,
    pub range: Option<[f64; 2]>,
}

/// Outcome feedback surfaced to the host (status line, debug overlay).
#[derive(Event, Debug, Clone)]
pub struct VisualFeedback {
    pub message: String,
    pub is_error: bool,
}
