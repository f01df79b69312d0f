// src/visual/systems/gestures.rs
//
// Intent capture: widget gestures arrive as events, are applied to the live
// ranking, and leave a durable trace in `VisualState` so the engine can
// replay them after the next rebuild. Handlers are registered once at plugin
// build, so a gesture is never processed twice.

use bevy::prelude::*;

use crate::ranking::model::NumberFilter;
use crate::visual::definitions::FilterInfo;
use crate::visual::events::{
    ColumnMovedEvent, ColumnRemovedEvent, FilterChangedEvent, GroupChangedEvent,
    GroupSortChangedEvent, SortChangedEvent, VisualFeedback,
};
use crate::visual::resources::VisualState;

pub fn handle_column_moved(
    mut events: EventReader<ColumnMovedEvent>,
    mut state: ResMut<VisualState>,
    mut feedback_writer: EventWriter<VisualFeedback>,
) {
    for event in events.read() {
        let VisualState {
            model,
            column_state,
            ..
        } = &mut *state;
        let Some(model) = model.as_mut() else {
            continue;
        };
        match model.last_ranking().move_child(event.from, event.to) {
            Ok(()) => {
                // Discard the remembered order and recapture it in full from
                // the ranking's dataset children.
                *column_state = model
                    .ranking()
                    .children()
                    .iter()
                    .filter(|c| !c.is_structural())
                    .map(|c| c.desc.clone())
                    .collect();
                info!(
                    "Column moved {} -> {}; recaptured order of {} columns.",
                    event.from,
                    event.to,
                    column_state.len()
                );
            }
            Err(e) => {
                warn!("Column move rejected: {}", e);
                feedback_writer.write(VisualFeedback {
                    message: format!("Column move rejected: {}", e),
                    is_error: true,
                });
            }
        }
    }
}

pub fn handle_column_removed(
    mut events: EventReader<ColumnRemovedEvent>,
    mut state: ResMut<VisualState>,
) {
    for event in events.read() {
        if let Some(model) = state.model.as_mut() {
            if model.last_ranking().remove_child(&event.label).is_some() {
                // The accepted-column list reconciles on the next data cycle.
                trace!("Column '{}' removed from the ranking.", event.label);
            }
        }
    }
}

pub fn handle_sort_changed(
    mut events: EventReader<SortChangedEvent>,
    mut state: ResMut<VisualState>,
) {
    for event in events.read() {
        // Wholesale replacement of the remembered criteria.
        state.sort_criteria = event.criteria.clone();
        if let Some(model) = state.model.as_mut() {
            model.last_ranking().set_sort_criteria(event.criteria.clone());
            model.sort();
        }
        trace!("Remembered {} sort criteria.", event.criteria.len());
    }
}

pub fn handle_group_changed(
    mut events: EventReader<GroupChangedEvent>,
    mut state: ResMut<VisualState>,
) {
    for event in events.read() {
        if let Some(model) = state.model.as_mut() {
            model.last_ranking().set_group_criteria(event.criteria.clone());
        }
        state.merge_group_criteria(&event.criteria);
    }
}

pub fn handle_group_sort_changed(
    mut events: EventReader<GroupSortChangedEvent>,
    mut state: ResMut<VisualState>,
) {
    for event in events.read() {
        if let Some(model) = state.model.as_mut() {
            model
                .last_ranking()
                .set_group_sort_criteria(event.criteria.clone());
        }
        state.merge_group_sort_criteria(&event.criteria);
    }
}

pub fn handle_filter_changed(
    mut events: EventReader<FilterChangedEvent>,
    mut state: ResMut<VisualState>,
) {
    for event in events.read() {
        let VisualState { model, filter, .. } = &mut *state;
        let Some(model) = model.as_mut() else {
            continue;
        };
        let mut applied = false;
        if let Some(child) = model.last_ranking().child_by_label_mut(&event.label) {
            child.set_filter(event.range.map(|[min, max]| NumberFilter { min, max }));
            applied = true;
        }
        if applied {
            model.sort();
        }
        // Scan all ranking children; the last one reporting itself filtered
        // becomes the single remembered filter.
        let mut remembered = None;
        for child in model.ranking().children() {
            if let Some(f) = child.filter() {
                remembered = Some(FilterInfo {
                    label: child.label().to_string(),
                    min: f.min,
                    max: f.max,
                });
            }
        }
        *filter = remembered;
    }
}
