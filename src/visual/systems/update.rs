// src/visual/systems/update.rs
//
// The update cycle: each `HostUpdateEvent` is normalized through the
// extractor, then the engine decides in order whether to rebuild the model,
// patch it in place, or leave it alone; whether to rebuild, rebind or merely
// refresh the view; and finally replays the remembered user intent, since a
// rebuilt ranking forgets its sort/group/filter state.

use bevy::prelude::*;
use std::sync::Arc;

use crate::host::HostPalette;
use crate::ranking::model::{NumberFilter, RankedTableModel};
use crate::ranking::view::ViewFactory;
use crate::visual::definitions::ColumnKind;
use crate::visual::events::{HostTeardownEvent, HostUpdateEvent, VisualFeedback};
use crate::visual::extract::extract;
use crate::visual::resources::VisualState;
use crate::visual::settings::VisualSettings;

pub fn handle_host_update(
    mut events: EventReader<HostUpdateEvent>,
    mut state: ResMut<VisualState>,
    mut palette: ResMut<HostPalette>,
    factory: Res<ViewFactory>,
    mut feedback_writer: EventWriter<VisualFeedback>,
) {
    for event in events.read() {
        let old_settings = state.settings.clone();
        state.settings = match VisualSettings::from_payload(event.settings_payload.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Settings payload rejected: {}. Falling back to defaults.", e);
                feedback_writer.write(VisualFeedback {
                    message: format!("Settings payload rejected: {}", e),
                    is_error: true,
                });
                VisualSettings::default()
            }
        };

        // Normalize the incoming snapshot.
        let extracted = extract(&event.table, palette.0.as_mut(), &mut state.colors);

        // The host never hands back the same snapshot object, so pointer
        // identity is the data-change test; equal content in a fresh object
        // still counts as changed.
        let data_changed = !state
            .last_table
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, &event.table));

        // 1. Model identity: missing, or provider settings changed shape.
        let mut model_replaced = false;
        if state.model.is_none() || old_settings.provider != state.settings.provider {
            let mut model = RankedTableModel::new(
                extracted.rows.clone(),
                extracted.columns.clone(),
                state.settings.provider.clone(),
            );
            model.derive_default();
            if !extracted.sort_hints.is_empty() {
                model
                    .last_ranking()
                    .set_sort_criteria(extracted.sort_hints.clone());
                model.sort();
            }
            info!(
                "Rebuilt ranked-table model: {} columns, {} rows.",
                extracted.columns.len(),
                extracted.rows.len()
            );
            state.model = Some(model);
            model_replaced = true;
        } else if data_changed {
            // 2. New data, same model: merge the accepted-column list, then
            // repopulate the model's descriptors from it and re-supply rows.
            let prev_count = state.last_column_count;
            if let Some(removed) = state.reconcile_columns(prev_count, &extracted.columns) {
                state.prune_group_criteria(&removed.label);
            }
            let accepted = state.column_state.clone();
            if let Some(model) = state.model.as_mut() {
                model.clear_columns();
                for desc in &accepted {
                    model.push_desc(desc.clone());
                }
                model.set_data(extracted.rows.clone());
                model.derive_default();
            }
        }

        // 3. View identity: missing, or view settings changed shape.
        let view_replaced = state.view.is_none() || old_settings.view != state.settings.view;
        {
            let VisualState {
                model,
                view,
                settings,
                ..
            } = &mut *state;
            if let Some(model) = model.as_ref() {
                if view_replaced {
                    // The stale widget must release its subscriptions before
                    // the replacement exists.
                    if let Some(mut stale) = view.take() {
                        stale.destroy();
                    }
                    *view = Some(factory.0.create(model, &settings.view));
                } else if model_replaced {
                    if let Some(view) = view.as_mut() {
                        view.set_data_provider(model);
                    }
                } else if let Some(view) = view.as_mut() {
                    view.update(model);
                }
            }
        }

        // 4. A rebuilt ranking has forgotten the user's intent; replay it.
        if data_changed || model_replaced {
            replay_intent(&mut state);
        }

        state.last_table = Some(Arc::clone(&event.table));
        state.last_column_count = extracted.columns.len();
    }
}

/// Re-applies remembered sort criteria, the remembered numeric filter and
/// remembered group criteria onto the current ranking. Lookup misses are
/// silent no-ops; a filter whose column has left the dataset simply does not
/// reach the model.
fn replay_intent(state: &mut VisualState) {
    let VisualState {
        model,
        sort_criteria,
        group_criteria,
        group_sort_criteria,
        filter,
        ..
    } = &mut *state;
    let Some(model) = model.as_mut() else {
        return;
    };

    if !sort_criteria.is_empty() {
        model.last_ranking().set_sort_criteria(sort_criteria.clone());
        model.sort();
    }

    if let Some(remembered) = filter.as_ref() {
        let mut applied = false;
        if let Some(child) = model.last_ranking().child_by_label_mut(&remembered.label) {
            if child.desc.kind == ColumnKind::Number {
                child.set_filter(Some(NumberFilter {
                    min: remembered.min,
                    max: remembered.max,
                }));
                applied = true;
            }
        }
        if applied {
            model.sort();
            trace!("Replayed filter on '{}'.", remembered.label);
        }
    }

    if !group_criteria.is_empty() {
        model
            .last_ranking()
            .set_group_criteria(group_criteria.clone());
    }
    if !group_sort_criteria.is_empty() {
        model
            .last_ranking()
            .set_group_sort_criteria(group_sort_criteria.clone());
    }
}

pub fn handle_host_teardown(
    mut events: EventReader<HostTeardownEvent>,
    mut state: ResMut<VisualState>,
) {
    for _ in events.read() {
        if let Some(mut view) = state.view.take() {
            view.destroy();
        }
        state.model = None;
        state.last_table = None;
        state.last_column_count = 0;
        info!("Visual torn down; released view and model.");
    }
}
