// src/visual/plugin.rs

use bevy::prelude::*;

use super::events::{
    ColumnMovedEvent, ColumnRemovedEvent, FilterChangedEvent, GroupChangedEvent,
    GroupSortChangedEvent, HostTeardownEvent, HostUpdateEvent, SortChangedEvent, VisualFeedback,
};
use super::resources::VisualState;
use super::systems::gestures::{
    handle_column_moved, handle_column_removed, handle_filter_changed, handle_group_changed,
    handle_group_sort_changed, handle_sort_changed,
};
use super::systems::update::{handle_host_teardown, handle_host_update};
use crate::host::HostPalette;
use crate::ranking::view::ViewFactory;

// Define system sets for ordering
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum VisualSystemSet {
    UserGestures, // Systems capturing widget gesture events
    HostUpdate,   // Systems running the host update cycle
}

/// Plugin wiring the ranked-table visual into a host `App`.
pub struct RankedTablePlugin;

impl Plugin for RankedTablePlugin {
    fn build(&self, app: &mut App) {
        // Configure system sets for ordering: gestures settle before the
        // update cycle consumes the state they left behind.
        app.configure_sets(
            Update,
            (
                VisualSystemSet::UserGestures,
                VisualSystemSet::HostUpdate.after(VisualSystemSet::UserGestures),
            ),
        );

        // --- Resource Initialization ---
        // The host may insert its own palette or view factory beforehand;
        // these only fill the gaps.
        app.init_resource::<VisualState>();
        app.init_resource::<HostPalette>();
        app.init_resource::<ViewFactory>();

        // --- Event Registration ---
        app.add_event::<HostUpdateEvent>()
            .add_event::<HostTeardownEvent>()
            .add_event::<ColumnMovedEvent>()
            .add_event::<ColumnRemovedEvent>()
            .add_event::<SortChangedEvent>()
            .add_event::<GroupChangedEvent>()
            .add_event::<GroupSortChangedEvent>()
            .add_event::<FilterChangedEvent>()
            .add_event::<VisualFeedback>();

        // --- Update Systems (Organized into Sets) ---
        app.add_systems(
            Update,
            (
                handle_column_moved,
                handle_column_removed,
                handle_sort_changed,
                handle_group_changed,
                handle_group_sort_changed,
                handle_filter_changed,
            )
                .chain()
                .in_set(VisualSystemSet::UserGestures),
        );
        app.add_systems(
            Update,
            (handle_host_update, handle_host_teardown)
                .chain()
                .in_set(VisualSystemSet::HostUpdate),
        );

        info!("RankedTablePlugin initialized.");
    }
}
