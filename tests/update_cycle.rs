// tests/update_cycle.rs
// Drives the full plugin through a Bevy App: host update events in, gesture
// events in, accepted-column state / remembered criteria / view lifecycle
// observed on the resource.

use bevy::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

use rankboard::host::{HostColumn, TableSnapshot, TypeDescriptor};
use rankboard::visual::definitions::{
    CellValue, ColumnDescriptor, ColumnKind, GroupCriterion, SortCriterion,
};
use rankboard::visual::events::{
    ColumnMovedEvent, FilterChangedEvent, GroupChangedEvent, HostTeardownEvent, HostUpdateEvent,
    SortChangedEvent,
};
use rankboard::{
    RankedTableModel, RankedTablePlugin, TableView, TableViewFactory, ViewFactory, VisualState,
};

#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    fn calls(&self) -> Vec<&'static str> {
        self.0.lock().expect("log lock").clone()
    }

    fn push(&self, call: &'static str) {
        self.0.lock().expect("log lock").push(call);
    }
}

struct RecordingView(CallLog);

impl TableView for RecordingView {
    fn update(&mut self, _model: &RankedTableModel) {
        self.0.push("update");
    }

    fn set_data_provider(&mut self, _model: &RankedTableModel) {
        self.0.push("rebind");
    }

    fn destroy(&mut self) {
        self.0.push("destroy");
    }
}

struct RecordingFactory(CallLog);

impl TableViewFactory for RecordingFactory {
    fn create(
        &self,
        _model: &RankedTableModel,
        _settings: &rankboard::visual::settings::ViewSettings,
    ) -> Box<dyn TableView> {
        self.0.push("create");
        Box::new(RecordingView(self.0.clone()))
    }
}

fn test_app() -> (App, CallLog) {
    let mut app = App::new();
    let log = CallLog::default();
    app.insert_resource(ViewFactory(Box::new(RecordingFactory(log.clone()))));
    app.add_plugins(RankedTablePlugin);
    (app, log)
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn sales_columns() -> Vec<HostColumn> {
    vec![
        HostColumn::new("Name", 0),
        HostColumn::new("Revenue", 1).with_type(TypeDescriptor::Numeric),
    ]
}

fn sales_rows() -> Vec<Vec<CellValue>> {
    vec![
        vec![text("alpha"), num(5.0)],
        vec![text("beta"), num(1.0)],
        vec![text("gamma"), num(9.0)],
    ]
}

fn sales_table() -> Arc<TableSnapshot> {
    Arc::new(TableSnapshot {
        rows: sales_rows(),
        columns: sales_columns(),
    })
}

fn send_update(app: &mut App, table: &Arc<TableSnapshot>) {
    app.world_mut().send_event(HostUpdateEvent {
        table: Arc::clone(table),
        settings_payload: None,
    });
    app.update();
}

fn send_update_with_settings(app: &mut App, table: &Arc<TableSnapshot>, payload: serde_json::Value) {
    app.world_mut().send_event(HostUpdateEvent {
        table: Arc::clone(table),
        settings_payload: Some(payload),
    });
    app.update();
}

fn accepted_labels(app: &App) -> Vec<String> {
    app.world()
        .resource::<VisualState>()
        .column_state
        .iter()
        .map(|c| c.label.clone())
        .collect()
}

#[test]
fn first_update_builds_model_and_view() {
    let (mut app, log) = test_app();
    send_update(&mut app, &sales_table());

    let state = app.world().resource::<VisualState>();
    let model = state.model().expect("model built on first cycle");
    assert_eq!(model.columns().len(), 2);
    assert_eq!(model.data().len(), 3);
    // Structural prefix plus one child per dataset column.
    assert_eq!(model.ranking().children().len(), 5);
    assert_eq!(log.calls(), vec!["create"]);
}

#[test]
fn identical_content_with_fresh_identity_stays_stable() {
    let (mut app, _log) = test_app();
    send_update(&mut app, &sales_table());
    send_update(&mut app, &sales_table());
    let after_second = accepted_labels(&app);

    send_update(&mut app, &sales_table());
    let after_third = accepted_labels(&app);

    // Every fresh snapshot object counts as a data change, but the accepted
    // order and remembered criteria must not drift.
    assert_eq!(after_second, after_third);
    let state = app.world().resource::<VisualState>();
    assert!(state.sort_criteria.is_empty());
    assert!(state.group_criteria.is_empty());
    assert!(state.filter.is_none());
}

#[test]
fn grown_snapshot_appends_the_new_column() {
    let (mut app, _log) = test_app();
    send_update(&mut app, &sales_table());

    {
        let mut state = app.world_mut().resource_mut::<VisualState>();
        state.column_state = vec![
            ColumnDescriptor::new_basic("Name", ColumnKind::String, 0),
            ColumnDescriptor::new_basic("Revenue", ColumnKind::Number, 1),
        ];
    }

    let mut columns = sales_columns();
    columns.push(HostColumn::new("Profit", 2).with_type(TypeDescriptor::Numeric));
    let grown = Arc::new(TableSnapshot {
        rows: vec![vec![text("alpha"), num(5.0), num(2.0)]],
        columns,
    });
    send_update(&mut app, &grown);

    assert_eq!(accepted_labels(&app), vec!["Name", "Revenue", "Profit"]);
    // The model's descriptors are repopulated from the accepted list.
    let state = app.world().resource::<VisualState>();
    let labels: Vec<&str> = state
        .model()
        .expect("model")
        .columns()
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Name", "Revenue", "Profit"]);
}

#[test]
fn shrunk_snapshot_drops_the_absent_column_and_prunes_groups() {
    let (mut app, _log) = test_app();
    let three = Arc::new(TableSnapshot {
        rows: vec![],
        columns: vec![
            HostColumn::new("A", 0),
            HostColumn::new("B", 1),
            HostColumn::new("C", 2),
        ],
    });
    send_update(&mut app, &three);

    {
        let mut state = app.world_mut().resource_mut::<VisualState>();
        state.column_state = vec![
            ColumnDescriptor::new_basic("A", ColumnKind::String, 0),
            ColumnDescriptor::new_basic("B", ColumnKind::String, 1),
            ColumnDescriptor::new_basic("C", ColumnKind::String, 2),
        ];
        state.group_criteria = vec![
            GroupCriterion {
                label: "B".to_string(),
            },
            GroupCriterion {
                label: "C".to_string(),
            },
        ];
        state.group_sort_criteria = vec![SortCriterion {
            label: "B".to_string(),
            ascending: true,
        }];
    }

    let two = Arc::new(TableSnapshot {
        rows: vec![],
        columns: vec![HostColumn::new("A", 0), HostColumn::new("C", 1)],
    });
    send_update(&mut app, &two);

    assert_eq!(accepted_labels(&app), vec!["A", "C"]);
    let state = app.world().resource::<VisualState>();
    assert_eq!(state.group_criteria.len(), 1);
    assert_eq!(state.group_criteria[0].label, "C");
    assert!(state.group_sort_criteria.is_empty());
    // The surviving entry carries the new snapshot's position.
    assert_eq!(state.column_state[1].source_index, 1);
}

#[test]
fn filter_is_replayed_while_its_column_survives() {
    let (mut app, _log) = test_app();
    send_update(&mut app, &sales_table());

    app.world_mut().send_event(FilterChangedEvent {
        label: "Revenue".to_string(),
        range: Some([2.0, 10.0]),
    });
    app.update();

    {
        let state = app.world().resource::<VisualState>();
        let remembered = state.filter.as_ref().expect("filter remembered");
        assert_eq!(remembered.label, "Revenue");
        assert_eq!((remembered.min, remembered.max), (2.0, 10.0));
    }

    // A data cycle rebuilds the ranking; the filter must come back.
    send_update(&mut app, &sales_table());
    {
        let state = app.world().resource::<VisualState>();
        let model = state.model().expect("model");
        let child = model
            .ranking()
            .children()
            .iter()
            .find(|c| c.label() == "Revenue")
            .expect("revenue child");
        let filter = child.filter().expect("filter replayed");
        assert_eq!((filter.min, filter.max), (2.0, 10.0));
        // Rows 5.0 and 9.0 pass; 1.0 does not.
        assert_eq!(model.view_order(), &[0, 2]);
    }

    // Once the column is gone, no filter reaches the model.
    let name_only = Arc::new(TableSnapshot {
        rows: vec![vec![text("alpha")]],
        columns: vec![HostColumn::new("Name", 0)],
    });
    send_update(&mut app, &name_only);
    let state = app.world().resource::<VisualState>();
    let model = state.model().expect("model");
    assert!(model.ranking().children().iter().all(|c| !c.is_filtered()));
    // The memory itself survives in case the column returns.
    assert!(state.filter.is_some());
}

#[test]
fn sort_gesture_is_remembered_and_survives_rebuild() {
    let (mut app, _log) = test_app();
    send_update(&mut app, &sales_table());

    app.world_mut().send_event(SortChangedEvent {
        criteria: vec![SortCriterion {
            label: "Revenue".to_string(),
            ascending: false,
        }],
    });
    app.update();

    send_update(&mut app, &sales_table());
    let state = app.world().resource::<VisualState>();
    assert_eq!(state.sort_criteria.len(), 1);
    let model = state.model().expect("model");
    assert_eq!(model.ranking().sort_criteria(), state.sort_criteria.as_slice());
    // Revenue descending: 9.0, 5.0, 1.0.
    assert_eq!(model.view_order(), &[2, 0, 1]);
}

#[test]
fn group_gestures_accumulate_and_survive_rebuild() {
    let (mut app, _log) = test_app();
    send_update(&mut app, &sales_table());

    app.world_mut().send_event(GroupChangedEvent {
        criteria: vec![GroupCriterion {
            label: "Name".to_string(),
        }],
    });
    app.update();
    app.world_mut().send_event(GroupChangedEvent {
        criteria: vec![GroupCriterion {
            label: "Revenue".to_string(),
        }],
    });
    app.update();

    // Groupings merge by label; earlier ones are never dropped by a gesture.
    {
        let state = app.world().resource::<VisualState>();
        let labels: Vec<&str> = state.group_criteria.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Name", "Revenue"]);
    }

    send_update(&mut app, &sales_table());
    let state = app.world().resource::<VisualState>();
    let model = state.model().expect("model");
    assert_eq!(model.ranking().group_criteria(), state.group_criteria.as_slice());
}

#[test]
fn move_gesture_recaptures_the_accepted_order() {
    let (mut app, _log) = test_app();
    let three = Arc::new(TableSnapshot {
        rows: vec![],
        columns: vec![
            HostColumn::new("A", 0),
            HostColumn::new("B", 1),
            HostColumn::new("C", 2),
        ],
    });
    send_update(&mut app, &three);

    // Children: three structural columns, then A (3), B (4), C (5).
    app.world_mut().send_event(ColumnMovedEvent { from: 5, to: 3 });
    app.update();

    assert_eq!(accepted_labels(&app), vec!["C", "A", "B"]);
}

#[test]
fn view_lifecycle_follows_settings_and_model_changes() {
    let (mut app, log) = test_app();
    send_update(&mut app, &sales_table());
    assert_eq!(log.calls(), vec!["create"]);

    // View settings changed: the stale view is destroyed first.
    send_update_with_settings(
        &mut app,
        &sales_table(),
        json!({ "view": { "side_panel": false } }),
    );
    assert_eq!(log.calls(), vec!["create", "destroy", "create"]);

    // Same settings, new data: a lightweight refresh.
    send_update_with_settings(
        &mut app,
        &sales_table(),
        json!({ "view": { "side_panel": false } }),
    );
    assert_eq!(log.calls(), vec!["create", "destroy", "create", "update"]);

    // Provider settings changed: the model is rebuilt and the surviving
    // view is rebound to it.
    send_update_with_settings(
        &mut app,
        &sales_table(),
        json!({
            "provider": { "single_selection": true },
            "view": { "side_panel": false }
        }),
    );
    assert_eq!(
        log.calls(),
        vec!["create", "destroy", "create", "update", "rebind"]
    );
}

#[test]
fn teardown_destroys_the_view_and_drops_the_model() {
    let (mut app, log) = test_app();
    send_update(&mut app, &sales_table());

    app.world_mut().send_event(HostTeardownEvent);
    app.update();

    assert_eq!(log.calls(), vec!["create", "destroy"]);
    let state = app.world().resource::<VisualState>();
    assert!(state.model().is_none());
}

#[test]
fn number_columns_keep_monotonic_palette_slots_across_cycles() {
    let (mut app, _log) = test_app();
    send_update(&mut app, &sales_table());

    let revenue_color = {
        let state = app.world().resource::<VisualState>();
        state.model().expect("model").columns()[1]
            .color
            .clone()
            .expect("number column has a color")
    };

    let mut columns = sales_columns();
    columns.push(HostColumn::new("Profit", 2).with_type(TypeDescriptor::Numeric));
    let grown = Arc::new(TableSnapshot {
        rows: vec![vec![text("alpha"), num(5.0), num(2.0)]],
        columns,
    });
    send_update(&mut app, &grown);

    let state = app.world().resource::<VisualState>();
    assert_eq!(state.colors.assigned_count(), 2);
    let profit = &state.column_state[0];
    assert_eq!(profit.label, "Profit");
    let profit_color = profit.color.clone().expect("color assigned");
    assert_ne!(profit_color, revenue_color);
}
