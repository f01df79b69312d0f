// src/ranking/view.rs
//
// The widget side of the rendering library boundary. The engine only ever
// talks to a `TableView` through this trait: it constructs views through the
// installed factory, rebinds them when the model is replaced, and destroys
// them before building a replacement. Actual rendering lives outside this
// crate.

use bevy::prelude::*;

use super::model::RankedTableModel;
use crate::visual::settings::ViewSettings;

/// Rendering surface bound to a ranked-table model.
pub trait TableView: Send + Sync {
    /// Lightweight redraw against the current model state.
    fn update(&mut self, model: &RankedTableModel);
    /// Rebind to a replacement model without tearing the widget down.
    fn set_data_provider(&mut self, model: &RankedTableModel);
    /// Release the widget's internal subscriptions. Called exactly once,
    /// before a replacement view is constructed or on teardown.
    fn destroy(&mut self);
}

/// Constructs views. The host installs its rendering frontend here; the
/// default builds headless views.
pub trait TableViewFactory: Send + Sync {
    fn create(&self, model: &RankedTableModel, settings: &ViewSettings) -> Box<dyn TableView>;
}

/// Resource wrapping the installed view factory.
#[derive(Resource)]
pub struct ViewFactory(pub Box<dyn TableViewFactory>);

impl Default for ViewFactory {
    fn default() -> Self {
        ViewFactory(Box::new(HeadlessViewFactory))
    }
}

/// View that renders nothing and counts lifecycle calls.
#[derive(Debug, Default)]
pub struct HeadlessView {
    pub updates: usize,
    pub rebinds: usize,
    pub destroyed: bool,
}

impl TableView for HeadlessView {
    fn update(&mut self, model: &RankedTableModel) {
        self.updates += 1;
        trace!(
            "Headless view refresh: {} columns, {} visible rows.",
            model.columns().len(),
            model.view_order().len()
        );
    }

    fn set_data_provider(&mut self, model: &RankedTableModel) {
        self.rebinds += 1;
        trace!(
            "Headless view rebound to a model with {} columns.",
            model.columns().len()
        );
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

pub struct HeadlessViewFactory;

impl TableViewFactory for HeadlessViewFactory {
    fn create(&self, model: &RankedTableModel, settings: &ViewSettings) -> Box<dyn TableView> {
        info!(
            "Creating headless view ({} columns, side_panel: {}).",
            model.columns().len(),
            settings.side_panel
        );
        Box::new(HeadlessView::default())
    }
}
