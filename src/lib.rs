// src/lib.rs

// --- Public Interface ---
// Declare modules first
pub mod error;
pub mod host;
pub mod ranking;
pub mod visual;

// Re-export the types a host application needs to embed the visual:
// the plugin itself, the inbound contract, and the view seam.
pub use error::VisualError;
pub use host::{ColorPalette, HostPalette, TableSnapshot, ThemePalette};
pub use ranking::{RankedTableModel, TableView, TableViewFactory, ViewFactory};
pub use visual::definitions::{ColumnDescriptor, ColumnKind};
pub use visual::events::{HostTeardownEvent, HostUpdateEvent, VisualFeedback};
pub use visual::plugin::RankedTablePlugin;
pub use visual::resources::VisualState;
pub use visual::settings::VisualSettings;
