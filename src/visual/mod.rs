// src/visual/mod.rs

// --- Public Interface ---
// Declare modules first
pub mod definitions;
pub mod events;
pub mod extract;
pub mod plugin;
pub mod resources;
pub mod settings;

// Declare internal implementation module; systems are implementation details
pub(crate) mod systems;

// Re-export types needed externally (by an embedding host or tests)
pub use definitions::{ColumnDescriptor, ColumnId, ColumnKind};
pub use events::HostUpdateEvent;
pub use plugin::RankedTablePlugin;
pub use resources::VisualState;
pub use settings::VisualSettings;
