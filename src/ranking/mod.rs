// src/ranking/mod.rs

// --- Public Interface ---
pub mod model;
pub mod view;

pub use model::{NumberFilter, RankedTableModel, Ranking, RankingColumn, StructuralRole};
pub use view::{HeadlessView, TableView, TableViewFactory, ViewFactory};
