// src/ranking/model.rs
//
// Headless ranked-table data provider: the model side of the rendering
// library boundary. It owns the row set, the accepted column descriptors and
// the live ranking (ordered columns, sort/group criteria, number filters),
// and computes the visible row order. It never renders anything.

use std::cmp::Ordering;

use crate::error::VisualError;
use crate::visual::definitions::{
    CellValue, ColumnDescriptor, ColumnKind, GroupCriterion, Row, SortCriterion,
};
use crate::visual::settings::ProviderSettings;

/// Roles of the leading columns the model injects into every derived
/// ranking. They belong to the widget chrome, not to the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralRole {
    Rank,
    Selection,
    Aggregate,
}

impl StructuralRole {
    fn label(self) -> &'static str {
        match self {
            StructuralRole::Rank => "Rank",
            StructuralRole::Selection => "Selection",
            StructuralRole::Aggregate => "Aggregate",
        }
    }
}

const STRUCTURAL_ROLES: [StructuralRole; 3] = [
    StructuralRole::Rank,
    StructuralRole::Selection,
    StructuralRole::Aggregate,
];

/// Inclusive numeric filter bounds on a ranking column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberFilter {
    pub min: f64,
    pub max: f64,
}

impl NumberFilter {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One live column inside a ranking.
#[derive(Debug, Clone)]
pub struct RankingColumn {
    structural: Option<StructuralRole>,
    pub desc: ColumnDescriptor,
    filter: Option<NumberFilter>,
}

impl RankingColumn {
    fn structural(role: StructuralRole) -> Self {
        RankingColumn {
            structural: Some(role),
            desc: ColumnDescriptor::new_basic(role.label(), ColumnKind::String, 0),
            filter: None,
        }
    }

    fn from_desc(desc: ColumnDescriptor) -> Self {
        RankingColumn {
            structural: None,
            desc,
            filter: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.desc.label
    }

    pub fn is_structural(&self) -> bool {
        self.structural.is_some()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    pub fn filter(&self) -> Option<NumberFilter> {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Option<NumberFilter>) {
        self.filter = filter;
    }
}

/// The live ordered/sorted/grouped view over the model's columns.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    children: Vec<RankingColumn>,
    sort_criteria: Vec<SortCriterion>,
    group_criteria: Vec<GroupCriterion>,
    group_sort_criteria: Vec<SortCriterion>,
}

impl Ranking {
    pub fn children(&self) -> &[RankingColumn] {
        &self.children
    }

    /// Count of the structural prefix injected by `derive_default`.
    pub fn structural_len(&self) -> usize {
        self.children.iter().filter(|c| c.is_structural()).count()
    }

    /// Looks up a dataset (non-structural) column by label.
    pub fn child_by_label_mut(&mut self, label: &str) -> Option<&mut RankingColumn> {
        self.children
            .iter_mut()
            .filter(|c| !c.is_structural())
            .find(|c| c.label() == label)
    }

    /// Moves a dataset column to a new position. Indices address the full
    /// child list; the structural prefix is off limits on both ends.
    pub fn move_child(&mut self, from: usize, to: usize) -> Result<(), VisualError> {
        let len = self.children.len();
        if from >= len {
            return Err(VisualError::ColumnIndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(VisualError::ColumnIndexOutOfRange { index: to, len });
        }
        let structural = self.structural_len();
        if from < structural {
            return Err(VisualError::StructuralColumn(from));
        }
        if to < structural {
            return Err(VisualError::StructuralColumn(to));
        }
        if from != to {
            let child = self.children.remove(from);
            self.children.insert(to, child);
        }
        Ok(())
    }

    /// Removes a dataset column by label. Structural columns stay.
    pub fn remove_child(&mut self, label: &str) -> Option<RankingColumn> {
        let index = self
            .children
            .iter()
            .position(|c| !c.is_structural() && c.label() == label)?;
        Some(self.children.remove(index))
    }

    pub fn sort_criteria(&self) -> &[SortCriterion] {
        &self.sort_criteria
    }

    pub fn set_sort_criteria(&mut self, criteria: Vec<SortCriterion>) {
        self.sort_criteria = criteria;
    }

    pub fn group_criteria(&self) -> &[GroupCriterion] {
        &self.group_criteria
    }

    pub fn set_group_criteria(&mut self, criteria: Vec<GroupCriterion>) {
        self.group_criteria = criteria;
    }

    pub fn group_sort_criteria(&self) -> &[SortCriterion] {
        &self.group_sort_criteria
    }

    pub fn set_group_sort_criteria(&mut self, criteria: Vec<SortCriterion>) {
        self.group_sort_criteria = criteria;
    }
}

/// The ranked-table data provider owned by the reconciliation engine for its
/// lifetime; created, replaced and torn down by it.
#[derive(Debug, Clone)]
pub struct RankedTableModel {
    rows: Vec<Row>,
    descs: Vec<ColumnDescriptor>,
    settings: ProviderSettings,
    ranking: Ranking,
    row_order: Vec<usize>,
}

impl RankedTableModel {
    pub fn new(rows: Vec<Row>, descs: Vec<ColumnDescriptor>, settings: ProviderSettings) -> Self {
        let row_order = (0..rows.len()).collect();
        RankedTableModel {
            rows,
            descs,
            settings,
            ranking: Ranking::default(),
            row_order,
        }
    }

    /// Rebuilds the default ranking: the structural prefix followed by one
    /// child per descriptor, in descriptor order. Silently resets all
    /// sort/group/filter state on the ranking.
    pub fn derive_default(&mut self) {
        let mut ranking = Ranking::default();
        for role in STRUCTURAL_ROLES {
            ranking.children.push(RankingColumn::structural(role));
        }
        for desc in &self.descs {
            ranking.children.push(RankingColumn::from_desc(desc.clone()));
        }
        self.ranking = ranking;
        self.row_order = (0..self.rows.len()).collect();
    }

    pub fn clear_columns(&mut self) {
        self.descs.clear();
    }

    pub fn push_desc(&mut self, desc: ColumnDescriptor) {
        self.descs.push(desc);
    }

    pub fn set_data(&mut self, rows: Vec<Row>) {
        self.row_order = (0..rows.len()).collect();
        self.rows = rows;
    }

    pub fn data(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.descs
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn last_ranking(&mut self) -> &mut Ranking {
        &mut self.ranking
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Currently visible rows, as indices into `data()`, after filters and
    /// the ranking's sort criteria have been applied by `sort`.
    pub fn view_order(&self) -> &[usize] {
        &self.row_order
    }

    /// Applies the ranking's number filters and sort criteria to recompute
    /// the visible row order. Criteria naming unknown columns are skipped.
    pub fn sort(&mut self) {
        let filters: Vec<(usize, NumberFilter)> = self
            .ranking
            .children
            .iter()
            .filter(|c| !c.is_structural())
            .filter_map(|c| c.filter.map(|f| (c.desc.source_index, f)))
            .collect();
        let keys: Vec<(usize, bool)> = self
            .ranking
            .sort_criteria
            .iter()
            .filter_map(|s| self.column_index(&s.label).map(|i| (i, s.ascending)))
            .collect();

        let mut order: Vec<usize> = (0..self.rows.len())
            .filter(|&r| {
                filters.iter().all(|(col, f)| {
                    self.rows[r]
                        .get(*col)
                        .and_then(CellValue::as_number)
                        .map_or(false, |v| f.contains(v))
                })
            })
            .collect();
        order.sort_by(|&a, &b| {
            for (col, ascending) in &keys {
                let lhs = self.rows[a].get(*col).unwrap_or(&CellValue::Null);
                let rhs = self.rows[b].get(*col).unwrap_or(&CellValue::Null);
                let ord = compare_cells(lhs, rhs);
                let ord = if *ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        self.row_order = order;
    }

    fn column_index(&self, label: &str) -> Option<usize> {
        self.descs
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.source_index)
    }
}

fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Less,
        (_, CellValue::Null) => Ordering::Greater,
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
        // Mixed kinds fall back to a fixed precedence so the sort stays total.
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Null => 0,
        CellValue::Bool(_) => 1,
        CellValue::Number(_) => 2,
        CellValue::Date(_) => 3,
        CellValue::Text(_) => 4,
    }
}
