//! Headless table model
//!
//! Holds the row collection, the column schema and the four pieces of local
//! table state (visibility, sort, search, selection). Derives the filtered
//! and sorted row model and decides which body the table shows. Nothing here
//! touches the terminal; `components::data_table` renders it.

pub mod column;
pub mod filter;
pub mod selection;
pub mod sort;
pub mod value;
pub mod visibility;

pub use column::{ColumnDef, ColumnId};
pub use filter::filter_rows;
pub use selection::{Selection, SelectionChange};
pub use sort::{sort_rows, SortState};
pub use value::{CellValue, Record};
pub use visibility::VisibilityState;

use std::rc::Rc;

/// Position of a record in the collection last handed to the table
pub type RowId = usize;

/// Filtered and sorted view: row ids in display order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowModel {
    pub rows: Vec<RowId>,
}

impl RowModel {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display position of a row id, if it is in the view
    pub fn position_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|&row| row == id)
    }
}

/// What the table body shows, in precedence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyState {
    Loading,
    NoColumns,
    Empty,
    Rows(Rc<RowModel>),
}

pub struct TableModel<T> {
    columns: Vec<ColumnDef<T>>,
    data: Vec<T>,
    visibility: VisibilityState,
    sorting: SortState,
    search: String,
    selection: Selection,
    selectable: bool,
    /// Cached view; dropped whenever data, search or sort change
    row_model: Option<Rc<RowModel>>,
}

impl<T: Record> TableModel<T> {
    pub fn new(columns: Vec<ColumnDef<T>>, data: Vec<T>) -> Self {
        let visibility = VisibilityState::new(columns.iter().map(|c| c.id.clone()));
        Self {
            columns,
            data,
            visibility,
            sorting: SortState::new(),
            search: String::new(),
            selection: Selection::default(),
            selectable: true,
            row_model: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inputs
    // ─────────────────────────────────────────────────────────────────────────

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|col| self.visibility.is_visible(&col.id))
            .collect()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, id: RowId) -> Option<&T> {
        self.data.get(id)
    }

    /// Replace the row collection
    ///
    /// Row ids are positional, so a held selection would silently point at a
    /// different record; it is dropped.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.selection.clear();
        self.row_model = None;
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            self.selection.clear();
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search {
            self.search = query;
            self.row_model = None;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────

    pub fn sorting(&self) -> &SortState {
        &self.sorting
    }

    /// Cycle a column's sort; returns false for unknown or non-sortable columns
    pub fn cycle_sort(&mut self, column_id: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|col| col.id == column_id && col.sortable);
        if !sortable {
            return false;
        }
        self.sorting.cycle(column_id);
        self.row_model = None;
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Visibility
    // ─────────────────────────────────────────────────────────────────────────

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    /// Flip a column's visibility unless it is the last visible one
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> bool {
        self.visibility.toggle(column_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<RowId> {
        self.selection.selected()
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.selection.selected().and_then(|id| self.data.get(id))
    }

    /// Toggle selection of a row (the row "click")
    pub fn activate_row(&mut self, id: RowId) -> SelectionChange {
        if !self.selectable || id >= self.data.len() {
            return SelectionChange::Unchanged;
        }
        self.selection.toggle(id)
    }

    pub fn deselect(&mut self) -> bool {
        self.selection.clear()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived views
    // ─────────────────────────────────────────────────────────────────────────

    /// The filtered, sorted view
    ///
    /// Returns the same `Rc` until data, search or sort change.
    pub fn row_model(&mut self) -> Rc<RowModel> {
        if let Some(model) = &self.row_model {
            return Rc::clone(model);
        }

        let mut rows = filter_rows(&self.data, &self.search);
        sort_rows(&mut rows, &self.data, &self.columns, &self.sorting);
        let model = Rc::new(RowModel { rows });
        self.row_model = Some(Rc::clone(&model));
        model
    }

    pub fn body_state(&mut self, loading: bool) -> BodyState {
        if loading {
            return BodyState::Loading;
        }
        if self.visibility.all_hidden() {
            return BodyState::NoColumns;
        }
        let model = self.row_model();
        if model.is_empty() {
            BodyState::Empty
        } else {
            BodyState::Rows(model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    type Row = BTreeMap<String, CellValue>;

    fn row(floor: &str, status: &str) -> Row {
        BTreeMap::from([
            ("floor".to_string(), CellValue::from(floor)),
            ("status".to_string(), CellValue::from(status)),
        ])
    }

    fn field(name: &'static str) -> ColumnDef<Row> {
        ColumnDef::new(name).accessor(move |r: &Row| r.get(name).cloned().unwrap_or(CellValue::Empty))
    }

    fn model() -> TableModel<Row> {
        TableModel::new(
            vec![field("floor"), field("status")],
            vec![row("2", "Open"), row("1", "Resolved"), row("3", "Open")],
        )
    }

    #[test]
    fn test_search_then_sort() {
        let mut m = model();
        m.set_search("open");
        assert_eq!(m.row_model().rows, vec![0, 2]);
        m.cycle_sort("floor");
        m.cycle_sort("floor");
        assert_eq!(m.row_model().rows, vec![2, 0]);
    }

    #[test]
    fn test_row_model_is_memoized() {
        let mut m = model();
        let a = m.row_model();
        let b = m.row_model();
        assert!(Rc::ptr_eq(&a, &b));

        // Same query does not invalidate
        m.set_search("");
        assert!(Rc::ptr_eq(&a, &m.row_model()));

        // Visibility does not affect rows
        m.toggle_column_visibility("status");
        assert!(Rc::ptr_eq(&a, &m.row_model()));

        m.set_search("1");
        assert!(!Rc::ptr_eq(&a, &m.row_model()));
    }

    #[test]
    fn test_loading_wins_over_everything() {
        let mut m = model();
        m.activate_row(0);
        m.set_search("zzz");
        assert_eq!(m.body_state(true), BodyState::Loading);
        assert_eq!(m.body_state(false), BodyState::Empty);
    }

    #[test]
    fn test_no_columns_placeholder() {
        let mut m: TableModel<Row> = TableModel::new(Vec::new(), vec![row("1", "Open")]);
        assert_eq!(m.body_state(false), BodyState::NoColumns);
    }

    #[test]
    fn test_rows_body_state() {
        let mut m = model();
        match m.body_state(false) {
            BodyState::Rows(rows) => assert_eq!(rows.len(), 3),
            other => panic!("unexpected body state {:?}", other),
        }
    }

    #[test]
    fn test_activate_a_then_b() {
        let mut m = model();
        assert_eq!(m.activate_row(0), SelectionChange::Selected(0));
        assert_eq!(m.activate_row(1), SelectionChange::Selected(1));
        assert_eq!(m.selected(), Some(1));
        assert_eq!(m.selected_row(), Some(&row("1", "Resolved")));
    }

    #[test]
    fn test_unselectable_table_ignores_activation() {
        let mut m = model();
        m.set_selectable(false);
        assert_eq!(m.activate_row(0), SelectionChange::Unchanged);
        assert_eq!(m.selected(), None);
    }

    #[test]
    fn test_set_data_drops_selection() {
        let mut m = model();
        m.activate_row(2);
        m.set_data(vec![row("9", "Open")]);
        assert_eq!(m.selected(), None);
        assert_eq!(m.row_model().rows, vec![0]);
    }

    #[test]
    fn test_three_column_hide_sequence() {
        let mut m: TableModel<Row> = TableModel::new(
            vec![field("a"), field("b"), field("c")],
            Vec::new(),
        );
        assert!(m.toggle_column_visibility("b"));
        assert!(m.toggle_column_visibility("a"));
        assert!(!m.toggle_column_visibility("c"));
        let visible: Vec<&str> = m.visible_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(visible, vec!["c"]);
    }
}
