//! Column sort state and the stable sort over a row model

use super::column::{ColumnDef, ColumnId};
use super::value::CellValue;
use super::RowId;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    pub column_id: ColumnId,
    pub direction: SortDirection,
}

/// Ordered list of (column, direction) pairs; empty means unsorted
///
/// Only single-column sorting is driven through `cycle`, but the list shape is
/// kept and `sort_rows` applies entries in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    entries: Vec<ColumnSort>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|entry| entry.column_id == column_id)
            .map(|entry| entry.direction)
    }

    /// Advance a column through unsorted → ascending → descending → unsorted
    ///
    /// Sorting a new column replaces whatever column was sorted before.
    pub fn cycle(&mut self, column_id: &str) {
        self.entries = match self.direction_of(column_id) {
            None => vec![ColumnSort {
                column_id: column_id.to_string(),
                direction: SortDirection::Ascending,
            }],
            Some(SortDirection::Ascending) => vec![ColumnSort {
                column_id: column_id.to_string(),
                direction: SortDirection::Descending,
            }],
            Some(SortDirection::Descending) => Vec::new(),
        };
    }
}

/// Compare two values for one sort key; blanks go last in either direction
fn compare_values(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.natural_cmp(b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Stable-sort `rows` (ids into `data`) according to `state`
///
/// Entries naming unknown or non-sortable columns are skipped.
pub fn sort_rows<T>(rows: &mut [RowId], data: &[T], columns: &[ColumnDef<T>], state: &SortState) {
    let keys: Vec<(&ColumnDef<T>, SortDirection)> = state
        .entries
        .iter()
        .filter_map(|entry| {
            columns
                .iter()
                .find(|col| col.id == entry.column_id && col.sortable)
                .map(|col| (col, entry.direction))
        })
        .collect();

    if keys.is_empty() {
        return;
    }

    // Pre-compute values so accessors run once per row and key
    let mut decorated: Vec<(RowId, Vec<CellValue>)> = rows
        .iter()
        .map(|&id| {
            let values = keys.iter().map(|(col, _)| col.value(&data[id])).collect();
            (id, values)
        })
        .collect();

    decorated.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .enumerate()
            .map(|(i, (_, direction))| compare_values(&a[i], &b[i], *direction))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    for (slot, (id, _)) in rows.iter_mut().zip(decorated) {
        *slot = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDef<(String, f64)>> {
        vec![
            ColumnDef::new("name").accessor(|r: &(String, f64)| CellValue::from(r.0.as_str())),
            ColumnDef::new("score").accessor(|r: &(String, f64)| {
                if r.1 < 0.0 {
                    CellValue::Empty
                } else {
                    CellValue::Number(r.1)
                }
            }),
            ColumnDef::new("fixed")
                .accessor(|r: &(String, f64)| CellValue::from(r.0.as_str()))
                .sortable(false),
        ]
    }

    fn data() -> Vec<(String, f64)> {
        vec![
            ("b".to_string(), 2.0),
            ("a".to_string(), 1.0),
            ("c".to_string(), 2.0),
            ("d".to_string(), -1.0),
        ]
    }

    #[test]
    fn test_cycle_goes_asc_desc_none() {
        let mut state = SortState::new();
        state.cycle("name");
        assert_eq!(state.direction_of("name"), Some(SortDirection::Ascending));
        state.cycle("name");
        assert_eq!(state.direction_of("name"), Some(SortDirection::Descending));
        state.cycle("name");
        assert_eq!(state, SortState::new());
    }

    #[test]
    fn test_new_column_replaces_previous_sort() {
        let mut state = SortState::new();
        state.cycle("name");
        state.cycle("score");
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.direction_of("name"), None);
        assert_eq!(state.direction_of("score"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let data = data();
        let cols = columns();
        let mut rows: Vec<RowId> = vec![0, 1, 2, 3];
        let mut state = SortState::new();
        state.cycle("score");
        sort_rows(&mut rows, &data, &cols, &state);
        // 1.0, then the two 2.0 rows in original order, blank last
        assert_eq!(rows, vec![1, 0, 2, 3]);

        state.cycle("score");
        let mut rows: Vec<RowId> = vec![0, 1, 2, 3];
        sort_rows(&mut rows, &data, &cols, &state);
        assert_eq!(rows, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_non_sortable_column_leaves_order() {
        let data = data();
        let cols = columns();
        let mut rows: Vec<RowId> = vec![3, 2, 1, 0];
        let mut state = SortState::new();
        state.cycle("fixed");
        sort_rows(&mut rows, &data, &cols, &state);
        assert_eq!(rows, vec![3, 2, 1, 0]);
    }
}
