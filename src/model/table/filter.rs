//! Free-text row filtering

use super::value::Record;
use super::RowId;

/// Ids of the rows where any field's display string contains `query`,
/// case-insensitively, in original order
pub fn filter_rows<T: Record>(data: &[T], query: &str) -> Vec<RowId> {
    if query.is_empty() {
        return (0..data.len()).collect();
    }

    let needle = query.to_lowercase();
    data.iter()
        .enumerate()
        .filter(|(_, row)| {
            row.values()
                .iter()
                .any(|value| value.to_string().to_lowercase().contains(&needle))
        })
        .map(|(id, _)| id)
        .collect()
}
