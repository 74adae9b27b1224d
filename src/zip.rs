//! Align positionally correlated sequences of unequal length into rows.
//!
//! The absent marker for a missing position is the element type's `Default`,
//! an empty string for text and `false` for flags.

/// Number of rows the zipped output has, the longest input wins.
pub fn row_count(lens: &[usize]) -> usize {
    lens.iter().copied().max().unwrap_or(0)
}

/// The element at `idx`, or the absent marker if the sequence is too short.
pub fn cell<T: Clone + Default>(seq: &[T], idx: usize) -> T {
    seq.get(idx).cloned().unwrap_or_default()
}

/// Zip any number of columns sharing one element type into rows.
pub fn zip_columns<T: Clone + Default>(columns: &[&[T]]) -> Vec<Vec<T>> {
    let rows = row_count(&columns.iter().map(|c| c.len()).collect::<Vec<_>>());
    (0..rows)
        .map(|idx| columns.iter().map(|c| cell(c, idx)).collect())
        .collect()
}

/// Zip columns of different element types into a `Vec` of tuples.
///
/// ```
/// let lts = vec!["5.10".to_string(), "6.1".to_string()];
/// let fixed = vec![true];
/// let rows = glvdctl::zip_ragged!(lts, fixed);
/// assert_eq!(rows[1], ("6.1".to_string(), false));
/// ```
#[macro_export]
macro_rules! zip_ragged {
    ($($seq:expr),+ $(,)?) => {{
        let rows = $crate::zip::row_count(&[$($seq.len()),+]);
        (0..rows)
            .map(|idx| ($($crate::zip::cell(&$seq, idx),)+))
            .collect::<Vec<_>>()
    }};
}
