//! Orphan grid

use crate::types::Rect;

/// Row-major grid of `sizes` (`(width, height)`) with its top-left at `(left, top)`
///
/// Cells are uniform: the widest item plus `column_gutter` across, the
/// tallest plus `row_gutter` down. Returns one rectangle per item plus the
/// grid's bounding box, or `None` for an empty input.
#[must_use]
pub fn grid(
    sizes: &[(i64, i64)],
    left: i64,
    top: i64,
    columns: usize,
    column_gutter: i64,
    row_gutter: i64,
) -> Option<(Vec<Rect>, Rect)> {
    if sizes.is_empty() {
        return None;
    }
    let columns = columns.max(1);
    let widest = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
    let tallest = sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);
    let (cell_w, cell_h) = (widest + column_gutter, tallest + row_gutter);

    let cells: Vec<Rect> = sizes
        .iter()
        .enumerate()
        .map(|(slot, &(w, h))| {
            let col = to_i64(slot % columns);
            let row = to_i64(slot / columns);
            Rect::new(left + col * cell_w, top + row * cell_h, w, h)
        })
        .collect();

    let used_cols = to_i64(sizes.len().min(columns));
    let used_rows = to_i64(sizes.len().div_ceil(columns));
    let bounds = Rect::new(
        left,
        top,
        used_cols * cell_w - column_gutter,
        used_rows * cell_h - row_gutter,
    );
    Some((cells, bounds))
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
