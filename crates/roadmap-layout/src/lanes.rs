//! Greedy row packing inside a lane

use crate::types::Rect;

/// A lane's packing result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLane {
    /// Rectangle and row per input item, in input order
    pub placed: Vec<(Rect, usize)>,
    /// Height of the band holding every row
    pub height: i64,
}

/// Pack `items` (`(x, width, height)`) into rows starting at `top`
///
/// Items are taken in the given order. Each goes to the first row, scanning
/// from the top, where its box overlaps nothing already placed. Rows share
/// one pitch (tallest item plus `row_gutter`) so rows never overlap either.
#[must_use]
pub fn pack_rows(items: &[(i64, i64, i64)], top: i64, row_gutter: i64) -> PackedLane {
    let tallest = items.iter().map(|&(_, _, h)| h).max().unwrap_or(0);
    let pitch = tallest + row_gutter;

    let mut rows: Vec<Vec<Rect>> = Vec::new();
    let mut placed = Vec::with_capacity(items.len());

    for &(x, width, height) in items {
        let row = (0..)
            .find(|&r| {
                let candidate = Rect::new(x, row_top(top, pitch, r), width, height);
                rows.get(r).map_or(true, |taken| taken.iter().all(|t| !t.intersects(&candidate)))
            })
            .unwrap_or(rows.len());
        if row >= rows.len() {
            rows.resize_with(row + 1, Vec::new);
        }
        let rect = Rect::new(x, row_top(top, pitch, row), width, height);
        rows[row].push(rect);
        placed.push((rect, row));
    }

    let height = match rows.len() {
        0 => 0,
        n => row_top(0, pitch, n - 1) + tallest,
    };
    PackedLane { placed, height }
}

fn row_top(top: i64, pitch: i64, row: usize) -> i64 {
    let row = i64::try_from(row).unwrap_or(i64::MAX);
    top.saturating_add(pitch.saturating_mul(row))
}
