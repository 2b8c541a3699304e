use crate::RowRange;

/// Rows rendered past each edge of the visible window by default.
pub const DEFAULT_BUFFER_ROWS: usize = 5;

/// Maps a pixel window onto the rows that must be rendered to cover it.
///
/// `prefix_heights` must be sorted ascending with `prefix_heights[0] == 0`; its length is
/// `row_count + 1`.
///
/// The top edge resolves to the row containing `scroll_offset` (an exact hit on a row boundary
/// returns that row, a miss rounds down to the row it falls inside). The bottom edge resolves
/// to the first boundary at or past `scroll_offset + container_height`, rounding up. Together
/// this always covers the whole window, even when an edge falls strictly inside a row.
///
/// The result is then widened by `buffer_rows` on each side and clamped to `0..=row_count`.
pub fn resolve(
    scroll_offset: f64,
    prefix_heights: &[f64],
    container_height: f64,
    buffer_rows: usize,
) -> RowRange {
    let row_count = prefix_heights.len().saturating_sub(1);
    if row_count == 0 {
        return RowRange::default();
    }

    let container_height = if container_height.is_finite() {
        container_height.max(0.0)
    } else {
        0.0
    };
    let top = scroll_offset;
    let bottom = scroll_offset + container_height;

    let start = {
        let i = lower_bound(prefix_heights, top);
        if i < prefix_heights.len() && prefix_heights[i] == top {
            i
        } else {
            i.saturating_sub(1)
        }
    };
    let end = lower_bound(prefix_heights, bottom);

    let start = start.min(row_count);
    let end = end.min(row_count).max(start);

    RowRange {
        start_index: start.saturating_sub(buffer_rows),
        end_index: end.saturating_add(buffer_rows).min(row_count),
    }
}

/// Leftmost index whose value is `>= target`. A NaN target resolves to `0`.
fn lower_bound(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|&p| p < target)
}
