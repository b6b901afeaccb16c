use std::ops::Range;

/// Index range of items whose epoch lies inside `[start, end]`, widened by one
/// item on each side so line segments crossing the canvas edges are kept.
///
/// `items` must be sorted by `epoch_of` ascending.
#[must_use]
pub fn visible_index_range<T>(
    items: &[T],
    start: i64,
    end: i64,
    epoch_of: impl Fn(&T) -> i64,
) -> Range<usize> {
    let (start, end) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    let first = items.partition_point(|item| epoch_of(item) < start);
    let last = items.partition_point(|item| epoch_of(item) <= end);
    first.saturating_sub(1)..(last + 1).min(items.len())
}

/// Index of the item nearest to `epoch`; equidistant neighbours resolve to
/// the later item.
#[must_use]
pub fn nearest_index<T>(items: &[T], epoch: i64, epoch_of: impl Fn(&T) -> i64) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let upper = items.partition_point(|item| epoch_of(item) < epoch);
    if upper == 0 {
        return Some(0);
    }
    if upper == items.len() {
        return Some(items.len() - 1);
    }
    let before = epoch - epoch_of(&items[upper - 1]);
    let after = epoch_of(&items[upper]) - epoch;
    if after <= before {
        Some(upper)
    } else {
        Some(upper - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{nearest_index, visible_index_range};

    #[test]
    fn visible_range_keeps_one_item_margin() {
        let epochs = [0_i64, 10, 20, 30, 40, 50];
        assert_eq!(visible_index_range(&epochs, 15, 35, |e| *e), 1..5);
        assert_eq!(visible_index_range(&epochs, -100, 100, |e| *e), 0..6);
        assert_eq!(visible_index_range(&epochs, 100, 200, |e| *e), 5..6);
        assert_eq!(visible_index_range(&[] as &[i64], 0, 10, |e| *e), 0..0);
    }

    #[test]
    fn nearest_prefers_later_on_tie() {
        let epochs = [1_000_i64, 2_000, 3_000];
        assert_eq!(nearest_index(&epochs, 2_600, |e| *e), Some(2));
        assert_eq!(nearest_index(&epochs, 2_400, |e| *e), Some(1));
        assert_eq!(nearest_index(&epochs, 2_500, |e| *e), Some(2));
        assert_eq!(nearest_index(&epochs, -5, |e| *e), Some(0));
        assert_eq!(nearest_index(&epochs, 9_000, |e| *e), Some(2));
    }
}
