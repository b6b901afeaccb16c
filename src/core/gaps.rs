use serde::{Deserialize, Serialize};

/// Lower bound on the tick spacing treated as a gap.
pub const MIN_GAP_DURATION_MS: i64 = 60_000;

/// Interval with no horizontal space allocated on the time axis
/// (market closed, feed outage).
///
/// Both ends are real entry epochs, so only epochs strictly between them are
/// considered inside the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGap {
    pub start_epoch: i64,
    pub end_epoch: i64,
}

impl TimeGap {
    #[must_use]
    pub fn new(start_epoch: i64, end_epoch: i64) -> Self {
        Self {
            start_epoch: start_epoch.min(end_epoch),
            end_epoch: start_epoch.max(end_epoch),
        }
    }

    #[must_use]
    pub fn duration(self) -> i64 {
        self.end_epoch - self.start_epoch
    }

    #[must_use]
    pub fn contains(self, epoch: i64) -> bool {
        epoch > self.start_epoch && epoch < self.end_epoch
    }
}

/// Largest spacing between consecutive entries that is still continuous time.
#[must_use]
pub fn max_allowed_gap_diff(granularity_ms: i64) -> i64 {
    granularity_ms.max(MIN_GAP_DURATION_MS)
}

/// Scans consecutive epochs and returns every pair further apart than
/// `max_allowed_diff` as a gap. `epochs` must be sorted ascending.
#[must_use]
pub fn find_gaps(epochs: &[i64], max_allowed_diff: i64) -> Vec<TimeGap> {
    epochs
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > max_allowed_diff)
        .map(|pair| TimeGap::new(pair[0], pair[1]))
        .collect()
}

/// Sorted, non-overlapping set of time gaps with a prefix-sum index.
///
/// `cumulative[i]` holds the total duration of `gaps[..i]`, so the gap time
/// inside any range is resolved with two binary searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapManager {
    gaps: Vec<TimeGap>,
    cumulative: Vec<i64>,
}

impl Default for GapManager {
    fn default() -> Self {
        Self {
            gaps: Vec::new(),
            cumulative: vec![0],
        }
    }
}

impl GapManager {
    #[must_use]
    pub fn new(gaps: Vec<TimeGap>) -> Self {
        let mut manager = Self::default();
        manager.replace_gaps(gaps);
        manager
    }

    #[must_use]
    pub fn gaps(&self) -> &[TimeGap] {
        &self.gaps
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Resets the gap set from a freshly computed list.
    pub fn replace_gaps(&mut self, mut gaps: Vec<TimeGap>) {
        gaps.sort_by_key(|gap| gap.start_epoch);
        gaps.dedup_by(|next, prev| next.start_epoch < prev.end_epoch);
        self.gaps = gaps;
        self.rebuild_index();
    }

    /// Merges gaps discovered in prepended history.
    ///
    /// Gaps already known stay untouched; incoming gaps that reach into the
    /// first known gap are dropped.
    pub fn insert_in_front(&mut self, gaps: Vec<TimeGap>) {
        let limit = self.gaps.first().map_or(i64::MAX, |gap| gap.start_epoch);
        let mut merged: Vec<TimeGap> = gaps
            .into_iter()
            .filter(|gap| gap.end_epoch <= limit)
            .collect();
        merged.sort_by_key(|gap| gap.start_epoch);
        merged.dedup_by(|next, prev| next.start_epoch < prev.end_epoch);
        merged.extend_from_slice(&self.gaps);
        self.gaps = merged;
        self.rebuild_index();
    }

    /// Appends gaps found after the last known gap (live feed resumed after
    /// a closure).
    pub fn append_gaps(&mut self, gaps: Vec<TimeGap>) {
        let limit = self.gaps.last().map_or(i64::MIN, |gap| gap.end_epoch);
        let before = self.gaps.len();
        for gap in gaps {
            let tail = self.gaps.last().map_or(limit, |last| last.end_epoch);
            if gap.start_epoch >= tail {
                self.gaps.push(gap);
            }
        }
        if self.gaps.len() != before {
            self.rebuild_index();
        }
    }

    #[must_use]
    pub fn is_in_gap(&self, epoch: i64) -> bool {
        let index = self.gaps.partition_point(|gap| gap.end_epoch <= epoch);
        self.gaps
            .get(index)
            .is_some_and(|gap| gap.contains(epoch))
    }

    /// Real duration of `[start, end]` minus the part of it covered by gaps.
    ///
    /// Gaps partially overlapping the range count only for their intersection.
    /// Reversed ranges return the negated result.
    #[must_use]
    pub fn remove_gaps(&self, start: i64, end: i64) -> i64 {
        if start > end {
            return -self.remove_gaps(end, start);
        }
        let real = end - start;
        if self.gaps.is_empty() || real == 0 {
            return real;
        }

        let first = self.gaps.partition_point(|gap| gap.end_epoch <= start);
        let last = self.gaps.partition_point(|gap| gap.start_epoch < end);
        if first >= last {
            return real;
        }

        let mut covered = self.cumulative[last] - self.cumulative[first];
        covered -= (start - self.gaps[first].start_epoch).max(0);
        covered -= (self.gaps[last - 1].end_epoch - end).max(0);
        real - covered
    }

    /// Moves `epoch` by `visual_ms` of gap-free time, skipping over gaps.
    ///
    /// Inverse of `remove_gaps` for epochs outside gaps: an epoch inside a gap
    /// collapses to the gap edge in the direction of travel.
    #[must_use]
    pub fn shift_epoch(&self, epoch: f64, visual_ms: f64) -> f64 {
        if visual_ms == 0.0 || self.gaps.is_empty() {
            return epoch + visual_ms;
        }

        let mut current = epoch;
        let mut remaining = visual_ms.abs();

        if visual_ms > 0.0 {
            let mut index = self
                .gaps
                .partition_point(|gap| (gap.end_epoch as f64) <= current);
            while let Some(gap) = self.gaps.get(index) {
                let gap_start = gap.start_epoch as f64;
                if current < gap_start {
                    let free = gap_start - current;
                    if remaining <= free {
                        return current + remaining;
                    }
                    remaining -= free;
                }
                current = gap.end_epoch as f64;
                index += 1;
            }
            current + remaining
        } else {
            let mut index = self
                .gaps
                .partition_point(|gap| (gap.start_epoch as f64) < current);
            while index > 0 {
                let gap = self.gaps[index - 1];
                let gap_end = gap.end_epoch as f64;
                if current > gap_end {
                    let free = current - gap_end;
                    if remaining <= free {
                        return current - remaining;
                    }
                    remaining -= free;
                }
                current = gap.start_epoch as f64;
                index -= 1;
            }
            current - remaining
        }
    }

    fn rebuild_index(&mut self) {
        self.cumulative.clear();
        self.cumulative.reserve(self.gaps.len() + 1);
        let mut total = 0;
        self.cumulative.push(total);
        for gap in &self.gaps {
            total += gap.duration();
            self.cumulative.push(total);
        }
    }
}
