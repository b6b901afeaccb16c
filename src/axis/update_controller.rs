use tracing::{debug, trace};

use crate::core::{find_gaps, max_allowed_gap_diff};

use super::{ViewingMode, XAxisModel};

/// Batched inputs for [`XAxisModel::update`]; `None` fields are left as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct XAxisUpdate<'a> {
    pub is_live: Option<bool>,
    pub granularity_ms: Option<i64>,
    /// Sorted epochs of the main series.
    pub entries: Option<&'a [i64]>,
    pub min_epoch: Option<i64>,
    pub max_epoch: Option<i64>,
}

/// How a new entries list relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntriesChange {
    /// First list ever received.
    FirstLoad,
    /// Unrelated list (symbol or granularity switch).
    Reload,
    /// Older entries were prepended.
    HistoryPrepended { count: usize },
    /// Newer entries were appended, possibly dropping the oldest ones.
    TickAppended { count: usize },
    /// Same epochs; at most the last entry changed in place.
    Unchanged,
}

impl XAxisModel {
    /// Applies a batch of changes in a fixed order: live flag, granularity,
    /// entries, then epoch bounds.
    pub fn update(&mut self, update: XAxisUpdate<'_>) -> EntriesChange {
        if let Some(is_live) = update.is_live {
            self.update_is_live(is_live);
        }
        if let Some(granularity_ms) = update.granularity_ms {
            self.update_granularity(granularity_ms);
        }
        let change = match update.entries {
            Some(entries) => self.update_entries(entries),
            None => EntriesChange::Unchanged,
        };
        if update.min_epoch.is_some() || update.max_epoch.is_some() {
            self.update_epoch_bounds(update.min_epoch, update.max_epoch);
        }
        change
    }

    fn update_is_live(&mut self, is_live: bool) {
        if self.is_live != is_live {
            debug!(is_live, "x-axis live state changed");
            self.is_live = is_live;
        }
    }

    /// Resets the zoom for a new granularity and remembers where the latest
    /// entry sat so the reload that follows can restore it.
    fn update_granularity(&mut self, granularity_ms: i64) {
        let granularity_ms = granularity_ms.max(0);
        if granularity_ms == self.granularity_ms {
            return;
        }
        self.pending_offset_px = self.entries.last().and_then(|&last| {
            self.is_epoch_visible(last).then(|| {
                (self.width_px - self.x_from_epoch(last))
                    .clamp(0.0, self.config.max_current_tick_offset_px.max(0.0))
            })
        });
        debug!(
            from = self.granularity_ms,
            to = granularity_ms,
            "x-axis granularity changed"
        );
        self.granularity_ms = granularity_ms;
        self.ms_per_px = self.default_ms_per_px();
        self.prev_ms_per_px = self.ms_per_px;
    }

    fn update_entries(&mut self, entries: &[i64]) -> EntriesChange {
        let change = classify_entries(&self.entries, entries, self.entries_loaded);
        let max_diff = max_allowed_gap_diff(self.granularity_ms);
        let was_following = self.viewing_mode() == ViewingMode::FollowCurrentTick;
        let previous_last = self.entries.last().copied();

        match change {
            EntriesChange::FirstLoad | EntriesChange::Reload => {
                self.gaps.replace_gaps(find_gaps(entries, max_diff));
                debug!(
                    ?change,
                    entries = entries.len(),
                    gaps = self.gaps.gaps().len(),
                    "x-axis gaps recomputed"
                );
            }
            EntriesChange::HistoryPrepended { count } => {
                self.gaps.insert_in_front(find_gaps(&entries[..=count], max_diff));
                trace!(count, "history prepended");
            }
            EntriesChange::TickAppended { count } => {
                let tail_start = entries.len().saturating_sub(count + 1);
                self.gaps.append_gaps(find_gaps(&entries[tail_start..], max_diff));
            }
            EntriesChange::Unchanged => {}
        }

        self.entries.clear();
        self.entries.extend_from_slice(entries);
        self.entries_loaded = true;

        match change {
            EntriesChange::FirstLoad | EntriesChange::Reload => {
                let offset_px = self
                    .pending_offset_px
                    .take()
                    .unwrap_or_else(|| self.config.initial_offset_px());
                if let Some(&last) = entries.last() {
                    self.kinetic.stop();
                    self.scroll_animation = None;
                    self.right_bound_epoch = self.shift_epoch(last, offset_px);
                }
            }
            EntriesChange::TickAppended { .. } if was_following && !self.config.smooth_scrolling => {
                if let (Some(previous), Some(&last)) = (previous_last, entries.last()) {
                    self.right_bound_epoch += last - previous;
                    self.clamp_right_bound();
                }
            }
            _ => {}
        }
        change
    }

    fn update_epoch_bounds(&mut self, min_epoch: Option<i64>, max_epoch: Option<i64>) {
        if min_epoch.is_some() {
            self.min_epoch = min_epoch;
        }
        if max_epoch.is_some() {
            self.max_epoch = max_epoch;
        }
        self.clamp_right_bound();
    }
}

/// Detects history loads and tick appends by anchoring on the list ends.
fn classify_entries(old: &[i64], new: &[i64], loaded: bool) -> EntriesChange {
    if !loaded {
        return EntriesChange::FirstLoad;
    }
    let (Some(&old_first), Some(&old_last), Some(&new_first), Some(&new_last)) =
        (old.first(), old.last(), new.first(), new.last())
    else {
        return if old.is_empty() && new.is_empty() {
            EntriesChange::Unchanged
        } else {
            EntriesChange::Reload
        };
    };

    if new_last == old_last {
        if new.len() == old.len() && new_first == old_first {
            return EntriesChange::Unchanged;
        }
        if new.len() > old.len() {
            let count = new.len() - old.len();
            if new[count] == old_first {
                return EntriesChange::HistoryPrepended { count };
            }
        }
        return EntriesChange::Reload;
    }

    if new_last > old_last {
        if let Ok(anchor) = new.binary_search(&old_last) {
            // Entries before the anchor must be a suffix of the old list.
            let dropped = old.len().checked_sub(anchor + 1);
            if dropped.is_some_and(|dropped| old[dropped] == new_first) {
                return EntriesChange::TickAppended {
                    count: new.len() - anchor - 1,
                };
            }
        }
    }

    EntriesChange::Reload
}
