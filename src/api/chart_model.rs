use crate::core::{AnnotationSet, Series, SeriesEntry};

/// Chart data grouped separately from viewport, animation and runtime state.
#[derive(Debug, Clone, Default)]
pub(super) struct ChartModel {
    pub(super) series: Option<Series>,
    /// Epochs of `series`, kept in step with it for the x-axis updates.
    pub(super) epochs: Vec<i64>,
    /// `0` for raw ticks.
    pub(super) granularity_ms: i64,
    pub(super) is_live: bool,
    pub(super) annotations: AnnotationSet,
}

impl ChartModel {
    #[must_use]
    pub(super) fn entries_len(&self) -> usize {
        self.epochs.len()
    }

    #[must_use]
    pub(super) fn last_entry(&self) -> Option<SeriesEntry> {
        self.series.as_ref().and_then(Series::last_entry)
    }

    /// Earliest epoch among entries and annotations.
    #[must_use]
    pub(super) fn min_epoch(&self) -> Option<i64> {
        let first = self.epochs.first().copied();
        match (first, self.annotations.min_epoch()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Latest epoch among entries and annotations.
    #[must_use]
    pub(super) fn max_epoch(&self) -> Option<i64> {
        let last = self.epochs.last().copied();
        match (last, self.annotations.max_epoch()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}
