use tracing::{debug, trace};

use crate::axis::{EntriesChange, XAxisUpdate};
use crate::core::{Annotation, LiveUpdate, Series, SeriesEntry, Tick};
use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartEvent;
use crate::render::Renderer;

use super::ChartEngine;

/// Main series plus the settings it was produced with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub series: Series,
    /// Candle bucket size in milliseconds; `0` for raw ticks.
    pub granularity_ms: i64,
    pub is_live: bool,
}

impl ChartData {
    #[must_use]
    pub fn new(series: Series, granularity_ms: i64) -> Self {
        Self {
            series,
            granularity_ms,
            is_live: false,
        }
    }

    #[must_use]
    pub fn with_live(mut self, is_live: bool) -> Self {
        self.is_live = is_live;
        self
    }
}

impl<R: Renderer> ChartEngine<R> {
    /// Replaces the main series.
    ///
    /// The new list is compared with the previous one: history prepends and
    /// tick appends keep the viewport, anything else reloads it.
    pub fn set_data(&mut self, data: ChartData) -> ChartResult<EntriesChange> {
        if self.core.runtime.disposed {
            debug!("set_data ignored after dispose");
            return Ok(EntriesChange::Unchanged);
        }
        if data.granularity_ms < 0 {
            return Err(ChartError::InvalidData(
                "granularity must be >= 0".to_owned(),
            ));
        }

        let previous_last = self.core.model.last_entry();
        let previous_bounds = (self.core.model.min_epoch(), self.core.model.max_epoch());

        self.core.model.epochs = data.series.epochs();
        self.core.model.series = Some(data.series);
        self.core.model.granularity_ms = data.granularity_ms;
        self.core.model.is_live = data.is_live;

        let change = self.sync_x_axis(true);
        self.after_data_change(change, previous_last, previous_bounds);
        Ok(change)
    }

    /// Folds one live tick into the main series.
    pub fn push_tick(&mut self, tick: Tick) -> ChartResult<LiveUpdate> {
        if self.core.runtime.disposed {
            debug!(epoch = tick.epoch, "tick dropped after dispose");
            return Ok(LiveUpdate::Ignored);
        }
        if !tick.quote.is_finite() {
            return Err(ChartError::InvalidData(
                "tick quote must be finite".to_owned(),
            ));
        }

        let granularity_ms = self.core.model.granularity_ms;
        let previous_bounds = (self.core.model.min_epoch(), self.core.model.max_epoch());
        let Some(series) = self.core.model.series.as_mut() else {
            return Err(ChartError::InvalidData(
                "live ticks need a series; call set_data first".to_owned(),
            ));
        };
        let previous_last = series.last_entry();
        let outcome = series.apply_live_tick(tick, granularity_ms);
        match outcome {
            LiveUpdate::Ignored => {
                trace!(epoch = tick.epoch, "stale tick ignored");
                return Ok(outcome);
            }
            LiveUpdate::Appended => {
                if let Some(last) = series.last_entry() {
                    self.core.model.epochs.push(last.epoch());
                }
            }
            LiveUpdate::Replaced => {}
        }

        let change = self.sync_x_axis(false);
        self.after_data_change(change, previous_last, previous_bounds);
        Ok(outcome)
    }

    /// Replaces every annotation; annotations keeping their id glide from
    /// their previous state.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) -> ChartResult<()> {
        if self.core.runtime.disposed {
            debug!("set_annotations ignored after dispose");
            return Ok(());
        }
        validate_annotations(&annotations)?;

        let previous_bounds = (self.core.model.min_epoch(), self.core.model.max_epoch());
        self.core.model.annotations.replace(annotations);
        self.core.animation.annotations.restart(
            0.0,
            1.0,
            self.core.config.annotation_animation_ms,
            self.core.runtime.now_ms,
        );
        self.sync_epoch_bounds(previous_bounds);
        Ok(())
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        self.core.model.annotations.current()
    }

    #[must_use]
    pub fn series(&self) -> Option<&Series> {
        self.core.model.series.as_ref()
    }

    #[must_use]
    pub fn granularity_ms(&self) -> i64 {
        self.core.model.granularity_ms
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.core.model.is_live
    }

    /// Switches the live flag without touching the data.
    pub fn set_live(&mut self, is_live: bool) {
        if self.core.runtime.disposed || self.core.model.is_live == is_live {
            return;
        }
        self.core.model.is_live = is_live;
        self.core.x_axis.update(XAxisUpdate {
            is_live: Some(is_live),
            ..XAxisUpdate::default()
        });
    }

    /// Stops the engine: later data, gestures and frames are dropped.
    pub fn dispose(&mut self) {
        if self.core.runtime.disposed {
            return;
        }
        debug!(listeners = self.core.runtime.listeners.len(), "chart engine disposed");
        self.core.runtime.disposed = true;
        self.core.runtime.listeners.clear();
        self.core.x_axis.set_pan_speed(0.0);
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.core.runtime.disposed
    }

    fn sync_x_axis(&mut self, with_settings: bool) -> EntriesChange {
        let model = &self.core.model;
        let update = XAxisUpdate {
            is_live: with_settings.then_some(model.is_live),
            granularity_ms: with_settings.then_some(model.granularity_ms),
            entries: Some(&model.epochs),
            min_epoch: model.min_epoch(),
            max_epoch: model.max_epoch(),
        };
        self.core.x_axis.update(update)
    }

    fn sync_epoch_bounds(&mut self, previous_bounds: (Option<i64>, Option<i64>)) {
        let bounds = (self.core.model.min_epoch(), self.core.model.max_epoch());
        self.core.x_axis.update(XAxisUpdate {
            min_epoch: bounds.0,
            max_epoch: bounds.1,
            ..XAxisUpdate::default()
        });
        if is_full_reset(previous_bounds, bounds) {
            self.core.animation.quote_bounds.request_snap();
        }
    }

    fn after_data_change(
        &mut self,
        change: EntriesChange,
        previous_last: Option<SeriesEntry>,
        previous_bounds: (Option<i64>, Option<i64>),
    ) {
        let now_ms = self.core.runtime.now_ms;
        let bounds = (self.core.model.min_epoch(), self.core.model.max_epoch());
        if is_full_reset(previous_bounds, bounds) {
            self.core.animation.quote_bounds.request_snap();
        }

        match change {
            EntriesChange::FirstLoad | EntriesChange::Reload => {
                self.core.animation.quote_bounds.request_snap();
                self.core.animation.current_tick.reset();
            }
            EntriesChange::TickAppended { .. } | EntriesChange::Unchanged => {
                let current = self.core.model.last_entry();
                if let (Some(previous), Some(current)) = (previous_last, current) {
                    if previous != current {
                        self.core.animation.current_tick.start(
                            previous,
                            current,
                            self.core.config.current_tick_animation_ms,
                            now_ms,
                        );
                    }
                }
            }
            EntriesChange::HistoryPrepended { .. } => {}
        }

        self.emit_event(ChartEvent::DataUpdated {
            entries_len: self.core.model.entries_len(),
        });
    }
}

/// Bounds jump with no transition on first load, or when both ends moved.
fn is_full_reset(
    previous: (Option<i64>, Option<i64>),
    current: (Option<i64>, Option<i64>),
) -> bool {
    previous.0.is_none() || (previous.0 != current.0 && previous.1 != current.1)
}

fn validate_annotations(annotations: &[Annotation]) -> ChartResult<()> {
    for (index, annotation) in annotations.iter().enumerate() {
        if annotation.id().is_empty() {
            return Err(ChartError::InvalidData(
                "annotation id must not be empty".to_owned(),
            ));
        }
        if !annotation.quote().is_finite() {
            return Err(ChartError::InvalidData(format!(
                "annotation `{}` quote must be finite",
                annotation.id()
            )));
        }
        if annotations[..index]
            .iter()
            .any(|other| other.id() == annotation.id())
        {
            return Err(ChartError::DuplicateId {
                kind: "annotation",
                id: annotation.id().to_owned(),
            });
        }
    }
    Ok(())
}
