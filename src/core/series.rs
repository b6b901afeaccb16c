use std::borrow::Cow;
use std::ops::Range;

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::tick::{Candle, SeriesEntry, Tick};
use crate::core::transform::ChartTransform;
use crate::core::windowing::{nearest_index, visible_index_range};
use crate::error::{ChartError, ChartResult};
use crate::render::PaintContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Candle,
    Ohlc,
}

/// Closed set of series variants, selected when the series is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Series {
    Line(Vec<Tick>),
    Candle(Vec<Candle>),
    Ohlc(Vec<Candle>),
}

/// Outcome of folding a live tick into a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveUpdate {
    /// A new entry was appended.
    Appended,
    /// The last entry was updated in place.
    Replaced,
    /// The tick was older than the last entry and dropped.
    Ignored,
}

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Projected candle (or OHLC bar) geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub open_y: f64,
    pub close_y: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

impl CandleGeometry {
    #[must_use]
    pub fn body_top(self) -> f64 {
        self.open_y.min(self.close_y)
    }

    #[must_use]
    pub fn body_bottom(self) -> f64 {
        self.open_y.max(self.close_y)
    }
}

/// Renderable representation of the visible part of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesGeometry {
    Line(Vec<LineSegment>),
    Candles(Vec<CandleGeometry>),
    OhlcBars(Vec<CandleGeometry>),
}

impl Series {
    /// Builds a line series, rejecting unsorted or duplicate epochs.
    pub fn line(ticks: Vec<Tick>) -> ChartResult<Self> {
        validate_epochs(ticks.iter().map(|tick| tick.epoch))?;
        if ticks.iter().any(|tick| !tick.quote.is_finite()) {
            return Err(ChartError::InvalidData("quotes must be finite".to_owned()));
        }
        Ok(Self::Line(ticks))
    }

    pub fn candles(candles: Vec<Candle>) -> ChartResult<Self> {
        validate_epochs(candles.iter().map(|candle| candle.epoch))?;
        Ok(Self::Candle(candles))
    }

    pub fn ohlc(candles: Vec<Candle>) -> ChartResult<Self> {
        validate_epochs(candles.iter().map(|candle| candle.epoch))?;
        Ok(Self::Ohlc(candles))
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        match self {
            Self::Line(_) => SeriesKind::Line,
            Self::Candle(_) => SeriesKind::Candle,
            Self::Ohlc(_) => SeriesKind::Ohlc,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Line(ticks) => ticks.len(),
            Self::Candle(candles) | Self::Ohlc(candles) => candles.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<SeriesEntry> {
        match self {
            Self::Line(ticks) => ticks.get(index).copied().map(SeriesEntry::Tick),
            Self::Candle(candles) | Self::Ohlc(candles) => {
                candles.get(index).copied().map(SeriesEntry::Candle)
            }
        }
    }

    #[must_use]
    pub fn first_entry(&self) -> Option<SeriesEntry> {
        self.entry(0)
    }

    #[must_use]
    pub fn last_entry(&self) -> Option<SeriesEntry> {
        self.len().checked_sub(1).and_then(|index| self.entry(index))
    }

    #[must_use]
    pub fn epochs(&self) -> Vec<i64> {
        match self {
            Self::Line(ticks) => ticks.iter().map(|tick| tick.epoch).collect(),
            Self::Candle(candles) | Self::Ohlc(candles) => {
                candles.iter().map(|candle| candle.epoch).collect()
            }
        }
    }

    /// Lowest and highest quote among entries around `[start, end]`.
    #[must_use]
    pub fn min_max_quote(&self, start: i64, end: i64) -> Option<(f64, f64)> {
        let fold = |acc: Option<(f64, f64)>, (low, high): (f64, f64)| {
            Some(acc.map_or((low, high), |(min, max)| (min.min(low), max.max(high))))
        };
        match self {
            Self::Line(ticks) => {
                let range = visible_index_range(ticks, start, end, |tick| tick.epoch);
                ticks[range]
                    .iter()
                    .map(|tick| (tick.quote, tick.quote))
                    .fold(None, fold)
            }
            Self::Candle(candles) | Self::Ohlc(candles) => {
                let range = visible_index_range(candles, start, end, |candle| candle.epoch);
                candles[range]
                    .iter()
                    .map(|candle| (candle.low, candle.high))
                    .fold(None, fold)
            }
        }
    }

    /// Entry nearest to `epoch` (later entry on ties).
    #[must_use]
    pub fn nearest_entry(&self, epoch: i64) -> Option<SeriesEntry> {
        let index = match self {
            Self::Line(ticks) => nearest_index(ticks, epoch, |tick| tick.epoch),
            Self::Candle(candles) | Self::Ohlc(candles) => {
                nearest_index(candles, epoch, |candle| candle.epoch)
            }
        }?;
        self.entry(index)
    }

    /// Synthesizes an entry of this series' kind at an arbitrary point.
    #[must_use]
    pub fn create_virtual_tick(&self, epoch: i64, quote: f64) -> SeriesEntry {
        match self {
            Self::Line(_) => SeriesEntry::Tick(Tick::new(epoch, quote)),
            Self::Candle(_) | Self::Ohlc(_) => SeriesEntry::Candle(Candle::flat(epoch, quote)),
        }
    }

    /// Folds a live tick into the series.
    ///
    /// Line series replace the last tick on an equal epoch and append on a
    /// newer one. Candle series update the open bucket until `granularity_ms`
    /// has elapsed since its open time, then start a new bucket.
    pub fn apply_live_tick(&mut self, tick: Tick, granularity_ms: i64) -> LiveUpdate {
        match self {
            Self::Line(ticks) => {
                let Some(last_index) = ticks.len().checked_sub(1) else {
                    ticks.push(tick);
                    return LiveUpdate::Appended;
                };
                let last_epoch = ticks[last_index].epoch;
                if tick.epoch == last_epoch {
                    ticks[last_index] = tick;
                    LiveUpdate::Replaced
                } else if tick.epoch < last_epoch {
                    LiveUpdate::Ignored
                } else {
                    ticks.push(tick);
                    LiveUpdate::Appended
                }
            }
            Self::Candle(candles) | Self::Ohlc(candles) => {
                let Some(last_index) = candles.len().checked_sub(1) else {
                    candles.push(Candle::flat(tick.epoch, tick.quote));
                    return LiveUpdate::Appended;
                };
                let bucket = granularity_ms.max(1);
                let open_epoch = candles[last_index].epoch;
                if tick.epoch < open_epoch {
                    LiveUpdate::Ignored
                } else if tick.epoch < open_epoch + bucket {
                    candles[last_index].apply_tick(tick.epoch, tick.quote);
                    LiveUpdate::Replaced
                } else {
                    let bucket_epoch = open_epoch + (tick.epoch - open_epoch) / bucket * bucket;
                    candles.push(Candle::flat(bucket_epoch, tick.quote).with_current_epoch(tick.epoch));
                    LiveUpdate::Appended
                }
            }
        }
    }

    /// Projects the entries around the visible window into pixel geometry.
    ///
    /// When the pass carries an animated latest entry, it stands in for the
    /// series' last entry so new ticks glide into place.
    #[must_use]
    pub fn project(&self, context: &PaintContext<'_>) -> SeriesGeometry {
        let transform = &context.transform;
        let body_width_px = context.candle_body_width_px;
        let left = transform.left_bound_epoch();
        let right = transform.right_bound_epoch();
        match self {
            Self::Line(ticks) => {
                let range = visible_index_range(ticks, left, right, |tick| tick.epoch);
                let animated = context.animated_last_entry.map(SeriesEntry::as_tick);
                let visible = with_animated_last(ticks, range, animated);
                SeriesGeometry::Line(project_line_segments(&visible, transform))
            }
            Self::Candle(candles) | Self::Ohlc(candles) => {
                let range = visible_index_range(candles, left, right, |candle| candle.epoch);
                let animated = context.animated_last_entry.and_then(|entry| match entry {
                    SeriesEntry::Candle(candle) => Some(candle),
                    SeriesEntry::Tick(_) => None,
                });
                let visible = with_animated_last(candles, range, animated);
                let geometry = project_candles(&visible, transform, body_width_px);
                if matches!(self, Self::Candle(_)) {
                    SeriesGeometry::Candles(geometry)
                } else {
                    SeriesGeometry::OhlcBars(geometry)
                }
            }
        }
    }
}

fn with_animated_last<T: Copy>(items: &[T], range: Range<usize>, animated: Option<T>) -> Cow<'_, [T]> {
    match animated {
        Some(entry) if range.end == items.len() && !range.is_empty() => {
            let mut visible = items[range].to_vec();
            if let Some(last) = visible.last_mut() {
                *last = entry;
            }
            Cow::Owned(visible)
        }
        _ => Cow::Borrowed(&items[range]),
    }
}

fn validate_epochs(epochs: impl Iterator<Item = i64>) -> ChartResult<()> {
    let mut previous: Option<i64> = None;
    for epoch in epochs {
        if previous.is_some_and(|prev| epoch <= prev) {
            return Err(ChartError::InvalidData(
                "series epochs must be strictly increasing".to_owned(),
            ));
        }
        previous = Some(epoch);
    }
    Ok(())
}

fn project_line_segments(ticks: &[Tick], transform: &ChartTransform<'_>) -> Vec<LineSegment> {
    if ticks.len() < 2 {
        return Vec::new();
    }

    let mapped: Vec<(f64, f64)> = ticks
        .iter()
        .map(|tick| {
            (
                transform.x_from_epoch(tick.epoch),
                transform.quote_to_y(tick.quote),
            )
        })
        .collect();

    mapped
        .windows(2)
        .map(|pair| LineSegment {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
        })
        .collect()
}

fn project_candles(
    candles: &[Candle],
    transform: &ChartTransform<'_>,
    body_width_px: f64,
) -> Vec<CandleGeometry> {
    let half = if body_width_px.is_finite() {
        body_width_px.max(1.0) / 2.0
    } else {
        0.5
    };

    #[cfg(feature = "parallel-projection")]
    {
        candles
            .par_iter()
            .map(|candle| project_single_candle(*candle, transform, half))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        candles
            .iter()
            .map(|candle| project_single_candle(*candle, transform, half))
            .collect()
    }
}

fn project_single_candle(
    candle: Candle,
    transform: &ChartTransform<'_>,
    half: f64,
) -> CandleGeometry {
    let center_x = transform.x_from_epoch(candle.epoch);
    CandleGeometry {
        center_x,
        body_left: center_x - half,
        body_right: center_x + half,
        open_y: transform.quote_to_y(candle.open),
        close_y: transform.quote_to_y(candle.close),
        wick_top: transform.quote_to_y(candle.high),
        wick_bottom: transform.quote_to_y(candle.low),
        is_bullish: candle.is_bullish(),
    }
}
