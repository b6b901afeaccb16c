use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_ms, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// Single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub epoch: i64,
    pub quote: f64,
}

impl Tick {
    #[must_use]
    pub fn new(epoch: i64, quote: f64) -> Self {
        Self { epoch, quote }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, quote: Decimal) -> ChartResult<Self> {
        let quote = decimal_to_f64(quote, "quote")?;
        if !quote.is_finite() {
            return Err(ChartError::InvalidData("quote must be finite".to_owned()));
        }
        Ok(Self::new(datetime_to_epoch_ms(time), quote))
    }
}

/// OHLC bucket opened at `epoch` and last updated at `current_epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub epoch: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub current_epoch: i64,
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all prices are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(epoch: i64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if !open.is_finite() || !high.is_finite() || !low.is_finite() || !close.is_finite() {
            return Err(ChartError::InvalidData(
                "ohlc values must be finite".to_owned(),
            ));
        }

        if low > high {
            return Err(ChartError::InvalidData(
                "ohlc low must be <= high".to_owned(),
            ));
        }

        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "ohlc open/close must be within low/high range".to_owned(),
            ));
        }

        Ok(Self {
            epoch,
            open,
            high,
            low,
            close,
            current_epoch: epoch,
        })
    }

    /// Converts strongly-typed temporal/decimal input into a validated candle.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_epoch_ms(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }

    /// Candle whose four prices collapse onto one quote.
    #[must_use]
    pub fn flat(epoch: i64, quote: f64) -> Self {
        Self {
            epoch,
            open: quote,
            high: quote,
            low: quote,
            close: quote,
            current_epoch: epoch,
        }
    }

    #[must_use]
    pub fn with_current_epoch(mut self, current_epoch: i64) -> Self {
        self.current_epoch = current_epoch;
        self
    }

    /// Folds a live quote into this (still open) bucket.
    pub fn apply_tick(&mut self, epoch: i64, quote: f64) {
        self.high = self.high.max(quote);
        self.low = self.low.min(quote);
        self.close = quote;
        self.current_epoch = self.current_epoch.max(epoch);
    }

    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }
}

/// One entry of any series kind, used where line and candle entries meet
/// (crosshair snapping, virtual entries).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeriesEntry {
    Tick(Tick),
    Candle(Candle),
}

impl SeriesEntry {
    #[must_use]
    pub fn epoch(self) -> i64 {
        match self {
            Self::Tick(tick) => tick.epoch,
            Self::Candle(candle) => candle.epoch,
        }
    }

    /// Representative quote: the tick quote or the candle close.
    #[must_use]
    pub fn quote(self) -> f64 {
        match self {
            Self::Tick(tick) => tick.quote,
            Self::Candle(candle) => candle.close,
        }
    }

    #[must_use]
    pub fn as_tick(self) -> Tick {
        Tick::new(self.epoch(), self.quote())
    }
}
