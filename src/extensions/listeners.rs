use serde::{Deserialize, Serialize};

use crate::axis::{ViewingMode, VisibleArea};
use crate::core::{PixelPoint, SeriesEntry, Viewport};

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartContext {
    pub viewport: Viewport,
    pub visible_area: VisibleArea,
    /// Animated quote bounds as painted this frame.
    pub quote_bounds: (f64, f64),
    pub entries_len: usize,
    pub viewing_mode: ViewingMode,
    pub is_live: bool,
}

/// Event stream exposed to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    VisibleAreaChanged { left_epoch: i64, right_epoch: i64 },
    QuoteAreaChanged { top_quote: f64, bottom_quote: f64 },
    /// `None` when the crosshair hides or leaves the data.
    CrosshairTickChanged { tick: Option<SeriesEntry> },
    DataUpdated { entries_len: usize },
    Tapped { position: PixelPoint },
    DoubleTapped { position: PixelPoint },
    Rendered,
}

/// Host hook for chart events.
///
/// Listeners observe events and read engine context without mutating
/// engine internals.
pub trait ChartListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChartEvent, context: ChartContext);
}
