use serde::{Deserialize, Serialize};

use crate::axis::{ViewingMode, VisibleArea};
use crate::core::Viewport;
use crate::interaction::CrosshairState;

use super::LabelWidthCacheStats;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub now_ms: i64,
    pub visible_area: VisibleArea,
    pub viewing_mode: ViewingMode,
    pub ms_per_px: f64,
    pub granularity_ms: i64,
    pub is_live: bool,
    /// `(bottom, top)` as painted at `now_ms`.
    pub quote_bounds: (f64, f64),
    pub crosshair: Option<CrosshairState>,
    pub entries_len: usize,
    pub gap_count: usize,
    pub annotation_ids: Vec<String>,
    pub label_width_cache: LabelWidthCacheStats,
    pub is_disposed: bool,
}
