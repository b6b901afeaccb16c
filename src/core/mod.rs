pub mod annotations;
pub mod gaps;
pub mod price_scale;
pub mod primitives;
pub mod series;
pub mod tick;
pub mod time_scale;
pub mod transform;
pub mod types;
pub mod windowing;

pub use annotations::{
    Annotation, AnnotationSet, Barrier, BarrierVisibility, Marker, MarkerDirection,
};
pub use gaps::{GapManager, MIN_GAP_DURATION_MS, TimeGap, find_gaps, max_allowed_gap_diff};
pub use price_scale::{FLAT_RANGE_EXPANSION, PriceScale, VerticalPadding, expand_flat_range};
pub use series::{CandleGeometry, LineSegment, LiveUpdate, Series, SeriesGeometry, SeriesKind};
pub use tick::{Candle, SeriesEntry, Tick};
pub use time_scale::TimeScale;
pub use transform::ChartTransform;
pub use types::{PixelPoint, Viewport};
