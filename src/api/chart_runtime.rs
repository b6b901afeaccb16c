use crate::axis::VisibleArea;
use crate::extensions::ChartListener;
use crate::interaction::GestureRecognizer;

/// Runtime orchestration state grouped separately from model/animation/presentation.
pub(super) struct ChartRuntimeState {
    pub(super) listeners: Vec<Box<dyn ChartListener>>,
    /// Recognizer behind [`super::ChartEngine::handle_pointer`].
    pub(super) recognizer: GestureRecognizer,
    /// Frame clock: the `now_ms` of the latest frame.
    pub(super) now_ms: i64,
    pub(super) last_visible_area: Option<VisibleArea>,
    pub(super) last_quote_area: Option<(f64, f64)>,
    pub(super) disposed: bool,
}

impl ChartRuntimeState {
    #[must_use]
    pub(super) fn new(recognizer: GestureRecognizer) -> Self {
        Self {
            listeners: Vec::new(),
            recognizer,
            now_ms: 0,
            last_visible_area: None,
            last_quote_area: None,
            disposed: false,
        }
    }
}
