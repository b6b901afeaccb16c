use crate::axis::XAxisModel;
use crate::interaction::CrosshairController;

use super::{
    ChartEngineConfig, chart_animation::ChartAnimationState, chart_model::ChartModel,
    chart_presentation::ChartPresentationState, chart_runtime::ChartRuntimeState,
};

/// Internal engine core state used by the public facade (`ChartEngine`).
pub(super) struct EngineCore {
    pub(super) config: ChartEngineConfig,
    pub(super) model: ChartModel,
    pub(super) x_axis: XAxisModel,
    pub(super) crosshair: CrosshairController,
    pub(super) animation: ChartAnimationState,
    pub(super) presentation: ChartPresentationState,
    pub(super) runtime: ChartRuntimeState,
}
