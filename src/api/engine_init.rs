use tracing::debug;

use crate::axis::XAxisModel;
use crate::error::ChartResult;
use crate::interaction::{CrosshairController, GestureRecognizer};
use crate::render::Renderer;

use super::{
    ChartEngine, ChartEngineConfig, chart_animation::ChartAnimationState, chart_model::ChartModel,
    chart_presentation::ChartPresentationState, chart_runtime::ChartRuntimeState,
    engine_core::EngineCore, validation::validate_engine_config,
};

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine with no data.
    ///
    /// The frame clock starts at `0`; the first [`ChartEngine::on_frame`]
    /// call sets it.
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        validate_engine_config(&config)?;

        let x_axis = XAxisModel::new(config.x_axis, config.viewport.width, 0);
        let engine = Self {
            renderer,
            core: EngineCore {
                config,
                model: ChartModel::default(),
                x_axis,
                crosshair: CrosshairController::new(config.crosshair_snap_policy),
                animation: ChartAnimationState::new(config.blink_period_ms),
                presentation: ChartPresentationState::new(
                    config.style,
                    config.pip_size,
                    config.vertical_padding,
                ),
                runtime: ChartRuntimeState::new(GestureRecognizer::new(config.gestures)),
            },
        };
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            "chart engine created"
        );
        Ok(engine)
    }
}
