use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{ChartEngine, EngineSnapshot};

impl<R: Renderer> ChartEngine<R> {
    /// Builds a deterministic snapshot useful for regression tests.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let core = &self.core;
        EngineSnapshot {
            viewport: core.config.viewport,
            now_ms: core.runtime.now_ms,
            visible_area: core.x_axis.visible_area(),
            viewing_mode: core.x_axis.viewing_mode(),
            ms_per_px: core.x_axis.ms_per_px(),
            granularity_ms: core.model.granularity_ms,
            is_live: core.model.is_live,
            quote_bounds: core.animation.quote_bounds.current(core.runtime.now_ms),
            crosshair: core.crosshair.state(),
            entries_len: core.model.entries_len(),
            gap_count: core.x_axis.gaps().gaps().len(),
            annotation_ids: core
                .model
                .annotations
                .current()
                .iter()
                .map(|annotation| annotation.id().to_owned())
                .collect(),
            label_width_cache: core.presentation.label_widths.borrow().stats(),
            is_disposed: core.runtime.disposed,
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
