use crate::axis::XAxisConfig;
use crate::core::{VerticalPadding, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{GestureConfig, KineticPanConfig};
use crate::render::RenderStyle;

use super::ChartEngineConfig;

pub(super) fn validate_engine_config(config: &ChartEngineConfig) -> ChartResult<()> {
    validate_viewport(config.viewport)?;
    validate_x_axis_config(config.x_axis)?;
    for (name, value) in [
        ("quote_bounds_animation_ms", config.quote_bounds_animation_ms),
        ("current_tick_animation_ms", config.current_tick_animation_ms),
        ("annotation_animation_ms", config.annotation_animation_ms),
    ] {
        validate_duration(name, value)?;
    }
    if !config.blink_period_ms.is_finite() || config.blink_period_ms <= 0.0 {
        return Err(ChartError::InvalidConfig(
            "blink_period_ms must be finite and > 0".to_owned(),
        ));
    }
    if config.pip_size > 12 {
        return Err(ChartError::InvalidConfig(
            "pip_size must be <= 12".to_owned(),
        ));
    }
    validate_vertical_padding(config.vertical_padding)?;
    validate_gesture_config(config.gestures)?;
    validate_render_style(config.style)?;
    Ok(())
}

pub(super) fn validate_viewport(viewport: Viewport) -> ChartResult<()> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}

pub(super) fn validate_x_axis_config(config: XAxisConfig) -> ChartResult<XAxisConfig> {
    if !config.max_current_tick_offset_px.is_finite() || config.max_current_tick_offset_px < 0.0 {
        return Err(ChartError::InvalidConfig(
            "max_current_tick_offset_px must be finite and >= 0".to_owned(),
        ));
    }
    if let Some(initial) = config.initial_current_tick_offset_px {
        if !initial.is_finite() || initial < 0.0 {
            return Err(ChartError::InvalidConfig(
                "initial_current_tick_offset_px must be finite and >= 0".to_owned(),
            ));
        }
    }

    let widths = [
        config.min_interval_width_px,
        config.default_interval_width_px,
        config.max_interval_width_px,
    ];
    if widths.iter().any(|width| !width.is_finite() || *width <= 0.0) {
        return Err(ChartError::InvalidConfig(
            "interval widths must be finite and > 0".to_owned(),
        ));
    }
    if config.min_interval_width_px > config.default_interval_width_px
        || config.default_interval_width_px > config.max_interval_width_px
    {
        return Err(ChartError::InvalidConfig(
            "interval widths must satisfy min <= default <= max".to_owned(),
        ));
    }

    let padding = config.data_fit_padding;
    if [padding.left, padding.top, padding.right, padding.bottom]
        .iter()
        .any(|value| !value.is_finite() || *value < 0.0)
    {
        return Err(ChartError::InvalidConfig(
            "data-fit padding must be finite and >= 0".to_owned(),
        ));
    }

    validate_kinetic_pan_config(config.kinetic_pan)?;
    Ok(config)
}

pub(super) fn validate_kinetic_pan_config(config: KineticPanConfig) -> ChartResult<()> {
    if !config.decay_per_second.is_finite()
        || config.decay_per_second <= 0.0
        || config.decay_per_second >= 1.0
    {
        return Err(ChartError::InvalidConfig(
            "kinetic pan decay_per_second must be finite and in (0, 1)".to_owned(),
        ));
    }
    if !config.stop_velocity_abs.is_finite() || config.stop_velocity_abs <= 0.0 {
        return Err(ChartError::InvalidConfig(
            "kinetic pan stop_velocity_abs must be finite and > 0".to_owned(),
        ));
    }
    if !config.min_start_velocity_abs.is_finite() || config.min_start_velocity_abs < 0.0 {
        return Err(ChartError::InvalidConfig(
            "kinetic pan min_start_velocity_abs must be finite and >= 0".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_vertical_padding(padding: VerticalPadding) -> ChartResult<VerticalPadding> {
    if !padding.fraction.is_finite() || !(0.0..=0.45).contains(&padding.fraction) {
        return Err(ChartError::InvalidConfig(
            "vertical padding fraction must be finite and in [0, 0.45]".to_owned(),
        ));
    }
    if !padding.min_px.is_finite() || padding.min_px < 0.0 {
        return Err(ChartError::InvalidConfig(
            "vertical padding min_px must be finite and >= 0".to_owned(),
        ));
    }
    Ok(padding)
}

fn validate_gesture_config(config: GestureConfig) -> ChartResult<()> {
    for (name, value) in [
        ("tap_slop_px", config.tap_slop_px),
        ("hold_radius_px", config.hold_radius_px),
        ("double_tap_slop_px", config.double_tap_slop_px),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "gesture {name} must be finite and >= 0"
            )));
        }
    }
    if config.long_press_ms <= 0 || config.double_tap_timeout_ms <= 0 {
        return Err(ChartError::InvalidConfig(
            "gesture timeouts must be > 0".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_render_style(style: RenderStyle) -> ChartResult<RenderStyle> {
    for color in [
        style.series_line_color,
        style.bullish_color,
        style.bearish_color,
        style.barrier_color,
        style.marker_up_color,
        style.marker_down_color,
        style.crosshair_line_color,
        style.current_tick_color,
        style.label_text_color,
        style.label_box_color,
    ] {
        color.validate()?;
    }

    for (name, value) in [
        ("series_line_width", style.series_line_width),
        ("wick_width", style.wick_width),
        ("barrier_line_width", style.barrier_line_width),
        ("crosshair_line_width", style.crosshair_line_width),
        ("label_font_size_px", style.label_font_size_px),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "render style `{name}` must be finite and > 0"
            )));
        }
    }

    for (name, value) in [
        ("marker_radius_px", style.marker_radius_px),
        ("crosshair_dot_radius_px", style.crosshair_dot_radius_px),
        ("current_tick_radius_px", style.current_tick_radius_px),
        ("blink_halo_px", style.blink_halo_px),
        ("label_padding_px", style.label_padding_px),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "render style `{name}` must be finite and >= 0"
            )));
        }
    }
    Ok(style)
}

fn validate_duration(name: &str, value: f64) -> ChartResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}
