use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Style contract for the current render frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub series_line_color: Color,
    pub series_line_width: f64,
    pub bullish_color: Color,
    pub bearish_color: Color,
    /// Wick and OHLC bar stroke width.
    pub wick_width: f64,
    pub barrier_color: Color,
    pub barrier_line_width: f64,
    pub marker_up_color: Color,
    pub marker_down_color: Color,
    pub marker_radius_px: f64,
    pub crosshair_line_color: Color,
    pub crosshair_line_width: f64,
    pub crosshair_dot_radius_px: f64,
    pub current_tick_color: Color,
    pub current_tick_radius_px: f64,
    /// Extra radius of the pulsing halo around the current tick at full blink.
    pub blink_halo_px: f64,
    pub label_text_color: Color,
    pub label_box_color: Color,
    pub label_font_size_px: f64,
    pub label_padding_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            series_line_color: Color::rgb(0.16, 0.38, 1.0),
            series_line_width: 1.5,
            bullish_color: Color::rgb(0.3, 0.69, 0.31),
            bearish_color: Color::rgb(0.9, 0.22, 0.21),
            wick_width: 1.0,
            barrier_color: Color::rgb(0.55, 0.55, 0.6),
            barrier_line_width: 1.0,
            marker_up_color: Color::rgb(0.3, 0.69, 0.31),
            marker_down_color: Color::rgb(0.9, 0.22, 0.21),
            marker_radius_px: 4.0,
            crosshair_line_color: Color::rgba(0.6, 0.6, 0.65, 0.9),
            crosshair_line_width: 1.0,
            crosshair_dot_radius_px: 4.0,
            current_tick_color: Color::rgb(0.16, 0.38, 1.0),
            current_tick_radius_px: 3.0,
            blink_halo_px: 6.0,
            label_text_color: Color::rgb(1.0, 1.0, 1.0),
            label_box_color: Color::rgba(0.12, 0.13, 0.16, 0.95),
            label_font_size_px: 11.0,
            label_padding_px: 4.0,
        }
    }
}
