use crate::core::{Annotation, BarrierVisibility, MarkerDirection, SeriesGeometry};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PaintContext, RectPrimitive, RenderFrame, RenderStyle,
    Renderer, TextHAlign, TextPrimitive,
};

use super::ChartEngine;

/// Candle body width as a share of one granularity bucket.
const CANDLE_BODY_RATIO: f64 = 0.6;
const MAX_CANDLE_BODY_WIDTH_PX: f64 = 40.0;

impl<R: Renderer> ChartEngine<R> {
    /// Materializes the scene at the latest frame time.
    ///
    /// Pure with respect to engine state apart from the label-width cache.
    #[must_use]
    pub fn build_render_frame(&self) -> RenderFrame {
        let core = &self.core;
        let now_ms = core.runtime.now_ms;
        let style = &core.presentation.render_style;

        let mut context = PaintContext::new(self.transform_at(now_ms), style, now_ms);
        context.annotation_progress = core.animation.annotations.value(now_ms);
        context.blink_progress = core.animation.blink.progress(now_ms);
        context.pip_size = core.presentation.pip_size;
        context.candle_body_width_px = (core.x_axis.interval_width_px() * CANDLE_BODY_RATIO)
            .clamp(1.0, MAX_CANDLE_BODY_WIDTH_PX);
        context.animated_last_entry = core
            .animation
            .current_tick
            .animated(core.model.last_entry(), now_ms);

        let mut frame = RenderFrame::new(core.config.viewport, now_ms);
        if let Some(series) = core.model.series.as_ref() {
            push_series_geometry(&mut frame, series.project(&context), style);
        }
        self.push_annotations(&mut frame, &context);
        if core.model.is_live {
            self.push_current_tick(&mut frame, &context);
        }
        self.push_crosshair(&mut frame, &context);
        frame
    }

    fn push_annotations(&self, frame: &mut RenderFrame, context: &PaintContext<'_>) {
        let style = context.style;
        let transform = &context.transform;
        let width = context.width();
        let bottom = transform.price_scale.bottom_quote();
        let top = transform.price_scale.top_quote();

        for keyframe in self
            .core
            .model
            .annotations
            .keyframes(context.annotation_progress)
        {
            match keyframe.value() {
                Annotation::Barrier(barrier) => {
                    let in_range = (bottom..=top).contains(&barrier.quote);
                    if barrier.visibility == BarrierVisibility::Normal && !in_range {
                        continue;
                    }
                    let x_start = barrier
                        .epoch
                        .map_or(0.0, |epoch| transform.x_from_epoch(epoch).max(0.0));
                    if x_start >= width {
                        continue;
                    }
                    let y = transform.quote_to_y(barrier.quote);
                    frame.lines.push(
                        LinePrimitive::new(
                            x_start,
                            y,
                            width,
                            y,
                            style.barrier_line_width,
                            style.barrier_color,
                        )
                        .dashed(),
                    );
                    self.push_quote_label(frame, context, barrier.quote, y, style.barrier_color);
                }
                Annotation::Marker(marker) => {
                    let x = transform.x_from_epoch(marker.epoch);
                    if !(0.0..=width).contains(&x) {
                        continue;
                    }
                    let color = match marker.direction {
                        MarkerDirection::Up => style.marker_up_color,
                        MarkerDirection::Down => style.marker_down_color,
                    };
                    frame.circles.push(CirclePrimitive::new(
                        x,
                        transform.quote_to_y(marker.quote),
                        style.marker_radius_px,
                        color,
                    ));
                }
            }
        }
    }

    /// Live dot on the latest entry, with a halo pulsing on the blink loop.
    fn push_current_tick(&self, frame: &mut RenderFrame, context: &PaintContext<'_>) {
        let Some(entry) = context.animated_last_entry else {
            return;
        };
        let style = context.style;
        let x = context.transform.x_from_epoch(entry.epoch());
        let y = context.transform.quote_to_y(entry.quote());

        if self.core.animation.blink.is_enabled() {
            let halo_radius = style.current_tick_radius_px + style.blink_halo_px * context.blink_progress;
            frame.circles.push(CirclePrimitive::new(
                x,
                y,
                halo_radius,
                style.current_tick_color.fade(0.5 * (1.0 - context.blink_progress)),
            ));
        }
        frame.circles.push(CirclePrimitive::new(
            x,
            y,
            style.current_tick_radius_px,
            style.current_tick_color,
        ));
        self.push_quote_label(frame, context, entry.quote(), y, style.current_tick_color);
    }

    fn push_crosshair(&self, frame: &mut RenderFrame, context: &PaintContext<'_>) {
        let crosshair = &self.core.crosshair;
        if !crosshair.is_visible() {
            return;
        }
        let Some(tick) = crosshair.animated_tick(context.now_ms) else {
            return;
        };
        let style = context.style;
        let x = context.transform.x_from_epoch(tick.epoch());
        let y = context.transform.quote_to_y(tick.quote());
        let (width, height) = (context.width(), context.height());

        frame.lines.push(LinePrimitive::new(
            x,
            0.0,
            x,
            height,
            style.crosshair_line_width,
            style.crosshair_line_color,
        ));
        frame.lines.push(
            LinePrimitive::new(
                0.0,
                y,
                width,
                y,
                style.crosshair_line_width,
                style.crosshair_line_color,
            )
            .dashed(),
        );
        frame.circles.push(CirclePrimitive::new(
            x,
            y,
            style.crosshair_dot_radius_px,
            style.crosshair_line_color,
        ));
        self.push_quote_label(frame, context, tick.quote(), y, style.label_box_color);
    }

    /// Quote label pinned to the right edge, vertically centered on `y`.
    fn push_quote_label(
        &self,
        frame: &mut RenderFrame,
        context: &PaintContext<'_>,
        quote: f64,
        y: f64,
        box_color: Color,
    ) {
        let style = context.style;
        let text = context.format_quote(quote);
        let label_width = self.core.presentation.label_widths.borrow_mut().width_for(
            &text,
            style.label_font_size_px,
            style.label_padding_px,
        );
        let label_height = style.label_font_size_px + 2.0 * style.label_padding_px;
        let right = context.width();

        frame.rects.push(RectPrimitive::new(
            right - label_width,
            y - label_height / 2.0,
            label_width,
            label_height,
            box_color,
        ));
        frame.texts.push(TextPrimitive::new(
            text,
            right - style.label_padding_px,
            y,
            style.label_font_size_px,
            style.label_text_color,
            TextHAlign::Right,
        ));
    }
}

fn push_series_geometry(frame: &mut RenderFrame, geometry: SeriesGeometry, style: &RenderStyle) {
    match geometry {
        SeriesGeometry::Line(segments) => {
            frame.lines.extend(segments.into_iter().map(|segment| {
                LinePrimitive::new(
                    segment.x1,
                    segment.y1,
                    segment.x2,
                    segment.y2,
                    style.series_line_width,
                    style.series_line_color,
                )
            }));
        }
        SeriesGeometry::Candles(candles) => {
            for candle in candles {
                let color = candle_color(candle.is_bullish, style);
                frame.lines.push(LinePrimitive::new(
                    candle.center_x,
                    candle.wick_top,
                    candle.center_x,
                    candle.wick_bottom,
                    style.wick_width,
                    color,
                ));
                frame.rects.push(RectPrimitive::new(
                    candle.body_left,
                    candle.body_top(),
                    candle.body_right - candle.body_left,
                    (candle.body_bottom() - candle.body_top()).max(1.0),
                    color,
                ));
            }
        }
        SeriesGeometry::OhlcBars(bars) => {
            for bar in bars {
                let color = candle_color(bar.is_bullish, style);
                frame.lines.push(LinePrimitive::new(
                    bar.center_x,
                    bar.wick_top,
                    bar.center_x,
                    bar.wick_bottom,
                    style.wick_width,
                    color,
                ));
                frame.lines.push(LinePrimitive::new(
                    bar.body_left,
                    bar.open_y,
                    bar.center_x,
                    bar.open_y,
                    style.wick_width,
                    color,
                ));
                frame.lines.push(LinePrimitive::new(
                    bar.center_x,
                    bar.close_y,
                    bar.body_right,
                    bar.close_y,
                    style.wick_width,
                    color,
                ));
            }
        }
    }
}

fn candle_color(is_bullish: bool, style: &RenderStyle) -> Color {
    if is_bullish {
        style.bullish_color
    } else {
        style.bearish_color
    }
}
