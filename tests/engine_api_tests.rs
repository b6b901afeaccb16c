use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use livechart::api::{ChartData, ChartEngine, ChartEngineConfig};
use livechart::axis::{EntriesChange, ViewingMode};
use livechart::core::{
    Barrier, BarrierVisibility, Candle, LiveUpdate, Marker, MarkerDirection, PixelPoint, Series,
    Tick, Viewport,
};
use livechart::error::ChartError;
use livechart::extensions::{ChartContext, ChartEvent, ChartListener};
use livechart::interaction::PointerEvent;
use livechart::render::{NullRenderer, RenderStyle};

type EventLog = Rc<RefCell<Vec<ChartEvent>>>;

struct Recorder {
    id: String,
    events: EventLog,
}

impl ChartListener for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: ChartEvent, _context: ChartContext) {
        self.events.borrow_mut().push(event);
    }
}

fn recorder(id: &str) -> (Box<dyn ChartListener>, EventLog) {
    let events = EventLog::default();
    let listener = Recorder {
        id: id.to_owned(),
        events: Rc::clone(&events),
    };
    (Box::new(listener), events)
}

fn config() -> ChartEngineConfig {
    ChartEngineConfig::new(Viewport::new(1_000.0, 400.0))
}

fn engine() -> ChartEngine<NullRenderer> {
    ChartEngine::new(NullRenderer::default(), config()).expect("engine init")
}

fn line(quote: impl Fn(i64) -> f64) -> Series {
    Series::line((0..=100).map(|i| Tick::new(i * 1_000, quote(i))).collect()).expect("series")
}

#[test]
fn invalid_configs_are_rejected() {
    let result = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(0.0, 400.0)),
    );
    assert!(matches!(result, Err(ChartError::InvalidViewport { .. })));

    let result = ChartEngine::new(
        NullRenderer::default(),
        config().with_interval_widths(20.0, 30.0, 80.0),
    );
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));

    let result = ChartEngine::new(NullRenderer::default(), config().with_blink_period_ms(0.0));
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));

    let result = ChartEngine::new(
        NullRenderer::default(),
        config().with_render_style(RenderStyle {
            series_line_width: -1.0,
            ..RenderStyle::default()
        }),
    );
    assert!(result.is_err());
    assert!(ChartEngine::new(NullRenderer::default(), config()).is_ok());
}

#[test]
fn config_json_round_trips_and_fills_defaults() {
    let config = config()
        .with_double_tap_enabled(true)
        .with_pip_size(4)
        .with_max_current_tick_offset_px(200.0);
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(ChartEngineConfig::from_json_str(&json).expect("parse"), config);

    let minimal = ChartEngineConfig::from_json_str(r#"{"viewport":{"width":800.0,"height":600.0}}"#)
        .expect("parse minimal");
    assert_eq!(minimal, ChartEngineConfig::new(Viewport::new(800.0, 600.0)));

    let broken = ChartEngineConfig::from_json_str("{");
    assert!(matches!(broken, Err(ChartError::InvalidData(_))));
}

#[test]
fn listeners_need_unique_non_empty_ids() {
    let mut engine = engine();
    let (first, _) = recorder("host");
    engine.register_listener(first).expect("register");
    let (duplicate, _) = recorder("host");
    assert!(matches!(
        engine.register_listener(duplicate),
        Err(ChartError::DuplicateId { kind: "listener", .. })
    ));
    let (anonymous, _) = recorder("");
    assert!(engine.register_listener(anonymous).is_err());

    assert!(engine.has_listener("host"));
    assert!(engine.unregister_listener("host"));
    assert!(!engine.unregister_listener("host"));
    assert_eq!(engine.listener_count(), 0);
}

#[test]
fn frame_events_are_emitted_once_per_change() {
    let mut engine = engine();
    let (listener, events) = recorder("host");
    engine.register_listener(listener).expect("register");

    engine
        .set_data(ChartData::new(line(|_| 50.0), 0))
        .expect("set data");
    engine.on_frame(200_000).expect("frame");
    assert_eq!(
        events.borrow().as_slice(),
        &[
            ChartEvent::DataUpdated { entries_len: 101 },
            ChartEvent::VisibleAreaChanged {
                left_epoch: 57_500,
                right_epoch: 107_500,
            },
            ChartEvent::QuoteAreaChanged {
                top_quote: 52.0,
                bottom_quote: 48.0,
            },
            ChartEvent::Rendered,
        ]
    );

    events.borrow_mut().clear();
    engine.on_frame(200_016).expect("frame");
    assert_eq!(events.borrow().as_slice(), &[ChartEvent::Rendered]);
    assert_eq!(engine.renderer().frames_rendered, 2);
}

#[test]
fn taps_reach_listeners() {
    let mut engine = engine();
    let (listener, events) = recorder("host");
    engine.register_listener(listener).expect("register");

    engine.handle_pointer(PointerEvent::down(10.0, 20.0, 0));
    engine.handle_pointer(PointerEvent::up(10.0, 20.0, 50));
    assert_eq!(
        events.borrow().as_slice(),
        &[ChartEvent::Tapped {
            position: PixelPoint::new(10.0, 20.0),
        }]
    );

    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        config().with_double_tap_enabled(true),
    )
    .expect("engine init");
    let (listener, events) = recorder("host");
    engine.register_listener(listener).expect("register");
    engine.handle_pointer(PointerEvent::down(10.0, 20.0, 0));
    engine.handle_pointer(PointerEvent::up(10.0, 20.0, 50));
    assert!(events.borrow().is_empty());
    engine.handle_pointer(PointerEvent::down(12.0, 20.0, 150));
    engine.handle_pointer(PointerEvent::up(12.0, 20.0, 200));
    assert_eq!(
        events.borrow().as_slice(),
        &[ChartEvent::DoubleTapped {
            position: PixelPoint::new(10.0, 20.0),
        }]
    );
}

#[test]
fn live_ticks_animate_the_quote_bounds() {
    let mut engine = engine();
    engine
        .set_data(ChartData::new(line(|_| 50.0), 0).with_live(true))
        .expect("set data");
    engine.on_frame(100_000).expect("frame");
    assert_eq!(engine.quote_bounds(), (48.0, 52.0));

    let outcome = engine.push_tick(Tick::new(101_000, 80.0)).expect("tick");
    assert_eq!(outcome, LiveUpdate::Appended);

    engine.on_frame(100_100).expect("frame");
    assert_eq!(engine.quote_bounds(), (48.0, 52.0));

    engine.on_frame(100_250).expect("frame");
    let (bottom, top) = engine.quote_bounds();
    assert!(bottom > 48.0 && bottom < 50.0);
    assert!(top > 52.0 && top < 80.0);

    engine.on_frame(100_400).expect("frame");
    assert_eq!(engine.quote_bounds(), (50.0, 80.0));

    let frame = engine.renderer().last_frame.clone().expect("frame rendered");
    assert!(frame.texts.iter().any(|text| text.text == "80.00"));
    // Live dot plus its blink halo.
    assert!(frame.circles.len() >= 2);
}

#[test]
fn reload_moving_both_ends_snaps_the_quote_bounds() {
    let mut engine = engine();
    engine
        .set_data(ChartData::new(line(|_| 50.0), 0))
        .expect("set data");
    engine.on_frame(200_000).expect("frame");
    assert_eq!(engine.quote_bounds(), (48.0, 52.0));

    let moved = Series::line(
        (300..=400)
            .map(|i| Tick::new(i * 1_000, 80.0))
            .collect(),
    )
    .expect("series");
    let change = engine
        .set_data(ChartData::new(moved, 0))
        .expect("reload");
    assert_eq!(change, EntriesChange::Reload);

    engine.on_frame(200_016).expect("frame");
    assert_eq!(engine.visible_area().right_epoch, 407_500);
    assert_eq!(engine.quote_bounds(), (78.0, 82.0));
}

#[test]
fn same_epoch_tick_replaces_the_last_one() {
    let mut engine = engine();
    engine
        .set_data(ChartData::new(line(|_| 50.0), 0).with_live(true))
        .expect("set data");
    assert_eq!(
        engine.push_tick(Tick::new(100_000, 51.0)).expect("tick"),
        LiveUpdate::Replaced
    );
    assert_eq!(
        engine.push_tick(Tick::new(99_000, 51.0)).expect("tick"),
        LiveUpdate::Ignored
    );
    assert_eq!(engine.series().expect("series").len(), 101);
}

#[test]
fn live_ticks_fill_candle_buckets() {
    let mut engine = engine();
    let candles = (0..60)
        .map(|i| Candle::new(i * 60_000, 10.0, 11.0, 9.0, 10.5).expect("candle"))
        .collect();
    engine
        .set_data(ChartData::new(Series::candles(candles).expect("series"), 60_000).with_live(true))
        .expect("set data");

    let last_open = 59 * 60_000;
    assert_eq!(
        engine.push_tick(Tick::new(last_open + 30_000, 12.0)).expect("tick"),
        LiveUpdate::Replaced
    );
    assert_eq!(
        engine.push_tick(Tick::new(last_open + 61_000, 12.5)).expect("tick"),
        LiveUpdate::Appended
    );
    let series = engine.series().expect("series");
    assert_eq!(series.len(), 61);
    assert_eq!(series.last_entry().expect("entry").epoch(), last_open + 60_000);

    engine.on_frame(last_open + 61_000).expect("frame");
    let frame = engine.renderer().last_frame.clone().expect("frame rendered");
    assert!(!frame.rects.is_empty());
    assert!(frame.rects.iter().all(|rect| rect.height >= 1.0));
}

#[test]
fn data_errors_are_reported() {
    let mut engine = engine();
    assert!(matches!(
        engine.push_tick(Tick::new(0, 1.0)),
        Err(ChartError::InvalidData(_))
    ));
    assert!(engine.set_data(ChartData::new(line(|_| 1.0), -1)).is_err());

    engine
        .set_data(ChartData::new(line(|_| 1.0), 0))
        .expect("set data");
    assert!(engine.push_tick(Tick::new(200_000, f64::NAN)).is_err());
}

#[test]
fn annotations_are_painted_and_pin_the_quote_range() {
    let mut engine = engine();
    engine
        .set_data(ChartData::new(line(|i| 100.0 + (i % 7) as f64), 0))
        .expect("set data");
    engine
        .set_annotations(vec![
            Barrier::new("target", 105.0).into(),
            Barrier::new("stop", 150.0)
                .with_visibility(BarrierVisibility::KeepInQuoteRange)
                .into(),
            Marker::new("entry", 90_000, 102.0, MarkerDirection::Up).into(),
        ])
        .expect("annotations");
    engine.on_frame(200_000).expect("frame");

    assert_eq!(engine.quote_bounds(), (100.0, 150.0));
    let frame = engine.renderer().last_frame.clone().expect("frame rendered");
    assert_eq!(frame.now_ms, 200_000);
    assert_eq!(frame.dashed_lines().count(), 2);
    assert!(frame.texts.iter().any(|text| text.text == "105.00"));
    assert!(frame.texts.iter().any(|text| text.text == "150.00"));
    let marker = frame
        .circles
        .iter()
        .find(|circle| (circle.x - 650.0).abs() <= 1e-9)
        .expect("marker circle");
    assert_abs_diff_eq!(marker.y, engine.quote_to_y(102.0), epsilon = 1e-9);

    assert_eq!(
        engine.snapshot().annotation_ids,
        vec!["target".to_owned(), "stop".to_owned(), "entry".to_owned()]
    );
}

#[test]
fn invalid_annotations_are_rejected() {
    let mut engine = engine();
    let duplicate = engine.set_annotations(vec![
        Barrier::new("a", 1.0).into(),
        Barrier::new("a", 2.0).into(),
    ]);
    assert!(matches!(
        duplicate,
        Err(ChartError::DuplicateId { kind: "annotation", .. })
    ));
    assert!(engine.set_annotations(vec![Barrier::new("", 1.0).into()]).is_err());
    assert!(
        engine
            .set_annotations(vec![Barrier::new("b", f64::INFINITY).into()])
            .is_err()
    );
    assert!(engine.annotations().is_empty());
}

#[test]
fn dispose_turns_every_call_into_a_no_op() {
    let mut engine = engine();
    let (listener, events) = recorder("host");
    engine.register_listener(listener).expect("register");
    engine
        .set_data(ChartData::new(line(|_| 1.0), 0).with_live(true))
        .expect("set data");
    engine.on_frame(100_000).expect("frame");
    let rendered = engine.renderer().frames_rendered;
    let logged = events.borrow().len();

    engine.dispose();
    assert!(engine.is_disposed());
    assert_eq!(engine.listener_count(), 0);
    assert_eq!(
        engine.push_tick(Tick::new(101_000, 2.0)).expect("ignored"),
        LiveUpdate::Ignored
    );
    assert_eq!(
        engine
            .set_data(ChartData::new(line(|_| 1.0), 0))
            .expect("ignored"),
        EntriesChange::Unchanged
    );
    engine.on_frame(100_016).expect("frame");
    engine.handle_pointer(PointerEvent::down(10.0, 10.0, 100_020));

    let padding = engine.vertical_padding();
    engine.drag_quote_axis(40.0);
    assert_eq!(engine.vertical_padding(), padding);
    assert!(!engine.toggle_data_fit_mode());
    assert!(!engine.toggle_data_fit_mode());
    assert!(!engine.toggle_scroll_block());
    assert!(!engine.toggle_scroll_block());

    assert_eq!(engine.renderer().frames_rendered, rendered);
    assert_eq!(events.borrow().len(), logged);
    assert!(engine.snapshot().is_disposed);
}

#[test]
fn snapshot_reports_viewport_state() {
    let mut engine = engine();
    let candles = (0..10)
        .map(|i| Candle::new(i * 60_000, 1.0, 2.0, 0.5, 1.5).expect("candle"))
        .chain((20..30).map(|i| Candle::new(i * 60_000 + 7_200_000, 1.0, 2.0, 0.5, 1.5).expect("candle")))
        .collect();
    engine
        .set_data(ChartData::new(Series::candles(candles).expect("series"), 60_000))
        .expect("set data");
    engine.on_frame(20_000_000).expect("frame");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.entries_len, 20);
    assert_eq!(snapshot.gap_count, 1);
    assert_eq!(snapshot.granularity_ms, 60_000);
    assert_eq!(snapshot.viewing_mode, ViewingMode::Stationary);
    assert_eq!(snapshot.now_ms, 20_000_000);
    assert!(snapshot.crosshair.is_none());

    let json = engine.snapshot_json_pretty().expect("snapshot json");
    assert!(json.contains("\"viewing_mode\": \"Stationary\""));
    assert!(json.contains("\"gap_count\": 1"));
}

#[test]
fn label_widths_are_cached_across_frames() {
    let mut engine = engine();
    engine
        .set_data(ChartData::new(line(|_| 10.0), 0).with_live(true))
        .expect("set data");
    engine.on_frame(100_000).expect("frame");
    let first = engine.snapshot().label_width_cache;
    assert!(first.misses >= 1);

    engine.on_frame(100_016).expect("frame");
    let second = engine.snapshot().label_width_cache;
    assert!(second.hits > first.hits);
    assert_eq!(second.size, first.size);

    engine
        .set_render_style(RenderStyle {
            label_font_size_px: 13.0,
            ..RenderStyle::default()
        })
        .expect("style");
    assert_eq!(engine.snapshot().label_width_cache.size, 0);

    let invalid = engine.set_render_style(RenderStyle {
        series_line_width: -1.0,
        ..RenderStyle::default()
    });
    assert!(invalid.is_err());
}

#[test]
fn viewport_resize_keeps_the_right_bound() {
    let mut engine = engine();
    engine
        .set_data(ChartData::new(line(|_| 1.0), 0))
        .expect("set data");
    engine.set_viewport(Viewport::new(500.0, 300.0)).expect("resize");
    assert_eq!(engine.viewport(), Viewport::new(500.0, 300.0));
    assert_eq!(engine.visible_area().right_epoch, 107_500);
    assert_eq!(engine.visible_area().left_epoch, 82_500);
    assert!(engine.set_viewport(Viewport::new(-1.0, 300.0)).is_err());
}

#[test]
fn dragging_the_quote_axis_grows_the_padding() {
    let mut engine = engine();
    let before = engine.vertical_padding();
    engine.drag_quote_axis(40.0);
    assert_abs_diff_eq!(engine.vertical_padding().fraction, before.fraction + 0.1);
    engine.drag_quote_axis(10_000.0);
    assert_abs_diff_eq!(engine.vertical_padding().fraction, 0.45);
}
