use livechart::api::{ChartData, ChartEngine, ChartEngineConfig};
use livechart::core::{
    Annotation, Barrier, BarrierVisibility, Candle, LiveUpdate, Marker, MarkerDirection, Series,
    Tick, Viewport,
};
use livechart::extensions::{ChartContext, ChartEvent, ChartListener};
use livechart::render::NullRenderer;

const GRANULARITY_MS: i64 = 60_000;

struct PrintingListener;

impl ChartListener for PrintingListener {
    fn id(&self) -> &str {
        "printer"
    }

    fn on_event(&mut self, event: ChartEvent, context: ChartContext) {
        match event {
            ChartEvent::Rendered => {}
            other => println!("{other:?} (mode={:?})", context.viewing_mode),
        }
    }
}

fn history(count: i64) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(count as usize);
    let mut open = 1_250.0;
    for i in 0..count {
        let close = open + ((i * 37) % 11 - 5) as f64 * 0.4;
        let high = open.max(close) + 0.8;
        let low = open.min(close) - 0.8;
        if let Ok(candle) = Candle::new(i * GRANULARITY_MS, open, high, low, close) {
            candles.push(candle);
        }
        open = close;
    }
    candles
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = livechart::telemetry::init_default_tracing();

    let config = ChartEngineConfig::new(Viewport::new(1_200.0, 600.0)).with_double_tap_enabled(true);
    let mut engine = ChartEngine::new(NullRenderer::default(), config)?;
    engine.register_listener(Box::new(PrintingListener))?;

    let candles = history(240);
    let last_close = candles.last().map_or(1_250.0, |candle| candle.close);
    let mut now = 240 * GRANULARITY_MS;
    engine.set_data(ChartData::new(Series::candles(candles)?, GRANULARITY_MS).with_live(true))?;
    engine.set_annotations(vec![
        Annotation::Barrier(
            Barrier::new("entry", last_close)
                .starting_at(now - 30 * GRANULARITY_MS)
                .with_visibility(BarrierVisibility::KeepInQuoteRange),
        ),
        Annotation::Marker(Marker::new(
            "buy",
            now - 30 * GRANULARITY_MS,
            last_close,
            MarkerDirection::Up,
        )),
    ])?;

    let mut quote = last_close;
    let mut appended = 0;
    for frame in 0..600 {
        now += 16;
        if frame % 20 == 0 {
            quote += if frame % 60 == 0 { -0.9 } else { 0.35 };
            if engine.push_tick(Tick::new(now, quote))? == LiveUpdate::Appended {
                appended += 1;
            }
        }
        engine.on_frame(now)?;
    }

    println!("frames rendered: {}", engine.renderer().frames_rendered);
    println!("candles appended while live: {appended}");
    println!("{}", engine.snapshot_json_pretty()?);
    Ok(())
}
