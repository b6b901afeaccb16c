//! livechart: viewport and animation core for real-time financial charts.
//!
//! The crate maps epochs and quotes to pixels across market-closure gaps,
//! keeps a live viewport following the current tick, animates every bound
//! change, recognizes pointer gestures and produces backend-agnostic render
//! frames. Drawing itself is left to a [`render::Renderer`] implementation.

pub mod animation;
pub mod api;
pub mod axis;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartData, ChartEngine, ChartEngineConfig, EngineSnapshot};
pub use error::{ChartError, ChartResult};
