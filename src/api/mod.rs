//! Host-facing engine facade.
//!
//! `ChartEngine` is split across controller files that each extend it with
//! one concern; shared state lives in `engine_core::EngineCore`.

mod chart_animation;
mod chart_model;
mod chart_presentation;
mod chart_runtime;
mod data_controller;
mod engine;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod frame_controller;
mod interaction_controller;
mod label_cache;
mod listener_dispatch;
mod listener_registry;
mod render_frame_builder;
mod snapshot_controller;
mod validation;
mod viewport_controller;

pub use data_controller::ChartData;
pub use engine::ChartEngine;
pub use engine_config::ChartEngineConfig;
pub use engine_snapshot::EngineSnapshot;
pub use label_cache::{DEFAULT_LABEL_WIDTH_PX, LabelWidthCacheStats};
