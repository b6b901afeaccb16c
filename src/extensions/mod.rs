//! Host-facing extension points.

pub mod listeners;

pub use listeners::{ChartContext, ChartEvent, ChartListener};
