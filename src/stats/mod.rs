//! Statistics engine.
//!
//! Pure numeric stage of the pipeline: no side effects, no I/O. See
//! [`compute_stats`] for the entry point and [`percentile`] for the shared
//! interpolation primitive.

mod engine;
mod percentile;

pub use engine::compute_stats;
pub use percentile::{median, percentile};
