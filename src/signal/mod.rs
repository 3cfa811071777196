//! Signal generation
//!
//! Samples a market's two outcome prices over a bounded window (or
//! instantaneously) and converts the samples into a directional signal
//! with a confidence score.

mod engine;
mod trend;
mod types;

pub use engine::SignalEngine;
pub use trend::slope;
pub use types::{Direction, PricePoint, SampleSet, Signal, MAX_SAMPLES_PER_SIDE};
