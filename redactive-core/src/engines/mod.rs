//! Concrete implementations of the `Detector` trait.
//!
//! License: MIT OR Apache-2.0

pub mod ner_engine;
pub mod pattern_engine;

pub use ner_engine::NerEngine;
pub use pattern_engine::{PatternEngine, MAX_MATCHES_PER_DETECTOR};
