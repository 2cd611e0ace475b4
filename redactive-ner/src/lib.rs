// redactive-ner/src/lib.rs
//! # Redactive NER
//!
//! `redactive-ner` is a deterministic, heuristic entity recognition engine:
//! fixed regex templates plus curated lexicons, no learned model. It finds
//! the entities plain pattern matching handles poorly (bare person names,
//! organizations, course mentions, dates, grade and ID phrases) and returns
//! them as non-overlapping, confidence-tagged spans.
//!
//! The crate is independent of the pattern catalog in `redactive-core`;
//! the core consumes both and merges their findings.
//!
//! License: MIT OR Apache-2.0

pub mod lexicon;
pub mod recognizer;
pub mod templates;
pub mod types;

pub use lexicon::Lexicons;
pub use recognizer::{EntityRecognizer, MAX_MATCHES_PER_TEMPLATE};
pub use templates::{templates, EntityTemplate};
pub use types::{EntityLabel, NerResult, RecognizedEntity};
