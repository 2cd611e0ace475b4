// redactive-core/src/engines/ner_engine.rs
//! A `Detector` implementation that wraps the heuristic entity recognizer
//! from `redactive-ner` and maps its labels into catalog categories and
//! placeholder tokens.
//!
//! License: MIT OR Apache-2.0

use std::sync::Arc;

use redactive_ner::{EntityLabel, EntityRecognizer};

use crate::config::{Category, RedactionOptions};
use crate::engine::Detector;
use crate::redaction_match::{MatchSource, RedactionMatch};

/// Maps an entity label to its redaction category. Exhaustive by design:
/// adding a label forces this mapping to be revisited at compile time.
pub fn label_category(label: EntityLabel) -> Category {
    match label {
        EntityLabel::Person | EntityLabel::Date | EntityLabel::Id => Category::Pii,
        EntityLabel::Org | EntityLabel::Course | EntityLabel::Grade => Category::Academic,
        EntityLabel::Gpe => Category::Location,
    }
}

/// Runs the recognizer and filters its entities through the call options.
#[derive(Debug)]
pub struct NerEngine {
    recognizer: Arc<EntityRecognizer>,
}

impl NerEngine {
    pub fn new(recognizer: Arc<EntityRecognizer>) -> Self {
        Self { recognizer }
    }
}

impl Detector for NerEngine {
    fn find_matches(&self, text: &str, options: &RedactionOptions) -> Vec<RedactionMatch> {
        let result = self.recognizer.recognize(text);

        result
            .entities
            .into_iter()
            .filter(|e| e.confidence >= options.min_confidence)
            .filter(|e| options.enabled_categories.contains(&label_category(e.label)))
            .map(|e| RedactionMatch {
                replacement: e.label.placeholder().to_string(),
                category: label_category(e.label),
                source: MatchSource::Ner,
                pattern_name: None,
                entity_label: Some(e.label),
                text: e.text,
                start: e.start,
                end: e.end,
                confidence: e.confidence,
            })
            .collect()
    }
}
