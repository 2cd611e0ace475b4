// redactive-core/src/engines/pattern_engine.rs
//! A `Detector` implementation backed by the compiled pattern catalog.
//!
//! License: MIT OR Apache-2.0

use std::sync::Arc;

use crate::catalog::{CompiledCatalog, CompiledDetector};
use crate::config::RedactionOptions;
use crate::engine::Detector;
use crate::redaction_match::{log_match_debug, MatchSource, RedactionMatch};

/// Upper bound on matches recorded per detector per call. Bounds total work
/// on adversarial input with a pathological number of hits.
pub const MAX_MATCHES_PER_DETECTOR: usize = 256;

/// Runs every applicable catalog detector over the input.
///
/// Detector selection: the category filter always applies; the static
/// confidence floor (`min_confidence`) applies only when aggressive mode is
/// off. Aggressive mode is exactly "use the full catalog", widening
/// coverage at the cost of precision.
#[derive(Debug)]
pub struct PatternEngine {
    compiled: Arc<CompiledCatalog>,
}

impl PatternEngine {
    pub fn new(compiled: Arc<CompiledCatalog>) -> Self {
        Self { compiled }
    }

    fn detector_enabled(detector: &CompiledDetector, options: &RedactionOptions) -> bool {
        if !options.enabled_categories.contains(&detector.category) {
            return false;
        }
        options.aggressive_mode || detector.confidence >= options.min_confidence
    }
}

impl Detector for PatternEngine {
    fn find_matches(&self, text: &str, options: &RedactionOptions) -> Vec<RedactionMatch> {
        let mut matches = Vec::new();

        for detector in &self.compiled.detectors {
            if !Self::detector_enabled(detector, options) {
                continue;
            }

            // `find_iter` starts a fresh scan per call; no cursor state can
            // leak between inputs. The cap bounds pathological hit counts.
            for found in detector.regex.find_iter(text).take(MAX_MATCHES_PER_DETECTOR) {
                log_match_debug(
                    module_path!(),
                    &detector.name,
                    found.as_str(),
                    &detector.replacement,
                );
                matches.push(RedactionMatch {
                    text: found.as_str().to_string(),
                    replacement: detector.replacement.clone(),
                    start: found.start(),
                    end: found.end(),
                    confidence: detector.confidence,
                    source: MatchSource::Pattern,
                    category: detector.category,
                    pattern_name: Some(detector.name.clone()),
                    entity_label: None,
                });
            }
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_or_compile_catalog;
    use crate::config::{Category, PatternCatalog};
    use std::collections::HashSet;

    fn engine() -> PatternEngine {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        PatternEngine::new(get_or_compile_catalog(&catalog).unwrap())
    }

    #[test]
    fn test_finds_email_and_records_metadata() {
        let matches = engine().find_matches(
            "write to jane.doe@purdue.edu please",
            &RedactionOptions::default(),
        );
        let email = matches
            .iter()
            .find(|m| m.pattern_name.as_deref() == Some("email"))
            .expect("email detector should fire");
        assert_eq!(email.text, "jane.doe@purdue.edu");
        assert_eq!(email.replacement, "[EMAIL]");
        assert_eq!(email.category, Category::Contact);
        assert_eq!(email.source, MatchSource::Pattern);
    }

    #[test]
    fn test_category_filter_always_applies() {
        let options = RedactionOptions {
            enabled_categories: HashSet::from([Category::Academic]),
            aggressive_mode: true,
            ..Default::default()
        };
        let matches = engine().find_matches("jane.doe@purdue.edu took CS 180", &options);
        assert!(matches.iter().all(|m| m.category == Category::Academic));
        assert!(matches.iter().any(|m| m.text == "CS 180"));
    }

    #[test]
    fn test_confidence_floor_skipped_in_aggressive_mode() {
        let text = "token 98765 here";
        // long_number sits at 0.50, below the default 0.7 floor.
        let default_matches = engine().find_matches(text, &RedactionOptions::default());
        assert!(default_matches.is_empty());

        let aggressive = RedactionOptions {
            aggressive_mode: true,
            ..Default::default()
        };
        let aggressive_matches = engine().find_matches(text, &aggressive);
        assert!(aggressive_matches
            .iter()
            .any(|m| m.pattern_name.as_deref() == Some("long_number")));
    }

    #[test]
    fn test_match_cap_bounds_adversarial_input() {
        let text = "a@b.co ".repeat(MAX_MATCHES_PER_DETECTOR * 2);
        let matches = engine().find_matches(&text, &RedactionOptions::default());
        let emails = matches
            .iter()
            .filter(|m| m.pattern_name.as_deref() == Some("email"))
            .count();
        assert_eq!(emails, MAX_MATCHES_PER_DETECTOR);
    }
}
