//! compiler.rs - Compiles and caches the detector catalog.
//!
//! Converts a `PatternCatalog` into a `CompiledCatalog` of ready regexes,
//! using a global, thread-safe cache keyed by a hash of the catalog so the
//! same set of detectors is never compiled twice in one process. The
//! compiled catalog is read-only after construction and shared via `Arc`.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{Category, PatternCatalog, PatternDetector, MAX_PATTERN_LENGTH};
use crate::errors::RedactiveError;

/// A single compiled detector: the regex plus the metadata needed to build a
/// redaction match from its hits.
#[derive(Debug)]
pub struct CompiledDetector {
    pub regex: Regex,
    pub name: String,
    pub replacement: String,
    pub confidence: f64,
    pub category: Category,
}

/// The compiled detector catalog, with the filtering queries callers use.
#[derive(Debug)]
pub struct CompiledCatalog {
    pub detectors: Vec<CompiledDetector>,
}

impl CompiledCatalog {
    /// All detectors tagged with `category`.
    pub fn patterns_by_category(&self, category: Category) -> Vec<&CompiledDetector> {
        self.detectors
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Detectors whose static confidence clears `min_confidence`.
    pub fn high_confidence_patterns(&self, min_confidence: f64) -> Vec<&CompiledDetector> {
        self.detectors
            .iter()
            .filter(|d| d.confidence >= min_confidence)
            .collect()
    }

    /// True iff any detector with confidence >= 0.85 matches `text`.
    /// Side-effect-free convenience check.
    pub fn contains_sensitive_data(&self, text: &str) -> bool {
        self.detectors
            .iter()
            .filter(|d| d.confidence >= 0.85)
            .any(|d| d.regex.is_match(text))
    }
}

lazy_static! {
    /// Global cache of compiled catalogs, keyed by a hash of the detector set.
    static ref COMPILED_CATALOG_CACHE: RwLock<HashMap<u64, Arc<CompiledCatalog>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the catalog into a stable cache key. Detectors are sorted by name
/// first so ordering differences do not defeat the cache.
fn hash_catalog(catalog: &PatternCatalog) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut detectors = catalog.patterns.clone();
    detectors.sort_by(|a, b| a.name.cmp(&b.name));
    detectors.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of detectors. Low-level entry point; most callers want
/// [`get_or_compile_catalog`].
pub fn compile_catalog(
    patterns: Vec<PatternDetector>,
) -> Result<CompiledCatalog, RedactiveError> {
    debug!("Starting compilation of {} detectors.", patterns.len());

    let mut detectors = Vec::new();
    let mut errors = Vec::new();

    for detector in patterns {
        if detector.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(RedactiveError::PatternLengthExceeded(
                detector.name,
                detector.pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(&detector.pattern)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build();

        match regex_result {
            Ok(regex) => {
                debug!("Detector '{}' compiled successfully.", &detector.name);
                detectors.push(CompiledDetector {
                    regex,
                    name: detector.name,
                    replacement: detector.replacement,
                    confidence: detector.confidence,
                    category: detector.category,
                });
            }
            Err(e) => {
                errors.push(RedactiveError::DetectorCompilationError(detector.name, e));
            }
        }
    }

    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(RedactiveError::Fatal(format!(
            "Failed to compile {} detector(s):\n{}",
            errors.len(),
            message
        )))
    } else {
        debug!("Finished compiling detectors. Total: {}.", detectors.len());
        Ok(CompiledCatalog { detectors })
    }
}

/// Returns the compiled catalog for `catalog`, compiling and caching it on
/// first sight. The `Arc` makes sharing across engines and threads cheap.
pub fn get_or_compile_catalog(catalog: &PatternCatalog) -> Result<Arc<CompiledCatalog>> {
    let cache_key = hash_catalog(catalog);

    {
        let cache = COMPILED_CATALOG_CACHE.read().unwrap();
        if let Some(compiled) = cache.get(&cache_key) {
            debug!("Serving compiled catalog from cache for key: {}", cache_key);
            return Ok(Arc::clone(compiled));
        }
    }

    debug!("Compiled catalog not found in cache. Compiling now.");
    let compiled = compile_catalog(catalog.patterns.clone())?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_CATALOG_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Compiled and cached catalog for key: {}", cache_key);
    Ok(compiled_arc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_compiles() {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        let compiled = compile_catalog(catalog.patterns).unwrap();
        assert!(compiled.detectors.iter().any(|d| d.name == "us_ssn"));
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        let a = get_or_compile_catalog(&catalog).unwrap();
        let b = get_or_compile_catalog(&catalog).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_patterns_by_category() {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        let compiled = get_or_compile_catalog(&catalog).unwrap();
        let academic = compiled.patterns_by_category(Category::Academic);
        assert!(academic.iter().any(|d| d.name == "course_code"));
        assert!(academic.iter().all(|d| d.category == Category::Academic));
    }

    #[test]
    fn test_high_confidence_patterns_threshold() {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        let compiled = get_or_compile_catalog(&catalog).unwrap();
        let high = compiled.high_confidence_patterns(0.9);
        assert!(high.iter().all(|d| d.confidence >= 0.9));
        assert!(high.iter().any(|d| d.name == "us_ssn"));
        assert!(!high.iter().any(|d| d.name == "long_number"));
    }

    #[test]
    fn test_contains_sensitive_data() {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        let compiled = get_or_compile_catalog(&catalog).unwrap();
        assert!(compiled.contains_sensitive_data("my ssn is 123-45-6789"));
        // Semester strings sit at 0.75, below the 0.85 bar for this check.
        assert!(!compiled.contains_sensitive_data("see you in Fall 2023"));
    }

    #[test]
    fn test_bad_pattern_reports_compilation_error() {
        let patterns = vec![PatternDetector {
            name: "broken".to_string(),
            pattern: "(unclosed".to_string(),
            ..Default::default()
        }];
        let err = compile_catalog(patterns).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
