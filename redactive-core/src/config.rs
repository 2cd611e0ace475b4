//! Configuration for `redactive-core`.
//!
//! This module defines the pattern catalog data model and the per-call
//! redaction options. Catalogs are data: an embedded YAML default plus
//! optional user-supplied YAML files merged over it. Options are validated
//! by clamping, never by failing: this engine is a privacy guard that must
//! not crash the calling flow.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Maximum allowed length for a detector pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Detector categories. Closed set; matches outside a call's enabled
/// categories are discarded before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pii,
    Academic,
    Contact,
    Financial,
    Location,
}

impl Category {
    /// Every category, in a fixed order.
    pub const ALL: [Category; 5] = [
        Category::Pii,
        Category::Academic,
        Category::Contact,
        Category::Financial,
        Category::Location,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Pii => "pii",
            Category::Academic => "academic",
            Category::Contact => "contact",
            Category::Financial => "financial",
            Category::Location => "location",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pii" => Ok(Category::Pii),
            "academic" => Ok(Category::Academic),
            "contact" => Ok(Category::Contact),
            "financial" => Ok(Category::Financial),
            "location" => Ok(Category::Location),
            other => Err(anyhow!("Unknown detector category: '{}'.", other)),
        }
    }
}

/// A single regex detector in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternDetector {
    /// Unique identifier for the detector (e.g., "email").
    pub name: String,
    /// Human-readable description of what the detector targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: String,
    /// Category placeholder substituted for matches, e.g. `[EMAIL]`.
    pub replacement: String,
    /// Static precision estimate in [0,1], fixed per detector.
    pub confidence: f64,
    pub category: Category,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: String::new(),
            replacement: "[REDACTED]".to_string(),
            confidence: 0.5,
            category: Category::Pii,
        }
    }
}

impl Hash for PatternDetector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.description.hash(state);
        self.pattern.hash(state);
        self.replacement.hash(state);
        self.confidence.to_bits().hash(state);
        self.category.hash(state);
    }
}

/// The full, categorized detector catalog.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatternCatalog {
    pub patterns: Vec<PatternDetector>,
}

/// Raw on-disk form of a detector, with the category still a free string so
/// catalogs authored against a newer category set degrade instead of failing.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawPatternDetector {
    name: String,
    description: Option<String>,
    pattern: String,
    replacement: String,
    confidence: f64,
    category: String,
}

impl Default for RawPatternDetector {
    fn default() -> Self {
        let detector = PatternDetector::default();
        Self {
            name: detector.name,
            description: detector.description,
            pattern: detector.pattern,
            replacement: detector.replacement,
            confidence: detector.confidence,
            category: detector.category.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPatternCatalog {
    #[serde(default)]
    patterns: Vec<RawPatternDetector>,
}

impl PatternCatalog {
    /// Loads the embedded default catalog.
    pub fn load_default_patterns() -> Result<Self> {
        debug!("Loading default detector catalog from embedded string...");
        let default_yaml = include_str!("../config/default_patterns.yaml");
        let catalog =
            Self::from_yaml_str(default_yaml).context("Failed to parse default catalog")?;
        debug!("Loaded {} default detectors.", catalog.patterns.len());
        Ok(catalog)
    }

    /// Loads a catalog from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom detectors from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        info!(
            "Loaded {} detectors from file {}.",
            catalog.patterns.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parses, normalizes and validates a catalog from YAML text. Detectors
    /// carrying an unknown category are skipped with a warning rather than
    /// failing the whole load.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: RawPatternCatalog = serde_yml::from_str(text)?;
        let mut patterns = Vec::with_capacity(raw.patterns.len());
        for detector in raw.patterns {
            match detector.category.parse::<Category>() {
                Ok(category) => patterns.push(PatternDetector {
                    name: detector.name,
                    description: detector.description,
                    pattern: detector.pattern,
                    replacement: detector.replacement,
                    confidence: detector.confidence,
                    category,
                }),
                Err(_) => warn!(
                    "Detector '{}' has unknown category '{}'; skipping it.",
                    detector.name, detector.category
                ),
            }
        }
        let mut catalog = PatternCatalog { patterns };
        catalog.normalize();
        validate_patterns(&catalog.patterns)?;
        Ok(catalog)
    }

    /// Clamps out-of-range confidences instead of rejecting them.
    fn normalize(&mut self) {
        for detector in &mut self.patterns {
            if !detector.confidence.is_finite() {
                warn!(
                    "Detector '{}' has a non-finite confidence; defaulting to 0.5.",
                    detector.name
                );
                detector.confidence = 0.5;
            } else if !(0.0..=1.0).contains(&detector.confidence) {
                warn!(
                    "Detector '{}' confidence {} out of range; clamping.",
                    detector.name, detector.confidence
                );
                detector.confidence = detector.confidence.clamp(0.0, 1.0);
            }
        }
    }
}

/// Merges user-defined detectors over the defaults, keyed by name.
pub fn merge_patterns(
    default_catalog: PatternCatalog,
    user_catalog: Option<PatternCatalog>,
) -> PatternCatalog {
    debug!(
        "merge_patterns called. Default detector count: {}",
        default_catalog.patterns.len()
    );

    let mut merged: HashMap<String, PatternDetector> = default_catalog
        .patterns
        .into_iter()
        .map(|d| (d.name.clone(), d))
        .collect();

    if let Some(user) = user_catalog {
        debug!("Merging {} user detectors.", user.patterns.len());
        for detector in user.patterns {
            merged.insert(detector.name.clone(), detector);
        }
    }

    let mut patterns: Vec<PatternDetector> = merged.into_values().collect();
    patterns.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Final detector count after merge: {}", patterns.len());

    PatternCatalog { patterns }
}

/// Validates detector integrity (unique names, present and compilable
/// patterns, length cap).
pub fn validate_patterns(patterns: &[PatternDetector]) -> Result<()> {
    let mut names = HashSet::new();
    let mut errors = Vec::new();

    for detector in patterns {
        if detector.name.is_empty() {
            errors.push("A detector has an empty `name` field.".to_string());
        } else if !names.insert(detector.name.clone()) {
            errors.push(format!("Duplicate detector name found: '{}'.", detector.name));
        }

        if detector.pattern.is_empty() {
            errors.push(format!("Detector '{}' has an empty `pattern` field.", detector.name));
            continue;
        }

        if detector.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Detector '{}': pattern length ({}) exceeds maximum allowed ({}).",
                detector.name,
                detector.pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        match Regex::new(&detector.pattern) {
            Err(e) => errors.push(format!(
                "Detector '{}' has an invalid regex pattern: {}",
                detector.name, e
            )),
            // A zero-width match would insert placeholders without
            // consuming any text.
            Ok(regex) if regex.is_match("") => errors.push(format!(
                "Detector '{}' matches the empty string.",
                detector.name
            )),
            Ok(_) => {}
        }

        if detector.replacement.is_empty() {
            errors.push(format!(
                "Detector '{}' has an empty `replacement` field.",
                detector.name
            ));
        }
    }

    if !errors.is_empty() {
        Err(anyhow!(format!(
            "Detector validation failed:\n{}",
            errors.join("\n")
        )))
    } else {
        Ok(())
    }
}

/// Per-call configuration for one redaction pass.
///
/// Options are immutable for the duration of a call: the engine captures a
/// single snapshot at entry (see `RedactionEngine::update_options`), so
/// concurrent callers never observe a torn configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionOptions {
    /// Run the pattern catalog detectors.
    pub use_patterns: bool,
    /// Run the heuristic entity recognizer.
    pub use_ner: bool,
    /// Matches below this confidence are discarded before merging.
    pub min_confidence: f64,
    /// Matches outside these categories are discarded.
    pub enabled_categories: HashSet<Category>,
    /// When true, use the full catalog; when false, only detectors whose
    /// static confidence clears `min_confidence` (a smaller subset with
    /// higher precision).
    pub aggressive_mode: bool,
    /// Mimic the matched token's capitalization in the placeholder.
    pub preserve_formatting: bool,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            use_patterns: true,
            use_ner: true,
            min_confidence: 0.7,
            enabled_categories: HashSet::from([
                Category::Pii,
                Category::Academic,
                Category::Contact,
                Category::Financial,
            ]),
            aggressive_mode: false,
            preserve_formatting: true,
        }
    }
}

impl RedactionOptions {
    /// The "maximum safety" profile: lowered threshold, full catalog, every
    /// category enabled. Intended for text about to leave the device.
    pub fn recommended() -> Self {
        Self {
            min_confidence: 0.6,
            aggressive_mode: true,
            enabled_categories: HashSet::from(Category::ALL),
            ..Self::default()
        }
    }

    /// Returns a copy with out-of-range values clamped. Configuration errors
    /// never fail a call; they fall back toward scanning with defaults.
    pub fn normalized(&self) -> Self {
        let mut options = self.clone();
        if !options.min_confidence.is_finite() {
            warn!("min_confidence is non-finite; falling back to the default threshold.");
            options.min_confidence = Self::default().min_confidence;
        } else if !(0.0..=1.0).contains(&options.min_confidence) {
            warn!(
                "min_confidence {} out of range; clamping.",
                options.min_confidence
            );
            options.min_confidence = options.min_confidence.clamp(0.0, 1.0);
        }
        if options.enabled_categories.is_empty() {
            warn!("enabled_categories is empty; falling back to the default category set.");
            options.enabled_categories = Self::default().enabled_categories;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads_and_validates() {
        let catalog = PatternCatalog::load_default_patterns().unwrap();
        assert!(catalog.patterns.len() >= 15);
        assert!(catalog.patterns.iter().any(|d| d.name == "email"));
        assert!(catalog
            .patterns
            .iter()
            .all(|d| (0.0..=1.0).contains(&d.confidence)));
    }

    #[test]
    fn test_merge_overrides_by_name() {
        let default_catalog = PatternCatalog::load_default_patterns().unwrap();
        let user = PatternCatalog {
            patterns: vec![PatternDetector {
                name: "email".to_string(),
                pattern: r"\S+@\S+".to_string(),
                replacement: "[MAIL]".to_string(),
                confidence: 0.8,
                category: Category::Contact,
                description: None,
            }],
        };
        let merged = merge_patterns(default_catalog.clone(), Some(user));
        assert_eq!(merged.patterns.len(), default_catalog.patterns.len());
        let email = merged.patterns.iter().find(|d| d.name == "email").unwrap();
        assert_eq!(email.replacement, "[MAIL]");
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_patterns() {
        let detectors = vec![
            PatternDetector {
                name: "dup".to_string(),
                pattern: r"\d+".to_string(),
                ..Default::default()
            },
            PatternDetector {
                name: "dup".to_string(),
                pattern: "(unclosed".to_string(),
                ..Default::default()
            },
        ];
        let err = validate_patterns(&detectors).unwrap_err().to_string();
        assert!(err.contains("Duplicate detector name"));
        assert!(err.contains("invalid regex"));
    }

    #[test]
    fn test_unknown_category_is_skipped_not_fatal() {
        let yaml = "patterns:\n\
                    \x20 - name: retina\n\
                    \x20   pattern: 'scan-\\d+'\n\
                    \x20   replacement: '[SCAN]'\n\
                    \x20   confidence: 0.9\n\
                    \x20   category: biometric\n\
                    \x20 - name: mail\n\
                    \x20   pattern: '\\S+@\\S+'\n\
                    \x20   replacement: '[MAIL]'\n\
                    \x20   confidence: 0.9\n\
                    \x20   category: contact\n";
        let catalog = PatternCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.patterns.len(), 1);
        assert_eq!(catalog.patterns[0].name, "mail");
        assert_eq!(catalog.patterns[0].category, Category::Contact);
    }

    #[test]
    fn test_category_from_str_round_trips() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
        assert!("biometric".parse::<Category>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_string_matcher() {
        let detectors = vec![PatternDetector {
            name: "zero_width".to_string(),
            pattern: "x*".to_string(),
            ..Default::default()
        }];
        let err = validate_patterns(&detectors).unwrap_err().to_string();
        assert!(err.contains("matches the empty string"));
    }

    #[test]
    fn test_validate_rejects_oversized_pattern() {
        let detectors = vec![PatternDetector {
            name: "huge".to_string(),
            pattern: "a".repeat(MAX_PATTERN_LENGTH + 1),
            ..Default::default()
        }];
        assert!(validate_patterns(&detectors).is_err());
    }

    #[test]
    fn test_options_default_matches_contract() {
        let options = RedactionOptions::default();
        assert!(options.use_patterns);
        assert!(options.use_ner);
        assert_eq!(options.min_confidence, 0.7);
        assert!(!options.aggressive_mode);
        assert!(options.preserve_formatting);
        assert!(options.enabled_categories.contains(&Category::Pii));
        assert!(!options.enabled_categories.contains(&Category::Location));
    }

    #[test]
    fn test_options_normalize_clamps_instead_of_failing() {
        let options = RedactionOptions {
            min_confidence: 3.5,
            ..Default::default()
        };
        assert_eq!(options.normalized().min_confidence, 1.0);

        let options = RedactionOptions {
            min_confidence: f64::NAN,
            enabled_categories: HashSet::new(),
            ..Default::default()
        };
        let normalized = options.normalized();
        assert_eq!(normalized.min_confidence, 0.7);
        assert!(!normalized.enabled_categories.is_empty());
    }
}
