//! Core data structures for redaction findings, results, and PII-safe
//! debug logging.
//!
//! License: MIT OR Apache-2.0

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Category;
use redactive_ner::EntityLabel;

lazy_static! {
    /// Initialized once to determine whether matched PII may appear in debug
    /// logs. Off by default; summaries are logged instead.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("REDACTIVE_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Which detector family produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Pattern,
    Ner,
}

/// A unified finding from either detector family.
///
/// `start`/`end` are half-open byte offsets into the original text, so
/// `0 <= start < end <= text.len()`. After conflict resolution the surviving
/// match set is non-overlapping and sorted by `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionMatch {
    pub text: String,
    pub replacement: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    pub source: MatchSource,
    pub category: Category,
    /// Detector name, for pattern matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_name: Option<String>,
    /// Entity label, for recognizer matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_label: Option<EntityLabel>,
}

/// Aggregate counters for one redaction operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedactionStats {
    pub total_matches: usize,
    /// Matches with confidence >= 0.8.
    pub high_confidence_matches: usize,
    pub category_counts: HashMap<Category, usize>,
}

/// The return value of one redaction operation. A value object: created and
/// returned per call, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub original_text: String,
    pub redacted_text: String,
    pub matches: Vec<RedactionMatch>,
    /// Match-length-weighted average of accepted match confidences; 1.0 when
    /// nothing was flagged.
    pub confidence: f64,
    pub stats: RedactionStats,
}

/// Outcome of the second-pass safety net over already-redacted text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True only if no high-confidence matches and no explicit-check hits
    /// remain in the redacted text.
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Summarizes a sensitive string for log output.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

/// Debug-logs a finding without leaking the matched text by default.
pub fn log_match_debug(module_path: &str, detector: &str, original: &str, replacement: &str) {
    debug!(
        "{} Found match: detector='{}', original='{}', replacement='{}'",
        module_path,
        detector,
        get_loggable_content(original),
        replacement
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }

    #[test]
    fn test_result_serializes_for_web_callers() {
        let result = RedactionResult {
            original_text: "x".to_string(),
            redacted_text: "x".to_string(),
            matches: vec![RedactionMatch {
                text: "jane@example.edu".to_string(),
                replacement: "[EMAIL]".to_string(),
                start: 0,
                end: 16,
                confidence: 0.95,
                source: MatchSource::Pattern,
                category: Category::Contact,
                pattern_name: Some("email".to_string()),
                entity_label: None,
            }],
            confidence: 0.95,
            stats: RedactionStats::default(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"source\":\"pattern\""));
        assert!(json.contains("\"category\":\"contact\""));
        assert!(!json.contains("entity_label"));
    }
}
