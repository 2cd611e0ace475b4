// redactive-core/src/orchestrator.rs
//! The redaction orchestrator: merges findings from both detector families,
//! resolves overlaps, substitutes placeholders, and scores the result.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use redactive_ner::{EntityRecognizer, Lexicons};

use crate::catalog::{get_or_compile_catalog, CompiledCatalog};
use crate::config::{Category, PatternCatalog, RedactionOptions};
use crate::engine::Detector;
use crate::engines::{NerEngine, PatternEngine};
use crate::redaction_match::{
    RedactionMatch, RedactionResult, RedactionStats, ValidationReport,
};

/// Threshold above which a match counts as high-confidence in stats and in
/// `contains_pii`.
const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Threshold for the strict second pass in `validate_redaction`.
const VALIDATION_THRESHOLD: f64 = 0.9;

// Explicit belt-and-suspenders checks run by `validate_redaction` in
// addition to the strict second pass. The engine is heuristic, not provably
// complete; these two cheap patterns catch the worst misses.
static EMAIL_CHECK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static LONG_DIGIT_RUN_CHECK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{8,}").unwrap());

/// The aggregation point callers use directly.
///
/// Holds the compiled catalog and recognizer (read-only after construction,
/// freely shared) and a copy-on-write options snapshot: `update_options`
/// replaces the snapshot atomically, and every call captures one consistent
/// snapshot at entry.
pub struct RedactionEngine {
    compiled: Arc<CompiledCatalog>,
    pattern_engine: PatternEngine,
    ner_engine: NerEngine,
    options: RwLock<Arc<RedactionOptions>>,
}

impl RedactionEngine {
    /// Builds an engine over the default catalog, default lexicons, and
    /// default options.
    pub fn new() -> Result<Self> {
        Self::with_options(RedactionOptions::default())
    }

    /// Builds an engine over the default catalog and lexicons with custom
    /// long-lived options.
    pub fn with_options(options: RedactionOptions) -> Result<Self> {
        let catalog = PatternCatalog::load_default_patterns()?;
        let lexicons = Lexicons::load_default()?;
        Self::from_parts(catalog, lexicons, options)
    }

    /// Builds an engine from explicit parts; the seam for deployments that
    /// ship their own catalog or lexicons.
    pub fn from_parts(
        catalog: PatternCatalog,
        lexicons: Lexicons,
        options: RedactionOptions,
    ) -> Result<Self> {
        let compiled = get_or_compile_catalog(&catalog)?;
        let recognizer = Arc::new(EntityRecognizer::with_lexicons(lexicons));
        Ok(Self {
            pattern_engine: PatternEngine::new(Arc::clone(&compiled)),
            ner_engine: NerEngine::new(recognizer),
            compiled,
            options: RwLock::new(Arc::new(options.normalized())),
        })
    }

    /// The compiled catalog behind this engine, for callers that want the
    /// filtering queries (`contains_sensitive_data` etc.) directly.
    pub fn catalog(&self) -> &CompiledCatalog {
        &self.compiled
    }

    /// The current options snapshot.
    pub fn options_snapshot(&self) -> Arc<RedactionOptions> {
        Arc::clone(&self.options.read().unwrap())
    }

    /// Atomically replaces the engine's options. In-flight calls keep the
    /// snapshot they captured at entry; no caller observes a torn update.
    pub fn update_options(&self, options: RedactionOptions) {
        *self.options.write().unwrap() = Arc::new(options.normalized());
    }

    /// Redacts `text` under the engine's current options.
    pub fn redact_text(&self, text: &str) -> RedactionResult {
        let snapshot = self.options_snapshot();
        self.run(text, &snapshot)
    }

    /// Redacts `text` under caller-supplied options for this call only.
    pub fn redact_text_with(&self, text: &str, options: &RedactionOptions) -> RedactionResult {
        self.run(text, &options.normalized())
    }

    /// Re-inserts each accepted match into the original text wrapped in a
    /// category/confidence-tagged marker, for UI highlighting only. The
    /// returned string still contains the sensitive text; never use it for
    /// an outbound payload.
    pub fn preview_redaction(&self, text: &str) -> String {
        let result = self.redact_text(text);
        let mut preview = text.to_string();
        for m in result.matches.iter().rev() {
            let marked = format!(
                "[[{}:{:.2}]]{}[[/{}]]",
                m.category, m.confidence, m.text, m.category
            );
            preview.replace_range(m.start..m.end, &marked);
        }
        preview
    }

    /// High-bar identity check: does anything in `text` look like PII proper
    /// (personal, contact, or financial data) at confidence >= 0.8?
    ///
    /// Academic mentions (courses, grades) are deliberately outside this
    /// check; `redact_text` still scrubs them under its defaults.
    pub fn contains_pii(&self, text: &str) -> bool {
        let options = RedactionOptions {
            min_confidence: HIGH_CONFIDENCE_THRESHOLD,
            enabled_categories: [Category::Pii, Category::Contact, Category::Financial]
                .into_iter()
                .collect(),
            ..RedactionOptions::default()
        };
        !self.redact_text_with(text, &options).matches.is_empty()
    }

    /// The "maximum safety" profile for anything about to leave the device:
    /// lowered threshold, full catalog, every category enabled.
    pub fn get_recommended_redaction(&self, text: &str) -> RedactionResult {
        self.redact_text_with(text, &RedactionOptions::recommended())
    }

    /// Second-pass safety net over already-redacted text: a strict re-scan
    /// plus two explicit checks (standalone email, long digit run).
    pub fn validate_redaction(&self, original: &str, redacted: &str) -> ValidationReport {
        let strict = RedactionOptions {
            min_confidence: VALIDATION_THRESHOLD,
            aggressive_mode: true,
            enabled_categories: Category::ALL.into_iter().collect(),
            ..RedactionOptions::default()
        };
        let recheck = self.redact_text_with(redacted, &strict);

        let mut issues = Vec::new();
        for m in &recheck.matches {
            if m.confidence >= VALIDATION_THRESHOLD {
                let detector = m
                    .pattern_name
                    .clone()
                    .or_else(|| m.entity_label.map(|l| l.to_string()))
                    .unwrap_or_else(|| "unknown".to_string());
                issues.push(format!(
                    "High-confidence {} finding ('{}') remains in the redacted text.",
                    m.category, detector
                ));
            }
        }
        if EMAIL_CHECK.is_match(redacted) {
            issues.push("An email address remains in the redacted text.".to_string());
        }
        if LONG_DIGIT_RUN_CHECK.is_match(redacted) {
            issues.push("A digit run of 8 or more remains in the redacted text.".to_string());
        }

        let mut recommendations = Vec::new();
        if !issues.is_empty() {
            if redacted == original {
                recommendations
                    .push("The text appears unredacted; run redact_text before sharing.".to_string());
            }
            recommendations.push(
                "Re-run redaction with the recommended (aggressive) profile before sharing."
                    .to_string(),
            );
        }

        ValidationReport {
            is_valid: issues.is_empty(),
            issues,
            recommendations,
        }
    }

    /// The collect / resolve / substitute / score / summarize pipeline.
    fn run(&self, text: &str, options: &RedactionOptions) -> RedactionResult {
        if text.is_empty() {
            return identity_result(text);
        }

        let mut candidates = Vec::new();
        if options.use_patterns {
            candidates.extend(self.pattern_engine.find_matches(text, options));
        }
        if options.use_ner {
            candidates.extend(self.ner_engine.find_matches(text, options));
        }
        debug!("Collected {} candidate matches.", candidates.len());

        let matches = resolve_conflicts(candidates);
        debug_assert!(matches
            .windows(2)
            .all(|pair| pair[0].end <= pair[1].start));

        let redacted_text = substitute(text, &matches, options.preserve_formatting);
        let confidence = length_weighted_confidence(&matches);
        let stats = summarize(&matches);

        RedactionResult {
            original_text: text.to_string(),
            redacted_text,
            matches,
            confidence,
            stats,
        }
    }
}

/// The identity transform: empty or match-free input is not an error.
fn identity_result(text: &str) -> RedactionResult {
    RedactionResult {
        original_text: text.to_string(),
        redacted_text: text.to_string(),
        matches: Vec::new(),
        confidence: 1.0,
        stats: RedactionStats::default(),
    }
}

/// Half-open interval overlap test.
fn spans_overlap(a: &RedactionMatch, b: &RedactionMatch) -> bool {
    !(a.end <= b.start || b.end <= a.start)
}

/// Merges candidates into a sorted, non-overlapping match list.
///
/// Candidates are stably sorted by start (so pattern matches, collected
/// first, win confidence ties against recognizer matches on the same span)
/// and walked in order: a candidate that overlaps accepted matches must beat
/// the best of them to displace the group, otherwise it is dropped.
fn resolve_conflicts(mut candidates: Vec<RedactionMatch>) -> Vec<RedactionMatch> {
    candidates.sort_by_key(|m| m.start);

    let mut accepted: Vec<RedactionMatch> = Vec::new();
    for candidate in candidates {
        let overlapping: Vec<usize> = accepted
            .iter()
            .enumerate()
            .filter(|(_, m)| spans_overlap(&candidate, m))
            .map(|(i, _)| i)
            .collect();

        if overlapping.is_empty() {
            accepted.push(candidate);
            continue;
        }

        let best_existing = overlapping
            .iter()
            .map(|&i| accepted[i].confidence)
            .fold(f64::MIN, f64::max);
        if candidate.confidence > best_existing {
            for &i in overlapping.iter().rev() {
                accepted.remove(i);
            }
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|m| m.start);
    accepted
}

/// Applies replacements in descending start order so earlier offsets stay
/// valid as the string changes length.
fn substitute(text: &str, matches: &[RedactionMatch], preserve_formatting: bool) -> String {
    let mut redacted = text.to_string();
    for m in matches.iter().rev() {
        let replacement = if preserve_formatting {
            mirror_casing(&m.replacement, &m.text)
        } else {
            m.replacement.clone()
        };
        redacted.replace_range(m.start..m.end, &replacement);
    }
    redacted
}

/// Adjusts a placeholder's casing to mirror the matched text: all-uppercase
/// originals yield all-uppercase placeholders, title-case originals yield a
/// placeholder with only its first letter capitalized, anything else keeps
/// the placeholder verbatim.
fn mirror_casing(replacement: &str, original: &str) -> String {
    let has_lower = original.chars().any(|c| c.is_lowercase());
    let has_upper = original.chars().any(|c| c.is_uppercase());

    if has_upper && !has_lower {
        return replacement.to_uppercase();
    }

    let title_case = original
        .chars()
        .find(|c| c.is_alphabetic())
        .map_or(false, |c| c.is_uppercase());
    if title_case {
        let mut out = String::with_capacity(replacement.len());
        let mut seen_alpha = false;
        for c in replacement.chars() {
            if c.is_alphabetic() {
                if seen_alpha {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                    seen_alpha = true;
                }
            } else {
                out.push(c);
            }
        }
        return out;
    }

    replacement.to_string()
}

/// Match-length-weighted average confidence; longer matches count more.
/// 1.0 with no matches: nothing flagged is a confident outcome.
fn length_weighted_confidence(matches: &[RedactionMatch]) -> f64 {
    let total_len: usize = matches.iter().map(|m| m.end - m.start).sum();
    if total_len == 0 {
        return 1.0;
    }
    let weighted: f64 = matches
        .iter()
        .map(|m| m.confidence * (m.end - m.start) as f64)
        .sum();
    weighted / total_len as f64
}

fn summarize(matches: &[RedactionMatch]) -> RedactionStats {
    let mut category_counts: HashMap<Category, usize> = HashMap::new();
    for m in matches {
        *category_counts.entry(m.category).or_insert(0) += 1;
    }
    RedactionStats {
        total_matches: matches.len(),
        high_confidence_matches: matches
            .iter()
            .filter(|m| m.confidence >= HIGH_CONFIDENCE_THRESHOLD)
            .count(),
        category_counts,
    }
}
