//! The heuristic entity recognizer.
//!
//! A pure function over its lexicons and templates: template passes first,
//! then the whitespace-bigram lexicon pass, then deterministic overlap
//! resolution. Finding nothing is a valid, common result, not an error.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::debug;

use crate::lexicon::Lexicons;
use crate::templates::templates;
use crate::types::{EntityLabel, NerResult, RecognizedEntity};

/// Upper bound on matches emitted per template per call. Caps total work on
/// adversarial input with a pathological number of hits.
pub const MAX_MATCHES_PER_TEMPLATE: usize = 128;

/// Confidence assigned to lexicon-pair person hits. Lower than template hits
/// because lexicon collisions ("Will Smith graded...") are more common.
const LEXICON_PAIR_CONFIDENCE: f64 = 0.7;

/// Confidence assigned to lexicon-driven location hits.
const LOCATION_PAIR_CONFIDENCE: f64 = 0.7;

/// Confidence assigned to lexicon-driven organization hits. The org
/// templates cover common institutional phrasing at higher confidence;
/// this pass catches names built from injected keywords the templates
/// do not know about.
const ORG_PAIR_CONFIDENCE: f64 = 0.7;

/// Rule-based extractor for entities regex alone handles poorly: bare names,
/// organizations, course mentions, dates, grade and ID phrases.
#[derive(Debug, Clone)]
pub struct EntityRecognizer {
    lexicons: Lexicons,
}

impl EntityRecognizer {
    /// Builds a recognizer backed by the embedded default lexicons.
    pub fn new() -> Result<Self> {
        Ok(Self {
            lexicons: Lexicons::load_default()?,
        })
    }

    /// Builds a recognizer with caller-supplied lexicons.
    pub fn with_lexicons(lexicons: Lexicons) -> Self {
        Self { lexicons }
    }

    pub fn lexicons(&self) -> &Lexicons {
        &self.lexicons
    }

    /// Runs every template and lexicon pass over `text` and returns the
    /// resolved entity set. Deterministic across runs on identical input.
    pub fn recognize(&self, text: &str) -> NerResult {
        if text.is_empty() {
            return NerResult {
                entities: Vec::new(),
                redacted_text: String::new(),
                confidence: 1.0,
            };
        }

        let mut candidates = Vec::new();
        self.collect_template_entities(text, &mut candidates);
        self.collect_lexicon_entities(text, &mut candidates);

        let entities = resolve_overlaps(candidates);
        debug!("Recognizer produced {} entities.", entities.len());

        let redacted_text = substitute_placeholders(text, &entities);
        let confidence = if entities.is_empty() {
            1.0
        } else {
            entities.iter().map(|e| e.confidence).sum::<f64>() / entities.len() as f64
        };

        NerResult {
            entities,
            redacted_text,
            confidence,
        }
    }

    fn collect_template_entities(&self, text: &str, out: &mut Vec<RecognizedEntity>) {
        for template in templates() {
            for caps in template
                .regex
                .captures_iter(text)
                .take(MAX_MATCHES_PER_TEMPLATE)
            {
                let Some(span) = caps.get(template.group) else {
                    continue;
                };
                out.push(RecognizedEntity {
                    text: span.as_str().to_string(),
                    label: template.label,
                    start: span.start(),
                    end: span.end(),
                    confidence: template.confidence,
                });
            }
        }
    }

    /// The bigram passes: adjacent whitespace tokens where the pair looks
    /// like "<first name> <last name>" (PERSON), "<Capitalized>
    /// <org keyword>" (ORG), or "<Capitalized> <location term>" (GPE).
    fn collect_lexicon_entities(&self, text: &str, out: &mut Vec<RecognizedEntity>) {
        let tokens = tokenize(text);
        for pair in tokens.windows(2) {
            let (s1, e1) = pair[0];
            let (s2, e2) = pair[1];
            let first = &text[s1..e1];
            let second = &text[s2..e2];

            if self.lexicons.is_first_name(first) && self.lexicons.is_last_name(second) {
                let start = trim_start_non_alpha(text, s1, e1);
                let end = trim_end_non_alpha(text, s2, e2);
                if start < end {
                    out.push(RecognizedEntity {
                        text: text[start..end].to_string(),
                        label: EntityLabel::Person,
                        start,
                        end,
                        confidence: LEXICON_PAIR_CONFIDENCE,
                    });
                }
                continue;
            }

            let second_normalized = Lexicons::normalize_token(second);
            if second_normalized.is_empty() || !starts_uppercase(first) {
                continue;
            }

            if self.lexicons.org_keywords.contains(&second_normalized) {
                let start = trim_start_non_alpha(text, s1, e1);
                let end = trim_end_non_alpha(text, s2, e2);
                if start < end {
                    out.push(RecognizedEntity {
                        text: text[start..end].to_string(),
                        label: EntityLabel::Org,
                        start,
                        end,
                        confidence: ORG_PAIR_CONFIDENCE,
                    });
                }
                continue;
            }

            if self.lexicons.location_terms.contains(&second_normalized) {
                let start = trim_start_non_alpha(text, s1, e1);
                let end = trim_end_non_alpha(text, s2, e2);
                if start < end {
                    out.push(RecognizedEntity {
                        text: text[start..end].to_string(),
                        label: EntityLabel::Gpe,
                        start,
                        end,
                        confidence: LOCATION_PAIR_CONFIDENCE,
                    });
                }
            }
        }
    }
}

/// Whitespace tokenization with byte spans.
fn tokenize(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push((s, text.len()));
    }
    tokens
}

fn starts_uppercase(token: &str) -> bool {
    token.chars().next().map_or(false, |c| c.is_uppercase())
}

/// Advances `start` past leading non-alphabetic characters of a token span.
fn trim_start_non_alpha(text: &str, start: usize, end: usize) -> usize {
    text[start..end]
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map_or(end, |(i, _)| start + i)
}

/// Pulls `end` back before trailing non-alphabetic characters of a token span.
fn trim_end_non_alpha(text: &str, start: usize, end: usize) -> usize {
    text[start..end]
        .char_indices()
        .filter(|(_, c)| c.is_alphabetic())
        .last()
        .map_or(start, |(i, c)| start + i + c.len_utf8())
}

/// Sorts candidates by start (stably, so insertion order decides ties) and
/// drops overlaps, keeping the higher-confidence entity. A candidate that
/// overlaps several accepted entities must beat the best of them to displace
/// the group; the surviving set is sorted and non-overlapping.
fn resolve_overlaps(mut candidates: Vec<RecognizedEntity>) -> Vec<RecognizedEntity> {
    candidates.sort_by_key(|e| e.start);

    let mut accepted: Vec<RecognizedEntity> = Vec::new();
    for candidate in candidates {
        let overlapping: Vec<usize> = accepted
            .iter()
            .enumerate()
            .filter(|(_, e)| spans_overlap(candidate.start, candidate.end, e.start, e.end))
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

    accepted.sort_by_key(|e| e.start);
    accepted
}

/// Half-open interval overlap test.
fn spans_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    !(a_end <= b_start || b_end <= a_start)
}

/// Replaces each entity span with its label placeholder, in descending start
/// order so earlier offsets stay valid as the string changes length.
fn substitute_placeholders(text: &str, entities: &[RecognizedEntity]) -> String {
    let mut redacted = text.to_string();
    for entity in entities.iter().rev() {
        redacted.replace_range(entity.start..entity.end, entity.label.placeholder());
    }
    redacted
}
