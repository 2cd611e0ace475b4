//! Core data types shared across the recognizer.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of entity labels the recognizer can emit.
///
/// The set is deliberately small and fixed; downstream mappings (category,
/// placeholder token) match on it exhaustively so that adding a label is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// A person's name.
    Person,
    /// An organization (university, department, company).
    Org,
    /// A geopolitical/location mention.
    Gpe,
    /// A course identifier or named course.
    Course,
    /// A letter grade or GPA phrase.
    Grade,
    /// A calendar date.
    Date,
    /// A student/institutional identifier.
    Id,
}

impl EntityLabel {
    /// The placeholder token substituted for entities with this label.
    pub fn placeholder(&self) -> &'static str {
        match self {
            EntityLabel::Person => "[NAME]",
            EntityLabel::Org => "[ORGANIZATION]",
            EntityLabel::Gpe => "[LOCATION]",
            EntityLabel::Course => "[COURSE]",
            EntityLabel::Grade => "[GRADE]",
            EntityLabel::Date => "[DATE]",
            EntityLabel::Id => "[ID]",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Org => "ORG",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Course => "COURSE",
            EntityLabel::Grade => "GRADE",
            EntityLabel::Date => "DATE",
            EntityLabel::Id => "ID",
        };
        write!(f, "{}", s)
    }
}

/// A single heuristic finding: a span of the input text classified under an
/// [`EntityLabel`] with a fixed confidence.
///
/// `start`/`end` are half-open byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
}

/// The result of one recognizer pass over a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerResult {
    /// Surviving entities, sorted by `start` and non-overlapping.
    pub entities: Vec<RecognizedEntity>,
    /// The input with each entity replaced by its label placeholder.
    pub redacted_text: String,
    /// Arithmetic mean of entity confidences; 1.0 when nothing was found
    /// ("no evidence of PII" is a confident result, not an error).
    pub confidence: f64,
}
