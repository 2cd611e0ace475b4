// redactive-core/src/quick.rs
//! One-shot convenience entry points over a shared default engine.
//!
//! These carry no logic of their own; callers needing configuration use
//! [`RedactionEngine`] directly.
//!
//! License: MIT OR Apache-2.0

use once_cell::sync::Lazy;

use crate::orchestrator::RedactionEngine;

// The embedded default catalog and lexicons are validated by unit tests; a
// failure here is a build defect, not a runtime condition.
static DEFAULT_ENGINE: Lazy<RedactionEngine> =
    Lazy::new(|| RedactionEngine::new().expect("embedded defaults must load"));

/// Redacts `text` with default settings and returns only the redacted
/// string. `aggressive` selects the maximum-safety profile intended for
/// text about to leave the device.
pub fn quick_redact(text: &str, aggressive: bool) -> String {
    if aggressive {
        DEFAULT_ENGINE.get_recommended_redaction(text).redacted_text
    } else {
        DEFAULT_ENGINE.redact_text(text).redacted_text
    }
}

/// True iff the high-bar PII check finds nothing to flag.
pub fn is_safe_to_share(text: &str) -> bool {
    !DEFAULT_ENGINE.contains_pii(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_redact_scrubs_email() {
        let redacted = quick_redact("reach me at jane.doe@purdue.edu", false);
        assert!(!redacted.contains("jane.doe@purdue.edu"));
        assert!(redacted.contains("[EMAIL]"));
    }

    #[test]
    fn test_quick_redact_aggressive_catches_low_confidence_tokens() {
        // Nothing in the default profile clears 0.7 for a bare digit run;
        // the aggressive profile catches it (zip_code at 0.75 outranks the
        // long_number catch-all on the same span).
        let text = "confirmation 98765 received";
        assert_eq!(quick_redact(text, false), text);
        assert!(!quick_redact(text, true).contains("98765"));
    }

    #[test]
    fn test_is_safe_to_share() {
        assert!(is_safe_to_share("see you at the study session"));
        assert!(!is_safe_to_share("my ssn is 123-45-6789"));
    }
}
