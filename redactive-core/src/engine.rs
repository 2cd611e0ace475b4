//! Defines the core `Detector` trait.
//!
//! The trait decouples the orchestrator from the concrete detection
//! mechanisms (pattern catalog, heuristic recognizer), so the two families
//! stay interchangeable and independently testable behind one contract.
//!
//! License: MIT OR Apache-2.0

use crate::config::RedactionOptions;
use crate::redaction_match::RedactionMatch;

/// A source of candidate redaction matches.
///
/// Implementations are pure with respect to `text`: no retained scan state,
/// no partial failures. A detector either contributes candidates or
/// contributes none. All option filtering (threshold, categories) happens
/// inside the detector so the orchestrator only merges.
pub trait Detector: Send + Sync {
    /// Scans `text` and returns candidate matches under `options`.
    ///
    /// Candidates may overlap each other and candidates from other
    /// detectors; the orchestrator resolves conflicts.
    fn find_matches(&self, text: &str, options: &RedactionOptions) -> Vec<RedactionMatch>;
}
