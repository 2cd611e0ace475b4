// redactive-core/src/lib.rs
//! # Redactive Core Library
//!
//! `redactive-core` is a deterministic, client-side PII redaction engine:
//! every piece of user-authored text (chat messages, uploaded transcripts,
//! shared academic records) is scrubbed before it leaves the device. The
//! engine combines two detector families (a categorized regex pattern
//! catalog and the heuristic entity recognizer from `redactive-ner`) and
//! merges their findings into a single ordered, non-overlapping match list
//! with aggregate confidence and statistics.
//!
//! The library is pure and stateless with respect to its input: no I/O, no
//! network, no persistence. It transforms in-memory text and reports
//! everything through its return value.
//!
//! ## Modules
//!
//! * `config`: Defines `PatternDetector`s, the `PatternCatalog`, and
//!   `RedactionOptions`.
//! * `catalog`: Compiles catalogs into ready regexes, with caching and
//!   filtering queries.
//! * `redaction_match`: Data structures for findings, results, and stats.
//! * `engine`: Defines the `Detector` trait behind which both detector
//!   families sit.
//! * `engines`: Concrete `Detector` implementations (pattern catalog,
//!   heuristic recognizer).
//! * `orchestrator`: The `RedactionEngine` callers use directly.
//! * `quick`: One-shot convenience wrappers over a shared default engine.
//!
//! ## Usage Example
//!
//! ```rust
//! use redactive_core::RedactionEngine;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let engine = RedactionEngine::new()?;
//!
//!     let input = "Contact me at jane.doe@purdue.edu or call 765-555-0199";
//!     let result = engine.redact_text(input);
//!
//!     assert!(!result.redacted_text.contains("jane.doe@purdue.edu"));
//!     assert_eq!(result.stats.total_matches, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Catalog loading and compilation use `anyhow::Error` and the structured
//! [`RedactiveError`] enum. The redaction path itself never fails for
//! well-formed string input: empty and match-free input produce an identity
//! transform with confidence 1.0, and malformed options are clamped to
//! usable values rather than rejected.
//!
//! ## Concurrency
//!
//! The compiled catalog and lexicons are read-only after initialization and
//! freely shared across threads. The only shared mutable state is the
//! engine's options snapshot, which is copy-on-write: `update_options`
//! replaces it atomically and every call works from one consistent snapshot
//! captured at entry.
//!
//! License: MIT OR Apache-2.0

pub mod catalog;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod orchestrator;
pub mod quick;
pub mod redaction_match;

/// Re-exports the configuration types for the catalog and per-call options.
pub use config::{
    merge_patterns, validate_patterns, Category, PatternCatalog, PatternDetector,
    RedactionOptions, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::RedactiveError;

/// Re-exports the detector seam and its concrete implementations.
pub use engine::Detector;
pub use engines::{NerEngine, PatternEngine, MAX_MATCHES_PER_DETECTOR};

/// Re-exports the match/result types callers consume.
pub use redaction_match::{
    redact_sensitive, MatchSource, RedactionMatch, RedactionResult, RedactionStats,
    ValidationReport,
};

/// Re-exports the orchestrator callers use directly.
pub use orchestrator::RedactionEngine;

/// Re-exports the one-shot utility surface.
pub use quick::{is_safe_to_share, quick_redact};

/// Re-exports compiled-catalog types for advanced usage.
pub use catalog::{compile_catalog, get_or_compile_catalog, CompiledCatalog, CompiledDetector};

/// Re-exports the recognizer surface so callers can supply custom lexicons
/// without depending on `redactive-ner` directly.
pub use redactive_ner::{EntityLabel, EntityRecognizer, Lexicons, NerResult, RecognizedEntity};
