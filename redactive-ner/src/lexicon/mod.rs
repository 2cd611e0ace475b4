//! Lexicon loading and lookup for the heuristic recognizer.
//!
//! Lexicons are swappable data rather than compiled-in constants so that
//! precision can be tuned per deployment (a non-US institution ships a
//! different name list, not a different binary). A default set is embedded
//! in the crate and used when no file is supplied.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Curated word lists backing the lexicon passes of the recognizer.
///
/// All entries are stored lowercase; lookups normalize the probe token the
/// same way (see [`Lexicons::normalize_token`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicons {
    pub first_names: HashSet<String>,
    pub last_names: HashSet<String>,
    pub org_keywords: HashSet<String>,
    pub location_terms: HashSet<String>,
}

impl Lexicons {
    /// Loads the embedded default lexicons.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default lexicons from embedded string...");
        let yaml = include_str!("../../config/default_lexicons.yaml");
        let lexicons: Lexicons =
            serde_yml::from_str(yaml).context("Failed to parse embedded default lexicons")?;
        debug!(
            "Loaded default lexicons: {} first names, {} last names.",
            lexicons.first_names.len(),
            lexicons.last_names.len()
        );
        Ok(lexicons.lowercased())
    }

    /// Loads lexicons from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom lexicons from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let lexicons: Lexicons = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse lexicon file {}", path.display()))?;
        Ok(lexicons.lowercased())
    }

    /// Normalizes every entry to lowercase so membership checks are
    /// case-insensitive regardless of how the source file was authored.
    fn lowercased(self) -> Self {
        fn lower(set: HashSet<String>) -> HashSet<String> {
            set.into_iter().map(|s| s.to_lowercase()).collect()
        }
        Self {
            first_names: lower(self.first_names),
            last_names: lower(self.last_names),
            org_keywords: lower(self.org_keywords),
            location_terms: lower(self.location_terms),
        }
    }

    /// Strips non-letter characters and lowercases, producing the canonical
    /// form used for membership checks ("Smith," -> "smith").
    pub fn normalize_token(token: &str) -> String {
        token
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(|c| c.to_lowercase())
            .collect()
    }

    /// True iff `token` normalizes to a known first name.
    pub fn is_first_name(&self, token: &str) -> bool {
        let normalized = Self::normalize_token(token);
        !normalized.is_empty() && self.first_names.contains(&normalized)
    }

    /// True iff `token` normalizes to a known last name.
    pub fn is_last_name(&self, token: &str) -> bool {
        let normalized = Self::normalize_token(token);
        !normalized.is_empty() && self.last_names.contains(&normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicons_load() {
        let lex = Lexicons::load_default().unwrap();
        assert!(lex.is_first_name("Jane"));
        assert!(lex.is_last_name("Doe"));
        assert!(lex.org_keywords.contains("university"));
        assert!(!lex.is_first_name("Qwertyuiop"));
    }

    #[test]
    fn test_normalize_token_strips_punctuation() {
        assert_eq!(Lexicons::normalize_token("Smith,"), "smith");
        assert_eq!(Lexicons::normalize_token("O'Brien"), "obrien");
        assert_eq!(Lexicons::normalize_token("12345"), "");
    }

    #[test]
    fn test_custom_lexicon_entries_are_lowercased() {
        let yaml = "first_names:\n  - Aiko\nlast_names:\n  - Tanaka\n";
        let lex: Lexicons = serde_yml::from_str(yaml).unwrap();
        let lex = lex.lowercased();
        assert!(lex.is_first_name("aiko"));
        assert!(lex.is_last_name("TANAKA"));
    }
}
