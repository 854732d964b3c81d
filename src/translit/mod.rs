// Script conversion architecture
//
// This module maps source-script lines into target scripts through one
// trait with a scheme implementation per supported language pair:
// - Indic targets (Telugu, Kannada, Gujarati, Bengali, Malayalam) share a
//   Unicode block-offset mapper with per-script overrides
// - Tamil uses an explicit table (superscript voicing digits, grantha)
// - Roman targets run an inherent-vowel state machine (ISO and readable)

pub mod common;
pub mod repairs;
pub mod schemes;

use async_trait::async_trait;

pub use common::TranslitEngine;
use crate::error::Result;

/// Main trait for script conversion backends.
#[async_trait]
pub trait Transliterator: Send + Sync {
    /// Convert one line of source-script text to the target script.
    async fn convert(&self, line: &str) -> Result<String>;
}

/// Factory resolving a `(source, target)` language pair to a conversion
/// scheme. Unsupported pairs resolve to `None`; callers pass the text
/// through unchanged.
pub struct TransliteratorFactory;

impl TransliteratorFactory {
    /// Language pairs with a conversion scheme behind them.
    pub fn supported_pairs() -> &'static [(&'static str, &'static str)] {
        &[
            ("sa", "ta"),
            ("sa", "te"),
            ("sa", "ka"),
            ("sa", "gu"),
            ("sa", "be"),
            ("sa", "ma"),
            ("sa", "en"),
            ("sa", "roman"),
            ("sa", "sa"),
        ]
    }

    pub fn is_supported(source: &str, target: &str) -> bool {
        Self::create(source, target).is_some()
    }

    /// Create a transliterator for the pair, `None` when unsupported.
    pub fn create(source: &str, target: &str) -> Option<Box<dyn Transliterator>> {
        // An empty source language defaults to Devanagari input.
        if !(source == "sa" || source.is_empty()) {
            return None;
        }
        match target {
            "ta" => Some(Box::new(schemes::TamilMapper)),
            "te" => Some(Box::new(schemes::IndicMapper::telugu())),
            "ka" => Some(Box::new(schemes::IndicMapper::kannada())),
            "gu" => Some(Box::new(schemes::IndicMapper::gujarati())),
            "be" => Some(Box::new(schemes::IndicMapper::bengali())),
            "ma" => Some(Box::new(schemes::IndicMapper::malayalam())),
            "en" => Some(Box::new(schemes::RomanMapper::iso())),
            "roman" => Some(Box::new(schemes::RomanMapper::readable())),
            "sa" => Some(Box::new(schemes::IdentityMapper)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_pairs_resolve() {
        for (source, target) in TransliteratorFactory::supported_pairs() {
            assert!(
                TransliteratorFactory::create(source, target).is_some(),
                "pair {}->{} should resolve",
                source,
                target
            );
        }
    }

    #[test]
    fn test_unsupported_pairs_resolve_to_none() {
        assert!(TransliteratorFactory::create("sa", "xx").is_none());
        assert!(TransliteratorFactory::create("ta", "te").is_none());
    }

    #[test]
    fn test_empty_source_defaults_to_devanagari() {
        assert!(TransliteratorFactory::create("", "ta").is_some());
    }
}
