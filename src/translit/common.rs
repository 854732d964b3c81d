use tracing::debug;

use super::repairs;
use super::{Transliterator, TransliteratorFactory};
use crate::error::Result;
use crate::sandhi::SandhiRuleTable;

/// Conversion engine for one language pair: source repairs, optional
/// sandhi substitution, the script conversion itself, then target-specific
/// repairs. Built once per run and shared read-only.
pub struct TranslitEngine {
    target: String,
    backend: Option<Box<dyn Transliterator>>,
    sandhi_rules: Vec<(String, String)>,
}

impl TranslitEngine {
    pub fn new(source: &str, target: &str) -> Self {
        let backend = TransliteratorFactory::create(source, target);
        if backend.is_none() {
            debug!(
                "No conversion scheme for {} -> {}, lines will pass through",
                source, target
            );
        }
        Self {
            target: target.to_string(),
            backend,
            sandhi_rules: Vec::new(),
        }
    }

    /// Activate sandhi substitution for the given rule labels.
    pub fn with_sandhi(mut self, table: &SandhiRuleTable, labels: &[String]) -> Self {
        self.sandhi_rules = table.rules_for_labels_ordered(labels);
        self
    }

    /// Whether this pair has no conversion scheme and passes lines through.
    pub fn is_pass_through(&self) -> bool {
        self.backend.is_none()
    }

    /// Source-script stage: encoding repairs, then sandhi substitution.
    /// Runs before splitting so the splitter sees normalized text.
    pub fn prepare(&self, line: &str) -> String {
        let mut out = repairs::apply(repairs::SOURCE_REPAIRS, line);
        for (original, replacement) in &self.sandhi_rules {
            if out.contains(original.as_str()) {
                out = out.replace(original.as_str(), replacement);
            }
        }
        out
    }

    /// Target-script stage: conversion plus per-target repairs.
    pub async fn render(&self, line: &str) -> Result<String> {
        let Some(backend) = &self.backend else {
            return Ok(line.to_string());
        };

        let converted = backend.convert(line).await?;
        let out = match self.target.as_str() {
            "ta" => repairs::apply(repairs::TAMIL_REPAIRS, &converted),
            "roman" => repairs::normalize_roman_verse_end(&converted),
            _ => converted,
        };
        Ok(out)
    }

    /// Full conversion of one line.
    pub async fn convert_line(&self, line: &str) -> Result<String> {
        let prepared = self.prepare(line);
        self.render(&prepared).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn convert(engine: &TranslitEngine, line: &str) -> String {
        tokio_test::block_on(engine.convert_line(line)).unwrap()
    }

    #[test]
    fn test_unsupported_pair_passes_through() {
        let engine = TranslitEngine::new("sa", "xx");
        assert!(engine.is_pass_through());
        assert_eq!(convert(&engine, "गुरुः कृष्णः।"), "गुरुः कृष्णः।");
    }

    #[test]
    fn test_tamil_conversion_with_repairs() {
        let engine = TranslitEngine::new("sa", "ta");
        assert_eq!(convert(&engine, "गुरुः कृष्णः।"), "கு³ரு꞉ க்ருஷ்ண꞉।");
        // ASCII colon repaired to visarga before conversion
        assert_eq!(convert(&engine, "गुरु:"), "கு³ரு꞉");
    }

    #[test]
    fn test_roman_verse_end_normalized() {
        let engine = TranslitEngine::new("sa", "roman");
        assert_eq!(convert(&engine, "नमः।"), "Namah।");
        assert_eq!(convert(&engine, "नमः॥"), "Namah॥");
    }

    #[test]
    fn test_sandhi_substitution_applies_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ं क ङ्क 1 anusvara").unwrap();
        let table = SandhiRuleTable::load(file.path()).unwrap();

        let engine =
            TranslitEngine::new("sa", "sa").with_sandhi(&table, &["anusvara".to_string()]);
        assert_eq!(convert(&engine, "अंकम्"), "अङ्कम्");
    }
}
