use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ManjariError, Result};

/// One sandhi substitution rule. The two source syllables are stored
/// concatenated as the lookup key; the label groups rules into selectable
/// sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandhiRule {
    pub original: String,
    pub replacement: String,
    pub rule_id: String,
    pub label: String,
}

/// Rule table loaded once per process and read-only afterwards. Rules keep
/// their file order so that label filtering is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SandhiRuleTable {
    rules: Vec<SandhiRule>,
    skipped_lines: usize,
}

impl SandhiRuleTable {
    /// Load a rule file. Each well-formed line has exactly five
    /// whitespace-separated fields: two source-syllable tokens, the
    /// replacement, a rule number, and a label. Malformed lines are skipped
    /// and counted, not errored; a partial table is legitimate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ManjariError::Rules(format!("Failed to read rule file {}: {}", path.display(), e))
        })?;

        let mut rules = Vec::new();
        let mut skipped_lines = 0;

        for (line_no, line) in content.lines().enumerate() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 5 {
                if !line.trim().is_empty() {
                    debug!("Skipping malformed rule line {}: {:?}", line_no + 1, line);
                    skipped_lines += 1;
                }
                continue;
            }

            rules.push(SandhiRule {
                original: format!("{}{}", parts[0], parts[1]),
                replacement: parts[2].to_string(),
                rule_id: parts[3].to_string(),
                label: parts[4].to_string(),
            });
        }

        if skipped_lines > 0 {
            warn!(
                "Loaded {} sandhi rules from {} ({} malformed lines skipped)",
                rules.len(),
                path.display(),
                skipped_lines
            );
        } else {
            debug!("Loaded {} sandhi rules from {}", rules.len(), path.display());
        }

        Ok(Self {
            rules,
            skipped_lines,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of malformed lines dropped during loading.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn rules(&self) -> &[SandhiRule] {
        &self.rules
    }

    /// Distinct labels in file order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !labels.contains(&rule.label.as_str()) {
                labels.push(&rule.label);
            }
        }
        labels
    }

    /// Merge all rules whose label is in `labels` into one substitution
    /// map. When the same original appears under several matching labels
    /// the first rule in file order wins.
    pub fn rules_for_labels(&self, labels: &[String]) -> HashMap<String, String> {
        self.rules_for_labels_ordered(labels).into_iter().collect()
    }

    /// Same selection as [`rules_for_labels`], keeping file order so that
    /// substitutions can be applied deterministically.
    ///
    /// [`rules_for_labels`]: Self::rules_for_labels
    pub fn rules_for_labels_ordered(&self, labels: &[String]) -> Vec<(String, String)> {
        let mut combined: Vec<(String, String)> = Vec::new();
        for rule in &self.rules {
            if !labels.iter().any(|l| l == &rule.label) {
                continue;
            }
            if combined.iter().any(|(original, _)| original == &rule.original) {
                continue;
            }
            combined.push((rule.original.clone(), rule.replacement.clone()));
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_rules(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rules() {
        let file = write_rules("ं क ङ्क 1 anusvara\nं ग ङ्ग 2 anusvara\n");
        let table = SandhiRuleTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].original, "ंक");
        assert_eq!(table.rules()[0].replacement, "ङ्क");
        assert_eq!(table.rules()[0].label, "anusvara");
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let file = write_rules("ं क ङ्क 1 anusvara\nं क ङ्क 1\n\nbad\n");
        let table = SandhiRuleTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped_lines(), 2);
    }

    #[test]
    fn test_rules_for_labels_filters() {
        let file = write_rules("ं क ङ्क 1 anusvara\nत् च च्च 2 halanta\n");
        let table = SandhiRuleTable::load(file.path()).unwrap();
        let rules = table.rules_for_labels(&["anusvara".to_string()]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("ंक").map(String::as_str), Some("ङ्क"));
    }

    #[test]
    fn test_first_match_wins_on_collision() {
        let file = write_rules("ं क ङ्क 1 setA\nं क XX 2 setB\n");
        let table = SandhiRuleTable::load(file.path()).unwrap();
        let rules = table.rules_for_labels(&["setA".to_string(), "setB".to_string()]);
        assert_eq!(rules.get("ंक").map(String::as_str), Some("ङ्क"));
    }

    #[test]
    fn test_deterministic_across_loads() {
        let file = write_rules("ं क ङ्क 1 a\nं ग ङ्ग 2 a\nत् च च्च 3 b\n");
        let table1 = SandhiRuleTable::load(file.path()).unwrap();
        let table2 = SandhiRuleTable::load(file.path()).unwrap();
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(table1.rules_for_labels(&labels), table2.rules_for_labels(&labels));
    }
}
