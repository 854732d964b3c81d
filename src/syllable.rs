use std::path::Path;
use tracing::{debug, warn};
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::cluster::{Clusterizer, DEVANAGARI_VIRAMA};
use crate::error::{ManjariError, Result};

/// Supplies per-cluster syllable weights for a clusterized line: 0 for
/// clusters carrying no syllable (spaces, punctuation, bare halanta
/// consonants), 1 per akshara. A meter-identification service can stand
/// behind this trait; the default implementation counts aksharas directly.
pub trait SyllableOracle: Send + Sync {
    /// Weights parallel to `clusters`. Err means the line could not be
    /// scanned; callers fall back to leaving the line unmodified.
    fn weights(&self, clusters: &[String]) -> Result<Vec<u32>>;
}

/// Default oracle: one syllable per cluster that contains a letter and does
/// not end in a virama (a trailing halanta consonant carries no vowel).
#[derive(Debug, Default, Clone, Copy)]
pub struct AksharaCounter;

impl SyllableOracle for AksharaCounter {
    fn weights(&self, clusters: &[String]) -> Result<Vec<u32>> {
        let weights = clusters
            .iter()
            .map(|cluster| {
                let has_letter = cluster
                    .chars()
                    .any(|c| c.general_category_group() == GeneralCategoryGroup::Letter);
                let halanta = cluster.ends_with(DEVANAGARI_VIRAMA);
                if has_letter && !halanta { 1 } else { 0 }
            })
            .collect();
        Ok(weights)
    }
}

/// Chosen break position within a cluster list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPoint {
    /// Index of the last cluster of the first half.
    pub index: usize,
    /// Whether a hyphen belongs before the break marker (the break falls
    /// inside a word rather than after it).
    pub hyphen: bool,
}

/// Splits a verse line in two at the balanced syllable boundary, inserting
/// a configurable marker. Lines that already carry the marker pass through
/// unchanged.
pub struct LineSplitter {
    clusterizer: Clusterizer,
    oracle: Box<dyn SyllableOracle>,
    marker: String,
}

impl LineSplitter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            clusterizer: Clusterizer::default(),
            oracle: Box::new(AksharaCounter),
            marker: marker.into(),
        }
    }

    /// Replace the syllable oracle, e.g. with a meter-identification client.
    pub fn with_oracle(mut self, oracle: Box<dyn SyllableOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Find the cluster index where the cumulative syllable count first
    /// reaches half the total (rounding down for odd totals). The break is
    /// only taken where the following syllabic cluster starts a fresh
    /// akshara; a following space suppresses the hyphen.
    pub fn split_point(&self, clusters: &[String], weights: &[u32]) -> Option<SplitPoint> {
        let total: u32 = weights.iter().sum();
        if total < 2 {
            return None;
        }
        let half = total / 2;

        let mut consumed = 0u32;
        for (idx, weight) in weights.iter().enumerate() {
            consumed += weight;
            if consumed != half {
                continue;
            }
            // The break is taken just before the next akshara. A trailing
            // danda or halanta cluster stays with the first half, so keep
            // scanning while the next non-space cluster is non-syllabic.
            let next = clusters[idx + 1..]
                .iter()
                .zip(&weights[idx + 1..])
                .find(|(cluster, _)| cluster.as_str() != " ");
            match next {
                Some((_, w)) if *w > 0 => {
                    let hyphen = clusters.get(idx + 1).map(String::as_str) != Some(" ");
                    return Some(SplitPoint { index: idx, hyphen });
                }
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    /// Split `line` at the balanced boundary, joining the halves with the
    /// configured marker. Unsplittable or already-split lines are returned
    /// unchanged.
    pub fn split_line(&self, line: &str) -> String {
        if line.contains(&self.marker) {
            return line.to_string();
        }

        let trimmed = line.trim();
        let clusters = self.clusterizer.split(trimmed);
        let weights = match self.oracle.weights(&clusters) {
            Ok(weights) => weights,
            Err(e) => {
                warn!("Syllable scan failed, leaving line unsplit: {}", e);
                return line.to_string();
            }
        };

        let Some(point) = self.split_point(&clusters, &weights) else {
            debug!("No balanced split point found: {:?}", trimmed);
            return line.to_string();
        };

        let first: String = clusters[..=point.index].concat();
        let second: String = clusters[point.index + 1..].concat();
        let sep = if point.hyphen {
            format!("-{}", self.marker)
        } else {
            self.marker.clone()
        };

        format!("{}{}{}", first, sep, second.trim())
    }
}

/// Manually curated split overrides, two comma-separated columns per line.
/// Applied after automatic splitting; only the first matching row fires.
#[derive(Debug, Clone, Default)]
pub struct SplitOverrides {
    entries: Vec<(String, String)>,
}

impl SplitOverrides {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ManjariError::Pipeline(format!(
                "Failed to read split overrides {}: {}",
                path.display(),
                e
            ))
        })?;

        let entries = content
            .lines()
            .filter_map(|line| {
                let (original, replacement) = line.split_once(',')?;
                if original.is_empty() {
                    return None;
                }
                Some((original.to_string(), replacement.to_string()))
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply(&self, line: &str) -> String {
        for (original, replacement) in &self.entries {
            if line.contains(original.as_str()) {
                return line.replace(original.as_str(), replacement);
            }
        }
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MARKER: &str = "{b}{t}";

    #[test]
    fn test_akshara_weights() {
        let clusterizer = Clusterizer::default();
        let clusters = clusterizer.split("गुरुः कृष्णः।");
        let weights = AksharaCounter.weights(&clusters).unwrap();
        // गु रुः <space> कृ ष्णः ।
        assert_eq!(weights, vec![1, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_halanta_cluster_is_not_a_syllable() {
        let weights = AksharaCounter.weights(&["त्".to_string()]).unwrap();
        assert_eq!(weights, vec![0]);
    }

    #[test]
    fn test_split_at_word_boundary_without_hyphen() {
        let splitter = LineSplitter::new(MARKER);
        // Four aksharas, half = 2, boundary lands on the space
        assert_eq!(splitter.split_line("क ख ग घ"), "क ख{b}{t}ग घ");
    }

    #[test]
    fn test_split_inside_word_inserts_hyphen() {
        let splitter = LineSplitter::new(MARKER);
        assert_eq!(splitter.split_line("कखगघ"), "कख-{b}{t}गघ");
    }

    #[test]
    fn test_already_split_line_unchanged() {
        let splitter = LineSplitter::new(MARKER);
        let line = "क ख{b}{t}ग घ";
        assert_eq!(splitter.split_line(line), line);
    }

    #[test]
    fn test_short_line_unchanged() {
        let splitter = LineSplitter::new(MARKER);
        assert_eq!(splitter.split_line("क"), "क");
        assert_eq!(splitter.split_line(""), "");
    }

    #[test]
    fn test_split_point_rounds_down_for_odd_totals() {
        let splitter = LineSplitter::new(MARKER);
        let clusters: Vec<String> = "कखगघच".chars().map(String::from).collect();
        let weights = AksharaCounter.weights(&clusters).unwrap();
        assert_eq!(weights.iter().sum::<u32>(), 5);
        let point = splitter.split_point(&clusters, &weights).unwrap();
        // 5 syllables split 2 + 3
        assert_eq!(point.index, 1);
        assert!(point.hyphen);
    }

    #[test]
    fn test_oracle_failure_falls_back_to_original() {
        struct FailingOracle;
        impl SyllableOracle for FailingOracle {
            fn weights(&self, _clusters: &[String]) -> crate::error::Result<Vec<u32>> {
                Err(crate::error::ManjariError::Pipeline("bad verse".to_string()))
            }
        }

        let splitter = LineSplitter::new(MARKER).with_oracle(Box::new(FailingOracle));
        assert_eq!(splitter.split_line("क ख ग घ"), "क ख ग घ");
    }

    #[test]
    fn test_split_overrides_first_match_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "abc,xyz").unwrap();
        writeln!(file, "abc,nope").unwrap();
        let overrides = SplitOverrides::load(file.path()).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.apply("1 abc 2"), "1 xyz 2");
        assert_eq!(overrides.apply("no match"), "no match");
    }
}
