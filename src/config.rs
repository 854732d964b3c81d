use crate::error::{ManjariError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Default values for pipeline configuration
fn default_split_marker() -> String {
    "{b}{t}".to_string()
}

fn default_header_field() -> String {
    "title_body3".to_string()
}

fn default_exception_prefixes() -> Vec<String> {
    ["title", "##", "detail", "--", "\t", "$"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub sandhi: SandhiConfig,
    pub tweaks: TweakConfig,
}

/// Settings for one transliteration run. The value is built once per
/// invocation and never mutated while the pipeline is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source language code (script of the input files)
    pub input_language: String,
    /// Target language code
    pub output_language: String,
    /// Directory holding the input text files
    #[serde(default)]
    pub input_directory: PathBuf,
    /// Directory receiving one output file per input file
    #[serde(default)]
    pub output_directory: PathBuf,
    /// Lines starting with any of these prefixes are copied through unchanged
    #[serde(default = "default_exception_prefixes")]
    pub exception_prefixes: Vec<String>,
    /// Split verse lines at the balanced syllable boundary
    pub do_splits: bool,
    /// Marker inserted at the split point, either an inline tag token
    /// ("{b}{t}") or a literal newline plus tab
    #[serde(default = "default_split_marker")]
    pub split_marker: String,
    /// Only transliterate lines ending in verse punctuation
    pub process_only_sentence_ends: bool,
    /// Insert the split marker before conversion (source script) rather
    /// than after
    #[serde(default = "default_split_before_translate")]
    pub split_before_translate: bool,
    /// Optional two-column override file applied after automatic splitting
    #[serde(default)]
    pub split_overrides_file: Option<PathBuf>,
}

fn default_split_before_translate() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandhiConfig {
    /// Path to the sandhi rule file (five whitespace-separated fields per line)
    #[serde(default)]
    pub rules_file: Option<PathBuf>,
    /// Rule labels to activate; empty means no sandhi substitution
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweakConfig {
    /// Insert a header line after the metadata block
    pub add_header: bool,
    /// Metadata field supplying the header text
    #[serde(default = "default_header_field")]
    pub header_field: String,
    /// Merge verse couplets onto a single marked line
    pub collapse_couplets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig {
                input_language: "sa".to_string(),
                output_language: "ta".to_string(),
                input_directory: PathBuf::new(),
                output_directory: PathBuf::new(),
                exception_prefixes: default_exception_prefixes(),
                do_splits: false,
                split_marker: default_split_marker(),
                process_only_sentence_ends: false,
                split_before_translate: true,
                split_overrides_file: None,
            },
            sandhi: SandhiConfig {
                rules_file: None,
                labels: vec![],
            },
            tweaks: TweakConfig {
                add_header: false,
                header_field: default_header_field(),
                collapse_couplets: false,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ManjariError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ManjariError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ManjariError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ManjariError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trip() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.pipeline.input_language, "sa");
        assert_eq!(parsed.pipeline.split_marker, "{b}{t}");
        assert!(parsed.pipeline.split_before_translate);
    }

    #[test]
    fn test_partial_pipeline_section() {
        let toml = r#"
            [pipeline]
            input_language = "sa"
            output_language = "te"
            do_splits = true
            process_only_sentence_ends = false

            [sandhi]

            [tweaks]
            add_header = false
            collapse_couplets = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pipeline.output_language, "te");
        assert!(config.pipeline.exception_prefixes.contains(&"--".to_string()));
        assert!(config.sandhi.rules_file.is_none());
    }
}
