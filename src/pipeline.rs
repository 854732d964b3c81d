use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{ManjariError, Result};
use crate::syllable::{LineSplitter, SplitOverrides};
use crate::translit::TranslitEngine;

const METADATA_PREFIX: &str = "--";
const VERSE_ENDINGS: [char; 2] = ['।', '॥'];

/// Role of one raw input line, derived at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLine {
    MetadataStart,
    MetadataEnd,
    MetadataField { key: String, value: String },
    Blank,
    Content(String),
}

/// Result of processing one file: the output lines plus counters for the
/// run summary.
#[derive(Debug, Default)]
pub struct ProcessedFile {
    pub lines: Vec<String>,
    pub lines_translated: usize,
    pub lines_split: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    InMetadata,
    Body,
}

/// Per-file line processor. Detects the metadata block at the file start,
/// transliterates field values word-for-word, and routes qualifying body
/// lines through the splitter and the conversion engine. One output file is
/// written per input file, name mirrored flat into the output directory.
pub struct TextPipelineProcessor {
    config: PipelineConfig,
    engine: TranslitEngine,
    splitter: LineSplitter,
    overrides: SplitOverrides,
}

impl TextPipelineProcessor {
    pub fn new(config: PipelineConfig, engine: TranslitEngine) -> Result<Self> {
        let overrides = match &config.split_overrides_file {
            Some(path) if path.exists() => {
                let overrides = SplitOverrides::load(path)?;
                debug!(
                    "Loaded {} split overrides from {}",
                    overrides.len(),
                    path.display()
                );
                overrides
            }
            Some(path) => {
                debug!("Split override file {} not found, skipping", path.display());
                SplitOverrides::default()
            }
            None => SplitOverrides::default(),
        };

        let splitter = LineSplitter::new(config.split_marker.clone());

        Ok(Self {
            config,
            engine,
            splitter,
            overrides,
        })
    }

    /// Classify one line given the current metadata state.
    fn classify(&self, line: &str, state: State) -> ContentLine {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ContentLine::Blank;
        }

        match state {
            State::Start => {
                if trimmed.starts_with(METADATA_PREFIX)
                    && trimmed.contains("METADATA")
                    && !trimmed.contains("END")
                {
                    return ContentLine::MetadataStart;
                }
            }
            State::InMetadata => {
                if trimmed.starts_with(METADATA_PREFIX) && trimmed.contains("END") {
                    return ContentLine::MetadataEnd;
                }
                if let Some((key, value)) = line.split_once(':') {
                    return ContentLine::MetadataField {
                        key: key.to_string(),
                        value: value.to_string(),
                    };
                }
            }
            State::Body => {}
        }

        ContentLine::Content(line.to_string())
    }

    /// Whether a body line is routed through the conversion engine.
    fn qualifies(&self, line: &str, next_line: Option<&str>) -> bool {
        if line.trim().is_empty() || line.starts_with('\t') {
            return false;
        }
        if self
            .config
            .exception_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
        {
            return false;
        }
        if self.config.process_only_sentence_ends {
            return line.ends_with(VERSE_ENDINGS);
        }
        // A following tab-indented line means this line was already split
        // into a couplet continuation.
        if next_line.is_some_and(|next| next.starts_with('\t')) {
            return false;
        }
        true
    }

    async fn convert_body_line(&self, line: &str, report: &mut ProcessedFile) -> String {
        let mut prepared = self.engine.prepare(line);

        if self.config.do_splits && self.config.split_before_translate {
            prepared = self.apply_split(&prepared, report);
        }

        let mut out = match self.engine.render(&prepared).await {
            Ok(out) => out,
            Err(e) => {
                warn!("Line conversion failed, keeping original: {}", e);
                report.warnings += 1;
                line.to_string()
            }
        };

        if self.config.do_splits && !self.config.split_before_translate {
            out = self.apply_split(&out, report);
        }

        report.lines_translated += 1;
        out
    }

    fn apply_split(&self, line: &str, report: &mut ProcessedFile) -> String {
        let split = self.splitter.split_line(line);
        if split != line {
            report.lines_split += 1;
        }
        self.overrides.apply(&split)
    }

    /// Process the lines of one file through the metadata state machine.
    pub async fn process_lines(&self, lines: &[&str]) -> Result<ProcessedFile> {
        let mut report = ProcessedFile::default();
        let mut state = State::Start;

        for (idx, raw) in lines.iter().enumerate() {
            let line = raw.trim_end_matches(['\n', '\r']).trim_end();

            match self.classify(line, state) {
                ContentLine::MetadataStart => {
                    state = State::InMetadata;
                    report.lines.push(line.to_string());
                }
                ContentLine::MetadataEnd => {
                    state = State::Body;
                    report.lines.push(line.to_string());
                }
                ContentLine::MetadataField { key, value } => {
                    // Field values get word-for-word conversion, never splits
                    let converted = match self.engine.convert_line(&value).await {
                        Ok(out) => out,
                        Err(e) => {
                            warn!("Metadata value conversion failed for {}: {}", key, e);
                            report.warnings += 1;
                            value.clone()
                        }
                    };
                    report.lines_translated += 1;
                    report.lines.push(format!("{}:{}", key, converted.trim_end()));
                }
                ContentLine::Blank => {
                    report.lines.push(line.to_string());
                }
                ContentLine::Content(content) => {
                    if state == State::Start {
                        state = State::Body;
                    }
                    let next_line = lines.get(idx + 1).copied();
                    if self.qualifies(&content, next_line) {
                        let out = self.convert_body_line(&content, &mut report).await;
                        report.lines.push(out);
                    } else {
                        report.lines.push(content);
                    }
                }
            }
        }

        Ok(report)
    }

    /// Process one input file into the output directory, flat (file name
    /// only); chapter file names are unique within a language folder.
    pub async fn process_file(&self, input: &Path, output_dir: &Path) -> Result<ProcessedFile> {
        let file_name = input
            .file_name()
            .ok_or_else(|| ManjariError::Pipeline(format!("Invalid input path: {}", input.display())))?;

        debug!("Processing {}", input.display());

        let content = fs::read_to_string(input)
            .await
            .map_err(|_| ManjariError::FileNotFound(input.display().to_string()))?;

        let lines: Vec<&str> = content.lines().collect();
        let report = self.process_lines(&lines).await?;

        // Output is assembled in memory and written once; no handle stays
        // open across an error path.
        let output_path = output_dir.join(file_name);
        let mut output = report.lines.join("\n");
        output.push('\n');
        fs::write(&output_path, output).await?;

        info!(
            "Wrote {} ({} lines, {} converted, {} split)",
            output_path.display(),
            report.lines.len(),
            report.lines_translated,
            report.lines_split
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn processor(target: &str, update: impl FnOnce(&mut PipelineConfig)) -> TextPipelineProcessor {
        let mut config = Config::default().pipeline;
        config.output_language = target.to_string();
        update(&mut config);
        let engine = TranslitEngine::new(&config.input_language, &config.output_language);
        TextPipelineProcessor::new(config, engine).unwrap()
    }

    async fn run(processor: &TextPipelineProcessor, lines: &[&str]) -> Vec<String> {
        processor.process_lines(lines).await.unwrap().lines
    }

    #[tokio::test]
    async fn test_full_line_transliteration() {
        let p = processor("ta", |_| {});
        let out = run(&p, &["गुरुः कृष्णः।"]).await;
        assert_eq!(out, vec!["கு³ரு꞉ க்ருஷ்ண꞉।"]);
    }

    #[tokio::test]
    async fn test_metadata_block_keys_preserved() {
        let p = processor("ta", |_| {});
        let out = run(
            &p,
            &["-- METADATA", "title: कृष्णः", "author: व्यासः", "--END METADATA", "गुरुः।"],
        )
        .await;
        assert_eq!(out[0], "-- METADATA");
        assert!(out[1].starts_with("title:"));
        assert_eq!(out[1], "title: க்ருஷ்ண꞉");
        assert!(out[2].starts_with("author:"));
        assert_eq!(out[3], "--END METADATA");
        assert_eq!(out[4], "கு³ரு꞉।");
    }

    #[tokio::test]
    async fn test_metadata_line_without_colon_passes_through() {
        let p = processor("ta", |_| {});
        let out = run(&p, &["--METADATA", "no colon here", "-- END METADATA"]).await;
        assert_eq!(out[1], "no colon here");
    }

    #[tokio::test]
    async fn test_key_value_outside_metadata_is_content() {
        let p = processor("te", |_| {});
        // No metadata block, so the colon line is body content, and the
        // "title" exception prefix passes it through
        let out = run(&p, &["title: कृष्णः"]).await;
        assert_eq!(out, vec!["title: कृष्णः"]);
    }

    #[tokio::test]
    async fn test_exception_prefixes_and_blanks_skipped() {
        let p = processor("te", |_| {});
        let out = run(&p, &["## heading", "", "$note", "कृष्णः"]).await;
        assert_eq!(out[0], "## heading");
        assert_eq!(out[1], "");
        assert_eq!(out[2], "$note");
        assert_eq!(out[3], "కృష్ణః");
    }

    #[tokio::test]
    async fn test_tab_continuation_lines_skipped() {
        let p = processor("te", |_| {});
        let out = run(&p, &["कृष्णः", "\tगुरुः", "गुरुः"]).await;
        // First line precedes a tab continuation, so both stay unchanged
        assert_eq!(out[0], "कृष्णः");
        assert_eq!(out[1], "\tगुरुः");
        assert_eq!(out[2], "గురుః");
    }

    #[tokio::test]
    async fn test_process_only_sentence_ends() {
        let p = processor("te", |c| c.process_only_sentence_ends = true);
        let out = run(&p, &["गुरुः", "कृष्णः।", "नमः॥"]).await;
        assert_eq!(out[0], "गुरुः");
        assert_eq!(out[1], "కృష్ణః।");
        assert_eq!(out[2], "నమః॥");
    }

    #[tokio::test]
    async fn test_split_marker_survives_conversion() {
        let p = processor("te", |c| c.do_splits = true);
        let out = run(&p, &["क ख ग घ"]).await;
        assert_eq!(out, vec!["క ఖ{b}{t}గ ఘ"]);
    }

    #[tokio::test]
    async fn test_split_is_idempotent_across_runs() {
        let p = processor("sa", |c| c.do_splits = true);
        let first = run(&p, &["क ख ग घ"]).await;
        let second: Vec<&str> = first.iter().map(String::as_str).collect();
        assert_eq!(run(&p, &second).await, first);
    }

    #[tokio::test]
    async fn test_process_file_mirrors_name_flat() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        std::fs::create_dir_all(&input_dir).unwrap();
        std::fs::create_dir_all(&output_dir).unwrap();
        let input = input_dir.join("chapter_01.txt");
        std::fs::write(&input, "-- METADATA\ntitle: कृष्णः\n--END METADATA\nगुरुः।\n").unwrap();

        let p = processor("ta", |_| {});
        let report = p.process_file(&input, &output_dir).await.unwrap();
        assert_eq!(report.lines_translated, 2);

        let written = std::fs::read_to_string(output_dir.join("chapter_01.txt")).unwrap();
        assert_eq!(
            written,
            "-- METADATA\ntitle: க்ருஷ்ண꞉\n--END METADATA\nகு³ரு꞉।\n"
        );
    }

    #[tokio::test]
    async fn test_missing_input_file_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = processor("ta", |_| {});
        let result = p
            .process_file(&dir.path().join("missing.txt"), dir.path())
            .await;
        assert!(matches!(result, Err(ManjariError::FileNotFound(_))));
    }
}
