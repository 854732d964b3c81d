use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{ManjariError, Result};
use crate::pipeline::TextPipelineProcessor;
use crate::sandhi::SandhiRuleTable;
use crate::syllable::LineSplitter;
use crate::translit::TranslitEngine;
use crate::tweaks::TweakPass;

/// End-of-run counters reported to the caller. Per-line detail stays in
/// the log.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub lines_translated: usize,
    pub lines_split: usize,
    pub warnings: usize,
}

/// Batch orchestration: walks the input tree, runs the per-file pipeline
/// for each target language, and isolates per-file failures so one bad
/// file cannot abort the batch.
pub struct Workflow {
    config: Config,
    sandhi: Option<SandhiRuleTable>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let sandhi = match &config.sandhi.rules_file {
            Some(path) => Some(SandhiRuleTable::load(path)?),
            None => None,
        };

        Ok(Self { config, sandhi })
    }

    fn engine_for(&self, target: &str) -> TranslitEngine {
        let mut engine = TranslitEngine::new(&self.config.pipeline.input_language, target);
        if let Some(table) = &self.sandhi {
            if !self.config.sandhi.labels.is_empty() {
                engine = engine.with_sandhi(table, &self.config.sandhi.labels);
            }
        }
        engine
    }

    /// Text files under `input_dir`, sorted for deterministic runs.
    pub fn discover_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
        if !input_dir.is_dir() {
            return Err(ManjariError::FileNotFound(input_dir.display().to_string()));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("txt") | Some("csv")
                )
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Translate one line of text for a single target language, applying
    /// the configured splitting. Used by the string-mode CLI path; unlike
    /// the file pipeline, the line is converted unconditionally, with no
    /// exception-prefix or sentence-end routing.
    pub async fn translate_line(&self, line: &str, target: &str) -> Result<String> {
        let engine = self.engine_for(target);
        let splitter = LineSplitter::new(self.config.pipeline.split_marker.clone());

        let mut prepared = engine.prepare(line);
        if self.config.pipeline.do_splits && self.config.pipeline.split_before_translate {
            prepared = splitter.split_line(&prepared);
        }
        let mut out = engine.render(&prepared).await?;
        if self.config.pipeline.do_splits && !self.config.pipeline.split_before_translate {
            out = splitter.split_line(&out);
        }
        Ok(out)
    }

    /// Process every text file in `input_dir` for each target language,
    /// writing to `output_root/<language>/<file name>`.
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        target_languages: &[String],
        output_root: &Path,
    ) -> Result<RunSummary> {
        let files = Self::discover_files(input_dir)?;
        info!(
            "Found {} files in {} for {} target language(s)",
            files.len(),
            input_dir.display(),
            target_languages.len()
        );

        let pb = ProgressBar::new((files.len() * target_languages.len()) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut summary = RunSummary::default();

        for target in target_languages {
            let output_dir = output_root.join(target);
            fs::create_dir_all(&output_dir).await?;

            let mut config = self.config.pipeline.clone();
            config.output_language = target.clone();
            config.input_directory = input_dir.to_path_buf();
            config.output_directory = output_dir.clone();
            let processor = TextPipelineProcessor::new(config, self.engine_for(target))?;

            for file in &files {
                pb.set_message(format!(
                    "{} -> {}",
                    file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
                    target
                ));
                match processor.process_file(file, &output_dir).await {
                    Ok(report) => {
                        summary.files_processed += 1;
                        summary.lines_translated += report.lines_translated;
                        summary.lines_split += report.lines_split;
                        summary.warnings += report.warnings;
                    }
                    Err(e) => {
                        warn!("Failed to process {}: {}", file.display(), e);
                        summary.files_failed += 1;
                    }
                }
                pb.inc(1);
            }
        }

        pb.finish_and_clear();
        info!(
            "Batch complete: {} files processed, {} failed, {} lines converted, {} split, {} warnings",
            summary.files_processed,
            summary.files_failed,
            summary.lines_translated,
            summary.lines_split,
            summary.warnings
        );

        Ok(summary)
    }

    /// Run the content-tweaks pass (header insertion, couplet collapsing)
    /// over every text file in a language directory, in place.
    pub async fn tweak_directory(&self, input_dir: &Path, language: &str) -> Result<RunSummary> {
        let files = Self::discover_files(input_dir)?;
        info!("Tweaking {} files in {}", files.len(), input_dir.display());

        let pass = TweakPass::new(
            self.config.tweaks.clone(),
            self.config.pipeline.split_marker.clone(),
            self.engine_for(language),
        );

        let mut summary = RunSummary::default();
        for file in &files {
            match pass.tweak_file(file).await {
                Ok(changed) => {
                    summary.files_processed += 1;
                    if changed {
                        info!("Updated {}", file.display());
                    }
                }
                Err(e) => {
                    warn!("Failed to tweak {}: {}", file.display(), e);
                    summary.files_failed += 1;
                }
            }
        }

        Ok(summary)
    }

    pub fn sandhi_table(&self) -> Option<&SandhiRuleTable> {
        self.sandhi.as_ref()
    }
}
