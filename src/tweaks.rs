use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use crate::config::TweakConfig;
use crate::error::{ManjariError, Result};
use crate::translit::TranslitEngine;

const VERSE_PUNCTUATION: [char; 2] = ['।', '॥'];

fn is_metadata_end(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "--END METADATA" || trimmed == "-- END METADATA"
}

/// Post-translation content pass: inserts a display header after the
/// metadata block from a configured metadata field, and collapses verse
/// couplets onto a single marked line. Both edits are idempotent, so the
/// pass can be re-run over already-tweaked trees.
pub struct TweakPass {
    config: TweakConfig,
    marker: String,
    engine: TranslitEngine,
}

impl TweakPass {
    pub fn new(config: TweakConfig, marker: String, engine: TranslitEngine) -> Self {
        Self {
            config,
            marker,
            engine,
        }
    }

    fn header_value<'a>(&self, lines: &[&'a str]) -> Option<&'a str> {
        let prefix = format!("{}:", self.config.header_field);
        lines
            .iter()
            .find(|line| line.starts_with(&prefix))
            .map(|line| line[prefix.len()..].trim())
    }

    /// Apply the tweaks to one file's lines. Returns the new lines and
    /// whether anything changed.
    pub async fn tweak_lines(&self, lines: &[&str]) -> Result<(Vec<String>, bool)> {
        let header = if self.config.add_header {
            self.header_value(lines)
        } else {
            None
        };

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut after_metadata = !lines
            .first()
            .map(|line| line.trim().starts_with("--"))
            .unwrap_or(false);
        let mut first_verse_seen = false;
        let mut changed = false;

        let mut idx = 0;
        while idx < lines.len() {
            let line = lines[idx];

            if is_metadata_end(line) {
                after_metadata = true;
                out.push(line.to_string());
                if let Some(header) = header {
                    let next = lines.get(idx + 1).map(|l| l.trim());
                    let rendered = match self.engine.convert_line(header).await {
                        Ok(rendered) => rendered,
                        Err(e) => {
                            warn!("Header conversion failed: {}", e);
                            header.to_string()
                        }
                    };
                    if next != Some(rendered.as_str()) && next != Some(header) {
                        out.push(rendered);
                        changed = true;
                    }
                }
                idx += 1;
                continue;
            }

            if self.config.collapse_couplets
                && after_metadata
                && first_verse_seen
                && !line.contains(VERSE_PUNCTUATION)
                && !line.trim().is_empty()
                && !line.contains(&self.marker)
            {
                if let Some(next) = lines.get(idx + 1) {
                    if next.contains(VERSE_PUNCTUATION) {
                        out.push(format!(
                            "{}{}{}",
                            line.trim_end(),
                            self.marker,
                            next.trim_start()
                        ));
                        changed = true;
                        idx += 2;
                        continue;
                    }
                }
            }

            if after_metadata && !first_verse_seen {
                let trimmed = line.trim();
                if !trimmed.is_empty() && !trimmed.starts_with("--") {
                    first_verse_seen = true;
                }
            }

            out.push(line.to_string());
            idx += 1;
        }

        Ok((out, changed))
    }

    /// Tweak one file in place. Returns whether the file was rewritten.
    pub async fn tweak_file(&self, path: &Path) -> Result<bool> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|_| ManjariError::FileNotFound(path.display().to_string()))?;

        let lines: Vec<&str> = content.lines().collect();
        let (tweaked, changed) = self.tweak_lines(&lines).await?;

        if !changed {
            debug!("No tweaks needed for {}", path.display());
            return Ok(false);
        }

        let mut output = tweaked.join("\n");
        output.push('\n');
        fs::write(path, output).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn pass(update: impl FnOnce(&mut TweakConfig), target: &str) -> TweakPass {
        let mut config = Config::default().tweaks;
        update(&mut config);
        TweakPass::new(
            config,
            "{b}{t}".to_string(),
            TranslitEngine::new("sa", target),
        )
    }

    async fn run(pass: &TweakPass, lines: &[&str]) -> (Vec<String>, bool) {
        pass.tweak_lines(lines).await.unwrap()
    }

    #[tokio::test]
    async fn test_header_inserted_after_metadata() {
        let p = pass(|c| c.add_header = true, "sa");
        let (out, changed) = run(
            &p,
            &["-- METADATA", "title_body3: कृष्णः", "--END METADATA", "गुरुः।"],
        )
        .await;
        assert!(changed);
        assert_eq!(out[3], "कृष्णः");
        assert_eq!(out[4], "गुरुः।");
    }

    #[tokio::test]
    async fn test_header_transliterated_for_tamil() {
        let p = pass(|c| c.add_header = true, "ta");
        let (out, _) = run(
            &p,
            &["-- METADATA", "title_body3: कृष्णः", "--END METADATA", "गुरुः।"],
        )
        .await;
        assert_eq!(out[3], "க்ருஷ்ண꞉");
    }

    #[tokio::test]
    async fn test_header_insertion_is_idempotent() {
        let p = pass(|c| c.add_header = true, "sa");
        let lines = ["-- METADATA", "title_body3: कृष्णः", "--END METADATA", "कृष्णः", "गुरुः।"];
        let (out, changed) = run(&p, &lines).await;
        assert!(!changed);
        assert_eq!(out.len(), lines.len());
    }

    #[tokio::test]
    async fn test_couplet_collapsing() {
        let p = pass(|c| c.collapse_couplets = true, "sa");
        let (out, changed) = run(
            &p,
            &[
                "--END METADATA",
                "प्रथमः श्लोकः।",
                "गुरुर्ब्रह्मा",
                "गुरुर्विष्णुः॥",
            ],
        )
        .await;
        assert!(changed);
        assert_eq!(out[1], "प्रथमः श्लोकः।");
        assert_eq!(out[2], "गुरुर्ब्रह्मा{b}{t}गुरुर्विष्णुः॥");
    }

    #[tokio::test]
    async fn test_couplet_collapsing_skips_first_verse() {
        let p = pass(|c| c.collapse_couplets = true, "sa");
        // The very first body line never merges upward
        let (out, changed) = run(&p, &["गुरुर्ब्रह्मा", "गुरुर्विष्णुः॥"]).await;
        assert!(!changed);
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn test_already_collapsed_line_not_merged_again() {
        let p = pass(|c| c.collapse_couplets = true, "sa");
        let lines = ["श्लोकः।", "गुरुर्ब्रह्मा{b}{t}गुरुर्विष्णुः॥", "नमः॥"];
        let (_, changed) = run(&p, &lines).await;
        assert!(!changed);
    }

    #[tokio::test]
    async fn test_tweak_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ch01.txt");
        std::fs::write(
            &file,
            "-- METADATA\ntitle_body3: कृष्णः\n--END METADATA\nगुरुः।\n",
        )
        .unwrap();

        let p = pass(|c| c.add_header = true, "sa");
        assert!(p.tweak_file(&file).await.unwrap());
        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(
            content,
            "-- METADATA\ntitle_body3: कृष्णः\n--END METADATA\nकृष्णः\nगुरुः।\n"
        );

        // Second run is a no-op
        assert!(!p.tweak_file(&file).await.unwrap());
    }
}
