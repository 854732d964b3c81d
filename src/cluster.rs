use std::iter::Peekable;
use std::str::Chars;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

/// Devanagari virama, the default cluster joiner.
pub const DEVANAGARI_VIRAMA: char = '\u{094D}';

/// Splits text into grapheme clusters as a reader perceives them: a base
/// character plus any combining marks, with virama-joined consonants merged
/// into one conjunct cluster. Concatenating the clusters reproduces the
/// input exactly.
#[derive(Debug, Clone, Copy)]
pub struct Clusterizer {
    virama: char,
}

impl Default for Clusterizer {
    fn default() -> Self {
        Self {
            virama: DEVANAGARI_VIRAMA,
        }
    }
}

impl Clusterizer {
    /// Create a clusterizer for a script using a different joiner character.
    pub fn with_virama(virama: char) -> Self {
        Self { virama }
    }

    pub fn clusters<'a>(&self, text: &'a str) -> Clusters<'a> {
        Clusters {
            chars: text.chars().peekable(),
            virama: self.virama,
        }
    }

    /// Collect all clusters of `text`.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.clusters(text).collect()
    }
}

/// Lazy cluster iterator returned by [`Clusterizer::clusters`].
pub struct Clusters<'a> {
    chars: Peekable<Chars<'a>>,
    virama: char,
}

impl Iterator for Clusters<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let first = self.chars.next()?;
        let mut cluster = String::new();
        cluster.push(first);
        let mut prev = first;

        while let Some(&ch) = self.chars.peek() {
            // Combining marks always extend the cluster; a syllabic letter
            // extends it only when the previous character was the virama,
            // which joins consonants into a conjunct.
            let joins = is_combining_mark(ch) || (prev == self.virama && is_syllabic_letter(ch));
            if !joins {
                break;
            }
            cluster.push(ch);
            prev = ch;
            self.chars.next();
        }

        Some(cluster)
    }
}

fn is_combining_mark(ch: char) -> bool {
    ch.general_category_group() == GeneralCategoryGroup::Mark
}

fn is_syllabic_letter(ch: char) -> bool {
    ch.general_category() == GeneralCategory::OtherLetter
}
