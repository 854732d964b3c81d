use async_trait::async_trait;
use std::iter::Peekable;
use std::str::Chars;

use super::Transliterator;
use crate::error::Result;

const DEVANAGARI_VIRAMA: char = '\u{094D}';

// Devanagari dependent vowel signs, including the short/long pairs used in
// southern-script sources.
const MATRAS: &[char] = &[
    'ा', 'ि', 'ी', 'ु', 'ू', 'ृ', 'ॄ', 'ॢ', 'ॆ', 'े', 'ै', 'ॊ', 'ो', 'ौ',
];

fn is_matra(ch: char) -> bool {
    MATRAS.contains(&ch)
}

fn lookup(table: &[(char, &'static str)], ch: char) -> Option<&'static str> {
    table
        .iter()
        .find(|(original, _)| *original == ch)
        .map(|(_, replacement)| *replacement)
}

/// Pass-through scheme for the identity pair, used by split-only runs.
pub struct IdentityMapper;

#[async_trait]
impl Transliterator for IdentityMapper {
    async fn convert(&self, line: &str) -> Result<String> {
        Ok(line.to_string())
    }
}

/// Block-offset mapper for targets whose Unicode block parallels the
/// Devanagari layout. Letters, signs and digits map by a fixed codepoint
/// offset; the override list patches codepoints the target block lacks.
/// Dandas and anything outside the Devanagari block are retained.
pub struct IndicMapper {
    offset: u32,
    overrides: &'static [(char, &'static str)],
}

const TELUGU_OVERRIDES: &[(char, &'static str)] = &[('ॐ', "ఓం"), ('़', "")];
const KANNADA_OVERRIDES: &[(char, &'static str)] = &[('ॐ', "ಓಂ"), ('़', "")];
// Bengali and Gujarati have no short e/o; the southern short vowels fall
// back to the long forms rather than landing on unassigned codepoints.
const GUJARATI_OVERRIDES: &[(char, &'static str)] = &[
    ('़', ""),
    ('ऎ', "એ"),
    ('ऒ', "ઓ"),
    ('ॆ', "ે"),
    ('ॊ', "ો"),
];
const BENGALI_OVERRIDES: &[(char, &'static str)] = &[
    ('व', "ব"),
    ('ॐ', "ওঁ"),
    ('़', ""),
    ('ऎ', "এ"),
    ('ऒ', "ও"),
    ('ॆ', "ে"),
    ('ॊ', "ো"),
];
const MALAYALAM_OVERRIDES: &[(char, &'static str)] = &[('ॐ', "ഓം"), ('़', "")];

impl IndicMapper {
    pub fn telugu() -> Self {
        Self {
            offset: 0x0300,
            overrides: TELUGU_OVERRIDES,
        }
    }

    pub fn kannada() -> Self {
        Self {
            offset: 0x0380,
            overrides: KANNADA_OVERRIDES,
        }
    }

    pub fn gujarati() -> Self {
        Self {
            offset: 0x0180,
            overrides: GUJARATI_OVERRIDES,
        }
    }

    pub fn bengali() -> Self {
        Self {
            offset: 0x0080,
            overrides: BENGALI_OVERRIDES,
        }
    }

    pub fn malayalam() -> Self {
        Self {
            offset: 0x0400,
            overrides: MALAYALAM_OVERRIDES,
        }
    }

    fn map_char(&self, ch: char, out: &mut String) {
        if let Some(replacement) = lookup(self.overrides, ch) {
            out.push_str(replacement);
            return;
        }
        let cp = ch as u32;
        // Letters and signs 0901..0963, digits 0966..096F; dandas stay.
        let mapped = matches!(cp, 0x0901..=0x0963 | 0x0966..=0x096F);
        if mapped {
            match char::from_u32(cp + self.offset) {
                Some(target) => out.push(target),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
}

#[async_trait]
impl Transliterator for IndicMapper {
    async fn convert(&self, line: &str) -> Result<String> {
        let mut out = String::with_capacity(line.len());
        for ch in line.chars() {
            self.map_char(ch, &mut out);
        }
        Ok(out)
    }
}

// Tamil has no parallel block for the full varga grid: voiced and aspirated
// consonants render as the base letter plus a superscript digit, and the
// Sanskrit sibilants come from grantha letters. The avagraha renders as the
// conventional "(அ)" token, later normalized by the repair table.
const TAMIL_MAP: &[(char, &'static str)] = &[
    // Independent vowels
    ('अ', "அ"),
    ('आ', "ஆ"),
    ('इ', "இ"),
    ('ई', "ஈ"),
    ('उ', "உ"),
    ('ऊ', "ஊ"),
    ('ऋ', "ரு"),
    ('ऎ', "எ"),
    ('ए', "ஏ"),
    ('ऐ', "ஐ"),
    ('ऒ', "ஒ"),
    ('ओ', "ஓ"),
    ('औ', "ஔ"),
    // Velar row
    ('क', "க"),
    ('ख', "க²"),
    ('ग', "க³"),
    ('घ', "க⁴"),
    ('ङ', "ங"),
    // Palatal row
    ('च', "ச"),
    ('छ', "ச²"),
    ('ज', "ஜ"),
    ('झ', "ஜ²"),
    ('ञ', "ஞ"),
    // Retroflex row
    ('ट', "ட"),
    ('ठ', "ட²"),
    ('ड', "ட³"),
    ('ढ', "ட⁴"),
    ('ण', "ண"),
    // Dental row
    ('त', "த"),
    ('थ', "த²"),
    ('द', "த³"),
    ('ध', "த⁴"),
    ('न', "ந"),
    // Labial row
    ('प', "ப"),
    ('फ', "ப²"),
    ('ब', "ப³"),
    ('भ', "ப⁴"),
    ('म', "ம"),
    // Semivowels and sibilants
    ('य', "ய"),
    ('र', "ர"),
    ('ल', "ல"),
    ('व', "வ"),
    ('श', "ஶ"),
    ('ष', "ஷ"),
    ('स', "ஸ"),
    ('ह', "ஹ"),
    ('ळ', "ள"),
    ('ऴ', "ழ"),
    ('ऱ', "ற"),
    ('ऩ', "ன"),
    // Dependent vowel signs
    ('ा', "ா"),
    ('ि', "ி"),
    ('ी', "ீ"),
    ('ु', "ு"),
    ('ू', "ூ"),
    ('ृ', "்ரு"),
    ('ॆ', "ெ"),
    ('े', "ே"),
    ('ै', "ை"),
    ('ॊ', "ொ"),
    ('ो', "ோ"),
    ('ौ', "ௌ"),
    ('्', "்"),
    // Signs
    ('ं', "ம்"),
    ('ँ', "ம்"),
    ('ः', "꞉"),
    ('ऽ', "(அ)"),
    ('ॐ', "ௐ"),
    ('़', ""),
    // Digits
    ('०', "௦"),
    ('१', "௧"),
    ('२', "௨"),
    ('३', "௩"),
    ('४', "௪"),
    ('५', "௫"),
    ('६', "௬"),
    ('७', "௭"),
    ('८', "௮"),
    ('९', "௯"),
];

/// Explicit-table Tamil scheme. Superscript voicing digits are re-ordered
/// after a following vowel sign so that the rendered akshara reads
/// correctly (e.g. gu becomes KA + U-sign + superscript three).
pub struct TamilMapper;

impl TamilMapper {
    fn convert_chars(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            let Some(mapped) = lookup(TAMIL_MAP, ch) else {
                out.push(ch);
                continue;
            };

            // Split a trailing superscript so a vowel sign can slot in
            // between the base letter and the digit.
            let (base, superscript) = match mapped.char_indices().last() {
                Some((idx, last)) if matches!(last, '²' | '³' | '⁴') => {
                    (&mapped[..idx], Some(last))
                }
                _ => (mapped, None),
            };

            out.push_str(base);
            if let Some(sup) = superscript {
                if let Some(&next) = chars.peek() {
                    if is_matra(next) && next != DEVANAGARI_VIRAMA {
                        if let Some(matra) = lookup(TAMIL_MAP, next) {
                            out.push_str(matra);
                            chars.next();
                        }
                    }
                }
                out.push(sup);
            }
        }

        out
    }
}

#[async_trait]
impl Transliterator for TamilMapper {
    async fn convert(&self, line: &str) -> Result<String> {
        Ok(self.convert_chars(line))
    }
}

/// Romanization style: scholarly ISO with diacritics, or the readable
/// phonetic variant for listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomanStyle {
    Iso,
    Readable,
}

struct RomanTables {
    consonants: &'static [(char, &'static str)],
    vowels: &'static [(char, &'static str)],
    matras: &'static [(char, &'static str)],
    signs: &'static [(char, &'static str)],
}

const ISO_CONSONANTS: &[(char, &'static str)] = &[
    ('क', "k"),
    ('ख', "kh"),
    ('ग', "g"),
    ('घ', "gh"),
    ('ङ', "ṅ"),
    ('च', "c"),
    ('छ', "ch"),
    ('ज', "j"),
    ('झ', "jh"),
    ('ञ', "ñ"),
    ('ट', "ṭ"),
    ('ठ', "ṭh"),
    ('ड', "ḍ"),
    ('ढ', "ḍh"),
    ('ण', "ṇ"),
    ('त', "t"),
    ('थ', "th"),
    ('द', "d"),
    ('ध', "dh"),
    ('न', "n"),
    ('प', "p"),
    ('फ', "ph"),
    ('ब', "b"),
    ('भ', "bh"),
    ('म', "m"),
    ('य', "y"),
    ('र', "r"),
    ('ल', "l"),
    ('व', "v"),
    ('श', "ś"),
    ('ष', "ṣ"),
    ('स', "s"),
    ('ह', "h"),
    ('ळ', "ḷ"),
    ('ऴ', "ḻ"),
    ('ऱ', "ṟ"),
    ('ऩ', "ṉ"),
];

const ISO_VOWELS: &[(char, &'static str)] = &[
    ('अ', "a"),
    ('आ', "ā"),
    ('इ', "i"),
    ('ई', "ī"),
    ('उ', "u"),
    ('ऊ', "ū"),
    ('ऋ', "r̥"),
    ('ॠ', "r̥̄"),
    ('ऌ', "l̥"),
    ('ऎ', "e"),
    ('ए', "ē"),
    ('ऐ', "ai"),
    ('ऒ', "o"),
    ('ओ', "ō"),
    ('औ', "au"),
];

const ISO_MATRAS: &[(char, &'static str)] = &[
    ('ा', "ā"),
    ('ि', "i"),
    ('ी', "ī"),
    ('ु', "u"),
    ('ू', "ū"),
    ('ृ', "r̥"),
    ('ॄ', "r̥̄"),
    ('ॢ', "l̥"),
    ('ॆ', "e"),
    ('े', "ē"),
    ('ै', "ai"),
    ('ॊ', "o"),
    ('ो', "ō"),
    ('ौ', "au"),
];

const ISO_SIGNS: &[(char, &'static str)] = &[
    ('ं', "ṁ"),
    ('ँ', "m̐"),
    ('ः', "ḥ"),
    ('ऽ', "’"),
    ('ॐ', "ōṁ"),
    ('़', ""),
];

const READABLE_CONSONANTS: &[(char, &'static str)] = &[
    ('क', "k"),
    ('ख', "kh"),
    ('ग', "g"),
    ('घ', "gh"),
    ('ङ', "n"),
    ('च', "ch"),
    ('छ', "chh"),
    ('ज', "j"),
    ('झ', "jh"),
    ('ञ', "n"),
    ('ट', "t"),
    ('ठ', "th"),
    ('ड', "d"),
    ('ढ', "dh"),
    ('ण', "n"),
    ('त', "t"),
    ('थ', "th"),
    ('द', "d"),
    ('ध', "dh"),
    ('न', "n"),
    ('प', "p"),
    ('फ', "ph"),
    ('ब', "b"),
    ('भ', "bh"),
    ('म', "m"),
    ('य', "y"),
    ('र', "r"),
    ('ल', "l"),
    ('व', "v"),
    ('श', "sh"),
    ('ष', "sh"),
    ('स', "s"),
    ('ह', "h"),
    ('ळ', "l"),
    ('ऴ', "zh"),
    ('ऱ', "r"),
    ('ऩ', "n"),
];

const READABLE_VOWELS: &[(char, &'static str)] = &[
    ('अ', "a"),
    ('आ', "aa"),
    ('इ', "i"),
    ('ई', "ee"),
    ('उ', "u"),
    ('ऊ', "oo"),
    ('ऋ', "ri"),
    ('ऎ', "e"),
    ('ए', "e"),
    ('ऐ', "ai"),
    ('ऒ', "o"),
    ('ओ', "o"),
    ('औ', "au"),
];

const READABLE_MATRAS: &[(char, &'static str)] = &[
    ('ा', "aa"),
    ('ि', "i"),
    ('ी', "ee"),
    ('ु', "u"),
    ('ू', "oo"),
    ('ृ', "ri"),
    ('ॆ', "e"),
    ('े', "e"),
    ('ै', "ai"),
    ('ॊ', "o"),
    ('ो', "o"),
    ('ौ', "au"),
];

const READABLE_SIGNS: &[(char, &'static str)] = &[
    ('ं', "m"),
    ('ँ', "m"),
    ('ः', "h"),
    ('ऽ', "'"),
    ('ॐ', "om"),
    ('़', ""),
];

const DEVANAGARI_DIGITS: &[(char, &'static str)] = &[
    ('०', "0"),
    ('१', "1"),
    ('२', "2"),
    ('३', "3"),
    ('४', "4"),
    ('५', "5"),
    ('६', "6"),
    ('७', "7"),
    ('८', "8"),
    ('९', "9"),
];

/// Roman scheme: walks the line tracking the inherent vowel. A consonant
/// emits its value plus "a" unless a vowel sign or virama follows. The
/// readable style also drops dandas to sentence periods and capitalizes
/// the line; the trailing period is later restored to verse punctuation.
pub struct RomanMapper {
    style: RomanStyle,
    tables: RomanTables,
}

impl RomanMapper {
    pub fn iso() -> Self {
        Self {
            style: RomanStyle::Iso,
            tables: RomanTables {
                consonants: ISO_CONSONANTS,
                vowels: ISO_VOWELS,
                matras: ISO_MATRAS,
                signs: ISO_SIGNS,
            },
        }
    }

    pub fn readable() -> Self {
        Self {
            style: RomanStyle::Readable,
            tables: RomanTables {
                consonants: READABLE_CONSONANTS,
                vowels: READABLE_VOWELS,
                matras: READABLE_MATRAS,
                signs: READABLE_SIGNS,
            },
        }
    }

    fn emit_consonant(&self, value: &str, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
        out.push_str(value);
        match chars.peek() {
            Some(&DEVANAGARI_VIRAMA) => {
                chars.next();
            }
            Some(&next) if is_matra(next) => {
                if let Some(matra) = lookup(self.tables.matras, next) {
                    out.push_str(matra);
                }
                chars.next();
            }
            _ => out.push('a'),
        }
    }

    fn convert_chars(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            if let Some(value) = lookup(self.tables.consonants, ch) {
                self.emit_consonant(value, &mut chars, &mut out);
            } else if let Some(value) = lookup(self.tables.vowels, ch) {
                out.push_str(value);
            } else if let Some(value) = lookup(self.tables.signs, ch) {
                out.push_str(value);
            } else if let Some(value) = lookup(DEVANAGARI_DIGITS, ch) {
                out.push_str(value);
            } else if ch == '।' && self.style == RomanStyle::Readable {
                out.push('.');
            } else if ch == '॥' && self.style == RomanStyle::Readable {
                out.push_str("..");
            } else {
                out.push(ch);
            }
        }

        if self.style == RomanStyle::Readable {
            capitalize_first_letter(&out)
        } else {
            out
        }
    }
}

fn capitalize_first_letter(text: &str) -> String {
    let mut done = false;
    text.chars()
        .map(|ch| {
            if !done && ch.is_alphabetic() {
                done = true;
                ch.to_uppercase().next().unwrap_or(ch)
            } else {
                ch
            }
        })
        .collect()
}

#[async_trait]
impl Transliterator for RomanMapper {
    async fn convert(&self, line: &str) -> Result<String> {
        Ok(self.convert_chars(line))
    }
}
