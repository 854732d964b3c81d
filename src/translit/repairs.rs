// Repair tables for encoding artifacts in the source archives and for
// systematic conversion artifacts in specific targets. Substitutions are
// applied single-pass in declaration order.

/// Source-script repairs, always applied before conversion: ASCII colon
/// typed for visarga, a common misspelling, private-use glyph codes from
/// legacy fonts, and a zero-width non-joiner standing in for a virama.
pub const SOURCE_REPAIRS: &[(&str, &str)] = &[
    (":", "ः"),
    ("सहस्त्र", "सहस्र"),
    ("\u{e341}", "त्"),
    ("\u{e332}", "क्"),
    ("\u{e348}", "ब्"),
    ("\u{200c}", "्"),
];

/// Tamil post-conversion repairs: avagraha tokens, the conventional shri
/// ligature, leftover private-use codes, viramas stranded after
/// superscript voicing digits, and a few lexical normalizations.
pub const TAMIL_REPAIRS: &[(&str, &str)] = &[
    ("(அ)", "ऽ"),
    ("(ஆ)", "ऽऽ"),
    ("ஶ்ரீ", "ஸ்ரீ"),
    ("\u{e341}", "த்"),
    ("\u{e332}", "க்"),
    ("\u{e348}", "ப்³"),
    ("்்", "்"),
    ("²்", "²"),
    ("³்", "³"),
    ("⁴்", "⁴"),
    ("Ḹ", "த்³த்⁴யா"),
    ("¡", "த்³த்⁴ய"),
    ("ட்⁴்", "ட்⁴"),
    ("அா", "ஆ"),
    ("நானா", "நாநா"),
    ("முநி", "முனி"),
    ("ஸஹஸ்த்ர", "ஸஹஸ்ர"),
    ("Þ", "த்³த்⁴யே"),
];

/// Apply a repair table to one line, in table order.
pub fn apply(table: &[(&str, &str)], line: &str) -> String {
    let mut out = line.to_string();
    for (original, replacement) in table {
        if out.contains(original) {
            out = out.replace(original, replacement);
        }
    }
    out
}

/// Restore verse-end punctuation on readable-Roman lines: a trailing
/// double period becomes the double danda, a single trailing period the
/// single danda.
pub fn normalize_roman_verse_end(line: &str) -> String {
    let trimmed = line.trim_end();
    if trimmed.ends_with("..") {
        line.replace("..", "॥")
    } else if let Some(stripped) = trimmed.strip_suffix('.') {
        format!("{}।", stripped)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_repairs_fix_ascii_visarga() {
        assert_eq!(apply(SOURCE_REPAIRS, "गुरु:"), "गुरुः");
    }

    #[test]
    fn test_source_repairs_fix_spelling() {
        assert_eq!(apply(SOURCE_REPAIRS, "सहस्त्रनाम"), "सहस्रनाम");
    }

    #[test]
    fn test_tamil_repairs_fix_stranded_virama() {
        assert_eq!(apply(TAMIL_REPAIRS, "க²்"), "க²");
        assert_eq!(apply(TAMIL_REPAIRS, "ப⁴்"), "ப⁴");
    }

    #[test]
    fn test_tamil_repairs_restore_avagraha() {
        assert_eq!(apply(TAMIL_REPAIRS, "தே(அ)பி"), "தேऽபி");
    }

    #[test]
    fn test_tamil_shri_ligature() {
        assert_eq!(apply(TAMIL_REPAIRS, "ஶ்ரீராம"), "ஸ்ரீராம");
    }

    #[test]
    fn test_roman_verse_end_single() {
        assert_eq!(normalize_roman_verse_end("namah."), "namah।");
    }

    #[test]
    fn test_roman_verse_end_double() {
        assert_eq!(normalize_roman_verse_end("namah.."), "namah॥");
    }

    #[test]
    fn test_roman_verse_end_untouched() {
        assert_eq!(normalize_roman_verse_end("no punctuation"), "no punctuation");
    }
}
