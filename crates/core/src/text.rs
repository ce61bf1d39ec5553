use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Replace NBSP with a plain space, collapse whitespace runs, and trim.
pub fn norm_spaces(s: &str) -> String {
    let replaced = s.replace('\u{00a0}', " ");
    let mut out = String::with_capacity(replaced.len());
    let mut last_was_space = false;
    for c in replaced.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

/// NFKD-decompose, strip combining marks, uppercase — folds Romanian
/// diacritics (ă, â, î, ș/ş, ț/ţ) so marker matching is diacritic-insensitive.
pub fn upper_ascii(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs_and_trims() {
        assert_eq!(norm_spaces("  Lapte   1L\t\n"), "Lapte 1L");
    }

    #[test]
    fn replaces_nbsp_with_space() {
        assert_eq!(norm_spaces("7,99\u{00a0}B"), "7,99 B");
    }

    #[test]
    fn folds_romanian_diacritics_and_uppercases() {
        assert_eq!(upper_ascii("mulțumesc"), "MULTUMESC");
        assert_eq!(upper_ascii("Mulțumesc"), "MULTUMESC");
        assert_eq!(upper_ascii("MULȚUMESC"), "MULTUMESC");
        assert_eq!(upper_ascii("Strada"), "STRADA");
    }

    #[test]
    fn idempotent_on_plain_ascii() {
        assert_eq!(upper_ascii("BUC"), "BUC");
    }
}
