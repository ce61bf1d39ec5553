//! LEI-section monetary token stream (spec §4.4).

use lidl_receipt_core::{norm_spaces, upper_ascii, MoneyValue};

use crate::tokenize::{is_qty_line, parse_money};

/// One token from the right-column amount stream: its signed value and the
/// original line it came from.
#[derive(Debug, Clone)]
pub struct LeiToken {
    pub value: MoneyValue,
    pub raw: String,
}

fn find_lei_anchor(lines: &[String]) -> Option<usize> {
    lines.iter().position(|l| upper_ascii(&norm_spaces(l)) == "LEI")
}

fn is_interleaved_qty_descriptor(normalized: &str) -> bool {
    let u = upper_ascii(normalized);
    (u.contains("BUC") || u.contains("KG"))
        && (u.contains(" X ") || u.contains('\u{d7}') || u.ends_with(" X"))
}

const STOP_PREFIXES: &[&str] = &[
    "TRANZAC", "CASA", "MG", "DATA", "TZ/POS", "ORA", "BON", "MULTUMESC", "ACHIZIT", "DETALII",
];

/// Yield `(signed_value, raw_line)` tuples from the line after the `LEI`
/// anchor until a footer-section marker is hit. Empty if `LEI` is absent.
pub fn extract_lei_stream(lines: &[String]) -> Vec<LeiToken> {
    let Some(start) = find_lei_anchor(lines) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for line in &lines[start + 1..] {
        let normalized = norm_spaces(line);

        if is_qty_line(&normalized).is_some() {
            continue;
        }
        if is_interleaved_qty_descriptor(&normalized) {
            continue;
        }

        let upper = upper_ascii(&normalized);
        if STOP_PREFIXES.iter().any(|p| upper.starts_with(p)) {
            break;
        }

        if let Some(value) = parse_money(&normalized) {
            out.push(LeiToken { value, raw: line.clone() });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_when_lei_anchor_absent() {
        assert!(extract_lei_stream(&lines(&["7,99", "TOTAL"])).is_empty());
    }

    #[test]
    fn collects_tokens_until_stop_marker() {
        let ls = lines(&["LEI", "7,99", "-8,50 D", "TRANZACTIE 123", "5,00"]);
        let tokens = extract_lei_stream(&ls);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value.to_string(), "7.99");
        assert!(tokens[1].value.is_negative());
    }

    #[test]
    fn skips_interleaved_qty_lines() {
        let ls = lines(&["LEI", "1,000 BUC x 7,99", "7,99", "TOTAL"]);
        let tokens = extract_lei_stream(&ls);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value.to_string(), "7.99");
    }
}
