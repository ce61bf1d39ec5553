//! Line-level predicates and extractors (spec §4.1).
//!
//! These are the leaves the item state machine and the other extractors
//! build on: money/quantity parsing, VAT-letter detection, and the marker
//! predicates used to classify a line as totals/discount/footer noise.

use std::str::FromStr;
use std::sync::OnceLock;

use lidl_receipt_core::{norm_spaces, upper_ascii, MoneyValue, VatCode};
use regex::Regex;
use rust_decimal::Decimal;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_money, r"(\d{1,3}(?:[.\s]\d{3})*[.,]\s*\d{2})");
re!(re_quantity, r"(\d+[.,]\d+)");
re!(re_qty_line, r"(?i)^\s*(\d+[.,]\d+)\s+(buc|kg)\s*[xX\u{d7}]\s*(\d+[.,]\s*\d{2})\s*$");
re!(re_trailing_vat, r"\b([ABD])\b\s*$");
re!(re_pure_money_shape, r"^-?\d{1,3}(?:[.\s]\d{3})*[.,]\s*\d{2}$");
re!(re_has_letter, r"[A-Z]");
re!(re_leading_noise, r"^[^0-9\-]+");
re!(re_trailing_noise, r"[^0-9.,\-\s]+$");

/// Unit a quantity line is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Unit {
    #[serde(rename = "BUC")]
    Buc,
    #[serde(rename = "KG")]
    Kg,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Unit::Buc => "BUC",
            Unit::Kg => "KG",
        })
    }
}

/// A parsed `<qty> <BUC|KG> [x|X|×] <unit_price>` anchor line.
#[derive(Debug, Clone)]
pub struct QtyLine {
    pub quantity: Decimal,
    pub quantity_raw: String,
    pub unit: Unit,
    pub unit_price: MoneyValue,
    pub unit_price_raw: String,
}

/// Whether the original raw text carried a `-` sign after whitespace removal.
fn is_negative_raw(line: &str) -> bool {
    line.chars().filter(|c| !c.is_whitespace()).any(|c| c == '-')
}

fn decimal_from_money_match(m: &str) -> Option<Decimal> {
    let clean: String = m.chars().filter(|c| !c.is_whitespace()).collect();
    let clean = clean.replace('.', "").replace(',', ".");
    Decimal::from_str(&clean).ok()
}

/// First money match in the line, signed by whether the line (whitespace
/// removed) contains a `-`.
pub fn parse_money(line: &str) -> Option<MoneyValue> {
    let m = re_money().find(line)?;
    let decimal = decimal_from_money_match(m.as_str())?;
    Some(MoneyValue::from_decimal(decimal).with_sign(is_negative_raw(line)))
}

/// A decimal quantity like `1,000` or `0.420`.
pub fn parse_quantity(text: &str) -> Option<Decimal> {
    let m = re_quantity().find(text)?;
    let clean = m.as_str().replace(',', ".");
    Decimal::from_str(&clean).ok()
}

/// Stricter money parse: the line must contain no letters (after diacritic
/// folding) and, once leading/trailing noise characters are stripped, must
/// fully match the money shape. Used to accept bare amount lines as paid
/// amounts without a VAT letter.
pub fn parse_money_only(line: &str) -> Option<MoneyValue> {
    let normalized = norm_spaces(line);
    let value = parse_money(&normalized)?;

    let upper = upper_ascii(&normalized);
    if re_has_letter().is_match(&upper) {
        return None;
    }

    let stripped = re_leading_noise().replace(&upper, "");
    let stripped = re_trailing_noise().replace(&stripped, "");
    let stripped = stripped.trim();

    if !re_pure_money_shape().is_match(stripped) {
        return None;
    }

    Some(value)
}

/// `true` if the trimmed line is exactly `A`, `B`, or `D`.
pub fn line_is_vat_only(line: &str) -> Option<VatCode> {
    let normalized = norm_spaces(line);
    VatCode::from_str(&normalized).ok()
}

/// Trailing VAT letter of a normalized, upper-cased line, if any.
fn trailing_vat(upper_line: &str) -> Option<VatCode> {
    let c = re_trailing_vat().captures(upper_line)?;
    VatCode::from_str(c.get(1)?.as_str()).ok()
}

/// `<money> <ABD>$` on one line. Returns `(value, vat, residual_name)` where
/// `residual_name` is the line with one money occurrence and the trailing
/// VAT letter removed (may be empty).
pub fn parse_money_vat_inline(line: &str) -> Option<(MoneyValue, VatCode, String)> {
    let normalized = norm_spaces(line);
    let value = parse_money(&normalized)?;
    let upper = upper_ascii(&normalized);
    let vat = trailing_vat(&upper)?;

    let mut name_part = re_money().replace(&normalized, "").trim().to_string();
    let trailing_letter = regex::Regex::new(r"(?i)\b[ABD]\b\s*$").unwrap();
    name_part = trailing_letter.replace(&name_part, "").trim().to_string();

    Some((value, vat, name_part))
}

/// `<money>` then `<ABD>` (or the reverse) across two consecutive lines.
/// Returns `(value, vat, consumed=2)`.
pub fn parse_money_then_vat(lines: &[String], idx: usize) -> Option<(MoneyValue, VatCode, usize)> {
    let a = lines.get(idx)?;
    let b = lines.get(idx + 1)?;
    let a = norm_spaces(a);
    let b = norm_spaces(b);

    if let (Some(value), Some(vat)) = (parse_money(&a), line_is_vat_only(&b)) {
        return Some((value, vat, 2));
    }
    if let (Some(vat), Some(value)) = (line_is_vat_only(&a), parse_money(&b)) {
        return Some((value, vat, 2));
    }
    None
}

/// `^<qty>[.,]<frac> (BUC|KG) [xX×] <unit_price>$`.
pub fn is_qty_line(line: &str) -> Option<QtyLine> {
    let normalized = norm_spaces(line);
    let c = re_qty_line().captures(&normalized)?;
    let quantity_raw = c.get(1)?.as_str().to_string();
    let unit = match c.get(2)?.as_str().to_uppercase().as_str() {
        "BUC" => Unit::Buc,
        "KG" => Unit::Kg,
        _ => return None,
    };
    let unit_price_raw = c.get(3)?.as_str().to_string();

    let quantity = parse_quantity(&quantity_raw)?;
    let unit_price = parse_money(&unit_price_raw)?;

    Some(QtyLine { quantity, quantity_raw, unit, unit_price, unit_price_raw })
}

pub fn is_totals_marker(line: &str) -> bool {
    let u = upper_ascii(&norm_spaces(line));
    u.starts_with("SUBTOTAL") || u.starts_with("TOTAL")
}

pub fn is_discount_marker(line: &str) -> bool {
    upper_ascii(&norm_spaces(line)).starts_with("DISCOUNT")
}

pub fn is_discount_prelude(line: &str) -> bool {
    let u = upper_ascii(&norm_spaces(line));
    u.starts_with("REDUCERE") || (u.contains("REDUCERE") && u.contains("LIDL") && u.contains("PLUS"))
}

const FOOTER_PREFIXES: &[&str] = &[
    "TVA", "TRANZAC", "CASA", "MG", "DATA", "TZ/POS", "ORA", "BON", "MULTUMESC", "ACHIZIT",
    "DETALII",
];
const FOOTER_EXACT: &[&str] = &["CARD", "LEI", "A", "B", "D"];

pub fn is_footer_noise(line: &str) -> bool {
    let u = upper_ascii(&norm_spaces(line));
    if u.is_empty() {
        return true;
    }
    if FOOTER_EXACT.contains(&u.as_str()) {
        return true;
    }
    FOOTER_PREFIXES.iter().any(|p| u.starts_with(p))
}

pub fn is_returnare_garantie(line: &str) -> bool {
    let u = upper_ascii(&norm_spaces(line));
    u.contains("RETURNARE") && u.contains("GARANT")
}

/// A line that parses as money but is otherwise just digits/separators —
/// i.e. leftover numeric noise, never a product name.
pub fn looks_like_money_noise(line: &str) -> bool {
    let normalized = norm_spaces(line);
    if parse_money(&normalized).is_none() {
        return false;
    }
    let u = upper_ascii(&normalized);
    u.chars().all(|c| c.is_ascii_digit() || ".,- ".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_handles_dot_and_comma_decimals() {
        assert_eq!(parse_money("12.19").unwrap().to_string(), "12.19");
        assert_eq!(parse_money("12,19").unwrap().to_string(), "12.19");
    }

    #[test]
    fn parse_money_handles_thousand_separators() {
        assert_eq!(parse_money("1.234,56").unwrap().to_string(), "1234.56");
        assert_eq!(parse_money("1 234,56").unwrap().to_string(), "1234.56");
    }

    #[test]
    fn parse_money_detects_negative_sign_anywhere_in_line() {
        assert!(parse_money("2,50-B").unwrap().is_negative());
        assert!(parse_money("-8,50 D").unwrap().is_negative());
        assert!(parse_money("7,99 B").unwrap().is_positive());
    }

    #[test]
    fn parse_money_requires_two_fractional_digits() {
        assert!(parse_money("12,1").is_none());
        assert!(parse_money("no digits here").is_none());
    }

    #[test]
    fn parse_money_only_rejects_lines_with_letters() {
        assert!(parse_money_only("7,99 B").is_none());
        assert!(parse_money_only("7,99").is_some());
    }

    #[test]
    fn line_is_vat_only_matches_exact_letters() {
        assert_eq!(line_is_vat_only("A"), Some(VatCode::A));
        assert_eq!(line_is_vat_only(" B "), Some(VatCode::B));
        assert_eq!(line_is_vat_only("D"), Some(VatCode::D));
        assert_eq!(line_is_vat_only("BB"), None);
    }

    #[test]
    fn is_qty_line_parses_all_fields() {
        let q = is_qty_line("1,000 BUC x 7,99").unwrap();
        assert_eq!(q.unit, Unit::Buc);
        assert_eq!(q.unit_price.to_string(), "7.99");
        assert_eq!(q.quantity.to_string(), "1.000");
    }

    #[test]
    fn is_qty_line_accepts_kg_and_multiplication_sign() {
        let q = is_qty_line("0,420 KG × 12,99").unwrap();
        assert_eq!(q.unit, Unit::Kg);
    }

    #[test]
    fn is_qty_line_rejects_non_matching_lines() {
        assert!(is_qty_line("Lapte 1L").is_none());
        assert!(is_qty_line("7,99 B").is_none());
    }

    #[test]
    fn parse_money_vat_inline_splits_value_vat_and_residual_name() {
        let (value, vat, name) = parse_money_vat_inline("7,99 B").unwrap();
        assert_eq!(value.to_string(), "7.99");
        assert_eq!(vat, VatCode::B);
        assert_eq!(name, "");
    }

    #[test]
    fn parse_money_vat_inline_extracts_negative_discount() {
        let (value, vat, _) = parse_money_vat_inline("2,50-B").unwrap();
        assert!(value.is_negative());
        assert_eq!(vat, VatCode::B);
    }

    #[test]
    fn parse_money_then_vat_accepts_either_order() {
        let lines = vec!["12,19".to_string(), "B".to_string()];
        let (v, vat, consumed) = parse_money_then_vat(&lines, 0).unwrap();
        assert_eq!(v.to_string(), "12.19");
        assert_eq!(vat, VatCode::B);
        assert_eq!(consumed, 2);

        let lines = vec!["B".to_string(), "12,19".to_string()];
        let (v, vat, _) = parse_money_then_vat(&lines, 0).unwrap();
        assert_eq!(v.to_string(), "12.19");
        assert_eq!(vat, VatCode::B);
    }

    #[test]
    fn footer_noise_covers_diacritic_multumesc_variants() {
        assert!(is_footer_noise("MULTUMESC"));
        assert!(is_footer_noise("MULȚUMESC"));
        assert!(is_footer_noise(""));
        assert!(is_footer_noise("LEI"));
    }

    #[test]
    fn returnare_garantie_requires_both_words() {
        assert!(is_returnare_garantie("Returnare garantie"));
        assert!(!is_returnare_garantie("Returnare produs"));
    }

    #[test]
    fn looks_like_money_noise_rejects_names() {
        assert!(!looks_like_money_noise("Lapte 1L"));
        assert!(looks_like_money_noise("12,19"));
    }
}
