//! SGR (garanție/deposit) recovery extraction (spec §4.8).
//!
//! `D`-coded amounts are deposit-system (SGR) movements, never product
//! discounts — [`crate::discount`] never attaches a `D`-coded negative, so
//! it sits unclaimed in the LEI stream. This module takes the *first*
//! `D`-negative it finds, mirroring the original's `sgr_recovered = |value|`
//! stop-at-first behavior (`lidl_receipt_ocr.py`'s SGR recovery block), and
//! falls back to a raw-line two-line split scan (`<money>` then `D`) only
//! when the LEI stream carried nothing — short receipts, or OCR dropping
//! the `LEI` anchor entirely.

use lidl_receipt_core::{norm_spaces, MoneyValue, VatCode};

use crate::lei::LeiToken;
use crate::tokenize::{line_is_vat_only, parse_money, parse_money_vat_inline};

#[derive(Debug, Clone)]
pub struct SgrEntry {
    pub value: MoneyValue,
    pub raw: String,
}

#[derive(Debug, Clone, Default)]
pub struct SgrResult {
    pub entries: Vec<SgrEntry>,
    pub total: MoneyValue,
}

/// Prefer the first `D`-tagged negative token already present in the LEI
/// stream; fall back to a raw-line two-line split scan only when the
/// stream yielded nothing.
pub fn extract_sgr(lines: &[String], lei_tokens: &[LeiToken]) -> SgrResult {
    match sgr_from_lei_stream(lei_tokens).or_else(|| sgr_from_raw_lines(lines)) {
        Some(entry) => {
            let total = entry.value;
            SgrResult { entries: vec![entry], total }
        }
        None => SgrResult::default(),
    }
}

fn sgr_from_lei_stream(lei_tokens: &[LeiToken]) -> Option<SgrEntry> {
    lei_tokens
        .iter()
        .filter(|t| t.value.is_negative())
        .find_map(|t| {
            let (_, vat, _) = parse_money_vat_inline(&t.raw)?;
            (vat == VatCode::D).then(|| SgrEntry { value: t.value.abs(), raw: t.raw.clone() })
        })
}

/// Scan all lines for the two-line split pattern `<money>` followed by a
/// bare `D` line, where the money is negative; take the first.
fn sgr_from_raw_lines(lines: &[String]) -> Option<SgrEntry> {
    for pair in lines.windows(2) {
        let money_line = norm_spaces(&pair[0]);
        let vat_line = norm_spaces(&pair[1]);

        let Some(value) = parse_money(&money_line) else { continue };
        if !value.is_negative() {
            continue;
        }
        if line_is_vat_only(&vat_line) != Some(VatCode::D) {
            continue;
        }

        return Some(SgrEntry { value: value.abs(), raw: format!("{money_line} {vat_line}") });
    }
    None
}
