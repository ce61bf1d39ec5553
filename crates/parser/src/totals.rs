//! Totals extraction (spec §4.5).

use lidl_receipt_core::{norm_spaces, upper_ascii, MoneyValue};

use crate::lei::LeiToken;
use crate::tokenize::parse_money;

const TOTAL_TVA_SCAN_WINDOW: usize = 40;

#[derive(Debug, Clone, Default)]
pub struct Totals {
    pub total: Option<MoneyValue>,
    pub subtotal: Option<MoneyValue>,
    pub total_tva: Option<MoneyValue>,
}

/// `total` is the last positive LEI token, `subtotal` the second-to-last.
/// `total_tva` is the first parsable money within 40 lines after a
/// `TOTAL TVA` marker.
///
/// Known limitation (spec §9, preserved intentionally): when the LEI stream
/// contains auxiliary rows, `subtotal` can diverge from a printed SUBTOTAL
/// line. We do not special-case this — the receipt's own ordering wins.
pub fn extract_totals(lines: &[String], lei_tokens: &[LeiToken]) -> Totals {
    let positives: Vec<MoneyValue> = lei_tokens
        .iter()
        .map(|t| t.value)
        .filter(|v| v.is_positive())
        .collect();

    let total = positives.last().copied();
    let subtotal = if positives.len() >= 2 {
        Some(positives[positives.len() - 2])
    } else {
        None
    };

    let total_tva = find_total_tva(lines);

    Totals { total, subtotal, total_tva }
}

fn find_total_tva(lines: &[String]) -> Option<MoneyValue> {
    let marker_idx = lines
        .iter()
        .position(|l| upper_ascii(&norm_spaces(l)).starts_with("TOTAL TVA"))?;

    lines
        .iter()
        .skip(marker_idx + 1)
        .take(TOTAL_TVA_SCAN_WINDOW)
        .find_map(|l| parse_money(l))
}
