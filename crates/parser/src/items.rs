//! Item-centric state machine (spec §4.6) — the central component.
//!
//! Walks lines from the top, anchored on quantity lines, closing one item
//! per anchor under the four OCR-observed orderings (name→paid, paid→name,
//! VAT-split variants, and a trailing discount block). LIDL's print order
//! is not stable across OCR runs, so a token-centric left-to-right
//! assembler would fail; anchoring on the quantity line and collecting
//! forward until both name and paid amount are bound is what makes this
//! tolerant of the reordering.

use lidl_receipt_core::{norm_spaces, MoneyValue, VatCode};
use rust_decimal::Decimal;

use crate::tokenize::{
    is_discount_marker, is_discount_prelude, is_footer_noise, is_qty_line, is_returnare_garantie,
    is_totals_marker, line_is_vat_only, looks_like_money_noise, parse_money_only,
    parse_money_then_vat, parse_money_vat_inline, Unit,
};
use crate::trace::ParseTrace;

/// A closed, emitted line item. Per spec §3, an `Item` only exists once
/// both `name` and `paid_amount` are bound — incomplete anchors never
/// become an `Item`, they become a warning instead.
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub quantity: Decimal,
    pub quantity_raw: String,
    pub unit: Unit,
    pub unit_price: MoneyValue,
    pub unit_price_raw: String,
    pub paid_amount: MoneyValue,
    pub paid_amount_raw: String,
    /// VAT letter recorded alongside the paid amount. Not part of the
    /// schema-v3 JSON (§6 lists no `vat` field) — kept for the invariant
    /// that a `D`-coded amount may never be attached as a discount.
    pub vat: Option<VatCode>,
    pub discount: MoneyValue,
    pub discount_raw: Option<String>,
}

impl Item {
    pub fn needs_review(&self) -> bool {
        crate::postprocess::needs_review(self)
    }
}

pub struct ItemParseResult {
    pub items: Vec<Item>,
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct PartialItem {
    name: Option<String>,
    paid: Option<MoneyValue>,
    paid_raw: Option<String>,
    vat: Option<VatCode>,
    discount: Option<MoneyValue>,
    discount_raw: Option<String>,
}

impl PartialItem {
    fn is_closeable(&self) -> bool {
        self.name.is_some() && self.paid.is_some()
    }
}

/// Run the item state machine over the full line list.
pub fn parse_items(lines: &[String], trace: &mut ParseTrace) -> ItemParseResult {
    let mut items = Vec::new();
    let mut warnings = Vec::new();

    let mut i = 0usize;
    while i < lines.len() {
        let anchor_line = norm_spaces(&lines[i]);

        if is_totals_marker(&anchor_line) {
            break;
        }

        let Some(qty) = is_qty_line(&anchor_line) else {
            i += 1;
            continue;
        };

        let mut partial = PartialItem::default();
        let mut pending_vat: Option<VatCode> = None;

        let mut j = i + 1;
        let mut garantie_skip = false;

        while j < lines.len() {
            let candidate = norm_spaces(&lines[j]);

            if is_totals_marker(&candidate) || is_qty_line(&candidate).is_some() {
                break;
            }

            if is_footer_noise(&candidate) {
                j += 1;
                continue;
            }

            if is_discount_prelude(&candidate) || is_discount_marker(&candidate) {
                j += 1;
                continue;
            }

            if let Some(vat) = line_is_vat_only(&candidate) {
                pending_vat = Some(vat);
                trace.push(format!("[vat] pending_vat={vat} line='{candidate}'"));
                j += 1;
                continue;
            }

            if partial.name.is_none() && is_returnare_garantie(&candidate) {
                trace.push(format!("[skip] returnare_garantie after q_line='{anchor_line}'"));
                j += 1;
                while j < lines.len() {
                    let next = norm_spaces(&lines[j]);
                    if is_qty_line(&next).is_some() || is_totals_marker(&next) {
                        break;
                    }
                    j += 1;
                }
                garantie_skip = true;
                break;
            }

            if let Some((value, vat, name_part)) = parse_money_vat_inline(&candidate) {
                if value.is_positive() && partial.paid.is_none() {
                    partial.paid = Some(value);
                    partial.vat = Some(vat);
                    partial.paid_raw = Some(candidate.clone());
                    if partial.name.is_none()
                        && !name_part.is_empty()
                        && !looks_like_money_noise(&name_part)
                    {
                        partial.name = Some(name_part);
                    }
                    trace.push(format!("[paid] inline val={value} vat={vat} line='{candidate}'"));
                    j += 1;
                    continue;
                }
                if value.is_negative() && partial.paid.is_some() && partial.discount.is_none() {
                    if vat == VatCode::D {
                        trace.push(format!(
                            "[discount] skipped D-coded negative (belongs to SGR) line='{candidate}'"
                        ));
                    } else {
                        partial.discount = Some(value.abs());
                        partial.discount_raw = Some(candidate.clone());
                        trace.push(format!(
                            "[discount] inline val={} vat={vat} line='{candidate}'",
                            value.abs()
                        ));
                    }
                    j += 1;
                    continue;
                }
            }

            if let Some((value, vat, consumed)) = parse_money_then_vat(lines, j) {
                if value.is_positive() && partial.paid.is_none() {
                    partial.paid = Some(value);
                    partial.vat = Some(vat);
                    partial.paid_raw =
                        Some(format!("{} {}", norm_spaces(&lines[j]), norm_spaces(&lines[j + 1])));
                    trace.push(format!(
                        "[paid] split val={value} vat={vat} line='{}'",
                        partial.paid_raw.as_ref().unwrap()
                    ));
                    j += consumed;
                    continue;
                }
                if value.is_negative() && partial.paid.is_some() && partial.discount.is_none() {
                    let raw =
                        format!("{} {}", norm_spaces(&lines[j]), norm_spaces(&lines[j + 1]));
                    if vat != VatCode::D {
                        partial.discount = Some(value.abs());
                        partial.discount_raw = Some(raw.clone());
                        trace.push(format!("[discount] split val={} vat={vat} line='{raw}'", value.abs()));
                    }
                    j += consumed;
                    continue;
                }
            }

            if partial.paid.is_none() {
                if let Some(value) = parse_money_only(&candidate) {
                    if value.is_positive() {
                        partial.paid = Some(value);
                        partial.vat = pending_vat;
                        partial.paid_raw = Some(match pending_vat {
                            Some(vat) => format!("{candidate} {vat}"),
                            None => candidate.clone(),
                        });
                        trace.push(format!(
                            "[paid] money_only val={value} vat={:?} line='{candidate}'",
                            pending_vat
                        ));
                        pending_vat = None;
                        j += 1;
                        continue;
                    }
                }
            } else if partial.discount.is_none() {
                if let Some(value) = parse_money_only(&candidate) {
                    if value.is_negative() {
                        partial.discount = Some(value.abs());
                        partial.discount_raw = Some(candidate.clone());
                        trace.push(format!("[discount] bare val={} line='{candidate}'", value.abs()));
                        j += 1;
                        continue;
                    }
                }
            }

            if partial.name.is_none()
                && !looks_like_money_noise(&candidate)
                && line_is_vat_only(&candidate).is_none()
            {
                partial.name = Some(candidate.clone());
                trace.push(format!("[name] '{candidate}'"));
                j += 1;
                continue;
            }

            j += 1;
        }

        if garantie_skip {
            i = j;
            continue;
        }

        if !partial.is_closeable() {
            warnings.push(format!(
                "Incomplete item after qty line '{anchor_line}' (name={:?}, paid={:?})",
                partial.name, partial.paid
            ));
            trace.push(format!(
                "[warn] incomplete item q_line='{anchor_line}' name={:?} paid={:?} pending_vat={:?}",
                partial.name, partial.paid, pending_vat
            ));
            i += 1;
            continue;
        }

        let item = Item {
            name: partial.name.unwrap(),
            quantity: qty.quantity,
            quantity_raw: qty.quantity_raw,
            unit: qty.unit,
            unit_price: qty.unit_price,
            unit_price_raw: qty.unit_price_raw,
            paid_amount: partial.paid.unwrap(),
            paid_amount_raw: partial.paid_raw.unwrap(),
            vat: partial.vat,
            discount: partial.discount.unwrap_or_else(MoneyValue::zero),
            discount_raw: partial.discount_raw,
        };
        trace.push(format!(
            "[item] q_line='{anchor_line}' name='{}' paid={} vat={:?} discount={}",
            item.name, item.paid_amount, item.vat, item.discount
        ));
        items.push(item);

        i = j;
    }

    ItemParseResult { items, warnings }
}
