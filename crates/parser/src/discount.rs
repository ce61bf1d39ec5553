//! Second-pass discount reconciliation against the LEI amount stream
//! (spec §4.7).
//!
//! The in-line Pattern D attachment done while walking items in
//! [`crate::items`] is a best-effort heuristic: it only sees the lines
//! physically adjacent to an item block, and OCR drops or reorders those
//! often enough that it misses real discounts and occasionally attaches a
//! stray negative that belongs to the next item. The right-column LEI
//! stream is laid out in print order and is not subject to that
//! adjacency guessing, so once it's available it is authoritative: this
//! pass walks it positionally against the already-closed items and
//! overwrites whatever Pattern D guessed, including resetting items it
//! guessed wrong back to zero.

use lidl_receipt_core::{MoneyValue, VatCode};

use crate::items::Item;
use crate::lei::LeiToken;
use crate::tokenize::parse_money_vat_inline;
use crate::trace::ParseTrace;

/// Walk `lei_tokens` in order, pairing each item's paid amount with the
/// token stream and treating a negative token immediately following a
/// positive one as that item's discount. Resets every item's discount to
/// the reconciled value, including back to zero when the stream shows
/// none. A `D`-coded negative is never attached — it belongs to SGR
/// recovery, not a product discount — and is left in the stream rather
/// than consumed, mirroring `attach_discounts_from_lei`'s `if vat != "D"`.
pub fn reconcile_discounts(items: &mut [Item], lei_tokens: &[LeiToken], trace: &mut ParseTrace) {
    if lei_tokens.is_empty() {
        return;
    }

    let mut token_idx = 0usize;

    for item in items.iter_mut() {
        // Advance to the token matching this item's paid amount.
        while token_idx < lei_tokens.len() {
            let tok = &lei_tokens[token_idx];
            if tok.value.is_positive() && tok.value == item.paid_amount {
                token_idx += 1;
                break;
            }
            token_idx += 1;
        }

        let mut discount = MoneyValue::zero();
        let mut discount_raw = None;

        if token_idx < lei_tokens.len() {
            let next = &lei_tokens[token_idx];
            if next.value.is_negative() {
                let vat = parse_money_vat_inline(&next.raw).map(|(_, vat, _)| vat);
                if vat == Some(VatCode::D) {
                    trace.push(format!(
                        "[reconcile] item='{}' skipped D-coded negative (belongs to SGR) raw='{}'",
                        item.name, next.raw
                    ));
                } else {
                    discount = next.value.abs();
                    discount_raw = Some(next.raw.clone());
                    token_idx += 1;
                }
            }
        }

        if discount != item.discount {
            trace.push(format!(
                "[reconcile] item='{}' pattern_d_discount={} lei_discount={}",
                item.name, item.discount, discount
            ));
        }

        item.discount = discount;
        item.discount_raw = discount_raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::{parse_money, Unit};
    use lidl_receipt_core::VatCode;

    fn item(name: &str, paid: &str, guessed_discount: &str) -> Item {
        Item {
            name: name.to_string(),
            quantity: rust_decimal::Decimal::ONE,
            quantity_raw: "1,000".to_string(),
            unit: Unit::Buc,
            unit_price: parse_money(paid).unwrap(),
            unit_price_raw: paid.to_string(),
            paid_amount: parse_money(paid).unwrap(),
            paid_amount_raw: paid.to_string(),
            vat: Some(VatCode::B),
            discount: parse_money(guessed_discount).unwrap(),
            discount_raw: None,
        }
    }

    fn token(v: &str) -> LeiToken {
        LeiToken { value: parse_money(v).unwrap(), raw: v.to_string() }
    }

    #[test]
    fn attaches_discount_found_right_after_matching_positive_token() {
        let mut items = vec![item("Sirop", "10,00", "0,00")];
        let tokens = vec![token("10,00"), token("2,50-")];
        let mut trace = ParseTrace::new();
        reconcile_discounts(&mut items, &tokens, &mut trace);
        assert_eq!(items[0].discount.to_string(), "2.50");
    }

    #[test]
    fn resets_a_wrongly_guessed_pattern_d_discount_to_zero() {
        let mut items = vec![item("Paine", "5,00", "1,00")];
        let tokens = vec![token("5,00")];
        let mut trace = ParseTrace::new();
        reconcile_discounts(&mut items, &tokens, &mut trace);
        assert!(items[0].discount.is_zero());
        assert!(items[0].discount_raw.is_none());
    }

    #[test]
    fn does_nothing_when_lei_stream_is_empty() {
        let mut items = vec![item("Paine", "5,00", "1,00")];
        let mut trace = ParseTrace::new();
        reconcile_discounts(&mut items, &[], &mut trace);
        assert_eq!(items[0].discount.to_string(), "1.00");
    }

    #[test]
    fn d_coded_negative_is_never_attached_as_a_discount() {
        let mut items = vec![item("Apa minerala", "7,99", "0,00")];
        let tokens = vec![token("7,99"), token("-8,50 D")];
        let mut trace = ParseTrace::new();
        reconcile_discounts(&mut items, &tokens, &mut trace);
        assert!(items[0].discount.is_zero());
        assert!(items[0].discount_raw.is_none());
    }

    #[test]
    fn handles_multiple_items_each_with_their_own_discount() {
        let mut items = vec![item("Pere", "3,00", "0,00"), item("Mar", "2,00", "0,00")];
        let tokens =
            vec![token("3,00"), token("0,50-"), token("2,00")];
        let mut trace = ParseTrace::new();
        reconcile_discounts(&mut items, &tokens, &mut trace);
        assert_eq!(items[0].discount.to_string(), "0.50");
        assert!(items[1].discount.is_zero());
    }
}
