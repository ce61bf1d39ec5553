//! Item post-processing (spec §4.9): review flagging and adjacent-duplicate
//! collapse.
//!
//! OCR occasionally re-reads a single printed item as two consecutive
//! anchors — same name and paid amount, no quantity line or amount
//! between them to justify a second row. We only ever collapse *adjacent*
//! repeats; two genuinely repeated purchases elsewhere on the receipt are
//! left alone, since nothing distinguishes a real repeat from an OCR
//! echo except position.

use lidl_receipt_core::VatCode;

use crate::items::Item;

/// An item needs review when its VAT letter is missing, or its unit price
/// times quantity doesn't land within a cent of its paid amount net of
/// discount — both signal a torn or misread row rather than a bad price.
pub fn needs_review(item: &Item) -> bool {
    if item.vat.is_none() {
        return true;
    }

    if item.vat == Some(VatCode::D) {
        return false;
    }

    let expected = item.unit_price.as_decimal() * item.quantity;
    let actual = (item.paid_amount.as_decimal() + item.discount.as_decimal()).round_dp(2);
    let expected = expected.round_dp(2);

    (expected - actual).abs() > rust_decimal::Decimal::new(1, 2)
}

/// Drop an item when it is an exact repeat (name, paid amount, discount)
/// of the immediately preceding item.
pub fn dedupe_adjacent(items: Vec<Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    for item in items {
        let is_repeat = out
            .last()
            .map(|prev| {
                prev.name == item.name
                    && prev.paid_amount == item.paid_amount
                    && prev.discount == item.discount
            })
            .unwrap_or(false);
        if !is_repeat {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::{parse_money, Unit};
    use lidl_receipt_core::MoneyValue;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn item(name: &str, qty: &str, unit_price: &str, paid: &str, vat: Option<VatCode>) -> Item {
        Item {
            name: name.to_string(),
            quantity: Decimal::from_str(qty).unwrap(),
            quantity_raw: qty.to_string(),
            unit: Unit::Buc,
            unit_price: parse_money(unit_price).unwrap(),
            unit_price_raw: unit_price.to_string(),
            paid_amount: parse_money(paid).unwrap(),
            paid_amount_raw: paid.to_string(),
            vat,
            discount: MoneyValue::zero(),
            discount_raw: None,
        }
    }

    #[test]
    fn missing_vat_always_needs_review() {
        let it = item("Lapte", "1", "7.99", "7.99", None);
        assert!(needs_review(&it));
    }

    #[test]
    fn matching_price_and_paid_does_not_need_review() {
        let it = item("Lapte", "1", "7.99", "7.99", Some(VatCode::B));
        assert!(!needs_review(&it));
    }

    #[test]
    fn mismatched_price_needs_review() {
        let it = item("Lapte", "2", "7.99", "7.99", Some(VatCode::B));
        assert!(needs_review(&it));
    }

    #[test]
    fn deposit_items_are_exempt_from_price_check() {
        let it = item("SGR", "1", "0.50", "5.00", Some(VatCode::D));
        assert!(!needs_review(&it));
    }

    #[test]
    fn dedupe_drops_adjacent_exact_repeat() {
        let items = vec![
            item("Paine", "1", "3.50", "3.50", Some(VatCode::B)),
            item("Paine", "1", "3.50", "3.50", Some(VatCode::B)),
        ];
        let out = dedupe_adjacent(items);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn dedupe_keeps_non_adjacent_repeats() {
        let items = vec![
            item("Paine", "1", "3.50", "3.50", Some(VatCode::B)),
            item("Mar", "1", "2.00", "2.00", Some(VatCode::B)),
            item("Paine", "1", "3.50", "3.50", Some(VatCode::B)),
        ];
        let out = dedupe_adjacent(items);
        assert_eq!(out.len(), 3);
    }
}
