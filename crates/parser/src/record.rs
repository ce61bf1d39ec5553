//! Schema-v3 record assembly (spec §4.10, §6).
//!
//! These are the wire types. They deliberately differ from
//! [`crate::items::Item`] — the internal model carries a `vat` field used
//! to keep discount attachment honest, but the published schema has no
//! `vat` key at all, so the conversion from `Item` to [`ReceiptItem`] is
//! where that field is dropped.

use lidl_receipt_core::MoneyValue;
use serde::{Deserialize, Serialize};

use crate::items::Item;
use crate::merchant::Merchant;
use crate::tokenize::Unit;

pub const SCHEMA_VERSION: u32 = 3;
pub const OCR_ENGINE: &str = "apple_vision";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warn,
    Fail,
}

/// Two serialized shapes for one logical field: a normal record's `error` is
/// a plain string (or null), while a failure-payload's `error` is a
/// `{code, message}` object describing the collaborator exception that
/// produced it. `#[serde(untagged)]` picks whichever shape matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessingError {
    Exception { code: String, message: String },
    Message(String),
}

pub const NO_TOTAL_MESSAGE: &str = "Could not extract TOTAL (missing LEI stream or parse failure)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Processing {
    pub status: Status,
    pub warnings: Vec<String>,
    pub error: Option<ProcessingError>,
    pub ocr_engine: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub file_name: String,
    pub store_folder: String,
    pub rel_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: rust_decimal::Decimal,
    pub quantity_raw: String,
    pub unit: Unit,
    pub unit_price: MoneyValue,
    pub unit_price_raw: String,
    pub paid_amount: MoneyValue,
    pub paid_amount_raw: String,
    pub discount: MoneyValue,
    pub discount_raw: Option<String>,
    pub needs_review: bool,
}

impl From<&Item> for ReceiptItem {
    fn from(item: &Item) -> Self {
        ReceiptItem {
            name: item.name.clone(),
            quantity: item.quantity,
            quantity_raw: item.quantity_raw.clone(),
            unit: item.unit,
            unit_price: item.unit_price,
            unit_price_raw: item.unit_price_raw.clone(),
            paid_amount: item.paid_amount,
            paid_amount_raw: item.paid_amount_raw.clone(),
            discount: item.discount,
            discount_raw: item.discount_raw.clone(),
            needs_review: item.needs_review(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub schema_version: u32,
    pub store: String,
    pub timestamp: Option<String>,
    pub currency: String,
    pub total: Option<MoneyValue>,
    pub discount_total: MoneyValue,
    pub sgr_bottle_charge: MoneyValue,
    pub sgr_recovered_amount: MoneyValue,
    pub merchant: Merchant,
    pub items: Vec<ReceiptItem>,
    pub processing: Processing,
    pub source: Source,
    pub raw_text: String,
}

/// Derive status per spec §4.10: fail beats warn beats ok. `total.is_none()`
/// always fails regardless of warning content; otherwise any warning yields
/// `warn`.
pub fn derive_status(total: Option<MoneyValue>, warnings: &[String]) -> Status {
    if total.is_none() {
        Status::Fail
    } else if !warnings.is_empty() {
        Status::Warn
    } else {
        Status::Ok
    }
}

#[allow(clippy::too_many_arguments)]
pub fn assemble(
    store: String,
    timestamp: Option<String>,
    total: Option<MoneyValue>,
    merchant: Merchant,
    items: &[Item],
    mut warnings: Vec<String>,
    sgr_recovered_amount: MoneyValue,
    file_name: String,
    store_folder: String,
    rel_path: String,
    raw_text: String,
) -> ReceiptRecord {
    let discount_total = items
        .iter()
        .fold(MoneyValue::zero(), |acc, it| (acc + it.discount).unwrap_or(acc));

    if total.is_none() {
        warnings.push(NO_TOTAL_MESSAGE.to_string());
    }

    let status = derive_status(total, &warnings);
    let error =
        if total.is_none() { Some(ProcessingError::Message(NO_TOTAL_MESSAGE.to_string())) } else { None };

    ReceiptRecord {
        schema_version: SCHEMA_VERSION,
        store,
        timestamp,
        currency: "RON".to_string(),
        total,
        discount_total,
        sgr_bottle_charge: MoneyValue::zero(),
        sgr_recovered_amount,
        merchant,
        items: items.iter().map(ReceiptItem::from).collect(),
        processing: Processing { status, warnings, error, ocr_engine: OCR_ENGINE.to_string() },
        source: Source { file_name, store_folder, rel_path },
        raw_text,
    }
}

/// Build the failure-payload shape directly, for when an OCR collaborator
/// never produced text at all (spec §6's failure-payload schema).
pub fn failure_payload(
    store: String,
    file_name: String,
    store_folder: String,
    rel_path: String,
    message: String,
) -> ReceiptRecord {
    ReceiptRecord {
        schema_version: SCHEMA_VERSION,
        store,
        timestamp: None,
        currency: "RON".to_string(),
        total: Some(MoneyValue::zero()),
        discount_total: MoneyValue::zero(),
        sgr_bottle_charge: MoneyValue::zero(),
        sgr_recovered_amount: MoneyValue::zero(),
        merchant: Merchant::default(),
        items: Vec::new(),
        processing: Processing {
            status: Status::Fail,
            warnings: Vec::new(),
            error: Some(ProcessingError::Exception { code: "PARSER_EXCEPTION".to_string(), message }),
            ocr_engine: OCR_ENGINE.to_string(),
        },
        source: Source { file_name, store_folder, rel_path },
        raw_text: String::new(),
    }
}
