//! Merchant identity extraction (spec §4.2).

use lidl_receipt_core::{norm_spaces, upper_ascii};
use regex::Regex;
use std::sync::OnceLock;

const SCAN_WINDOW: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Merchant {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub cif: Option<String>,
}

fn re_cif() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^\d{8}$").unwrap())
}

/// Scan the first 50 lines for name/address/city/CIF. Each field fills at
/// most once, first match wins.
pub fn extract_merchant(lines: &[String]) -> Merchant {
    let mut merchant = Merchant::default();

    for (idx, line) in lines.iter().take(SCAN_WINDOW).enumerate() {
        let normalized = norm_spaces(line);
        let upper = upper_ascii(&normalized);

        if merchant.name.is_none() && upper.contains("LIDL") {
            merchant.name = Some(normalized.clone());
        }

        if merchant.cif.is_none() && re_cif().is_match(line.trim()) {
            merchant.cif = Some(line.trim().to_string());
        }

        if merchant.address.is_none()
            && (upper.starts_with("STRADA") || upper.starts_with("BULEVARDUL"))
        {
            merchant.address = Some(normalized);
            if let Some(next) = lines.get(idx + 1) {
                merchant.city = Some(norm_spaces(next));
            }
        }
    }

    merchant
}
