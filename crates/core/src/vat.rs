use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tax-class letter printed next to an amount on a LIDL receipt.
///
/// `D` denotes deposit/return (SGR); `A` and `B` are VAT rate letters for
/// ordinary taxable lines. A `D` amount must never be treated as a product
/// discount — it belongs exclusively to SGR recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatCode {
    A,
    B,
    D,
}

impl VatCode {
    pub fn is_deposit(self) -> bool {
        matches!(self, VatCode::D)
    }
}

impl fmt::Display for VatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            VatCode::A => 'A',
            VatCode::B => 'B',
            VatCode::D => 'D',
        };
        write!(f, "{c}")
    }
}

impl FromStr for VatCode {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(VatCode::A),
            "B" => Ok(VatCode::B),
            "D" => Ok(VatCode::D),
            _ => Err(()),
        }
    }
}
