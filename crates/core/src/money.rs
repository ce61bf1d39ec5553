use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A signed amount rounded to two fractional digits.
///
/// Sign is caller-determined (see [`MoneyValue::with_sign`]) rather than
/// inferred from the decimal value itself — LIDL receipts print a trailing
/// `-` after the digits, which `Decimal::from_str` never sees once the
/// surrounding tokenizer has stripped whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoneyValue(Decimal);

impl MoneyValue {
    pub fn zero() -> Self {
        MoneyValue(Decimal::ZERO)
    }

    /// Build from an unsigned decimal magnitude, rounding to 2dp.
    pub fn from_decimal(decimal: Decimal) -> Self {
        MoneyValue(decimal.round_dp(2))
    }

    /// Apply a sign decided by the tokenizer (raw text contained `-`).
    pub fn with_sign(self, negative: bool) -> Self {
        let magnitude = self.0.abs();
        MoneyValue(if negative { -magnitude } else { magnitude })
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        MoneyValue(self.0.abs())
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for MoneyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for MoneyValue {
    type Output = Option<Self>;
    fn add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(MoneyValue)
    }
}

impl Sub for MoneyValue {
    type Output = Option<Self>;
    fn sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(MoneyValue)
    }
}

impl Neg for MoneyValue {
    type Output = Self;
    fn neg(self) -> Self {
        MoneyValue(-self.0)
    }
}
