pub mod money;
pub mod text;
pub mod vat;

pub use money::MoneyValue;
pub use text::{norm_spaces, upper_ascii};
pub use vat::VatCode;
