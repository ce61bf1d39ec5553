//! Ambient error type for the OCR collaborator boundary (spec §7).
//!
//! Only the `TextSource`-backed pipeline entry point can produce this —
//! the pure line parser is infallible by construction (`NoTotal` and
//! `IncompleteItem` are recorded as data, not raised).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("failed to read source image at {path}: {message}")]
    Read { path: String, message: String },

    #[error("OCR collaborator produced no text for {path}")]
    Empty { path: String },
}
