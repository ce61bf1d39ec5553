//! LIDL (Romania) OCR receipt parser.
//!
//! Turns an ordered sequence of OCR'd text lines into a schema-v3
//! [`record::ReceiptRecord`]. The module split mirrors the extractor
//! chain: tokenizer predicates feed the merchant/timestamp/LEI-stream
//! extractors, which feed the item state machine, which is reconciled
//! and post-processed before assembly.

pub mod config;
pub mod discount;
pub mod error;
pub mod items;
pub mod lei;
pub mod merchant;
pub mod pipeline;
pub mod postprocess;
pub mod record;
pub mod sgr;
pub mod timestamp;
pub mod tokenize;
pub mod totals;
pub mod trace;

pub use config::ParserConfig;
pub use error::TextSourceError;
pub use pipeline::{MockTextSource, ReceiptPipeline, TextSource};
pub use record::ReceiptRecord;
