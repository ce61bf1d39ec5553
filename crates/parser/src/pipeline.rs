//! Pipeline entry point (spec §4.11, §6).
//!
//! Grounded on `aequi-ocr::pipeline::ReceiptPipeline` + `recognizer.rs`'s
//! `OcrBackend` trait: the actual OCR engine is out of scope, represented
//! here only by the `TextSource` trait boundary and a `MockTextSource`
//! test double. `parse_lines` is the pure entry point spec.md §6 calls
//! the "Parser entry point"; `parse_with_source` is the thin wrapper that
//! also has to handle a collaborator that can fail to produce text at all.

use lidl_receipt_core::norm_spaces;

use crate::discount::reconcile_discounts;
use crate::error::TextSourceError;
use crate::items::parse_items;
use crate::lei::extract_lei_stream;
use crate::merchant::extract_merchant;
use crate::postprocess::dedupe_adjacent;
use crate::record::{assemble, failure_payload, ReceiptRecord};
use crate::sgr::extract_sgr;
use crate::timestamp::extract_timestamp;
use crate::totals::extract_totals;
use crate::trace::ParseTrace;

/// A collaborator capable of producing OCR'd text lines for a given
/// source path. No concrete image decoder ships in this crate — this is
/// a trait boundary only, mirroring `aequi-ocr::recognizer::OcrBackend`.
pub trait TextSource {
    fn read_lines(&self, path: &str) -> Result<Vec<String>, TextSourceError>;
}

/// Test double returning a fixed line set regardless of path, or a forced
/// error — mirrors `aequi-ocr::recognizer::MockRecognizer`.
pub struct MockTextSource {
    pub lines: Result<Vec<String>, TextSourceError>,
}

impl TextSource for MockTextSource {
    fn read_lines(&self, _path: &str) -> Result<Vec<String>, TextSourceError> {
        match &self.lines {
            Ok(lines) => Ok(lines.clone()),
            Err(e) => Err(clone_err(e)),
        }
    }
}

fn clone_err(e: &TextSourceError) -> TextSourceError {
    match e {
        TextSourceError::Read { path, message } => {
            TextSourceError::Read { path: path.clone(), message: message.clone() }
        }
        TextSourceError::Empty { path } => TextSourceError::Empty { path: path.clone() },
    }
}

pub struct ReceiptPipeline;

impl ReceiptPipeline {
    /// Run the full extractor chain over already-OCR'd, ordered lines.
    /// Infallible: failures become `processing.status = "fail"` data, per
    /// spec §7.
    pub fn parse_lines(
        lines: Vec<String>,
        store: &str,
        rel_base: &str,
        file_name: &str,
    ) -> ReceiptRecord {
        let mut trace = ParseTrace::new();

        let normalized: Vec<String> = lines.iter().map(|l| norm_spaces(l)).collect();
        let raw_text = normalized.join("\n");

        let merchant = extract_merchant(&normalized);
        let timestamp = extract_timestamp(&normalized);
        let lei_tokens = extract_lei_stream(&normalized);
        let totals = extract_totals(&normalized, &lei_tokens);

        let item_result = parse_items(&normalized, &mut trace);
        let mut items = item_result.items;
        reconcile_discounts(&mut items, &lei_tokens, &mut trace);
        let items = dedupe_adjacent(items);

        let sgr = extract_sgr(&normalized, &lei_tokens);

        let rel_path = if rel_base.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", rel_base.trim_end_matches('/'), file_name)
        };

        assemble(
            store.to_string(),
            timestamp,
            totals.total,
            merchant,
            &items,
            item_result.warnings,
            sgr.total,
            file_name.to_string(),
            store.to_string(),
            rel_path,
            raw_text,
        )
    }

    /// Delegate to a `TextSource` collaborator, converting a read failure
    /// into the failure-payload schema instead of propagating, mirroring
    /// `ingest.py::_build_failure_payload`. The core parser is never
    /// re-entered once the collaborator has failed.
    pub fn parse_with_source<T: TextSource>(
        path: &str,
        store: &str,
        rel_base: &str,
        source: &T,
    ) -> ReceiptRecord {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();

        match source.read_lines(path) {
            Ok(lines) => Self::parse_lines(lines, store, rel_base, &file_name),
            Err(err) => failure_payload(
                store.to_string(),
                file_name.clone(),
                store.to_string(),
                if rel_base.is_empty() {
                    file_name
                } else {
                    format!("{}/{}", rel_base.trim_end_matches('/'), file_name)
                },
                err.to_string(),
            ),
        }
    }
}
