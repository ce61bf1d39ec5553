//! Per-invocation debug trace buffer (spec §5).
//!
//! The original implementation kept a module-global `_PARSE_DEBUG_LINES`
//! list, gated by a global `_PARSE_DEBUG` flag. A parser that is safe to
//! call concurrently from multiple threads cannot share that kind of
//! global mutable state, so this is an owned buffer threaded through a
//! single invocation instead. Each push is mirrored to a `tracing::debug!`
//! event so the trace is also visible through normal log collection
//! without requiring the caller to inspect the returned buffer.

#[derive(Debug, Default)]
pub struct ParseTrace {
    lines: Vec<String>,
}

impl ParseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(target: "lidl_receipt_parser::trace", "{msg}");
        self.lines.push(msg);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
