//! Thin demonstration CLI: reads a pre-OCR'd text file (one line per row,
//! already top-to-bottom/left-to-right ordered) and prints the schema-v3
//! JSON record to stdout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lidl_receipt_parser::error::TextSourceError;
use lidl_receipt_parser::{ReceiptPipeline, TextSource};

#[derive(Parser)]
#[command(name = "lidl-receipt-cli")]
#[command(about = "Parse a pre-OCR'd LIDL receipt text file into schema-v3 JSON")]
struct Args {
    /// Path to a text file, one OCR line per row.
    path: PathBuf,

    /// Store label recorded on the output record.
    #[arg(long, default_value = "lidl")]
    store: String,

    /// Base path prepended to the file name to build source.rel_path.
    #[arg(long, default_value = "")]
    rel_base: String,
}

struct FileTextSource;

impl TextSource for FileTextSource {
    fn read_lines(&self, path: &str) -> Result<Vec<String>, TextSourceError> {
        let contents = fs::read_to_string(path).map_err(|e| TextSourceError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let lines: Vec<String> = contents.lines().map(|l| l.to_string()).collect();
        if lines.is_empty() {
            return Err(TextSourceError::Empty { path: path.to_string() });
        }
        Ok(lines)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let path = args.path.to_str().context("path is not valid UTF-8")?;

    let record =
        ReceiptPipeline::parse_with_source(path, &args.store, &args.rel_base, &FileTextSource);

    let json = serde_json::to_string_pretty(&record).context("failed to serialize record")?;
    println!("{json}");

    Ok(())
}
