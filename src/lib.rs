#![cfg_attr(not(feature = "std"), no_std)]

//! xlsxbridge - Pure-Rust bidirectional XLSX/JSON converter for workflow automation platforms
//!
//! This crate converts tabular spreadsheet data to a JSON representation and
//! back, preserving column order, supporting multiple sheets, and accepting
//! declarative row-height / column-width directives through the reserved
//! `[format]` key.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxbridge::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // XLSX -> JSON: a single-sheet workbook becomes a bare array of
//!     // records; a multi-sheet workbook becomes an object keyed by sheet
//!     // name, in sheet order.
//!     let input = File::open("example.xlsx")?;
//!     let json = converter.xlsx_to_json(input)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! # JSON -> XLSX
//!
//! ```rust,no_run
//! use xlsxbridge::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_filename("Quarterly Report")
//!         .build()?;
//!
//!     let payload = r#"[
//!         {"Region": "East", "Total": "1200"},
//!         {"Region": "West", "Total": "900"}
//!     ]"#;
//!
//!     let output = converter.json_to_xlsx(payload)?;
//!     std::fs::write(&output.filename, &output.bytes)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Formatting directives
//!
//! Row heights and column widths are declared inside the payload under the
//! reserved `[format]` key. The literal can never collide with a real sheet
//! name because XLSX forbids `[` and `]` in sheet names.
//!
//! ```rust,no_run
//! use xlsxbridge::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let payload = r#"{
//!         "[format]": {
//!             "defaults": {"columnWidth": 15, "columnWidths": {"A": 25}},
//!             "sheets": {"Sales": {"rowHeights": {"1": 30}}}
//!         },
//!         "Sales": [{"Region": "East", "Total": "1200"}]
//!     }"#;
//!
//!     let output = converter.json_to_xlsx(payload)?;
//!     // Warnings (e.g. directives for unknown sheets) are surfaced as a
//!     // side channel, never as errors.
//!     for warning in &output.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod column;
mod error;
mod format;
mod formatter;
mod parser;
mod security;
mod sheet;
mod writer;

// 公開API
pub use api::{DateFormat, XLSX_MIME_TYPE};
pub use builder::{Converter, ConverterBuilder, JsonToXlsxOutput};
pub use error::XlsxJsonError;
