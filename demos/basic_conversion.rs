//! Basic Conversion Example
//!
//! This example demonstrates the most basic usage of xlsxbridge:
//! converting an Excel file to a JSON string using default settings.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example basic_conversion -- input.xlsx
//! ```

use std::fs::File;
use xlsxbridge::ConverterBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get input file path from command line arguments
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample.xlsx".to_string());

    println!("Converting {} to JSON...", input_path);

    // Create a converter with default settings
    let converter = ConverterBuilder::new().build()?;

    // Open input file
    let input = File::open(&input_path).map_err(|e| {
        eprintln!("Error: Could not open input file '{}'", input_path);
        eprintln!("  {}", e);
        eprintln!("\nHint: Provide a path to an existing .xlsx file.");
        e
    })?;

    // Convert Excel to a JSON string; a single-sheet workbook becomes a
    // bare array, a multi-sheet workbook an object keyed by sheet name
    let json = converter.xlsx_to_json(input)?;
    println!("{}", json);

    Ok(())
}
