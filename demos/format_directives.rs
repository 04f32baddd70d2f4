//! Format Directives Example
//!
//! This example demonstrates the JSON -> XLSX direction with the reserved
//! `[format]` key: default column widths, a per-column override and a
//! per-sheet row height.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example format_directives
//! ```

use xlsxbridge::ConverterBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let payload = r#"{
        "[format]": {
            "defaults": {
                "columnWidth": 15,
                "columnWidths": {"A": 30}
            },
            "sheets": {
                "Sales": {"rowHeights": {"1": 28}},
                "Ghost": {"rowHeight": 10}
            }
        },
        "Sales": [
            {"Region": "East", "Product": "Widget", "Total": "1200"},
            {"Region": "West", "Product": "Gadget", "Total": "900"}
        ],
        "Inventory": [
            {"Product": "Widget", "Stock": "40"},
            {"Product": "Gadget", "Stock": "12"}
        ]
    }"#;

    let converter = ConverterBuilder::new()
        .with_filename("Formatted Report")
        .build()?;

    let output = converter.json_to_xlsx(payload)?;

    // The "Ghost" sheet reference does not match any data sheet, so it is
    // reported as a warning and ignored
    for warning in &output.warnings {
        eprintln!("warning: {}", warning);
    }

    std::fs::write(&output.filename, &output.bytes)?;
    println!("{}", output.summary());

    Ok(())
}
