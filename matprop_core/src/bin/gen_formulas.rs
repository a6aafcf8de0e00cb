//! Generate FORMULAS.md from the formula registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-formulas
//! ```
//!
//! The generated file is written to `matprop_core/src/formulas/FORMULAS.md`
//! relative to the workspace root. Pass a path to write elsewhere.

use std::fs;
use std::path::PathBuf;

use matprop_core::formulas::generate_formulas_markdown;

const DEFAULT_OUTPUT: &str = "matprop_core/src/formulas/FORMULAS.md";

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    println!("Generating FORMULAS.md...");
    let markdown = generate_formulas_markdown();

    match fs::write(&output_path, &markdown) {
        Ok(()) => {
            println!("Successfully wrote {} bytes to {}", markdown.len(), output_path.display());
        }
        Err(e) => {
            eprintln!("Error writing {}: {}", output_path.display(), e);
            std::process::exit(1);
        }
    }
}
