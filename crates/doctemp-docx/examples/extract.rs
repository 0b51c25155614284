//! Example: Show the template text of a DOCX file
//!
//! Usage: cargo run --example extract -- path/to/template.docx

use std::env;
use std::path::Path;

use doctemp_docx::{visible_text, Docx};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path/to/template.docx>", args[0]);
        eprintln!();
        eprintln!("Opens a DOCX file and prints:");
        eprintln!("  - Archive entries");
        eprintln!("  - Visible text");
        eprintln!("  - Cleaned template markup");
        std::process::exit(1);
    }

    let docx_path = Path::new(&args[1]);

    if !docx_path.exists() {
        eprintln!("Error: File not found: {}", docx_path.display());
        std::process::exit(1);
    }

    println!("=== Extracting from: {} ===\n", docx_path.display());

    let mut docx = match Docx::open(docx_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error opening DOCX: {}", e);
            std::process::exit(1);
        }
    };

    println!("--- Archive Contents ---");
    for name in docx.entry_names() {
        println!("  {}", name);
    }
    println!();

    println!("--- Visible Text ---");
    match visible_text(docx.content()) {
        Ok(text) => println!("{}", text.trim()),
        Err(e) => eprintln!("Error reading text: {}", e),
    }
    println!();

    println!("--- Template Markup ---");
    println!("{}", docx.content());

    if let Err(e) = docx.close() {
        eprintln!("Error closing DOCX: {}", e);
    }
    println!("--- Extraction Complete ---");
}
