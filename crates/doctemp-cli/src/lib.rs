//! doctemp CLI - Command-line interface library
//!
//! This library provides the CLI functionality for doctemp:
//! - Render: fill a DOCX template with data from a JSON file
//! - Inspect: list a template's entries and show its template text
//!
//! # Binary Usage
//!
//! ```bash
//! # Fill a template
//! doctemp render letter.docx --data customer.json --output letter-ada.docx
//!
//! # Fail on missing fields instead of blanking them
//! doctemp render letter.docx --data customer.json --strict
//!
//! # Show what the template engine sees
//! doctemp inspect letter.docx
//! ```

pub mod app;

// Re-export main entry point and commands
pub use app::{default_output_path, inspect_command, inspect_report, render_command, run_cli};
