//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use doctemp_core::{DocTemplate, TemplateConfig, TracingObserver, UndefinedMode};
use doctemp_docx::{visible_text, Docx};

#[derive(Parser)]
#[command(name = "doctemp")]
#[command(author, version, about = "Fill DOCX templates with data", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a DOCX template against a JSON data file
    Render {
        /// Template file (.docx or .templ)
        template: PathBuf,

        /// JSON file with the template data
        #[arg(short, long)]
        data: PathBuf,

        /// Output DOCX file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (doctemp.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail on variables missing from the data instead of blanking them
        #[arg(long)]
        strict: bool,
    },

    /// List the entries of a template and print its template text
    Inspect {
        /// Template file
        template: PathBuf,

        /// Print only the visible text instead of the cleaned markup
        #[arg(long)]
        text: bool,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            template,
            data,
            output,
            config,
            strict,
        } => {
            render_command(&template, &data, output.as_deref(), config.as_deref(), strict)?;
        }
        Commands::Inspect { template, text } => {
            inspect_command(&template, text)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the level
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Output path used when none is given: `letter.docx` -> `letter.out.docx`
pub fn default_output_path(template: &Path) -> PathBuf {
    template.with_extension("out.docx")
}

/// Execute the render command
pub fn render_command(
    template: &Path,
    data: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    strict: bool,
) -> Result<PathBuf> {
    println!("doctemp v{}", doctemp_core::VERSION);
    println!("Rendering: {}", template.display());

    let mut settings = match config {
        Some(path) => TemplateConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => TemplateConfig::default(),
    };
    if strict {
        settings.undefined = UndefinedMode::Strict;
    }
    debug!("Template settings: {:?}", settings);

    let data_json = fs::read_to_string(data)
        .with_context(|| format!("Failed to read data file: {}", data.display()))?;
    let data_value: serde_json::Value = serde_json::from_str(&data_json)
        .with_context(|| format!("Invalid JSON in data file: {}", data.display()))?;

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(template),
    };

    let mut doc = DocTemplate::open_with(template, settings, Arc::new(TracingObserver))
        .with_context(|| format!("Failed to open template: {}", template.display()))?;

    let result = doc
        .parse()
        .context("Failed to parse template")
        .and_then(|()| {
            doc.execute(&output_path, &data_value)
                .with_context(|| format!("Failed to render to: {}", output_path.display()))
        });
    doc.close().context("Failed to close template")?;
    result?;

    println!("  Output: {}", output_path.display());
    Ok(output_path)
}

/// Build the inspect report for a template
pub fn inspect_report(template: &Path, text_only: bool) -> Result<String> {
    let mut docx = Docx::open_with(template, Arc::new(TracingObserver))
        .with_context(|| format!("Failed to open template: {}", template.display()))?;

    let mut report = String::new();
    report.push_str(&format!("Entries ({}):\n", docx.entry_names().len()));
    for name in docx.entry_names() {
        report.push_str(&format!("  {}\n", name));
    }
    report.push('\n');

    if text_only {
        let text = visible_text(docx.content()).context("Failed to read visible text")?;
        report.push_str(text.trim());
    } else {
        report.push_str(docx.content());
    }
    report.push('\n');

    docx.close().context("Failed to close template")?;
    Ok(report)
}

/// Execute the inspect command
pub fn inspect_command(template: &Path, text_only: bool) -> Result<()> {
    let report = inspect_report(template, text_only)?;
    print!("{}", report);
    Ok(())
}
