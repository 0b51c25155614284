//! Template configuration
//!
//! Settings are usually left at their defaults. They can be loaded from a
//! `doctemp.toml` file:
//!
//! ```toml
//! [template]
//! missing_marker = "<no value>"
//! undefined = "chainable"
//! escape_values = true
//! trim_blocks = false
//! extensions = ["docx", "templ"]
//! ```

use std::fs;
use std::path::Path;

use minijinja::UndefinedBehavior;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};

/// How the engine treats a variable the data does not define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedMode {
    /// Missing values print as nothing; attribute access on them fails
    Lenient,
    /// Missing values print as nothing, even through attribute chains
    #[default]
    Chainable,
    /// Any use of a missing value is a render error
    Strict,
}

impl From<UndefinedMode> for UndefinedBehavior {
    fn from(mode: UndefinedMode) -> Self {
        match mode {
            UndefinedMode::Lenient => UndefinedBehavior::Lenient,
            UndefinedMode::Chainable => UndefinedBehavior::Chainable,
            UndefinedMode::Strict => UndefinedBehavior::Strict,
        }
    }
}

/// Rendering and format-dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Literal removed from rendered output (empty disables the step)
    pub missing_marker: String,
    /// Treatment of undefined variables
    pub undefined: UndefinedMode,
    /// Escape `&`, `<`, `>` and quotes in substituted values
    pub escape_values: bool,
    /// Drop the first newline after a block tag
    pub trim_blocks: bool,
    /// File extensions (without dot, case-insensitive) opened as DOCX
    pub extensions: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            missing_marker: "<no value>".to_string(),
            undefined: UndefinedMode::default(),
            escape_values: true,
            trim_blocks: false,
            extensions: vec!["docx".to_string(), "templ".to_string()],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    template: TemplateConfig,
}

impl TemplateConfig {
    /// Parse settings from a TOML string with a `[template]` table
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|e| TemplateError::Config(e.to_string()))?;
        Ok(file.template)
    }

    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| TemplateError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Whether `extension` (without dot) is opened as a DOCX
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }
}
