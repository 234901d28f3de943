//! Compiler configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::breakpoints::BreakpointEntry;
use crate::error::{Result, RsaError};

/// Default epsilon subtracted from boundaries to emulate strict comparison.
pub const DEFAULT_MIN_MAX_SUBTRACT: f64 = 0.02;

/// Configuration for one compiler instance.
///
/// Only plain data lives here; feature callbacks and selector templates are
/// attached to the [`StyleCompiler`](crate::StyleCompiler) at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Name of the breakpoint set (`--breakpoints-<key>`).
    pub breakpoint_key: String,
    /// Element the breakpoint set is read from.
    pub breakpoint_selector: String,
    /// Explicit breakpoint list; wins over `breakpoint_definition`.
    pub breakpoints: Option<Vec<BreakpointEntry>>,
    /// Raw JSON text of the `--breakpoints-<key>` custom property.
    pub breakpoint_definition: Option<String>,
    pub min_max_subtract: f64,
    pub always_prepend_mediatype: bool,
    pub use_mql4_range_context: bool,
    /// Accept `-up` / `-down` suffixes next to the comparator prefixes.
    pub legacy_suffix_grammar: bool,
    /// Fixed fingerprint seed; random per instance when unset.
    pub seed: Option<u32>,
    pub scoped_style_node: bool,
    pub remove_data_attribute: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            breakpoint_key: "default".to_string(),
            breakpoint_selector: "html".to_string(),
            breakpoints: None,
            breakpoint_definition: None,
            min_max_subtract: DEFAULT_MIN_MAX_SUBTRACT,
            always_prepend_mediatype: true,
            use_mql4_range_context: false,
            legacy_suffix_grammar: true,
            seed: None,
            scoped_style_node: true,
            remove_data_attribute: false,
        }
    }
}

impl CompilerConfig {
    /// Config with an explicit breakpoint list and defaults elsewhere.
    pub fn with_breakpoints<N, L>(breakpoints: impl IntoIterator<Item = (N, L)>) -> Self
    where
        N: Into<String>,
        L: Into<String>,
    {
        Self {
            breakpoints: Some(
                breakpoints
                    .into_iter()
                    .map(|(name, length)| BreakpointEntry::new(name, length))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    /// Parse a YAML (or JSON, which is valid YAML) document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_max_subtract.is_finite() || self.min_max_subtract < 0.0 {
            return Err(RsaError::InvalidConfig {
                message: format!(
                    "min_max_subtract must be a finite, non-negative number (got {})",
                    self.min_max_subtract
                ),
            });
        }
        if self.breakpoint_key.trim().is_empty() {
            return Err(RsaError::InvalidConfig {
                message: "breakpoint_key must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Name of the custom property holding this instance's breakpoints.
    pub fn breakpoint_property(&self) -> String {
        format!("--breakpoints-{}", self.breakpoint_key)
    }
}
