//! Error types for the breakpoint query compiler
//!
//! Compilation itself never fails: unresolvable fragments are dropped and
//! broken breakpoint sources fall back to the sentinel table. These errors
//! surface only at the boundaries (configuration loading, breakpoint
//! definitions, style map decoding) where callers may want to report them.

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum RsaError {
    /// A breakpoint source could not be turned into a table
    #[error("Breakpoint definition error: {0}")]
    Breakpoints(#[from] BreakpointError),

    /// A style map was not a JSON object
    #[error("Style map decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// YAML configuration failed to parse
    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Reading a configuration or input file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with a breakpoint definition (`[["name", "length"], ...]`)
#[derive(Error, Debug)]
pub enum BreakpointError {
    /// No `--breakpoints-<key>` value was found
    #[error("No breakpoint definition found for '{property}'")]
    Missing { property: String },

    /// Definition text is not JSON
    #[error("Breakpoint definition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON that is not a list of `[name, length]` pairs
    #[error(
        "Breakpoint definition must be an array of [name, length] pairs, found {found}"
    )]
    Shape { found: String },

    /// Definition with no entries
    #[error("Breakpoint definition is empty")]
    Empty,

    /// Same name listed twice
    #[error("Duplicate breakpoint name '{name}'")]
    DuplicateName { name: String },

    /// Names that break the token regex
    #[error("Breakpoint names produce an invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl RsaError {
    /// Whether the compiler can continue with a degraded result.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RsaError::Breakpoints(_) | RsaError::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, RsaError>;
