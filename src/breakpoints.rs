//! Named breakpoint table
//!
//! Holds the ordered `(name, length)` list of one breakpoint set and the
//! token patterns derived from its names. The table is built once per
//! compiler instance and never changes afterwards; a missing or malformed
//! definition degrades to the single sentinel entry `("undefined", "0px")`
//! so that only raw pixel tokens keep working.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CompilerConfig;
use crate::error::BreakpointError;

/// Name of the fallback entry used when no usable breakpoints exist.
pub const SENTINEL_NAME: &str = "undefined";
/// Length of the fallback entry.
pub const SENTINEL_LENGTH: &str = "0px";

/// Raw pixel-like literal: digits followed by a two or three letter unit.
const PIXEL_LITERAL: &str = r"\d+[a-zA-Z]{2,3}";

// =============================================================================
// ENTRIES
// =============================================================================

/// One named breakpoint. Serialized as a `[name, length]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct BreakpointEntry {
    pub name: String,
    pub length: String,
}

impl BreakpointEntry {
    pub fn new(name: impl Into<String>, length: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: length.into(),
        }
    }

    pub fn sentinel() -> Self {
        Self::new(SENTINEL_NAME, SENTINEL_LENGTH)
    }
}

impl From<(String, String)> for BreakpointEntry {
    fn from((name, length): (String, String)) -> Self {
        Self { name, length }
    }
}

impl From<BreakpointEntry> for (String, String) {
    fn from(entry: BreakpointEntry) -> Self {
        (entry.name, entry.length)
    }
}

// =============================================================================
// RANGE OPTIONS
// =============================================================================

/// Options that shape how breakpoint tokens become width clauses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeOptions {
    pub min_max_subtract: f64,
    pub use_mql4_range_context: bool,
    pub legacy_suffix_grammar: bool,
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self {
            min_max_subtract: crate::config::DEFAULT_MIN_MAX_SUBTRACT,
            use_mql4_range_context: false,
            legacy_suffix_grammar: true,
        }
    }
}

impl From<&CompilerConfig> for RangeOptions {
    fn from(config: &CompilerConfig) -> Self {
        Self {
            min_max_subtract: config.min_max_subtract,
            use_mql4_range_context: config.use_mql4_range_context,
            legacy_suffix_grammar: config.legacy_suffix_grammar,
        }
    }
}

// =============================================================================
// TOKEN PATTERNS
// =============================================================================

/// Patterns compiled once from the breakpoint names.
#[derive(Debug, Clone)]
pub(crate) struct TokenPatterns {
    /// Full token grammar with named groups `cmp`/`target`, `a`/`b`, `dir`.
    pub(crate) token: Regex,
    /// `A-to-...` whose target does not resolve.
    pub(crate) dangling_range: Regex,
}

impl TokenPatterns {
    fn build(names: &[&str], legacy_suffix_grammar: bool) -> Result<Self, regex::Error> {
        let names_only = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let operand = format!("(?:{names_only}|{PIXEL_LITERAL})");
        let suffix = if legacy_suffix_grammar {
            "|-(?P<dir>up|down)"
        } else {
            ""
        };

        let token = Regex::new(&format!(
            "^(?:(?P<cmp>[lg]te?)-(?P<target>{operand})\
             |(?P<a>{operand})(?:-to-(?P<b>{operand}){suffix})?)$"
        ))?;
        let dangling_range = Regex::new(&format!("^{operand}-to-"))?;

        Ok(Self {
            token,
            dangling_range,
        })
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Ordered breakpoint set plus derived token patterns.
#[derive(Debug, Clone)]
pub struct BreakpointTable {
    entries: Vec<BreakpointEntry>,
    index: HashMap<String, usize>,
    pub(crate) patterns: TokenPatterns,
    pub(crate) options: RangeOptions,
}

impl BreakpointTable {
    /// Build a table, substituting the sentinel when the list is unusable.
    pub fn new(entries: Vec<BreakpointEntry>, options: RangeOptions) -> Self {
        match Self::try_new(entries, options) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!("Unusable breakpoint list, using sentinel: {}", e);
                Self::sentinel(options)
            }
        }
    }

    /// Build a table, reporting why the list is unusable.
    pub fn try_new(
        entries: Vec<BreakpointEntry>,
        options: RangeOptions,
    ) -> Result<Self, BreakpointError> {
        if entries.is_empty() {
            return Err(BreakpointError::Empty);
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(BreakpointError::Shape {
                    found: format!("empty name at position {position}"),
                });
            }
            if index.insert(entry.name.clone(), position).is_some() {
                return Err(BreakpointError::DuplicateName {
                    name: entry.name.clone(),
                });
            }
        }

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let patterns = TokenPatterns::build(&names, options.legacy_suffix_grammar)?;

        Ok(Self {
            entries,
            index,
            patterns,
            options,
        })
    }

    /// The degenerate single-entry table.
    pub fn sentinel(options: RangeOptions) -> Self {
        let entry = BreakpointEntry::sentinel();
        let patterns = TokenPatterns::build(&[SENTINEL_NAME], options.legacy_suffix_grammar)
            .expect("sentinel breakpoint patterns are valid");

        Self {
            index: HashMap::from([(entry.name.clone(), 0)]),
            entries: vec![entry],
            patterns,
            options,
        }
    }

    /// Resolve the breakpoint source of a configuration.
    ///
    /// An explicit `breakpoints` list wins; otherwise the raw
    /// `breakpoint_definition` JSON is parsed. Anything unusable is logged
    /// and replaced by the sentinel table.
    pub fn from_config(config: &CompilerConfig) -> Self {
        let options = RangeOptions::from(config);

        let entries = match (&config.breakpoints, &config.breakpoint_definition) {
            (Some(entries), _) => Ok(entries.clone()),
            (None, Some(definition)) => parse_definition(definition),
            (None, None) => Err(BreakpointError::Missing {
                property: config.breakpoint_property(),
            }),
        };

        match entries.and_then(|entries| Self::try_new(entries, options)) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(
                    "Breakpoint definition for \"{} {{ {}: ... ; }}\" unusable, using sentinel: {}",
                    config.breakpoint_selector,
                    config.breakpoint_property(),
                    e
                );
                Self::sentinel(options)
            }
        }
    }

    /// Position of `name` in the ordered list.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The entry immediately after `name`, if `name` is known and not last.
    pub fn next(&self, name: &str) -> Option<&BreakpointEntry> {
        self.index(name).and_then(|i| self.entries.get(i + 1))
    }

    /// Length of a known breakpoint.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.index(name).map(|i| self.entries[i].length.as_str())
    }

    pub fn entries(&self) -> &[BreakpointEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn options(&self) -> &RangeOptions {
        &self.options
    }

    pub fn is_sentinel(&self) -> bool {
        self.entries.len() == 1 && self.entries[0] == BreakpointEntry::sentinel()
    }

    /// Whether `fragment` has the shape of a breakpoint token.
    ///
    /// Range tokens whose target does not resolve still count: they are
    /// recognized so the branch can be degraded instead of being ignored.
    pub fn is_breakpoint_token(&self, fragment: &str) -> bool {
        self.patterns.token.is_match(fragment) || self.patterns.dangling_range.is_match(fragment)
    }
}

// =============================================================================
// DEFINITION SOURCES
// =============================================================================

/// Parse a `[["name", "length"], ...]` definition.
///
/// Numeric lengths are accepted and stringified (`["xs", 0]` → `"0"`).
pub fn parse_definition(definition: &str) -> Result<Vec<BreakpointEntry>, BreakpointError> {
    let trimmed = definition.trim();
    if trimmed.is_empty() {
        return Err(BreakpointError::Empty);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(BreakpointError::Shape {
                found: json_kind(&other).to_string(),
            })
        }
    };

    items
        .iter()
        .map(|item| match item.as_array().map(Vec::as_slice) {
            Some([Value::String(name), length]) => match length {
                Value::String(length) => Ok(BreakpointEntry::new(name.clone(), length.clone())),
                Value::Number(length) => Ok(BreakpointEntry::new(name.clone(), length.to_string())),
                other => Err(BreakpointError::Shape {
                    found: format!("{} length for '{}'", json_kind(other), name),
                }),
            },
            _ => Err(BreakpointError::Shape {
                found: item.to_string(),
            }),
        })
        .collect()
}

/// Extract the `--breakpoints-<key>` custom property value from CSS text.
///
/// The last declaration wins, as it would in the cascade.
pub fn definition_from_css(css: &str, key: &str) -> Option<String> {
    let pattern = Regex::new(&format!(
        r"--breakpoints-{}\s*:\s*([^;}}]*)",
        regex::escape(key)
    ))
    .ok()?;

    pattern
        .captures_iter(css)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
