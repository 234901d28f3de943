//! Query key → media query compiler.
//!
//! ```text
//! "xs-to-md@,@screen@sm-up@landscape"
//!      │ split "@,@"                        (OR branches)
//!      ├── "xs-to-md"
//!      └── "screen@sm-up@landscape"
//!            │ split "@", trim, drop blanks  (fragments)
//!            ├── media type   → media
//!            ├── orientation  → (orientation: ...)
//!            ├── breakpoint   → BreakpointTable::resolve_token
//!            ├── "(...)"      → verbatim clause
//!            └── "name(args)" → FeatureRegistry
//! "@media all and (min-width: 0) and (max-width: 767.98px), screen and ..."
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::breakpoints::BreakpointTable;
use crate::config::CompilerConfig;
use crate::descriptor::MediaQueryDescriptor;
use crate::features::FeatureRegistry;

/// Separator between OR branches of a key.
pub const BRANCH_SEPARATOR: &str = "@,@";
/// Separator between fragments of a branch.
pub const FRAGMENT_SEPARATOR: char = '@';
/// Media type seeded when `always_prepend_mediatype` is set.
pub const DEFAULT_MEDIA_TYPE: &str = "all";

static MEDIA_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:screen|all|print|speech)\b").unwrap());

static ORIENTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:landscape|portrait)$").unwrap());

/// Memoizing compiler for one breakpoint table.
#[derive(Debug)]
pub struct MediaQueryCompiler {
    table: BreakpointTable,
    features: FeatureRegistry,
    always_prepend_mediatype: bool,
    cache: HashMap<String, String>,
}

impl MediaQueryCompiler {
    pub fn new(
        table: BreakpointTable,
        features: FeatureRegistry,
        always_prepend_mediatype: bool,
    ) -> Self {
        Self {
            table,
            features,
            always_prepend_mediatype,
            cache: HashMap::new(),
        }
    }

    /// Build the table from the configuration's breakpoint source.
    pub fn from_config(config: &CompilerConfig, features: FeatureRegistry) -> Self {
        Self::new(
            BreakpointTable::from_config(config),
            features,
            config.always_prepend_mediatype,
        )
    }

    /// Compile `key`, reusing an earlier result for the same key.
    pub fn compile(&mut self, key: &str) -> String {
        self.compile_with_context(key, None)
    }

    /// Compile `key`, handing `context` to any feature it calls.
    ///
    /// The cache is keyed by `key` alone: a key compiled once keeps its
    /// result even when later compiled with a different context.
    pub fn compile_with_context(&mut self, key: &str, context: Option<&dyn Any>) -> String {
        if let Some(cached) = self.cache.get(key) {
            return cached.clone();
        }
        let query = self.compile_uncached(key, context);
        self.cache.insert(key.to_string(), query.clone());
        query
    }

    /// Compile without consulting or filling the cache.
    pub fn compile_uncached(&self, key: &str, context: Option<&dyn Any>) -> String {
        let branches: Vec<String> = key
            .split(BRANCH_SEPARATOR)
            .map(|branch| self.compile_branch(branch, key, context))
            .collect();
        format!("@media {}", branches.join(", "))
    }

    fn compile_branch(&self, branch: &str, key: &str, context: Option<&dyn Any>) -> String {
        let mut descriptor = MediaQueryDescriptor::new();
        if self.always_prepend_mediatype {
            descriptor.set_media(DEFAULT_MEDIA_TYPE);
        }

        let fragments = branch
            .split(FRAGMENT_SEPARATOR)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty());

        for (position, fragment) in fragments.enumerate() {
            if position == 0 && !fragment.contains('(') && MEDIA_TYPE_RE.is_match(fragment) {
                descriptor.set_media(fragment);
            } else if ORIENTATION_RE.is_match(fragment) {
                descriptor.set("orientation", fragment);
            } else if self.table.is_breakpoint_token(fragment) {
                self.table.resolve_token(&mut descriptor, fragment);
            } else if let Some(clause) = verbatim_clause(fragment) {
                descriptor.set_verbatim(fragment, clause);
            } else if !self
                .features
                .apply(&mut descriptor, fragment, key, context)
            {
                tracing::debug!("Dropping unrecognized fragment '{}' of key '{}'", fragment, key);
            }
        }

        descriptor.render()
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn table(&self) -> &BreakpointTable {
        &self.table
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }
}

/// Inner text of a `( ... )` fragment.
fn verbatim_clause(fragment: &str) -> Option<&str> {
    fragment.strip_prefix('(')?.strip_suffix(')')
}
