//! Style compiler: style maps → registered rules
//!
//! A style map is an ordered JSON object from query key to declaration
//! block, e.g. `{"lt-md": "border: 1px solid #000", "md": "color: red"}`.
//! Each entry is compiled to a media query, canonicalized, fingerprinted
//! and stored in the instance's [`StyleRegistry`].

use std::any::Any;

use serde_json::{Map, Value};

use crate::breakpoints::BreakpointTable;
use crate::canonical::canonicalize;
use crate::compiler::MediaQueryCompiler;
use crate::config::CompilerConfig;
use crate::error::Result;
use crate::features::FeatureRegistry;
use crate::fingerprint;
use crate::registry::{SelectorTemplate, StyleRegistry};

/// Outcome of pushing one style map entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedRule {
    pub key: String,
    pub media_query: String,
    pub original_style: String,
    /// Canonical declarations as stored in the registry.
    pub style: String,
    pub fingerprint: u64,
    pub selector: String,
}

/// One compiler instance: breakpoint table, query cache and registry.
#[derive(Debug)]
pub struct StyleCompiler {
    config: CompilerConfig,
    queries: MediaQueryCompiler,
    registry: StyleRegistry,
}

impl StyleCompiler {
    /// Instance without custom features, using `.rsa-<fp>` selectors.
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_options(config, FeatureRegistry::new(), SelectorTemplate::default())
    }

    pub fn with_features(config: CompilerConfig, features: FeatureRegistry) -> Self {
        Self::with_options(config, features, SelectorTemplate::default())
    }

    pub fn with_options(
        config: CompilerConfig,
        features: FeatureRegistry,
        template: SelectorTemplate,
    ) -> Self {
        let seed = config.seed.unwrap_or_else(fingerprint::random_seed);
        tracing::debug!(
            breakpoint_key = %config.breakpoint_key,
            seed,
            "creating style compiler"
        );
        Self {
            queries: MediaQueryCompiler::from_config(&config, features),
            registry: StyleRegistry::with_template(seed, template),
            config,
        }
    }

    /// Compile a single query key (memoized).
    pub fn compile_key(&mut self, key: &str) -> String {
        self.queries.compile(key)
    }

    /// Register every string entry of `styles`.
    pub fn push(&mut self, styles: &Map<String, Value>) -> Vec<PushedRule> {
        self.push_with_context(styles, None)
    }

    /// Like [`push`](Self::push), handing `context` to custom features.
    pub fn push_with_context(
        &mut self,
        styles: &Map<String, Value>,
        context: Option<&dyn Any>,
    ) -> Vec<PushedRule> {
        styles
            .iter()
            .filter_map(|(key, value)| match value {
                Value::String(style) => Some(self.push_rule(key, style, context)),
                other => {
                    tracing::warn!("Skipping non-string style for key '{}': {}", key, other);
                    None
                }
            })
            .collect()
    }

    /// Decode a JSON style map and register it.
    ///
    /// Malformed JSON registers nothing.
    pub fn push_json(&mut self, json: &str) -> Vec<PushedRule> {
        match decode_style_map(json) {
            Ok(styles) => self.push(&styles),
            Err(e) => {
                tracing::warn!("Ignoring undecodable style map: {}", e);
                Vec::new()
            }
        }
    }

    /// Compile, canonicalize and register one entry.
    pub fn push_rule(&mut self, key: &str, style: &str, context: Option<&dyn Any>) -> PushedRule {
        let media_query = self.queries.compile_with_context(key, context);
        let canonical = canonicalize(style);
        let fingerprint = self.registry.push(&media_query, &canonical);

        PushedRule {
            key: key.to_string(),
            selector: self.registry.selector(fingerprint),
            media_query,
            original_style: style.to_string(),
            style: canonical,
            fingerprint,
        }
    }

    /// Current registry contents as CSS text.
    pub fn css(&self) -> String {
        self.registry.serialize()
    }

    pub fn seed(&self) -> u32 {
        self.registry.seed()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn breakpoints(&self) -> &BreakpointTable {
        self.queries.table()
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn queries(&self) -> &MediaQueryCompiler {
        &self.queries
    }
}

/// Decode a style map, keeping the object's key order.
pub fn decode_style_map(json: &str) -> Result<Map<String, Value>> {
    Ok(serde_json::from_str(json)?)
}
