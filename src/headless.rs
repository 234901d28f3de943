//! Server-side rendering of `data-rsa-style` attributes.
//!
//! Rewrites markup so that every element carrying a JSON style map gains
//! one `data-rsa-<fp>` marker attribute per registered rule, and produces a
//! `<style>` element whose selectors match those markers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::CompilerConfig;
use crate::features::FeatureRegistry;
use crate::registry::SelectorTemplate;
use crate::style_compiler::{decode_style_map, StyleCompiler};

/// Attribute holding the style map in source markup.
pub const STYLE_ATTRIBUTE: &str = "data-rsa-style";

static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data-rsa-style='(\{.*\})'").unwrap());

/// Marker attribute for a rule fingerprint.
pub fn marker(fingerprint: u64) -> String {
    format!("data-rsa-{fingerprint}")
}

#[derive(Debug)]
pub struct Headless {
    compiler: StyleCompiler,
}

impl Headless {
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_features(config, FeatureRegistry::new())
    }

    pub fn with_features(config: CompilerConfig, features: FeatureRegistry) -> Self {
        Self {
            compiler: StyleCompiler::with_options(config, features, SelectorTemplate::attribute()),
        }
    }

    /// Register the style maps found in `html` and annotate their elements.
    ///
    /// The source attribute is dropped when `remove` or the configured
    /// `remove_data_attribute` is set. Attributes whose JSON does not decode
    /// are left as they are.
    pub fn parse(&mut self, html: &str, remove: bool) -> String {
        let remove = remove || self.compiler.config().remove_data_attribute;
        let compiler = &mut self.compiler;

        STYLE_ATTR_RE
            .replace_all(html, |caps: &Captures| {
                let attribute = &caps[0];
                let styles = match decode_style_map(&caps[1]) {
                    Ok(styles) => styles,
                    Err(e) => {
                        tracing::warn!(
                            "Leaving undecodable {} attribute in place: {}",
                            STYLE_ATTRIBUTE,
                            e
                        );
                        return attribute.to_string();
                    }
                };

                let markers: Vec<String> = compiler
                    .push(&styles)
                    .iter()
                    .map(|rule| marker(rule.fingerprint))
                    .collect();
                let kept = if remove { "" } else { attribute };
                format!("{} {}", kept, markers.join(" ")).trim().to_string()
            })
            .into_owned()
    }

    /// `<style>` element holding the registered rules.
    pub fn stylesheet(&self) -> String {
        let scoped = if self.compiler.config().scoped_style_node {
            " scoped"
        } else {
            ""
        };
        format!(
            "<style type=\"text/css\" id=\"rsa-stylesheet-{}\"{}>\n{}\n</style>\n",
            self.compiler.seed(),
            scoped,
            self.css()
        )
    }

    pub fn css(&self) -> String {
        self.compiler.css()
    }

    pub fn compiler(&self) -> &StyleCompiler {
        &self.compiler
    }

    pub fn compiler_mut(&mut self) -> &mut StyleCompiler {
        &mut self.compiler
    }
}
