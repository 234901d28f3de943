//! Style registry: media query → ordered rules
//!
//! Every `(media query, canonical declarations)` pair is fingerprinted into
//! a selector and stored at most once. Media blocks keep first-insertion
//! order and rules keep first-insertion order inside their block, so the
//! serialized stylesheet is stable across repeated pushes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::fingerprint;

// =============================================================================
// SELECTOR TEMPLATES
// =============================================================================

/// Turns a fingerprint into a CSS selector.
#[derive(Clone)]
pub struct SelectorTemplate {
    render: Arc<dyn Fn(u64) -> String + Send + Sync>,
    label: &'static str,
}

impl SelectorTemplate {
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(u64) -> String + Send + Sync + 'static,
    {
        Self {
            render: Arc::new(render),
            label: "custom",
        }
    }

    /// `.rsa-<fp>`
    pub fn class() -> Self {
        Self {
            render: Arc::new(|fp| format!(".rsa-{fp}")),
            label: "class",
        }
    }

    /// `[data-rsa-<fp>]`, for markup annotated with marker attributes.
    pub fn attribute() -> Self {
        Self {
            render: Arc::new(|fp| format!("[data-rsa-{fp}]")),
            label: "attribute",
        }
    }

    pub fn render(&self, fingerprint: u64) -> String {
        (self.render)(fingerprint)
    }
}

impl Default for SelectorTemplate {
    fn default() -> Self {
        Self::class()
    }
}

impl fmt::Debug for SelectorTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SelectorTemplate").field(&self.label).finish()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// A rule as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule<'a> {
    pub media_query: &'a str,
    pub selector: &'a str,
    pub declarations: &'a str,
}

#[derive(Debug, Default)]
struct MediaBlock {
    media_query: String,
    /// `(selector, canonical declarations)` in insertion order.
    rules: Vec<(String, String)>,
    selectors: HashMap<String, usize>,
}

impl MediaBlock {
    fn new(media_query: &str) -> Self {
        Self {
            media_query: media_query.to_string(),
            ..Default::default()
        }
    }

    fn insert(&mut self, selector: String, declarations: &str) -> bool {
        if self.selectors.contains_key(&selector) {
            return false;
        }
        self.selectors.insert(selector.clone(), self.rules.len());
        self.rules.push((selector, declarations.to_string()));
        true
    }
}

/// Ordered, de-duplicating store of generated rules.
#[derive(Debug)]
pub struct StyleRegistry {
    seed: u32,
    template: SelectorTemplate,
    blocks: Vec<MediaBlock>,
    index: HashMap<String, usize>,
}

impl StyleRegistry {
    pub fn new(seed: u32) -> Self {
        Self::with_template(seed, SelectorTemplate::default())
    }

    pub fn with_template(seed: u32, template: SelectorTemplate) -> Self {
        Self {
            seed,
            template,
            blocks: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Fingerprint of a rule under this registry's seed.
    pub fn fingerprint(&self, media_query: &str, declarations: &str) -> u64 {
        fingerprint::hash(&format!("{media_query}:{declarations}"), self.seed)
    }

    /// Store a rule, returning its fingerprint. Re-pushing is a no-op.
    ///
    /// `declarations` is expected in canonical form.
    pub fn push(&mut self, media_query: &str, declarations: &str) -> u64 {
        let fingerprint = self.fingerprint(media_query, declarations);
        let selector = self.template.render(fingerprint);

        let position = match self.index.get(media_query) {
            Some(&position) => position,
            None => {
                self.blocks.push(MediaBlock::new(media_query));
                self.index.insert(media_query.to_string(), self.blocks.len() - 1);
                self.blocks.len() - 1
            }
        };

        if self.blocks[position].insert(selector, declarations) {
            tracing::trace!(media_query, fingerprint, "registered style rule");
        }
        fingerprint
    }

    pub fn selector(&self, fingerprint: u64) -> String {
        self.template.render(fingerprint)
    }

    pub fn contains(&self, media_query: &str, selector: &str) -> bool {
        self.index
            .get(media_query)
            .is_some_and(|&i| self.blocks[i].selectors.contains_key(selector))
    }

    /// All rules in stylesheet order.
    pub fn rules(&self) -> impl Iterator<Item = StyleRule<'_>> {
        self.blocks.iter().flat_map(|block| {
            block.rules.iter().map(move |(selector, declarations)| StyleRule {
                media_query: &block.media_query,
                selector,
                declarations,
            })
        })
    }

    pub fn media_queries(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.media_query.as_str())
    }

    /// Number of stored rules.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn template(&self) -> &SelectorTemplate {
        &self.template
    }

    /// Render every block as CSS text.
    ///
    /// ```text
    /// @media all and (max-width: 767.98px){
    /// \t.rsa-123{ border:1px solid #000 }
    /// }
    /// ```
    pub fn serialize(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            lines.push(format!("{}{{", block.media_query));
            for (selector, declarations) in &block.rules {
                lines.push(format!("\t{selector}{{ {declarations} }}"));
            }
            lines.push("}".to_string());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LT_MD: &str = "@media all and (max-width: 767.98px)";
    const MD: &str = "@media all and (min-width: 768px) and (max-width: 991.98px)";

    #[test]
    fn push_is_idempotent() {
        let mut registry = StyleRegistry::new(42);
        let a = registry.push(LT_MD, "border:1px solid #000");
        let b = registry.push(LT_MD, "border:1px solid #000");
        assert_eq!(a, b);
        assert_eq!(a, 7935904294605120);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(LT_MD, ".rsa-7935904294605120"));
    }

    #[test]
    fn blocks_keep_first_insertion_order() {
        let mut registry = StyleRegistry::new(1);
        registry.push(MD, "color:red");
        registry.push(LT_MD, "color:blue");
        registry.push(MD, "color:green");

        assert_eq!(registry.media_queries().collect::<Vec<_>>(), vec![MD, LT_MD]);
        let declarations: Vec<_> = registry.rules().map(|r| r.declarations).collect();
        assert_eq!(declarations, vec!["color:red", "color:green", "color:blue"]);
    }

    #[test]
    fn serialize_format() {
        let mut registry =
            StyleRegistry::with_template(7, SelectorTemplate::custom(|_| ".x".into()));
        assert_eq!(registry.serialize(), "");

        registry.push(LT_MD, "border:1px solid #000");
        registry.push(MD, "color:red");
        assert_eq!(
            registry.serialize(),
            "@media all and (max-width: 767.98px){\n\t.x{ border:1px solid #000 }\n}\n\
             @media all and (min-width: 768px) and (max-width: 991.98px){\n\t.x{ color:red }\n}"
        );
    }

    #[test]
    fn templates() {
        assert_eq!(SelectorTemplate::class().render(12), ".rsa-12");
        assert_eq!(SelectorTemplate::attribute().render(12), "[data-rsa-12]");
        assert_eq!(format!("{:?}", SelectorTemplate::default()), r#"SelectorTemplate("class")"#);
    }

    #[test]
    fn seed_changes_fingerprints() {
        let a = StyleRegistry::new(1).fingerprint(MD, "color:red");
        let b = StyleRegistry::new(2).fingerprint(MD, "color:red");
        assert_ne!(a, b);
    }
}
