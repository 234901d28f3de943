//! Per-breakpoint-set compiler instances.
//!
//! Pages may use several breakpoint sets side by side. Instances are keyed
//! by `(breakpoint_key, breakpoint_selector)`; asking again for the same
//! pair returns the existing instance and ignores the new configuration.

use std::collections::HashMap;
use std::fmt;

use crate::config::CompilerConfig;
use crate::features::FeatureRegistry;
use crate::registry::SelectorTemplate;
use crate::style_compiler::StyleCompiler;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub breakpoint_key: String,
    pub breakpoint_selector: String,
}

impl InstanceKey {
    pub fn new(breakpoint_key: impl Into<String>, breakpoint_selector: impl Into<String>) -> Self {
        Self {
            breakpoint_key: breakpoint_key.into(),
            breakpoint_selector: breakpoint_selector.into(),
        }
    }

    pub fn of(config: &CompilerConfig) -> Self {
        Self::new(&config.breakpoint_key, &config.breakpoint_selector)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.breakpoint_key, self.breakpoint_selector)
    }
}

/// Instances in creation order.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: Vec<StyleCompiler>,
    index: HashMap<InstanceKey, usize>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing instance for the config's key pair, or a new one.
    pub fn get_or_create(&mut self, config: CompilerConfig) -> &mut StyleCompiler {
        self.get_or_create_with(config, FeatureRegistry::new(), SelectorTemplate::default())
    }

    pub fn get_or_create_with(
        &mut self,
        config: CompilerConfig,
        features: FeatureRegistry,
        template: SelectorTemplate,
    ) -> &mut StyleCompiler {
        let key = InstanceKey::of(&config);
        let position = match self.index.get(&key) {
            Some(&position) => {
                tracing::debug!("Instance '{}' already exists, reusing it", key);
                position
            }
            None => {
                self.instances
                    .push(StyleCompiler::with_options(config, features, template));
                self.index.insert(key, self.instances.len() - 1);
                self.instances.len() - 1
            }
        };
        &mut self.instances[position]
    }

    pub fn get(&self, key: &InstanceKey) -> Option<&StyleCompiler> {
        self.index.get(key).map(|&i| &self.instances[i])
    }

    pub fn get_mut(&mut self, key: &InstanceKey) -> Option<&mut StyleCompiler> {
        self.index.get(key).map(|&i| &mut self.instances[i])
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstanceKey, &StyleCompiler)> {
        self.instances
            .iter()
            .map(|compiler| (InstanceKey::of(compiler.config()), compiler))
    }
}
