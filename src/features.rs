//! Caller-supplied media features
//!
//! A fragment such as `uaMustMatch(android)` or `set(prefers-reduced-motion)`
//! is looked up by name in a [`FeatureRegistry`]; the registered function
//! receives the branch descriptor and may add, change or remove clauses.
//! Unknown names are ignored by the compiler.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::{opt, rest};
use nom::IResult;

use crate::descriptor::MediaQueryDescriptor;

/// A named feature resolver.
///
/// `args` is the text between the parentheses (empty when omitted), `key` is
/// the full query key being compiled and `context` is an opaque reference
/// passed through from the caller of the compiler.
pub trait MediaFeature: Send + Sync {
    fn apply(
        &self,
        descriptor: &mut MediaQueryDescriptor,
        args: &str,
        key: &str,
        context: Option<&dyn Any>,
    );
}

impl<F> MediaFeature for F
where
    F: Fn(&mut MediaQueryDescriptor, &str, &str, Option<&dyn Any>) + Send + Sync,
{
    fn apply(
        &self,
        descriptor: &mut MediaQueryDescriptor,
        args: &str,
        key: &str,
        context: Option<&dyn Any>,
    ) {
        self(descriptor, args, key, context)
    }
}

/// Name-keyed table of feature resolvers.
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    features: HashMap<String, Arc<dyn MediaFeature>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, feature: F) -> &mut Self
    where
        F: Fn(&mut MediaQueryDescriptor, &str, &str, Option<&dyn Any>) + Send + Sync + 'static,
    {
        self.features.insert(name.into(), Arc::new(feature));
        self
    }

    /// Register an already shared resolver.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        feature: Arc<dyn MediaFeature>,
    ) -> &mut Self {
        self.features.insert(name.into(), feature);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn MediaFeature>> {
        self.features.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Run the feature named in `fragment`, if registered.
    ///
    /// Returns `false` when the fragment is not a feature call or names an
    /// unknown feature.
    pub fn apply(
        &self,
        descriptor: &mut MediaQueryDescriptor,
        fragment: &str,
        key: &str,
        context: Option<&dyn Any>,
    ) -> bool {
        let Some((name, args)) = parse_feature_call(fragment) else {
            return false;
        };
        match self.features.get(name) {
            Some(feature) => {
                feature.apply(descriptor, args, key, context);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.features.keys().collect();
        names.sort();
        f.debug_struct("FeatureRegistry")
            .field("features", &names)
            .finish()
    }
}

fn is_feature_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn feature_call(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, name) = take_while1(is_feature_name_char)(input)?;
    let (input, _) = opt(char('('))(input)?;
    let (input, args) = rest(input)?;
    Ok((input, (name, args.strip_suffix(')').unwrap_or(args))))
}

/// Split `name(args)` (or a bare `name`) into its parts.
pub fn parse_feature_call(fragment: &str) -> Option<(&str, &str)> {
    feature_call(fragment).ok().map(|(_, call)| call)
}
