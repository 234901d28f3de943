//! Breakpoint query compiler for responsive style attributes.
//!
//! Compiles compact query keys such as `md`, `lt-lg`, `sm-to-xl` or
//! `screen@md@portrait` into CSS media queries against a named breakpoint
//! table, and registers declaration blocks under fingerprinted selectors so
//! that equivalent styles share one rule.
//!
//! # Architecture
//!
//! ```text
//! style map ──► StyleCompiler ──► StyleRegistry ──► CSS text
//!                    │                  │
//!                    │                  ├── canonical declarations
//!                    │                  └── cyrb53 fingerprint → selector
//!                    └── MediaQueryCompiler (memoized)
//!                             ├── BreakpointTable (names, token patterns)
//!                             ├── MediaQueryDescriptor (per branch)
//!                             └── FeatureRegistry (custom fragments)
//! ```
//!
//! # Key Concepts
//!
//! - **Query key**: `@,@`-separated OR branches of `@`-separated fragments
//! - **BreakpointTable**: ordered `(name, length)` list, sentinel on failure
//! - **StyleCompiler**: one instance per `(breakpoint_key, breakpoint_selector)`
//! - **Headless**: rewrites `data-rsa-style` markup and renders a `<style>` node
//!
//! # Example
//!
//! ```
//! use resp_style_attr::{CompilerConfig, StyleCompiler};
//!
//! let mut compiler = StyleCompiler::new(CompilerConfig {
//!     seed: Some(42),
//!     ..CompilerConfig::with_breakpoints([("sm", "576px"), ("md", "768px"), ("lg", "992px")])
//! });
//!
//! assert_eq!(
//!     compiler.compile_key("lt-md"),
//!     "@media all and (max-width: 767.98px)"
//! );
//!
//! let rules = compiler.push_json(r#"{"lt-md": "border: 1px solid #000"}"#);
//! assert_eq!(rules[0].selector, ".rsa-7935904294605120");
//! ```

mod breakpoints;
mod canonical;
mod compiler;
mod config;
mod descriptor;
mod error;
mod features;
pub mod fingerprint;
mod headless;
mod instances;
mod registry;
mod resolver;
mod style_compiler;

pub use breakpoints::{
    definition_from_css, parse_definition, BreakpointEntry, BreakpointTable, RangeOptions,
    SENTINEL_LENGTH, SENTINEL_NAME,
};
pub use canonical::canonicalize;
pub use compiler::{MediaQueryCompiler, BRANCH_SEPARATOR, DEFAULT_MEDIA_TYPE, FRAGMENT_SEPARATOR};
pub use config::{CompilerConfig, DEFAULT_MIN_MAX_SUBTRACT};
pub use descriptor::{DescriptorValue, MediaQueryDescriptor, MEDIA_KEY};
pub use error::{BreakpointError, Result, RsaError};
pub use features::{parse_feature_call, FeatureRegistry, MediaFeature};
pub use headless::{marker, Headless, STYLE_ATTRIBUTE};
pub use instances::{InstanceKey, InstanceRegistry};
pub use registry::{SelectorTemplate, StyleRegistry, StyleRule};
pub use resolver::{
    adjust_length, split_length, Comparator, ResolvedRange, TokenOutcome, TokenShape,
    RANGE_CONTEXT_SLOT,
};
pub use style_compiler::{decode_style_map, PushedRule, StyleCompiler};
