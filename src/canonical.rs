//! Canonical form of declaration blocks.
//!
//! Two blocks that differ only in declaration order or in whitespace around
//! `;` and `:` canonicalize to the same string, so they hash to the same
//! fingerprint. Values are opaque text; repeated properties all survive.

use std::sync::LazyLock;

use regex::Regex;

static COLON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*:\s*").unwrap());

/// Sort the `;`-separated declarations of `block` into a stable form.
pub fn canonicalize(block: &str) -> String {
    let mut declarations: Vec<String> = block
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .map(|declaration| COLON_RE.replace_all(declaration, ":").into_owned())
        .collect();
    declarations.sort();
    declarations.join(";")
}
