//! Breakpoint token resolution
//!
//! Turns one breakpoint-shaped fragment into a width range and writes it
//! into the branch descriptor:
//!
//! ```text
//! md            → [md, next(md))            only bucket
//! lt-md/lte-md  → (-, md]                    upper bound
//! gt-md/gte-md  → [md, -)                    lower bound
//! md-to-900px   → [md, 900px)                between (names, literals, mixed)
//! 1000px        → [1000px, -)                bare literal
//! md-up/md-down → lower / upper              legacy suffix grammar
//! ```
//!
//! The epsilon rule is keyed off the comparator text alone: `lte`/`gte`
//! reduce the lower bound and leave the upper bound exact, everything else
//! reduces the upper bound and leaves the lower bound exact.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::breakpoints::BreakpointTable;
use crate::descriptor::MediaQueryDescriptor;

/// Descriptor slot of the level-4 range-context clause.
pub const RANGE_CONTEXT_SLOT: &str = "mql4rc";

/// Numeric prefix of a CSS length (`768px` → `768` + `px`).
static LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))(.*)$").unwrap());

// =============================================================================
// TYPES
// =============================================================================

/// Comparator prefix of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
        }
    }

    /// `te` right after the first character of the comparator text.
    pub fn strict_boundary(&self) -> bool {
        self.as_str().get(1..3) == Some("te")
    }

    fn is_upper(&self) -> bool {
        matches!(self, Self::Lt | Self::Lte)
    }
}

/// Classified shape of a breakpoint token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenShape<'a> {
    /// Bare breakpoint name: the `[name, next)` bucket.
    Only(&'a str),
    /// Bare raw literal: at least this width.
    Literal(&'a str),
    /// `lt-X`, `lte-X`, `gt-X`, `gte-X`.
    Compared(Comparator, &'a str),
    /// `A-to-B` over names and/or literals.
    Between(&'a str, &'a str),
    /// Legacy `A-up`.
    Up(&'a str),
    /// Legacy `A-down`.
    Down(&'a str),
    /// `A-to-B` where `B` does not resolve.
    Dangling(&'a str),
}

/// Lower/upper raw lengths resolved for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRange {
    pub lower: Option<String>,
    pub upper: Option<String>,
    /// Set for `lte`/`gte`; selects which bound is epsilon-adjusted.
    pub strict_boundary: bool,
}

/// Result of resolving one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Width clause(s) written into the descriptor.
    Resolved(ResolvedRange),
    /// A range whose target could not be resolved; the branch is degraded.
    Unresolved,
    /// Not a breakpoint token; the descriptor is untouched.
    NotAToken,
}

// =============================================================================
// RESOLUTION
// =============================================================================

impl BreakpointTable {
    /// Classify a fragment against this table's token grammar.
    ///
    /// A fragment equal to a breakpoint name is always that name, even when
    /// it also reads as a suffix or range over a shorter name (`md-up`).
    pub fn classify<'a>(&self, fragment: &'a str) -> Option<TokenShape<'a>> {
        if self.index(fragment).is_some() {
            return Some(TokenShape::Only(fragment));
        }
        if let Some(caps) = self.patterns.token.captures(fragment) {
            return Some(self.shape_from_captures(&caps, fragment));
        }
        if self.patterns.dangling_range.is_match(fragment) {
            return Some(TokenShape::Dangling(fragment));
        }
        None
    }

    fn shape_from_captures<'a>(&self, caps: &Captures<'a>, fragment: &'a str) -> TokenShape<'a> {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        if let (Some(cmp), Some(target)) = (group("cmp"), group("target")) {
            if let Some(comparator) = Comparator::parse(cmp) {
                return TokenShape::Compared(comparator, target);
            }
        }

        let first = group("a").unwrap_or(fragment);
        match (group("b"), group("dir")) {
            (Some(second), _) => TokenShape::Between(first, second),
            (None, Some("up")) => TokenShape::Up(first),
            (None, Some(_)) => TokenShape::Down(first),
            (None, None) if self.index(first).is_some() => TokenShape::Only(first),
            (None, None) => TokenShape::Literal(first),
        }
    }

    /// Compute the raw range of a classified token.
    pub fn range_for(&self, shape: &TokenShape<'_>) -> Option<ResolvedRange> {
        let range = match *shape {
            TokenShape::Only(name) => ResolvedRange {
                lower: self.value_of(name).map(str::to_string),
                upper: self.next(name).map(|entry| entry.length.clone()),
                strict_boundary: false,
            },
            TokenShape::Literal(literal) => ResolvedRange {
                lower: Some(literal.to_string()),
                ..Default::default()
            },
            TokenShape::Compared(comparator, operand) => {
                let bound = Some(self.value_or_literal(operand));
                let (lower, upper) = if comparator.is_upper() {
                    (None, bound)
                } else {
                    (bound, None)
                };
                ResolvedRange {
                    lower,
                    upper,
                    strict_boundary: comparator.strict_boundary(),
                }
            }
            TokenShape::Between(from, to) => ResolvedRange {
                lower: Some(self.value_or_literal(from)),
                upper: Some(self.value_or_literal(to)),
                strict_boundary: false,
            },
            TokenShape::Up(operand) => ResolvedRange {
                lower: Some(self.value_or_literal(operand)),
                ..Default::default()
            },
            TokenShape::Down(operand) => ResolvedRange {
                upper: Some(self.value_or_literal(operand)),
                ..Default::default()
            },
            TokenShape::Dangling(_) => return None,
        };
        Some(range)
    }

    /// Resolve `fragment` and write its width constraint into `descriptor`.
    pub fn resolve_token(
        &self,
        descriptor: &mut MediaQueryDescriptor,
        fragment: &str,
    ) -> TokenOutcome {
        let Some(shape) = self.classify(fragment) else {
            return TokenOutcome::NotAToken;
        };
        tracing::trace!(fragment, ?shape, "classified breakpoint token");

        let Some(range) = self.range_for(&shape) else {
            tracing::debug!("Unresolvable range target in '{}'", fragment);
            descriptor.mark_unresolved();
            return TokenOutcome::Unresolved;
        };

        if self.options.use_mql4_range_context {
            if let Some(clause) = range_context_clause(&range) {
                descriptor.set_verbatim(RANGE_CONTEXT_SLOT, clause);
            }
        } else {
            let subtract = self.options.min_max_subtract;
            if let Some(lower) = &range.lower {
                let epsilon = if range.strict_boundary { subtract } else { 0.0 };
                descriptor.set("min-width", adjust_length(lower, epsilon));
            }
            if let Some(upper) = &range.upper {
                let epsilon = if range.strict_boundary { 0.0 } else { subtract };
                descriptor.set("max-width", adjust_length(upper, epsilon));
            }
        }

        TokenOutcome::Resolved(range)
    }

    fn value_or_literal(&self, operand: &str) -> String {
        self.value_of(operand).unwrap_or(operand).to_string()
    }
}

/// Level-4 range syntax for a resolved range.
fn range_context_clause(range: &ResolvedRange) -> Option<String> {
    let equals = if range.strict_boundary { "=" } else { "" };
    match (&range.lower, &range.upper) {
        (Some(lower), Some(upper)) => Some(format!("{lower} < width < {upper}")),
        (Some(lower), None) => Some(format!("width >{equals} {lower}")),
        (None, Some(upper)) => Some(format!("width <{equals} {upper}")),
        (None, None) => None,
    }
}

/// Split a length into its numeric prefix and unit.
pub fn split_length(length: &str) -> Option<(f64, &str)> {
    let caps = LENGTH_RE.captures(length.trim())?;
    let number = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2).map_or("", |m| m.as_str());
    Some((number, unit))
}

/// Subtract `epsilon` from the numeric part of `length`.
///
/// A zero epsilon or a non-numeric length renders the input unchanged.
pub fn adjust_length(length: &str, epsilon: f64) -> String {
    if epsilon == 0.0 {
        return length.to_string();
    }
    match split_length(length) {
        Some((number, unit)) => format!("{}{}", number - epsilon, unit),
        None => length.to_string(),
    }
}
