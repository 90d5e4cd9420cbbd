//! Hierarchy path grammar.
//!
//! A hierarchy path is a `/`-separated list of steps:
//!
//! | Step | Meaning |
//! |------|---------|
//! | `*` | this node or any descendant, at any depth |
//! | `button1` | member of the current node named `button1` |
//! | `qx.ui.form.Button` | first descendant that is an instance of the class |
//! | `child[2]` | third immediate descendant |
//! | `[@label]` | object stored in attribute `label` |
//! | `[@label="Ok.*"]` | first descendant whose `label` matches the pattern |
//!
//! Steps are classified in that precedence order. Anything else is a syntax
//! error that aborts the whole lookup.

use crate::result::{QxError, QxResult};
use regex::Regex;
use std::fmt;

/// Dotted prefix marking a name step as a class name
pub const CLASS_NAMESPACE_PREFIX: &str = "qx.";

/// A `[@key]` or `[@key=pattern]` predicate.
#[derive(Debug, Clone)]
pub struct AttributePredicate {
    key: String,
    pattern: Option<Regex>,
}

impl AttributePredicate {
    /// Attribute name
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Compiled value pattern; `None` for a dereference step (`[@key]`)
    #[must_use]
    pub const fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }
}

/// An attribute step. The predicate is `None` when the bracket form could
/// not be parsed (e.g. `[@]`); such a step never matches.
#[derive(Debug, Clone)]
pub struct AttributeStep {
    raw: String,
    predicate: Option<AttributePredicate>,
}

impl AttributeStep {
    /// The step as written
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed predicate, if any
    #[must_use]
    pub const fn predicate(&self) -> Option<&AttributePredicate> {
        self.predicate.as_ref()
    }
}

impl PartialEq for AttributeStep {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// One classified segment of a hierarchy path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// `*`
    Wildcard,
    /// Identifier: a member name, or a class name when it starts with `qx.`
    Name(String),
    /// `child[n]`
    Index(usize),
    /// `[@...]`
    Attribute(AttributeStep),
}

impl PathStep {
    /// Classify a single segment.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Syntax`] if the segment fits no step form, or if an
    /// attribute value is not a valid pattern.
    pub fn parse(segment: &str) -> QxResult<Self> {
        if segment == "*" {
            return Ok(Self::Wildcard);
        }
        if is_identifier(segment) {
            return Ok(Self::Name(segment.to_string()));
        }
        if let Some(index) = parse_nth_child(segment) {
            return Ok(Self::Index(index));
        }
        if segment.len() >= 2 && segment.starts_with('[') && segment.ends_with(']') {
            let predicate = parse_attribute(segment)?;
            return Ok(Self::Attribute(AttributeStep {
                raw: segment.to_string(),
                predicate,
            }));
        }
        Err(QxError::syntax(format!("QPath: Illegal step: {segment}")))
    }

    /// Whether this is a name step naming a class
    #[must_use]
    pub fn is_class_name(&self) -> bool {
        matches!(self, Self::Name(name) if name.starts_with(CLASS_NAMESPACE_PREFIX))
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str("*"),
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "child[{index}]"),
            Self::Attribute(step) => f.write_str(&step.raw),
        }
    }
}

/// A parsed hierarchy path. Never empty, never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Parse a `/`-separated path. Empty segments are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Syntax`] for an empty path or a malformed step.
    pub fn parse(input: &str) -> QxResult<Self> {
        let steps = input
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(PathStep::parse)
            .collect::<QxResult<Vec<_>>>()?;

        if steps.is_empty() {
            return Err(QxError::syntax(format!("QPath: empty hierarchy path: '{input}'")));
        }
        Ok(Self { steps })
    }

    /// The classified steps
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps (always at least one)
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_steps(&self.steps))
    }
}

/// Join steps back into path notation
pub(crate) fn join_steps(steps: &[PathStep]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// `^[A-Za-z$][A-Za-z0-9_.$]*$`
fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || "_.$".contains(c))
}

/// `^child\[\d+\]$`, case-insensitive. Indices too large for `usize` saturate,
/// which makes them out of range rather than malformed.
fn parse_nth_child(segment: &str) -> Option<usize> {
    let prefix = segment.get(..6)?;
    if !prefix.eq_ignore_ascii_case("child[") {
        return None;
    }
    let digits = segment[6..].strip_suffix(']')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

/// Find `[@key]` or `[@key=value]` ending the segment. The first `[@` from
/// the left that yields a non-empty key (and non-empty value after `=`) wins.
fn parse_attribute(segment: &str) -> QxResult<Option<AttributePredicate>> {
    let Some(body_end) = segment.len().checked_sub(1) else {
        return Ok(None);
    };

    for (start, _) in segment.match_indices("[@") {
        let body_start = start + 2;
        if body_start > body_end {
            continue;
        }
        let body = &segment[body_start..body_end];
        let (key, value) = match body.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (body, None),
        };
        if key.is_empty() || value.is_some_and(str::is_empty) {
            continue;
        }

        let pattern = value.map(compile_value_pattern).transpose()?;
        return Ok(Some(AttributePredicate {
            key: key.to_string(),
            pattern,
        }));
    }
    Ok(None)
}

/// Strip one pair of surrounding quotes, then compile as a regular
/// expression. Values always match as patterns, so `foo` also matches `fooo`.
fn compile_value_pattern(value: &str) -> QxResult<Regex> {
    let unquoted = if value.len() >= 2
        && value.starts_with(['\'', '"'])
        && value.ends_with(['\'', '"'])
    {
        &value[1..value.len() - 1]
    } else {
        value
    };
    Regex::new(unquoted).map_err(|e| {
        QxError::syntax(format!("QPath: invalid attribute pattern '{unquoted}': {e}"))
    })
}
