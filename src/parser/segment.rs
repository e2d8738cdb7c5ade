//! Template path segments

use crate::error::Span;

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One `/`-delimited piece of a template path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text such as `guides`
    Literal(String),
    /// A `{name}` placeholder; the name is not yet validated
    Placeholder(String),
}

impl Segment {
    /// The placeholder name, if this is a placeholder
    pub fn placeholder_name(&self) -> Option<&str> {
        match self {
            Segment::Placeholder(name) => Some(name),
            Segment::Literal(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder(_))
    }
}

/// Classify a raw segment
///
/// Only a segment that is entirely `{...}` is a placeholder; `{id}.md` or
/// `v{n}` are literals.
pub fn classify_segment(raw: &str) -> Segment {
    match raw
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(name) => Segment::Placeholder(name.to_string()),
        None => Segment::Literal(raw.to_string()),
    }
}

/// Parameter names are non-empty and made of letters and digits only
pub fn is_valid_parameter_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_alphanumeric)
}
