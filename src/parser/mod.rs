//! Parser for `docs://` template paths

pub mod lexer;
pub mod segment;

pub use segment::{classify_segment, is_valid_parameter_name, Segment, Spanned};

/// Parse a template path into classified segments
///
/// `offset` is the byte position of `path` within the full template string.
pub fn parse_path(path: &str, offset: usize) -> Vec<Spanned<Segment>> {
    lexer::segments(path, offset)
        .into_iter()
        .map(|(raw, span)| Spanned::new(classify_segment(&raw), span))
        .collect()
}
