//! Lexer for `docs://` identifier paths using logos

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("/")]
    Slash,

    #[regex(r"[^/]+", |lex| lex.slice().to_string())]
    Segment(String),
}

/// Lex a path string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

/// Non-empty segments of `path`, with spans shifted by `offset`
///
/// Leading, trailing and repeated slashes produce no segments.
pub fn segments(path: &str, offset: usize) -> Vec<(String, Span)> {
    lex(path)
        .filter_map(|(tok, span)| match tok {
            Token::Segment(s) => Some((s, span.start + offset..span.end + offset)),
            Token::Slash => None,
        })
        .collect()
}
