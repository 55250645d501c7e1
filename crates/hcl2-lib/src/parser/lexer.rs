//! Lexer for HCL2.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! Quoted templates and heredocs cannot be recognised by a regular expression
//! (interpolations nest, heredoc terminators are named), so those two token
//! kinds use Logos callbacks that scan the remainder by hand.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. This keeps the token stream manageable for malformed input.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Coalesces consecutive Logos errors into single `Garbage` tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = SyntaxKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..end),
                    ));
                }

                tokens.push(Token::new(kind, range_to_text_range(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[std::ops::Range::<usize>::from(token.span)]
}

/// Callback for `"`: scans the rest of a quoted template.
///
/// Tracks `${…}` interpolation depth so braces inside an interpolated object
/// close the correct group, skips `$${` escapes, and allows nested quoted
/// strings inside interpolations. A bare newline outside an interpolation
/// means the string is unterminated; the callback rejects the token and the
/// characters surface as `Garbage`.
pub(super) fn lex_string(lex: &mut logos::Lexer<'_, SyntaxKind>) -> bool {
    let rem = lex.remainder().as_bytes();
    let mut depth: u32 = 0;
    let mut in_nested_str = false;
    let mut i = 0;

    while i < rem.len() {
        let b = rem[i];
        if depth == 0 {
            match b {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'"' => {
                    lex.bump(i + 1);
                    return true;
                }
                b'$' if rem.get(i + 1) == Some(&b'$') && rem.get(i + 2) == Some(&b'{') => {
                    i += 3;
                    continue;
                }
                b'$' if rem.get(i + 1) == Some(&b'{') => {
                    depth = 1;
                    i += 2;
                    continue;
                }
                b'\n' => return false,
                _ => {}
            }
        } else if in_nested_str {
            match b {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'"' => in_nested_str = false,
                _ => {}
            }
        } else {
            match b {
                b'"' => in_nested_str = true,
                b'{' => depth += 1,
                b'}' => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }

    false
}

/// Callback for `<<` / `<<-`: consumes a heredoc through its terminator line.
///
/// The terminator is the first line whose trimmed content equals the tag. When
/// no terminator exists the remainder of the input becomes the token; the
/// parser detects the missing terminator and reports a heredoc error.
pub(super) fn lex_heredoc(lex: &mut logos::Lexer<'_, SyntaxKind>) -> bool {
    let rem = lex.remainder();
    let bytes = rem.as_bytes();

    let mut tag_len = 0;
    while tag_len < bytes.len()
        && (bytes[tag_len].is_ascii_alphanumeric() || bytes[tag_len] == b'_' || bytes[tag_len] == b'-')
    {
        tag_len += 1;
    }
    if tag_len == 0 {
        return false;
    }
    let tag = &rem[..tag_len];
    if bytes.get(tag_len) != Some(&b'\n') {
        return false;
    }

    let mut pos = tag_len + 1;
    loop {
        let line_end = rem[pos..].find('\n').map(|off| pos + off);
        let line = match line_end {
            Some(end) => &rem[pos..end],
            None => &rem[pos..],
        };
        if line.trim() == tag {
            lex.bump(pos + line.len());
            return true;
        }
        match line_end {
            Some(end) => pos = end + 1,
            None => {
                // No terminator; take everything and let the parser complain.
                lex.bump(rem.len());
                return true;
            }
        }
    }
}
