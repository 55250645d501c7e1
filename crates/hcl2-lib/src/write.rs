//! CST → text reconstruction.
//!
//! The tree carries every terminal the parser saw except horizontal
//! whitespace, which the grammar treats as trivia and this module re-derives.
//! Newline and comment tokens are emitted verbatim; all other spacing comes
//! from a single pure predicate over the previous and current terminal.
//!
//! The same walk also renders expression subtrees to their canonical
//! single-line form for the forward transformer (`${…}` bodies). Because both
//! paths share one predicate, canonical text is a fixed point of
//! parse-then-write.

use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};
use crate::{Error, Result};

/// Whole-token operators and keywords that want a space on both sides.
const SPACED_TOKENS: &[&str] = &[
    "if", "in", "for", "==", "!=", "<", ">", "<=", ">=", "-", "*", "/", "%", "&&", "||", "+",
];

/// Characters that want a space after them when they end a token.
const CHAR_SPACE_AFTER: &[char] = &[',', '~', '@', '<', '>', '=', '"', '|', '?', ')', ']', ':'];

/// Characters that want a space before them when they start a token.
const CHAR_SPACE_BEFORE: &[char] = &['~', '@', '<', '>', '"', '|', '?', ')', ']', ':', '\''];

/// Never insert a space after these token-final characters.
const NEVER_SPACE_AFTER: &[char] = &['[', '('];

/// Never insert a space before these token-initial characters.
const NEVER_SPACE_BEFORE: &[char] = &[']', ')', ',', '.'];

/// A deferred comma is dropped when the next terminal starts with one of these.
const NEVER_COMMA_BEFORE: &[char] = &[']', ')', '}'];

/// Characters that may hug an identifier on either side (calls, indexing).
const IDENT_NO_SPACE: &[char] = &['(', ')', '[', ']'];

fn is_id_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Reconstructs a full document.
pub(crate) fn reconstruct(node: &SyntaxNode) -> Result<String> {
    write_tokens(node, false)
}

/// Renders an expression subtree to one canonical line: newlines and comments
/// are dropped and the spacing rules fill the gaps.
pub(crate) fn render_inline(node: &SyntaxNode) -> Result<String> {
    write_tokens(node, true)
}

fn write_tokens(node: &SyntaxNode, inline: bool) -> Result<String> {
    let mut writer = Writer::new(inline);
    for element in node.descendants_with_tokens() {
        if let Some(token) = element.into_token() {
            writer.push(&token)?;
        }
    }
    Ok(writer.finish())
}

struct Writer {
    out: String,
    inline: bool,
    prev_text: String,
    prev_parent: SyntaxKind,
    deferred_comma: bool,
}

impl Writer {
    fn new(inline: bool) -> Self {
        Self {
            out: String::new(),
            inline,
            prev_text: String::new(),
            prev_parent: SyntaxKind::Error,
            deferred_comma: false,
        }
    }

    fn push(&mut self, token: &SyntaxToken) -> Result<()> {
        let kind = token.kind();
        match kind {
            SyntaxKind::Whitespace => return Ok(()),
            SyntaxKind::Garbage | SyntaxKind::Error => {
                return Err(Error::Reconstruct {
                    reason: format!("tree contains a {kind:?} token"),
                });
            }
            SyntaxKind::Newline | SyntaxKind::LineComment | SyntaxKind::BlockComment
                if self.inline =>
            {
                return Ok(());
            }
            _ => {}
        }

        let parent = token
            .parent()
            .map_or(SyntaxKind::Error, |parent| parent.kind());
        let text = token.text();

        if self.deferred_comma {
            self.deferred_comma = false;
            let first = text.chars().next().unwrap_or(' ');
            if !NEVER_COMMA_BEFORE.contains(&first) {
                self.out.push(',');
            }
        }

        if self.needs_space(text) {
            self.out.push(' ');
        }

        if kind == SyntaxKind::Comma {
            self.deferred_comma = true;
        } else {
            self.out.push_str(text);
        }

        self.prev_text.clear();
        self.prev_text.push_str(text);
        self.prev_parent = parent;
        Ok(())
    }

    fn finish(mut self) -> String {
        if self.deferred_comma {
            self.out.push(',');
        }
        self.out
    }

    /// One space before the current terminal, or nothing. A port of the
    /// character-class rules the grammar discarded the whitespace for.
    fn needs_space(&self, text: &str) -> bool {
        let prev = self.prev_text.as_str();
        let (Some(last), Some(first)) = (prev.chars().last(), text.chars().next()) else {
            return false;
        };

        if last.is_whitespace() || first.is_whitespace() {
            return false;
        }
        // Never split what reads as one numeric literal.
        if last.is_ascii_digit() && first.is_ascii_digit() {
            return false;
        }
        if NEVER_SPACE_AFTER.contains(&last) || NEVER_SPACE_BEFORE.contains(&first) {
            return false;
        }
        // Namespaced function calls hug their `::`.
        if text == "::" || prev == "::" {
            return false;
        }
        if IDENT_NO_SPACE.contains(&last) && IDENT_NO_SPACE.contains(&first) {
            return false;
        }
        // Unary operators bind tight.
        if self.prev_parent == SyntaxKind::UnaryOp && (prev == "-" || prev == "!") {
            return false;
        }

        if is_id_continue(last) && !IDENT_NO_SPACE.contains(&first) {
            return true;
        }
        if CHAR_SPACE_AFTER.contains(&last) || SPACED_TOKENS.contains(&prev) {
            return true;
        }
        if CHAR_SPACE_BEFORE.contains(&first) || SPACED_TOKENS.contains(&text) {
            return true;
        }
        // A one-line body keeps a space inside its braces.
        if last == '{' && first != '}' {
            return true;
        }

        false
    }
}
