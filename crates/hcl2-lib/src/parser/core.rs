//! Parser state machine and low-level operations.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::{SyntaxKind, TokenSet};
use super::lexer::{Token, token_text};

/// Nesting ceiling for expressions. Deeply nested input produces a syntax
/// error instead of overflowing the stack.
const MAX_DEPTH: u32 = 500;

/// A problem recorded while parsing. The public API surfaces only the first
/// one, mapped to a library error with 1-based line/column.
#[derive(Debug, Clone)]
pub struct ParseIssue {
    pub kind: IssueKind,
    pub range: TextRange,
    pub found: String,
}

#[derive(Debug, Clone)]
pub enum IssueKind {
    /// A token the grammar cannot accept here; carries what was expected.
    Expected(String),
    /// A malformed heredoc; carries the reason.
    Heredoc(String),
}

/// Trivia tokens (whitespace, comments) are buffered and flushed as leading trivia
/// when starting a new node. This gives predictable trivia attachment without backtracking.
///
/// Newlines are not trivia: HCL2 bodies are newline-separated, so the grammar
/// consumes `Newline` tokens explicitly and they land in the tree wherever the
/// active production put them.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) trivia_buffer: Vec<Token>,
    pub(super) builder: GreenNodeBuilder<'static>,
    pub(super) issues: Vec<ParseIssue>,
    pub(super) depth: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            trivia_buffer: Vec::with_capacity(4),
            builder: GreenNodeBuilder::new(),
            issues: Vec::new(),
            depth: 0,
        }
    }

    /// Parse a whole document: `Root(Body(...))`.
    pub fn parse(mut self) -> (GreenNode, Vec<ParseIssue>) {
        self.parse_root();
        self.finish()
    }

    /// Parse a single expression wrapped in `Root`, for re-parsing the inside
    /// of `${…}` attribute values.
    pub fn parse_expression_only(mut self) -> (GreenNode, Vec<ParseIssue>) {
        self.start_node(SyntaxKind::Root);
        if !self.at_set(super::cst::token_sets::EXPR_FIRST) {
            self.error_expected("an expression");
        } else {
            self.parse_expression();
            self.eat_newlines();
            if !self.eof_reached() {
                self.error_expected("end of expression");
            }
        }
        self.drain_trivia();
        self.finish_node();
        self.finish()
    }

    fn finish(self) -> (GreenNode, Vec<ParseIssue>) {
        (self.builder.finish(), self.issues)
    }

    /// Returns `Error` at EOF (acts as sentinel).
    fn current(&self) -> SyntaxKind {
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_text(&self) -> &'src str {
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(self.source, t))
    }

    pub(super) fn current_span(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    fn eof_reached(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Current meaningful token, with trivia moved to the buffer first.
    pub(super) fn peek(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.current()
    }

    /// Nth meaningful token past the current one. Newlines count as tokens.
    pub(super) fn peek_nth(&mut self, n: usize) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        let mut seen = 0;
        let mut pos = self.pos;
        while pos < self.tokens.len() {
            let kind = self.tokens[pos].kind;
            if !kind.is_trivia() {
                if seen == n {
                    return kind;
                }
                seen += 1;
            }
            pos += 1;
        }
        SyntaxKind::Error
    }

    pub(super) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    pub(super) fn at_set(&mut self, set: TokenSet) -> bool {
        set.contains(self.peek())
    }

    /// True when the current token is `[` or `{` and the first meaningful
    /// token behind it (newlines included) is the `for` keyword.
    /// Disambiguates for-expressions from tuples and objects.
    pub(super) fn at_for_intro(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        let mut pos = self.pos;
        let mut skipped_open = false;
        while pos < self.tokens.len() {
            let token = self.tokens[pos];
            if token.kind.is_trivia() || (skipped_open && token.kind == SyntaxKind::Newline) {
                pos += 1;
                continue;
            }
            if !skipped_open {
                skipped_open = true;
                pos += 1;
                continue;
            }
            return token.kind == SyntaxKind::Ident && token_text(self.source, &token) == "for";
        }
        false
    }

    fn skip_trivia_to_buffer(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.trivia_buffer.push(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    pub(super) fn drain_trivia(&mut self) {
        for token in self.trivia_buffer.drain(..) {
            let text = token_text(self.source, &token);
            self.builder.token(token.kind.into(), text);
        }
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.drain_trivia();
        self.builder.start_node(kind.into());
    }

    /// Wrap previously-parsed content using checkpoint.
    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
        self.builder.checkpoint()
    }

    /// Emit the current token into the tree, with any buffered trivia first.
    pub(super) fn bump(&mut self) {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
        if self.eof_reached() {
            return;
        }
        let token = self.tokens[self.pos];
        let text = token_text(self.source, &token);
        self.builder.token(token.kind.into(), text);
        self.pos += 1;
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume any run of newline tokens into the tree.
    pub(super) fn eat_newlines(&mut self) {
        while self.at(SyntaxKind::Newline) {
            self.bump();
        }
    }

    /// On mismatch: record an issue and don't consume (the caller decides how
    /// to continue; the tree is discarded once any issue exists).
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_expected(what);
        false
    }

    pub(super) fn error_expected(&mut self, what: &str) {
        let found = if self.peek() == SyntaxKind::Error {
            "end of input".to_string()
        } else {
            format!("{:?}", self.current_text())
        };
        self.issues.push(ParseIssue {
            kind: IssueKind::Expected(what.to_string()),
            range: self.current_span(),
            found,
        });
    }

    pub(super) fn error_heredoc(&mut self, reason: &str, range: TextRange) {
        self.issues.push(ParseIssue {
            kind: IssueKind::Heredoc(reason.to_string()),
            range,
            found: String::new(),
        });
    }

    /// Record an issue and consume the offending token inside an `Error` node
    /// so grammar loops make progress.
    pub(super) fn error_and_bump(&mut self, what: &str) {
        self.error_expected(what);
        if !self.eof_reached() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    pub(super) fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            self.error_expected("shallower nesting");
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
