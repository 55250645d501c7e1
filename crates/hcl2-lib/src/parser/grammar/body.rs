//! Statement level: bodies, attributes, blocks.

use crate::parser::Parser;
use crate::parser::cst::{SyntaxKind, token_sets};

impl Parser<'_> {
    pub(crate) fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);
        self.parse_body(true);
        // Anything still buffered at end of input belongs inside the root.
        self.drain_trivia();
        self.finish_node();
    }

    /// `body → (newline | attribute | block)*`
    ///
    /// A top-level body runs to end of input; a block body runs to `}`.
    /// Statements must be separated by newlines, except that a single
    /// statement may share a line with its block's braces.
    pub(crate) fn parse_body(&mut self, top_level: bool) {
        self.start_node(SyntaxKind::Body);
        loop {
            self.eat_newlines();
            if self.has_issues() {
                break;
            }
            match self.peek() {
                SyntaxKind::Error => {
                    if !top_level {
                        self.error_expected("'}'");
                    }
                    break;
                }
                SyntaxKind::RBrace if !top_level => break,
                SyntaxKind::Ident => {
                    self.parse_body_item();
                    if self.has_issues() {
                        break;
                    }
                    match self.peek() {
                        SyntaxKind::Newline => {}
                        SyntaxKind::RBrace if !top_level => {}
                        SyntaxKind::Error if top_level => {}
                        _ => self.error_expected("newline after statement"),
                    }
                }
                _ => {
                    self.error_and_bump("an attribute or block");
                    break;
                }
            }
        }
        self.finish_node();
    }

    /// One token of lookahead decides: `name =` is an attribute, `name` plus
    /// another label or `{` is a block.
    fn parse_body_item(&mut self) {
        match self.peek_nth(1) {
            SyntaxKind::Eq => self.parse_attribute(),
            SyntaxKind::Ident | SyntaxKind::StringLit | SyntaxKind::LBrace => self.parse_block(),
            _ => self.error_and_bump("'=' or a block body"),
        }
    }

    fn parse_attribute(&mut self) {
        self.start_node(SyntaxKind::Attribute);
        self.bump(); // name
        self.expect(SyntaxKind::Eq, "'='");
        self.eat_newlines();
        self.parse_expression();
        self.finish_node();
    }

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.bump(); // type
        while self.at_set(token_sets::LABEL) {
            self.bump();
        }
        self.expect(SyntaxKind::LBrace, "'{'");
        self.parse_body(false);
        self.expect(SyntaxKind::RBrace, "'}'");
        self.finish_node();
    }
}
