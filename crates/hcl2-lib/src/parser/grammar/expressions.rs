//! Operator grammar: conditionals, binary/unary chains, postfix operators,
//! literal and variable terms.
//!
//! Binary operators use precedence climbing; already-parsed terms are wrapped
//! retroactively via checkpoints, so `a + b * c` nests the way the precedence
//! table says without backtracking.

use crate::heredoc;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

/// Left/right binding powers per precedence tier, lowest first.
/// The conditional sits below all of these and is handled separately.
fn binary_binding(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind::*;
    let bp = match kind {
        OrOr => 1,
        AndAnd => 3,
        EqEq | NotEq => 5,
        Lt | Gt | LtEq | GtEq => 7,
        Plus | Minus => 9,
        Star | Slash | Percent => 11,
        _ => return None,
    };
    Some((bp, bp + 1))
}

impl Parser<'_> {
    /// `expression → conditional | binary_op | unary_op | expr_term`
    pub(crate) fn parse_expression(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_binary(0);
        // `?:` is right-associative and binds loosest.
        if self.at(SyntaxKind::Question) && !self.has_issues() {
            self.start_node_at(checkpoint, SyntaxKind::Conditional);
            self.bump(); // ?
            self.eat_newlines();
            self.parse_expression();
            self.expect(SyntaxKind::Colon, "':'");
            self.eat_newlines();
            self.parse_expression();
            self.finish_node();
        }
        self.exit_recursion();
    }

    fn parse_binary(&mut self, min_bp: u8) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_unary();
        loop {
            if self.has_issues() {
                break;
            }
            let Some((left_bp, right_bp)) = binary_binding(self.peek()) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BinaryOp);
            self.bump(); // operator
            self.eat_newlines();
            self.parse_binary(right_bp);
            self.finish_node();
        }
        self.exit_recursion();
    }

    fn parse_unary(&mut self) {
        if self.at(SyntaxKind::Minus) || self.at(SyntaxKind::Bang) {
            if !self.enter_recursion() {
                return;
            }
            self.start_node(SyntaxKind::UnaryOp);
            self.bump();
            self.parse_unary();
            self.finish_node();
            self.exit_recursion();
        } else {
            self.parse_postfix();
        }
    }

    /// Postfix chains: `.name`, `.*`, `[*]`, `[index]`, in any combination.
    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary();
        loop {
            if self.has_issues() {
                break;
            }
            match self.peek() {
                SyntaxKind::Dot
                    if matches!(self.peek_nth(1), SyntaxKind::Ident | SyntaxKind::IntLit) =>
                {
                    self.start_node_at(checkpoint, SyntaxKind::GetAttr);
                    self.bump(); // .
                    self.bump(); // name
                    self.finish_node();
                }
                SyntaxKind::DotStar => {
                    self.start_node_at(checkpoint, SyntaxKind::AttrSplat);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::BracketSplat => {
                    self.start_node_at(checkpoint, SyntaxKind::FullSplat);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::LBrack => {
                    self.start_node_at(checkpoint, SyntaxKind::IndexExpr);
                    self.bump();
                    self.eat_newlines();
                    self.parse_expression();
                    self.eat_newlines();
                    self.expect(SyntaxKind::RBrack, "']'");
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    pub(crate) fn parse_primary(&mut self) {
        match self.peek() {
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.eat_newlines();
                self.parse_expression();
                self.eat_newlines();
                self.expect(SyntaxKind::RParen, "')'");
                self.finish_node();
            }
            SyntaxKind::LBrack => {
                if self.at_for_intro() {
                    self.parse_for_tuple();
                } else {
                    self.parse_tuple();
                }
            }
            SyntaxKind::LBrace => {
                if self.at_for_intro() {
                    self.parse_for_object();
                } else {
                    self.parse_object();
                }
            }
            SyntaxKind::IntLit
            | SyntaxKind::FloatLit
            | SyntaxKind::StringLit
            | SyntaxKind::HeredocLit => self.parse_literal(),
            SyntaxKind::Ident => match self.current_text() {
                "true" | "false" | "null" => self.parse_literal(),
                _ => {
                    if matches!(
                        self.peek_nth(1),
                        SyntaxKind::LParen | SyntaxKind::DoubleColon
                    ) {
                        self.parse_function_call();
                    } else {
                        self.start_node(SyntaxKind::Variable);
                        self.bump();
                        self.finish_node();
                    }
                }
            },
            _ => self.error_and_bump("an expression"),
        }
    }

    fn parse_literal(&mut self) {
        if self.at(SyntaxKind::HeredocLit) {
            let span = self.current_span();
            if let Err(reason) = heredoc::check(self.current_text()) {
                self.error_heredoc(reason, span);
            }
        }
        self.start_node(SyntaxKind::Literal);
        self.bump();
        self.finish_node();
    }
}
