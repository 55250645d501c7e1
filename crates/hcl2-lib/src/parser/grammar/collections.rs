//! Bracketed constructs: tuples, objects, for-expressions, function calls.

use crate::parser::Parser;
use crate::parser::cst::{SyntaxKind, token_sets};

impl Parser<'_> {
    /// `tuple → '[' (expression (',' expression)* ','?)? ']'`
    ///
    /// Newlines may follow the opening bracket and any comma.
    pub(crate) fn parse_tuple(&mut self) {
        self.start_node(SyntaxKind::Tuple);
        self.bump(); // [
        self.eat_newlines();
        while !self.at(SyntaxKind::RBrack) && !self.has_issues() {
            if self.peek() == SyntaxKind::Error {
                break;
            }
            self.parse_expression();
            self.eat_newlines();
            if self.eat(SyntaxKind::Comma) {
                self.eat_newlines();
            } else {
                break;
            }
        }
        self.expect(SyntaxKind::RBrack, "']'");
        self.finish_node();
    }

    /// `object → '{' (object_elem (',' | newline)?)* '}'`
    pub(crate) fn parse_object(&mut self) {
        self.start_node(SyntaxKind::Object);
        self.bump(); // {
        self.eat_newlines();
        while !self.at(SyntaxKind::RBrace) && !self.has_issues() {
            if self.peek() == SyntaxKind::Error {
                break;
            }
            self.parse_object_elem();
            if self.has_issues() {
                break;
            }
            let mut separated = false;
            if self.at(SyntaxKind::Newline) {
                separated = true;
                self.eat_newlines();
            }
            if self.eat(SyntaxKind::Comma) {
                separated = true;
                self.eat_newlines();
            }
            if !separated {
                break;
            }
        }
        self.expect(SyntaxKind::RBrace, "'}'");
        self.finish_node();
    }

    /// `object_elem → key ('=' | ':') expression` where key is an identifier,
    /// a dotted identifier path, a string, a number, or a parenthesised
    /// expression.
    fn parse_object_elem(&mut self) {
        self.start_node(SyntaxKind::ObjectElem);
        if !self.at_set(token_sets::OBJECT_KEY_FIRST) {
            self.error_and_bump("an object key");
            self.finish_node();
            return;
        }
        match self.peek() {
            SyntaxKind::Ident => {
                self.bump();
                while self.at(SyntaxKind::Dot) && self.peek_nth(1) == SyntaxKind::Ident {
                    self.bump(); // .
                    self.bump(); // name
                }
            }
            SyntaxKind::StringLit | SyntaxKind::IntLit | SyntaxKind::FloatLit => self.bump(),
            _ => self.parse_primary(),
        }
        if !(self.eat(SyntaxKind::Eq) || self.eat(SyntaxKind::Colon)) {
            self.error_expected("'=' or ':'");
        }
        self.eat_newlines();
        self.parse_expression();
        self.finish_node();
    }

    /// `for_tuple_expr → '[' for_intro expression for_cond? ']'`
    pub(crate) fn parse_for_tuple(&mut self) {
        self.start_node(SyntaxKind::ForTupleExpr);
        self.bump(); // [
        self.eat_newlines();
        self.parse_for_intro();
        self.parse_expression();
        self.eat_newlines();
        self.parse_for_cond_opt();
        self.eat_newlines();
        self.expect(SyntaxKind::RBrack, "']'");
        self.finish_node();
    }

    /// `for_object_expr → '{' for_intro expression '=>' expression '...'? for_cond? '}'`
    pub(crate) fn parse_for_object(&mut self) {
        self.start_node(SyntaxKind::ForObjectExpr);
        self.bump(); // {
        self.eat_newlines();
        self.parse_for_intro();
        self.parse_expression();
        self.expect(SyntaxKind::FatArrow, "'=>'");
        self.eat_newlines();
        self.parse_expression();
        self.eat(SyntaxKind::Ellipsis);
        self.eat_newlines();
        self.parse_for_cond_opt();
        self.eat_newlines();
        self.expect(SyntaxKind::RBrace, "'}'");
        self.finish_node();
    }

    /// `for_intro → 'for' identifier (',' identifier)? 'in' expression ':'`
    fn parse_for_intro(&mut self) {
        self.start_node(SyntaxKind::ForIntro);
        if self.at(SyntaxKind::Ident) && self.current_text() == "for" {
            self.bump();
        } else {
            self.error_expected("'for'");
        }
        self.expect(SyntaxKind::Ident, "an identifier");
        if self.eat(SyntaxKind::Comma) {
            self.expect(SyntaxKind::Ident, "an identifier");
        }
        if self.at(SyntaxKind::Ident) && self.current_text() == "in" {
            self.bump();
        } else {
            self.error_expected("'in'");
        }
        self.parse_expression();
        self.expect(SyntaxKind::Colon, "':'");
        self.eat_newlines();
        self.finish_node();
    }

    /// `for_cond → 'if' expression`
    fn parse_for_cond_opt(&mut self) {
        if self.at(SyntaxKind::Ident) && self.current_text() == "if" {
            self.start_node(SyntaxKind::ForCond);
            self.bump(); // if
            self.parse_expression();
            self.finish_node();
        }
    }

    /// `function_call → identifier ('::' identifier){0,2} '(' arguments? ')'`
    pub(crate) fn parse_function_call(&mut self) {
        self.start_node(SyntaxKind::FunctionCall);
        self.bump(); // name
        while self.at(SyntaxKind::DoubleColon) {
            self.bump();
            self.expect(SyntaxKind::Ident, "an identifier");
        }
        self.expect(SyntaxKind::LParen, "'('");
        self.start_node(SyntaxKind::Arguments);
        self.eat_newlines();
        while !self.at(SyntaxKind::RParen) && !self.has_issues() {
            if self.peek() == SyntaxKind::Error {
                break;
            }
            self.parse_expression();
            self.eat_newlines();
            if self.eat(SyntaxKind::Ellipsis) {
                self.eat_newlines();
                break;
            }
            if self.eat(SyntaxKind::Comma) {
                self.eat_newlines();
            } else {
                break;
            }
        }
        self.finish_node(); // Arguments
        self.expect(SyntaxKind::RParen, "')'");
        self.finish_node();
    }
}
