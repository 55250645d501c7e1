//! Value tree → CST (the reverse transformer).
//!
//! Builds a fresh green tree whose reconstruction parses back to the same
//! value tree. The interesting part is undoing the forward transformer's
//! flattening:
//!
//! - a list is a run of blocks when every element is a mapping whose
//!   single-key chain bottoms out in `__start_line__`/`__end_line__`
//!   metadata, otherwise it is a tuple attribute;
//! - a `"${…}"` string whose braces stay balanced is re-parsed as an
//!   expression and inlined, so `a = 1 + 2` survives a round-trip as HCL
//!   rather than as a quoted string.
//!
//! Indentation is synthesized as newline tokens carrying `level * 2` spaces;
//! the reconstructor emits them verbatim.

use rowan::{GreenNode, GreenNodeBuilder, NodeOrToken};

use crate::escape;
use crate::parser::{self, Parser, SyntaxKind, SyntaxNode};
use crate::value::{END_LINE_KEY, Map, START_LINE_KEY, Value};
use crate::{Error, Result};

pub(crate) fn reverse_transform(value: &Value) -> Result<GreenNode> {
    tracing::debug!("reverse-transforming value tree");
    let Value::Object(map) = value else {
        return Err(Error::ReverseType {
            reason: "the document root must be a mapping".to_string(),
        });
    };
    let mut rt = ReverseTransformer {
        builder: GreenNodeBuilder::new(),
    };
    rt.builder.start_node(SyntaxKind::Root.into());
    rt.emit_body(map, 0)?;
    rt.builder.finish_node();
    Ok(rt.builder.finish())
}

/// True when a list value is a run of block bodies rather than a tuple.
fn is_block_list(value: &Value) -> bool {
    match value {
        Value::Array(items) if !items.is_empty() => items.iter().all(|item| match item {
            Value::Object(map) => is_block_body(map),
            _ => false,
        }),
        _ => false,
    }
}

/// Follows single-key wrapper chains; a mapping is a block body when the
/// bottom of the chain carries line metadata.
fn is_block_body(map: &Map) -> bool {
    if map.contains_key(START_LINE_KEY) || map.contains_key(END_LINE_KEY) {
        return true;
    }
    if map.len() == 1 {
        if let Some(Value::Object(inner)) = map.values().next() {
            return is_block_body(inner);
        }
    }
    false
}

fn is_meta_key(key: &str) -> bool {
    key == START_LINE_KEY || key == END_LINE_KEY
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

enum Statement<'a> {
    Attribute(&'a str, &'a Value),
    Block(&'a str, &'a Map),
}

struct ReverseTransformer {
    builder: GreenNodeBuilder<'static>,
}

impl ReverseTransformer {
    fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.builder.token(kind.into(), text);
    }

    /// A newline plus the indent of the following line.
    fn newline(&mut self, level: usize) {
        let text = format!("\n{}", "  ".repeat(level));
        self.token(SyntaxKind::Newline, &text);
    }

    /// A body at nesting 0 begins without a leading newline; deeper bodies
    /// begin with one. The newline after the last statement dedents by one
    /// level so the closing brace lines up.
    fn emit_body(&mut self, map: &Map, level: usize) -> Result<()> {
        self.builder.start_node(SyntaxKind::Body.into());

        let mut statements = Vec::new();
        for (key, value) in map {
            if is_meta_key(key) {
                continue;
            }
            if is_block_list(value) {
                let Value::Array(items) = value else { unreachable!() };
                for item in items {
                    let Value::Object(item_map) = item else { unreachable!() };
                    statements.push(Statement::Block(key.as_str(), item_map));
                }
            } else {
                statements.push(Statement::Attribute(key.as_str(), value));
            }
        }

        if level > 0 && !statements.is_empty() {
            self.newline(level);
        }
        let count = statements.len();
        for (i, statement) in statements.into_iter().enumerate() {
            match statement {
                Statement::Attribute(name, value) => self.emit_attribute(name, value)?,
                Statement::Block(block_type, body) => self.emit_block(block_type, body, level)?,
            }
            let indent = if i + 1 == count {
                level.saturating_sub(1)
            } else {
                level
            };
            self.newline(indent);
        }

        self.builder.finish_node();
        Ok(())
    }

    fn emit_attribute(&mut self, name: &str, value: &Value) -> Result<()> {
        self.builder.start_node(SyntaxKind::Attribute.into());
        self.token(SyntaxKind::Ident, name);
        self.token(SyntaxKind::Eq, "=");
        self.emit_expr(value)?;
        self.builder.finish_node();
        Ok(())
    }

    fn emit_block(&mut self, block_type: &str, map: &Map, level: usize) -> Result<()> {
        self.builder.start_node(SyntaxKind::Block.into());
        self.token(SyntaxKind::Ident, block_type);

        // Peel label wrappers down to the mapping that carries the metadata.
        let mut body = map;
        loop {
            if body.contains_key(START_LINE_KEY) || body.contains_key(END_LINE_KEY) {
                break;
            }
            let mut entries = body.iter().filter(|(key, _)| !is_meta_key(key));
            match (entries.next(), entries.next()) {
                (Some((label, Value::Object(inner))), None) => {
                    let quoted = format!("\"{}\"", escape::escape_template(label));
                    self.token(SyntaxKind::StringLit, &quoted);
                    body = inner;
                }
                _ => break,
            }
        }

        self.token(SyntaxKind::LBrace, "{");
        self.emit_body(body, level + 1)?;
        self.token(SyntaxKind::RBrace, "}");
        self.builder.finish_node();
        Ok(())
    }

    fn emit_expr(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.emit_word("null"),
            Value::Bool(true) => self.emit_word("true"),
            Value::Bool(false) => self.emit_word("false"),
            Value::Int(n) => self.emit_int(*n),
            Value::Float(f) => self.emit_float(*f),
            Value::String(s) => self.emit_string(s),
            Value::Array(items) => {
                self.builder.start_node(SyntaxKind::Tuple.into());
                self.token(SyntaxKind::LBrack, "[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.token(SyntaxKind::Comma, ",");
                    }
                    self.emit_expr(item)?;
                }
                self.token(SyntaxKind::RBrack, "]");
                self.builder.finish_node();
                Ok(())
            }
            Value::Object(map) => {
                self.builder.start_node(SyntaxKind::Object.into());
                self.token(SyntaxKind::LBrace, "{");
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        self.token(SyntaxKind::Comma, ",");
                    }
                    self.builder.start_node(SyntaxKind::ObjectElem.into());
                    self.emit_object_key(key)?;
                    self.token(SyntaxKind::Eq, "=");
                    self.emit_expr(item)?;
                    self.builder.finish_node();
                }
                self.token(SyntaxKind::RBrace, "}");
                self.builder.finish_node();
                Ok(())
            }
        }
    }

    fn emit_word(&mut self, word: &str) -> Result<()> {
        self.builder.start_node(SyntaxKind::Literal.into());
        self.token(SyntaxKind::Ident, word);
        self.builder.finish_node();
        Ok(())
    }

    fn emit_int(&mut self, n: i64) -> Result<()> {
        if n < 0 {
            self.builder.start_node(SyntaxKind::UnaryOp.into());
            self.token(SyntaxKind::Minus, "-");
            self.builder.start_node(SyntaxKind::Literal.into());
            self.token(SyntaxKind::IntLit, &n.unsigned_abs().to_string());
            self.builder.finish_node();
            self.builder.finish_node();
        } else {
            self.builder.start_node(SyntaxKind::Literal.into());
            self.token(SyntaxKind::IntLit, &n.to_string());
            self.builder.finish_node();
        }
        Ok(())
    }

    fn emit_float(&mut self, f: f64) -> Result<()> {
        if !f.is_finite() {
            return Err(Error::ReverseType {
                reason: format!("cannot serialize non-finite float {f}"),
            });
        }
        if f.is_sign_negative() {
            self.builder.start_node(SyntaxKind::UnaryOp.into());
            self.token(SyntaxKind::Minus, "-");
            self.builder.start_node(SyntaxKind::Literal.into());
            self.token(SyntaxKind::FloatLit, &format!("{:?}", -f));
            self.builder.finish_node();
            self.builder.finish_node();
        } else {
            self.builder.start_node(SyntaxKind::Literal.into());
            self.token(SyntaxKind::FloatLit, &format!("{f:?}"));
            self.builder.finish_node();
        }
        Ok(())
    }

    /// Strings re-enter the grammar three ways: a balanced `${…}` becomes the
    /// expression it wraps, a `<<` prefix is a heredoc carried verbatim, and
    /// everything else is a quoted template with escapes applied outside its
    /// interpolation regions.
    fn emit_string(&mut self, s: &str) -> Result<()> {
        if escape::is_wrapped_expression(s) {
            let inner = &s[2..s.len() - 1];
            let root = parse_expression_snippet(inner)?;
            self.splice_children(&root);
            return Ok(());
        }
        self.builder.start_node(SyntaxKind::Literal.into());
        if s.starts_with("<<") {
            self.token(SyntaxKind::HeredocLit, s);
        } else {
            let quoted = format!("\"{}\"", escape::escape_template(s));
            self.token(SyntaxKind::StringLit, &quoted);
        }
        self.builder.finish_node();
        Ok(())
    }

    /// Object keys: identifier or dotted path where possible, a parenthesised
    /// expression for `${…}` keys, a quoted string otherwise.
    fn emit_object_key(&mut self, key: &str) -> Result<()> {
        if escape::is_wrapped_expression(key) {
            let inner = &key[2..key.len() - 1];
            let root = parse_expression_snippet(inner)?;
            if let Some(node) = root.children().next() {
                if node.kind() == SyntaxKind::ParenExpr {
                    self.splice(&node);
                    return Ok(());
                }
            }
            self.builder.start_node(SyntaxKind::ParenExpr.into());
            self.token(SyntaxKind::LParen, "(");
            self.splice_children(&root);
            self.token(SyntaxKind::RParen, ")");
            self.builder.finish_node();
            return Ok(());
        }

        if !key.is_empty() && key.split('.').all(is_identifier) {
            let mut first = true;
            for segment in key.split('.') {
                if !first {
                    self.token(SyntaxKind::Dot, ".");
                }
                self.token(SyntaxKind::Ident, segment);
                first = false;
            }
            return Ok(());
        }

        let quoted = format!("\"{}\"", escape::escape_template(key));
        self.token(SyntaxKind::StringLit, &quoted);
        Ok(())
    }

    fn splice(&mut self, node: &SyntaxNode) {
        self.builder.start_node(node.kind().into());
        self.splice_children(node);
        self.builder.finish_node();
    }

    fn splice_children(&mut self, node: &SyntaxNode) {
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => self.splice(&n),
                NodeOrToken::Token(t) => self.builder.token(t.kind().into(), t.text()),
            }
        }
    }
}

/// Re-parses the inside of a `${…}` wrapper as a standalone expression.
fn parse_expression_snippet(text: &str) -> Result<SyntaxNode> {
    let tokens = parser::lex(text);
    let (green, issues) = Parser::new(text, tokens).parse_expression_only();
    if let Some(issue) = issues.first() {
        let reason = match &issue.kind {
            parser::IssueKind::Expected(what) => format!("expected {what}, found {}", issue.found),
            parser::IssueKind::Heredoc(reason) => reason.clone(),
        };
        return Err(Error::ReverseParse {
            expr: text.to_string(),
            reason,
        });
    }
    Ok(SyntaxNode::new_root(green))
}
