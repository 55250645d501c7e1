//! CST → value tree (the forward transformer).
//!
//! A bottom-up fold: literals collapse to native scalars, tuples and objects
//! to sequences and mappings, and every other expression is rendered to its
//! canonical text and wrapped as a `"${…}"` string. Rendering goes through
//! the reconstructor's spacing engine, so the canonical form re-parses and
//! re-renders to itself.

use indexmap::IndexSet;
use rowan::TextSize;

use crate::escape;
use crate::heredoc;
use crate::parser::ast::{Block, Body, BodyItem, Expr, Literal, Object, Root, UnaryOp};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};
use crate::value::{END_LINE_KEY, Map, START_LINE_KEY, Value};
use crate::write;
use crate::{Error, Result};

pub(crate) fn transform_document(root: &SyntaxNode, with_meta: bool) -> Result<Value> {
    tracing::debug!(with_meta, "transforming document");
    let root = Root::cast(root.clone()).ok_or_else(|| malformed("not a document root"))?;
    let body = root.body().ok_or_else(|| malformed("document has no body"))?;
    let transformer = Transformer::new(root.as_cst(), with_meta);
    transformer.fold_body(&body).map(Value::Object)
}

fn malformed(reason: &str) -> Error {
    Error::Reconstruct {
        reason: reason.to_string(),
    }
}

struct Transformer {
    with_meta: bool,
    lines: LineIndex,
}

impl Transformer {
    fn new(root: &SyntaxNode, with_meta: bool) -> Self {
        Self {
            with_meta,
            lines: LineIndex::new(&root.text().to_string()),
        }
    }

    fn fold_body(&self, body: &Body) -> Result<Map> {
        let mut result = Map::new();
        let mut block_types: IndexSet<String> = IndexSet::new();

        for item in body.items() {
            match item {
                BodyItem::Attribute(attr) => {
                    let name = attr
                        .name()
                        .ok_or_else(|| malformed("attribute without a name"))?
                        .text()
                        .to_string();
                    if result.contains_key(&name) {
                        return Err(if block_types.contains(&name) {
                            Error::BlockAttributeConflict { name }
                        } else {
                            Error::DuplicateAttribute { name }
                        });
                    }
                    let value = attr
                        .value()
                        .ok_or_else(|| malformed("attribute without a value"))?;
                    result.insert(name, self.fold_expr(&value)?);
                }
                BodyItem::Block(block) => {
                    let name = block
                        .type_token()
                        .ok_or_else(|| malformed("block without a type"))?
                        .text()
                        .to_string();
                    let value = self.fold_block(&block)?;
                    match result.get_mut(&name) {
                        None => {
                            block_types.insert(name.clone());
                            result.insert(name, Value::Array(vec![value]));
                        }
                        Some(Value::Array(items)) if block_types.contains(&name) => {
                            items.push(value);
                        }
                        Some(_) => return Err(Error::BlockAttributeConflict { name }),
                    }
                }
            }
        }

        Ok(result)
    }

    /// A block body becomes a mapping; labels nest around it outermost-first.
    fn fold_block(&self, block: &Block) -> Result<Value> {
        let body = block
            .body()
            .ok_or_else(|| malformed("block without a body"))?;
        let mut body_map = self.fold_body(&body)?;

        if self.with_meta {
            let start = block.as_cst().text_range().start();
            let end = block
                .as_cst()
                .last_token()
                .map_or(start, |token| token.text_range().start());
            body_map.insert(START_LINE_KEY.to_string(), Value::Int(self.lines.line(start)));
            body_map.insert(END_LINE_KEY.to_string(), Value::Int(self.lines.line(end)));
        }

        let mut value = Value::Object(body_map);
        for label in block.labels().iter().rev() {
            let mut wrapper = Map::new();
            wrapper.insert(label_text(label), value);
            value = Value::Object(wrapper);
        }
        Ok(value)
    }

    fn fold_expr(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(lit) => self.fold_literal(lit),
            Expr::Variable(var) => {
                let name = var
                    .name()
                    .ok_or_else(|| malformed("variable without a name"))?;
                Ok(Value::String(format!("${{{}}}", name.text())))
            }
            Expr::Tuple(tuple) => tuple
                .elements()
                .map(|element| self.fold_expr(&element))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Expr::Object(object) => self.fold_object(object),
            // A minus sign on a numeric literal is part of the number, so
            // negative scalars survive a value round-trip.
            Expr::Unary(unary) => match negated_number(unary) {
                Some(value) => Ok(value),
                None => {
                    let text = write::render_inline(unary.as_cst())?;
                    Ok(Value::String(format!("${{{text}}}")))
                }
            },
            // Anything compound keeps only its canonical text.
            other => {
                let text = write::render_inline(other.as_cst())?;
                Ok(Value::String(format!("${{{text}}}")))
            }
        }
    }

    fn fold_literal(&self, lit: &Literal) -> Result<Value> {
        let token = lit
            .token()
            .ok_or_else(|| malformed("empty literal node"))?;
        let text = token.text();
        match token.kind() {
            SyntaxKind::IntLit => text.parse::<i64>().map(Value::Int).map_err(|_| {
                let (line, col) = self.lines.line_col(&token);
                Error::Syntax {
                    line,
                    col,
                    found: text.to_string(),
                    expected: "an integer that fits in 64 bits".to_string(),
                }
            }),
            SyntaxKind::FloatLit => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| malformed("unparseable float literal")),
            SyntaxKind::StringLit => Ok(Value::String(string_value(text))),
            SyntaxKind::HeredocLit => heredoc::value(text).map(Value::String).map_err(|reason| {
                let (line, col) = self.lines.line_col(&token);
                Error::Heredoc {
                    line,
                    col,
                    reason: reason.to_string(),
                }
            }),
            SyntaxKind::Ident => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                _ => Err(malformed("unexpected identifier literal")),
            },
            _ => Err(malformed("unexpected literal token")),
        }
    }

    fn fold_object(&self, object: &Object) -> Result<Value> {
        let mut result = Map::new();
        for elem in object.elems() {
            let key = if let Some(paren) = elem.key_expr() {
                format!("${{{}}}", write::render_inline(paren.as_cst())?)
            } else {
                object_key(&elem.key_tokens())?
            };
            if result.contains_key(&key) {
                return Err(Error::DuplicateAttribute { name: key });
            }
            let value = elem
                .value()
                .ok_or_else(|| malformed("object element without a value"))?;
            result.insert(key, self.fold_expr(&value)?);
        }
        Ok(Value::Object(result))
    }
}

/// The string a quoted template contributes to the value tree: quotes
/// stripped, escapes resolved outside interpolations.
fn string_value(token_text: &str) -> String {
    let inner = token_text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(token_text);
    escape::unescape_template(inner)
}

fn negated_number(unary: &UnaryOp) -> Option<Value> {
    if unary.operator()?.kind() != SyntaxKind::Minus {
        return None;
    }
    let Expr::Literal(lit) = unary.operand()? else {
        return None;
    };
    let token = lit.token()?;
    match token.kind() {
        SyntaxKind::IntLit => token.text().parse::<i64>().ok().map(|n| Value::Int(-n)),
        SyntaxKind::FloatLit => token.text().parse::<f64>().ok().map(|f| Value::Float(-f)),
        _ => None,
    }
}

fn label_text(token: &SyntaxToken) -> String {
    if token.kind() == SyntaxKind::StringLit {
        string_value(token.text())
    } else {
        token.text().to_string()
    }
}

fn object_key(tokens: &[SyntaxToken]) -> Result<String> {
    match tokens {
        [single] if single.kind() == SyntaxKind::StringLit => Ok(string_value(single.text())),
        [] => Err(malformed("object element without a key")),
        parts => Ok(parts.iter().map(|t| t.text().to_string()).collect()),
    }
}

struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        Self { starts }
    }

    /// 1-based line containing the offset.
    fn line(&self, offset: TextSize) -> i64 {
        let offset = u32::from(offset);
        self.starts.partition_point(|&start| start <= offset) as i64
    }

    /// 1-based line/column of a token, for error reports.
    fn line_col(&self, token: &SyntaxToken) -> (u32, u32) {
        let offset = u32::from(token.text_range().start());
        let line = self.starts.partition_point(|&start| start <= offset) as u32;
        let col = offset - self.starts[line as usize - 1] + 1;
        (line, col)
    }
}
