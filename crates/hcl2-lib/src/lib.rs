//! HCL2 parsing and reconstruction with a lossless round-trip.
//!
//! Four operations over HCL2 text: parse it into a concrete syntax tree,
//! fold the tree into a value tree (mappings, sequences, scalars, with
//! complex expressions preserved as `"${…}"` strings), rebuild a tree from a
//! value tree, and write a tree back out as text whose re-parse is
//! semantically identical to the original.
//!
//! # Example
//!
//! ```
//! let value = hcl2_lib::loads("a = 1\n").unwrap();
//! assert_eq!(value.to_json(), serde_json::json!({"a": 1}));
//!
//! let doc = hcl2_lib::reverse_transform(&value).unwrap();
//! assert_eq!(hcl2_lib::writes(&doc).unwrap(), "a = 1\n");
//! ```
//!
//! No evaluation happens anywhere: variables, functions and conditionals are
//! carried as text, never resolved.

use rowan::GreenNode;

mod builder;
mod escape;
mod heredoc;
pub mod parser;
mod reverse;
mod transform;
mod value;
mod write;

#[cfg(test)]
mod write_tests;

pub use builder::Builder;
pub use value::{END_LINE_KEY, Map, START_LINE_KEY, Value};

use parser::{IssueKind, ParseIssue, SyntaxElement, SyntaxNode};

/// Errors surfaced by parsing, transforming, or reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The parser could not match the input. Line and column are 1-based.
    #[error("syntax error at {line}:{col}: found {found}, expected {expected}")]
    Syntax {
        line: u32,
        col: u32,
        found: String,
        expected: String,
    },

    /// A heredoc without a terminator, or a trim heredoc with no content.
    #[error("heredoc error at {line}:{col}: {reason}")]
    Heredoc { line: u32, col: u32, reason: String },

    /// Two attributes with the same name in one body, or two equal keys in
    /// one object literal.
    #[error("duplicate attribute `{name}`")]
    DuplicateAttribute { name: String },

    /// A body uses one name for both an attribute and a block type.
    #[error("`{name}` is used as both an attribute and a block")]
    BlockAttributeConflict { name: String },

    /// The reverse transformer met a value it cannot serialize.
    #[error("cannot serialize value: {reason}")]
    ReverseType { reason: String },

    /// The inside of a `${…}` attribute value is not a valid expression.
    #[error("cannot re-parse `${{{expr}}}`: {reason}")]
    ReverseParse { expr: String, reason: String },

    /// The reconstructor met a tree shape the grammar cannot produce.
    #[error("malformed syntax tree: {reason}")]
    Reconstruct { reason: String },

    /// Reading from the caller's reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A parsed HCL2 document: an immutable concrete syntax tree.
///
/// The tree is lossless down to comments and newlines; horizontal spacing is
/// re-derived on write. Cloning is cheap and documents may be shared across
/// threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    green: GreenNode,
}

impl Document {
    pub(crate) fn new(green: GreenNode) -> Self {
        Self { green }
    }

    /// Root of the syntax tree.
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The exact text the tree carries, trivia included.
    pub fn text(&self) -> String {
        self.root().text().to_string()
    }

    /// Indented kind/text dump of the whole tree. Test helper.
    pub fn dump_cst(&self) -> String {
        let mut out = String::new();
        dump_node(&mut out, &SyntaxElement::Node(self.root()), 0);
        out
    }
}

fn dump_node(out: &mut String, element: &SyntaxElement, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    match element {
        SyntaxElement::Node(node) => {
            out.push_str(&format!("{:?}\n", node.kind()));
            for child in node.children_with_tokens() {
                dump_node(out, &child, depth + 1);
            }
        }
        SyntaxElement::Token(token) => {
            out.push_str(&format!("{:?} {:?}\n", token.kind(), token.text()));
        }
    }
}

/// Parses HCL2 text into a [`Document`].
///
/// CRLF line endings are normalized to LF, and a trailing newline is appended
/// when missing (bodies are newline-terminated).
pub fn parses(text: &str) -> Result<Document> {
    let mut normalized = if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text.to_string()
    };
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }

    tracing::debug!(len = normalized.len(), "parsing document");
    let tokens = parser::lex(&normalized);
    let (green, issues) = parser::Parser::new(&normalized, tokens).parse();
    match issues.first() {
        Some(issue) => Err(issue_to_error(&normalized, issue)),
        None => Ok(Document::new(green)),
    }
}

/// Parses HCL2 from a reader.
pub fn parse(mut reader: impl std::io::Read) -> Result<Document> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parses(&text)
}

/// Parses and forward-transforms text into a value tree.
pub fn loads(text: &str) -> Result<Value> {
    transform(&parses(text)?)
}

/// [`loads`], with `__start_line__`/`__end_line__` metadata on block bodies.
pub fn loads_with_meta(text: &str) -> Result<Value> {
    transform_with_meta(&parses(text)?)
}

/// Parses and forward-transforms a reader.
pub fn load(mut reader: impl std::io::Read) -> Result<Value> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    loads(&text)
}

/// [`load`], with block line metadata.
pub fn load_with_meta(mut reader: impl std::io::Read) -> Result<Value> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    loads_with_meta(&text)
}

/// CST → value tree.
pub fn transform(doc: &Document) -> Result<Value> {
    transform::transform_document(&doc.root(), false)
}

/// CST → value tree, with block line metadata.
pub fn transform_with_meta(doc: &Document) -> Result<Value> {
    transform::transform_document(&doc.root(), true)
}

/// Value tree → CST. The inverse of [`transform`]: reconstructing the result
/// and parsing it back yields an equal value tree.
pub fn reverse_transform(value: &Value) -> Result<Document> {
    reverse::reverse_transform(value).map(Document::new)
}

/// CST → text.
pub fn writes(doc: &Document) -> Result<String> {
    write::reconstruct(&doc.root())
}

fn issue_to_error(text: &str, issue: &ParseIssue) -> Error {
    let (line, col) = line_col(text, u32::from(issue.range.start()) as usize);
    match &issue.kind {
        IssueKind::Expected(expected) => Error::Syntax {
            line,
            col,
            found: issue.found.clone(),
            expected: expected.clone(),
        },
        IssueKind::Heredoc(reason) => Error::Heredoc {
            line,
            col,
            reason: reason.clone(),
        },
    }
}

/// 1-based line/column of a byte offset.
fn line_col(text: &str, offset: usize) -> (u32, u32) {
    let mut line = 1;
    let mut line_start = 0;
    for (i, byte) in text.bytes().enumerate() {
        if i >= offset {
            break;
        }
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, (offset - line_start) as u32 + 1)
}
