//! Parser infrastructure for HCL2.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//! Key design decisions borrowed from rust-analyzer-style parsers:
//!
//! - Zero-copy lexing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: retroactively wrap nodes for binary/postfix chains
//! - Newlines are real tokens: bodies are newline-separated, and the
//!   reconstructor re-emits newline tokens verbatim, so they live in the tree
//!
//! The grammar rejects invalid input: the parse functions record the first
//! problem and the caller surfaces it as an error. There is no recovery tree.

pub mod ast;
mod core;
mod cst;
mod grammar;
mod lexer;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod cst_tests;

pub use cst::{HclLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TokenSet, token_sets};

pub use core::{IssueKind, ParseIssue, Parser};

pub use lexer::{Token, lex, token_text};
