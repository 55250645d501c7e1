//! Grammar productions for HCL2.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! `body.rs` covers the statement level, `expressions.rs` the operator
//! grammar, `collections.rs` the bracketed constructs.

mod body;
mod collections;
mod expressions;
