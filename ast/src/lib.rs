//! Syntax tree for the script language
//!
//! The tree is produced by an external parser (usually handed over as JSON)
//! and annotated in place by the semantic analyzer: variable references,
//! calls, function references and function declarations gain a
//! [`SymbolId`] once resolved.

#[macro_use]
mod ids;
pub mod node;
pub mod token;

pub use ids::SymbolId;
pub use node::*;
pub use token::{Token, TokenKind};
