//! Semantic analysis for the script language
//!
//! Builds the scope chain for a parsed program, checks declarations and
//! name references, and annotates the tree with resolved symbols.
//!
//! ```ignore
//! let mut program: ast::Program = serde_json::from_str(&json)?;
//! let analysis = semantic::Analyzer::default().analyze(&mut program)?;
//! println!("{}", analysis.global_dump());
//! ```

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod logging;
pub mod scopes;
pub mod symbols;

pub use analyzer::{Analysis, Analyzer};
pub use catalog::{Catalog, FunctionTemplate, BUILTIN_PACKAGE};
pub use config::{AnalyzerConfig, Config};
pub use error::{ConfigError, ErrorDetail, ErrorKind, Result, SemanticError};
pub use scopes::{ScopeId, ScopeTable, ScopeTree};
pub use symbols::{
    BuiltinType, BuiltinTypeSymbol, FunctionSymbol, NativeHook, Symbol, SymbolTable,
    VariableSymbol,
};

/// Analyze `program` with the standard catalog and default settings.
pub fn analyze(program: &mut ast::Program) -> Result<Analysis> {
    Analyzer::default().analyze(program)
}
