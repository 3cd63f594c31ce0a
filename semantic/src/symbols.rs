//! Symbols and the symbol arena
//!
//! A symbol is anything that can occupy a slot in a scope table: one of the
//! six builtin types, a variable (or parameter), or a function. Symbols are
//! stored once in a [`SymbolTable`] arena and referred to by [`SymbolId`];
//! scope tables and annotated AST nodes only hold ids.

use ast::{Block, SymbolId, TypeRef};
use std::borrow::Cow;
use std::fmt;

/// The primitive type names seeded into every scope table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Integer,
    Float,
    Bool,
    String,
    List,
    Dict,
}

impl BuiltinType {
    /// Seeding order of a fresh scope table
    pub const ALL: [BuiltinType; 6] = [
        BuiltinType::Integer,
        BuiltinType::Float,
        BuiltinType::Bool,
        BuiltinType::String,
        BuiltinType::List,
        BuiltinType::Dict,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Integer => "INTEGER",
            BuiltinType::Float => "FLOAT",
            BuiltinType::Bool => "BOOL",
            BuiltinType::String => "STRING",
            BuiltinType::List => "LIST",
            BuiltinType::Dict => "DICT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinTypeSymbol {
    pub kind: BuiltinType,
    pub scope_level: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    /// Declared type; `None` when the type name resolved to nothing
    pub ty: Option<SymbolId>,
    pub scope_level: u32,
}

/// Name of the runtime entry point backing a builtin or package function.
///
/// The analyzer only carries it through to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeHook {
    pub entry: String,
}

impl NativeHook {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    /// Set only for builtin and imported package functions
    pub package: Option<String>,
    /// Parameter variables in declaration order
    pub formal_params: Vec<SymbolId>,
    pub return_type: Option<TypeRef>,
    /// Annotated body, back-filled once the body has been analyzed
    pub body: Option<Block>,
    pub scope_level: u32,
    pub native: Option<NativeHook>,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            formal_params: Vec::new(),
            return_type: None,
            body: None,
            scope_level: 0,
            native: None,
        }
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        let package = package.into();
        self.package = if package.is_empty() { None } else { Some(package) };
        self
    }

    pub fn with_native(mut self, hook: NativeHook) -> Self {
        self.native = Some(hook);
        self
    }

    pub fn is_qualified(&self) -> bool {
        self.package.is_some()
    }

    pub fn arity(&self) -> usize {
        self.formal_params.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    BuiltinType(BuiltinTypeSymbol),
    Variable(VariableSymbol),
    Function(FunctionSymbol),
}

impl Symbol {
    pub fn builtin_type(kind: BuiltinType) -> Self {
        Symbol::BuiltinType(BuiltinTypeSymbol {
            kind,
            scope_level: 0,
        })
    }

    pub fn variable(name: impl Into<String>, ty: Option<SymbolId>) -> Self {
        Symbol::Variable(VariableSymbol {
            name: name.into(),
            ty,
            scope_level: 0,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::BuiltinType(s) => s.kind.name(),
            Symbol::Variable(s) => &s.name,
            Symbol::Function(s) => &s.name,
        }
    }

    /// Key this symbol occupies in a scope table.
    ///
    /// Package functions live under `<package>.<name>`, everything else under
    /// its bare name.
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Symbol::Function(FunctionSymbol {
                package: Some(package),
                name,
                ..
            }) => Cow::Owned(qualified_name(package, name)),
            other => Cow::Borrowed(other.name()),
        }
    }

    pub fn scope_level(&self) -> u32 {
        match self {
            Symbol::BuiltinType(s) => s.scope_level,
            Symbol::Variable(s) => s.scope_level,
            Symbol::Function(s) => s.scope_level,
        }
    }

    pub(crate) fn set_scope_level(&mut self, level: u32) {
        match self {
            Symbol::BuiltinType(s) => s.scope_level = level,
            Symbol::Variable(s) => s.scope_level = level,
            Symbol::Function(s) => s.scope_level = level,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Symbol::Function(_))
    }
}

impl From<FunctionSymbol> for Symbol {
    fn from(function: FunctionSymbol) -> Self {
        Symbol::Function(function)
    }
}

/// `pkg.name`, the key of a package-qualified function
pub fn qualified_name(package: &str, name: &str) -> String {
    format!("{}.{}", package, name)
}

/// Arena holding every symbol created during one analysis run
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only scope insertion allocates, after the scope level is stamped.
    pub(crate) fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_index(self.symbols.len());
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    pub fn function(&self, id: SymbolId) -> Option<&FunctionSymbol> {
        self.get(id).and_then(Symbol::as_function)
    }

    pub(crate) fn function_mut(&mut self, id: SymbolId) -> Option<&mut FunctionSymbol> {
        match self.get_mut(id) {
            Some(Symbol::Function(f)) => Some(f),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::from_index(i), s))
    }

    /// One-line rendering used by scope dumps and trace logging
    pub fn describe(&self, id: SymbolId) -> String {
        match self.get(id) {
            Some(symbol) => self.describe_symbol(symbol),
            None => format!("<unknown {}>", id),
        }
    }

    pub fn describe_symbol(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::BuiltinType(s) => format!("<BuiltinTypeSymbol(name={})>", s.kind),
            Symbol::Variable(s) => {
                let ty = s
                    .ty
                    .and_then(|t| self.get(t))
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| "?".to_string());
                format!("<VarSymbol(name={}, type={})>", s.name, ty)
            }
            Symbol::Function(s) => {
                let params = s
                    .formal_params
                    .iter()
                    .filter_map(|p| self.get(*p))
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "<FunctionSymbol(name={}, package={}, parameters=[{}], return={})>",
                    s.name,
                    s.package.as_deref().unwrap_or(""),
                    params,
                    s.return_type.as_ref().map(|t| t.name.as_str()).unwrap_or("")
                )
            }
        }
    }
}
