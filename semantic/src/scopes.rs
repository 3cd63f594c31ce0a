//! Scope tables and the scope tree
//!
//! Each scope table maps names to symbols in insertion order and points at
//! its enclosing table by [`ScopeId`]. All tables of a run live in one
//! [`ScopeTree`] arena, so the chain from an inner scope to the global scope
//! is a walk over ids rather than over borrowed parents. A table whose scope
//! has been left is kept for dumps but never written to again.

use crate::symbols::{BuiltinType, Symbol, SymbolTable};
use ast::SymbolId;
use indexmap::IndexMap;
use log::trace;

ast::define_id_type! {
    /// Handle of a scope table in the [`ScopeTree`]
    ScopeId
}

#[derive(Debug, Clone)]
pub struct ScopeTable {
    pub id: ScopeId,
    pub name: String,
    /// 1 for the global scope, parent level + 1 below it
    pub level: u32,
    pub enclosing: Option<ScopeId>,
    entries: IndexMap<String, SymbolId>,
}

impl ScopeTable {
    /// Binding for `key` in this table only
    pub fn get(&self, key: &str) -> Option<SymbolId> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Arena of scope tables plus the symbols inserted into them
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    tables: Vec<ScopeTable>,
    symbols: SymbolTable,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table nested in `enclosing` (or a root table at level 1),
    /// seeded with the six builtin types.
    pub fn create_scope(&mut self, name: impl Into<String>, enclosing: Option<ScopeId>) -> ScopeId {
        let level = enclosing
            .and_then(|id| self.get(id))
            .map(|parent| parent.level + 1)
            .unwrap_or(1);
        self.create_scope_at(name, level, enclosing)
    }

    /// Create a table at an explicit `level`, whatever `enclosing` is.
    /// A program's global table is always level 1, even when it is analyzed
    /// inside a host scope.
    pub fn create_scope_at(
        &mut self,
        name: impl Into<String>,
        level: u32,
        enclosing: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId::from_index(self.tables.len());
        self.tables.push(ScopeTable {
            id,
            name: name.into(),
            level,
            enclosing,
            entries: IndexMap::new(),
        });
        for kind in BuiltinType::ALL {
            self.insert(id, Symbol::builtin_type(kind));
        }
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&ScopeTable> {
        self.tables.get(id.index())
    }

    /// Insert `symbol` into `scope` under its key, stamping the table's
    /// level on it. An existing binding for the key is replaced; duplicate
    /// checks belong to the caller.
    ///
    /// # Panics
    ///
    /// If `scope` was not created by this tree.
    pub fn insert(&mut self, scope: ScopeId, mut symbol: Symbol) -> SymbolId {
        let table = &mut self.tables[scope.index()];
        symbol.set_scope_level(table.level);
        let key = symbol.key().into_owned();
        trace!("Insert: {} into {}", key, table.name);
        let id = self.symbols.alloc(symbol);
        table.entries.insert(key, id);
        id
    }

    /// Resolve `name` starting at `scope`.
    ///
    /// With `current_scope_only` the enclosing chain is never consulted.
    /// Otherwise the innermost binding wins. A scope unknown to this tree
    /// resolves nothing.
    pub fn lookup(&self, scope: ScopeId, name: &str, current_scope_only: bool) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let table = self.get(id)?;
            trace!("Lookup: {}. (Scope name: {})", name, table.name);
            if let Some(symbol) = table.get(name) {
                return Some(symbol);
            }
            if current_scope_only {
                return None;
            }
            current = table.enclosing;
        }
        None
    }

    /// Tables from `scope` out to the root
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = &ScopeTable> {
        std::iter::successors(self.get(scope), move |t| t.enclosing.and_then(|e| self.get(e)))
    }

    /// Every name visible from `scope`, innermost first
    pub fn visible_names(&self, scope: ScopeId) -> impl Iterator<Item = &str> {
        self.chain(scope).flat_map(|t| t.entries.keys().map(String::as_str))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Tables in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ScopeTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Human-readable listing of one table. Not a stable format.
    pub fn dump(&self, scope: ScopeId) -> String {
        let Some(table) = self.get(scope) else {
            return String::new();
        };

        let mut lines = vec![
            format!("Scope name : {}", table.name),
            format!("Scope level : {}", table.level),
        ];
        if let Some(enclosing) = table.enclosing.and_then(|e| self.get(e)) {
            lines.push(format!("Enclosing scope : {}", enclosing.name));
        }
        lines.push("------------------------------------".to_string());
        lines.push("Scope (Scoped symbol table) contents".to_string());
        for (i, (_, id)) in table.entries().enumerate() {
            lines.push(format!("{:6}: {}", i + 1, self.symbols.describe(id)));
        }

        format!(
            "\nSCOPE (SCOPED SYMBOL TABLE)\n===========================\n{}\n",
            lines.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::FunctionSymbol;

    #[test]
    fn test_fresh_table_is_seeded_with_builtin_types() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);

        let table = tree.get(global).unwrap();
        let keys: Vec<_> = table.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, ["INTEGER", "FLOAT", "BOOL", "STRING", "LIST", "DICT"]);
        for (_, id) in table.entries() {
            assert!(matches!(tree.symbol(id), Some(Symbol::BuiltinType(_))));
        }
        assert_eq!(table.level, 1);
        assert_eq!(table.enclosing, None);
    }

    #[test]
    fn test_levels_follow_nesting() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        let outer = tree.create_scope("outer", Some(global));
        let inner = tree.create_scope("inner", Some(outer));

        assert_eq!(tree.get(outer).unwrap().level, 2);
        assert_eq!(tree.get(inner).unwrap().level, 3);
        assert_eq!(tree.get(inner).unwrap().enclosing, Some(outer));

        let names: Vec<_> = tree.chain(inner).map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["inner", "outer", "global"]);
    }

    #[test]
    fn test_explicit_level_ignores_enclosing() {
        let mut tree = ScopeTree::new();
        let host = tree.create_scope("host", None);
        let nested = tree.create_scope("nested", Some(host));
        let global = tree.create_scope_at("global", 1, Some(nested));

        let table = tree.get(global).unwrap();
        assert_eq!(table.level, 1);
        assert_eq!(table.enclosing, Some(nested));

        let x = tree.insert(global, Symbol::variable("x", None));
        assert_eq!(tree.symbol(x).unwrap().scope_level(), 1);
    }

    #[test]
    fn test_unknown_scope_resolves_nothing() {
        let mut other = ScopeTree::new();
        other.create_scope("a", None);
        let foreign = other.create_scope("b", None);

        let mut tree = ScopeTree::new();
        tree.create_scope("global", None);

        assert!(tree.get(foreign).is_none());
        assert_eq!(tree.lookup(foreign, "INTEGER", false), None);
        assert_eq!(tree.chain(foreign).count(), 0);
        assert!(tree.dump(foreign).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_insert_into_unknown_scope_panics() {
        let mut tree = ScopeTree::new();
        tree.insert(ScopeId::from_raw(3), Symbol::variable("x", None));
    }

    #[test]
    fn test_insert_stamps_scope_level() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        let local = tree.create_scope("f", Some(global));

        let x = tree.insert(local, Symbol::variable("x", None));
        assert_eq!(tree.symbol(x).unwrap().scope_level(), 2);

        let int = tree.lookup(local, "INTEGER", true).unwrap();
        assert_eq!(tree.symbol(int).unwrap().scope_level(), 2);
    }

    #[test]
    fn test_shadowing_prefers_innermost() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        let outer_x = tree.insert(global, Symbol::variable("x", None));
        let local = tree.create_scope("f", Some(global));

        assert_eq!(tree.lookup(local, "x", false), Some(outer_x));

        let inner_x = tree.insert(local, Symbol::variable("x", None));
        assert_eq!(tree.lookup(local, "x", false), Some(inner_x));
        assert_eq!(tree.lookup(global, "x", false), Some(outer_x));
    }

    #[test]
    fn test_current_scope_only_lookup() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        tree.insert(global, Symbol::variable("x", None));
        let local = tree.create_scope("f", Some(global));

        assert_eq!(tree.lookup(local, "x", true), None);
        assert!(tree.lookup(local, "x", false).is_some());
        assert_eq!(tree.lookup(global, "missing", false), None);
    }

    #[test]
    fn test_insert_overwrites_silently() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        let first = tree.insert(global, Symbol::variable("x", None));
        let second = tree.insert(global, Symbol::variable("x", None));

        assert_ne!(first, second);
        assert_eq!(tree.lookup(global, "x", true), Some(second));
        assert_eq!(tree.get(global).unwrap().len(), 7);
    }

    #[test]
    fn test_package_and_bare_functions_coexist() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        let packaged = tree.insert(global, FunctionSymbol::new("sqrt").in_package("math").into());
        let bare = tree.insert(global, FunctionSymbol::new("sqrt").into());

        assert_eq!(tree.lookup(global, "math.sqrt", false), Some(packaged));
        assert_eq!(tree.lookup(global, "sqrt", false), Some(bare));
    }

    #[test]
    fn test_dump_format() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        let local = tree.create_scope("alpha", Some(global));
        let int = tree.lookup(local, "INTEGER", false);
        tree.insert(local, Symbol::variable("a", int));

        let dump = tree.dump(local);
        assert!(dump.starts_with("\nSCOPE (SCOPED SYMBOL TABLE)\n===========================\n"));
        assert!(dump.contains("Scope name : alpha\n"));
        assert!(dump.contains("Scope level : 2\n"));
        assert!(dump.contains("Enclosing scope : global\n"));
        assert!(dump.contains("     1: <BuiltinTypeSymbol(name=INTEGER)>\n"));
        assert!(dump.contains("     7: <VarSymbol(name=a, type=INTEGER)>\n"));

        assert!(!tree.dump(global).contains("Enclosing scope"));
    }

    #[test]
    fn test_visible_names_innermost_first() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope("global", None);
        tree.insert(global, Symbol::variable("outer", None));
        let local = tree.create_scope("f", Some(global));
        tree.insert(local, Symbol::variable("inner", None));

        let names: Vec<_> = tree.visible_names(local).collect();
        assert_eq!(names.iter().position(|n| *n == "inner"), Some(6));
        assert_eq!(names.last(), Some(&"outer"));
    }
}
