//! Semantic analyzer
//!
//! Walks a parsed [`Program`] depth-first, building one scope table for the
//! program and one per function declaration, registering declarations and
//! resolving every name reference against the scope chain. Resolved symbols
//! are written back into the tree (`Var`, `FunctionCall`, `FunctionRef` and
//! `FunctionDecl` slots) for the evaluator.
//!
//! The scope being inserted into is passed to every handler as a
//! [`ScopeId`]. A handler that opens a scope passes the new id down to its
//! children; when it returns, the caller is still holding its own id, so
//! leaving a scope needs no bookkeeping.
//!
//! The first fault ends the run. A faulted run produces no [`Analysis`] and
//! whatever annotations were already written must not be used.

use crate::catalog::{Catalog, BUILTIN_PACKAGE};
use crate::config::{AnalyzerConfig, Config};
use crate::error::{Result, SemanticError};
use crate::scopes::{ScopeId, ScopeTree};
use crate::symbols::{qualified_name, FunctionSymbol, Symbol};
use ast::{
    Block, Compound, FunctionCall, FunctionDecl, FunctionRef, Node, PackageImport, Program,
    SymbolId, Token, TokenKind, Var, VarDecl,
};
use diagnostics::script::closest_match;
use log::{debug, info, log_enabled, warn, Level};

/// Result of a successful run: every scope table created, with its symbols.
#[derive(Debug, Clone)]
pub struct Analysis {
    scopes: ScopeTree,
    global: ScopeId,
}

impl Analysis {
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.scopes.symbol(id)
    }

    pub fn function(&self, id: SymbolId) -> Option<&FunctionSymbol> {
        self.scopes.symbols().function(id)
    }

    /// Bare-name lookup in the global table
    pub fn global(&self, name: &str) -> Option<SymbolId> {
        self.scopes.lookup(self.global, name, true)
    }

    pub fn global_dump(&self) -> String {
        self.scopes.dump(self.global)
    }

    /// Dump of every table in creation order
    pub fn dump_all(&self) -> String {
        self.scopes.iter().map(|t| self.scopes.dump(t.id)).collect()
    }
}

pub struct Analyzer {
    catalog: Catalog,
    config: AnalyzerConfig,
    scopes: ScopeTree,
    depth: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Catalog::standard(), AnalyzerConfig::default())
    }
}

impl Analyzer {
    pub fn new(catalog: Catalog, config: AnalyzerConfig) -> Self {
        Self {
            catalog,
            config,
            scopes: ScopeTree::new(),
            depth: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalog(), config.analyzer.clone())
    }

    /// Analyze a whole program, consuming the analyzer.
    pub fn analyze(mut self, program: &mut Program) -> Result<Analysis> {
        let global = self.visit_program(None, program)?;
        debug!(
            "Analysis of '{}' finished: {} scopes, {} symbols",
            program.name,
            self.scopes.len(),
            self.scopes.symbols().len()
        );
        Ok(Analysis {
            scopes: self.scopes,
            global,
        })
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeTree {
        &mut self.scopes
    }

    /// Visit the program root inside `enclosing` (normally `None`) and
    /// return the id of the global table it created.
    pub fn visit_program(
        &mut self,
        enclosing: Option<ScopeId>,
        program: &mut Program,
    ) -> Result<ScopeId> {
        debug!("ENTER scope: global");
        let global = self.scopes.create_scope_at("global", 1, enclosing);

        for template in self.catalog.builtins().iter().chain(self.catalog.iteration()) {
            self.scopes
                .insert(global, template.instantiate(BUILTIN_PACKAGE).into());
        }
        for package in &program.packages {
            self.visit_package(global, package);
        }
        self.visit_block(global, &mut program.block)?;

        self.report_scope(global);
        debug!("LEAVE scope: global");
        Ok(global)
    }

    /// Visit one node with `scope` as the current scope
    pub fn visit(&mut self, scope: ScopeId, node: &mut Node) -> Result<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            let token = node
                .token()
                .cloned()
                .unwrap_or_else(|| Token::new(TokenKind::Eof, node.kind_name(), 0, 0));
            self.depth -= 1;
            return Err(SemanticError::nesting_too_deep(&token, self.config.max_depth));
        }
        let result = self.dispatch(scope, node);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, scope: ScopeId, node: &mut Node) -> Result<()> {
        match node {
            Node::Package(package) => {
                self.visit_package(scope, package);
                Ok(())
            }
            Node::Block(block) => self.visit_block(scope, block),
            Node::VarDecl(decl) => self.visit_var_decl(scope, decl),
            Node::Compound(compound) => self.visit_compound(scope, compound),
            Node::Var(var) => self.visit_var(scope, var),
            Node::FunctionDecl(decl) => self.visit_function_decl(scope, decl),
            Node::FunctionCall(call) => self.visit_function_call(scope, call),
            Node::FunctionRef(func) => self.visit_function_ref(scope, func),

            Node::BinOp(op) => {
                self.visit(scope, &mut op.left)?;
                self.visit(scope, &mut op.right)
            }
            Node::Logical(op) => {
                self.visit(scope, &mut op.left)?;
                self.visit(scope, &mut op.right)
            }
            // the right-hand side must resolve before the target is checked
            Node::Assign(assign) => {
                self.visit(scope, &mut assign.right)?;
                self.visit(scope, &mut assign.left)
            }
            Node::List(list) => self.visit_all(scope, &mut list.items),
            Node::Dict(dict) => {
                for entry in &mut dict.entries {
                    self.visit(scope, &mut entry.value)?;
                }
                Ok(())
            }
            Node::Return(ret) => self.visit(scope, &mut ret.statement),
            Node::Print(print) => self.visit(scope, &mut print.statement),

            // Loop and branch bodies share the enclosing scope; their
            // declarations land there.
            Node::While(node) => self.visit_all(scope, &mut node.body),
            Node::If(node) => {
                self.visit_all(scope, &mut node.then_branch)?;
                self.visit_all(scope, &mut node.else_branch)
            }

            Node::Type(_)
            | Node::Number(_)
            | Node::String(_)
            | Node::Boolean(_)
            | Node::Message(_)
            | Node::UnaryOp(_)
            | Node::NoOp => Ok(()),
        }
    }

    fn visit_all(&mut self, scope: ScopeId, nodes: &mut [Node]) -> Result<()> {
        for node in nodes {
            self.visit(scope, node)?;
        }
        Ok(())
    }

    fn visit_package(&mut self, scope: ScopeId, node: &PackageImport) {
        debug!("Import package: {}", node.name);
        match self.catalog.package(&node.name) {
            Some(exports) => {
                for template in exports {
                    self.scopes
                        .insert(scope, template.instantiate(&node.name).into());
                }
            }
            None => warn!(
                "Unknown package '{}' imported at {}:{}; nothing was imported",
                node.name, node.token.line, node.token.column
            ),
        }
    }

    fn visit_block(&mut self, scope: ScopeId, block: &mut Block) -> Result<()> {
        self.visit_all(scope, &mut block.declarations)?;
        self.visit_compound(scope, &mut block.compound)
    }

    fn visit_compound(&mut self, scope: ScopeId, compound: &mut Compound) -> Result<()> {
        self.visit_all(scope, &mut compound.children)
    }

    fn visit_var_decl(&mut self, scope: ScopeId, decl: &mut VarDecl) -> Result<()> {
        let ty = self.scopes.lookup(scope, &decl.type_node.name, false);
        let name = &decl.var.name;

        if self.scopes.lookup(scope, name, true).is_some() {
            let scope_name = self.scope_name(scope);
            return Err(SemanticError::duplicate_id(&decl.var.token, &scope_name));
        }
        let id = self.scopes.insert(scope, Symbol::variable(name.clone(), ty));
        decl.var.symbol = Some(id);
        Ok(())
    }

    fn visit_var(&mut self, scope: ScopeId, var: &mut Var) -> Result<()> {
        match self.scopes.lookup(scope, &var.name, false) {
            Some(id) => {
                var.symbol = Some(id);
                Ok(())
            }
            None => {
                let candidate = self.suggest(scope, &var.name, |s| s.as_variable().is_some());
                Err(SemanticError::id_not_found(&var.token, candidate.as_deref()))
            }
        }
    }

    fn visit_function_decl(&mut self, scope: ScopeId, decl: &mut FunctionDecl) -> Result<()> {
        // Registered before the body is visited so the body can call it.
        let function = self
            .scopes
            .insert(scope, FunctionSymbol::new(decl.name.clone()).into());
        decl.symbol = Some(function);

        debug!("ENTER scope: {}", decl.name);
        let function_scope = self.scopes.create_scope(decl.name.clone(), Some(scope));

        for param in &mut decl.params {
            let ty = self.scopes.lookup(function_scope, &param.type_node.name, false);
            let id = self
                .scopes
                .insert(function_scope, Symbol::variable(param.var.name.clone(), ty));
            param.var.symbol = Some(id);
            if let Some(symbol) = self.scopes.symbols_mut().function_mut(function) {
                symbol.formal_params.push(id);
            }
        }

        self.visit_block(function_scope, &mut decl.block)?;

        self.report_scope(function_scope);
        debug!("LEAVE scope: {}", decl.name);

        if let Some(symbol) = self.scopes.symbols_mut().function_mut(function) {
            symbol.body = Some(decl.block.clone());
            symbol.return_type = decl.return_type.clone();
        }
        Ok(())
    }

    fn visit_function_call(&mut self, scope: ScopeId, call: &mut FunctionCall) -> Result<()> {
        let id = self.resolve_function(scope, call.package.as_deref(), &call.name, &call.token)?;

        // TODO: package-qualified calls skip arity checking until package
        // catalogs carry parameter lists.
        if let Some(function) = self.scopes.symbols().function(id) {
            if !function.is_qualified() && function.arity() != call.args.len() {
                return Err(SemanticError::wrong_params_num(
                    &call.token,
                    function.arity(),
                    call.args.len(),
                ));
            }
        }

        self.visit_all(scope, &mut call.args)?;
        call.symbol = Some(id);
        Ok(())
    }

    fn visit_function_ref(&mut self, scope: ScopeId, func: &mut FunctionRef) -> Result<()> {
        let id = self.resolve_function(scope, func.package.as_deref(), &func.name, &func.token)?;
        func.symbol = Some(id);
        Ok(())
    }

    /// `pkg.name` or bare `name` across the whole chain, then `builtin.name`.
    fn resolve_function(
        &self,
        scope: ScopeId,
        package: Option<&str>,
        name: &str,
        token: &Token,
    ) -> Result<SymbolId> {
        let key = match package {
            Some(package) => qualified_name(package, name),
            None => name.to_string(),
        };
        self.lookup_function(scope, &key)
            .or_else(|| self.lookup_function(scope, &qualified_name(BUILTIN_PACKAGE, name)))
            .ok_or_else(|| {
                let candidate = self.suggest(scope, name, Symbol::is_function);
                SemanticError::undefined_function(token, candidate.as_deref())
            })
    }

    fn lookup_function(&self, scope: ScopeId, key: &str) -> Option<SymbolId> {
        self.scopes
            .lookup(scope, key, false)
            .filter(|id| self.scopes.symbol(*id).map_or(false, Symbol::is_function))
    }

    /// Closest visible name of the wanted kind, for "did you mean" hints
    fn suggest(&self, scope: ScopeId, name: &str, wanted: fn(&Symbol) -> bool) -> Option<String> {
        let candidates = self
            .scopes
            .chain(scope)
            .flat_map(|table| table.entries())
            .filter(|(_, id)| self.scopes.symbol(*id).map_or(false, wanted))
            .map(|(key, _)| key.rsplit('.').next().unwrap_or(key));
        closest_match(name, candidates).map(str::to_string)
    }

    fn scope_name(&self, scope: ScopeId) -> String {
        self.scopes
            .get(scope)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }

    fn report_scope(&self, scope: ScopeId) {
        if self.config.dump_scopes {
            info!("{}", self.scopes.dump(scope));
        } else if log_enabled!(Level::Debug) {
            debug!("{}", self.scopes.dump(scope));
        }
    }
}
