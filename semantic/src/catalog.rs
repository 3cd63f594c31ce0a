//! Builtin function and package catalogs
//!
//! The analyzer reads these tables when it enters a program (builtins and
//! iteration functions) and when it meets an import (package exports). Each
//! entry is only a template: a name plus the runtime entry point that backs
//! it. Builtins are registered under the reserved `builtin` package so they
//! never collide with user functions of the same bare name.

use crate::symbols::{FunctionSymbol, NativeHook};
use indexmap::IndexMap;

/// Reserved package holding builtin and iteration functions
pub const BUILTIN_PACKAGE: &str = "builtin";

/// A function exported by the runtime, before it is placed in a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTemplate {
    pub name: String,
    pub native: String,
}

impl FunctionTemplate {
    pub fn new(name: impl Into<String>, native: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native: native.into(),
        }
    }

    /// Fresh symbol for this template under `package`
    pub fn instantiate(&self, package: &str) -> FunctionSymbol {
        FunctionSymbol::new(self.name.clone())
            .in_package(package)
            .with_native(NativeHook::new(self.native.clone()))
    }
}

const BUILTIN_FUNCTIONS: &[&str] = &[
    "len", "str", "int", "float", "type", "append", "keys", "values",
];

const ITERATION_FUNCTIONS: &[&str] = &["range", "each", "map", "filter", "reduce"];

const STANDARD_PACKAGES: &[(&str, &[&str])] = &[
    ("math", &["sqrt", "pow", "abs", "floor", "ceil", "max", "min"]),
    ("strings", &["upper", "lower", "contains", "split", "join", "trim"]),
    ("time", &["now", "sleep", "format"]),
];

/// Runtime entry point naming: `script_<package>_<name>`
fn native_entry(package: &str, name: &str) -> String {
    format!("script_{}_{}", package, name)
}

fn templates(package: &str, names: &[&str]) -> Vec<FunctionTemplate> {
    names
        .iter()
        .map(|name| FunctionTemplate::new(*name, native_entry(package, name)))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    builtins: Vec<FunctionTemplate>,
    iteration: Vec<FunctionTemplate>,
    packages: IndexMap<String, Vec<FunctionTemplate>>,
}

impl Catalog {
    /// A catalog with nothing in it; useful for isolating tests
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog shipped with the runtime
    pub fn standard() -> Self {
        Self {
            builtins: templates(BUILTIN_PACKAGE, BUILTIN_FUNCTIONS),
            iteration: templates(BUILTIN_PACKAGE, ITERATION_FUNCTIONS),
            packages: STANDARD_PACKAGES
                .iter()
                .map(|(package, names)| (package.to_string(), templates(package, names)))
                .collect(),
        }
    }

    pub fn builtins(&self) -> &[FunctionTemplate] {
        &self.builtins
    }

    pub fn iteration(&self) -> &[FunctionTemplate] {
        &self.iteration
    }

    /// Exports of `package`, or `None` if no such package exists
    pub fn package(&self, package: &str) -> Option<&[FunctionTemplate]> {
        self.packages.get(package).map(Vec::as_slice)
    }

    pub fn packages(&self) -> impl Iterator<Item = (&str, &[FunctionTemplate])> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Add functions to `package`, creating it if needed. Names already
    /// exported by the package are left alone.
    pub fn add_package<I, S>(&mut self, package: &str, functions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exports = self.packages.entry(package.to_string()).or_default();
        for name in functions {
            let name = name.as_ref();
            if !exports.iter().any(|t| t.name == name) {
                exports.push(FunctionTemplate::new(name, native_entry(package, name)));
            }
        }
    }

    /// Merge extra packages, e.g. from the `[packages]` configuration section
    pub fn extend_packages(&mut self, packages: &IndexMap<String, Vec<String>>) {
        for (package, functions) in packages {
            self.add_package(package, functions);
        }
    }
}
