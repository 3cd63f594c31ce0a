//! TOML configuration for `sable.toml`.
//!
//! ```toml
//! [analyzer]
//! max-depth = 256
//! dump-scopes = false
//!
//! [packages]
//! geo = ["distance", "bearing"]
//! ```

use crate::catalog::Catalog;
use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Default file name looked up next to the program
pub const DEFAULT_CONFIG_FILE: &str = "sable.toml";

/// Nesting limit used when the configuration does not set one
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    /// Extra importable packages: package name -> exported function names
    #[serde(default)]
    pub packages: IndexMap<String, Vec<String>>,
}

/// `[analyzer]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Deepest node nesting the analyzer will walk
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Log every scope table as it is left
    #[serde(default)]
    pub dump_scopes: bool,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            dump_scopes: false,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load `path` if given, else `sable.toml` in the working directory if
    /// present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The standard catalog plus the packages configured here
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::standard();
        catalog.extend_packages(&self.packages);
        catalog
    }
}
