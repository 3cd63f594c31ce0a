//! Sable - semantic checker for the script language
//!
//! # Usage
//!
//! ```bash
//! # Check a parsed program (JSON AST from the parser)
//! sable check program.json
//!
//! # Show source snippets in diagnostics
//! sable check program.json --source program.sb
//!
//! # Print the annotated AST and every scope table
//! sable check program.json --emit-ast --dump-scopes
//!
//! # List builtin and package functions
//! sable catalog --config sable.toml
//! ```

use clap::{Parser, Subcommand};
use diagnostics::{ErrorFormatter, SourceMap};
use log::LevelFilter;
use semantic::{logging, Analyzer, Config};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "sable")]
#[command(version = "0.1.0")]
#[command(about = "Sable - scope and name resolution checker for scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every name in a parsed program
    Check {
        /// Path to the program's JSON AST
        file: PathBuf,

        /// Script source, used for diagnostic snippets
        #[arg(long)]
        source: Option<PathBuf>,

        /// Analyzer configuration (defaults to ./sable.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print every scope table after analysis
        #[arg(long)]
        dump_scopes: bool,

        /// Print the annotated AST as JSON
        #[arg(long)]
        emit_ast: bool,

        /// Colour diagnostics
        #[arg(long)]
        color: bool,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the functions visible to programs
    Catalog {
        /// Analyzer configuration (defaults to ./sable.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            file,
            source,
            config,
            dump_scopes,
            emit_ast,
            color,
            verbose,
        } => {
            if verbose {
                logging::init_with_level(LevelFilter::Debug);
            } else {
                logging::init_from_env_or_default();
            }
            check_file(&file, source.as_deref(), config.as_deref(), dump_scopes, emit_ast, color)
        }
        Commands::Catalog { config } => {
            logging::init_from_env_or_default();
            show_catalog(config.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    Config::discover(path).map_err(|e| e.to_string())
}

fn check_file(
    file: &Path,
    source: Option<&Path>,
    config: Option<&Path>,
    dump_scopes: bool,
    emit_ast: bool,
    color: bool,
) -> Result<(), String> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()));
    }
    let config = load_config(config)?;

    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read file: {}", e))?;
    let mut program = ast::Program::from_json(&json)
        .map_err(|e| format!("Invalid AST in {}: {}", file.display(), e))?;

    let mut source_map = SourceMap::new();
    let file_id = match source {
        Some(path) => source_map
            .load_file(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => source_map.add_placeholder(file.display().to_string()),
    };

    let analysis = match Analyzer::from_config(&config).analyze(&mut program) {
        Ok(analysis) => analysis,
        Err(error) => {
            let formatter = if color {
                ErrorFormatter::with_colors()
            } else {
                ErrorFormatter::new()
            };
            let diagnostic = error.to_diagnostic(file_id);
            eprint!("{}", formatter.format_diagnostic(&diagnostic, &source_map));
            return Err(format!("{} failed semantic analysis", file.display()));
        }
    };

    if emit_ast {
        let annotated = serde_json::to_string_pretty(&program)
            .map_err(|e| format!("Failed to encode AST: {}", e))?;
        println!("{}", annotated);
    }
    if dump_scopes {
        print!("{}", analysis.dump_all());
    }

    println!("✓ {}: OK", file.display());
    Ok(())
}

fn show_catalog(config: Option<&Path>) -> Result<(), String> {
    let catalog = load_config(config)?.catalog();

    let names = |templates: &[semantic::FunctionTemplate]| {
        templates.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    };

    println!("Builtin functions:");
    println!("  {}", names(catalog.builtins()));
    println!("Iteration functions:");
    println!("  {}", names(catalog.iteration()));
    println!("Packages:");
    for (package, exports) in catalog.packages() {
        println!("  {:<10} {}", package, names(exports));
    }
    Ok(())
}
