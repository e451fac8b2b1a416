use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pygo_ast::ImportStmt;
use pygo_compiler::config::parse_search_path;
use pygo_compiler::{CodeWriter, CompilerConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pygo")]
#[command(version)]
#[command(about = "Python to Go compiler: import resolution and code emission", long_about = None)]
struct Cli {
    #[command(flatten)]
    module: ModuleArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Which module is being compiled and where its imports are searched for
#[derive(Args)]
struct ModuleArgs {
    /// JSON config file (overrides the flags below)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Search path roots, separated like $PATH (default: $GOPATH)
    #[arg(long, global = true, value_name = "PATHS")]
    gopath: Option<String>,

    /// Dotted name of the module being compiled
    #[arg(long, global = true, default_value = "__main__")]
    modname: String,

    /// Source file of the module being compiled
    #[arg(long, global = true, value_name = "FILE", default_value = "__main__.py")]
    script: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve dotted module names against the search path
    Resolve {
        /// Module names to resolve
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },

    /// Analyze import statements (JSON array) and print the resulting imports
    Imports {
        /// File containing the parsed import statements
        #[arg(value_name = "STMTS")]
        input: PathBuf,

        /// Print only the Go import block
        #[arg(long)]
        go: bool,
    },
}

impl ModuleArgs {
    fn load(&self) -> Result<CompilerConfig> {
        let config = match (&self.config, &self.gopath) {
            (Some(path), _) => CompilerConfig::from_file(path)?,
            (None, Some(gopath)) => CompilerConfig::new(
                parse_search_path(gopath.as_str()),
                self.modname.as_str(),
                self.script.as_path(),
            )?,
            (None, None) => CompilerConfig::from_env(self.modname.as_str(), self.script.as_path())?,
        };
        log::info!(
            "Compiling {} ({:?}), search path: {:?}",
            config.module_name,
            config.script,
            config.search_path
        );
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.module.load()?;
    let resolver = config.path_resolver();

    match cli.command {
        Commands::Resolve { names } => {
            for name in names {
                match resolver.resolve(&name) {
                    Some(resolved) => {
                        println!("{} -> {} ({})", name, resolved.name, resolved.script.display())
                    }
                    None => println!("{} -> not found", name),
                }
            }
            Ok(())
        }

        Commands::Imports { input, go } => {
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            let stmts: Vec<ImportStmt> = serde_json::from_str(&source)
                .with_context(|| format!("Invalid import statements in {:?}", input))?;

            let imports = pygo_compiler::analyze_imports(&resolver, &stmts)
                .with_context(|| format!("{}: import analysis failed", config.module_name))?;
            log::info!("{} imports resolved", imports.len());

            if go {
                let mut writer = CodeWriter::new();
                writer.write_import_block(
                    imports
                        .iter()
                        .map(|imp| (imp.go_package(), imp.package_alias())),
                );
                print!("{}", writer.finish());
            } else {
                println!("{}", serde_json::to_string_pretty(&imports)?);
            }
            Ok(())
        }
    }
}
