//! Import resolution and Go code emission for the pygo compiler

pub mod block;
pub mod config;
pub mod error;
pub mod imports;
pub mod resolver;
pub mod writer;

pub use block::FunctionBlock;
pub use config::CompilerConfig;
pub use error::{CompileError, ConfigError, Result};
pub use imports::{Binding, BindingKind, Import, ImportAnalyzer};
pub use resolver::{PathResolver, ResolvedModule};
pub use writer::{CheckpointSet, CodeWriter, TempVar};

use pygo_ast::ImportStmt;

/// Resolve every import statement of a module, in statement order
pub fn analyze_imports<'s>(
    resolver: &PathResolver,
    stmts: impl IntoIterator<Item = &'s ImportStmt>,
) -> Result<Vec<Import>> {
    let mut analyzer = ImportAnalyzer::new(resolver);
    analyzer.visit_all(stmts)?;
    Ok(analyzer.into_imports())
}
