// Import statement analysis: turns parsed import statements into Imports

use super::Import;
use crate::error::{CompileError, Result};
use crate::resolver::PathResolver;
use log::debug;
use pygo_ast::{Alias, ImportStmt};

/// Prefix marking a native module with no source form
pub const NATIVE_MODULE_PREFIX: &str = "__go__.";

/// Pseudo-module enabling future semantics; imports from it bind nothing
pub const FUTURE_MODULE: &str = "__future__";

/// Visits import statements and produces the corresponding Imports, in order
pub struct ImportAnalyzer<'a> {
    resolver: &'a PathResolver,
    imports: Vec<Import>,
}

impl<'a> ImportAnalyzer<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self {
            resolver,
            imports: Vec::new(),
        }
    }

    /// Imports produced so far
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn into_imports(self) -> Vec<Import> {
        self.imports
    }

    pub fn visit_all<'s>(&mut self, stmts: impl IntoIterator<Item = &'s ImportStmt>) -> Result<()> {
        for stmt in stmts {
            self.visit(stmt)?;
        }
        Ok(())
    }

    pub fn visit(&mut self, stmt: &ImportStmt) -> Result<()> {
        match stmt {
            ImportStmt::Import { names, line } => self.visit_import(names, *line),
            ImportStmt::ImportFrom {
                module,
                names,
                line,
            } => self.visit_import_from(module, names, *line),
        }
    }

    fn visit_import(&mut self, names: &[Alias], line: u32) -> Result<()> {
        for alias in names {
            check_dotted_name(&alias.name, line)?;
            if alias.name.starts_with(NATIVE_MODULE_PREFIX) {
                return Err(CompileError::import(
                    Some(line),
                    "for native imports use \"from __go__.xyz import ...\" syntax",
                ));
            }

            let mut imp = self.resolve_import(&alias.name, line)?;
            match &alias.asname {
                Some(asname) => imp.add_module_binding(asname, 0),
                None => {
                    // `import a.b.c` binds only `a`, anchored to the resolved module
                    let depth = dot_count(&imp.name) - dot_count(&alias.name) + 1;
                    let top = alias.name.split('.').next().unwrap_or(&alias.name);
                    imp.add_module_binding(top, depth);
                }
            }
            self.push(imp);
        }
        Ok(())
    }

    fn visit_import_from(&mut self, module: &str, names: &[Alias], line: u32) -> Result<()> {
        if names.iter().any(Alias::is_wildcard) {
            return Err(CompileError::import(
                Some(line),
                format!(
                    "wildcard member import is not implemented: from {} import *",
                    module
                ),
            ));
        }

        if module == FUTURE_MODULE {
            return Ok(());
        }

        check_dotted_name(module, line)?;
        if names.is_empty() {
            return Err(CompileError::parse(
                Some(line),
                format!("from {} import: no names given", module),
            ));
        }

        if let Some(native) = module.strip_prefix(NATIVE_MODULE_PREFIX) {
            let mut imp = Import::native(native);
            for alias in names {
                imp.add_member_binding(alias.local_name(), &alias.name);
            }
            self.push(imp);
            return Ok(());
        }

        let mut members: Option<MemberImport> = None;
        for alias in names {
            let submodule = format!("{}.{}", module, alias.name);
            if let Some(resolved) = self.resolver.resolve(&submodule) {
                // The imported name is a submodule within a package, so bind that module
                let mut imp = Import::new(resolved.name);
                imp.add_module_binding(alias.local_name(), 0);
                self.push(imp);
                continue;
            }

            if members.is_none() {
                members = Some(MemberImport {
                    import: self.resolve_import(module, line)?,
                    position: self.imports.len(),
                });
            }
            if let Some(member) = members.as_mut() {
                member.import.add_member_binding(alias.local_name(), &alias.name);
            }
        }

        if let Some(MemberImport { import, position }) = members {
            debug!("import {} ({} members)", import.name, import.bindings.len());
            self.imports.insert(position, import);
        }
        Ok(())
    }

    fn resolve_import(&self, name: &str, line: u32) -> Result<Import> {
        self.resolver
            .resolve(name)
            .map(|resolved| Import::new(resolved.name))
            .ok_or_else(|| CompileError::import(Some(line), format!("no such module: {}", name)))
    }

    fn push(&mut self, imp: Import) {
        debug!("import {} ({} bindings)", imp.name, imp.bindings.len());
        self.imports.push(imp);
    }
}

/// Member bindings of one from-statement. The module is resolved once, when
/// the first plain member is seen, and the Import keeps the position that
/// first member would have had.
struct MemberImport {
    import: Import,
    position: usize,
}

fn dot_count(name: &str) -> usize {
    name.matches('.').count()
}

fn check_dotted_name(name: &str, line: u32) -> Result<()> {
    if name.split('.').any(str::is_empty) {
        return Err(CompileError::parse(
            Some(line),
            format!("malformed module name: '{}'", name),
        ));
    }
    Ok(())
}
