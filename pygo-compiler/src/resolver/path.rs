/**
 * Path Resolver
 * Maps dotted module names onto package-relative or search-path source files
 */
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Source file of a package
pub const PACKAGE_INIT: &str = "__init__.py";

/// Suffix of module source files
pub const SOURCE_SUFFIX: &str = ".py";

/// Subdirectory of each search path root holding module sources
pub const NAMESPACE_DIR: [&str; 2] = ["src", "__python__"];

/// A successfully resolved module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Absolute dotted module name
    pub name: String,
    /// Source file backing the module
    pub script: PathBuf,
}

/// Package enclosing the module being compiled
#[derive(Debug, Clone, PartialEq, Eq)]
struct EnclosingPackage {
    dir: PathBuf,
    name: String,
}

/// Resolves imported modules based on a search path of directories.
///
/// Resolution order, first match wins:
/// 1. The package enclosing the compiled module, if any (`pkg.name`)
/// 2. Each search path root's `src/__python__` directory, in order
///
/// A module that cannot be found is `None`, never an error.
#[derive(Debug, Clone)]
pub struct PathResolver {
    dirs: Vec<PathBuf>,
    package: Option<EnclosingPackage>,
}

impl PathResolver {
    /// Create a resolver for imports made by `module_name`, whose source is `script`
    ///
    /// # Arguments
    /// * `roots` - Search path roots (e.g. the entries of `$GOPATH`)
    /// * `module_name` - Dotted name of the module being compiled
    /// * `script` - Source file of the module being compiled
    pub fn new<P: AsRef<Path>>(roots: &[P], module_name: &str, script: &Path) -> Self {
        let dirs = roots
            .iter()
            .map(|root| {
                NAMESPACE_DIR
                    .iter()
                    .fold(root.as_ref().to_path_buf(), |acc, part| acc.join(part))
            })
            .collect();

        Self {
            dirs,
            package: Self::enclosing_package(module_name, script),
        }
    }

    fn enclosing_package(module_name: &str, script: &Path) -> Option<EnclosingPackage> {
        let dir = script.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

        if script.file_name().is_some_and(|name| name == PACKAGE_INIT) {
            return Some(EnclosingPackage {
                dir,
                name: module_name.to_string(),
            });
        }

        match module_name.rsplit_once('.') {
            Some((parent, _)) if dir.join(PACKAGE_INIT).is_file() => Some(EnclosingPackage {
                dir,
                name: parent.to_string(),
            }),
            _ => None,
        }
    }

    /// Find a module, returning its absolute name and source file
    pub fn resolve(&self, name: &str) -> Option<ResolvedModule> {
        if let Some(package) = &self.package {
            if let Some(script) = find_script(&package.dir, name) {
                let resolved = ResolvedModule {
                    name: format!("{}.{}", package.name, name),
                    script,
                };
                debug!("resolved '{}' relative to package as '{}'", name, resolved.name);
                return Some(resolved);
            }
        }

        for dir in &self.dirs {
            if let Some(script) = find_script(dir, name) {
                debug!("resolved '{}' to {}", name, script.display());
                return Some(ResolvedModule {
                    name: name.to_string(),
                    script,
                });
            }
        }

        debug!("module '{}' not found", name);
        None
    }

    /// Name of the package enclosing the compiled module, if any
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    /// Search directories, already joined with the namespace subdirectory
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Look for `name` under `dir` as `a/b.py` first, then as package `a/b/__init__.py`
fn find_script(dir: &Path, name: &str) -> Option<PathBuf> {
    expand_candidates(dir, name).into_iter().find(|candidate| {
        trace!("probing {}", candidate.display());
        candidate.is_file()
    })
}

fn expand_candidates(dir: &Path, name: &str) -> [PathBuf; 2] {
    let prefix = name.split('.').fold(dir.to_path_buf(), |acc, part| acc.join(part));

    let mut module_file = prefix.clone().into_os_string();
    module_file.push(SOURCE_SUFFIX);

    [PathBuf::from(module_file), prefix.join(PACKAGE_INIT)]
}
