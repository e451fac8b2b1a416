// Resolved imports and the local names they bind

pub mod analyzer;

pub use analyzer::{ImportAnalyzer, FUTURE_MODULE, NATIVE_MODULE_PREFIX};

use serde::Serialize;

/// Go package directory holding compiled Python modules
pub const PYTHON_PACKAGE_ROOT: &str = "__python__";

/// How a binding attaches to its module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    Module,
    Member,
}

/// One local name introduced by an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// `alias` names a module object. `depth` is how many leading components of
    /// the absolute name are exposed; 0 exposes the whole path.
    Module { alias: String, depth: usize },
    /// `alias` names attribute `name` of the module
    Member { alias: String, name: String },
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Module { .. } => BindingKind::Module,
            Binding::Member { .. } => BindingKind::Member,
        }
    }

    pub fn alias(&self) -> &str {
        match self {
            Binding::Module { alias, .. } | Binding::Member { alias, .. } => alias,
        }
    }
}

/// A single imported module and all its bindings.
///
/// One statement may produce several of these: `import foo, bar` yields one
/// for `foo` and one for `bar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// Absolute module name (native imports: the name after the prefix)
    pub name: String,
    pub is_native: bool,
    pub bindings: Vec<Binding>,
}

impl Import {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_native: false,
            bindings: Vec::new(),
        }
    }

    pub fn native(name: impl Into<String>) -> Self {
        Self {
            is_native: true,
            ..Self::new(name)
        }
    }

    pub fn add_module_binding(&mut self, alias: impl Into<String>, depth: usize) {
        self.bindings.push(Binding::Module {
            alias: alias.into(),
            depth,
        });
    }

    pub fn add_member_binding(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        self.bindings.push(Binding::Member {
            alias: alias.into(),
            name: name.into(),
        });
    }

    /// Go package path backing this module
    pub fn go_package(&self) -> String {
        let path = self.name.replace('.', "/");
        if self.is_native {
            path
        } else {
            format!("{}/{}", PYTHON_PACKAGE_ROOT, path)
        }
    }

    /// Local Go name under which the package is imported
    pub fn package_alias(&self) -> String {
        format!("π_{}", self.name.replace('.', "_"))
    }

    /// Module path a module binding of the given depth refers to
    pub fn exposed_module(&self, depth: usize) -> &str {
        if depth == 0 {
            return &self.name;
        }
        match self.name.match_indices('.').nth(depth - 1) {
            Some((end, _)) => self.name.get(..end).unwrap_or(&self.name),
            None => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposed_module() {
        let imp = Import::new("a.b.c");
        assert_eq!(imp.exposed_module(0), "a.b.c");
        assert_eq!(imp.exposed_module(1), "a");
        assert_eq!(imp.exposed_module(2), "a.b");
        assert_eq!(imp.exposed_module(3), "a.b.c");
        assert_eq!(imp.exposed_module(7), "a.b.c");
    }

    #[test]
    fn test_go_package() {
        assert_eq!(Import::new("a.b").go_package(), "__python__/a/b");
        assert_eq!(Import::native("net.http").go_package(), "net/http");
        assert_eq!(Import::new("a.b").package_alias(), "π_a_b");
    }

    #[test]
    fn test_bindings() {
        let mut imp = Import::native("fmt");
        imp.add_member_binding("say", "Println");
        imp.add_module_binding("fmt", 0);

        assert!(imp.is_native);
        assert_eq!(imp.bindings[0].kind(), BindingKind::Member);
        assert_eq!(imp.bindings[0].alias(), "say");
        assert_eq!(imp.bindings[1].kind(), BindingKind::Module);
    }

    #[test]
    fn test_serialize() {
        let mut imp = Import::new("os.path");
        imp.add_module_binding("os", 1);
        let json = serde_json::to_value(&imp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "os.path",
                "is_native": false,
                "bindings": [{"kind": "module", "alias": "os", "depth": 1}],
            })
        );
    }
}
