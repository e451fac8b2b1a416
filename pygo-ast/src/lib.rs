use serde::{Deserialize, Serialize};

/// One imported name: `a.b.c` or `a.b.c as x`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    #[serde(default)]
    pub asname: Option<String>,
}

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asname: None,
        }
    }

    pub fn with_asname(name: impl Into<String>, asname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asname: Some(asname.into()),
        }
    }

    /// Local name bound by a member import: the alias if present, otherwise the name itself
    pub fn local_name(&self) -> &str {
        self.asname.as_deref().unwrap_or(&self.name)
    }

    /// True for the `*` of `from m import *`
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

/// Import statement, as handed over by the parser.
///
/// Only the two import shapes are represented; every other statement is
/// lowered elsewhere and never reaches import analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportStmt {
    /// `import a.b, c as d`
    Import { names: Vec<Alias>, line: u32 },
    /// `from m import n1 as a1, n2`
    ImportFrom {
        module: String,
        names: Vec<Alias>,
        line: u32,
    },
}

impl ImportStmt {
    /// Source line the statement starts on
    pub fn line(&self) -> u32 {
        match self {
            ImportStmt::Import { line, .. } | ImportStmt::ImportFrom { line, .. } => *line,
        }
    }

    pub fn names(&self) -> &[Alias] {
        match self {
            ImportStmt::Import { names, .. } | ImportStmt::ImportFrom { names, .. } => names,
        }
    }
}
