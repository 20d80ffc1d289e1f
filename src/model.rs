use serde::Serialize;
use std::collections::BTreeMap;

/// One discovered declaration.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ApiItem {
    pub kind: String,
    pub name: String,
    pub signature: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiItem {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
        line: usize,
        description: Option<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            signature: signature.into(),
            line: line.max(1),
            description,
        }
    }
}

/// Extraction result for a single file. Items keep extractor order.
#[derive(Debug, Serialize, Clone)]
pub struct ModuleDoc {
    pub language: String,
    pub path: String,
    pub items: Vec<ApiItem>,
}

/// `source` contains an import specifier that resolves to `target`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct Inventory {
    pub modules: Vec<ModuleDoc>,
    pub edges: Vec<DependencyEdge>,
    pub counts: BTreeMap<String, usize>,
}

impl Inventory {
    pub fn total_items(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn module(&self, path: &str) -> Option<&ModuleDoc> {
        self.modules.iter().find(|module| module.path == path)
    }
}
