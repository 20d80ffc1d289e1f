use crate::indexer::python::module_name_from_rel_path;
use crate::util::{join_relative, parent_dir, strip_extension, with_extension};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportGrammar {
    EcmaScript,
    Python,
    /// The language contributes no specifiers.
    None,
}

static ECMASCRIPT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?m)^[ \t]*import\s+(?:type\s+)?(?:[\w$*\s,]*\{[^}]*\}[\w$\s,]*|[^;'"\n]*?)\s*from\s*['"]([^'"]+)['"]"#,
        r#"(?m)^[ \t]*import\s*['"]([^'"]+)['"]"#,
        r#"(?m)^[ \t]*(?:const|let|var)\s+[^=\n]*?=\s*require\(\s*['"]([^'"]+)['"]\s*\)"#,
        r#"(?m)^[ \t]*export\s+\*\s+(?:as\s+[\w$]+\s+)?from\s*['"]([^'"]+)['"]"#,
        r#"(?m)^[ \t]*export\s+(?:type\s+)?\{[^}]*\}\s*from\s*['"]([^'"]+)['"]"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static PYTHON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^[ \t]*from\s+([\w.]+)\s+import\s+",
        r"(?m)^[ \t]*import\s+([\w.]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Probed, in order, after the specifier as written.
pub const EXTENSION_CANDIDATES: &[&str] = &["ts", "tsx", "js", "jsx", "py"];

/// Raw specifiers as written, unique by text, in first-seen order.
pub fn extract_specifiers(grammar: ImportGrammar, source: &str) -> Vec<String> {
    let patterns: &[Regex] = match grammar {
        ImportGrammar::EcmaScript => ECMASCRIPT_PATTERNS.as_slice(),
        ImportGrammar::Python => PYTHON_PATTERNS.as_slice(),
        ImportGrammar::None => return Vec::new(),
    };
    let mut seen = HashSet::new();
    let mut specifiers = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(source) {
            if let Some(spec) = caps.get(1) {
                if seen.insert(spec.as_str()) {
                    specifiers.push(spec.as_str().to_string());
                }
            }
        }
    }
    specifiers
}

/// Normalized specifier forms → file, for non-relative lookups. Later
/// insertions win.
#[derive(Debug, Default, Clone)]
pub struct RepoModuleIndex {
    entries: HashMap<String, String>,
}

impl RepoModuleIndex {
    /// Registers `rel_path` under its extension-stripped slash path, and for
    /// indentation-structured languages under its dotted module path too.
    pub fn insert(&mut self, rel_path: &str, dotted: bool) {
        let stem = strip_extension(rel_path);
        self.entries.insert(stem.to_string(), rel_path.to_string());
        if dotted {
            self.entries
                .insert(stem.replace('/', "."), rel_path.to_string());
            self.entries
                .insert(module_name_from_rel_path(rel_path), rel_path.to_string());
        }
    }

    pub fn get(&self, specifier: &str) -> Option<&str> {
        self.entries.get(specifier).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves specifiers against the files known to one run.
#[derive(Debug, Default, Clone)]
pub struct ModuleResolver {
    known: HashSet<String>,
    index: RepoModuleIndex,
    extensions: Vec<String>,
}

impl ModuleResolver {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let mut resolver = Self {
            extensions: EXTENSION_CANDIDATES.iter().map(|ext| ext.to_string()).collect(),
            ..Self::default()
        };
        for (rel_path, dotted) in files {
            resolver.known.insert(rel_path.to_string());
            resolver.index.insert(rel_path, dotted);
        }
        resolver
    }

    pub fn index(&self) -> &RepoModuleIndex {
        &self.index
    }

    /// Every known file `specifier` may refer to from `importer`. Relative
    /// specifiers yield one target per matching probe, so the as-is probe and
    /// an extension probe naming the same file both count.
    pub fn resolve(&self, importer: &str, specifier: &str, grammar: ImportGrammar) -> Vec<String> {
        if !specifier.starts_with('.') {
            return self
                .index
                .get(specifier)
                .map(|target| vec![target.to_string()])
                .unwrap_or_default();
        }
        let relative = match grammar {
            ImportGrammar::Python => python_relative_path(specifier),
            _ => specifier.to_string(),
        };
        let Some(joined) = join_relative(parent_dir(importer), &relative) else {
            return Vec::new();
        };
        let probes = std::iter::once(joined.clone()).chain(
            self.extensions
                .iter()
                .map(|ext| with_extension(&joined, ext)),
        );
        probes.filter(|probe| self.known.contains(probe)).collect()
    }
}

/// `.mod` → `./mod`, `..pkg.mod` → `../pkg/mod`, `.` → `./__init__`.
fn python_relative_path(specifier: &str) -> String {
    let rest = specifier.trim_start_matches('.');
    let depth = specifier.len() - rest.len();
    let mut path = if depth <= 1 {
        "./".to_string()
    } else {
        "../".repeat(depth - 1)
    };
    if rest.is_empty() {
        path.push_str("__init__");
    } else {
        path.push_str(&rest.replace('.', "/"));
    }
    path
}
