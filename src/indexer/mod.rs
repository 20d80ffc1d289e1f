use crate::indexer::extract::{Capability, LanguageExtractor, LanguageTable};
use crate::indexer::imports::{ModuleResolver, extract_specifiers};
use crate::model::{ApiItem, DependencyEdge, Inventory, ModuleDoc};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

pub mod component;
pub mod declaration;
pub mod doc_comment;
pub mod extract;
pub mod imports;
pub mod javascript;
pub mod python;
pub mod scan;

/// One input file: repo-relative path, table language name and full text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub language: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            text: text.into(),
        }
    }
}

pub struct Indexer {
    table: LanguageTable,
    extractors: HashMap<String, Box<dyn LanguageExtractor>>,
}

impl Indexer {
    pub fn new(table: LanguageTable) -> Result<Self> {
        let mut extractors: HashMap<String, Box<dyn LanguageExtractor>> = HashMap::new();
        for spec in table.specs() {
            extractors.insert(spec.name.clone(), extract::extractor_for(spec)?);
        }
        Ok(Self { table, extractors })
    }

    /// Items for one file. Extractor failures are logged and yield nothing.
    pub fn extract_file(&mut self, file: &SourceFile) -> Vec<ApiItem> {
        let Some(extractor) = self.extractors.get_mut(&file.language) else {
            debug!(path = %file.path, language = %file.language, "no extractor");
            return Vec::new();
        };
        match extractor.extract(&file.text) {
            Ok(items) => items,
            Err(err) => {
                warn!("extract error {}: {err:#}", file.path);
                Vec::new()
            }
        }
    }

    pub fn run(&mut self, files: &[SourceFile]) -> Inventory {
        let start = Instant::now();
        let resolver = ModuleResolver::new(files.iter().map(|file| {
            let dotted = self
                .table
                .get(&file.language)
                .is_some_and(|spec| spec.capability == Capability::IndentedDoc);
            (file.path.as_str(), dotted)
        }));
        debug!(entries = resolver.index().len(), "module index built");

        let mut inventory = Inventory::default();
        for file in files {
            let items = self.extract_file(file);
            if items.is_empty() {
                debug!(path = %file.path, "no public declarations");
                continue;
            }
            *inventory.counts.entry(file.language.clone()).or_insert(0) += items.len();
            inventory.modules.push(ModuleDoc {
                language: file.language.clone(),
                path: file.path.clone(),
                items,
            });

            let Some(grammar) = self.table.get(&file.language).map(|spec| spec.imports) else {
                continue;
            };
            for specifier in extract_specifiers(grammar, &file.text) {
                for target in resolver.resolve(&file.path, &specifier, grammar) {
                    inventory.edges.push(DependencyEdge {
                        source: file.path.clone(),
                        target,
                    });
                }
            }
        }
        inventory.modules.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            files = files.len(),
            modules = inventory.modules.len(),
            items = inventory.total_items(),
            edges = inventory.edges.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "indexed"
        );
        inventory
    }
}

/// Scans `repo_root`, loads every matching file and indexes it.
pub fn index_repo(
    repo_root: &Path,
    table: LanguageTable,
    options: &scan::ScanOptions,
) -> Result<Inventory> {
    let scanned = scan::scan_repo(repo_root, options, &table)?;
    info!(files = scanned.len(), root = %repo_root.display(), "scanned");
    let sources = scan::load_sources(&scanned);
    let mut indexer = Indexer::new(table)?;
    Ok(indexer.run(&sources))
}
