use crate::config::Config;
use crate::indexer::SourceFile;
use crate::indexer::extract::LanguageTable;
use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct LanguageFilter {
    pub name: &'static str,
    pub languages: &'static [&'static str],
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
    pub excluded_dirs: Vec<String>,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self {
            no_ignore,
            excluded_dirs: Config::default().excluded_dirs,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config, no_ignore: bool) -> Result<Self> {
        Ok(Self {
            no_ignore,
            include: compile_patterns(&config.include)?,
            exclude: compile_patterns(&config.exclude)?,
            excluded_dirs: config.excluded_dirs.clone(),
        })
    }

    fn accepts(&self, rel_path: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|re| re.is_match(rel_path)) {
            return false;
        }
        !self.exclude.iter().any(|re| re.is_match(rel_path))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).with_context(|| format!("invalid path pattern {pattern:?}")))
        .collect()
}

static LANGUAGE_FILTERS: &[LanguageFilter] = &[
    LanguageFilter {
        name: "javascript",
        languages: &["javascript"],
    },
    LanguageFilter {
        name: "js",
        languages: &["javascript"],
    },
    LanguageFilter {
        name: "jsx",
        languages: &["javascript"],
    },
    LanguageFilter {
        name: "node",
        languages: &["javascript"],
    },
    LanguageFilter {
        name: "typescript",
        languages: &["typescript"],
    },
    LanguageFilter {
        name: "ts",
        languages: &["typescript"],
    },
    LanguageFilter {
        name: "tsx",
        languages: &["typescript"],
    },
    LanguageFilter {
        name: "web",
        languages: &["javascript", "typescript"],
    },
    LanguageFilter {
        name: "python",
        languages: &["python"],
    },
    LanguageFilter {
        name: "py",
        languages: &["python"],
    },
    LanguageFilter {
        name: "go",
        languages: &["go"],
    },
    LanguageFilter {
        name: "golang",
        languages: &["go"],
    },
    LanguageFilter {
        name: "rust",
        languages: &["rust"],
    },
    LanguageFilter {
        name: "rs",
        languages: &["rust"],
    },
    LanguageFilter {
        name: "java",
        languages: &["java"],
    },
];

/// Expands aliases into table language names. Names that are not aliases
/// but exist in `table` pass through unchanged.
pub fn normalize_language_filter(
    raw: &[String],
    table: &LanguageTable,
) -> Result<Option<Vec<String>>> {
    let mut expanded: Vec<String> = Vec::new();
    for lang in raw {
        let key = lang.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        match expand_language(&key) {
            Some(values) => expanded.extend(values.iter().map(|s| s.to_string())),
            None if table.get(&key).is_some() => expanded.push(key),
            None => bail!(
                "unknown language filter: {lang} (known: {})",
                table.names().collect::<Vec<_>>().join(", ")
            ),
        }
    }
    if expanded.is_empty() {
        return Ok(None);
    }
    expanded.sort_unstable();
    expanded.dedup();
    Ok(Some(expanded))
}

fn expand_language(name: &str) -> Option<&'static [&'static str]> {
    LANGUAGE_FILTERS
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.languages)
}

pub fn scan_repo(
    repo_root: &Path,
    options: &ScanOptions,
    table: &LanguageTable,
) -> Result<Vec<ScannedFile>> {
    fs::read_dir(repo_root)
        .with_context(|| format!("read repository root {}", repo_root.display()))?;

    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(repo_root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let excluded_dirs = options.excluded_dirs.clone();
    let walker = builder
        .hidden(false)
        .filter_entry(move |entry| !is_excluded_dir(entry, &excluded_dirs))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let rel_path = crate::util::normalize_rel_path(repo_root, path)?;
        let Some(spec) = table.for_path(&rel_path) else {
            continue;
        };
        if !options.accepts(&rel_path) {
            debug!(path = %rel_path, "filtered out");
            continue;
        }
        files.push(ScannedFile {
            language: spec.name.clone(),
            abs_path: path.to_path_buf(),
            rel_path,
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

fn is_excluded_dir(entry: &ignore::DirEntry, excluded: &[String]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
    is_dir
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded.iter().any(|dir| dir == name))
}

/// Reads every scanned file. Unreadable files become empty text.
pub fn load_sources(files: &[ScannedFile]) -> Vec<SourceFile> {
    files
        .iter()
        .map(|file| {
            let text = match crate::util::read_to_string(&file.abs_path) {
                Ok(text) => text,
                Err(err) => {
                    warn!("read error {}: {err:#}", file.rel_path);
                    String::new()
                }
            };
            SourceFile {
                path: file.rel_path.clone(),
                language: file.language.clone(),
                text,
            }
        })
        .collect()
}
