// Configuration for docsgen.
// Read from a JSON file in the repository root, then overridden by
// DOCSGEN_* environment variables and finally by CLI flags.

use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAMES: &[&str] = &["docsgen.json", ".docsgen.json"];

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "out",
    "target",
    "bin",
    "obj",
    "venv",
    ".venv",
    "__pycache__",
    ".next",
    ".nuxt",
    ".vercel",
    ".cache",
    "coverage",
    ".idea",
    ".vscode",
];

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `API_FULL.md` with every module.
    Single,
    /// One page per module under `api/<language>/`.
    Split,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn writes_single(self) -> bool {
        matches!(self, OutputFormat::Single | OutputFormat::Both)
    }

    pub fn writes_split(self) -> bool {
        matches!(self, OutputFormat::Split | OutputFormat::Both)
    }
}

/// Settings file contents (`docsgen.json`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Regexes a relative path must match (any) to be scanned.
    pub include: Vec<String>,
    /// Regexes that drop a relative path when any matches.
    pub exclude: Vec<String>,
    /// Language names or aliases; a comma-separated string is accepted too.
    #[serde(deserialize_with = "string_or_list")]
    pub languages: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    /// Directory names never descended into.
    pub excluded_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            languages: Vec::new(),
            output_dir: None,
            format: OutputFormat::default(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Config {
    /// Loads the explicit path if given, otherwise the first config file found
    /// in `repo_root`. Unreadable or invalid files fall through to defaults.
    pub fn load(repo_root: &Path, explicit: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => CONFIG_FILE_NAMES
                .iter()
                .map(|name| repo_root.join(name))
                .collect(),
        };
        let mut config = candidates
            .iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config");
                    Some(config)
                }
                Err(err) => {
                    warn!(path = %path.display(), "ignoring config: {err:#}");
                    None
                }
            })
            .unwrap_or_default();
        config.apply_env();
        config
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = crate::util::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn apply_env(&mut self) {
        if let Ok(val) = env::var("DOCSGEN_OUTPUT_DIR") {
            if !val.trim().is_empty() {
                self.output_dir = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = env::var("DOCSGEN_FORMAT") {
            match OutputFormat::from_str(&val, true) {
                Ok(format) => self.format = format,
                Err(_) => warn!(
                    "Invalid DOCSGEN_FORMAT value: {}, using: {:?}",
                    val, self.format
                ),
            }
        }
    }

    /// CLI values replace config values when present.
    pub fn with_overrides(
        mut self,
        include: &[String],
        exclude: &[String],
        languages: Option<&str>,
    ) -> Self {
        if !include.is_empty() {
            self.include = include.to_vec();
        }
        if !exclude.is_empty() {
            self.exclude = exclude.to_vec();
        }
        if let Some(languages) = languages {
            self.languages = split_languages(languages);
        }
        self
    }
}

fn split_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|lang| lang.trim().to_ascii_lowercase())
        .filter(|lang| !lang.is_empty())
        .collect()
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Languages {
        Csv(String),
        List(Vec<String>),
    }

    Ok(match Languages::deserialize(deserializer)? {
        Languages::Csv(raw) => split_languages(&raw),
        Languages::List(list) => list
            .iter()
            .flat_map(|entry| split_languages(entry))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.include.is_empty());
        assert_eq!(config.format, OutputFormat::Both);
        assert!(config.excluded_dirs.iter().any(|d| d == "node_modules"));
    }

    #[test]
    fn parses_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"languages": "Python, ts", "format": "split"}"#).unwrap();
        assert_eq!(config.languages, vec!["python", "ts"]);
        assert_eq!(config.format, OutputFormat::Split);
        assert!(config.excluded_dirs.iter().any(|d| d == ".git"));

        let config: Config = serde_json::from_str(r#"{"languages": ["go", "rust"]}"#).unwrap();
        assert_eq!(config.languages, vec!["go", "rust"]);
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let config = Config {
            include: vec!["^src/".to_string()],
            ..Config::default()
        }
        .with_overrides(&[], &["test".to_string()], Some("py"));
        assert_eq!(config.include, vec!["^src/"]);
        assert_eq!(config.exclude, vec!["test"]);
        assert_eq!(config.languages, vec!["py"]);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docsgen.json"), "{ not json").unwrap();
        let config = Config::load(dir.path(), None);
        assert_eq!(config.include, Config::default().include);
        assert_eq!(config.excluded_dirs, Config::default().excluded_dirs);
    }
}
