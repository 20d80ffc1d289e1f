use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};

pub fn read_to_string(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn normalize_rel_path(repo_root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(repo_root).with_context(|| {
        format!(
            "strip prefix {} from {}",
            repo_root.display(),
            path.display()
        )
    })?;
    Ok(normalize_path(rel))
}

pub fn normalize_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().to_string()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            _ => {}
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Directory part of a slash-separated relative path (`""` for top-level files).
pub fn parent_dir(rel_path: &str) -> &str {
    match rel_path.rfind('/') {
        Some(idx) => &rel_path[..idx],
        None => "",
    }
}

/// Lexically joins `relative` onto `base_dir`, folding `.` and `..`.
/// Returns `None` when the result would climb above the root.
pub fn join_relative(base_dir: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for part in relative.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Replaces (or adds) the extension of the last path segment. Leading-dot
/// names such as `.env` are treated as having no extension.
pub fn with_extension(rel_path: &str, ext: &str) -> String {
    let base = strip_extension(rel_path);
    if ext.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{ext}")
    }
}

pub fn strip_extension(rel_path: &str) -> &str {
    let file_start = rel_path.rfind('/').map(|idx| idx + 1).unwrap_or(0);
    let file = &rel_path[file_start..];
    match file.rfind('.') {
        Some(0) | None => rel_path,
        Some(dot) => &rel_path[..file_start + dot],
    }
}

pub fn extension(rel_path: &str) -> Option<&str> {
    let stripped = strip_extension(rel_path);
    if stripped.len() == rel_path.len() {
        None
    } else {
        Some(&rel_path[stripped.len() + 1..])
    }
}

/// Maps byte offsets to 1-based line numbers.
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        Self { starts }
    }

    pub fn line_of(&self, byte: usize) -> usize {
        match self.starts.binary_search(&byte) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

/// 1-based line lookup that tolerates out-of-range anchors.
pub fn line_at<'a>(lines: &[&'a str], line: usize) -> Option<&'a str> {
    if line == 0 {
        return None;
    }
    lines.get(line - 1).copied()
}
