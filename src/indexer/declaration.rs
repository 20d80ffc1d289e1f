use crate::indexer::doc_comment::{CommentSyntax, doc_comment_before};
use crate::indexer::extract::LanguageExtractor;
use crate::model::ApiItem;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

/// Languages whose public surface is a visibility-qualified top-level
/// declaration that fits on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclFamily {
    Go,
    Rust,
    Java,
}

enum KindSource {
    Fixed(&'static str),
    /// Taken from the `kind` capture group.
    Captured,
}

struct DeclRule {
    kind: KindSource,
    re: Regex,
}

impl DeclRule {
    fn new(kind: KindSource, pattern: &str) -> Self {
        Self {
            kind,
            re: Regex::new(pattern).unwrap(),
        }
    }
}

// Rule order is priority order: the first matching rule claims the line.

static GO_RULES: LazyLock<Vec<DeclRule>> = LazyLock::new(|| {
    vec![
        DeclRule::new(
            KindSource::Fixed("function"),
            r"^func\s*(?:\(.*?\)\s*)?(?P<name>[A-Z][A-Za-z0-9_]*)\s*[\[(]",
        ),
        DeclRule::new(
            KindSource::Fixed("type"),
            r"^type\s+(?P<name>[A-Z][A-Za-z0-9_]*)(?:\[[^\]]*\])?\s+(?:struct|interface|func|map|chan|\[|\*)",
        ),
        DeclRule::new(
            KindSource::Fixed("const"),
            r"^const\s+(?P<name>[A-Z][A-Za-z0-9_]*)",
        ),
    ]
});

static RUST_RULES: LazyLock<Vec<DeclRule>> = LazyLock::new(|| {
    vec![
        DeclRule::new(
            KindSource::Fixed("function"),
            r#"^\s*pub\s+(?:(?:const|async|unsafe)\s+)*(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>[A-Za-z0-9_]+)"#,
        ),
        DeclRule::new(
            KindSource::Captured,
            r"^\s*pub\s+(?P<kind>struct|enum|trait|mod)\s+(?P<name>[A-Za-z0-9_]+)",
        ),
        DeclRule::new(
            KindSource::Captured,
            r"^\s*pub\s+(?P<kind>const)\s+(?P<name>[A-Za-z0-9_]+)",
        ),
    ]
});

static JAVA_RULES: LazyLock<Vec<DeclRule>> = LazyLock::new(|| {
    vec![
        DeclRule::new(
            KindSource::Captured,
            r"^\s*public\s+(?:(?:abstract|final|static|sealed)\s+)*(?P<kind>class|interface|enum|record)\s+(?P<name>[A-Za-z0-9_]+)",
        ),
        DeclRule::new(
            KindSource::Fixed("method"),
            r"^\s*public\s+(?:static\s+)?[\w<>,\[\]\s]+\s+(?P<name>[A-Za-z0-9_]+)\s*\(",
        ),
    ]
});

impl DeclFamily {
    fn rules(self) -> &'static [DeclRule] {
        match self {
            DeclFamily::Go => GO_RULES.as_slice(),
            DeclFamily::Rust => RUST_RULES.as_slice(),
            DeclFamily::Java => JAVA_RULES.as_slice(),
        }
    }

    /// Go declarations are matched after trimming; the others allow leading
    /// indentation in the pattern itself.
    fn trims_lines(self) -> bool {
        matches!(self, DeclFamily::Go)
    }
}

pub struct DeclarationScanExtractor {
    language: String,
    family: DeclFamily,
    comments: CommentSyntax,
}

impl DeclarationScanExtractor {
    pub fn new(language: &str, family: DeclFamily, comments: CommentSyntax) -> Self {
        Self {
            language: language.to_string(),
            family,
            comments,
        }
    }
}

impl LanguageExtractor for DeclarationScanExtractor {
    fn language(&self) -> &str {
        &self.language
    }

    fn extract(&mut self, source: &str) -> Result<Vec<ApiItem>> {
        Ok(scan_declarations(source, self.family, &self.comments))
    }
}

pub fn scan_declarations(source: &str, family: DeclFamily, comments: &CommentSyntax) -> Vec<ApiItem> {
    let lines: Vec<&str> = source.lines().collect();
    let mut items = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let candidate: &str = if family.trims_lines() { line.trim() } else { line };
        for rule in family.rules() {
            let Some(caps) = rule.re.captures(candidate) else {
                continue;
            };
            let Some(name) = caps.name("name") else {
                continue;
            };
            let kind = match rule.kind {
                KindSource::Fixed(kind) => kind,
                KindSource::Captured => caps.name("kind").map(|m| m.as_str()).unwrap_or("item"),
            };
            let line_number = idx + 1;
            items.push(ApiItem::new(
                kind,
                name.as_str(),
                *line,
                line_number,
                doc_comment_before(&lines, line_number, comments),
            ));
            break;
        }
    }
    items
}
