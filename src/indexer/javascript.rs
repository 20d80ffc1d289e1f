use crate::indexer::component::ComponentClassifier;
use crate::indexer::doc_comment::{CommentSyntax, doc_comment_before};
use crate::indexer::extract::LanguageExtractor;
use crate::model::ApiItem;
use crate::util::{LineIndex, line_at};
use anyhow::Result;
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportPattern {
    Declaration(&'static str),
    Default,
    NamedList,
    ReexportAll,
    CommonJsObject,
    CommonJsProperty,
}

const IDENT: &str = "[A-Za-z0-9_$]+";

/// One pass per pattern, in this order. Results are concatenated pass by
/// pass, so the output is grouped by category rather than sorted by line.
static EXPORT_PATTERNS: LazyLock<Vec<(ExportPattern, Regex)>> = LazyLock::new(|| {
    let decl = r"(?m)^[ \t]*export\s+(?:declare\s+)?";
    let patterns = [
        (
            ExportPattern::Declaration("function"),
            format!(r"{decl}(?:async\s+)?function(?:\s*\*\s*|\s+)({IDENT})\s*[<(]"),
        ),
        (
            ExportPattern::Declaration("class"),
            format!(r"{decl}(?:abstract\s+)?class\s+({IDENT})"),
        ),
        (
            ExportPattern::Declaration("const"),
            format!(r"{decl}const\s+({IDENT})\s*(?::[^=\n]+)?="),
        ),
        (
            ExportPattern::Declaration("let"),
            format!(r"{decl}let\s+({IDENT})\s*(?::[^=\n]+)?="),
        ),
        (
            ExportPattern::Declaration("var"),
            format!(r"{decl}var\s+({IDENT})\s*(?::[^=\n]+)?="),
        ),
        (
            ExportPattern::Declaration("type"),
            format!(r"{decl}type\s+({IDENT})\b"),
        ),
        (
            ExportPattern::Declaration("interface"),
            format!(r"{decl}interface\s+({IDENT})\b"),
        ),
        (
            ExportPattern::Declaration("enum"),
            format!(r"{decl}(?:const\s+)?enum\s+({IDENT})\b"),
        ),
        (
            ExportPattern::Default,
            format!(
                r"(?m)^[ \t]*export\s+default\s+(?:async\s+)?(?:function\b\s*\*?\s*|class\b\s*)?({IDENT})?"
            ),
        ),
        (
            ExportPattern::NamedList,
            r"(?m)^[ \t]*export\s*(?:type\s*)?\{([^}]+)\}".to_string(),
        ),
        (
            ExportPattern::ReexportAll,
            r#"(?m)^[ \t]*export\s+\*\s+from\s+['"][^'"]+['"]"#.to_string(),
        ),
        (
            ExportPattern::CommonJsObject,
            r"module\.exports\s*=\s*\{([^}]+)\}".to_string(),
        ),
        (
            ExportPattern::CommonJsProperty,
            format!(r"(?m)\bexports\.({IDENT})\s*=(?:[^=]|$)"),
        ),
    ];
    patterns
        .into_iter()
        .map(|(kind, pattern)| (kind, Regex::new(&pattern).unwrap()))
        .collect()
});

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({IDENT})\s+as\s+({IDENT})")).unwrap());

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!("^{IDENT}$")).unwrap());

/// Export scanner for JavaScript and TypeScript.
pub struct BraceStyleExtractor {
    language: String,
    comments: CommentSyntax,
}

impl BraceStyleExtractor {
    pub fn new(language: &str, comments: CommentSyntax) -> Self {
        Self {
            language: language.to_string(),
            comments,
        }
    }
}

impl LanguageExtractor for BraceStyleExtractor {
    fn language(&self) -> &str {
        &self.language
    }

    fn extract(&mut self, source: &str) -> Result<Vec<ApiItem>> {
        Ok(extract_exports(source, &self.comments))
    }
}

struct FileContext<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
    line_index: LineIndex,
    classifier: ComponentClassifier<'a>,
    comments: &'a CommentSyntax,
}

impl<'a> FileContext<'a> {
    fn item(&self, kind: &str, name: &str, start: usize, fallback: &str) -> ApiItem {
        let line = self.line_index.line_of(start);
        let signature = line_at(&self.lines, line).unwrap_or(fallback);
        let kind = if self.classifier.is_component(name) {
            "component"
        } else {
            kind
        };
        ApiItem::new(
            kind,
            name,
            signature,
            line,
            doc_comment_before(&self.lines, line, self.comments),
        )
    }
}

pub fn extract_exports(source: &str, comments: &CommentSyntax) -> Vec<ApiItem> {
    let ctx = FileContext {
        source,
        lines: source.lines().collect(),
        line_index: LineIndex::new(source),
        classifier: ComponentClassifier::new(source),
        comments,
    };
    let mut items = Vec::new();
    for (pattern, re) in EXPORT_PATTERNS.iter() {
        for caps in re.captures_iter(ctx.source) {
            collect_match(&ctx, *pattern, &caps, &mut items);
        }
    }
    items
}

fn collect_match(ctx: &FileContext<'_>, pattern: ExportPattern, caps: &Captures<'_>, out: &mut Vec<ApiItem>) {
    let Some(whole) = caps.get(0) else {
        return;
    };
    let start = whole.start();
    let text = whole.as_str();
    match pattern {
        ExportPattern::Declaration(kind) => {
            if let Some(name) = caps.get(1) {
                out.push(ctx.item(kind, name.as_str(), start, text));
            }
        }
        ExportPattern::Default => {
            let name = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or("default");
            out.push(ctx.item("default", name, start, text));
        }
        ExportPattern::NamedList => {
            let Some(blob) = caps.get(1) else {
                return;
            };
            for entry in blob.as_str().split(',') {
                let entry = entry.trim();
                let entry = entry.strip_prefix("type ").map(str::trim).unwrap_or(entry);
                if entry.is_empty() {
                    continue;
                }
                let exported = ALIAS_RE
                    .captures(entry)
                    .and_then(|alias| alias.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or(entry);
                out.push(ctx.item("export", exported, start, text));
            }
        }
        ExportPattern::ReexportAll => {
            let line = ctx.line_index.line_of(start);
            let signature = line_at(&ctx.lines, line).unwrap_or(text);
            out.push(ApiItem::new(
                "re-export",
                "*",
                signature,
                line,
                doc_comment_before(&ctx.lines, line, ctx.comments),
            ));
        }
        ExportPattern::CommonJsObject => {
            let Some(blob) = caps.get(1) else {
                return;
            };
            for entry in blob.as_str().split(',') {
                let key = entry.split(':').next().unwrap_or("").trim();
                let key = key.trim_matches(|c| c == '\'' || c == '"');
                if IDENT_RE.is_match(key) {
                    out.push(ctx.item("export", key, start, text));
                }
            }
        }
        ExportPattern::CommonJsProperty => {
            if let Some(name) = caps.get(1) {
                out.push(ctx.item("export", name.as_str(), start, text));
            }
        }
    }
}
