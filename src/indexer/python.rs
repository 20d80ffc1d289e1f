use crate::indexer::extract::LanguageExtractor;
use crate::model::ApiItem;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tree_sitter::{Node, Parser};

static ALL_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b__all__\s*=\s*\[([^\]]*)\]").unwrap());

pub struct PythonExtractor {
    language: String,
    parser: Parser,
}

impl PythonExtractor {
    pub fn new(language: &str) -> Result<Self> {
        let mut parser = Parser::new();
        let grammar = tree_sitter_python::LANGUAGE;
        parser.set_language(&grammar.into())?;
        Ok(Self {
            language: language.to_string(),
            parser,
        })
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> &str {
        &self.language
    }

    fn extract(&mut self, source: &str) -> Result<Vec<ApiItem>> {
        let Some(tree) = self.parser.parse(source, None) else {
            return Ok(Vec::new());
        };
        let root = tree.root_node();
        // A file with syntax errors is treated as unparseable.
        if root.has_error() {
            return Ok(Vec::new());
        }
        let mut items = Vec::new();
        walk_module_scope(root, source, &mut items);
        append_all_exports(source, &mut items);
        Ok(items)
    }
}

/// Dotted module path for a repo-relative file; package initializers map to
/// their package.
pub fn module_name_from_rel_path(rel_path: &str) -> String {
    let path = Path::new(rel_path);
    let mut parts: Vec<String> = path
        .components()
        .filter_map(|comp| comp.as_os_str().to_str().map(|s| s.to_string()))
        .collect();
    if parts.is_empty() {
        return "__init__".to_string();
    }
    let file = parts.pop().unwrap_or_default();
    let stem = Path::new(&file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file)
        .to_string();
    if stem != "__init__" {
        parts.push(stem);
    }
    if parts.is_empty() {
        "__init__".to_string()
    } else {
        parts.join(".")
    }
}

/// Statement kinds whose bodies still belong to module scope. Expressions are
/// never entered, so their depth does not bound the walk.
const SCOPE_CONTAINERS: &[&str] = &[
    "block",
    "if_statement",
    "elif_clause",
    "else_clause",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
    "for_statement",
    "while_statement",
    "match_statement",
    "case_clause",
];

/// Visits module-level statements, including those nested in module-level
/// `if`/`try`/`with` blocks, without entering function or class bodies.
fn walk_module_scope(node: Node<'_>, source: &str, items: &mut Vec<ApiItem>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" => push_definition(child, source, items),
            "decorated_definition" => {
                if let Some(definition) = child.child_by_field_name("definition") {
                    push_definition(definition, source, items);
                }
            }
            kind if SCOPE_CONTAINERS.contains(&kind) => walk_module_scope(child, source, items),
            _ => {}
        }
    }
}

fn push_definition(node: Node<'_>, source: &str, items: &mut Vec<ApiItem>) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    if name.is_empty() || name.starts_with('_') {
        return;
    }
    let line = node.start_position().row + 1;
    let docstring = node
        .child_by_field_name("body")
        .and_then(|body| extract_docstring(body, source));
    let item = match node.kind() {
        "class_definition" => {
            let bases = class_bases(node, source);
            let signature = if bases.is_empty() {
                format!("class {name}")
            } else {
                format!("class {name}({})", bases.join(", "))
            };
            ApiItem::new("class", name, signature, line, docstring)
        }
        _ => {
            let prefix = if node_text(node, source).starts_with("async") {
                "async def"
            } else {
                "def"
            };
            let params = parameter_names(node, source).join(", ");
            let signature = format!("{prefix} {name}({params})");
            ApiItem::new("function", name, signature, line, docstring)
        }
    };
    items.push(item);
}

/// Positional-or-keyword parameter names only: anything before `/`, after
/// `*`/`*args`, and `**kwargs` is left out.
fn parameter_names(node: Node<'_>, source: &str) -> Vec<String> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let name = match param.kind() {
            "identifier" => Some(node_text(param, source)),
            "default_parameter" | "typed_default_parameter" => param
                .child_by_field_name("name")
                .map(|n| node_text(n, source)),
            "typed_parameter" => match param.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => Some(node_text(inner, source)),
                Some(inner) if inner.kind() == "list_splat_pattern" => break,
                _ => None,
            },
            "positional_separator" => {
                names.clear();
                None
            }
            "keyword_separator" | "list_splat_pattern" => break,
            _ => None,
        };
        if let Some(name) = name {
            names.push(name);
        }
    }
    names
}

fn class_bases(node: Node<'_>, source: &str) -> Vec<String> {
    let Some(superclasses) = node.child_by_field_name("superclasses") else {
        return Vec::new();
    };
    let mut bases = Vec::new();
    let mut cursor = superclasses.walk();
    for base in superclasses.named_children(&mut cursor) {
        match base.kind() {
            "keyword_argument" | "comment" => {}
            "attribute" => {
                if let Some(attr) = base.child_by_field_name("attribute") {
                    bases.push(node_text(attr, source));
                }
            }
            _ => bases.push(node_text(base, source)),
        }
    }
    bases
}

/// `__all__ = [...]` names not already documented. They are anchored at line 1
/// regardless of where the assignment sits.
fn append_all_exports(source: &str, items: &mut Vec<ApiItem>) {
    let Some(caps) = ALL_LIST_RE.captures(source) else {
        return;
    };
    let Some(blob) = caps.get(1) else {
        return;
    };
    for raw in blob.as_str().split(',') {
        let name = raw.trim().trim_matches(|c: char| c == '\'' || c == '"' || c == ' ');
        if name.is_empty() || items.iter().any(|item| item.name == name) {
            continue;
        }
        items.push(ApiItem::new("export", name, "__all__", 1, None));
    }
}

fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}

fn extract_docstring(body: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = body.walk();
    let mut children = body.named_children(&mut cursor);
    let first = children.next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string_node = first.named_child(0)?;
    if string_node.kind() != "string" {
        return None;
    }
    let raw = node_text(string_node, source);
    let doc = clean_docstring(&unquote_string_literal(&raw)?);
    if doc.is_empty() { None } else { Some(doc) }
}

fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut idx = 0;
    for (offset, ch) in trimmed.char_indices() {
        if ch.is_ascii_alphabetic() {
            idx = offset + ch.len_utf8();
        } else {
            break;
        }
    }
    let rest = &trimmed[idx..];
    if rest.starts_with("'''") && rest.ends_with("'''") && rest.len() >= 6 {
        return Some(rest[3..rest.len() - 3].to_string());
    }
    if rest.starts_with("\"\"\"") && rest.ends_with("\"\"\"") && rest.len() >= 6 {
        return Some(rest[3..rest.len() - 3].to_string());
    }
    if rest.starts_with('"') && rest.ends_with('"') && rest.len() >= 2 {
        return Some(rest[1..rest.len() - 1].to_string());
    }
    if rest.starts_with('\'') && rest.ends_with('\'') && rest.len() >= 2 {
        return Some(rest[1..rest.len() - 1].to_string());
    }
    None
}

/// Dedents continuation lines by their common indentation and trims the
/// surrounding blank lines.
fn clean_docstring(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };
    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut cleaned = vec![first.trim().to_string()];
    for line in rest {
        let dedented = line.get(indent..).unwrap_or_else(|| line.trim_start());
        cleaned.push(dedented.trim_end().to_string());
    }
    cleaned.join("\n").trim().to_string()
}
