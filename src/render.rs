use crate::config::OutputFormat;
use crate::indexer::python::module_name_from_rel_path;
use crate::model::{ApiItem, Inventory, ModuleDoc};
use crate::util::strip_extension;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const INDEX_FILE: &str = "API.md";
pub const FULL_FILE: &str = "API_FULL.md";
pub const DIAGRAMS_FILE: &str = "DIAGRAMS.md";
pub const SPLIT_DIR: &str = "api";

/// Fenced snippet showing how a caller would reach `item`.
pub fn usage_example(language: &str, rel_path: &str, item: &ApiItem) -> String {
    let name = item.name.as_str();
    match language {
        "javascript" | "typescript" => {
            let fence = if language == "typescript" { "ts" } else { "js" };
            let from = format!("./{}", strip_extension(rel_path));
            let body = match item.kind.as_str() {
                "component" => format!("import {{ {name} }} from '{from}';\n\n<{name} /* props */ />"),
                _ if name == "default" => {
                    format!("import Thing from '{from}';\n\nThing(/* arguments */);")
                }
                "function" | "const" | "let" | "var" | "export" if name != "*" => format!(
                    "import {{ {name} }} from '{from}';\n\nconst result = {name}(/* arguments */);\nconsole.log(result);"
                ),
                "class" => format!(
                    "import {{ {name} }} from '{from}';\n\nconst instance = new {name}(/* constructor args */);"
                ),
                _ => format!("// Import types or re-exports from '{from}'"),
            };
            fenced(fence, &body)
        }
        "python" => {
            let module = module_name_from_rel_path(rel_path);
            let body = match item.kind.as_str() {
                "function" | "export" => format!(
                    "from {module} import {name}\n\nresult = {name}(# arguments)\nprint(result)"
                ),
                "class" => format!("from {module} import {name}\n\nobj = {name}(# constructor args)"),
                _ => "# Usage example".to_string(),
            };
            fenced("python", &body)
        }
        "go" => fenced(
            "go",
            &format!("// In package usage (import path TBD)\n// result := {name}(/* args */)"),
        ),
        "rust" => fenced(
            "rust",
            &format!("// use crate::path::to::{name};\n// let result = {name}(/* args */);"),
        ),
        "java" => {
            let body = match item.kind.as_str() {
                "class" | "interface" | "enum" | "record" => {
                    format!("// Example usage\n{name} obj = new {name}();")
                }
                "method" => format!("// new EnclosingClass().{name}(/* args */);"),
                _ => "// Usage example".to_string(),
            };
            fenced("java", &body)
        }
        _ => fenced("", "// Usage example"),
    }
}

fn fenced(lang: &str, body: &str) -> String {
    format!("```{lang}\n{body}\n```")
}

pub fn module_markdown(module: &ModuleDoc) -> String {
    let mut out = format!("# `{}`\n", module.path);
    for item in &module.items {
        out.push_str(&format!("\n## {}: `{}`\n", item.kind, item.name));
        if let Some(description) = &item.description {
            out.push_str(&format!("\n{description}\n"));
        }
        out.push_str(&format!("\nSignature:\n\n```\n{}\n```\n", item.signature));
        out.push_str(&format!(
            "\nUsage:\n\n{}\n",
            usage_example(&module.language, &module.path, item)
        ));
    }
    out
}

/// `api/<language>/<path with .md>`, relative to the output directory.
pub fn module_output_path(module: &ModuleDoc) -> PathBuf {
    let page = format!("{}.md", strip_extension(&module.path));
    let mut path = PathBuf::from(SPLIT_DIR);
    path.push(&module.language);
    path.extend(page.split('/'));
    path
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn index_markdown(inventory: &Inventory, split: bool) -> String {
    let mut out = String::from("# API Reference\n\n");
    out.push_str("Auto-generated documentation of public APIs, functions, classes, and components.\n");
    if inventory.modules.is_empty() {
        out.push_str("\n> No public APIs detected.\n");
        return out;
    }
    out.push_str("\n## Summary\n\n");
    for (language, count) in &inventory.counts {
        out.push_str(&format!("- {}: {count} items\n", title_case(language)));
    }
    out.push_str("\n## Modules\n\n");
    for module in &inventory.modules {
        if split {
            let page = module_output_path(module).to_string_lossy().replace('\\', "/");
            out.push_str(&format!("- `{}` ([{page}]({page}))\n", module.path));
        } else {
            out.push_str(&format!("- `{}`\n", module.path));
        }
    }
    out
}

pub fn full_markdown(inventory: &Inventory) -> String {
    let mut out = index_markdown(inventory, false);
    for module in &inventory.modules {
        out.push_str("\n---\n\n");
        out.push_str(&module_markdown(module));
    }
    out
}

/// Mermaid graph of documented modules. Edges touching an undocumented file
/// are left out.
pub fn dependency_mermaid(inventory: &Inventory) -> String {
    let mut out = String::from("# Dependency Graph\n\n");
    out.push_str("This graph shows intra-repository imports between documented modules.\n\n");
    out.push_str("```mermaid\ngraph LR\n");
    let mut node_ids: HashMap<&str, String> = HashMap::new();
    for (idx, module) in inventory.modules.iter().enumerate() {
        let id = format!("N{idx}");
        out.push_str(&format!("  {id}[\"{}\"]\n", module.path.replace('"', "#quot;")));
        node_ids.insert(module.path.as_str(), id);
    }
    for edge in &inventory.edges {
        if let (Some(source), Some(target)) = (
            node_ids.get(edge.source.as_str()),
            node_ids.get(edge.target.as_str()),
        ) {
            out.push_str(&format!("  {source} --> {target}\n"));
        }
    }
    out.push_str("```\n");
    out
}

/// Writes every document `format` asks for and returns the written paths.
pub fn write_docs(inventory: &Inventory, output_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;
    let mut written = Vec::new();

    let index = output_dir.join(INDEX_FILE);
    write_file(&index, &index_markdown(inventory, format.writes_split()))?;
    written.push(index);

    if format.writes_split() {
        for module in &inventory.modules {
            let path = output_dir.join(module_output_path(module));
            write_file(&path, &module_markdown(module))?;
            written.push(path);
        }
    }
    if format.writes_single() {
        let path = output_dir.join(FULL_FILE);
        write_file(&path, &full_markdown(inventory))?;
        written.push(path);
    }

    let diagrams = output_dir.join(DIAGRAMS_FILE);
    write_file(&diagrams, &dependency_mermaid(inventory))?;
    written.push(diagrams);
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyEdge;

    fn module(path: &str, language: &str, items: Vec<ApiItem>) -> ModuleDoc {
        ModuleDoc {
            language: language.to_string(),
            path: path.to_string(),
            items,
        }
    }

    #[test]
    fn usage_templates() {
        let widget = ApiItem::new("component", "Widget", "export function Widget() {", 3, None);
        let snippet = usage_example("typescript", "src/ui/Widget.tsx", &widget);
        assert!(snippet.starts_with("```ts\n"));
        assert!(snippet.contains("import { Widget } from './src/ui/Widget';"));
        assert!(snippet.contains("<Widget /* props */ />"));

        let class = ApiItem::new("class", "Client", "class Client(Base)", 1, None);
        let snippet = usage_example("python", "pkg/client.py", &class);
        assert!(snippet.contains("from pkg.client import Client"));

        let default = ApiItem::new("default", "default", "export default () => 1;", 1, None);
        assert!(usage_example("javascript", "a.js", &default).contains("import Thing from './a';"));
    }

    #[test]
    fn split_page_paths() {
        let doc = module("src/lib/util.ts", "typescript", Vec::new());
        assert_eq!(
            module_output_path(&doc),
            PathBuf::from("api").join("typescript").join("src").join("lib").join("util.md")
        );
    }

    #[test]
    fn empty_index() {
        let text = index_markdown(&Inventory::default(), true);
        assert!(text.contains("> No public APIs detected."));
        assert!(!text.contains("## Summary"));
    }

    #[test]
    fn mermaid_skips_undocumented_endpoints() {
        let item = ApiItem::new("function", "f", "def f()", 1, None);
        let inventory = Inventory {
            modules: vec![
                module("a.py", "python", vec![item.clone()]),
                module("b.py", "python", vec![item]),
            ],
            edges: vec![
                DependencyEdge {
                    source: "a.py".into(),
                    target: "b.py".into(),
                },
                DependencyEdge {
                    source: "a.py".into(),
                    target: "c.py".into(),
                },
            ],
            counts: Default::default(),
        };
        let text = dependency_mermaid(&inventory);
        assert!(text.contains("  N0[\"a.py\"]\n"));
        assert!(text.contains("  N0 --> N1\n"));
        assert_eq!(text.matches("-->").count(), 1);
    }
}
