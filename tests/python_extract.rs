use docsgen::indexer::extract::LanguageExtractor;
use docsgen::indexer::python::{PythonExtractor, module_name_from_rel_path};
use docsgen::model::ApiItem;

fn extract(source: &str) -> Vec<ApiItem> {
    let mut extractor = PythonExtractor::new("python").unwrap();
    extractor.extract(source).unwrap()
}

fn find<'a>(items: &'a [ApiItem], name: &str) -> &'a ApiItem {
    items
        .iter()
        .find(|item| item.name == name)
        .unwrap_or_else(|| panic!("missing {name}"))
}

#[test]
fn module_name_from_path() {
    assert_eq!(module_name_from_rel_path("foo.py"), "foo");
    assert_eq!(module_name_from_rel_path("pkg/__init__.py"), "pkg");
    assert_eq!(module_name_from_rel_path("pkg/sub/mod.py"), "pkg.sub.mod");
    assert_eq!(module_name_from_rel_path("__init__.py"), "__init__");
}

#[test]
fn public_definitions_with_signatures_and_docstrings() {
    let source = r#""""Module doc."""
import os

__all__ = ["load", "VERSION"]

VERSION = "1.0"

def load(path, mode="r", *args, flag=False, **kwargs):
    """Load a file.

    Returns text.
    """
    return open(path, mode).read()

def _helper():
    pass

class Loader(base.Reader, Mixin, metaclass=Meta):
    """Reads things."""

    def method(self):
        pass

@decorator
async def fetch(url, /, timeout: float = 1.0):
    pass
"#;
    let items = extract(source);
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["load", "Loader", "fetch", "VERSION"]);

    let load = find(&items, "load");
    assert_eq!(load.kind, "function");
    assert_eq!(load.line, 8);
    assert_eq!(load.signature, "def load(path, mode)");
    assert_eq!(load.description.as_deref(), Some("Load a file.\n\nReturns text."));

    let loader = find(&items, "Loader");
    assert_eq!(loader.kind, "class");
    assert_eq!(loader.line, 18);
    assert_eq!(loader.signature, "class Loader(Reader, Mixin)");
    assert_eq!(loader.description.as_deref(), Some("Reads things."));

    let fetch = find(&items, "fetch");
    assert_eq!(fetch.line, 25);
    assert_eq!(fetch.signature, "async def fetch(timeout)");
    assert_eq!(fetch.description, None);
}

#[test]
fn private_helper_is_skipped() {
    let items = extract("def _helper():\n    return 1\n");
    assert!(items.is_empty());
}

#[test]
fn all_exports_anchor_at_line_one() {
    let mut source = String::new();
    for idx in 0..19 {
        source.push_str(&format!("X{idx} = {idx}\n"));
    }
    source.push_str("__all__ = ['run', \"stop\"]\n");
    source.push_str("def run():\n    pass\n");

    let items = extract(&source);
    let run = find(&items, "run");
    assert_eq!((run.kind.as_str(), run.line), ("function", 21));

    let stop = find(&items, "stop");
    assert_eq!(stop.kind, "export");
    assert_eq!(stop.signature, "__all__");
    assert_eq!(stop.line, 1);
    assert_eq!(items.iter().filter(|item| item.name == "run").count(), 1);
}

#[test]
fn class_without_bases_and_nested_scopes() {
    let source = r#"
try:
    import fast
except ImportError:
    class Fallback:
        pass

class Plain:
    class Inner:
        pass
"#;
    let items = extract(source);
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Fallback", "Plain"]);
    assert_eq!(find(&items, "Plain").signature, "class Plain");
}

#[test]
fn syntax_error_yields_nothing() {
    assert!(extract("def broken(:\n    pass\n").is_empty());
    assert!(extract("").is_empty());
}

#[test]
fn long_operator_chain_terminates() {
    let mut source = String::from("def run():\n    pass\n\nX = 1");
    for _ in 0..20_000 {
        source.push_str(" + 1");
    }
    source.push('\n');
    let items = extract(&source);
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["run"]);
}

#[test]
fn deeply_nested_module_blocks() {
    let depth = 30;
    let mut source = String::new();
    for level in 0..depth {
        source.push_str(&"    ".repeat(level));
        source.push_str("if True:\n");
    }
    source.push_str(&"    ".repeat(depth));
    source.push_str("def inner():\n");
    source.push_str(&"    ".repeat(depth + 1));
    source.push_str("pass\n");

    let items = extract(&source);
    assert_eq!(items.len(), 1);
    assert_eq!((items[0].name.as_str(), items[0].line), ("inner", depth + 1));
}

#[test]
fn extraction_is_idempotent() {
    let source = "__all__ = ['a', 'b']\n\nclass A(Base):\n    \"\"\"Doc.\"\"\"\n\ndef b(x, y=2):\n    pass\n";
    let mut extractor = PythonExtractor::new("python").unwrap();
    let first = extractor.extract(source).unwrap();
    let second = extractor.extract(source).unwrap();
    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["A", "b", "a"]);
}

#[test]
fn all_must_be_the_exact_name() {
    let items = extract("my__all__ = ['hidden']\n\ndef shown():\n    pass\n");
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["shown"]);
}

#[test]
fn hash_comments_are_not_descriptions() {
    let items = extract("# Not a docstring.\ndef plain():\n    pass\n");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description, None);
}
