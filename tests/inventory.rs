use docsgen::config::{Config, OutputFormat};
use docsgen::indexer::extract::LanguageTable;
use docsgen::indexer::scan::{self, ScanOptions};
use docsgen::indexer::{Indexer, SourceFile, index_repo};
use docsgen::model::DependencyEdge;
use docsgen::render;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn edge(source: &str, target: &str) -> DependencyEdge {
    DependencyEdge {
        source: source.to_string(),
        target: target.to_string(),
    }
}

fn run(files: &[SourceFile]) -> docsgen::model::Inventory {
    let mut indexer = Indexer::new(LanguageTable::default()).unwrap();
    indexer.run(files)
}

#[test]
fn relative_import_produces_edge_when_target_present() {
    let a = SourceFile::new(
        "src/a.ts",
        "typescript",
        "import { b } from './b';\nexport const a = b + 1;\n",
    );
    let b = SourceFile::new("src/b.ts", "typescript", "export const b = 1;\n");

    let inventory = run(&[a.clone(), b]);
    assert_eq!(inventory.edges, vec![edge("src/a.ts", "src/b.ts")]);

    let inventory = run(&[a]);
    assert!(inventory.edges.is_empty());
}

#[test]
fn distinct_specifiers_to_one_target_both_yield_edges() {
    let a = SourceFile::new(
        "src/a.ts",
        "typescript",
        "import { b } from './b';\nimport { c } from './b.ts';\nimport { d } from './b';\nexport const a = 1;\n",
    );
    let b = SourceFile::new("src/b.ts", "typescript", "export const b = 1;\n");
    let inventory = run(&[a, b]);
    assert_eq!(inventory.edges, vec![edge("src/a.ts", "src/b.ts"); 3]);
}

#[test]
fn as_is_and_extension_probes_each_yield_an_edge() {
    let a = SourceFile::new(
        "src/a.ts",
        "typescript",
        "import { b } from './b.ts';
export const a = b;
",
    );
    let b = SourceFile::new("src/b.ts", "typescript", "export const b = 1;
");
    let inventory = run(&[a, b]);
    assert_eq!(inventory.edges, vec![edge("src/a.ts", "src/b.ts"); 2]);
}

#[test]
fn files_without_declarations_are_dropped_but_still_resolve() {
    let main = SourceFile::new(
        "app/main.py",
        "python",
        "from app import helpers\nfrom .models import User\n\ndef main():\n    pass\n",
    );
    let helpers = SourceFile::new("app/helpers.py", "python", "_cache = {}\n");
    let models = SourceFile::new("app/models.py", "python", "class User:\n    pass\n");
    let inventory = run(&[models, main, helpers]);

    let paths: Vec<&str> = inventory.modules.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["app/main.py", "app/models.py"]);
    assert_eq!(inventory.edges, vec![edge("app/main.py", "app/models.py")]);
    assert_eq!(inventory.counts.get("python"), Some(&2));
    assert!(inventory.module("app/helpers.py").is_none());
}

#[test]
fn dotted_import_resolves_through_module_index() {
    let main = SourceFile::new(
        "main.py",
        "python",
        "import pkg.tools\nfrom pkg import core\n\ndef run():\n    pass\n",
    );
    let init = SourceFile::new("pkg/__init__.py", "python", "def setup():\n    pass\n");
    let tools = SourceFile::new("pkg/tools.py", "python", "def tool():\n    pass\n");
    let inventory = run(&[main, init, tools]);
    assert_eq!(
        inventory.edges,
        vec![edge("main.py", "pkg/__init__.py"), edge("main.py", "pkg/tools.py")]
    );
}

#[test]
fn scan_honors_deny_list_gitignore_and_filters() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/app.ts", "export const app = 1;\n");
    write(root, "src/app.test.ts", "export const t = 1;\n");
    write(root, "src/readme.md", "# hi\n");
    write(root, "node_modules/dep/index.js", "export const dep = 1;\n");
    write(root, "generated/out.ts", "export const gen = 1;\n");
    write(root, "lib/util.py", "def util():\n    pass\n");
    write(root, ".gitignore", "generated/\n");

    let table = LanguageTable::default();
    let rel = |files: Vec<scan::ScannedFile>| -> Vec<String> {
        files.into_iter().map(|file| file.rel_path).collect()
    };

    let files = scan::scan_repo(root, &ScanOptions::new(false), &table).unwrap();
    assert_eq!(rel(files), vec!["lib/util.py", "src/app.test.ts", "src/app.ts"]);

    let files = scan::scan_repo(root, &ScanOptions::new(true), &table).unwrap();
    assert_eq!(
        rel(files),
        vec!["generated/out.ts", "lib/util.py", "src/app.test.ts", "src/app.ts"]
    );

    let config = Config {
        include: vec!["^src/".to_string()],
        exclude: vec![r"\.test\.".to_string()],
        ..Config::default()
    };
    let options = ScanOptions::from_config(&config, false).unwrap();
    let files = scan::scan_repo(root, &options, &table).unwrap();
    assert_eq!(rel(files), vec!["src/app.ts"]);

    let mut python_only = LanguageTable::default();
    python_only.retain(&["python".to_string()]);
    let files = scan::scan_repo(root, &ScanOptions::new(false), &python_only).unwrap();
    assert_eq!(rel(files), vec!["lib/util.py"]);
}

#[test]
fn invalid_patterns_and_languages_are_rejected() {
    let config = Config {
        exclude: vec!["(".to_string()],
        ..Config::default()
    };
    assert!(ScanOptions::from_config(&config, false).is_err());

    let table = LanguageTable::default();
    let langs = scan::normalize_language_filter(&["ts".to_string(), "golang".to_string(), "java".to_string()], &table)
        .unwrap()
        .unwrap();
    assert_eq!(langs, vec!["go", "java", "typescript"]);
    assert!(scan::normalize_language_filter(&[], &table).unwrap().is_none());
    assert!(scan::normalize_language_filter(&["cobol".to_string()], &table).is_err());
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(scan::scan_repo(&missing, &ScanOptions::new(false), &LanguageTable::default()).is_err());
}

#[test]
fn index_and_write_docs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");
    write(&root, "src/a.ts", "import { b } from './b';\n/** Entry. */\nexport function a() {}\n");
    write(&root, "src/b.ts", "export const b = 1;\n");
    write(&root, "src/empty.ts", "const hidden = 1;\n");

    let inventory = index_repo(&root, LanguageTable::default(), &ScanOptions::new(false)).unwrap();
    assert_eq!(inventory.modules.len(), 2);
    assert_eq!(inventory.edges, vec![edge("src/a.ts", "src/b.ts")]);
    assert_eq!(inventory.total_items(), 2);

    let out = dir.path().join("docs");
    let written = render::write_docs(&inventory, &out, OutputFormat::Both).unwrap();
    assert_eq!(written.len(), 5);

    let index = fs::read_to_string(out.join("API.md")).unwrap();
    assert!(index.contains("- Typescript: 2 items"));
    assert!(index.contains("api/typescript/src/a.md"));

    let page = fs::read_to_string(out.join("api/typescript/src/a.md")).unwrap();
    assert!(page.starts_with("# `src/a.ts`"));
    assert!(page.contains("## function: `a`"));
    assert!(page.contains("Entry."));
    assert!(page.contains("export function a() {}"));

    let full = fs::read_to_string(out.join("API_FULL.md")).unwrap();
    assert!(full.contains("# `src/b.ts`"));

    let diagrams = fs::read_to_string(out.join("DIAGRAMS.md")).unwrap();
    assert!(diagrams.contains("graph LR"));
    assert!(diagrams.contains("N0 --> N1"));
}

#[test]
fn single_format_skips_split_pages() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = run(&[SourceFile::new("m.go", "go", "func Run() {}\n")]);
    let written = render::write_docs(&inventory, dir.path(), OutputFormat::Single).unwrap();
    assert_eq!(written.len(), 3);
    assert!(!dir.path().join("api").exists());
    let index = fs::read_to_string(dir.path().join("API.md")).unwrap();
    assert!(index.contains("- `m.go`\n"));
}
