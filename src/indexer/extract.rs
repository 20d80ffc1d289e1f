use crate::indexer::declaration::DeclFamily;
use crate::indexer::doc_comment::CommentSyntax;
use crate::indexer::imports::ImportGrammar;
use crate::model::ApiItem;
use anyhow::Result;

/// Turns the raw text of one file into API items.
///
/// Implementations must tolerate arbitrary input: malformed or truncated text
/// yields an empty or partial list, never an error.
pub trait LanguageExtractor {
    fn language(&self) -> &str;

    fn extract(&mut self, source: &str) -> Result<Vec<ApiItem>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Bracket-delimited sources scanned with export patterns.
    BraceStyle,
    /// Indentation-structured sources walked through a syntax tree.
    IndentedDoc,
    /// Visibility-qualified declarations matched line by line.
    DeclarationScan(DeclFamily),
}

#[derive(Debug, Clone)]
pub struct LanguageSpec {
    pub name: String,
    pub extensions: Vec<String>,
    pub capability: Capability,
    /// Used by the brace-style and declaration-scan extractors. Indented-doc
    /// sources take descriptions from docstrings and ignore it.
    pub comments: CommentSyntax,
    pub imports: ImportGrammar,
}

impl LanguageSpec {
    pub fn new(
        name: &str,
        extensions: &[&str],
        capability: Capability,
        comments: CommentSyntax,
        imports: ImportGrammar,
    ) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
            capability,
            comments,
            imports,
        }
    }
}

/// Extension → language mapping handed to the scanner and the indexer.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    specs: Vec<LanguageSpec>,
}

impl LanguageTable {
    pub fn new(specs: Vec<LanguageSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[LanguageSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&LanguageSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Extension lookup is case-insensitive.
    pub fn for_extension(&self, ext: &str) -> Option<&LanguageSpec> {
        let ext = ext.to_ascii_lowercase();
        self.specs
            .iter()
            .find(|spec| spec.extensions.iter().any(|candidate| *candidate == ext))
    }

    pub fn for_path(&self, rel_path: &str) -> Option<&LanguageSpec> {
        crate::util::extension(rel_path).and_then(|ext| self.for_extension(ext))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.name.as_str())
    }

    /// Keeps only the named languages.
    pub fn retain(&mut self, languages: &[String]) {
        self.specs.retain(|spec| languages.contains(&spec.name));
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::new(vec![
            LanguageSpec::new(
                "javascript",
                &["js", "jsx"],
                Capability::BraceStyle,
                CommentSyntax::C_STYLE,
                ImportGrammar::EcmaScript,
            ),
            LanguageSpec::new(
                "typescript",
                &["ts", "tsx"],
                Capability::BraceStyle,
                CommentSyntax::C_STYLE,
                ImportGrammar::EcmaScript,
            ),
            LanguageSpec::new(
                "python",
                &["py"],
                Capability::IndentedDoc,
                CommentSyntax::HASH,
                ImportGrammar::Python,
            ),
            LanguageSpec::new(
                "go",
                &["go"],
                Capability::DeclarationScan(DeclFamily::Go),
                CommentSyntax::GO,
                ImportGrammar::None,
            ),
            LanguageSpec::new(
                "rust",
                &["rs"],
                Capability::DeclarationScan(DeclFamily::Rust),
                CommentSyntax::RUST,
                ImportGrammar::None,
            ),
            LanguageSpec::new(
                "java",
                &["java"],
                Capability::DeclarationScan(DeclFamily::Java),
                CommentSyntax::C_STYLE,
                ImportGrammar::None,
            ),
        ])
    }
}

/// Builds the extractor for one table entry.
pub fn extractor_for(spec: &LanguageSpec) -> Result<Box<dyn LanguageExtractor>> {
    let extractor: Box<dyn LanguageExtractor> = match spec.capability {
        Capability::BraceStyle => Box::new(crate::indexer::javascript::BraceStyleExtractor::new(
            &spec.name,
            spec.comments,
        )),
        Capability::IndentedDoc => {
            Box::new(crate::indexer::python::PythonExtractor::new(&spec.name)?)
        }
        Capability::DeclarationScan(family) => Box::new(
            crate::indexer::declaration::DeclarationScanExtractor::new(
                &spec.name,
                family,
                spec.comments,
            ),
        ),
    };
    Ok(extractor)
}
