//! Heuristic UI-component detection for brace-style sources.
//!
//! Approximate by nature: a name is a component when it is capitalized and
//! either its function or arrow binding is followed by a `return (<tag` or it
//! carries a known element-result type annotation.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RETURN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"return\s*\(\s*<").unwrap());

const UI_RESULT_TYPES: &[&str] = &[
    "React.FC",
    "React.FunctionComponent",
    "FC",
    "JSX.Element",
    "React.ReactElement",
    "ReactElement",
];

/// Per-source classifier; the tag-return scan is done once per file.
pub struct ComponentClassifier<'a> {
    source: &'a str,
    last_tag_return: Option<usize>,
}

impl<'a> ComponentClassifier<'a> {
    pub fn new(source: &'a str) -> Self {
        let last_tag_return = TAG_RETURN_RE.find_iter(source).last().map(|m| m.start());
        Self {
            source,
            last_tag_return,
        }
    }

    pub fn is_component(&self, name: &str) -> bool {
        if !name.chars().next().is_some_and(char::is_uppercase) {
            return false;
        }
        let escaped = regex::escape(name);
        if let Some(last_return) = self.last_tag_return {
            let declarations = [
                format!(r"\bfunction\s+{escaped}\b"),
                format!(r"\b{escaped}\s*=\s*\([^\n]*?\)\s*=>"),
            ];
            for pattern in &declarations {
                if self
                    .first_match_end(pattern)
                    .is_some_and(|end| end <= last_return)
                {
                    return true;
                }
            }
        }
        let types = UI_RESULT_TYPES
            .iter()
            .map(|ty| regex::escape(ty))
            .collect::<Vec<_>>()
            .join("|");
        self.first_match_end(&format!(r"\b{escaped}\s*:\s*(?:{types})\b"))
            .is_some()
    }

    fn first_match_end(&self, pattern: &str) -> Option<usize> {
        let re = Regex::new(pattern).ok()?;
        re.find(self.source).map(|m| m.end())
    }
}

pub fn is_ui_component(source: &str, name: &str) -> bool {
    ComponentClassifier::new(source).is_component(name)
}
