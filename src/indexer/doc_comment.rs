//! Doc-comment lookup directly above a declaration.
//!
//! Two strategies, tried in a fixed order with no fallback between them:
//! a block comment (`/** ... */`) whose terminator is on the nearest non-blank
//! line above the anchor, otherwise a run of single-line comments. When the
//! nearest line closes a block but its opener is never found, the lookup
//! yields nothing even if line comments sit further up.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDelimiters {
    pub open: &'static str,
    pub close: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Single-line markers, longest first so `///` wins over `//`.
    pub line_markers: &'static [&'static str],
    pub block: Option<BlockDelimiters>,
}

const JSDOC: BlockDelimiters = BlockDelimiters {
    open: "/**",
    close: "*/",
};

impl CommentSyntax {
    pub const C_STYLE: CommentSyntax = CommentSyntax {
        line_markers: &["//"],
        block: Some(JSDOC),
    };

    pub const GO: CommentSyntax = CommentSyntax {
        line_markers: &["//"],
        block: None,
    };

    pub const RUST: CommentSyntax = CommentSyntax {
        line_markers: &["///", "//"],
        block: Some(JSDOC),
    };

    pub const HASH: CommentSyntax = CommentSyntax {
        line_markers: &["#"],
        block: None,
    };
}

/// Convenience wrapper that splits `source` itself.
pub fn locate(source: &str, anchor_line: usize, syntax: &CommentSyntax) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    doc_comment_before(&lines, anchor_line, syntax)
}

/// Finds the comment immediately preceding 1-based `anchor_line`.
pub fn doc_comment_before(
    lines: &[&str],
    anchor_line: usize,
    syntax: &CommentSyntax,
) -> Option<String> {
    if anchor_line < 2 {
        return None;
    }
    let above = (anchor_line - 1).min(lines.len());
    let nearest = (0..above).rev().find(|&idx| !lines[idx].trim().is_empty())?;

    if let Some(block) = syntax.block {
        if lines[nearest].trim_end().ends_with(block.close) {
            return block_comment(lines, nearest, block);
        }
    }
    line_comment(lines, nearest, syntax.line_markers)
}

fn block_comment(lines: &[&str], end: usize, block: BlockDelimiters) -> Option<String> {
    let start = (0..=end)
        .rev()
        .find(|&idx| lines[idx].trim_start().starts_with(block.open))?;

    let body: Vec<String> = lines[start..=end]
        .iter()
        .map(|line| strip_block_line(line, block))
        .collect();
    non_empty(body.join("\n"))
}

fn strip_block_line(line: &str, block: BlockDelimiters) -> String {
    let mut text = line.trim();
    if let Some(rest) = text.strip_suffix(block.close) {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix(block.open) {
        text = rest.trim_start_matches('*');
    } else if let Some(rest) = text.strip_prefix('*') {
        text = rest.strip_prefix(' ').unwrap_or(rest);
    }
    text.trim_end().to_string()
}

fn line_comment(lines: &[&str], from: usize, markers: &[&str]) -> Option<String> {
    let mut collected = Vec::new();
    for idx in (0..=from).rev() {
        let trimmed = lines[idx].trim();
        if trimmed.is_empty() {
            continue;
        }
        match markers.iter().find_map(|marker| trimmed.strip_prefix(marker)) {
            Some(rest) => collected.push(rest.trim()),
            None => break,
        }
    }
    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    non_empty(collected.join("\n"))
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
