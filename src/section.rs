//! Section representation for parsed documents.
//!
//! A section represents a hierarchical division of a document introduced by a heading command.
//! Sections track their position in the document tree through parent/child indices into the
//! owning arena and keep the byte span their content covers, which is what label ownership and
//! reference attribution are decided against.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Sectioning depth, ordered from outermost to innermost.
pub enum Level {
    /// `\section`
    Section,
    /// `\subsection`
    Subsection,
    /// `\subsubsection`
    Subsubsection,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::Subsubsection => "subsubsection",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Hierarchical document division with the span it covers.
pub struct Section {
    /// Stable identifier derived from the title and its position in the document.
    pub id: String,
    /// Heading text, whitespace-normalised.
    pub title: String,
    /// Depth of the heading.
    pub level: Level,
    /// Label defined directly after the heading, if any.
    pub label: Option<String>,
    /// 1-based line of the heading.
    pub line: usize,
    /// Byte offset of the heading command.
    pub byte_start: usize,
    /// Byte offset where the next heading of equal or higher level begins, or the end of input.
    pub byte_end: usize,
    /// Index of the containing section in the arena.
    pub parent_index: Option<usize>,
    /// Indices of directly nested sections, in document order.
    pub children_indices: Vec<usize>,
}

#[derive(Debug, Default)]
/// Hands out unique slug ids in document order.
pub struct IdAllocator {
    used: HashSet<String>,
}

impl IdAllocator {
    /// Id for the next heading titled `title`.
    ///
    /// The first heading with a given slug gets the bare slug; later ones get `-2`, `-3`, ...
    pub fn assign(&mut self, title: &str) -> String {
        let base = slugify(title);
        let mut candidate = base.clone();
        let mut n = 1;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Lowercase alphanumeric slug, every other run of characters collapsed to `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
