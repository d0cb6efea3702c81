//! Error and diagnostic types.
//!
//! Only a document that cannot be parsed at all, or cannot be read, aborts a run. Everything a
//! parseable document can get wrong about its own labels is reported as a [`Diagnostic`] next to
//! the graph instead.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse defect at line {line}, column {column}: {message}")]
/// The document text could not be turned into a tree.
pub struct ParseDefect {
    /// What the parser tripped over.
    pub message: String,
    /// Byte offset of the defect in the source.
    pub offset: usize,
    /// 1-based line of the defect.
    pub line: usize,
    /// 1-based column (in characters) of the defect.
    pub column: usize,
}

impl ParseDefect {
    pub(crate) fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, offset);
        Self {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

/// Fatal failures of a pipeline run.
#[derive(Debug, Error)]
pub enum Error {
    /// The parser could not produce a tree, so no graph is returned.
    #[error(transparent)]
    Parse(#[from] ParseDefect),

    /// An input path does not exist.
    #[error("file {} not found", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// An input path has an extension the run is not configured for.
    #[error("file {} is not a .{expected} file", path.display())]
    UnsupportedExtension {
        /// Offending path.
        path: PathBuf,
        /// Accepted extensions, comma separated.
        expected: String,
    },

    /// Reading an input failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file exists but could not be used.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Writing the graph out failed.
    #[error("failed to serialise graph: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// A document-quality finding that does not stop graph construction.
pub enum Diagnostic {
    /// A reference cites a label that is never defined.
    DanglingReference {
        /// The undefined label.
        label: String,
        /// 1-based line of the reference.
        line: usize,
        /// Id of the section containing the reference, if any.
        section: Option<String>,
    },
    /// A label is defined more than once; the later definition wins.
    DuplicateLabel {
        /// The redefined label.
        label: String,
        /// 1-based line of the winning definition.
        line: usize,
        /// 1-based line of the definition it replaced.
        previous_line: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference {
                label,
                line,
                section,
            } => {
                write!(f, "line {line}: reference to undefined label '{label}'")?;
                if let Some(section) = section {
                    write!(f, " (in section '{section}')")?;
                }
                Ok(())
            }
            Self::DuplicateLabel {
                label,
                line,
                previous_line,
            } => write!(
                f,
                "line {line}: label '{label}' redefined (first defined on line {previous_line})"
            ),
        }
    }
}

/// 1-based line and character column of a byte offset.
pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before.get(line_start..).unwrap_or_default().chars().count() + 1;
    (line, column)
}

#[cfg(test)]
#[path = "tests/error.rs"]
mod tests;
