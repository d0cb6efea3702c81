//! sectiongraph: directed graphs of the cross-references between sections of a LaTeX document.
//!
//! A document is parsed into a tree, its headings are folded into a section hierarchy at the
//! requested granularity, every `\label` is attributed to the section it sits in, and every
//! reference becomes a weighted edge from the citing section to the section owning the label.
//! The resulting graph can be pruned of weakly connected sections and written out as JSON or
//! TikZ.
//!
//! ```
//! use sectiongraph::{analyse, GraphOptions, LatexFormat};
//!
//! let source = r"
//! \section{Basics}\label{sec:basics}
//! \section{Advanced} Builds on \cref{sec:basics}.
//! ";
//! let analysis = analyse(source, &LatexFormat::default(), &GraphOptions::default()).unwrap();
//! assert_eq!(analysis.graph.edge_weight("advanced", "basics"), Some(1));
//! ```
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod document;
pub mod error;
pub mod formats;
pub mod graph;
pub mod hierarchy;
pub mod input;
pub mod labels;
pub mod latex;
pub mod references;
pub mod render;
pub mod section;

pub use config::{Config, GraphOptions};
pub use document::Document;
pub use error::{Diagnostic, Error, ParseDefect, Result};
pub use formats::latex::LatexFormat;
pub use formats::Format;
pub use graph::SectionGraph;
pub use hierarchy::Outline;

use labels::LabelIndex;
use references::ReferenceOccurrence;
use tracing::info;

#[derive(Debug, Clone)]
/// Everything one pipeline run produced.
pub struct Analysis {
    /// Section hierarchy at the requested granularity.
    pub outline: Outline,
    /// Label ownership.
    pub labels: LabelIndex,
    /// Every reference occurrence in document order.
    pub occurrences: Vec<ReferenceOccurrence>,
    /// The graph after pruning.
    pub graph: SectionGraph,
    /// Dangling references and duplicate labels, in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse `source` and build its section graph.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the document cannot be parsed. Problems with labels and
/// references never fail the run; they end up in [`Analysis::diagnostics`].
pub fn analyse<F: Format + ?Sized>(
    source: &str,
    format: &F,
    options: &GraphOptions,
) -> Result<Analysis> {
    let document = Document::parse(source, format)?;
    Ok(analyse_document(&document, format, options))
}

#[must_use]
/// Build the section graph of an already parsed document.
pub fn analyse_document<F: Format + ?Sized>(
    document: &Document,
    format: &F,
    options: &GraphOptions,
) -> Analysis {
    let items = document.items(format);
    let outline = Outline::build(&items, options.granularity(), document.source().len());
    let mut diagnostics = Vec::new();
    let labels = LabelIndex::build(&items, &outline, &mut diagnostics);
    let resolution = references::resolve(&items, &outline, &labels, &mut diagnostics);
    let full = SectionGraph::assemble(&outline, &resolution.edges);
    let graph = full.prune(options.node_threshold);

    info!(
        sections = outline.len(),
        labels = labels.len(),
        references = resolution.occurrences.len(),
        dangling = resolution.dangling,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built section graph"
    );

    Analysis {
        outline,
        labels,
        occurrences: resolution.occurrences,
        graph,
        diagnostics,
    }
}

#[cfg(test)]
#[path = "tests/pipeline.rs"]
mod tests;
