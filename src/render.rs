//! Output writers for a finished graph.
//!
//! JSON carries the node list, edge list and diagnostics for any downstream renderer. TikZ
//! produces a picture that can be `\input` into the document the graph was built from, with
//! nodes placed on a circle and sized by how often they are cited.

use crate::error::{Diagnostic, Result};
use crate::graph::{GraphEdge, GraphNode, SectionGraph};
use crate::Analysis;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::f64::consts::TAU;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Node placement for TikZ output.
pub enum Layout {
    /// Unit circle.
    #[default]
    Shell,
    /// Circle of radius 3.
    Circular,
}

impl Layout {
    fn radius(self) -> f64 {
        match self {
            Self::Shell => 1.0,
            Self::Circular => 3.0,
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shell" => Ok(Self::Shell),
            "circular" => Ok(Self::Circular),
            other => Err(format!(
                "unknown layout '{other}', expected 'shell' or 'circular'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Settings for [`to_tikz`].
pub struct TikzOptions {
    /// Node placement.
    pub layout: Layout,
    /// Centimetres per layout unit.
    pub scale: f64,
    /// Wrap the picture in a compilable `standalone` document.
    pub standalone: bool,
}

impl Default for TikzOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Shell,
            scale: 10.0,
            standalone: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// JSON shape of one analysed document.
pub struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Path of the document, when there is more than one.
    pub document: Option<String>,
    /// Surviving sections.
    pub nodes: Vec<GraphNode>,
    /// Surviving edges.
    pub edges: Vec<GraphEdge>,
    /// Non-fatal findings.
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> JsonReport<'a> {
    #[must_use]
    /// Report for `analysis`, optionally tagged with the document it came from.
    pub fn new(analysis: &'a Analysis, document: Option<String>) -> Self {
        let export = analysis.graph.export();
        Self {
            document,
            nodes: export.nodes,
            edges: export.edges,
            diagnostics: &analysis.diagnostics,
        }
    }
}

/// Pretty-printed JSON for `analysis`.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn to_json(analysis: &Analysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(analysis, None))?)
}

/// Node positions on a circle, in layout units, indexed like the graph's nodes.
#[must_use]
pub fn positions(graph: &SectionGraph, layout: Layout) -> Vec<(f64, f64)> {
    let n = graph.node_count();
    if n == 1 {
        return vec![(0.0, 0.0)];
    }
    let radius = layout.radius();
    (0..n)
        .map(|k| {
            let theta = TAU * as_f64(k) / as_f64(n);
            (radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// TikZ source for `graph`.
#[must_use]
pub fn to_tikz(graph: &SectionGraph, options: &TikzOptions) -> String {
    let mut pos = positions(graph, options.layout);
    let min_x = pos.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let min_y = pos.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    for p in &mut pos {
        *p = ((p.0 - min_x) * options.scale, (p.1 - min_y) * options.scale);
    }

    let mut lines = Vec::new();
    if options.standalone {
        lines.extend([
            "\\documentclass{standalone}".to_string(),
            "\\usepackage{tikz}".to_string(),
            "\\begin{document}".to_string(),
        ]);
    }
    lines.push("\\begin{tikzpicture}[>=stealth,shorten >=1pt]".to_string());

    let inner = graph.inner();
    for (i, n) in inner.node_indices().enumerate() {
        let (x, y) = pos[i];
        let size = 4.0 + 1.5 * as_f64(graph.in_degree_of(n).max(1));
        lines.push(format!(
            "  \\node[circle,draw=red!70,fill=red!30,inner sep=2pt,minimum size={size:.1}pt] \
             (n{i}) at ({x:.2}cm,{y:.2}cm) {{{}}};",
            escape(&inner[n].title)
        ));
    }
    lines.extend(inner.edge_references().map(|e| {
        format!(
            "  \\draw[->,thick,blue] (n{}) -- (n{});",
            e.source().index(),
            e.target().index()
        )
    }));

    lines.push("\\end{tikzpicture}".to_string());
    if options.standalone {
        lines.push("\\end{document}".to_string());
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Escapes bare `_` and `%`; characters already escaped in the source are left alone.
fn escape(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut after_backslash = false;
    for c in title.chars() {
        if matches!(c, '_' | '%') && !after_backslash {
            out.push('\\');
        }
        after_backslash = c == '\\' && !after_backslash;
        out.push(c);
    }
    out
}

fn as_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
