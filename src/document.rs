//! Uniform view over a parsed document.
//!
//! The rest of the pipeline never matches on parser nodes directly. It asks a [`Document`] for
//! the sequence of [`Item`]s (headings, label definitions and references) in document order,
//! each tagged with where it occurred.

use crate::error::Result;
use crate::formats::Format;
use crate::latex::{self, Node};
use crate::section::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Semantic role of a node under a given format.
pub enum NodeKind {
    /// A sectioning command.
    Heading(Level),
    /// A label-defining command.
    LabelDef,
    /// A command citing labels.
    Reference,
    /// Any `\begin{..}` block.
    Environment,
    /// A bare brace group.
    Group,
    /// Plain or verbatim text.
    Text,
    /// Any other command.
    Other,
}

impl Node {
    #[must_use]
    /// Classify this node according to `format`.
    pub fn kind<F: Format + ?Sized>(&self, format: &F) -> NodeKind {
        match self {
            Self::Command(command) => {
                if let Some(level) = format.heading_level(&command.name) {
                    NodeKind::Heading(level)
                } else if format.is_label(&command.name) {
                    NodeKind::LabelDef
                } else if format.is_reference(&command.name) {
                    NodeKind::Reference
                } else {
                    NodeKind::Other
                }
            }
            Self::Environment(_) => NodeKind::Environment,
            Self::Group(_) => NodeKind::Group,
            Self::Text(_) => NodeKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a structurally interesting node means for the graph.
pub enum ItemKind {
    /// A heading with its normalised title.
    Heading {
        /// Heading depth.
        level: Level,
        /// Title text with whitespace collapsed.
        title: String,
    },
    /// Definition of a label.
    Label(String),
    /// A reference citing one or more labels.
    Reference(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A heading, label or reference together with its position.
pub struct Item {
    /// What was found.
    pub kind: ItemKind,
    /// Byte offset of the command.
    pub offset: usize,
    /// 1-based line of the command.
    pub line: usize,
}

#[derive(Debug, Clone)]
/// A successfully parsed document.
pub struct Document {
    source: String,
    nodes: Vec<Node>,
}

impl Document {
    /// Parse `source` with `format`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] when the text cannot be turned into a tree.
    pub fn parse<F: Format + ?Sized>(source: impl Into<String>, format: &F) -> Result<Self> {
        let source = source.into();
        let nodes = latex::parse(&source, format)?;
        Ok(Self { source, nodes })
    }

    #[must_use]
    /// The text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    /// Top-level nodes of the whole text.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    /// Content nodes: the body environment's children when the document has one, else everything.
    pub fn body<F: Format + ?Sized>(&self, format: &F) -> &[Node] {
        let Some(body) = format.body_environment() else {
            return &self.nodes;
        };
        Walk::new(&self.nodes, format)
            .find_map(|node| match node {
                Node::Environment(env) if env.name == body => Some(env.children.as_slice()),
                _ => None,
            })
            .unwrap_or(&self.nodes)
    }

    #[must_use]
    /// Depth-first walk over the body in document order.
    pub fn walk<'a, 'f, F: Format + ?Sized>(&'a self, format: &'f F) -> Walk<'a, 'f, F> {
        Walk::new(self.body(format), format)
    }

    #[must_use]
    /// Headings, labels and references of the body, in document order.
    pub fn items<F: Format + ?Sized>(&self, format: &F) -> Vec<Item> {
        let lines = LineIndex::new(&self.source);
        let mut items = Vec::new();
        for node in self.walk(format) {
            let Node::Command(command) = node else {
                continue;
            };
            let kind = match node.kind(format) {
                NodeKind::Heading(level) => {
                    // A bare `\section` is only being named, e.g. by `\titleformat{\section}`.
                    let Some(title) = command.mandatory_args().next() else {
                        continue;
                    };
                    ItemKind::Heading {
                        level,
                        title: normalise(&title.raw),
                    }
                }
                NodeKind::LabelDef => {
                    match command.mandatory_args().next().map(|arg| arg.raw.trim()) {
                        Some(label) if !label.is_empty() => ItemKind::Label(label.to_string()),
                        _ => continue,
                    }
                }
                NodeKind::Reference => {
                    let targets: Vec<String> = command
                        .mandatory_args()
                        .flat_map(|arg| arg.raw.split(','))
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect();
                    if targets.is_empty() {
                        continue;
                    }
                    ItemKind::Reference(targets)
                }
                _ => continue,
            };
            let offset = command.span.start;
            items.push(Item {
                kind,
                offset,
                line: lines.line(offset),
            });
        }
        items
    }
}

/// Pre-order iterator over a node forest, driven by an explicit stack.
///
/// Heading arguments are descended into, so a reference inside a title is seen right after the
/// heading itself. Label and reference arguments are leaves.
pub struct Walk<'a, 'f, F: ?Sized> {
    format: &'f F,
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a, 'f, F: Format + ?Sized> Walk<'a, 'f, F> {
    #[must_use]
    /// Walk `nodes` and everything below them.
    pub fn new(nodes: &'a [Node], format: &'f F) -> Self {
        Self {
            format,
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a, F: Format + ?Sized> Iterator for Walk<'a, '_, F> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(node) = top.next() else {
                self.stack.pop();
                continue;
            };
            match node {
                Node::Command(command) => {
                    if !matches!(
                        node.kind(self.format),
                        NodeKind::LabelDef | NodeKind::Reference
                    ) {
                        for arg in command.args.iter().rev() {
                            self.stack.push(arg.children.iter());
                        }
                    }
                }
                Node::Environment(_) | Node::Group(_) => self.stack.push(node.children().iter()),
                Node::Text(_) => {}
            }
            return Some(node);
        }
    }
}

fn normalise(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset to line number lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
