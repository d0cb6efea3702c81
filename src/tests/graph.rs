use super::{GraphEdge, SectionGraph};
use crate::document::Document;
use crate::formats::latex::LatexFormat;
use crate::hierarchy::{Granularity, Outline};
use crate::labels::LabelIndex;
use crate::references::resolve;

const STAR: &str = r"\section{Hub}\label{hub}
\section{A}\label{a}\ref{hub}
\section{B}\ref{hub}\ref{hub}
\section{C}\cref{hub}
\section{D}\ref{a}
";

fn assemble(source: &str) -> SectionGraph {
    let format = LatexFormat::default();
    let doc = Document::parse(source, &format).unwrap();
    let items = doc.items(&format);
    let outline = Outline::build(&items, Granularity::default(), source.len());
    let mut diagnostics = Vec::new();
    let labels = LabelIndex::build(&items, &outline, &mut diagnostics);
    let resolution = resolve(&items, &outline, &labels, &mut diagnostics);
    SectionGraph::assemble(&outline, &resolution.edges)
}

fn edge(source: &str, target: &str, weight: usize) -> GraphEdge {
    GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
        weight,
    }
}

#[test]
fn test_assemble_keeps_every_section() {
    let graph = assemble(STAR);
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.edge_weight("b", "hub"), Some(2));
    assert_eq!(graph.edge_weight("hub", "b"), None);
    assert_eq!(graph.edge_weight("nope", "hub"), None);
    assert_eq!(graph.in_degree("hub"), Some(3));
    assert_eq!(graph.degree("a"), Some(2));
    assert_eq!(graph.degree("d"), Some(1));
    assert_eq!(graph.node("c").map(|n| n.title.as_str()), Some("C"));
}

#[test]
fn test_isolated_sections_are_nodes() {
    let graph = assemble(r"\section{Alone}\section{Also alone}");
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.degree("alone"), Some(0));
}

#[test]
fn test_export_order() {
    let export = assemble(STAR).export();
    let ids: Vec<_> = export.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["hub", "a", "b", "c", "d"]);
    assert_eq!(
        export.edges,
        vec![
            edge("a", "hub", 1),
            edge("b", "hub", 2),
            edge("c", "hub", 1),
            edge("d", "a", 1),
        ]
    );
}

#[test]
fn test_prune_zero_keeps_everything() {
    let graph = assemble(STAR);
    let pruned = graph.prune(0);
    assert_eq!(pruned.export(), graph.export());
}

#[test]
fn test_prune_is_a_single_pass() {
    let pruned = assemble(STAR).prune(2);
    assert!(pruned.contains("hub"));
    // A drops to one neighbour once D is gone, but degrees are taken before removal.
    assert!(pruned.contains("a"));
    assert!(!pruned.contains("b"));
    assert!(!pruned.contains("d"));
    assert_eq!(pruned.export().edges, vec![edge("a", "hub", 1)]);
    assert_eq!(pruned.degree("a"), Some(1));
}

#[test]
fn test_prune_removes_incident_edges() {
    let pruned = assemble(STAR).prune(3);
    assert_eq!(pruned.node_count(), 1);
    assert_eq!(pruned.edge_count(), 0);
    assert_eq!(pruned.edge_weight("a", "hub"), None);
}

#[test]
fn test_mutual_references_count_one_neighbour() {
    let graph = assemble(r"\section{X}\label{x}\ref{y}\section{Y}\label{y}\ref{x}");
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.degree("x"), Some(1));
    assert!(graph.prune(2).nodes().next().is_none());
    assert_eq!(graph.prune(1).node_count(), 2);
}
