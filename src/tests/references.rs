use super::resolve;
use crate::document::Document;
use crate::error::Diagnostic;
use crate::formats::latex::LatexFormat;
use crate::hierarchy::{Granularity, Outline};
use crate::labels::LabelIndex;

struct Resolved {
    outline: Outline,
    resolution: super::Resolution,
    diagnostics: Vec<Diagnostic>,
}

fn run(source: &str, granularity: Granularity) -> Resolved {
    let format = LatexFormat::default();
    let doc = Document::parse(source, &format).unwrap();
    let items = doc.items(&format);
    let outline = Outline::build(&items, granularity, source.len());
    let mut diagnostics = Vec::new();
    let labels = LabelIndex::build(&items, &outline, &mut diagnostics);
    let resolution = resolve(&items, &outline, &labels, &mut diagnostics);
    Resolved {
        outline,
        resolution,
        diagnostics,
    }
}

impl Resolved {
    fn weight(&self, source: &str, target: &str) -> Option<usize> {
        let key = (self.outline.find(source)?, self.outline.find(target)?);
        self.resolution.edges.get(&key).copied()
    }
}

#[test]
fn test_repeated_references_accumulate_weight() {
    let r = run(
        "\\section{A}\\label{a}\\section{B}\\ref{a} \\ref{a} \\cref{a}",
        Granularity::default(),
    );
    assert_eq!(r.weight("b", "a"), Some(3));
    assert_eq!(r.resolution.edges.len(), 1);
    assert_eq!(r.resolution.occurrences.len(), 3);
}

#[test]
fn test_multi_target_reference() {
    let r = run(
        "\\section{A}\\label{a}\\section{B}\\label{b}\\section{C}\\cref{a,b}",
        Granularity::default(),
    );
    assert_eq!(r.weight("c", "a"), Some(1));
    assert_eq!(r.weight("c", "b"), Some(1));
    assert_eq!(r.resolution.occurrences[0].targets, vec!["a", "b"]);
    assert_eq!(r.resolution.occurrences[0].occurring_section, r.outline.find("c"));
}

#[test]
fn test_dangling_reference_is_reported() {
    let r = run(
        "\\section{A}\\label{a}\n\\section{B}\\cref{a,nowhere}",
        Granularity::default(),
    );
    assert_eq!(r.weight("b", "a"), Some(1));
    assert_eq!(r.resolution.dangling, 1);
    assert_eq!(
        r.diagnostics,
        vec![Diagnostic::DanglingReference {
            label: "nowhere".to_string(),
            line: 2,
            section: Some("b".to_string()),
        }]
    );
}

#[test]
fn test_self_reference_is_dropped() {
    let r = run(
        "\\section{A}\\label{a}\\subsection{A1}\\label{a1}\\ref{a}",
        Granularity::default(),
    );
    assert!(r.resolution.edges.is_empty());
    assert!(r.diagnostics.is_empty());
}

#[test]
fn test_sibling_subsections_link_when_enabled() {
    let source = "\\section{A}\\subsection{A1}\\label{a1}\\subsection{A2}\\ref{a1}";
    let fine = run(
        source,
        Granularity {
            include_subsections: true,
            include_subsubsections: false,
        },
    );
    assert_eq!(fine.weight("a2", "a1"), Some(1));

    let coarse = run(source, Granularity::default());
    assert!(coarse.resolution.edges.is_empty());
}

#[test]
fn test_preamble_references_produce_no_edges() {
    let r = run(
        "\\label{intro}\\ref{a}\n\\section{A}\\label{a}\\ref{intro}",
        Granularity::default(),
    );
    assert!(r.resolution.edges.is_empty());
    assert!(r.diagnostics.is_empty());
    assert_eq!(r.resolution.occurrences[0].occurring_section, None);
}
