use super::LabelIndex;
use crate::document::Document;
use crate::error::Diagnostic;
use crate::formats::latex::LatexFormat;
use crate::hierarchy::{Granularity, Outline};

fn index(source: &str, granularity: Granularity) -> (Outline, LabelIndex, Vec<Diagnostic>) {
    let format = LatexFormat::default();
    let doc = Document::parse(source, &format).unwrap();
    let items = doc.items(&format);
    let outline = Outline::build(&items, granularity, source.len());
    let mut diagnostics = Vec::new();
    let labels = LabelIndex::build(&items, &outline, &mut diagnostics);
    (outline, labels, diagnostics)
}

#[test]
fn test_labels_owned_by_enclosing_section() {
    let source = "\\label{pre}\n\\section{A}\\label{a}\n\\subsection{A1}\n\\begin{equation}\\label{eq:a1}\\end{equation}\n\\section{B}\\label{b}";
    let (outline, labels, diagnostics) = index(source, Granularity::default());
    assert!(diagnostics.is_empty());
    assert_eq!(labels.len(), 4);
    assert_eq!(labels.get("pre").unwrap().owner, None);
    assert_eq!(labels.get("a").unwrap().owner, outline.find("a"));
    // The subsection is folded into A.
    assert_eq!(labels.get("eq:a1").unwrap().owner, outline.find("a"));
    assert_eq!(labels.get("b").unwrap().owner, outline.find("b"));
    assert!(labels.get("missing").is_none());
}

#[test]
fn test_labels_follow_granularity() {
    let source = "\\section{A}\\subsection{A1}\\label{x}";
    let (outline, labels, _) = index(
        source,
        Granularity {
            include_subsections: true,
            include_subsubsections: false,
        },
    );
    assert_eq!(labels.get("x").unwrap().owner, outline.find("a1"));
}

#[test]
fn test_duplicate_label_last_write_wins() {
    let source = "\\section{A}\\label{dup}\n\\section{B}\n\\label{dup}";
    let (outline, labels, diagnostics) = index(source, Granularity::default());
    let entry = labels.get("dup").unwrap();
    assert_eq!(entry.owner, outline.find("b"));
    assert_eq!(entry.line, 3);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::DuplicateLabel {
            label: "dup".to_string(),
            line: 3,
            previous_line: 1,
        }]
    );
}

#[test]
fn test_empty_document() {
    let (_, labels, diagnostics) = index("", Granularity::default());
    assert!(labels.is_empty());
    assert!(diagnostics.is_empty());
}
