use super::{Document, ItemKind, NodeKind};
use crate::formats::latex::LatexFormat;
use crate::section::Level;
use crate::Error;

fn items(source: &str) -> Vec<ItemKind> {
    let format = LatexFormat::default();
    Document::parse(source, &format)
        .unwrap()
        .items(&format)
        .into_iter()
        .map(|item| item.kind)
        .collect()
}

#[test]
fn test_items_in_document_order() {
    let kinds = items(
        "\\section{Intro}\\label{sec:intro}\nSee \\ref{sec:b}.\n\\subsection{ Deeper\n  part }",
    );
    assert_eq!(
        kinds,
        vec![
            ItemKind::Heading {
                level: Level::Section,
                title: "Intro".to_string()
            },
            ItemKind::Label("sec:intro".to_string()),
            ItemKind::Reference(vec!["sec:b".to_string()]),
            ItemKind::Heading {
                level: Level::Subsection,
                title: "Deeper part".to_string()
            },
        ]
    );
}

#[test]
fn test_multi_target_references() {
    let kinds = items(r"\cref{a, b,,c} \crefrange{d}{e}");
    assert_eq!(
        kinds,
        vec![
            ItemKind::Reference(vec!["a".into(), "b".into(), "c".into()]),
            ItemKind::Reference(vec!["d".into(), "e".into()]),
        ]
    );
}

#[test]
fn test_empty_label_and_reference_are_ignored() {
    assert!(items(r"\label{ } \ref{}").is_empty());
}

#[test]
fn test_only_document_body_is_walked() {
    let kinds = items(
        "\\newcommand{\\foo}{\\ref{pre}}\n\\begin{document}\n\\section{A}\\label{a}\n\\end{document}",
    );
    assert_eq!(kinds.len(), 2);
    assert!(!kinds.contains(&ItemKind::Reference(vec!["pre".into()])));
}

#[test]
fn test_labels_inside_environments_and_groups() {
    let kinds = items("\\begin{align}x\\label{eq:1}\\end{align}{\\bf \\eqref{eq:1}}");
    assert_eq!(
        kinds,
        vec![
            ItemKind::Label("eq:1".into()),
            ItemKind::Reference(vec!["eq:1".into()]),
        ]
    );
}

#[test]
fn test_reference_inside_heading_title() {
    let kinds = items(r"\section{Proof of \cref{thm:main}}");
    assert!(matches!(&kinds[0], ItemKind::Heading { title, .. } if title == r"Proof of \cref{thm:main}"));
    assert_eq!(kinds[1], ItemKind::Reference(vec!["thm:main".into()]));
}

#[test]
fn test_custom_reference_commands() {
    let format = LatexFormat::with_reference_commands(["\\secref"]);
    let doc = Document::parse(r"\secref{x} \ref{y}", &format).unwrap();
    let kinds: Vec<_> = doc.items(&format).into_iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![ItemKind::Reference(vec!["x".into()])]);
}

#[test]
fn test_item_lines() {
    let format = LatexFormat::default();
    let doc = Document::parse("\n\n\\section{A}\n\\label{a}", &format).unwrap();
    let lines: Vec<usize> = doc.items(&format).iter().map(|i| i.line).collect();
    assert_eq!(lines, vec![3, 4]);
}

#[test]
fn test_node_kinds() {
    let format = LatexFormat::default();
    let doc = Document::parse(r"\subsubsection{X}\label{l}\autoref{l}\emph{t}", &format).unwrap();
    let kinds: Vec<NodeKind> = doc.walk(&format).map(|n| n.kind(&format)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Heading(Level::Subsubsection),
            NodeKind::Text,
            NodeKind::LabelDef,
            NodeKind::Reference,
            NodeKind::Other,
            NodeKind::Group,
            NodeKind::Text,
        ]
    );
}

#[test]
fn test_parse_failure_propagates() {
    let result = Document::parse("{", &LatexFormat::default());
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_named_commands_are_not_items() {
    let kinds = items("\\titleformat{\\section}{\\bfseries}\n\\let\\oldref\\ref\n\\section{A}\\label{a}");
    assert_eq!(
        kinds,
        vec![
            ItemKind::Heading {
                level: Level::Section,
                title: "A".to_string()
            },
            ItemKind::Label("a".into()),
        ]
    );
}
