use super::{Granularity, Outline};
use crate::document::Document;
use crate::formats::latex::LatexFormat;
use crate::section::Level;

const NESTED: &str = r"Preamble text \label{pre}
\section{First}\label{sec:first}
\subsection{First sub}
\subsubsection{Deep}
\subsection{Second sub}
\section{Second}
\subsubsection{Orphan}
\section{First}
";

fn outline(source: &str, granularity: Granularity) -> Outline {
    let format = LatexFormat::default();
    let doc = Document::parse(source, &format).unwrap();
    Outline::build(&doc.items(&format), granularity, source.len())
}

fn ids(outline: &Outline) -> Vec<&str> {
    outline.sections().iter().map(|s| s.id.as_str()).collect()
}

const ALL: Granularity = Granularity {
    include_subsections: true,
    include_subsubsections: true,
};

#[test]
fn test_sections_only_by_default() {
    let outline = outline(NESTED, Granularity::default());
    assert_eq!(ids(&outline), vec!["first", "second", "first-2"]);
    assert!(outline.sections().iter().all(|s| s.parent_index.is_none()));
    assert!(outline
        .sections()
        .iter()
        .all(|s| s.level == Level::Section && s.children_indices.is_empty()));
    assert_eq!(outline.roots(), &[0, 1, 2]);
}

#[test]
fn test_ids_do_not_depend_on_granularity() {
    let outline = outline(NESTED, ALL);
    assert_eq!(
        ids(&outline),
        vec![
            "first",
            "first-sub",
            "deep",
            "second-sub",
            "second",
            "orphan",
            "first-2"
        ]
    );
}

#[test]
fn test_parent_child_links() {
    let outline = outline(NESTED, ALL);
    let first = outline.find("first").unwrap();
    let first_sub = outline.find("first-sub").unwrap();
    let deep = outline.find("deep").unwrap();
    let second_sub = outline.find("second-sub").unwrap();
    let second = outline.find("second").unwrap();
    let orphan = outline.find("orphan").unwrap();

    assert_eq!(
        outline.section(first).unwrap().children_indices,
        vec![first_sub, second_sub]
    );
    assert_eq!(outline.section(deep).unwrap().parent_index, Some(first_sub));
    assert_eq!(outline.section(second_sub).unwrap().parent_index, Some(first));
    // A subsubsection straight under a section hangs off the section.
    assert_eq!(outline.section(orphan).unwrap().parent_index, Some(second));
    assert_eq!(outline.roots().len(), 3);
}

#[test]
fn test_subsubsections_need_subsections() {
    let outline = outline(
        NESTED,
        Granularity {
            include_subsections: false,
            include_subsubsections: true,
        },
    );
    assert_eq!(outline.len(), 3);
}

#[test]
fn test_enabling_subsections_refines_sections() {
    let coarse = outline(NESTED, Granularity::default());
    let fine = outline(
        NESTED,
        Granularity {
            include_subsections: true,
            include_subsubsections: false,
        },
    );
    for id in ids(&coarse) {
        assert!(fine.find(id).is_some(), "{id} missing at finer granularity");
    }
    assert!(fine.find("first-sub").is_some());
    assert!(fine.find("deep").is_none());
}

#[test]
fn test_active_section_per_item() {
    let source = "\\label{a}\\section{S}\\label{b}\\subsection{T}\\ref{b}";
    let folded = outline(source, Granularity::default());
    let active: Vec<_> = (0..5).map(|i| folded.active_at(i)).collect();
    assert_eq!(active, vec![None, Some(0), Some(0), Some(0), Some(0)]);

    let split = outline(
        source,
        Granularity {
            include_subsections: true,
            include_subsubsections: false,
        },
    );
    let active: Vec<_> = (0..5).map(|i| split.active_at(i)).collect();
    assert_eq!(active, vec![None, Some(0), Some(0), Some(1), Some(1)]);
    assert_eq!(split.active_at(99), None);
}

#[test]
fn test_direct_label_and_spans() {
    let source = "\\section{A}\\label{sec:a}\ntext\\label{other}\n\\section{B}\\ref{x}\\label{late}";
    let outline = outline(source, Granularity::default());
    let a = outline.section(0).unwrap();
    let b = outline.section(1).unwrap();
    assert_eq!(a.label.as_deref(), Some("sec:a"));
    assert_eq!(b.label, None);
    assert_eq!(a.byte_start, 0);
    assert_eq!(a.byte_end, b.byte_start);
    assert_eq!(&source[b.byte_start..b.byte_start + 8], "\\section");
    assert_eq!(b.byte_end, source.len());
    assert_eq!(b.line, 3);
}

#[test]
fn test_no_headings() {
    let outline = outline("just \\ref{x} text", Granularity::default());
    assert!(outline.is_empty());
    assert_eq!(outline.active_at(0), None);
}
