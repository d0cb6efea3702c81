//! Section hierarchy construction.
//!
//! A single pass over the document's items opens a [`Section`] for every heading whose level
//! is enabled, closing whatever is at that level or deeper first. Headings at disabled levels
//! are folded into the nearest enabled ancestor. Content before the first enabled heading has
//! no section at all.

use crate::document::{Item, ItemKind};
use crate::section::{IdAllocator, Level, Section};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Which heading levels become sections of their own.
pub struct Granularity {
    /// Subsections become sections instead of folding into their section.
    pub include_subsections: bool,
    /// Subsubsections become sections. Only takes effect with `include_subsections`.
    pub include_subsubsections: bool,
}

impl Granularity {
    #[must_use]
    /// Whether headings at `level` open a section.
    pub fn includes(self, level: Level) -> bool {
        match level {
            Level::Section => true,
            Level::Subsection => self.include_subsections,
            Level::Subsubsection => self.include_subsections && self.include_subsubsections,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// The section tree of a document plus, for every item, the section it falls in.
pub struct Outline {
    sections: Vec<Section>,
    roots: Vec<usize>,
    active: Vec<Option<usize>>,
}

impl Outline {
    #[must_use]
    /// Build the outline of `items`, a document of `source_len` bytes.
    ///
    /// Every heading consumes an id whether or not its level is enabled, so ids are the same
    /// under any granularity.
    pub fn build(items: &[Item], granularity: Granularity, source_len: usize) -> Self {
        let mut ids = IdAllocator::default();
        let mut sections: Vec<Section> = Vec::new();
        let mut roots = Vec::new();
        let mut active = Vec::with_capacity(items.len());
        let mut stack: Vec<usize> = Vec::new();
        // Section still waiting for a label directly after its heading.
        let mut awaiting_label: Option<usize> = None;

        for item in items {
            match &item.kind {
                ItemKind::Heading { level, title } => {
                    let id = ids.assign(title);
                    if granularity.includes(*level) {
                        while let Some(&top) = stack.last() {
                            if sections[top].level < *level {
                                break;
                            }
                            sections[top].byte_end = item.offset;
                            stack.pop();
                        }
                        let index = sections.len();
                        let parent_index = stack.last().copied();
                        debug!(id = %id, level = %level, line = item.line, "opened section");
                        sections.push(Section {
                            id,
                            title: title.clone(),
                            level: *level,
                            label: None,
                            line: item.line,
                            byte_start: item.offset,
                            byte_end: source_len,
                            parent_index,
                            children_indices: Vec::new(),
                        });
                        match parent_index {
                            Some(parent) => sections[parent].children_indices.push(index),
                            None => roots.push(index),
                        }
                        stack.push(index);
                        awaiting_label = Some(index);
                    } else {
                        awaiting_label = None;
                    }
                }
                ItemKind::Label(label) => {
                    if let Some(index) = awaiting_label.take() {
                        sections[index].label = Some(label.clone());
                    }
                }
                ItemKind::Reference(_) => awaiting_label = None,
            }
            active.push(stack.last().copied());
        }

        Self {
            sections,
            roots,
            active,
        }
    }

    #[must_use]
    /// All sections in document order; a section's arena index is its position here.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Section at arena index `index`.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    /// Arena index of the section with id `id`.
    pub fn find(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    #[must_use]
    /// Top-level sections in document order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    /// Innermost enabled section containing item `item`; `None` inside the preamble.
    pub fn active_at(&self, item: usize) -> Option<usize> {
        self.active.get(item).copied().flatten()
    }

    #[must_use]
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    /// Whether the document has no enabled headings.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/hierarchy.rs"]
mod tests;
