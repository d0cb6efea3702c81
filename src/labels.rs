//! Label index: which section owns each label.

use crate::document::{Item, ItemKind};
use crate::error::Diagnostic;
use crate::hierarchy::Outline;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a label was defined.
pub struct LabelEntry {
    /// The label string.
    pub label: String,
    /// Arena index of the innermost enabled section around the definition; `None` in the preamble.
    pub owner: Option<usize>,
    /// 1-based line of the definition.
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
/// Label lookup for one document.
pub struct LabelIndex {
    entries: HashMap<String, LabelEntry>,
}

impl LabelIndex {
    /// Index every label definition in `items`.
    ///
    /// A label defined twice keeps its later definition and adds a
    /// [`Diagnostic::DuplicateLabel`] to `diagnostics`.
    pub fn build(items: &[Item], outline: &Outline, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut entries = HashMap::new();
        for (position, item) in items.iter().enumerate() {
            let ItemKind::Label(label) = &item.kind else {
                continue;
            };
            let entry = LabelEntry {
                label: label.clone(),
                owner: outline.active_at(position),
                line: item.line,
            };
            if let Some(previous) = entries.insert(label.clone(), entry) {
                warn!(
                    label = %label,
                    line = item.line,
                    previous_line = previous.line,
                    "label defined more than once, keeping the later definition"
                );
                diagnostics.push(Diagnostic::DuplicateLabel {
                    label: label.clone(),
                    line: item.line,
                    previous_line: previous.line,
                });
            }
        }
        Self { entries }
    }

    #[must_use]
    /// Definition of `label`, if any.
    pub fn get(&self, label: &str) -> Option<&LabelEntry> {
        self.entries.get(label)
    }

    #[must_use]
    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Whether no labels were defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/labels.rs"]
mod tests;
