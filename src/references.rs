//! Reference resolution.
//!
//! Every reference occurrence is attributed to the section it appears in, and each label it
//! cites is looked up in the [`LabelIndex`]. A cited label owned by a different section yields
//! one count on the `(citing, owning)` pair; undefined labels are reported and skipped, and
//! references within a single section are dropped.

use crate::document::{Item, ItemKind};
use crate::error::Diagnostic;
use crate::hierarchy::Outline;
use crate::labels::LabelIndex;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Occurrence counts keyed by `(source, target)` section arena indices.
pub type EdgeCounts = BTreeMap<(usize, usize), usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One reference command in the body text.
pub struct ReferenceOccurrence {
    /// Labels cited, in the order written. Never empty.
    pub targets: Vec<String>,
    /// Arena index of the innermost enabled section around the reference.
    pub occurring_section: Option<usize>,
    /// 1-based line of the reference.
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
/// Outcome of resolving every reference in a document.
pub struct Resolution {
    /// All occurrences in document order.
    pub occurrences: Vec<ReferenceOccurrence>,
    /// Provisional edge set.
    pub edges: EdgeCounts,
    /// Number of cited labels that had no definition.
    pub dangling: usize,
}

/// Resolve every reference in `items` against `labels`.
pub fn resolve(
    items: &[Item],
    outline: &Outline,
    labels: &LabelIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Resolution {
    let mut resolution = Resolution::default();
    for (position, item) in items.iter().enumerate() {
        let ItemKind::Reference(targets) = &item.kind else {
            continue;
        };
        let occurring = outline.active_at(position);

        for target in targets {
            let Some(entry) = labels.get(target) else {
                let section = occurring
                    .and_then(|index| outline.section(index))
                    .map(|s| s.id.clone());
                warn!(label = %target, line = item.line, "reference to undefined label");
                resolution.dangling += 1;
                diagnostics.push(Diagnostic::DanglingReference {
                    label: target.clone(),
                    line: item.line,
                    section,
                });
                continue;
            };
            let (Some(source), Some(owner)) = (occurring, entry.owner) else {
                debug!(label = %target, line = item.line, "reference outside any section, skipped");
                continue;
            };
            if source == owner {
                trace!(label = %target, line = item.line, "self reference, skipped");
                continue;
            }
            *resolution.edges.entry((source, owner)).or_insert(0) += 1;
        }

        resolution.occurrences.push(ReferenceOccurrence {
            targets: targets.clone(),
            occurring_section: occurring,
            line: item.line,
        });
    }
    resolution
}

#[cfg(test)]
#[path = "tests/references.rs"]
mod tests;
