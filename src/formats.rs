//! Format trait and implementations for different markup dialects.
//!
//! This module defines the `Format` trait which abstracts over the command names a dialect uses
//! for headings, labels and references, and over the argument shapes the parser has to know
//! about. The graph pipeline only ever talks to a `Format`, never to command names directly.

pub mod latex;

use crate::section::Level;

/// Dialect-specific knowledge the parser and the section walk rely on.
pub trait Format {
    /// File suffix documents in this dialect carry.
    fn file_extension(&self) -> &str;

    /// Sectioning level introduced by `command`, if it is a heading.
    fn heading_level(&self, command: &str) -> Option<Level>;

    /// Whether `command` defines a label.
    fn is_label(&self, command: &str) -> bool;

    /// Whether `command` cites one or more labels.
    fn is_reference(&self, command: &str) -> bool;

    /// Argument shape of `command`.
    ///
    /// Each character describes one argument in order: `*` an optional star, `[` an optional
    /// bracketed argument, `{` a mandatory braced argument. `None` means the command takes no
    /// arguments and anything after it is ordinary content.
    fn argument_spec(&self, command: &str) -> Option<&str>;

    /// Whether the body of `environment` is raw text that must not be parsed.
    fn is_verbatim(&self, environment: &str) -> bool;

    /// Environment holding the document content proper, if the dialect has one.
    fn body_environment(&self) -> Option<&str>;
}
