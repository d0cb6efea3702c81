//! LaTeX format implementation.
//!
//! Covers the standard sectioning commands, `\label`, and the reference commands of the LaTeX
//! kernel, `hyperref` and `cleveref`. The reference set can be replaced from configuration for
//! documents that define their own citing macros.

use crate::formats::Format;
use crate::section::Level;

/// Reference commands recognised when nothing else is configured.
pub const DEFAULT_REFERENCE_COMMANDS: &[&str] = &[
    "ref",
    "eqref",
    "pageref",
    "autoref",
    "nameref",
    "cref",
    "Cref",
    "crefrange",
    "Crefrange",
];

const VERBATIM_ENVIRONMENTS: &[&str] = &["verbatim", "verbatim*", "lstlisting", "minted", "comment"];

#[derive(Debug, Clone)]
/// Command tables for LaTeX sources.
pub struct LatexFormat {
    reference_commands: Vec<String>,
}

impl Default for LatexFormat {
    fn default() -> Self {
        Self::with_reference_commands(DEFAULT_REFERENCE_COMMANDS.iter().copied())
    }
}

impl LatexFormat {
    #[must_use]
    /// Build a format that treats exactly `commands` as reference commands.
    pub fn with_reference_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reference_commands: commands
                .into_iter()
                .map(Into::into)
                .map(|c: String| c.trim_start_matches('\\').to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    #[must_use]
    /// Reference commands this format recognises.
    pub fn reference_commands(&self) -> &[String] {
        &self.reference_commands
    }
}

impl Format for LatexFormat {
    fn file_extension(&self) -> &'static str {
        "tex"
    }

    fn heading_level(&self, command: &str) -> Option<Level> {
        match command {
            "section" => Some(Level::Section),
            "subsection" => Some(Level::Subsection),
            "subsubsection" => Some(Level::Subsubsection),
            _ => None,
        }
    }

    fn is_label(&self, command: &str) -> bool {
        command == "label"
    }

    fn is_reference(&self, command: &str) -> bool {
        self.reference_commands.iter().any(|c| c == command)
    }

    fn argument_spec(&self, command: &str) -> Option<&str> {
        if self.heading_level(command).is_some() {
            Some("*[{")
        } else if self.is_label(command) {
            Some("[{")
        } else if command.ends_with("range") && self.is_reference(command) {
            Some("*{{")
        } else if self.is_reference(command) {
            Some("*{")
        } else {
            None
        }
    }

    fn is_verbatim(&self, environment: &str) -> bool {
        VERBATIM_ENVIRONMENTS.contains(&environment)
    }

    fn body_environment(&self) -> Option<&str> {
        Some("document")
    }
}
