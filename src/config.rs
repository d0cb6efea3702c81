//! Configuration to acknowledge author preferences as well as set defaults.
//!
//! Specifically, we try to find a sectiongraph.toml, and if present we load settings from there.
//! This provides the graph granularity, pruning threshold, reference commands, file extension
//! and TikZ preferences. Command line flags override whatever the file says.

use crate::error::{Error, Result};
use crate::formats::latex::{LatexFormat, DEFAULT_REFERENCE_COMMANDS};
use crate::hierarchy::Granularity;
use crate::render::{Layout, TikzOptions};
use facet::Facet;
use std::fs;
use std::path::Path;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "sectiongraph.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from sectiongraph.toml or falling back to defaults.
pub struct Config {
    #[facet(default = false)]
    /// Give subsections their own nodes.
    pub include_subsections: bool,
    #[facet(default = false)]
    /// Give subsubsections their own nodes (needs `include_subsections`).
    pub include_subsubsections: bool,
    #[facet(default = 0)]
    /// Minimum number of distinct neighbours a node needs to be kept.
    pub node_threshold: usize,
    #[facet(default = default_reference_commands())]
    /// Commands that cite labels.
    pub reference_commands: Vec<String>,
    #[facet(default = vec!["tex".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = "shell".to_string())]
    /// TikZ node placement: `shell` or `circular`.
    pub layout: String,
    #[facet(default = 10.0)]
    /// TikZ centimetres per layout unit.
    pub scale: f64,
}

fn default_reference_commands() -> Vec<String> {
    DEFAULT_REFERENCE_COMMANDS
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_subsections: false,
            include_subsubsections: false,
            node_threshold: 0,
            reference_commands: default_reference_commands(),
            file_extensions: vec!["tex".to_string()],
            layout: "shell".to_string(),
            scale: 10.0,
        }
    }
}

impl Config {
    /// Load configuration from sectiongraph.toml if present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for this schema, or names
    /// an unknown layout.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = facet_toml::from_str::<Self>(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config
            .layout
            .parse::<Layout>()
            .map_err(|message| Error::Config {
                path: path.to_path_buf(),
                message,
            })?;
        Ok(config)
    }

    #[must_use]
    /// Core graph options this configuration asks for.
    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            include_subsections: self.include_subsections,
            include_subsubsections: self.include_subsubsections,
            node_threshold: self.node_threshold,
        }
    }

    #[must_use]
    /// Format recognising the configured reference commands.
    pub fn format(&self) -> LatexFormat {
        LatexFormat::with_reference_commands(self.reference_commands.iter().cloned())
    }

    #[must_use]
    /// TikZ settings; an unparseable layout falls back to `shell`.
    pub fn tikz_options(&self, standalone: bool) -> TikzOptions {
        TikzOptions {
            layout: self.layout.parse().unwrap_or_default(),
            scale: self.scale,
            standalone,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Options of one graph construction run.
pub struct GraphOptions {
    /// Subsections become nodes instead of folding into their section.
    pub include_subsections: bool,
    /// Subsubsections become nodes; only effective with `include_subsections`.
    pub include_subsubsections: bool,
    /// Minimum distinct-neighbour degree a node needs to survive pruning; 0 disables pruning.
    pub node_threshold: usize,
}

impl GraphOptions {
    #[must_use]
    /// Heading levels that open sections.
    pub fn granularity(&self) -> Granularity {
        Granularity {
            include_subsections: self.include_subsections,
            include_subsubsections: self.include_subsubsections,
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
