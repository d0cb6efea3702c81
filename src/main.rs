//! sectiongraph: graph the cross-references between sections of LaTeX documents.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, ValueEnum};
use sectiongraph::render::{self, JsonReport, Layout};
use sectiongraph::{analyse, input, Analysis, Config, Error};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "sectiongraph")]
#[command(about = "Graph the cross-references between sections of LaTeX documents", long_about = None)]
struct Args {
    /// Files or directories to analyse
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Configuration file (defaults to ./sectiongraph.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Give subsections their own nodes
    #[arg(long)]
    subsections: bool,

    /// Give subsubsections their own nodes (implies --subsections)
    #[arg(long)]
    subsubsections: bool,

    /// Drop sections with fewer distinct neighbours than this
    #[arg(long, short = 't', value_name = "N")]
    threshold: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// TikZ node placement
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<Layout>,

    /// TikZ centimetres per layout unit
    #[arg(long)]
    scale: Option<f64>,

    /// Wrap TikZ output in a compilable standalone document
    #[arg(long)]
    standalone: bool,

    /// Write output to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// More logging (repeatable)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Tikz,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Analyse every requested document; `Ok(false)` when any of them failed.
fn run(args: &Args) -> Result<bool, Error> {
    let mut cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Override config with command line args
    if args.subsections || args.subsubsections {
        cfg.include_subsections = true;
    }
    if args.subsubsections {
        cfg.include_subsubsections = true;
    }
    if let Some(threshold) = args.threshold {
        cfg.node_threshold = threshold;
    }
    if !args.ext.is_empty() {
        cfg.file_extensions.clone_from(&args.ext);
    }
    let mut tikz = cfg.tikz_options(args.standalone);
    if let Some(layout) = args.layout {
        tikz.layout = layout;
    }
    if let Some(scale) = args.scale {
        tikz.scale = scale;
    }

    let documents = input::find_documents(&args.paths, &cfg.file_extensions)?;
    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(true);
    }

    let format = cfg.format();
    let options = cfg.graph_options();
    let mut all_ok = true;
    let mut analyses: Vec<(PathBuf, Analysis)> = Vec::new();
    for path in documents {
        let result = input::read_document(&path).and_then(|source| analyse(&source, &format, &options));
        match result {
            Ok(analysis) => {
                for diagnostic in &analysis.diagnostics {
                    eprintln!("{}: {diagnostic}", path.display());
                }
                analyses.push((path, analysis));
            }
            Err(e) => {
                error!(path = %path.display(), "{e}");
                all_ok = false;
            }
        }
    }

    let rendered = match args.format {
        OutputFormat::Json => render_json(&analyses)?,
        OutputFormat::Tikz => render_tikz(&analyses, &tikz),
    };
    match &args.output {
        Some(path) => fs::write(path, rendered).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?,
        None => println!("{rendered}"),
    }
    Ok(all_ok)
}

fn render_json(analyses: &[(PathBuf, Analysis)]) -> Result<String, Error> {
    if let [(_, analysis)] = analyses {
        return render::to_json(analysis);
    }
    let reports: Vec<JsonReport<'_>> = analyses
        .iter()
        .map(|(path, analysis)| JsonReport::new(analysis, Some(path.display().to_string())))
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

fn render_tikz(analyses: &[(PathBuf, Analysis)], options: &render::TikzOptions) -> String {
    analyses
        .iter()
        .map(|(path, analysis)| {
            format!(
                "% {}\n{}",
                path.display(),
                render::to_tikz(&analysis.graph, options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
