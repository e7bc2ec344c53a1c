//! Command-line interface for gfa-graph.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **stats**: Summarize the segments, edges and subgraphs of a GFA file
//! - **dovetails**: List the left and right dovetail neighbors of nodes
//! - **degree**: Count the left and right dovetail neighbors of nodes
//!
//! ## Usage
//!
//! ```text
//! # Summarize a graph
//! gfa-graph stats assembly.gfa
//!
//! # Neighbors of two segments, as JSON
//! gfa-graph dovetails assembly.gfa --nodes 11,12 --format json
//!
//! # Read from stdin, skipping malformed lines
//! zcat assembly.gfa.gz | gfa-graph degree - --lenient
//! ```

use std::io::BufReader;
use std::path::Path;

use clap::{Parser, Subcommand};

use crate::graph::dovetail::NodeBunch;
use crate::graph::gfa::{Gfa, LoadOptions};
use crate::graph::store::GraphStore;

pub mod degree;
pub mod dovetails;
pub mod stats;

#[derive(Parser)]
#[command(name = "gfa-graph")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Load GFA 1/2 assembly graphs and query dovetail overlaps")]
#[command(
    long_about = "gfa-graph parses GFA 1 and GFA 2 files into a typed assembly graph.\n\nSegments become nodes; links, containments, fragments, edges and gaps become edges; paths and groups become subgraphs. Dovetail overlaps can then be queried by the segment end they join."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a GFA file
    Stats(stats::StatsArgs),

    /// List dovetail neighbors at the left and right end of nodes
    Dovetails(dovetails::DovetailsArgs),

    /// Count dovetail neighbors at the left and right end of nodes
    Degree(degree::DegreeArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a GFA file, or stdin when `path` is `-`
pub(crate) fn load_graph(path: &Path, lenient: bool) -> anyhow::Result<Gfa> {
    let options = if lenient {
        LoadOptions::lenient()
    } else {
        LoadOptions::default()
    };

    let gfa = if path.as_os_str() == "-" {
        Gfa::from_reader(BufReader::new(std::io::stdin().lock()), &options)?
    } else {
        Gfa::from_path(path, &options)?
    };
    Ok(gfa)
}

/// The known nodes selected by `nodes`, in selection order
pub(crate) fn selected_nodes(gfa: &Gfa, nodes: &NodeBunch) -> Vec<String> {
    let graph = gfa.graph();
    let requested: Vec<&str> = match nodes {
        NodeBunch::All => return graph.node_ids().map(str::to_string).collect(),
        NodeBunch::Single(id) => vec![id.as_str()],
        NodeBunch::Many(ids) => ids.iter().map(String::as_str).collect(),
    };

    let mut selected: Vec<String> = Vec::with_capacity(requested.len());
    for id in requested {
        if !graph.contains_node(id) {
            tracing::warn!(node = %id, "Node not found in graph");
        } else if !selected.iter().any(|s| s == id) {
            selected.push(id.to_string());
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_nodes() {
        let gfa = Gfa::from_text("S\ta\tA\nS\tb\tC\n", &LoadOptions::default()).unwrap();

        assert_eq!(selected_nodes(&gfa, &NodeBunch::All), vec!["a", "b"]);
        assert_eq!(
            selected_nodes(&gfa, &NodeBunch::many(["b", "x", "b", "a"])),
            vec!["b", "a"]
        );
        assert!(selected_nodes(&gfa, &"x".into()).is_empty());
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["gfa-graph", "stats", "g.gfa", "--format", "json", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Stats(_)));
    }
}
