use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{load_graph, selected_nodes, OutputFormat};
use crate::graph::dovetail::NodeBunch;

#[derive(Args)]
pub struct DovetailsArgs {
    /// Input GFA file (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Node id or comma-separated node ids (default: all nodes)
    #[arg(short, long, value_parser = NodeBunch::parse)]
    pub nodes: Option<NodeBunch>,

    /// Skip malformed lines instead of failing
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Serialize)]
struct NodeNeighbors {
    node: String,
    left: Vec<String>,
    right: Vec<String>,
}

pub fn run(args: DovetailsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let gfa = load_graph(&args.input, args.lenient)?;
    let nodes = args.nodes.unwrap_or_default();
    let queries = gfa.dovetails();

    let report: Vec<NodeNeighbors> = selected_nodes(&gfa, &nodes)
        .into_iter()
        .map(|node| {
            let bunch = NodeBunch::Single(node.clone());
            NodeNeighbors {
                left: queries.left_neighbors(&bunch).map(str::to_string).collect(),
                right: queries.right_neighbors(&bunch).map(str::to_string).collect(),
                node,
            }
        })
        .collect();

    if verbose {
        eprintln!(
            "{} nodes, {} dovetail overlaps in total",
            report.len(),
            gfa.dovetail_count()
        );
    }

    match format {
        OutputFormat::Text => print_text_neighbors(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv_neighbors(&report),
    }

    Ok(())
}

fn joined(ids: &[String]) -> String {
    if ids.is_empty() {
        "*".to_string()
    } else {
        ids.join(",")
    }
}

fn print_text_neighbors(report: &[NodeNeighbors]) {
    if report.is_empty() {
        println!("No matching nodes.");
        return;
    }

    for entry in report {
        println!("{}", entry.node);
        println!("  Left:  {}", joined(&entry.left));
        println!("  Right: {}", joined(&entry.right));
    }
}

fn print_tsv_neighbors(report: &[NodeNeighbors]) {
    println!("node\tleft\tright");
    for entry in report {
        println!(
            "{}\t{}\t{}",
            entry.node,
            joined(&entry.left),
            joined(&entry.right)
        );
    }
}
