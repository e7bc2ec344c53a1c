use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_graph, OutputFormat};
use crate::graph::gfa::Gfa;

#[derive(Args)]
pub struct StatsArgs {
    /// Input GFA file (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Skip malformed lines instead of failing
    #[arg(long)]
    pub lenient: bool,
}

pub fn run(args: StatsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let gfa = load_graph(&args.input, args.lenient)?;

    if verbose {
        eprintln!(
            "Loaded {} nodes and {} edges from {}",
            gfa.node_count(),
            gfa.edge_count(),
            args.input.display()
        );
    }

    let stats = GraphStats::collect(&gfa);
    match format {
        OutputFormat::Text => print_text_stats(&args, &stats),
        OutputFormat::Json => print_json_stats(&args, &stats)?,
        OutputFormat::Tsv => print_tsv_stats(&stats),
    }

    Ok(())
}

struct GraphStats {
    version: Option<String>,
    nodes: usize,
    undefined_nodes: usize,
    edges: usize,
    dovetails: usize,
    subgraphs: usize,
    skipped_lines: usize,
}

impl GraphStats {
    fn collect(gfa: &Gfa) -> Self {
        Self {
            version: gfa.header().get("VN").map(|f| f.value.to_string()),
            nodes: gfa.node_count(),
            undefined_nodes: gfa.graph().undefined_nodes().count(),
            edges: gfa.edge_count(),
            dovetails: gfa.dovetail_count(),
            subgraphs: gfa.subgraph_count(),
            skipped_lines: gfa.skipped_lines(),
        }
    }
}

fn print_text_stats(args: &StatsArgs, stats: &GraphStats) {
    println!("GFA Summary");
    println!("{}", "=".repeat(60));
    println!("\nFile: {}", args.input.display());
    if let Some(version) = &stats.version {
        println!("  Version: {version}");
    }
    println!("  Nodes: {}", stats.nodes);
    if stats.undefined_nodes > 0 {
        println!("  Undefined segments: {}", stats.undefined_nodes);
    }
    println!("  Edges: {}", stats.edges);
    println!("  Dovetail overlaps: {}", stats.dovetails);
    println!("  Subgraphs: {}", stats.subgraphs);
    if stats.skipped_lines > 0 {
        println!("  Skipped lines: {}", stats.skipped_lines);
    }
}

fn print_json_stats(args: &StatsArgs, stats: &GraphStats) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "file": args.input.display().to_string(),
        "version": stats.version,
        "nodes": stats.nodes,
        "undefined_nodes": stats.undefined_nodes,
        "edges": stats.edges,
        "dovetails": stats.dovetails,
        "subgraphs": stats.subgraphs,
        "skipped_lines": stats.skipped_lines,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_stats(stats: &GraphStats) {
    println!("nodes\tundefined_nodes\tedges\tdovetails\tsubgraphs\tskipped_lines");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        stats.nodes,
        stats.undefined_nodes,
        stats.edges,
        stats.dovetails,
        stats.subgraphs,
        stats.skipped_lines,
    );
}
