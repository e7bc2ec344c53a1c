use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_graph, selected_nodes, OutputFormat};
use crate::graph::dovetail::{Degree, NodeBunch};

#[derive(Args)]
pub struct DegreeArgs {
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

pub fn run(args: DegreeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let gfa = load_graph(&args.input, args.lenient)?;
    let nodes = args.nodes.unwrap_or_default();
    let queries = gfa.dovetails();

    let left = queries.left_degree(&nodes);
    let right = queries.right_degree(&nodes);

    if verbose {
        eprintln!("{} dovetail overlaps in total", gfa.dovetail_count());
    }

    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            let order = selected_nodes(&gfa, &nodes);
            let left = per_node(left, &order);
            let right = per_node(right, &order);
            if matches!(format, OutputFormat::Tsv) {
                println!("node\tleft_degree\tright_degree");
                for node in &order {
                    println!("{node}\t{}\t{}", left[node], right[node]);
                }
            } else if order.is_empty() {
                println!("No matching nodes.");
            } else {
                for node in &order {
                    println!("{node}\tleft={}\tright={}", left[node], right[node]);
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "left": left, "right": right });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Flatten a degree result into a per-node map covering every node of `order`
fn per_node(degree: Degree, order: &[String]) -> BTreeMap<String, usize> {
    match degree {
        Degree::Single(count) => order.iter().map(|node| (node.clone(), count)).collect(),
        Degree::Many(mut map) => {
            for node in order {
                map.entry(node.clone()).or_insert(0);
            }
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_node() {
        let order = vec!["a".to_string()];
        assert_eq!(per_node(Degree::Single(3), &order)["a"], 3);

        let many = Degree::Many(BTreeMap::from([("a".to_string(), 1)]));
        let order = vec!["a".to_string(), "b".to_string()];
        let map = per_node(many, &order);
        assert_eq!(map["a"], 1);
        assert_eq!(map["b"], 0);
    }
}
