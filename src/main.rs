use clap::{Parser, Subcommand};

use vellum_rs::vellum::workflow::format::{
    format_duration_ms, summarize_for_display, SUMMARY_MAX_ITEMS,
};
use vellum_rs::vellum::workflow::graph::{
    build_definition_graph, build_live_run_graph, classify, WorkflowGraph,
};
use vellum_rs::vellum::workflow::loader::WorkflowLoader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build and print the graph for a workflow definition, optionally
    /// merged with a run's step records
    Inspect {
        /// Path to the workflow definition (JSON or YAML)
        #[arg(short, long)]
        definition: String,

        /// Path to the run's step records (JSON or YAML)
        #[arg(short, long)]
        steps: Option<String>,

        /// Emit Graphviz DOT instead of the summary table
        #[arg(long)]
        dot: bool,
    },
    /// Show how a node type string is classified
    Describe {
        /// Dotted node type, e.g. human.approval
        #[arg(short, long)]
        node_type: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Inspect {
            definition,
            steps,
            dot,
        } => {
            let loader = WorkflowLoader::new();
            let def = loader.load_definition(&definition)?;
            let graph = match steps {
                Some(path) => {
                    let steps = loader.load_steps(&path)?;
                    log::info!("merging {} step record(s) into the graph", steps.len());
                    build_live_run_graph(&def, &steps)
                }
                None => build_definition_graph(&def),
            };
            if dot {
                print_dot(&graph);
            } else {
                print_summary(&graph);
            }
        }
        Commands::Describe { node_type } => {
            let verdict = classify(&node_type);
            println!("kind:        {}", verdict.kind.as_str());
            println!("label:       {}", verdict.label);
            println!("description: {}", verdict.description);
        }
    }

    Ok(())
}

fn print_summary(graph: &WorkflowGraph) {
    println!("{} node(s), {} edge(s)", graph.nodes.len(), graph.edges.len());
    for node in &graph.nodes {
        println!(
            "  [{}] {} <{}> status={} duration={}",
            node.index,
            node.label,
            node.node_type,
            node.status,
            format_duration_ms(node.duration_ms),
        );
        let input = node.raw.step.as_ref().and_then(|step| step.input.as_ref());
        if let Some(input) = input {
            for row in summarize_for_display(input, SUMMARY_MAX_ITEMS) {
                println!("        {}: {}", row.key, row.value);
            }
        }
    }
    for edge in &graph.edges {
        let marker = if edge.active { " (active)" } else { "" };
        println!("  {} -> {}{}", edge.from, edge.to, marker);
    }
}

fn print_dot(graph: &WorkflowGraph) {
    println!("digraph workflow {{");
    println!("  rankdir=LR;");
    for node in &graph.nodes {
        println!(
            "  \"{}\" [label=\"{}\\n{}\"];",
            escape(&node.id),
            escape(&node.label),
            escape(&node.status),
        );
    }
    for edge in &graph.edges {
        let attrs = if edge.active { " [penwidth=2]" } else { "" };
        println!(
            "  \"{}\" -> \"{}\"{};",
            escape(&edge.from),
            escape(&edge.to),
            attrs
        );
    }
    println!("}}");
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
