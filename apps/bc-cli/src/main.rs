use bc_app::{
    AppError, AppResult, GraphSummary, build_all, build_graph, find_basin, list_basins,
    load_basin_file,
};
use bc_core::UnitSystem;
use bc_graph::{Edge, Graph};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "bc-cli")]
#[command(about = "Basin connectivity CLI - build stream network graphs from basin files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate basin file syntax and structure
    Validate {
        /// Path to the basin file (.yaml, .yml or .json)
        basin_path: PathBuf,
    },
    /// List basins in a basin file
    Basins {
        /// Path to the basin file
        basin_path: PathBuf,
    },
    /// Build and print the connectivity graph of one basin
    Graph {
        /// Path to the basin file
        basin_path: PathBuf,
        /// Basin name (case-insensitive)
        basin: String,
        /// Re-express stations in a unit system before building (EN or SI)
        #[arg(long, value_parser = parse_unit_system)]
        unit: Option<UnitSystem>,
        /// Write the graph as JSON instead of a text listing
        #[arg(long)]
        json: bool,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build every basin in a file and summarize the graphs
    Summary {
        /// Path to the basin file
        basin_path: PathBuf,
    },
}

fn parse_unit_system(code: &str) -> Result<UnitSystem, String> {
    UnitSystem::parse(code).map_err(|e| e.to_string())
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { basin_path } => cmd_validate(&basin_path),
        Commands::Basins { basin_path } => cmd_basins(&basin_path),
        Commands::Graph {
            basin_path,
            basin,
            unit,
            json,
            output,
        } => cmd_graph(&basin_path, &basin, unit, json, output.as_deref()),
        Commands::Summary { basin_path } => cmd_summary(&basin_path),
    }
}

fn cmd_validate(basin_path: &Path) -> AppResult<()> {
    println!("Validating basin file: {}", basin_path.display());
    let file = load_basin_file(basin_path)?;
    println!("✓ Basin file is valid ({} basins)", file.basins.len());
    Ok(())
}

fn cmd_basins(basin_path: &Path) -> AppResult<()> {
    let file = load_basin_file(basin_path)?;
    let basins = list_basins(&file);

    if basins.is_empty() {
        println!("No basins found in file");
    } else {
        println!("Basins in file:");
        for basin in basins {
            println!(
                "  {} ({}) - {} streams, {} locations, {} reaches",
                basin.name,
                basin.office_id,
                basin.stream_count,
                basin.location_count,
                basin.reach_count
            );
        }
    }
    Ok(())
}

fn cmd_graph(
    basin_path: &Path,
    basin_name: &str,
    unit: Option<UnitSystem>,
    json: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let file = load_basin_file(basin_path)?;
    let basin = find_basin(&file, basin_name)?;
    let graph = build_graph(basin, unit)?;

    if graph.is_empty() {
        warn!(basin = %graph.name(), "basin has no primary stream; graph is empty");
    }

    let rendered = if json {
        let mut text = serde_json::to_string_pretty(&graph.to_view())?;
        text.push('\n');
        text
    } else {
        render_text(&graph)
    };

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, rendered).map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        println!(
            "✓ Wrote graph {} ({} nodes, {} edges) to {}",
            graph.name(),
            graph.nodes().len(),
            graph.edges().len(),
            path.display()
        );
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn render_text(graph: &Graph) -> String {
    let mut out = format!("Graph: {}\n", graph.name());
    out.push_str(&format!("Nodes ({}):\n", graph.nodes().len()));
    for node in graph.nodes() {
        let bank = node.bank().map(|b| b.code()).unwrap_or("-");
        out.push_str(&format!(
            "  {:<32} {:<18} stream={} station={} bank={}\n",
            node.id(),
            node.label(),
            node.stream_id(),
            node.station(),
            bank
        ));
    }
    out.push_str(&format!("Edges ({}):\n", graph.edges().len()));
    for edge in graph.edges() {
        let tag = match edge {
            Edge::Stream(e) => format!("stream={}", e.stream_id),
            Edge::Reach(e) => format!("stream={} reach={}", e.stream_id, e.reach_id),
        };
        out.push_str(&format!(
            "  {} -> {}  [{}] {}\n",
            edge.source().id(),
            edge.target().id(),
            edge.label(),
            tag
        ));
    }
    out
}

fn cmd_summary(basin_path: &Path) -> AppResult<()> {
    let file = load_basin_file(basin_path)?;
    let results = build_all(&file);

    let mut failures = 0;
    for (name, result) in results {
        match result {
            Ok(graph) => {
                let summary = GraphSummary::from_graph(&graph);
                println!("{}", summary.name);
                println!(
                    "  Nodes: {} {:?}",
                    summary.node_count, summary.nodes_by_label
                );
                println!(
                    "  Edges: {} {:?}",
                    summary.edge_count, summary.edges_by_label
                );
                println!(
                    "  Connected components: {}{}",
                    summary.connected_components,
                    if summary.is_connected() { "" } else { " (partially linked)" }
                );
                println!("  Fingerprint: {}", summary.fingerprint);
            }
            Err(err) => {
                failures += 1;
                println!("{}", name);
                println!("  ✗ {}", err);
            }
        }
    }

    if failures > 0 {
        warn!(failures, "some basins failed to build");
    }
    Ok(())
}
