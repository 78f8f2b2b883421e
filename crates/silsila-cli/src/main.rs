//! Silsila CLI - Command-line interface for the knowledge graph
//!
//! This is the main entry point for users interacting with Silsila.
//! It provides commands for ingesting records, traversing the graph, and
//! serving it over WebSocket.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "silsila")]
#[command(author = "Silsila Contributors")]
#[command(version)]
#[command(about = "Traversal and pathfinding over a knowledge graph", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory holding the persistent store
    #[arg(long, global = true, default_value = ".silsila")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest an entity/relationship dataset and build the graph
    Ingest {
        /// JSON file with "entities" and "relationships" arrays
        file: PathBuf,
    },

    /// Find the shortest path between two entities
    Path {
        /// Start entity id
        start: String,

        /// End entity id
        end: String,

        /// Maximum hops to search
        #[arg(short = 'd', long, default_value = "6")]
        max_depth: usize,

        /// Restrict traversal to these relationship kinds
        #[arg(short, long)]
        kinds: Vec<String>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Enumerate simple paths between two entities
    Paths {
        /// Start entity id
        start: String,

        /// End entity id
        end: String,

        /// Maximum hops per path
        #[arg(short = 'd', long, default_value = "6")]
        max_depth: usize,

        /// Maximum number of paths to collect
        #[arg(short = 'n', long, default_value = "20")]
        max_results: usize,

        /// Restrict traversal to these relationship kinds
        #[arg(short, long)]
        kinds: Vec<String>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Explore the neighborhood around an entity
    Explore {
        /// Seed entity id
        seed: String,

        /// Hops to expand outward
        #[arg(short = 'd', long, default_value = "2")]
        depth: usize,

        /// Hard cap on discovered nodes
        #[arg(long, default_value = "50")]
        max_nodes: usize,

        /// Restrict traversal to these relationship kinds
        #[arg(short, long)]
        kinds: Vec<String>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Extract the subgraph induced by a set of entities
    Subgraph {
        /// Entity ids to include
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the edges, return nodes only
        #[arg(long)]
        no_edges: bool,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Score the relationship strength between two entities
    Score {
        /// First entity id
        a: String,

        /// Second entity id
        b: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Cluster entities by theme tag and link them
    Cluster {
        /// Theme tag to cluster
        tag: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Start the Silsila query server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7641")]
        port: u16,

        /// Headless mode: bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,
    },

    /// Show store status and graph statistics
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let data_dir = cli.data_dir;

    let result = match cli.command {
        Commands::Ingest { file } => commands::ingest(&data_dir, &file),
        Commands::Path {
            start,
            end,
            max_depth,
            kinds,
            json,
        } => commands::path(&data_dir, &start, &end, &kinds, max_depth, json).await,
        Commands::Paths {
            start,
            end,
            max_depth,
            max_results,
            kinds,
            json,
        } => {
            commands::paths(&data_dir, &start, &end, &kinds, max_depth, max_results, json).await
        }
        Commands::Explore {
            seed,
            depth,
            max_nodes,
            kinds,
            json,
        } => commands::explore(&data_dir, &seed, depth, &kinds, max_nodes, json).await,
        Commands::Subgraph { ids, no_edges, json } => {
            commands::subgraph(&data_dir, &ids, !no_edges, json).await
        }
        Commands::Score { a, b, json } => commands::score(&data_dir, &a, &b, json).await,
        Commands::Cluster { tag, json } => commands::cluster(&data_dir, &tag, json).await,
        Commands::Serve { port, headless } => commands::serve(&data_dir, port, headless).await,
        Commands::Status => commands::status(&data_dir),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
