//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use silsila_core::{EntityRecord, RelationshipRecord};
use silsila_graph::{
    GraphBuilder, GraphStore, KnowledgeGraph, MemoryGraph, NeighborhoodExplorer, Path,
    PathFinder, RelationKind, StrengthScorer, SubgraphExtractor, ThematicClusterer,
};
use silsila_server::{shared, QueryServer, ServerConfig};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Bulk dataset layout accepted by `silsila ingest`.
#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    entities: Vec<EntityRecord>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
}

/// Ingest a dataset file, build the graph, and persist both.
pub fn ingest(data_dir: &std::path::Path, file: &std::path::Path) -> Result<()> {
    println!("{}", "Ingesting dataset...".cyan());

    let text = fs::read_to_string(file)?;
    let dataset: Dataset = serde_json::from_str(&text)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Building graph...");

    let mut builder = GraphBuilder::new();
    builder.add_records(dataset.entities.clone(), dataset.relationships.clone())?;
    let graph = builder.build()?;

    spinner.set_message("Persisting...");
    let store = GraphStore::open(data_dir)?;
    store.save_records(&dataset.entities, &dataset.relationships)?;
    store.save_graph(&graph)?;

    spinner.finish_and_clear();

    println!(
        "{} Ingested {} entities, {} relationships ({} themes)",
        "✓".green(),
        graph.entity_count().to_string().cyan(),
        graph.relationship_count().to_string().cyan(),
        graph.stats().theme_count
    );

    Ok(())
}

/// Loads the last built graph from the store.
fn load_graph(data_dir: &std::path::Path) -> Result<KnowledgeGraph> {
    if !data_dir.exists() {
        return Err(format!(
            "no data at {}; run `silsila ingest <file>` first",
            data_dir.display()
        )
        .into());
    }
    let store = GraphStore::open(data_dir)?;
    store
        .load_graph()?
        .ok_or_else(|| "store holds no graph; run `silsila ingest <file>` first".into())
}

fn open_source(data_dir: &std::path::Path) -> Result<MemoryGraph> {
    Ok(MemoryGraph::new(Arc::new(load_graph(data_dir)?)))
}

/// Parses `--kinds` values; an empty list means no filter.
fn parse_kinds(kinds: &[String]) -> Result<Option<Vec<RelationKind>>> {
    if kinds.is_empty() {
        return Ok(None);
    }
    let mut parsed = Vec::with_capacity(kinds.len());
    for s in kinds {
        let kind = RelationKind::parse(s);
        if kind == RelationKind::Other && s != "other" {
            return Err(format!("unknown relationship kind '{}'", s).into());
        }
        parsed.push(kind);
    }
    Ok(Some(parsed))
}

fn print_path(path: &Path) {
    println!("  {}", path.entities[0].cyan());
    for (edge, entity) in path.edges.iter().zip(path.entities.iter().skip(1)) {
        println!(
            "  {} {}",
            format!("─{}→", edge.kind).dimmed(),
            entity.cyan()
        );
    }
}

/// Find the shortest path between two entities.
pub async fn path(
    data_dir: &std::path::Path,
    start: &str,
    end: &str,
    kinds: &[String],
    max_depth: usize,
    json: bool,
) -> Result<()> {
    let source = open_source(data_dir)?;
    let filter = parse_kinds(kinds)?;
    let finder = PathFinder::new(source);

    match finder
        .shortest_path(start, end, filter.as_deref(), max_depth)
        .await?
    {
        Some(path) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&path)?);
            } else {
                println!(
                    "{} Path found: {} hops (total weight {})",
                    "✓".green(),
                    path.len().to_string().bold(),
                    path.total_weight
                );
                print_path(&path);
            }
        }
        None => {
            if json {
                println!("null");
            } else {
                println!("{} No path within {} hops", "✗".red(), max_depth);
            }
        }
    }

    Ok(())
}

/// Enumerate simple paths between two entities.
pub async fn paths(
    data_dir: &std::path::Path,
    start: &str,
    end: &str,
    kinds: &[String],
    max_depth: usize,
    max_results: usize,
    json: bool,
) -> Result<()> {
    let source = open_source(data_dir)?;
    let filter = parse_kinds(kinds)?;
    let finder = PathFinder::new(source);

    let found = finder
        .all_paths(start, end, filter.as_deref(), max_depth, max_results)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("{} No paths within {} hops", "✗".red(), max_depth);
        return Ok(());
    }

    println!("Found {} paths:\n", found.len().to_string().bold());
    for path in &found {
        println!(
            "  {} {}",
            path.entities.join(" → ").cyan(),
            format!("({} hops, weight {})", path.len(), path.total_weight).dimmed()
        );
    }

    Ok(())
}

/// Explore the neighborhood around an entity.
pub async fn explore(
    data_dir: &std::path::Path,
    seed: &str,
    depth: usize,
    kinds: &[String],
    max_nodes: usize,
    json: bool,
) -> Result<()> {
    let source = open_source(data_dir)?;
    let filter = parse_kinds(kinds)?;
    let explorer = NeighborhoodExplorer::new(source);

    let neighborhood = explorer
        .explore(seed, depth, filter.as_deref(), max_nodes)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&neighborhood)?);
        return Ok(());
    }

    println!(
        "{} {} nodes, {} edges around {}",
        "✓".green(),
        neighborhood.nodes.len().to_string().cyan(),
        neighborhood.edges.len().to_string().cyan(),
        seed.bold()
    );
    for node in &neighborhood.nodes {
        println!(
            "  {} {} {}",
            node.entity.kind.to_string().yellow(),
            node.entity.label.cyan(),
            format!("(depth {})", node.depth).dimmed()
        );
    }

    Ok(())
}

/// Extract the subgraph induced by a set of entities.
pub async fn subgraph(
    data_dir: &std::path::Path,
    ids: &[String],
    include_edges: bool,
    json: bool,
) -> Result<()> {
    let source = open_source(data_dir)?;
    let extractor = SubgraphExtractor::new(source);

    let subgraph = extractor.extract(ids, None, include_edges).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&subgraph)?);
        return Ok(());
    }

    println!(
        "{} {} nodes, {} edges",
        "✓".green(),
        subgraph.nodes.len().to_string().cyan(),
        subgraph.edges.len().to_string().cyan()
    );
    for edge in &subgraph.edges {
        println!(
            "  {} {} {}",
            edge.source.cyan(),
            format!("─{}→", edge.kind).dimmed(),
            edge.target.cyan()
        );
    }

    Ok(())
}

/// Score the relationship strength between two entities.
pub async fn score(data_dir: &std::path::Path, a: &str, b: &str, json: bool) -> Result<()> {
    let source = open_source(data_dir)?;
    let scorer = StrengthScorer::new(source);

    let score = scorer.score(a, b).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    println!(
        "{} Strength between {} and {}: {}",
        "✓".green(),
        a.cyan(),
        b.cyan(),
        format!("{:.3}", score.composite).bold()
    );
    match score.direct_weight {
        Some(w) => println!("  {} {}", "Direct edge weight:".dimmed(), w),
        None => println!("  {} none", "Direct edge:".dimmed()),
    }
    println!("  {} {}", "Shared neighbors:".dimmed(), score.shared_neighbors);
    match score.path_length {
        Some(len) => println!("  {} {} hops", "Shortest path:".dimmed(), len),
        None => println!("  {} none found", "Shortest path:".dimmed()),
    }

    Ok(())
}

/// Cluster entities by theme tag and link them.
pub async fn cluster(data_dir: &std::path::Path, tag: &str, json: bool) -> Result<()> {
    let source = open_source(data_dir)?;
    let clusterer = ThematicClusterer::new(source);

    let (entities, links) = clusterer.thematic_subgraph(tag).await?;

    if json {
        let output = serde_json::json!({ "entities": entities, "links": links });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entities.is_empty() {
        println!("{} No entities carry theme \"{}\"", "✗".red(), tag);
        return Ok(());
    }

    println!(
        "{} {} entities share theme {}:\n",
        "✓".green(),
        entities.len().to_string().cyan(),
        tag.bold()
    );
    for entity in &entities {
        println!(
            "  {} {}",
            entity.kind.to_string().yellow(),
            entity.label.cyan()
        );
    }

    if !links.is_empty() {
        println!("\n{} linked pairs:", links.len());
        for link in &links {
            println!(
                "  {} ↔ {} {}",
                link.a.cyan(),
                link.b.cyan(),
                format!("({} hops)", link.path.len()).dimmed()
            );
        }
    }

    Ok(())
}

/// Start the Silsila query server.
pub async fn serve(data_dir: &std::path::Path, port: u16, headless: bool) -> Result<()> {
    let bind_addr = if headless { "0.0.0.0" } else { "127.0.0.1" };

    if headless {
        println!("{}", "Starting Silsila server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Silsila server...".cyan());
    }

    let graph = load_graph(data_dir)?;
    let stats = graph.stats();
    println!(
        "{} Loaded {} entities, {} relationships",
        "✓".green(),
        stats.entity_count,
        stats.relationship_count
    );

    let addr = format!("{}:{}", bind_addr, port).parse()?;
    let config = ServerConfig { addr };
    let server = QueryServer::bind(config, shared(graph)).await?;

    println!("{} Listening on ws://{}:{}", "✓".green(), bind_addr, port);
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await.map_err(|e| e.to_string())?;

    Ok(())
}

/// Show store status and graph statistics.
pub fn status(data_dir: &std::path::Path) -> Result<()> {
    if !data_dir.exists() {
        println!("{} No data directory at {}", "✗".red(), data_dir.display());
        println!("  Run {} to build a graph", "silsila ingest <file>".cyan());
        return Ok(());
    }

    let store = GraphStore::open(data_dir)?;
    let graph = match store.load_graph()? {
        Some(g) => g,
        None => {
            println!("{} Store holds no graph", "✗".red());
            println!("  Run {} to build one", "silsila ingest <file>".cyan());
            return Ok(());
        }
    };

    let stats = graph.stats();
    println!("{}", "Silsila Status".cyan().bold());
    println!();
    println!("  {} {}", "Entities:".dimmed(), stats.entity_count);
    println!("  {} {}", "Relationships:".dimmed(), stats.relationship_count);
    println!("  {} {}", "Themes:".dimmed(), stats.theme_count);

    Ok(())
}
