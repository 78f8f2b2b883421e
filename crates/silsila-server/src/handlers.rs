//! Request handlers, one per protocol method.
//!
//! Each handler clones the published snapshot out of the shared state and
//! runs the traversal engine over it via the in-memory adapter; the `entity`,
//! `adjacency`, and `theme.entities` handlers additionally back the remote
//! adapter's per-lookup protocol.

use crate::protocol::{
    codes, ConnectParams, EntityParams, ExploreParams, PathParams, Response, ScoreParams,
    SubgraphParams, ThemeParams,
};
use crate::{snapshot, SharedGraph};
use serde_json::Value;
use silsila_graph::{
    MemoryGraph, NeighborhoodExplorer, PathFinder, StrengthScorer, SubgraphExtractor,
    ThematicClusterer,
};
use tracing::debug;

async fn memory(graph: &SharedGraph) -> MemoryGraph {
    MemoryGraph::new(snapshot(graph).await)
}

/// Handles `graph.info`.
pub async fn handle_info(graph: SharedGraph, id: Option<Value>) -> Response {
    let snapshot = snapshot(&graph).await;
    Response::success(id, snapshot.stats())
}

/// Handles `entity.get`.
pub async fn handle_entity_get(
    graph: SharedGraph,
    id: Option<Value>,
    params: EntityParams,
) -> Response {
    let snapshot = snapshot(&graph).await;
    match snapshot.entity(&params.id) {
        Some(entity) => Response::success(id, entity),
        None => Response::error(
            id,
            codes::NODE_NOT_FOUND,
            format!("entity not found: {}", params.id),
        ),
    }
}

/// Handles `adjacency`. Unknown ids yield an empty list, mirroring the
/// lookup contract.
pub async fn handle_adjacency(
    graph: SharedGraph,
    id: Option<Value>,
    params: EntityParams,
) -> Response {
    let snapshot = snapshot(&graph).await;
    Response::success(id, snapshot.neighbors(&params.id))
}

/// Handles `theme.entities`.
pub async fn handle_theme_entities(
    graph: SharedGraph,
    id: Option<Value>,
    params: ThemeParams,
) -> Response {
    let snapshot = snapshot(&graph).await;
    Response::success(id, snapshot.entities_by_theme(&params.tag))
}

/// Handles `path.shortest`.
pub async fn handle_shortest_path(
    graph: SharedGraph,
    id: Option<Value>,
    params: PathParams,
) -> Response {
    debug!(from = %params.from, to = %params.to, "shortest path query");
    let finder = PathFinder::new(memory(&graph).await);
    match finder
        .shortest_path(
            &params.from,
            &params.to,
            params.kinds.as_deref(),
            params.max_depth,
        )
        .await
    {
        Ok(path) => Response::success(id, serde_json::json!({ "path": path })),
        Err(err) => Response::graph_error(id, err),
    }
}

/// Handles `path.all`.
pub async fn handle_all_paths(
    graph: SharedGraph,
    id: Option<Value>,
    params: PathParams,
) -> Response {
    let finder = PathFinder::new(memory(&graph).await);
    match finder
        .all_paths(
            &params.from,
            &params.to,
            params.kinds.as_deref(),
            params.max_depth,
            params.max_results,
        )
        .await
    {
        Ok(paths) => Response::success(id, serde_json::json!({ "paths": paths })),
        Err(err) => Response::graph_error(id, err),
    }
}

/// Handles `explore`.
pub async fn handle_explore(
    graph: SharedGraph,
    id: Option<Value>,
    params: ExploreParams,
) -> Response {
    let explorer = NeighborhoodExplorer::new(memory(&graph).await);
    match explorer
        .explore(
            &params.seed,
            params.depth,
            params.kinds.as_deref(),
            params.max_nodes,
        )
        .await
    {
        Ok(region) => Response::success(id, region),
        Err(err) => Response::graph_error(id, err),
    }
}

/// Handles `subgraph`.
pub async fn handle_subgraph(
    graph: SharedGraph,
    id: Option<Value>,
    params: SubgraphParams,
) -> Response {
    let extractor = SubgraphExtractor::new(memory(&graph).await);
    match extractor
        .extract(&params.ids, params.kinds.as_deref(), params.include_edges)
        .await
    {
        Ok(subgraph) => Response::success(id, subgraph),
        Err(err) => Response::graph_error(id, err),
    }
}

/// Handles `score`.
pub async fn handle_score(graph: SharedGraph, id: Option<Value>, params: ScoreParams) -> Response {
    let scorer = StrengthScorer::new(memory(&graph).await);
    match scorer.score(&params.a, &params.b).await {
        Ok(score) => Response::success(id, score),
        Err(err) => Response::graph_error(id, err),
    }
}

/// Handles `cluster`.
pub async fn handle_cluster(graph: SharedGraph, id: Option<Value>, params: ThemeParams) -> Response {
    let clusterer = ThematicClusterer::new(memory(&graph).await);
    match clusterer.thematic_subgraph(&params.tag).await {
        Ok((entities, links)) => Response::success(
            id,
            serde_json::json!({ "entities": entities, "links": links }),
        ),
        Err(err) => Response::graph_error(id, err),
    }
}

/// Handles `connect`.
pub async fn handle_connect(
    graph: SharedGraph,
    id: Option<Value>,
    params: ConnectParams,
) -> Response {
    let clusterer = ThematicClusterer::new(memory(&graph).await);
    match clusterer.connect(&params.ids).await {
        Ok(links) => Response::success(id, serde_json::json!({ "links": links })),
        Err(err) => Response::graph_error(id, err),
    }
}
