//! Shortest-path search and exhaustive path enumeration.
//!
//! `shortest_path` is breadth-first over hop count. The graph carries edge
//! weights, but the contract here is hop-count-minimal, not weight-minimal;
//! weights ride along on the returned path for scoring and display.
//! `all_paths` is depth-first with a per-path visited set, so every returned
//! path is simple.

use crate::adjacency::AdjacencyEntry;
use crate::relation::{GraphEdge, RelationKind};
use crate::source::{require_entity, GraphSource};
use serde::{Deserialize, Serialize};
use silsila_core::GraphError;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// A traversal result: entity ids from start to end inclusive, plus the
/// edges walked between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Ordered entity ids, start..end inclusive.
    pub entities: Vec<String>,

    /// Ordered edge descriptors, one per hop, oriented source → target.
    pub edges: Vec<GraphEdge>,

    /// Sum of traversed edge weights.
    pub total_weight: f64,
}

impl Path {
    /// Path length in edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True for the zero-length path returned when start == end.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn single(id: &str) -> Self {
        Self {
            entities: vec![id.to_string()],
            edges: Vec::new(),
            total_weight: 0.0,
        }
    }
}

/// Hop-count shortest path and bounded simple-path enumeration over any
/// [`GraphSource`].
pub struct PathFinder<S> {
    source: S,
}

impl<S: GraphSource> PathFinder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Finds a hop-count-minimal path from `start` to `end`.
    ///
    /// Traversal follows exactly the entries recorded by the adjacency
    /// index (outgoing edges, plus the reverse entries of bidirectional
    /// edges), optionally restricted to the given relationship kinds.
    ///
    /// Returns `Ok(None)` when no path exists within `max_depth` hops (a
    /// normal result, not an error). Missing start/end ids are a hard
    /// `NodeNotFound` error. Among equal-hop candidates the first
    /// discovered in breadth-first order wins, which is deterministic
    /// because adjacency entries keep relationship insertion order.
    pub async fn shortest_path(
        &self,
        start: &str,
        end: &str,
        filter: Option<&[RelationKind]>,
        max_depth: usize,
    ) -> Result<Option<Path>, GraphError> {
        if max_depth == 0 {
            return Err(GraphError::InvalidBound {
                what: "max_depth",
                value: max_depth,
            });
        }
        require_entity(&self.source, start).await?;
        require_entity(&self.source, end).await?;

        if start == end {
            return Ok(Some(Path::single(start)));
        }

        // Discovery edge per node, for path reconstruction. Marking nodes
        // visited at enqueue time keeps the first discovery.
        let mut parent: HashMap<String, (String, AdjacencyEntry)> = HashMap::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();

        visited.insert(start.to_string());
        queue.push_back((start.to_string(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            for entry in self.source.neighbors(&current).await? {
                if !entry.permitted(filter) || visited.contains(&entry.neighbor) {
                    continue;
                }

                let neighbor = entry.neighbor.clone();
                visited.insert(neighbor.clone());
                parent.insert(neighbor.clone(), (current.clone(), entry));

                if neighbor == end {
                    let path = reconstruct(start, end, &parent);
                    debug!(start, end, hops = path.len(), "shortest path found");
                    return Ok(Some(path));
                }

                // A node at depth d sits d+1 hops from start; expanding it
                // would exceed max_depth once d+1 hops are already used up.
                if depth + 1 < max_depth {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        debug!(start, end, max_depth, "no path within depth bound");
        Ok(None)
    }

    /// Enumerates simple paths from `start` to `end`, depth-first.
    ///
    /// A node already on the current path is never revisited, so no
    /// returned path repeats a node and cyclic graphs terminate without
    /// any mechanism beyond the bounds. Enumeration stops once
    /// `max_results` paths are found; the collected paths are then ordered
    /// by ascending length, ties broken by descending total weight.
    pub async fn all_paths(
        &self,
        start: &str,
        end: &str,
        filter: Option<&[RelationKind]>,
        max_depth: usize,
        max_results: usize,
    ) -> Result<Vec<Path>, GraphError> {
        if max_depth == 0 {
            return Err(GraphError::InvalidBound {
                what: "max_depth",
                value: max_depth,
            });
        }
        if max_results == 0 {
            return Err(GraphError::InvalidBound {
                what: "max_results",
                value: max_results,
            });
        }
        require_entity(&self.source, start).await?;
        require_entity(&self.source, end).await?;

        if start == end {
            return Ok(vec![Path::single(start)]);
        }

        // Iterative DFS. Each frame holds the fetched adjacency entries of
        // one node on the current path and a cursor into them.
        struct Frame {
            id: String,
            entries: Vec<AdjacencyEntry>,
            next: usize,
        }

        let mut results: Vec<Path> = Vec::new();
        let mut path_ids: Vec<String> = vec![start.to_string()];
        let mut path_edges: Vec<GraphEdge> = Vec::new();
        let mut on_path: HashSet<String> = HashSet::from([start.to_string()]);
        let mut stack: Vec<Frame> = vec![Frame {
            id: start.to_string(),
            entries: self.source.neighbors(start).await?,
            next: 0,
        }];

        'dfs: while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.entries.len() {
                stack.pop();
                let done = path_ids.pop();
                if let Some(id) = done {
                    on_path.remove(&id);
                }
                path_edges.pop();
                continue;
            }

            let entry = frame.entries[frame.next].clone();
            frame.next += 1;
            let current = frame.id.clone();

            if !entry.permitted(filter) {
                continue;
            }

            if entry.neighbor == end {
                if path_edges.len() + 1 <= max_depth {
                    let mut entities = path_ids.clone();
                    entities.push(end.to_string());
                    let mut edges = path_edges.clone();
                    edges.push(entry.to_edge(&current));
                    let total_weight = edges.iter().map(|e| e.weight).sum();
                    results.push(Path {
                        entities,
                        edges,
                        total_weight,
                    });
                    if results.len() >= max_results {
                        break 'dfs;
                    }
                }
                continue;
            }

            if on_path.contains(&entry.neighbor) || path_edges.len() + 1 >= max_depth {
                continue;
            }

            let entries = self.source.neighbors(&entry.neighbor).await?;
            path_edges.push(entry.to_edge(&current));
            path_ids.push(entry.neighbor.clone());
            on_path.insert(entry.neighbor.clone());
            stack.push(Frame {
                id: entry.neighbor,
                entries,
                next: 0,
            });
        }

        // Shorter first; among equal length, stronger-weighted first. The
        // sort is stable, so discovery order breaks remaining ties.
        results.sort_by(|a, b| {
            a.len().cmp(&b.len()).then_with(|| {
                b.total_weight
                    .partial_cmp(&a.total_weight)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        Ok(results)
    }
}

/// Walks the discovery edges back from `end` and rebuilds the path.
fn reconstruct(start: &str, end: &str, parent: &HashMap<String, (String, AdjacencyEntry)>) -> Path {
    let mut entities = vec![end.to_string()];
    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut current = end;

    while current != start {
        let (prev, entry) = &parent[current];
        edges.push(entry.to_edge(prev));
        entities.push(prev.clone());
        current = prev;
    }

    entities.reverse();
    edges.reverse();
    let total_weight = edges.iter().map(|e| e.weight).sum();

    Path {
        entities,
        edges,
        total_weight,
    }
}
