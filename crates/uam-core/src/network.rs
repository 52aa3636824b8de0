//! Directed weighted vertiport graph and shortest-path search.
//!
//! The network is built once from vertiport and edge definitions and is
//! read-only afterwards. Mutable per-vertiport state (admission, passengers)
//! lives in [`crate::vertiport::Vertiport`], indexed by the same
//! [`VertiportId`].

use crate::error::SimError;
use crate::models::{EdgeDef, VertiportDef};
use crate::spatial::Position;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

/// Dense index of a vertiport in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertiportId(pub usize);

#[derive(Debug, Clone)]
pub struct VertiportNode {
    pub name: String,
    pub position: Position,
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub to: VertiportId,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<VertiportNode>,
    index: HashMap<String, VertiportId>,
    adjacency: Vec<Vec<Edge>>,
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Network {
    /// Build a network from vertiport and edge definitions.
    ///
    /// Edges without an explicit weight use the Euclidean distance between
    /// their endpoints. Bidirectional edge definitions add both directions.
    pub fn new(vertiports: &[VertiportDef], edges: &[EdgeDef]) -> Result<Self, SimError> {
        let mut nodes = Vec::with_capacity(vertiports.len());
        let mut index = HashMap::with_capacity(vertiports.len());

        for def in vertiports {
            if def.capacity == 0 {
                return Err(SimError::InvalidCapacity {
                    vertiport: def.id.clone(),
                    capacity: def.capacity,
                });
            }
            let id = VertiportId(nodes.len());
            if index.insert(def.id.clone(), id).is_some() {
                return Err(SimError::DuplicateVertiport(def.id.clone()));
            }
            nodes.push(VertiportNode {
                name: def.id.clone(),
                position: Position::new(def.x, def.y),
                capacity: def.capacity,
            });
        }

        let mut network = Self {
            adjacency: vec![Vec::new(); nodes.len()],
            nodes,
            index,
        };

        for edge in edges {
            let from = network
                .lookup(&edge.from)
                .ok_or_else(|| SimError::UnknownVertiport(edge.from.clone()))?;
            let to = network
                .lookup(&edge.to)
                .ok_or_else(|| SimError::UnknownVertiport(edge.to.clone()))?;
            let weight = edge
                .weight
                .unwrap_or_else(|| network.position(from).distance_to(network.position(to)));
            if weight < 0.0 || !weight.is_finite() {
                return Err(SimError::InvalidWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    weight,
                });
            }
            network.add_edge(from, to, weight);
            if edge.bidirectional {
                network.add_edge(to, from, weight);
            }
        }

        Ok(network)
    }

    fn add_edge(&mut self, from: VertiportId, to: VertiportId, weight: f64) {
        let out = &mut self.adjacency[from.0];
        match out.iter_mut().find(|e| e.to == to) {
            Some(existing) => existing.weight = weight,
            None => out.push(Edge { to, weight }),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = VertiportId> + '_ {
        (0..self.nodes.len()).map(VertiportId)
    }

    pub fn contains(&self, id: VertiportId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn lookup(&self, name: &str) -> Option<VertiportId> {
        self.index.get(name).copied()
    }

    pub fn node(&self, id: VertiportId) -> Option<&VertiportNode> {
        self.nodes.get(id.0)
    }

    /// Name of a vertiport, or `"?"` for an id outside this network.
    pub fn name(&self, id: VertiportId) -> &str {
        self.nodes.get(id.0).map(|n| n.name.as_str()).unwrap_or("?")
    }

    pub fn position(&self, id: VertiportId) -> Position {
        self.nodes.get(id.0).map(|n| n.position).unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Direct successors of `id` in edge insertion order.
    pub fn neighbors(&self, id: VertiportId) -> Vec<VertiportId> {
        self.adjacency
            .get(id.0)
            .map(|edges| edges.iter().map(|e| e.to).collect())
            .unwrap_or_default()
    }

    pub fn has_edge(&self, from: VertiportId, to: VertiportId) -> bool {
        self.adjacency
            .get(from.0)
            .is_some_and(|edges| edges.iter().any(|e| e.to == to))
    }

    pub fn is_bidirectional(&self, a: VertiportId, b: VertiportId) -> bool {
        self.has_edge(a, b) && self.has_edge(b, a)
    }

    /// Weighted shortest path from `origin` to `destination`, endpoints included.
    ///
    /// Returns an empty list when either endpoint is unknown or the
    /// destination is unreachable. Ties are broken by lower vertiport index,
    /// so the result is stable for a fixed graph.
    pub fn shortest_path(&self, origin: VertiportId, destination: VertiportId) -> Vec<VertiportId> {
        if !self.contains(origin) || !self.contains(destination) {
            return Vec::new();
        }
        if origin == destination {
            return vec![origin];
        }

        let n = self.nodes.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        dist[origin.0] = 0.0;
        heap.push(Reverse((FloatOrd(0.0), origin.0)));

        while let Some(Reverse((FloatOrd(d), node))) = heap.pop() {
            if settled[node] || d > dist[node] {
                continue;
            }
            settled[node] = true;
            if node == destination.0 {
                break;
            }
            for edge in &self.adjacency[node] {
                let to = edge.to.0;
                // Settled predecessors are final; rewriting them can close a
                // cycle in `prev` over zero-weight edges.
                if settled[to] {
                    continue;
                }
                let next = d + edge.weight;
                let better = next < dist[to]
                    || (next == dist[to] && prev[to].is_some_and(|p| node < p));
                if better {
                    dist[to] = next;
                    prev[to] = Some(node);
                    heap.push(Reverse((FloatOrd(next), to)));
                }
            }
        }

        if dist[destination.0].is_infinite() {
            return Vec::new();
        }

        let mut path = vec![destination];
        let mut cursor = destination.0;
        while let Some(p) = prev[cursor] {
            path.push(VertiportId(p));
            cursor = p;
        }
        path.reverse();
        path
    }

    /// Total weight along consecutive hops of `path`.
    pub fn path_length(&self, path: &[VertiportId]) -> f64 {
        path.windows(2)
            .filter_map(|pair| {
                self.adjacency
                    .get(pair[0].0)?
                    .iter()
                    .find(|e| e.to == pair[1])
                    .map(|e| e.weight)
            })
            .sum()
    }
}
