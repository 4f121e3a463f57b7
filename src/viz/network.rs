//! Label → entity star graphs and their force-directed layout.

use std::collections::BTreeSet;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{error::AppError, present::LabelGroups};

/// The diagram has exactly this many panels; other label counts are rejected.
pub const REQUIRED_LABELS: usize = 2;
/// Optimal node distance for the spring layout, in unit-square coordinates.
pub const SPRING_K: f64 = 0.5;
pub const SPRING_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Label,
    Entity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

/// One panel: a hub node for the label joined to each of its entities.
#[derive(Debug, Clone)]
pub struct StarGraph {
    pub label: String,
    pub hub: NodeIndex,
    pub graph: UnGraph<Node, ()>,
}

impl StarGraph {
    pub fn build(label: &str, entities: &BTreeSet<String>) -> Self {
        let mut graph = UnGraph::new_undirected();
        let hub = graph.add_node(Node {
            name: label.to_string(),
            kind: NodeKind::Label,
        });
        for entity in entities {
            let node = graph.add_node(Node {
                name: entity.clone(),
                kind: NodeKind::Entity,
            });
            graph.add_edge(hub, node, ());
        }
        Self {
            label: label.to_string(),
            hub,
            graph,
        }
    }
}

/// Build the two panels in label first-appearance order.
pub fn star_graphs(groups: &LabelGroups) -> Result<[StarGraph; REQUIRED_LABELS], AppError> {
    if groups.len() != REQUIRED_LABELS {
        return Err(AppError::UnsupportedLabelCount(groups.len()));
    }
    let mut panels = groups
        .iter()
        .map(|(label, entities)| StarGraph::build(label, entities));
    match (panels.next(), panels.next()) {
        (Some(first), Some(second)) => Ok([first, second]),
        _ => Err(AppError::UnsupportedLabelCount(groups.len())),
    }
}

/// Fruchterman–Reingold layout with a fixed iteration budget.
///
/// Returns one position per node (indexed by `NodeIndex::index`), centred on
/// the origin and rescaled so the largest coordinate magnitude is 1.
pub fn spring_layout<N, E>(
    graph: &UnGraph<N, E>,
    k: f64,
    iterations: usize,
    seed: u64,
) -> Vec<[f64; 2]> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![[0.0, 0.0]],
        _ => {}
    }

    let mut adjacent = vec![false; n * n];
    for edge in graph.edge_indices() {
        if let Some((a, b)) = graph.edge_endpoints(edge) {
            adjacent[a.index() * n + b.index()] = true;
            adjacent[b.index() * n + a.index()] = true;
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen(), rng.gen()]).collect();

    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);
    for _ in 0..iterations {
        let mut displacement = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                let attraction = if adjacent[i * n + j] { distance / k } else { 0.0 };
                let force = k * k / (distance * distance) - attraction;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d[0] * d[0] + d[1] * d[1]).sqrt().max(0.01);
            p[0] += d[0] * temperature / length;
            p[1] += d[1] * temperature / length;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

fn rescale(pos: &mut [[f64; 2]]) {
    let count = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / count;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / count;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
    }
    let limit = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0f64, f64::max);
    if limit > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= limit;
            p[1] /= limit;
        }
    }
}
