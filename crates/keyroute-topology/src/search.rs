//! Nearest-match search: Dijkstra with an early-exit predicate.
//!
//! Nodes are settled in increasing tentative-distance order. Each settled
//! node is offered to the predicate exactly once; the first one accepted is
//! returned and the search stops. Because weights are non-negative, a
//! settled node's distance is final, so the hit is the cheapest node that
//! satisfied the predicate at the moment it was settled.
//!
//! Complexity is O((V + E) log V) with a binary heap. Stale heap entries for
//! already-settled nodes are discarded on pop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Result, TopologyError};
use crate::graph::{NodeIndex, Topology};
use crate::{ServerId, Weight};

/// A node accepted by the search predicate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchHit {
    /// Identifier of the accepted node.
    pub server: ServerId,
    /// Shortest path cost from the origin.
    pub distance: Weight,
    /// Number of nodes settled, including the hit.
    pub settled: usize,
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the smallest distance
/// first, then the smallest node index.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: Weight,
    node: NodeIndex,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Find the closest node from `origin` accepted by `is_match`.
///
/// `is_match` is called once per settled node, in settlement order, with
/// the node's identifier. It may observe live state; the search does not
/// cache its answers.
///
/// Returns `Ok(None)` when every reachable node was settled without a
/// match, and [`TopologyError::UnknownOrigin`] when `origin` is not a node.
pub fn nearest_matching<F>(
    topology: &Topology,
    origin: &str,
    mut is_match: F,
) -> Result<Option<SearchHit>>
where
    F: FnMut(&str) -> bool,
{
    let start = topology
        .index_of(origin)
        .ok_or_else(|| TopologyError::UnknownOrigin(origin.to_string()))?;

    let mut dist = vec![Weight::INFINITY; topology.len()];
    let mut settled = vec![false; topology.len()];
    let mut settled_count = 0;
    let mut frontier = BinaryHeap::new();

    dist[start] = 0.0;
    frontier.push(Frontier {
        distance: 0.0,
        node: start,
    });

    while let Some(Frontier { distance, node }) = frontier.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;
        settled_count += 1;

        let name = topology.name(node);
        if is_match(name) {
            return Ok(Some(SearchHit {
                server: name.to_string(),
                distance,
                settled: settled_count,
            }));
        }

        for edge in topology.edges(node) {
            if settled[edge.to] {
                continue;
            }
            let candidate = distance + edge.weight;
            if candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                frontier.push(Frontier {
                    distance: candidate,
                    node: edge.to,
                });
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn diamond() -> Topology {
        Topology::undirected([
            ("A", "B", 10.0),
            ("A", "C", 5.0),
            ("B", "C", 2.0),
            ("B", "D", 1.0),
            ("C", "D", 9.0),
        ])
        .unwrap()
    }

    #[test]
    fn origin_matches_without_traversal() {
        let topology = diamond();
        let hit = nearest_matching(&topology, "A", |_| true).unwrap().unwrap();

        assert_eq!(hit.server, "A");
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.settled, 1);
    }

    #[test]
    fn finds_closest_match() {
        let topology = diamond();
        let targets: HashSet<&str> = ["B", "D"].into_iter().collect();

        let hit = nearest_matching(&topology, "A", |id| targets.contains(id))
            .unwrap()
            .unwrap();

        // A-C-B costs 7, cheaper than the direct A-B edge.
        assert_eq!(hit.server, "B");
        assert_eq!(hit.distance, 7.0);
    }

    #[test]
    fn path_cost_through_intermediate() {
        let topology = diamond();
        let hit = nearest_matching(&topology, "A", |id| id == "D")
            .unwrap()
            .unwrap();

        // A-C-B-D = 5 + 2 + 1
        assert_eq!(hit.distance, 8.0);
        assert_eq!(hit.settled, 4);
    }

    #[test]
    fn settlement_order_is_by_distance() {
        let topology = diamond();
        let mut order = Vec::new();
        let result = nearest_matching(&topology, "A", |id| {
            order.push(id.to_string());
            false
        })
        .unwrap();

        assert!(result.is_none());
        assert_eq!(order, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn equal_distance_ties_break_by_identifier() {
        let topology = Topology::from_adjacency([
            ("origin", vec![("zulu", 1.0), ("bravo", 1.0), ("mike", 1.0)]),
            ("bravo", vec![]),
            ("mike", vec![]),
            ("zulu", vec![]),
        ])
        .unwrap();

        for _ in 0..5 {
            let hit = nearest_matching(&topology, "origin", |id| id != "origin")
                .unwrap()
                .unwrap();
            assert_eq!(hit.server, "bravo");
        }
    }

    #[test]
    fn unreachable_match_is_not_found() {
        let topology = Topology::from_adjacency([
            ("A", vec![("B", 1.0)]),
            ("B", vec![]),
            ("island", vec![]),
        ])
        .unwrap();

        let result = nearest_matching(&topology, "A", |id| id == "island").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn directed_edges_are_one_way() {
        let topology = Topology::from_adjacency([
            ("A", vec![("B", 1.0)]),
            ("B", vec![]),
        ])
        .unwrap();

        assert!(nearest_matching(&topology, "B", |id| id == "A")
            .unwrap()
            .is_none());
        assert!(nearest_matching(&topology, "A", |id| id == "B")
            .unwrap()
            .is_some());
    }

    #[test]
    fn unknown_origin_is_an_error() {
        let topology = diamond();
        let err = nearest_matching(&topology, "Z", |_| true).unwrap_err();
        assert_eq!(err, TopologyError::UnknownOrigin("Z".into()));
    }

    #[test]
    fn predicate_sees_each_node_once() {
        // Parallel edges produce stale frontier entries.
        let topology = Topology::from_adjacency([
            ("A", vec![("B", 5.0), ("B", 1.0), ("C", 1.0)]),
            ("B", vec![("C", 1.0)]),
            ("C", vec![("B", 1.0)]),
        ])
        .unwrap();

        let mut seen = Vec::new();
        nearest_matching(&topology, "A", |id| {
            seen.push(id.to_string());
            false
        })
        .unwrap();

        assert_eq!(seen, vec!["A", "B", "C"]);
    }

    #[test]
    fn zero_weight_edges() {
        let topology = Topology::undirected([("A", "B", 0.0), ("B", "C", 0.0)]).unwrap();
        let hit = nearest_matching(&topology, "A", |id| id == "C")
            .unwrap()
            .unwrap();
        assert_eq!(hit.distance, 0.0);
    }
}
