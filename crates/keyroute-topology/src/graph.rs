//! Weighted adjacency over server identifiers.
//!
//! Nodes are interned into dense indices assigned in identifier order, so
//! index order and identifier order agree. The search relies on this for
//! its tie-break.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Result, TopologyError};
use crate::{ServerId, Weight};

/// Dense index of a node inside one [`Topology`].
pub type NodeIndex = usize;

/// An outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Target node.
    pub to: NodeIndex,
    /// Non-negative routing cost.
    pub weight: Weight,
}

/// Immutable weighted graph used for distance computation.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    names: Vec<ServerId>,
    index: HashMap<ServerId, NodeIndex>,
    edges: Vec<Vec<Edge>>,
}

impl Topology {
    /// Build a topology from `identifier -> [(neighbor, weight)]` entries.
    ///
    /// Edge order within a node is preserved. Repeated entries for the same
    /// node are concatenated. Every neighbor must appear as a node, and every
    /// weight must be finite and non-negative.
    pub fn from_adjacency<I, N, E, M>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<ServerId>,
        E: IntoIterator<Item = (M, Weight)>,
        M: Into<ServerId>,
    {
        let mut sorted: BTreeMap<ServerId, Vec<(ServerId, Weight)>> = BTreeMap::new();
        for (node, neighbors) in adjacency {
            sorted
                .entry(node.into())
                .or_default()
                .extend(neighbors.into_iter().map(|(to, w)| (to.into(), w)));
        }

        let names: Vec<ServerId> = sorted.keys().cloned().collect();
        let index: HashMap<ServerId, NodeIndex> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let mut edges = Vec::with_capacity(names.len());
        for (from, neighbors) in sorted {
            let mut out = Vec::with_capacity(neighbors.len());
            for (to, weight) in neighbors {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(TopologyError::NegativeWeight { from, to, weight });
                }
                let Some(&target) = index.get(&to) else {
                    return Err(TopologyError::UnknownNeighbor { from, to });
                };
                out.push(Edge { to: target, weight });
            }
            edges.push(out);
        }

        Ok(Self { names, index, edges })
    }

    /// Build a symmetric topology from an undirected edge list.
    ///
    /// Both endpoints of every edge become nodes.
    pub fn undirected<I, A, B>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B, Weight)>,
        A: Into<ServerId>,
        B: Into<ServerId>,
    {
        let mut adjacency: BTreeMap<ServerId, Vec<(ServerId, Weight)>> = BTreeMap::new();
        for (a, b, weight) in edges {
            let (a, b) = (a.into(), b.into());
            adjacency.entry(b.clone()).or_default().push((a.clone(), weight));
            adjacency.entry(a).or_default().push((b, weight));
        }
        Self::from_adjacency(adjacency)
    }

    /// Add isolated nodes (no outgoing edges) to an existing topology.
    ///
    /// Nodes already present keep their edges. Indices are reassigned so
    /// they still follow identifier order.
    #[must_use]
    pub fn with_isolated<I, N>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ServerId>,
    {
        let mut merged: BTreeSet<ServerId> = self.names.iter().cloned().collect();
        merged.extend(nodes.into_iter().map(Into::into));
        if merged.len() == self.names.len() {
            return self;
        }

        let names: Vec<ServerId> = merged.into_iter().collect();
        let index: HashMap<ServerId, NodeIndex> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        // Old and new names are both sorted, so old node `i` maps to the
        // `i`-th surviving name.
        let remap: Vec<NodeIndex> = names
            .iter()
            .enumerate()
            .filter(|(_, name)| self.index.contains_key(*name))
            .map(|(i, _)| i)
            .collect();

        let mut edges = vec![Vec::new(); names.len()];
        for (old, out) in self.edges.into_iter().enumerate() {
            edges[remap[old]] = out
                .into_iter()
                .map(|e| Edge {
                    to: remap[e.to],
                    weight: e.weight,
                })
                .collect();
        }

        Self { names, index, edges }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the topology has no nodes.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Check if an identifier is a node.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Dense index of a node.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Identifier of a node index.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not produced by this topology.
    pub fn name(&self, index: NodeIndex) -> &str {
        &self.names[index]
    }

    /// Outgoing edges of a node index, in insertion order.
    pub fn edges(&self, index: NodeIndex) -> &[Edge] {
        self.edges.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All node identifiers in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Outgoing `(neighbor, weight)` pairs of a node.
    pub fn neighbors(&self, id: &str) -> Option<impl Iterator<Item = (&str, Weight)>> {
        let index = self.index_of(id)?;
        Some(
            self.edges[index]
                .iter()
                .map(|e| (self.names[e.to].as_str(), e.weight)),
        )
    }
}
