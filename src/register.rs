//!
//! Edge <-> index bijection
//!
//! The register is the coordinate system shared by the QUBO matrix and
//! solver bit vectors: edge i of the graph corresponds to variable x_i.
//! It must be rebuilt whenever the edge set of the graph changes; using a
//! stale register against a mutated graph is a coordination bug and
//! surfaces as `UnknownEdge`/`IndexOutOfRange`.
//!
use crate::common::NodeIndex;
use crate::error::DbgQuboError;
use crate::strand::StrandGraph;
use fnv::FnvHashMap;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

///
/// Bidirectional map between directed edges (as ordered node pairs) and
/// dense indices [0, n_edges). Forward and inverse tables are always
/// built together and never mutated separately.
///
#[derive(Debug, Clone, Default)]
pub struct EdgeRegister {
    forward: FnvHashMap<(NodeIndex, NodeIndex), usize>,
    inverse: Vec<(NodeIndex, NodeIndex)>,
}

impl EdgeRegister {
    ///
    /// Assign indices 0..n_edges-1 in a fixed, reproducible order: nodes
    /// in index order, then each node's outgoing edges in petgraph's
    /// adjacency order (most recently inserted first). Greedy search uses
    /// the same successor order.
    ///
    pub fn from_graph(graph: &StrandGraph) -> Self {
        let mut forward = FnvHashMap::default();
        let mut inverse = Vec::with_capacity(graph.edge_count());
        for v in graph.node_indices() {
            for e in graph.edges_directed(v, Direction::Outgoing) {
                let key = (e.source(), e.target());
                forward.insert(key, inverse.len());
                inverse.push(key);
            }
        }
        EdgeRegister { forward, inverse }
    }

    pub fn len(&self) -> usize {
        self.inverse.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }

    ///
    /// index of the edge (source, target)
    ///
    pub fn index_of(&self, source: NodeIndex, target: NodeIndex) -> Result<usize, DbgQuboError> {
        self.forward
            .get(&(source, target))
            .copied()
            .ok_or_else(|| DbgQuboError::UnknownEdge(source.index(), target.index()))
    }

    ///
    /// edge of a dense index
    ///
    pub fn edge_of(&self, index: usize) -> Result<(NodeIndex, NodeIndex), DbgQuboError> {
        self.inverse
            .get(index)
            .copied()
            .ok_or(DbgQuboError::IndexOutOfRange {
                index,
                len: self.inverse.len(),
            })
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.inverse.iter().copied()
    }
}

//
// tests
//
