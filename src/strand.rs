//!
//! Strand expansion of the signed graph
//!
//! Each segment becomes two oriented nodes (forward and reverse
//! complement), each signed link resolves into one directed edge between
//! oriented nodes. Only the largest weakly connected component is carried
//! forward; the rest is assumed to be spurious or disconnected fragments.
//!
use crate::common::{NodeIndex, Sequence};
use crate::error::DbgQuboError;
use crate::seq::revcomp;
use crate::signed::SignedDbg;
use fnv::FnvHashMap;
use petgraph::graph::DiGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;

///
/// A segment in a fixed orientation carrying its correctly oriented
/// sequence. The reverse-complement twin of segment `X` is shown as `cX`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedNode {
    pub id: String,
    pub is_revcomp: bool,
    pub seq: Sequence,
}

impl OrientedNode {
    pub fn forward(id: &str, seq: &[u8]) -> Self {
        OrientedNode {
            id: id.to_string(),
            is_revcomp: false,
            seq: seq.to_vec(),
        }
    }
    pub fn complement(id: &str, seq: &[u8]) -> Result<Self, DbgQuboError> {
        Ok(OrientedNode {
            id: id.to_string(),
            is_revcomp: true,
            seq: revcomp(seq)?,
        })
    }
    /// display name, `cX` for the reverse-complement twin of `X`
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for OrientedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_revcomp {
            write!(f, "c{}", self.id)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

///
/// Directed graph over oriented nodes. The edge weight is the intrinsic
/// QUBO weight of selecting the edge (1.0 unless reweighted).
///
pub type StrandGraph = DiGraph<OrientedNode, f64>;

///
/// Expand a signed graph into a strand-explicit directed graph.
///
/// A link (u, v, s1, s2) resolves to an edge from the s1-orientation of u
/// to the s2-orientation of v. Mirror links produce the complement-strand
/// edges. Parallel resolved edges collapse into one.
///
pub fn expand(dbg: &SignedDbg) -> Result<StrandGraph, DbgQuboError> {
    let mut graph = StrandGraph::new();
    let mut forward = FnvHashMap::default();
    let mut comp = FnvHashMap::default();
    for (v, segment) in dbg.segments() {
        forward.insert(v, graph.add_node(OrientedNode::forward(&segment.id, &segment.seq)));
        comp.insert(
            v,
            graph.add_node(OrientedNode::complement(&segment.id, &segment.seq)?),
        );
    }
    for (u, v, link) in dbg.links() {
        let from = if link.sign_begin.is_plus() {
            forward[&u]
        } else {
            comp[&u]
        };
        let to = if link.sign_end.is_plus() {
            forward[&v]
        } else {
            comp[&v]
        };
        if graph.find_edge(from, to).is_none() {
            graph.add_edge(from, to, 1.0);
        }
    }
    Ok(graph)
}

///
/// Remove all nodes of total degree zero, in place.
///
pub fn remove_isolated(graph: &mut StrandGraph) {
    graph.retain_nodes(|g, v| {
        g.edges_directed(v, Direction::Outgoing).next().is_some()
            || g.edges_directed(v, Direction::Incoming).next().is_some()
    });
}

///
/// Weakly connected components, largest first. Within a component nodes
/// keep their discovery (index) order; equally sized components keep
/// first-appearance order.
///
pub fn weak_components(graph: &StrandGraph) -> Vec<Vec<NodeIndex>> {
    let mut uf = UnionFind::new(graph.node_count());
    for e in graph.edge_references() {
        uf.union(e.source().index(), e.target().index());
    }
    let mut by_root: FnvHashMap<usize, usize> = FnvHashMap::default();
    let mut components: Vec<Vec<NodeIndex>> = Vec::new();
    for v in graph.node_indices() {
        let root = uf.find(v.index());
        let i = *by_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[i].push(v);
    }
    components.sort_by_key(|component| Reverse(component.len()));
    components
}

///
/// Copy of the subgraph induced by `nodes`, with a mapping from old to
/// new node indices.
///
pub fn subgraph(
    graph: &StrandGraph,
    nodes: &[NodeIndex],
) -> (StrandGraph, FnvHashMap<NodeIndex, NodeIndex>) {
    let mut sub = StrandGraph::new();
    let mut map = FnvHashMap::default();
    for &v in nodes {
        map.insert(v, sub.add_node(graph.node_weight(v).unwrap().clone()));
    }
    for e in graph.edge_references() {
        if let (Some(&s), Some(&t)) = (map.get(&e.source()), map.get(&e.target())) {
            sub.add_edge(s, t, *e.weight());
        }
    }
    (sub, map)
}

///
/// The largest weakly connected component as its own graph.
///
pub fn biggest_component(graph: &StrandGraph) -> StrandGraph {
    match weak_components(graph).first() {
        Some(component) => subgraph(graph, component).0,
        None => StrandGraph::new(),
    }
}

///
/// Look a node up by its display name (`X` or `cX`).
///
pub fn find_node(graph: &StrandGraph, name: &str) -> Option<NodeIndex> {
    graph
        .node_indices()
        .find(|&v| graph.node_weight(v).unwrap().name() == name)
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::mock_signed_pair;
    use crate::signed::{Sign, SignedDbg};

    #[test]
    fn expansion_of_signed_pair() {
        // S1 -(+,+)-> S2 and its mirror cS2 -> cS1
        let dbg = mock_signed_pair();
        let g = expand(&dbg).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 2);

        let s1 = find_node(&g, "S1").unwrap();
        let s2 = find_node(&g, "S2").unwrap();
        let cs1 = find_node(&g, "cS1").unwrap();
        let cs2 = find_node(&g, "cS2").unwrap();
        assert!(g.find_edge(s1, s2).is_some());
        assert!(g.find_edge(cs2, cs1).is_some());
        assert_eq!(g.node_weight(s1).unwrap().seq, b"AAAGT".to_vec());
        assert_eq!(g.node_weight(cs1).unwrap().seq, b"ACTTT".to_vec());
    }

    #[test]
    fn minus_signs_resolve_to_complement_nodes() {
        let mut dbg = SignedDbg::new();
        dbg.add_segment("A", b"ACGT");
        dbg.add_segment("B", b"GTAC");
        dbg.add_link("A", "B", Sign::Minus, Sign::Plus);
        let g = expand(&dbg).unwrap();
        let ca = find_node(&g, "cA").unwrap();
        let b = find_node(&g, "B").unwrap();
        assert!(g.find_edge(ca, b).is_some());
        // mirror (B, A, -, +) gives cB -> A
        let cb = find_node(&g, "cB").unwrap();
        let a = find_node(&g, "A").unwrap();
        assert!(g.find_edge(cb, a).is_some());
    }

    #[test]
    fn prune_removes_only_isolated_nodes() {
        let mut dbg = mock_signed_pair();
        dbg.add_segment("S3", b"TTTT"); // never linked
        let mut g = expand(&dbg).unwrap();
        assert_eq!(g.node_count(), 6);
        remove_isolated(&mut g);
        assert_eq!(g.node_count(), 4);
        assert!(find_node(&g, "S3").is_none());
        assert!(find_node(&g, "cS3").is_none());
    }

    #[test]
    fn biggest_component_is_kept() {
        let mut dbg = mock_signed_pair();
        // small separate fragment
        dbg.add_segment("T1", b"ACCA");
        dbg.add_segment("T2", b"CAGG");
        dbg.add_link("T1", "T2", Sign::Plus, Sign::Plus);
        // grow the S component so the tie is broken by size
        dbg.add_segment("S3", b"TTCAA");
        dbg.add_link("S2", "S3", Sign::Plus, Sign::Plus);

        let mut g = expand(&dbg).unwrap();
        remove_isolated(&mut g);
        let components = weak_components(&g);
        assert_eq!(components.len(), 4);
        assert_eq!(components[0].len(), 3);

        let sg = biggest_component(&g);
        assert_eq!(sg.node_count(), 3);
        assert_eq!(sg.edge_count(), 2);
        assert!(find_node(&sg, "S1").is_some());
        assert!(find_node(&sg, "T1").is_none());
    }
}
