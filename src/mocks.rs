//!
//! Shared mock graphs for tests
//!
use crate::signed::{Sign, SignedDbg};
use crate::strand::{OrientedNode, StrandGraph};

///
/// The worked two-segment example: S1="AAAGT", S2="AGTTC" overlapping on
/// k=3, linked `L:+:S2:+` from S1.
///
pub fn mock_signed_pair() -> SignedDbg {
    let mut dbg = SignedDbg::new();
    dbg.add_segment("S1", b"AAAGT");
    dbg.add_segment("S2", b"AGTTC");
    dbg.add_link("S1", "S2", Sign::Plus, Sign::Plus);
    dbg
}

///
/// Three-node chain A -> B -> C, sequences consistent under k=3 overlap,
/// all edge weights 1.
///
pub fn mock_chain() -> StrandGraph {
    let mut g = StrandGraph::new();
    let a = g.add_node(OrientedNode::forward("A", b"AAAGT"));
    let b = g.add_node(OrientedNode::forward("B", b"AGTTC"));
    let c = g.add_node(OrientedNode::forward("C", b"TTCAA"));
    g.add_edge(a, b, 1.0);
    g.add_edge(b, c, 1.0);
    g
}

///
/// Small branching DAG
///
/// ```text
/// 0 -> 1 -> 3
///  \        ^
///   -> 2 ---|
///       \
///        -> 4
/// ```
///
pub fn mock_branching() -> StrandGraph {
    let mut g = StrandGraph::new();
    let v0 = g.add_node(OrientedNode::forward("n0", b"ACGT"));
    let v1 = g.add_node(OrientedNode::forward("n1", b"GTAC"));
    let v2 = g.add_node(OrientedNode::forward("n2", b"ACCA"));
    let v3 = g.add_node(OrientedNode::forward("n3", b"CAGG"));
    let v4 = g.add_node(OrientedNode::forward("n4", b"CATT"));
    g.add_edge(v0, v1, 1.0);
    g.add_edge(v0, v2, 1.0);
    g.add_edge(v1, v3, 1.0);
    g.add_edge(v2, v3, 1.0);
    g.add_edge(v2, v4, 1.0);
    g
}

///
/// Directed 3-cycle 0 -> 1 -> 2 -> 0
///
pub fn mock_cycle() -> StrandGraph {
    let mut g = StrandGraph::new();
    let v0 = g.add_node(OrientedNode::forward("x0", b"ACGT"));
    let v1 = g.add_node(OrientedNode::forward("x1", b"GTAC"));
    let v2 = g.add_node(OrientedNode::forward("x2", b"ACCA"));
    g.add_edge(v0, v1, 1.0);
    g.add_edge(v1, v2, 1.0);
    g.add_edge(v2, v0, 1.0);
    g
}

///
/// Two blocks joined by two parallel bridge nodes
///
/// ```text
/// u -> p -> b -> s -> t
///       \       ^
///        -> d --|
/// ```
///
/// b and d both have in-degree 1 and out-degree 1; removing them leaves
/// the components {u, p} and {s, t}.
///
pub fn mock_two_blocks() -> StrandGraph {
    let mut g = StrandGraph::new();
    let u = g.add_node(OrientedNode::forward("u", b"AAGT"));
    let p = g.add_node(OrientedNode::forward("p", b"GTCC"));
    let b = g.add_node(OrientedNode::forward("b", b"CCAT"));
    let d = g.add_node(OrientedNode::forward("d", b"CCGG"));
    let s = g.add_node(OrientedNode::forward("s", b"ATGG"));
    let t = g.add_node(OrientedNode::forward("t", b"GGTA"));
    g.add_edge(u, p, 1.0);
    g.add_edge(p, b, 1.0);
    g.add_edge(p, d, 1.0);
    g.add_edge(b, s, 1.0);
    g.add_edge(d, s, 1.0);
    g.add_edge(s, t, 1.0);
    g
}
