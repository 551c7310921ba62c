//!
//! Bridge decomposition
//!
//! A bridge is a node with exactly one predecessor and one successor.
//! Removing all bridges splits the graph into weakly connected blocks;
//! each bridge is then re-attached to the blocks it touches, tagged by its
//! role there (exit of the block holding its predecessor, entry of the
//! block holding its successor). Blocks can be solved independently and
//! stitched back together along the shared bridges.
//!
//! All tables are keyed by the bridge's `NodeIndex` in the original
//! graph. Display names are not unique (a forward node named `cX` and the
//! complement twin of `X` render the same) and appear only in the
//! serializable summary.
//!
use crate::common::NodeIndex;
use crate::error::DbgQuboError;
use crate::strand::{subgraph, StrandGraph};
use fnv::{FnvHashMap, FnvHashSet};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

///
/// Role of a bridge node inside one block
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BridgeRole {
    /// entry point: the block holds the bridge's successor
    Start,
    /// exit point: the block holds the bridge's predecessor
    End,
    /// predecessor and successor ended up in the same block
    Both,
}

///
/// One bridge re-attached to a block: where it sits in the block's own
/// graph and which boundary role it plays there
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachedBridge {
    pub node: NodeIndex,
    pub role: BridgeRole,
}

///
/// One weakly connected block with its re-attached bridges
///
#[derive(Debug, Clone)]
pub struct Block {
    pub graph: StrandGraph,
    /// re-attached bridges, keyed by their node in the original graph
    pub bridges: FnvHashMap<NodeIndex, AttachedBridge>,
}

///
/// Bridges shared by the same pair of blocks; used to stitch the
/// per-block solutions into one global path.
///
#[derive(Debug, Clone)]
pub struct SharedGroup {
    pub blocks: (usize, usize),
    pub bridges: Vec<NodeIndex>,
}

///
/// Result of decomposing a graph at its bridge nodes
///
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// blocks sorted by descending node count (bridges excluded from the count order)
    pub blocks: Vec<Block>,
    /// all bridge nodes, as indices into the original graph
    pub bridges: Vec<NodeIndex>,
    /// for each bridge, the indices of the blocks containing it
    pub blocks_of_bridge: FnvHashMap<NodeIndex, Vec<usize>>,
    /// bridges grouped by the pair of blocks sharing them
    pub groups: Vec<SharedGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedGroupSummary {
    pub blocks: (usize, usize),
    pub bridges: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecompositionSummary {
    pub n_blocks: usize,
    pub block_sizes: Vec<usize>,
    pub bridges: Vec<String>,
    pub groups: Vec<SharedGroupSummary>,
}

impl Decomposition {
    ///
    /// Human-readable summary; `graph` must be the graph this
    /// decomposition was built from.
    ///
    pub fn summary(&self, graph: &StrandGraph) -> DecompositionSummary {
        DecompositionSummary {
            n_blocks: self.blocks.len(),
            block_sizes: self.blocks.iter().map(|b| b.graph.node_count()).collect(),
            bridges: self.bridges.iter().map(|&b| name_of(graph, b)).collect(),
            groups: self
                .groups
                .iter()
                .map(|group| SharedGroupSummary {
                    blocks: group.blocks,
                    bridges: group.bridges.iter().map(|&b| name_of(graph, b)).collect(),
                })
                .collect(),
        }
    }
}

///
/// Nodes with in-degree 1 and out-degree 1.
///
pub fn bridge_nodes(graph: &StrandGraph) -> Vec<NodeIndex> {
    graph
        .node_indices()
        .filter(|&v| {
            graph.edges_directed(v, Direction::Incoming).count() == 1
                && graph.edges_directed(v, Direction::Outgoing).count() == 1
        })
        .collect()
}

fn name_of(graph: &StrandGraph, v: NodeIndex) -> String {
    graph.node_weight(v).unwrap().name()
}

///
/// Decompose `graph` into blocks at its bridge nodes.
///
/// Fails with `BridgeSharing` if a bridge turns out to be shared by more
/// than two blocks: the stitching tables assume pairwise sharing. A
/// bridge has one predecessor and one successor, so this is an internal
/// invariant guard rather than a reachable input condition.
///
pub fn decompose(graph: &StrandGraph) -> Result<Decomposition, DbgQuboError> {
    let bridges = bridge_nodes(graph);
    let bridge_set: FnvHashSet<NodeIndex> = bridges.iter().copied().collect();

    // unique predecessor/successor of each bridge
    let preds: Vec<NodeIndex> = bridges
        .iter()
        .map(|&b| graph.neighbors_directed(b, Direction::Incoming).next().unwrap())
        .collect();
    let succs: Vec<NodeIndex> = bridges
        .iter()
        .map(|&b| graph.neighbors_directed(b, Direction::Outgoing).next().unwrap())
        .collect();

    // weak components of the graph without its bridge nodes
    let mut uf = UnionFind::new(graph.node_count());
    for e in graph.edge_references() {
        if !bridge_set.contains(&e.source()) && !bridge_set.contains(&e.target()) {
            uf.union(e.source().index(), e.target().index());
        }
    }
    let mut by_root: FnvHashMap<usize, usize> = FnvHashMap::default();
    let mut components: Vec<Vec<NodeIndex>> = Vec::new();
    for v in graph.node_indices() {
        if bridge_set.contains(&v) {
            continue;
        }
        let root = uf.find(v.index());
        let i = *by_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[i].push(v);
    }
    components.sort_by_key(|component| Reverse(component.len()));

    // re-attach each bridge to the blocks holding its predecessor/successor
    let mut blocks = Vec::with_capacity(components.len());
    for component in &components {
        let (mut block_graph, map) = subgraph(graph, component);
        let mut block_bridges: FnvHashMap<NodeIndex, AttachedBridge> = FnvHashMap::default();
        for (i, &b) in bridges.iter().enumerate() {
            let mut local = None;
            let mut role = None;
            if let Some(&p) = map.get(&preds[i]) {
                let v = *local.get_or_insert_with(|| {
                    block_graph.add_node(graph.node_weight(b).unwrap().clone())
                });
                let e = graph.find_edge(preds[i], b).unwrap();
                block_graph.add_edge(p, v, *graph.edge_weight(e).unwrap());
                role = Some(BridgeRole::End);
            }
            if let Some(&s) = map.get(&succs[i]) {
                let v = *local.get_or_insert_with(|| {
                    block_graph.add_node(graph.node_weight(b).unwrap().clone())
                });
                let e = graph.find_edge(b, succs[i]).unwrap();
                block_graph.add_edge(v, s, *graph.edge_weight(e).unwrap());
                role = Some(match role {
                    Some(BridgeRole::End) => BridgeRole::Both,
                    _ => BridgeRole::Start,
                });
            }
            if let (Some(node), Some(role)) = (local, role) {
                block_bridges.insert(b, AttachedBridge { node, role });
            }
        }
        blocks.push(Block {
            graph: block_graph,
            bridges: block_bridges,
        });
    }

    // cross-reference tables
    let mut blocks_of_bridge: FnvHashMap<NodeIndex, Vec<usize>> = FnvHashMap::default();
    for &b in &bridges {
        let holders: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.bridges.contains_key(&b))
            .map(|(i, _)| i)
            .collect();
        if holders.len() > 2 {
            return Err(DbgQuboError::BridgeSharing {
                bridge: name_of(graph, b),
                n_blocks: holders.len(),
            });
        }
        blocks_of_bridge.insert(b, holders);
    }

    let mut by_pair: BTreeMap<(usize, usize), Vec<NodeIndex>> = BTreeMap::new();
    for &b in &bridges {
        if let [x, y] = blocks_of_bridge[&b][..] {
            by_pair.entry((x, y)).or_default().push(b);
        }
    }
    let groups = by_pair
        .into_iter()
        .map(|(blocks, bridges)| SharedGroup { blocks, bridges })
        .collect();

    Ok(Decomposition {
        blocks,
        bridges,
        blocks_of_bridge,
        groups,
    })
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{mock_chain, mock_two_blocks};
    use crate::strand::{find_node, OrientedNode};
    use itertools::Itertools;

    #[test]
    fn bridge_detection() {
        let g = mock_two_blocks();
        let names: Vec<String> = bridge_nodes(&g)
            .into_iter()
            .map(|v| name_of(&g, v))
            .sorted()
            .collect();
        assert_eq!(names, vec!["b".to_string(), "d".to_string()]);
    }

    #[test]
    fn two_block_decomposition() {
        let g = mock_two_blocks();
        let dec = decompose(&g).unwrap();
        assert_eq!(dec.blocks.len(), 2);
        // each block: 2 own nodes + 2 re-attached bridges
        for block in &dec.blocks {
            assert_eq!(block.graph.node_count(), 4);
            assert_eq!(block.bridges.len(), 2);
        }
        let b = find_node(&g, "b").unwrap();
        let d = find_node(&g, "d").unwrap();
        // the block holding p sees the bridges as exits,
        // the block holding s sees them as entries
        let upstream = dec
            .blocks
            .iter()
            .find(|block| find_node(&block.graph, "p").is_some())
            .unwrap();
        assert_eq!(upstream.bridges[&b].role, BridgeRole::End);
        assert_eq!(upstream.bridges[&d].role, BridgeRole::End);
        assert_eq!(name_of(&upstream.graph, upstream.bridges[&b].node), "b");
        let downstream = dec
            .blocks
            .iter()
            .find(|block| find_node(&block.graph, "s").is_some())
            .unwrap();
        assert_eq!(downstream.bridges[&b].role, BridgeRole::Start);
        assert_eq!(downstream.bridges[&d].role, BridgeRole::Start);
    }

    #[test]
    fn cross_reference_tables() {
        let g = mock_two_blocks();
        let dec = decompose(&g).unwrap();
        assert_eq!(dec.bridges.len(), 2);
        for b in &dec.bridges {
            assert_eq!(dec.blocks_of_bridge[b].len(), 2);
        }
        // both bridges are shared by the same pair of blocks
        assert_eq!(dec.groups.len(), 1);
        assert_eq!(dec.groups[0].blocks, (0, 1));
        assert_eq!(dec.groups[0].bridges.len(), 2);

        let summary = dec.summary(&g);
        assert_eq!(summary.n_blocks, 2);
        assert_eq!(summary.block_sizes, vec![4, 4]);
        let names: Vec<&String> = summary.groups[0].bridges.iter().sorted().collect();
        assert_eq!(names, vec!["b", "d"]);
    }

    #[test]
    fn recombination_covers_all_nodes_once() {
        let g = mock_two_blocks();
        let dec = decompose(&g).unwrap();
        let mut seen: Vec<String> = Vec::new();
        for block in &dec.blocks {
            let attached: FnvHashSet<NodeIndex> =
                block.bridges.values().map(|a| a.node).collect();
            for v in block.graph.node_indices() {
                if !attached.contains(&v) {
                    seen.push(name_of(&block.graph, v));
                }
            }
        }
        seen.extend(dec.bridges.iter().map(|&b| name_of(&g, b)));
        let all: Vec<String> = g.node_indices().map(|v| name_of(&g, v)).collect();
        assert_eq!(
            seen.iter().sorted().collect::<Vec<_>>(),
            all.iter().sorted().collect::<Vec<_>>()
        );
    }

    #[test]
    fn chain_splits_into_singleton_blocks() {
        // a -> b -> c: b is a bridge, both its neighbors end up in
        // singleton components
        let g = mock_chain();
        let dec = decompose(&g).unwrap();
        let b = find_node(&g, "B").unwrap();
        assert_eq!(dec.bridges, vec![b]);
        assert_eq!(dec.blocks.len(), 2);
        assert_eq!(dec.blocks_of_bridge[&b].len(), 2);
    }

    /// a copy of the two-block shape with a bridge named "x" in every copy
    fn two_block_component(g: &mut StrandGraph, tag: &str) {
        let u = g.add_node(OrientedNode::forward(&format!("u{}", tag), b"AAGT"));
        let p = g.add_node(OrientedNode::forward(&format!("p{}", tag), b"GTCC"));
        let x = g.add_node(OrientedNode::forward("x", b"CCAT"));
        let d = g.add_node(OrientedNode::forward(&format!("d{}", tag), b"CCGG"));
        let s = g.add_node(OrientedNode::forward(&format!("s{}", tag), b"ATGG"));
        let t = g.add_node(OrientedNode::forward(&format!("t{}", tag), b"GGTA"));
        g.add_edge(u, p, 1.0);
        g.add_edge(p, x, 1.0);
        g.add_edge(p, d, 1.0);
        g.add_edge(x, s, 1.0);
        g.add_edge(d, s, 1.0);
        g.add_edge(s, t, 1.0);
    }

    #[test]
    fn same_named_bridges_in_disjoint_components_stay_distinct() {
        // two disjoint components each containing a bridge displayed as
        // "x"; every bridge touches exactly two blocks, so the
        // decomposition must succeed and keep the two "x" nodes apart
        let mut g = StrandGraph::new();
        two_block_component(&mut g, "1");
        two_block_component(&mut g, "2");
        let dec = decompose(&g).unwrap();
        assert_eq!(dec.blocks.len(), 4);
        assert_eq!(dec.bridges.len(), 4);
        for b in &dec.bridges {
            assert_eq!(dec.blocks_of_bridge[b].len(), 2);
        }
        let xs: Vec<&NodeIndex> = dec
            .bridges
            .iter()
            .filter(|&&b| name_of(&g, b) == "x")
            .collect();
        assert_eq!(xs.len(), 2);
        // one group per component pair
        assert_eq!(dec.groups.len(), 2);
        for group in &dec.groups {
            assert_eq!(group.bridges.len(), 2);
        }
    }
}
