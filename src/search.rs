//!
//! Classical path search baselines
//!
//! Cheap sanity checks and correctness oracles for the same combinatorial
//! problem the QUBO encodes: a greedy first-neighbor walk and an
//! exhaustive longest-simple-path DFS. The DFS is exponential in the
//! worst case and is meant for small graphs and for validating
//! optimization output, not production assembly.
//!
use crate::common::{NodeIndex, Sequence};
use crate::error::DbgQuboError;
use crate::seq::reconstruct;
use crate::strand::StrandGraph;
use fnv::FnvHashSet;
use petgraph::Direction;

///
/// Path score used by the exhaustive search
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathScore {
    /// number of nodes on the path
    NodeCount,
    /// length of the DNA sequence reconstructed with overlap k
    SeqLength { k: usize },
}

///
/// Length of the sequence a path reconstructs to: L1 + sum(Li - k).
/// Pure arithmetic, so it also scores paths whose overlaps mismatch.
///
pub fn path_seq_length(graph: &StrandGraph, path: &[NodeIndex], k: usize) -> usize {
    let mut total = 0;
    for (i, &v) in path.iter().enumerate() {
        let len = graph.node_weight(v).unwrap().seq.len();
        if i == 0 {
            total = len;
        } else {
            total = total.saturating_sub(k) + len;
        }
    }
    total
}

fn score_of(graph: &StrandGraph, path: &[NodeIndex], score: PathScore) -> usize {
    match score {
        PathScore::NodeCount => path.len(),
        PathScore::SeqLength { k } => path_seq_length(graph, path, k),
    }
}

///
/// Single deterministic walk from `start`: always follow the first
/// successor in iteration order, stop on a dead end or when the next node
/// was already visited (cycle guard). O(path length).
///
pub fn first_neighbor_path(graph: &StrandGraph, start: NodeIndex) -> Vec<NodeIndex> {
    let mut visited: FnvHashSet<NodeIndex> = FnvHashSet::default();
    visited.insert(start);
    let mut path = vec![start];
    let mut current = start;
    loop {
        let next = match graph.neighbors_directed(current, Direction::Outgoing).next() {
            Some(v) => v,
            None => break,
        };
        if visited.contains(&next) {
            break;
        }
        path.push(next);
        visited.insert(next);
        current = next;
    }
    path
}

struct Frame {
    node: NodeIndex,
    children: Vec<NodeIndex>,
    next: usize,
    extended: bool,
}

impl Frame {
    fn new(graph: &StrandGraph, node: NodeIndex, dir: Direction) -> Self {
        Frame {
            node,
            children: graph.neighbors_directed(node, dir).collect(),
            next: 0,
            extended: false,
        }
    }
}

///
/// Exhaustive DFS with backtracking, on an explicit stack of frames. The
/// best path (by `score`) among all candidates is returned; `dir` selects
/// forward (successor) or backward (predecessor) traversal. Without a
/// `target` every dead end is a candidate; with one, exactly the paths
/// reaching `target` are.
///
fn longest_path_dfs(
    graph: &StrandGraph,
    start: NodeIndex,
    score: PathScore,
    dir: Direction,
    target: Option<NodeIndex>,
) -> Vec<NodeIndex> {
    if graph.node_weight(start).is_none() {
        return Vec::new();
    }
    let mut best: Vec<NodeIndex> = Vec::new();
    let mut best_score = 0;
    let mut path = vec![start];
    let mut on_path: FnvHashSet<NodeIndex> = FnvHashSet::default();
    on_path.insert(start);
    let mut stack = vec![Frame::new(graph, start, dir)];
    if target == Some(start) {
        best_score = score_of(graph, &path, score);
        best = path.clone();
    }

    loop {
        let next_child = {
            let frame = stack.last_mut().unwrap();
            let mut found = None;
            while frame.next < frame.children.len() {
                let child = frame.children[frame.next];
                frame.next += 1;
                if !on_path.contains(&child) {
                    frame.extended = true;
                    found = Some(child);
                    break;
                }
            }
            found
        };
        match next_child {
            Some(child) => {
                path.push(child);
                on_path.insert(child);
                stack.push(Frame::new(graph, child, dir));
                if target == Some(child) {
                    let s = score_of(graph, &path, score);
                    if s > best_score {
                        best_score = s;
                        best = path.clone();
                    }
                }
            }
            None => {
                // dead end: no unvisited neighbor was ever found here
                let frame = stack.pop().unwrap();
                if !frame.extended && target.is_none() {
                    let s = score_of(graph, &path, score);
                    if s > best_score {
                        best_score = s;
                        best = path.clone();
                    }
                }
                path.pop();
                on_path.remove(&frame.node);
                if stack.is_empty() {
                    break;
                }
            }
        }
    }
    best
}

///
/// Longest simple path starting at `start`.
///
pub fn longest_path_from(graph: &StrandGraph, start: NodeIndex, score: PathScore) -> Vec<NodeIndex> {
    longest_path_dfs(graph, start, score, Direction::Outgoing, None)
}

///
/// Longest simple path ending at `finish`, returned in path order
/// (source first).
///
pub fn longest_path_to(graph: &StrandGraph, finish: NodeIndex, score: PathScore) -> Vec<NodeIndex> {
    let mut path = longest_path_dfs(graph, finish, score, Direction::Incoming, None);
    path.reverse();
    path
}

///
/// Longest simple path leaving `start` and ending at `finish`. Empty
/// when no simple path connects the two.
///
pub fn longest_path_between(
    graph: &StrandGraph,
    start: NodeIndex,
    finish: NodeIndex,
    score: PathScore,
) -> Vec<NodeIndex> {
    longest_path_dfs(graph, start, score, Direction::Outgoing, Some(finish))
}

///
/// A graph qualifies as a simple path iff it has exactly one source
/// (in-degree 0), exactly one sink (out-degree 0), and every other node
/// has in-degree 1 and out-degree 1.
///
pub fn is_simple_path(graph: &StrandGraph) -> bool {
    let in_deg = |v| graph.edges_directed(v, Direction::Incoming).count();
    let out_deg = |v| graph.edges_directed(v, Direction::Outgoing).count();
    let sources: Vec<NodeIndex> = graph.node_indices().filter(|&v| in_deg(v) == 0).collect();
    let sinks: Vec<NodeIndex> = graph.node_indices().filter(|&v| out_deg(v) == 0).collect();
    if sources.len() != 1 || sinks.len() != 1 {
        return false;
    }
    graph
        .node_indices()
        .filter(|v| *v != sources[0] && *v != sinks[0])
        .all(|v| in_deg(v) == 1 && out_deg(v) == 1)
}

///
/// Ordered node sequence of a graph that is a simple path, walking
/// successor links from the unique source.
///
pub fn linearize(graph: &StrandGraph) -> Result<Vec<NodeIndex>, DbgQuboError> {
    if !is_simple_path(graph) {
        return Err(DbgQuboError::NotASimplePath);
    }
    let source = graph
        .node_indices()
        .find(|&v| graph.edges_directed(v, Direction::Incoming).count() == 0)
        .unwrap();
    let mut path = vec![source];
    let mut current = source;
    while let Some(next) = graph.neighbors_directed(current, Direction::Outgoing).next() {
        path.push(next);
        current = next;
    }
    Ok(path)
}

///
/// Reconstruct the DNA sequence spelled by a path of oriented nodes with
/// overlap k.
///
pub fn reconstruct_path(
    graph: &StrandGraph,
    path: &[NodeIndex],
    k: usize,
) -> Result<Sequence, DbgQuboError> {
    reconstruct(
        path.iter().map(|&v| &graph.node_weight(v).unwrap().seq),
        k,
    )
}

//
// tests
//
