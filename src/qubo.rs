//!
//! QUBO encoding of the longest-path problem
//!
//! One binary variable per directed edge (coordinates given by the
//! `EdgeRegister`). The matrix is a penalty-weighted sum of
//!
//! * a main term rewarding selected edges by their intrinsic weight,
//! * out-degree and in-degree penalties whose minimum is "at most one
//!   outgoing/incoming edge per node",
//! * a flow-conservation penalty rewarding in-flow == out-flow, with an
//!   optional bias at designated start/finish nodes,
//!
//! symmetrized as Q + Q^T - diag(Q). Minimizing x^T Q x over binary x
//! favors bit vectors whose selected edges form a single maximum-weight
//! path visiting each node at most once.
//!
use crate::common::NodeIndex;
use crate::error::DbgQuboError;
use crate::register::EdgeRegister;
use crate::strand::StrandGraph;
use fnv::FnvHashMap;
use ndarray::Array2;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

///
/// Penalty weights of the QUBO terms, passed explicitly to the assembler.
///
/// * `delta`: scale of the main (edge weight) term
/// * `alpha`: out-degree penalty
/// * `beta`: in-degree penalty
/// * `gamma`: flow-conservation penalty (also scales start/finish bias)
///
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuboWeights {
    pub delta: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for QuboWeights {
    fn default() -> Self {
        QuboWeights {
            delta: 1.0,
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
        }
    }
}

fn add_lin_out(
    graph: &StrandGraph,
    register: &EdgeRegister,
    q: &mut Array2<f64>,
    v: NodeIndex,
    val: f64,
) -> Result<(), DbgQuboError> {
    for e in graph.edges_directed(v, Direction::Outgoing) {
        let i = register.index_of(e.source(), e.target())?;
        q[[i, i]] += val;
    }
    Ok(())
}

fn add_lin_in(
    graph: &StrandGraph,
    register: &EdgeRegister,
    q: &mut Array2<f64>,
    v: NodeIndex,
    val: f64,
) -> Result<(), DbgQuboError> {
    for e in graph.edges_directed(v, Direction::Incoming) {
        let i = register.index_of(e.source(), e.target())?;
        q[[i, i]] += val;
    }
    Ok(())
}

/// quadratic term over all ordered pairs of outgoing edges of v
fn add_quad_out(
    graph: &StrandGraph,
    register: &EdgeRegister,
    q: &mut Array2<f64>,
    v: NodeIndex,
    val: f64,
) -> Result<(), DbgQuboError> {
    for e in graph.edges_directed(v, Direction::Outgoing) {
        let i = register.index_of(e.source(), e.target())?;
        for f in graph.edges_directed(v, Direction::Outgoing) {
            let j = register.index_of(f.source(), f.target())?;
            q[[i, j]] += val;
        }
    }
    Ok(())
}

/// quadratic term over all ordered pairs of incoming edges of v
fn add_quad_in(
    graph: &StrandGraph,
    register: &EdgeRegister,
    q: &mut Array2<f64>,
    v: NodeIndex,
    val: f64,
) -> Result<(), DbgQuboError> {
    for e in graph.edges_directed(v, Direction::Incoming) {
        let i = register.index_of(e.source(), e.target())?;
        for f in graph.edges_directed(v, Direction::Incoming) {
            let j = register.index_of(f.source(), f.target())?;
            q[[i, j]] += val;
        }
    }
    Ok(())
}

/// quadratic cross term (outgoing edge, incoming edge) at v
fn add_quad_mix(
    graph: &StrandGraph,
    register: &EdgeRegister,
    q: &mut Array2<f64>,
    v: NodeIndex,
    val: f64,
) -> Result<(), DbgQuboError> {
    for e in graph.edges_directed(v, Direction::Outgoing) {
        let i = register.index_of(e.source(), e.target())?;
        for f in graph.edges_directed(v, Direction::Incoming) {
            let j = register.index_of(f.source(), f.target())?;
            q[[i, j]] += val;
        }
    }
    Ok(())
}

///
/// Q + Q^T - diag(Q): symmetric without double-counting the diagonal.
///
pub fn symmetrize(q: &Array2<f64>) -> Array2<f64> {
    let diag = Array2::from_diag(&q.diag());
    q + &q.t() - diag
}

///
/// Assemble the symmetric QUBO matrix for `graph` under `weights`.
///
/// `start`/`finish` add a boundary bias: the flow penalty alone would
/// punish a node with out-flow but no in-flow, so a designated start node
/// gets its outgoing edges rewarded and incoming edges punished (the
/// finish node symmetrically).
///
/// The register must have been built from this exact graph; a stale
/// register fails with `UnknownEdge`.
///
pub fn qubo_matrix(
    graph: &StrandGraph,
    register: &EdgeRegister,
    weights: &QuboWeights,
    start: Option<NodeIndex>,
    finish: Option<NodeIndex>,
) -> Result<Array2<f64>, DbgQuboError> {
    let n = register.len();
    let mut q = Array2::zeros((n, n));

    // main term: intrinsic edge weights on the diagonal
    for e in graph.edge_references() {
        let i = register.index_of(e.source(), e.target())?;
        q[[i, i]] += weights.delta * *e.weight();
    }

    for v in graph.node_indices() {
        // out-degree penalty: minimum at "one outgoing edge or none"
        add_lin_out(graph, register, &mut q, v, -2.0 * weights.alpha)?;
        add_quad_out(graph, register, &mut q, v, weights.alpha)?;
        // in-degree penalty
        add_lin_in(graph, register, &mut q, v, -2.0 * weights.beta)?;
        add_quad_in(graph, register, &mut q, v, weights.beta)?;
        // flow conservation: (out-flow - in-flow)^2
        add_quad_out(graph, register, &mut q, v, weights.gamma)?;
        add_quad_in(graph, register, &mut q, v, weights.gamma)?;
        add_quad_mix(graph, register, &mut q, v, -2.0 * weights.gamma)?;
    }

    if let Some(v) = start {
        add_lin_out(graph, register, &mut q, v, -2.0 * weights.gamma)?;
        add_lin_in(graph, register, &mut q, v, 2.0 * weights.gamma)?;
    }
    if let Some(v) = finish {
        add_lin_in(graph, register, &mut q, v, -2.0 * weights.gamma)?;
        add_lin_out(graph, register, &mut q, v, 2.0 * weights.gamma)?;
    }

    Ok(symmetrize(&q))
}

///
/// Energy x^T Q x of a bit vector. The vector must have one bit per
/// matrix row.
///
pub fn evaluate(q: &Array2<f64>, bits: &[u8]) -> Result<f64, DbgQuboError> {
    if bits.len() != q.nrows() {
        return Err(DbgQuboError::SolutionSizeMismatch {
            expected: q.nrows(),
            actual: bits.len(),
        });
    }
    let n = bits.len();
    let mut energy = 0.0;
    for i in 0..n {
        if bits[i] == 0 {
            continue;
        }
        for j in 0..n {
            if bits[j] == 1 {
                energy += q[[i, j]];
            }
        }
    }
    Ok(energy)
}

///
/// Edges selected by a solver bit vector, in register order.
///
pub fn selected_edges(
    bits: &[u8],
    register: &EdgeRegister,
) -> Result<Vec<(NodeIndex, NodeIndex)>, DbgQuboError> {
    if bits.len() != register.len() {
        return Err(DbgQuboError::SolutionSizeMismatch {
            expected: register.len(),
            actual: bits.len(),
        });
    }
    let mut edges = Vec::new();
    for (i, &bit) in bits.iter().enumerate() {
        if bit == 1 {
            edges.push(register.edge_of(i)?);
        }
    }
    Ok(edges)
}

///
/// Sub-digraph induced by the selected edges (nodes touched by an edge
/// only). Traversing it yields the solution path, provided it is a
/// simple path (`search::linearize`).
///
pub fn solution_subgraph(graph: &StrandGraph, edges: &[(NodeIndex, NodeIndex)]) -> StrandGraph {
    let mut sub = StrandGraph::new();
    let mut map: FnvHashMap<NodeIndex, NodeIndex> = FnvHashMap::default();
    for &(s, t) in edges {
        let s_new = *map
            .entry(s)
            .or_insert_with(|| sub.add_node(graph.node_weight(s).unwrap().clone()));
        let t_new = *map
            .entry(t)
            .or_insert_with(|| sub.add_node(graph.node_weight(t).unwrap().clone()));
        let weight = match graph.find_edge(s, t) {
            Some(e) => *graph.edge_weight(e).unwrap(),
            None => 1.0,
        };
        sub.add_edge(s_new, t_new, weight);
    }
    sub
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{mock_branching, mock_chain};

    fn brute_force_minimum(q: &Array2<f64>) -> (Vec<u8>, f64) {
        let n = q.nrows();
        let mut best = (vec![0; n], f64::INFINITY);
        for mask in 0..(1u32 << n) {
            let bits: Vec<u8> = (0..n).map(|i| ((mask >> i) & 1) as u8).collect();
            let energy = evaluate(q, &bits).unwrap();
            if energy < best.1 {
                best = (bits, energy);
            }
        }
        best
    }

    #[test]
    fn evaluate_rejects_wrong_length() {
        let g = mock_chain();
        let register = EdgeRegister::from_graph(&g);
        let q = qubo_matrix(&g, &register, &QuboWeights::default(), None, None).unwrap();
        match evaluate(&q, &[1, 0, 1]) {
            Err(DbgQuboError::SolutionSizeMismatch {
                expected: 2,
                actual: 3,
            }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn zero_penalties_reduce_to_diagonal_of_weights() {
        let g = mock_branching();
        let register = EdgeRegister::from_graph(&g);
        let w = QuboWeights {
            delta: 1.0,
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
        };
        let q = qubo_matrix(&g, &register, &w, None, None).unwrap();
        for i in 0..register.len() {
            for j in 0..register.len() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(q[[i, j]], expected);
            }
        }
    }

    #[test]
    fn matrix_is_symmetric_for_any_weights() {
        let g = mock_branching();
        let register = EdgeRegister::from_graph(&g);
        let configs = vec![
            QuboWeights::default(),
            QuboWeights {
                delta: 10.0,
                alpha: 1.0,
                beta: 2.0,
                gamma: 5.0,
            },
            QuboWeights {
                delta: -3.5,
                alpha: 0.25,
                beta: 7.0,
                gamma: 0.0,
            },
        ];
        let start = g.node_indices().next();
        let finish = g.node_indices().last();
        for w in configs {
            let q = qubo_matrix(&g, &register, &w, start, finish).unwrap();
            for i in 0..register.len() {
                for j in 0..register.len() {
                    assert_abs_diff_eq!(q[[i, j]], q[[j, i]]);
                }
            }
        }
    }

    #[test]
    fn three_node_chain_ground_state_selects_both_edges() {
        let g = mock_chain();
        let register = EdgeRegister::from_graph(&g);
        let w = QuboWeights {
            delta: 1.0,
            alpha: 5.0,
            beta: 5.0,
            gamma: 5.0,
        };
        let q = qubo_matrix(&g, &register, &w, None, None).unwrap();
        let (bits, energy) = brute_force_minimum(&q);
        assert_eq!(bits, vec![1, 1]);
        assert_abs_diff_eq!(energy, -18.0);
    }

    #[test]
    fn chain_matrix_entries() {
        let g = mock_chain();
        let register = EdgeRegister::from_graph(&g);
        let w = QuboWeights {
            delta: 1.0,
            alpha: 5.0,
            beta: 5.0,
            gamma: 5.0,
        };
        let q = qubo_matrix(&g, &register, &w, None, None).unwrap();
        // per edge: delta*1 + alpha*(-2+1) + beta*(-2+1) + gamma*(1+1)
        assert_abs_diff_eq!(q[[0, 0]], 1.0);
        assert_abs_diff_eq!(q[[1, 1]], 1.0);
        // flow cross term at the middle node
        assert_abs_diff_eq!(q[[0, 1]], -10.0);
        assert_abs_diff_eq!(q[[1, 0]], -10.0);
    }

    #[test]
    fn stale_register_is_an_unknown_edge_error() {
        let g = mock_chain();
        let register = EdgeRegister::from_graph(&g);
        let mut mutated = g.clone();
        let a = mutated.node_indices().next().unwrap();
        let c = mutated.node_indices().last().unwrap();
        mutated.add_edge(c, a, 1.0);
        match qubo_matrix(&mutated, &register, &QuboWeights::default(), None, None) {
            Err(DbgQuboError::UnknownEdge(_, _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn boundary_bias_rewards_the_terminal_edges() {
        let g = mock_chain();
        let register = EdgeRegister::from_graph(&g);
        let a = g.node_indices().next().unwrap();
        let c = g.node_indices().last().unwrap();
        let w = QuboWeights {
            delta: 1.0,
            alpha: 5.0,
            beta: 5.0,
            gamma: 5.0,
        };
        let q = qubo_matrix(&g, &register, &w, Some(a), Some(c)).unwrap();
        // the start's outgoing edge and the finish's incoming edge get a
        // -2*gamma reward on top of the plain chain diagonal
        assert_abs_diff_eq!(q[[0, 0]], -9.0);
        assert_abs_diff_eq!(q[[1, 1]], -9.0);
        let (bits, energy) = brute_force_minimum(&q);
        assert_eq!(bits, vec![1, 1]);
        assert_abs_diff_eq!(energy, -38.0);
    }

    #[test]
    fn solution_subgraph_induces_selected_edges() {
        let g = mock_branching();
        let register = EdgeRegister::from_graph(&g);
        let bits: Vec<u8> = (0..register.len()).map(|i| (i % 2 == 0) as u8).collect();
        let edges = selected_edges(&bits, &register).unwrap();
        let sub = solution_subgraph(&g, &edges);
        assert_eq!(sub.edge_count(), edges.len());
        assert!(sub.node_count() <= g.node_count());
    }

    #[test]
    fn solution_size_mismatch() {
        let g = mock_chain();
        let register = EdgeRegister::from_graph(&g);
        match selected_edges(&[1], &register) {
            Err(DbgQuboError::SolutionSizeMismatch {
                expected: 2,
                actual: 1,
            }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }
}
