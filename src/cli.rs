//!
//! Subcommand bodies of the dbgqubo binary
//!
use crate::bridge;
use crate::common::{sequence_to_string, NodeIndex};
use crate::error::DbgQuboError;
use crate::io;
use crate::qubo::{self, QuboWeights};
use crate::register::EdgeRegister;
use crate::search::{self, PathScore};
use crate::strand::{self, StrandGraph};
use itertools::Itertools;
use log::info;
use std::path::Path;

///
/// Build the working graph of a record file: signed graph, strand
/// expansion, isolated-node pruning, then the largest weak component.
///
fn working_graph<P: AsRef<Path>>(path: P) -> Result<StrandGraph, DbgQuboError> {
    let dbg = io::signed_dbg_from_file(path)?;
    let mut graph = strand::expand(&dbg)?;
    strand::remove_isolated(&mut graph);
    let n_components = strand::weak_components(&graph).len();
    let sg = strand::biggest_component(&graph);
    info!(
        "directed graph: {} nodes, {} edges in {} weak components; keeping largest ({} nodes, {} edges)",
        graph.node_count(),
        graph.edge_count(),
        n_components,
        sg.node_count(),
        sg.edge_count(),
    );
    Ok(sg)
}

fn resolve(graph: &StrandGraph, name: &str) -> Result<NodeIndex, DbgQuboError> {
    strand::find_node(graph, name).ok_or_else(|| DbgQuboError::UnknownNode(name.to_string()))
}

fn path_names(graph: &StrandGraph, path: &[NodeIndex]) -> String {
    path.iter()
        .map(|&v| graph.node_weight(v).unwrap().name())
        .join(" -> ")
}

///
/// Graph statistics only.
///
pub fn info_cmd<P: AsRef<Path>>(path: P) -> Result<(), DbgQuboError> {
    let sg = working_graph(path)?;
    let bridges = bridge::bridge_nodes(&sg);
    println!("nodes: {}", sg.node_count());
    println!("edges: {}", sg.edge_count());
    println!("bridge nodes: {}", bridges.len());
    println!("is simple path: {}", search::is_simple_path(&sg));
    Ok(())
}

///
/// Encode the longest-path problem of the working graph as a QUBO matrix
/// and persist it for an external solver.
///
pub fn qubo_cmd<P: AsRef<Path>>(
    path: P,
    weights: QuboWeights,
    start: Option<&str>,
    finish: Option<&str>,
    output: P,
) -> Result<(), DbgQuboError> {
    let sg = working_graph(path)?;
    let register = EdgeRegister::from_graph(&sg);
    let start = start.map(|name| resolve(&sg, name)).transpose()?;
    let finish = finish.map(|name| resolve(&sg, name)).transpose()?;
    let q = qubo::qubo_matrix(&sg, &register, &weights, start, finish)?;
    io::write_qubo_json(&output, &q)?;
    println!(
        "wrote QUBO matrix of dimension {} to {}",
        register.len(),
        output.as_ref().display()
    );
    Ok(())
}

///
/// Greedy first-neighbor walk from a start node.
///
pub fn greedy_cmd<P: AsRef<Path>>(path: P, start: &str, k: usize) -> Result<(), DbgQuboError> {
    let sg = working_graph(path)?;
    let start = resolve(&sg, start)?;
    let walk = search::first_neighbor_path(&sg, start);
    println!("path: {}", path_names(&sg, &walk));
    let seq = search::reconstruct_path(&sg, &walk, k)?;
    println!("sequence ({}bp): {}", seq.len(), sequence_to_string(&seq));
    Ok(())
}

///
/// Exhaustive longest simple path from a start node or to a finish node.
///
pub fn longest_cmd<P: AsRef<Path>>(
    path: P,
    start: Option<&str>,
    finish: Option<&str>,
    by_length: bool,
    k: usize,
) -> Result<(), DbgQuboError> {
    let sg = working_graph(path)?;
    let score = if by_length {
        PathScore::SeqLength { k }
    } else {
        PathScore::NodeCount
    };
    let best = match (start, finish) {
        (Some(s), Some(f)) => {
            search::longest_path_between(&sg, resolve(&sg, s)?, resolve(&sg, f)?, score)
        }
        (Some(name), None) => search::longest_path_from(&sg, resolve(&sg, name)?, score),
        (None, Some(name)) => search::longest_path_to(&sg, resolve(&sg, name)?, score),
        (None, None) => {
            // no anchor given: try every node as a start
            let mut best = Vec::new();
            let mut best_len = 0;
            for v in sg.node_indices() {
                let p = search::longest_path_from(&sg, v, score);
                let len = search::path_seq_length(&sg, &p, if by_length { k } else { 0 });
                let measure = if by_length { len } else { p.len() };
                if measure > best_len {
                    best_len = measure;
                    best = p;
                }
            }
            best
        }
    };
    println!("path ({} nodes): {}", best.len(), path_names(&sg, &best));
    let seq = search::reconstruct_path(&sg, &best, k)?;
    println!("sequence ({}bp): {}", seq.len(), sequence_to_string(&seq));
    Ok(())
}

///
/// Decompose the working graph at its bridge nodes and report the blocks.
///
pub fn decompose_cmd<P: AsRef<Path>>(path: P) -> Result<(), DbgQuboError> {
    let sg = working_graph(path)?;
    let decomposition = bridge::decompose(&sg)?;
    let summary = decomposition.summary(&sg);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

///
/// Interpret a solver bit vector: map set bits to edges, require the
/// induced subgraph to be a simple path, and reconstruct its sequence.
/// When the QUBO matrix artifact is supplied, the solution's energy is
/// reported as well.
///
pub fn interpret_cmd<P: AsRef<Path>>(
    path: P,
    bits_path: P,
    matrix: Option<P>,
    k: usize,
) -> Result<(), DbgQuboError> {
    let sg = working_graph(path)?;
    let register = EdgeRegister::from_graph(&sg);
    let bits = io::read_bits(bits_path)?;
    let edges = qubo::selected_edges(&bits, &register)?;
    info!("solution selects {} of {} edges", edges.len(), register.len());
    if let Some(matrix) = matrix {
        let q = io::read_qubo_json(matrix)?;
        println!("energy: {}", qubo::evaluate(&q, &bits)?);
    }
    let sub = qubo::solution_subgraph(&sg, &edges);
    let path_on_sub = search::linearize(&sub)?;
    println!("path: {}", path_names(&sub, &path_on_sub));
    let seq = search::reconstruct_path(&sub, &path_on_sub, k)?;
    println!("sequence ({}bp): {}", seq.len(), sequence_to_string(&seq));
    Ok(())
}
