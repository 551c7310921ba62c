//!
//! Signed double-stranded assembly graph
//!
//! Nodes are segments, edges are signed strand-to-strand overlaps. Every
//! stored link (u, v, s1, s2) is paired with its mirror
//! (v, u, rev(s2), rev(s1)) so that both strands of the molecule are
//! represented. Parallel edges between the same segments are allowed as
//! long as they differ in their sign pair.
//!
use crate::common::{NodeIndex, Sequence};
use crate::error::DbgQuboError;
use fnv::FnvHashMap;
use log::warn;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use std::str::FromStr;

///
/// Strand orientation of a link endpoint
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// opposite sign
    pub fn reverse(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
    pub fn is_plus(self) -> bool {
        self == Sign::Plus
    }
}

impl FromStr for Sign {
    type Err = DbgQuboError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Sign::Plus),
            "-" => Ok(Sign::Minus),
            _ => Err(DbgQuboError::InvalidSign(s.to_string())),
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

///
/// A segment and its nucleotide sequence
///
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: String,
    pub seq: Sequence,
}

impl Segment {
    pub fn new(id: &str, seq: &[u8]) -> Self {
        Segment {
            id: id.to_string(),
            seq: seq.to_vec(),
        }
    }
}

///
/// One signed overlap stored as an edge weight
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedLink {
    pub sign_begin: Sign,
    pub sign_end: Sign,
}

impl SignedLink {
    pub fn new(sign_begin: Sign, sign_end: Sign) -> Self {
        SignedLink {
            sign_begin,
            sign_end,
        }
    }
    /// weight of the mirror edge (v, u)
    pub fn mirror(self) -> Self {
        SignedLink {
            sign_begin: self.sign_end.reverse(),
            sign_end: self.sign_begin.reverse(),
        }
    }
}

///
/// Parse a raw link token `L:<sign1>:<target>:<sign2>`
///
pub fn parse_link(link: &str) -> Result<(Sign, String, Sign), DbgQuboError> {
    let parts: Vec<&str> = link.trim().split(':').collect();
    if parts.len() != 4 || parts[0] != "L" {
        return Err(DbgQuboError::InvalidLink(link.to_string()));
    }
    let sign_begin = parts[1].parse()?;
    let sign_end = parts[3].parse()?;
    Ok((sign_begin, parts[2].to_string(), sign_end))
}

///
/// Signed multigraph over segments
///
#[derive(Debug, Clone, Default)]
pub struct SignedDbg {
    graph: DiGraph<Segment, SignedLink>,
    ids: FnvHashMap<String, NodeIndex>,
}

impl SignedDbg {
    pub fn new() -> Self {
        SignedDbg::default()
    }
    pub fn n_segments(&self) -> usize {
        self.graph.node_count()
    }
    pub fn n_links(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn node_of(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }
    pub fn segment(&self, node: NodeIndex) -> &Segment {
        self.graph.node_weight(node).unwrap()
    }
    ///
    /// iterate over stored links as (source, target, link)
    ///
    pub fn links(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, SignedLink)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
    }
    pub fn segments(&self) -> impl Iterator<Item = (NodeIndex, &Segment)> + '_ {
        self.graph
            .node_indices()
            .map(move |v| (v, self.segment(v)))
    }

    ///
    /// Add a segment. Returns the existing node when the id is already
    /// known (a link may have created it with an empty sequence; the
    /// sequence is then filled in).
    ///
    pub fn add_segment(&mut self, id: &str, seq: &[u8]) -> NodeIndex {
        match self.ids.get(id) {
            Some(&node) => {
                let segment = self.graph.node_weight_mut(node).unwrap();
                if segment.seq.is_empty() {
                    segment.seq = seq.to_vec();
                }
                node
            }
            None => {
                let node = self.graph.add_node(Segment::new(id, seq));
                self.ids.insert(id.to_string(), node);
                node
            }
        }
    }

    fn node_or_create(&mut self, id: &str) -> NodeIndex {
        match self.ids.get(id) {
            Some(&node) => node,
            None => {
                warn!("segment {} referenced by a link but never declared", id);
                self.add_segment(id, b"")
            }
        }
    }

    ///
    /// true if a link with exactly this sign pair is stored between the
    /// two segments
    ///
    pub fn has_link(&self, v1: NodeIndex, v2: NodeIndex, link: SignedLink) -> bool {
        self.graph
            .edges_connecting(v1, v2)
            .any(|e| *e.weight() == link)
    }

    ///
    /// Insert a link v1 -> v2 together with its mirror v2 -> v1.
    ///
    /// Both edges are added in the same call so the double-stranded
    /// symmetry invariant holds after every insertion. Returns false when
    /// a link with the same sign pair is already stored (its mirror is
    /// then present as well).
    ///
    pub fn add_link(&mut self, id1: &str, id2: &str, sign_begin: Sign, sign_end: Sign) -> bool {
        let v1 = self.node_or_create(id1);
        let v2 = self.node_or_create(id2);
        let link = SignedLink::new(sign_begin, sign_end);
        if self.has_link(v1, v2, link) {
            return false;
        }
        self.graph.add_edge(v1, v2, link);
        self.graph.add_edge(v2, v1, link.mirror());
        true
    }

    ///
    /// Symmetry invariant: every stored link has its mirror stored too.
    ///
    pub fn is_mirror_symmetric(&self) -> bool {
        self.links()
            .all(|(v1, v2, link)| self.has_link(v2, v1, link.mirror()))
    }
}

//
// tests
//
