//!
//! Error type shared by all stages of the pipeline
//!
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

#[derive(Debug)]
pub enum DbgQuboError {
    /// A base outside {A,C,G,T} (case-insensitive) was found in a sequence
    InvalidSymbol(u8),

    /// A link sign was not '+' or '-'
    InvalidSign(String),

    /// A raw link token did not match `L:<sign>:<target>:<sign>`
    InvalidLink(String),

    /// Overlap length is larger than one of the sequences to stitch
    InvalidOverlap { k: usize, len: usize },

    /// The k-suffix of the accumulated sequence did not equal the k-prefix
    /// of the next sequence
    OverlapMismatch,

    /// Edge lookup on an edge that is not registered
    UnknownEdge(usize, usize),

    /// Register lookup with an index outside [0, len)
    IndexOutOfRange { index: usize, len: usize },

    /// A node name that does not exist in the working graph
    UnknownNode(String),

    /// A bridge node turned out to be shared by more than two blocks
    BridgeSharing { bridge: String, n_blocks: usize },

    /// The selected-edge subgraph is not a simple path
    NotASimplePath,

    /// Solver bit vector length differs from the register size
    SolutionSizeMismatch { expected: usize, actual: usize },

    /// A character other than '0'/'1' in a solver bit string
    InvalidBit(char),

    /// A persisted QUBO matrix whose rows do not form an n x n array
    MatrixShape { rows: usize },

    /// IO errors
    Io(io::Error),

    /// (De)serialization errors of matrix/summary artifacts
    Json(serde_json::Error),
}

impl Display for DbgQuboError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            DbgQuboError::InvalidSymbol(base) => {
                write!(f, "invalid nucleotide in sequence: {}", *base as char)
            }
            DbgQuboError::InvalidSign(sign) => write!(f, "invalid sign: {}", sign),
            DbgQuboError::InvalidLink(link) => write!(f, "invalid link format: {}", link),
            DbgQuboError::InvalidOverlap { k, len } => {
                write!(f, "overlap length k={} exceeds sequence length {}", k, len)
            }
            DbgQuboError::OverlapMismatch => {
                write!(f, "sequences do not overlap on the stitching region")
            }
            DbgQuboError::UnknownEdge(source, target) => {
                write!(f, "edge ({}, {}) is not registered", source, target)
            }
            DbgQuboError::IndexOutOfRange { index, len } => {
                write!(f, "edge index {} out of range (register size {})", index, len)
            }
            DbgQuboError::UnknownNode(name) => write!(f, "node {} not found in graph", name),
            DbgQuboError::BridgeSharing { bridge, n_blocks } => write!(
                f,
                "bridge {} is shared by {} blocks (expected at most two)",
                bridge, n_blocks
            ),
            DbgQuboError::NotASimplePath => write!(f, "graph is not a simple path"),
            DbgQuboError::SolutionSizeMismatch { expected, actual } => write!(
                f,
                "solution has {} bits but the register has {} edges",
                actual, expected
            ),
            DbgQuboError::InvalidBit(c) => write!(f, "invalid bit character: {}", c),
            DbgQuboError::MatrixShape { rows } => {
                write!(f, "matrix artifact is not square ({} rows)", rows)
            }
            DbgQuboError::Io(err) => write!(f, "io error: {}", err),
            DbgQuboError::Json(err) => write!(f, "json error: {}", err),
        }
    }
}

impl Error for DbgQuboError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DbgQuboError::Io(err) => Some(err),
            DbgQuboError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DbgQuboError {
    fn from(err: io::Error) -> Self {
        DbgQuboError::Io(err)
    }
}

impl From<serde_json::Error> for DbgQuboError {
    fn from(err: serde_json::Error) -> Self {
        DbgQuboError::Json(err)
    }
}
