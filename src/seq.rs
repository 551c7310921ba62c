//!
//! Elementary sequence operations: reverse complement and k-overlap stitching
//!
use crate::common::Sequence;
use crate::error::DbgQuboError;

///
/// complement of a single base, uppercased
///
pub fn complement(base: u8) -> Result<u8, DbgQuboError> {
    match base {
        b'A' | b'a' => Ok(b'T'),
        b'T' | b't' => Ok(b'A'),
        b'C' | b'c' => Ok(b'G'),
        b'G' | b'g' => Ok(b'C'),
        _ => Err(DbgQuboError::InvalidSymbol(base)),
    }
}

///
/// reverse complement of a sequence
///
pub fn revcomp(seq: &[u8]) -> Result<Sequence, DbgQuboError> {
    seq.iter().rev().map(|&base| complement(base)).collect()
}

///
/// Append `next` to `acc`, overlapping on k bases.
///
/// The k-suffix of `acc` must equal the k-prefix of `next`, otherwise
/// stitching fails with `OverlapMismatch`. An empty `acc` starts the
/// sequence with `next` as-is.
///
pub fn stitch(mut acc: Sequence, next: &[u8], k: usize) -> Result<Sequence, DbgQuboError> {
    if acc.is_empty() {
        return Ok(next.to_vec());
    }
    if k > acc.len() {
        return Err(DbgQuboError::InvalidOverlap { k, len: acc.len() });
    }
    if k > next.len() {
        return Err(DbgQuboError::InvalidOverlap { k, len: next.len() });
    }
    if acc[acc.len() - k..] != next[..k] {
        return Err(DbgQuboError::OverlapMismatch);
    }
    acc.truncate(acc.len() - k);
    acc.extend_from_slice(next);
    Ok(acc)
}

///
/// Fold `stitch` over sequences of a path.
///
/// For m sequences of lengths L1..Lm with consistent k-overlaps the result
/// has length L1 + sum(Li - k).
///
pub fn reconstruct<'a, I>(seqs: I, k: usize) -> Result<Sequence, DbgQuboError>
where
    I: IntoIterator<Item = &'a Sequence>,
{
    let mut acc = Sequence::new();
    for seq in seqs {
        acc = stitch(acc, seq, k)?;
    }
    Ok(acc)
}

//
// tests
//
