//!
//! Record parsing and artifact IO
//!
//! Input records are GFA-like: a header line marked with `>` carrying the
//! segment id, an `LN:`-tagged length field and zero or more
//! `L:<sign>:<target>:<sign>` link tokens, followed by one sequence line.
//! Records without a length field are skipped with a diagnostic;
//! malformed link tokens are skipped per-link. The build itself never
//! fails on bad input lines.
//!
use crate::common::Sequence;
use crate::error::DbgQuboError;
use crate::signed::{parse_link, SignedDbg};
use log::{info, warn};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

///
/// One parsed segment record
///
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRecord {
    pub id: String,
    pub seq: Sequence,
    pub links: Vec<String>,
}

/// trailing integer of an `LN:` token, e.g. `LN:i:5` or `LN:5`
fn parse_length_field(token: &str) -> Option<usize> {
    let digits: String = token
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

///
/// Parse segment records from text. Lines that are neither a valid
/// header nor the sequence line following one are ignored.
///
pub fn parse_records(text: &str) -> Vec<SegmentRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if !line.starts_with('>') {
            i += 1;
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let length = parts
            .iter()
            .find(|p| p.starts_with("LN:"))
            .and_then(|p| parse_length_field(p));
        if length.is_none() {
            warn!("header line without LN field skipped: {}", line);
            i += 1;
            continue;
        }
        let id = parts[0][1..].to_string();
        let links: Vec<String> = parts
            .iter()
            .filter(|p| p.starts_with("L:"))
            .map(|p| p.to_string())
            .collect();
        let seq: Sequence = if i + 1 < lines.len() {
            lines[i + 1].trim().as_bytes().to_vec()
        } else {
            Vec::new()
        };
        records.push(SegmentRecord { id, seq, links });
        i += 2;
    }
    records
}

///
/// Build the signed graph from records: all segments first, then links,
/// so that link order between records does not matter. Invalid link
/// tokens are diagnosed and skipped.
///
pub fn signed_dbg_from_records(records: &[SegmentRecord]) -> SignedDbg {
    let mut dbg = SignedDbg::new();
    for record in records {
        dbg.add_segment(&record.id, &record.seq);
    }
    for record in records {
        for link in &record.links {
            match parse_link(link) {
                Ok((sign_begin, target, sign_end)) => {
                    dbg.add_link(&record.id, &target, sign_begin, sign_end);
                }
                Err(err) => warn!("skipping invalid link '{}': {}", link, err),
            }
        }
    }
    info!(
        "signed graph built: {} segments, {} links",
        dbg.n_segments(),
        dbg.n_links()
    );
    dbg
}

pub fn signed_dbg_from_str(text: &str) -> SignedDbg {
    signed_dbg_from_records(&parse_records(text))
}

pub fn signed_dbg_from_file<P: AsRef<Path>>(path: P) -> Result<SignedDbg, DbgQuboError> {
    let mut text = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut text)?;
    Ok(signed_dbg_from_str(&text))
}

///
/// Persist a QUBO matrix as a plain JSON array of rows, readable by any
/// external solver frontend.
///
pub fn write_qubo_json<P: AsRef<Path>>(path: P, q: &Array2<f64>) -> Result<(), DbgQuboError> {
    let rows: Vec<Vec<f64>> = q.outer_iter().map(|row| row.to_vec()).collect();
    let file = File::create(path)?;
    serde_json::to_writer(file, &rows)?;
    Ok(())
}

///
/// Read a QUBO matrix back from its JSON artifact.
///
pub fn read_qubo_json<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, DbgQuboError> {
    let rows: Vec<Vec<f64>> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let n = rows.len();
    if rows.iter().any(|row| row.len() != n) {
        return Err(DbgQuboError::MatrixShape { rows: n });
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n, n), flat).map_err(|_| DbgQuboError::MatrixShape { rows: n })
}

///
/// Read a solver bit string (a line of 0/1 characters; whitespace is
/// ignored).
///
pub fn read_bits<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, DbgQuboError> {
    let mut bits = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        for c in line?.chars() {
            match c {
                '0' => bits.push(0),
                '1' => bits.push(1),
                c if c.is_whitespace() => {}
                c => return Err(DbgQuboError::InvalidBit(c)),
            }
        }
    }
    Ok(bits)
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = "\
>S1 LN:i:5 L:+:S2:+
AAAGT
>S2 LN:i:5
AGTTC
";

    #[test]
    fn parse_example_records() {
        let records = parse_records(EXAMPLE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "S1");
        assert_eq!(records[0].seq, b"AAAGT".to_vec());
        assert_eq!(records[0].links, vec!["L:+:S2:+".to_string()]);
        assert_eq!(records[1].links.len(), 0);
    }

    #[test]
    fn record_without_length_field_is_skipped() {
        let text = ">S1 L:+:S2:+\nAAAGT\n>S2 LN:i:5\nAGTTC\n";
        let records = parse_records(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "S2");
    }

    #[test]
    fn length_field_variants() {
        assert_eq!(parse_length_field("LN:i:15"), Some(15));
        assert_eq!(parse_length_field("LN:7"), Some(7));
        assert_eq!(parse_length_field("LN:"), None);
    }

    #[test]
    fn malformed_links_do_not_abort_the_build() {
        let text = ">S1 LN:i:5 L:+:S2 L:*:S2:+ L:+:S2:+\nAAAGT\n>S2 LN:i:5\nAGTTC\n";
        let dbg = signed_dbg_from_str(text);
        assert_eq!(dbg.n_segments(), 2);
        // only the well-formed link survives, stored with its mirror
        assert_eq!(dbg.n_links(), 2);
        assert!(dbg.is_mirror_symmetric());
    }

    #[test]
    fn example_builds_signed_pair() {
        let dbg = signed_dbg_from_str(EXAMPLE);
        assert_eq!(dbg.n_segments(), 2);
        assert_eq!(dbg.n_links(), 2);
    }

    #[test]
    fn qubo_matrix_roundtrip() {
        let q = ndarray::arr2(&[[1.0, -10.0], [-10.0, 1.0]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        write_qubo_json(&path, &q).unwrap();
        let q2 = read_qubo_json(&path).unwrap();
        assert_eq!(q, q2);
    }

    #[test]
    fn bits_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bits.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "10 1").unwrap();
        writeln!(file, "01").unwrap();
        drop(file);
        assert_eq!(read_bits(&path).unwrap(), vec![1, 0, 1, 0, 1]);

        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "102").unwrap();
        match read_bits(&bad) {
            Err(DbgQuboError::InvalidBit('2')) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }
}
