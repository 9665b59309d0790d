use std::path::Path;

use crate::codec;

/// Candidate delimiters, in tie-break order.
pub const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Delimiter assumed when detection finds nothing to go on.
pub const DEFAULT_DELIMITER: char = ',';

/// Lines at or beyond this many characters are excluded from the vote so a
/// single pathological line cannot dominate it.
const MAX_VOTED_LINE_LEN: usize = 1000;

/// Picks the most frequent candidate delimiter in `content`.
///
/// This is an occurrence vote, not a grammar-aware sniff: quoted fields
/// containing delimiter characters are counted like any other text and can
/// skew the result. Ties go to the earlier candidate; content in which no
/// candidate appears yields `,`.
pub fn sniff(content: &str) -> char {
    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    for line in content.lines() {
        if line.chars().take(MAX_VOTED_LINE_LEN).count() >= MAX_VOTED_LINE_LEN {
            continue;
        }
        for (slot, candidate) in DELIMITER_CANDIDATES.iter().enumerate() {
            counts[slot] += line.matches(*candidate).count();
        }
    }
    let mut best = 0;
    for slot in 1..counts.len() {
        if counts[slot] > counts[best] {
            best = slot;
        }
    }
    if counts[best] == 0 {
        DEFAULT_DELIMITER
    } else {
        DELIMITER_CANDIDATES[best]
    }
}

/// Sniffs the file at `path`, falling back to the default delimiter when the
/// file cannot be read.
pub fn sniff_file(path: &Path) -> char {
    match codec::read_file_text(path) {
        Ok(content) => sniff(&content),
        Err(_) => DEFAULT_DELIMITER,
    }
}
