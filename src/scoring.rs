use log::debug;

use crate::{AlignerError, SequenceId, GAP};

/// Dense substitution/gap score table over an alphabet plus the gap symbol.
///
/// Scores are kept in a flat `k * k` array where `k` is the alphabet size
/// plus one; the gap always takes the last index. Symbols are mapped to
/// indices through a byte lookup so scoring never hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringTable {
    symbols: Vec<u8>,
    lookup: [Option<usize>; 256],
    scores: Vec<i32>,
}

/// Builds the scoring table for `alphabet`.
///
/// Repeated symbols in `alphabet` are dropped after their first
/// occurrence. The gap symbol is added implicitly and must not appear in
/// `alphabet`.
pub fn build_scoring_table<I>(
    alphabet: I,
    diag_score: i32,
    off_diag_score: i32,
    dash_score: i32,
) -> Result<ScoringTable, AlignerError>
where
    I: IntoIterator<Item = u8>,
{
    let mut symbols = Vec::new();
    let mut lookup = [None; 256];

    for symbol in alphabet {
        if symbol == GAP {
            return Err(AlignerError::InvalidAlphabet { gap: GAP as char });
        }
        if lookup[symbol as usize].is_some() {
            debug!("Dropping duplicate alphabet symbol {:?}", symbol as char);
            continue;
        }
        lookup[symbol as usize] = Some(symbols.len());
        symbols.push(symbol);
    }
    lookup[GAP as usize] = Some(symbols.len());
    symbols.push(GAP);

    let size = symbols.len();
    let mut scores = vec![0; size * size];
    for (row, &a) in symbols.iter().enumerate() {
        for (col, &b) in symbols.iter().enumerate() {
            scores[row * size + col] = if a == GAP || b == GAP {
                dash_score
            } else if a == b {
                diag_score
            } else {
                off_diag_score
            };
        }
    }

    debug!(
        "Built {}x{} scoring table (diag={}, off_diag={}, dash={})",
        size, size, diag_score, off_diag_score, dash_score
    );

    Ok(ScoringTable {
        symbols,
        lookup,
        scores,
    })
}

impl ScoringTable {
    /// Alphabet symbols in index order, gap last.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.lookup[symbol as usize].is_some()
    }

    /// Score of the ordered pair `(a, b)`, or `None` if either symbol is unknown.
    pub fn score(&self, a: u8, b: u8) -> Option<i32> {
        let row = self.lookup[a as usize]?;
        let col = self.lookup[b as usize]?;
        Some(self.score_at(row, col))
    }

    /// Score of pairing `symbol` with a gap.
    pub fn gap_score(&self, symbol: u8) -> Option<i32> {
        self.score(symbol, GAP)
    }

    pub(crate) fn gap_index(&self) -> usize {
        self.symbols.len() - 1
    }

    #[inline(always)]
    pub(crate) fn score_at(&self, row: usize, col: usize) -> i32 {
        self.scores[row * self.symbols.len() + col]
    }

    /// Maps every symbol of `seq` to its table index.
    pub(crate) fn encode(&self, seq: &[u8], sequence: SequenceId) -> Result<Vec<usize>, AlignerError> {
        seq.iter()
            .enumerate()
            .map(|(position, &symbol)| {
                self.lookup[symbol as usize].ok_or(AlignerError::UnknownSymbol {
                    symbol: symbol as char,
                    sequence,
                    position,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustive_rule_check() {
        let table = build_scoring_table(b"ATCG".iter().copied(), 10, 2, -4).unwrap();
        let all = b"ATCG-";
        for &a in all {
            for &b in all {
                let expected = if a == b'-' || b == b'-' {
                    -4
                } else if a == b {
                    10
                } else {
                    2
                };
                assert_eq!(table.score(a, b), Some(expected), "pair ({}, {})", a as char, b as char);
            }
        }
    }

    #[test]
    fn gap_against_gap_uses_dash_score() {
        let table = build_scoring_table(b"AC".iter().copied(), 6, 2, -4).unwrap();
        assert_eq!(table.score(b'-', b'-'), Some(-4));
        assert_eq!(table.gap_score(b'A'), Some(-4));
    }

    #[test]
    fn gap_in_alphabet_is_rejected() {
        let err = build_scoring_table(b"AC-T".iter().copied(), 1, 0, -1).unwrap_err();
        assert_eq!(err, AlignerError::InvalidAlphabet { gap: '-' });
    }

    #[test]
    fn duplicates_are_dropped() {
        let table = build_scoring_table(b"AACGA".iter().copied(), 1, -1, -2).unwrap();
        assert_eq!(table.symbols(), b"ACG-");
        assert_eq!(table.score(b'A', b'A'), Some(1));
    }

    #[test]
    fn unknown_symbols() {
        let table = build_scoring_table(b"ACGT".iter().copied(), 1, -1, -2).unwrap();
        assert!(!table.contains(b'N'));
        assert_eq!(table.score(b'N', b'A'), None);

        let err = table.encode(b"ACNT", SequenceId::Y).unwrap_err();
        assert_eq!(
            err,
            AlignerError::UnknownSymbol {
                symbol: 'N',
                sequence: SequenceId::Y,
                position: 2
            }
        );
    }

    #[test]
    fn empty_alphabet_holds_only_gap() {
        let table = build_scoring_table(std::iter::empty(), 1, 0, -3).unwrap();
        assert_eq!(table.symbols(), b"-");
        assert_eq!(table.score(b'-', b'-'), Some(-3));
    }
}
