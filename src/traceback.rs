use log::{debug, trace};

use crate::matrix::AlignmentMatrix;
use crate::scoring::ScoringTable;
use crate::{AlignerError, SequenceId, GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Gap in `aligned_x`.
    Insertion,
    /// Gap in `aligned_y`.
    Deletion,
}

/// Matrix cell, expressed as prefix lengths of `seq_x` and `seq_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: i32,
    pub aligned_x: Vec<u8>,
    pub aligned_y: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
    /// Cell where the traceback stopped.
    pub start_position: Position,
    /// Cell where the traceback began.
    pub end_position: Position,
}

impl AlignmentResult {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn matches(&self) -> usize {
        self.count(TracebackOperation::Match)
    }

    pub fn mismatches(&self) -> usize {
        self.count(TracebackOperation::Mismatch)
    }

    pub fn gaps(&self) -> usize {
        self.count(TracebackOperation::Insertion) + self.count(TracebackOperation::Deletion)
    }

    /// Fraction of alignment columns that are matches.
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.matches() as f64 / self.len() as f64
    }

    pub fn aligned_strings(&self) -> (String, String) {
        (
            String::from_utf8_lossy(&self.aligned_x).into_owned(),
            String::from_utf8_lossy(&self.aligned_y).into_owned(),
        )
    }

    fn count(&self, op: TracebackOperation) -> usize {
        self.operations.iter().filter(|&&o| o == op).count()
    }
}

/// Backward walk over a filled matrix.
///
/// Output columns are pushed in reverse and flipped once in `finish`.
struct Traceback<'a> {
    seq_x: &'a [u8],
    seq_y: &'a [u8],
    x: Vec<usize>,
    y: Vec<usize>,
    scoring_table: &'a ScoringTable,
    matrix: &'a AlignmentMatrix,
    current: Position,
    aligned_x: Vec<u8>,
    aligned_y: Vec<u8>,
    operations: Vec<TracebackOperation>,
}

impl<'a> Traceback<'a> {
    fn new(
        seq_x: &'a [u8],
        seq_y: &'a [u8],
        scoring_table: &'a ScoringTable,
        matrix: &'a AlignmentMatrix,
        from: Position,
    ) -> Result<Self, AlignerError> {
        matrix.check_dimensions(seq_x.len(), seq_y.len())?;
        let x = scoring_table.encode(seq_x, SequenceId::X)?;
        let y = scoring_table.encode(seq_y, SequenceId::Y)?;
        let capacity = from.i + from.j;
        Ok(Self {
            seq_x,
            seq_y,
            x,
            y,
            scoring_table,
            matrix,
            current: from,
            aligned_x: Vec::with_capacity(capacity),
            aligned_y: Vec::with_capacity(capacity),
            operations: Vec::with_capacity(capacity),
        })
    }

    fn value(&self) -> i32 {
        self.matrix.get(self.current.i, self.current.j)
    }

    fn at_zero(&self) -> bool {
        self.value() == 0
    }

    // Diagonal first, then up, then left; the order picks among tied optima.
    fn step(&mut self) {
        let Position { i, j } = self.current;
        let table = self.scoring_table;
        let value = self.value();

        if leads_to(value, self.matrix.get(i - 1, j - 1), table.score_at(self.x[i - 1], self.y[j - 1])) {
            self.take_both();
        } else if leads_to(value, self.matrix.get(i - 1, j), table.score_at(self.x[i - 1], table.gap_index())) {
            self.take_x();
        } else {
            self.take_y();
        }
    }

    fn take_both(&mut self) {
        let Position { i, j } = self.current;
        let (a, b) = (self.seq_x[i - 1], self.seq_y[j - 1]);
        trace!("({}, {}) diagonal {}/{}", i, j, a as char, b as char);
        self.aligned_x.push(a);
        self.aligned_y.push(b);
        self.operations.push(if a == b {
            TracebackOperation::Match
        } else {
            TracebackOperation::Mismatch
        });
        self.current = Position { i: i - 1, j: j - 1 };
    }

    fn take_x(&mut self) {
        let Position { i, j } = self.current;
        trace!("({}, {}) up", i, j);
        self.aligned_x.push(self.seq_x[i - 1]);
        self.aligned_y.push(GAP);
        self.operations.push(TracebackOperation::Deletion);
        self.current.i -= 1;
    }

    fn take_y(&mut self) {
        let Position { i, j } = self.current;
        trace!("({}, {}) left", i, j);
        self.aligned_x.push(GAP);
        self.aligned_y.push(self.seq_y[j - 1]);
        self.operations.push(TracebackOperation::Insertion);
        self.current.j -= 1;
    }

    fn finish(mut self, score: i32, end: Position) -> AlignmentResult {
        self.aligned_x.reverse();
        self.aligned_y.reverse();
        self.operations.reverse();
        debug!(
            "Traceback from ({}, {}) stopped at ({}, {}), score {}",
            end.i, end.j, self.current.i, self.current.j, score
        );

        AlignmentResult {
            score,
            aligned_x: self.aligned_x,
            aligned_y: self.aligned_y,
            operations: self.operations,
            start_position: self.current,
            end_position: end,
        }
    }
}

/// Reconstructs an optimal global alignment from a matrix filled in global mode.
pub fn compute_global_alignment(
    seq_x: &[u8],
    seq_y: &[u8],
    scoring_table: &ScoringTable,
    alignment_matrix: &AlignmentMatrix,
) -> Result<AlignmentResult, AlignerError> {
    let end = Position {
        i: seq_x.len(),
        j: seq_y.len(),
    };
    let mut traceback = Traceback::new(seq_x, seq_y, scoring_table, alignment_matrix, end)?;
    let score = traceback.value();

    while traceback.current.i > 0 && traceback.current.j > 0 {
        traceback.step();
    }
    while traceback.current.i > 0 {
        traceback.take_x();
    }
    while traceback.current.j > 0 {
        traceback.take_y();
    }

    Ok(traceback.finish(score, end))
}

/// Reconstructs an optimal local alignment from a matrix filled in local mode.
///
/// The walk starts at the first maximal cell in row-major order and stops
/// at the first zero cell. A matrix without positive cells yields an empty
/// alignment with score zero.
pub fn compute_local_alignment(
    seq_x: &[u8],
    seq_y: &[u8],
    scoring_table: &ScoringTable,
    alignment_matrix: &AlignmentMatrix,
) -> Result<AlignmentResult, AlignerError> {
    alignment_matrix.check_dimensions(seq_x.len(), seq_y.len())?;
    let (score, end) = best_local_cell(alignment_matrix);
    let mut traceback = Traceback::new(seq_x, seq_y, scoring_table, alignment_matrix, end)?;

    while traceback.current.i > 0 && traceback.current.j > 0 && !traceback.at_zero() {
        traceback.step();
    }
    while traceback.current.i > 0 && !traceback.at_zero() {
        traceback.take_x();
    }
    while traceback.current.j > 0 && !traceback.at_zero() {
        traceback.take_y();
    }

    Ok(traceback.finish(score, end))
}

// Widened so predecessor sums never wrap.
#[inline(always)]
fn leads_to(value: i32, predecessor: i32, score: i32) -> bool {
    i64::from(predecessor) + i64::from(score) == i64::from(value)
}

fn best_local_cell(matrix: &AlignmentMatrix) -> (i32, Position) {
    let mut best = (0, Position::default());
    for i in 0..matrix.rows() {
        for (j, &value) in matrix.row(i).iter().enumerate() {
            if value > best.0 {
                best = (value, Position { i, j });
            }
        }
    }
    best
}
