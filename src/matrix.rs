use std::fmt;

use log::debug;

use crate::alignment_mode::AlignmentMode;
use crate::scoring::ScoringTable;
use crate::{AlignerError, SequenceId};

/// Row-major DP score matrix of `(len(seq_x) + 1) x (len(seq_y) + 1)` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    data: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl AlignmentMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    /// Builds a matrix from nested rows, e.g. a precomputed table.
    ///
    /// Every row must have the length of the first one.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, AlignerError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(height * width);
        for row in rows {
            if row.len() != width {
                return Err(AlignerError::DimensionMismatch {
                    rows: height,
                    cols: row.len(),
                    expected_rows: height,
                    expected_cols: width,
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            rows: height,
            cols: width,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        (0..self.rows).map(|row| self.row(row).to_vec()).collect()
    }

    pub(crate) fn check_dimensions(&self, len_x: usize, len_y: usize) -> Result<(), AlignerError> {
        if self.rows != len_x + 1 || self.cols != len_y + 1 {
            return Err(AlignerError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                expected_rows: len_x + 1,
                expected_cols: len_y + 1,
            });
        }
        Ok(())
    }
}

// Debug print: pipe-separated cells, one row per line.
impl fmt::Display for AlignmentMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for value in self.row(row) {
                write!(f, "{} | ", value)?;
            }
            writeln!(f)?;
            writeln!(f, "----------------")?;
        }
        Ok(())
    }
}

/// Fills the DP matrix for `seq_x` against `seq_y`.
///
/// In local mode every cell, including the first row and column, is
/// floored at zero.
pub fn compute_alignment_matrix(
    seq_x: &[u8],
    seq_y: &[u8],
    scoring_table: &ScoringTable,
    mode: AlignmentMode,
) -> Result<AlignmentMatrix, AlignerError> {
    let x = scoring_table.encode(seq_x, SequenceId::X)?;
    let y = scoring_table.encode(seq_y, SequenceId::Y)?;
    let gap = scoring_table.gap_index();

    let floor = |value: i32| match mode {
        AlignmentMode::Global => value,
        AlignmentMode::Local => value.max(0),
    };

    let mut matrix = AlignmentMatrix::new(x.len() + 1, y.len() + 1);
    debug!(
        "Filling {}x{} {} alignment matrix",
        matrix.rows(),
        matrix.cols(),
        mode
    );

    for i in 1..=x.len() {
        let value = add_score(matrix.get(i - 1, 0), scoring_table.score_at(x[i - 1], gap), i, 0)?;
        matrix.set(i, 0, floor(value));
    }
    for j in 1..=y.len() {
        let value = add_score(matrix.get(0, j - 1), scoring_table.score_at(gap, y[j - 1]), 0, j)?;
        matrix.set(0, j, floor(value));
    }

    for i in 1..=x.len() {
        for j in 1..=y.len() {
            let diagonal = add_score(
                matrix.get(i - 1, j - 1),
                scoring_table.score_at(x[i - 1], y[j - 1]),
                i,
                j,
            )?;
            let up = add_score(matrix.get(i - 1, j), scoring_table.score_at(x[i - 1], gap), i, j)?;
            let left = add_score(matrix.get(i, j - 1), scoring_table.score_at(gap, y[j - 1]), i, j)?;
            matrix.set(i, j, floor(diagonal.max(up).max(left)));
        }
    }

    Ok(matrix)
}

#[inline(always)]
fn add_score(value: i32, score: i32, row: usize, col: usize) -> Result<i32, AlignerError> {
    value
        .checked_add(score)
        .ok_or(AlignerError::ScoreOverflow { row, col })
}
