use std::fmt;

use log::debug;
use thiserror::Error;

pub mod alignment_mode;
pub mod batch;
pub mod config;
pub mod matrix;
pub mod scoring;
pub mod traceback;

pub use crate::alignment_mode::{AlignmentMode, AlignmentParams};
pub use crate::batch::BatchAligner;
pub use crate::config::AlignerConfig;
pub use crate::matrix::{compute_alignment_matrix, AlignmentMatrix};
pub use crate::scoring::{build_scoring_table, ScoringTable};
pub use crate::traceback::{
    compute_global_alignment, compute_local_alignment, AlignmentResult, Position,
    TracebackOperation,
};

/// Symbol used for gaps in aligned sequences.
pub const GAP: u8 = b'-';

// DNA scoring parameters
pub const DNA_ALPHABET: &[u8] = b"ACGT";
pub const DNA_MATCH: i32 = 10;
pub const DNA_MISMATCH: i32 = 2;
pub const DNA_GAP: i32 = -4;

/// Which of the two input sequences an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceId {
    X,
    Y,
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceId::X => write!(f, "seq_x"),
            SequenceId::Y => write!(f, "seq_y"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignerError {
    #[error("Alphabet must not contain the gap symbol {gap:?}")]
    InvalidAlphabet { gap: char },
    #[error("Unknown symbol {symbol:?} at position {position} of {sequence}")]
    UnknownSymbol {
        symbol: char,
        sequence: SequenceId,
        position: usize,
    },
    #[error("Alignment matrix is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("Score overflow while filling cell ({row}, {col})")]
    ScoreOverflow { row: usize, col: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Worker error: {0}")]
    WorkerError(String),
}

/// Scoring table bound to an alignment mode.
#[derive(Debug, Clone)]
pub struct Aligner {
    scoring_table: ScoringTable,
    mode: AlignmentMode,
}

impl Aligner {
    /// Builds the scoring table described by `config`.
    pub fn new(config: &AlignerConfig) -> Result<Self, AlignerError> {
        let params = config.params();
        let scoring_table = build_scoring_table(
            config.alphabet().iter().copied(),
            params.diag_score,
            params.off_diag_score,
            params.dash_score,
        )?;

        Ok(Self {
            scoring_table,
            mode: params.mode,
        })
    }

    /// Switches between global and local alignment.
    pub fn with_alignment_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn scoring_table(&self) -> &ScoringTable {
        &self.scoring_table
    }

    /// Fills the DP matrix for the configured mode.
    pub fn compute_matrix(&self, seq_x: &[u8], seq_y: &[u8]) -> Result<AlignmentMatrix, AlignerError> {
        compute_alignment_matrix(seq_x, seq_y, &self.scoring_table, self.mode)
    }

    /// Fills the matrix and runs the traceback matching the configured mode.
    pub fn align(&self, seq_x: &[u8], seq_y: &[u8]) -> Result<AlignmentResult, AlignerError> {
        debug!(
            "Aligning {} x {} symbols in {} mode",
            seq_x.len(),
            seq_y.len(),
            self.mode
        );
        let matrix = self.compute_matrix(seq_x, seq_y)?;

        match self.mode {
            AlignmentMode::Global => {
                compute_global_alignment(seq_x, seq_y, &self.scoring_table, &matrix)
            }
            AlignmentMode::Local => {
                compute_local_alignment(seq_x, seq_y, &self.scoring_table, &matrix)
            }
        }
    }
}
