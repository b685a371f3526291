use std::fmt;

use crate::{DNA_GAP, DNA_MATCH, DNA_MISMATCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentMode {
    Global, // Needleman-Wunsch
    Local,  // Smith-Waterman
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentMode::Global => write!(f, "global"),
            AlignmentMode::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentParams {
    pub mode: AlignmentMode,
    pub diag_score: i32,
    pub off_diag_score: i32,
    pub dash_score: i32,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Global,
            diag_score: DNA_MATCH,
            off_diag_score: DNA_MISMATCH,
            dash_score: DNA_GAP,
        }
    }
}
