use std::num::NonZeroUsize;
use std::thread;

use crate::alignment_mode::{AlignmentMode, AlignmentParams};
use crate::{AlignerError, DNA_ALPHABET};

pub const MAX_WORKERS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerConfig {
    alphabet: Vec<u8>,
    params: AlignmentParams,
    workers: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            alphabet: DNA_ALPHABET.to_vec(),
            params: AlignmentParams::default(),
            workers: thread::available_parallelism()
                .map_or(1, NonZeroUsize::get)
                .min(MAX_WORKERS),
        }
    }
}

impl AlignerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alphabet(mut self, alphabet: &[u8]) -> Self {
        self.alphabet = alphabet.to_vec();
        self
    }

    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.params.mode = mode;
        self
    }

    pub fn with_scores(mut self, diag_score: i32, off_diag_score: i32, dash_score: i32) -> Self {
        self.params.diag_score = diag_score;
        self.params.off_diag_score = off_diag_score;
        self.params.dash_score = dash_score;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Result<Self, AlignerError> {
        if workers == 0 {
            return Err(AlignerError::InvalidConfig(
                "Worker count must be at least 1".to_string(),
            ));
        }
        if workers > MAX_WORKERS {
            return Err(AlignerError::InvalidConfig(format!(
                "Worker count cannot be greater than {}",
                MAX_WORKERS
            )));
        }
        self.workers = workers;
        Ok(self)
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn params(&self) -> AlignmentParams {
        self.params
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = AlignerConfig::new()
            .with_alphabet(b"ACGU")
            .with_mode(AlignmentMode::Local)
            .with_scores(5, -3, -4)
            .with_workers(2)
            .unwrap();

        assert_eq!(config.alphabet(), b"ACGU");
        assert_eq!(config.params().mode, AlignmentMode::Local);
        assert_eq!(config.params().diag_score, 5);
        assert_eq!(config.params().off_diag_score, -3);
        assert_eq!(config.params().dash_score, -4);
        assert_eq!(config.workers(), 2);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = AlignerConfig::new().with_workers(0).unwrap_err();
        assert!(matches!(err, AlignerError::InvalidConfig(_)));
    }

    #[test]
    fn oversized_worker_count_is_rejected() {
        let err = AlignerConfig::new().with_workers(usize::MAX).unwrap_err();
        assert!(matches!(err, AlignerError::InvalidConfig(_)));
        assert_eq!(AlignerConfig::new().with_workers(MAX_WORKERS).unwrap().workers(), MAX_WORKERS);
    }

    #[test]
    fn default_has_at_least_one_worker() {
        assert!(AlignerConfig::default().workers() >= 1);
        assert_eq!(AlignerConfig::default().alphabet(), b"ACGT");
    }
}
