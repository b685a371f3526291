use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info};

use crate::config::AlignerConfig;
use crate::traceback::AlignmentResult;
use crate::{Aligner, AlignerError};

struct WorkItem {
    index: usize,
    seq_x: Vec<u8>,
    seq_y: Vec<u8>,
}

struct WorkResult {
    index: usize,
    result: Result<AlignmentResult, AlignerError>,
}

/// Pool of worker threads aligning independent sequence pairs.
pub struct BatchAligner {
    aligner: Arc<Aligner>,
    work_tx: Option<Sender<WorkItem>>,
    result_rx: Receiver<WorkResult>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl BatchAligner {
    pub fn new(config: &AlignerConfig) -> Result<Self, AlignerError> {
        let aligner = Arc::new(Aligner::new(config)?);
        let worker_count = config.workers();

        let (work_tx, work_rx) = bounded(worker_count.saturating_mul(2));
        let (result_tx, result_rx) = unbounded();

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let aligner = Arc::clone(&aligner);
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let worker = thread::Builder::new()
                .name(format!("aligner-{}", worker_id))
                .spawn(move || Self::worker(worker_id, aligner, work_rx, result_tx))
                .map_err(|e| AlignerError::WorkerError(e.to_string()))?;
            workers.push(worker);
        }
        info!("Started {} alignment workers", worker_count);

        Ok(Self {
            aligner,
            work_tx: Some(work_tx),
            result_rx,
            workers,
        })
    }

    pub fn aligner(&self) -> &Aligner {
        &self.aligner
    }

    fn worker(
        worker_id: usize,
        aligner: Arc<Aligner>,
        work_rx: Receiver<WorkItem>,
        result_tx: Sender<WorkResult>,
    ) {
        while let Ok(work) = work_rx.recv() {
            let result = guard_panics(worker_id, || aligner.align(&work.seq_x, &work.seq_y));
            if result_tx
                .send(WorkResult {
                    index: work.index,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
        debug!("Worker {} exiting", worker_id);
    }

    /// Aligns every pair and returns the results in input order.
    ///
    /// Fails with the error of the lowest-index pair that failed.
    pub fn align_parallel(
        &mut self,
        pairs: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> Result<Vec<AlignmentResult>, AlignerError> {
        let total = pairs.len();
        let work_tx = self
            .work_tx
            .as_ref()
            .ok_or_else(|| AlignerError::WorkerError("Work queue is closed".to_string()))?;

        // Workers never block on the unbounded result channel, so feeding
        // the bounded work queue up front cannot deadlock.
        for (index, (seq_x, seq_y)) in pairs.into_iter().enumerate() {
            work_tx
                .send(WorkItem {
                    index,
                    seq_x,
                    seq_y,
                })
                .map_err(|e| AlignerError::WorkerError(e.to_string()))?;
        }

        let mut slots: Vec<Option<Result<AlignmentResult, AlignerError>>> =
            (0..total).map(|_| None).collect();
        for _ in 0..total {
            let WorkResult { index, result } = self
                .result_rx
                .recv()
                .map_err(|e| AlignerError::WorkerError(e.to_string()))?;
            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(AlignerError::WorkerError("Missing alignment result".to_string()))
                })
            })
            .collect()
    }
}

impl Drop for BatchAligner {
    fn drop(&mut self) {
        // Closing the work queue stops the workers
        self.work_tx.take();

        while let Some(worker) = self.workers.pop() {
            if let Err(payload) = worker.join() {
                error!("Alignment worker panicked: {}", panic_message(&*payload));
            }
        }
        info!("Alignment workers stopped");
    }
}

/// Runs one alignment, turning a panic into a `WorkerError` so every
/// work item still produces a result.
fn guard_panics<F>(worker_id: usize, align: F) -> Result<AlignmentResult, AlignerError>
where
    F: FnOnce() -> Result<AlignmentResult, AlignerError>,
{
    panic::catch_unwind(AssertUnwindSafe(align)).unwrap_or_else(|payload| {
        let message = panic_message(&*payload);
        error!("Worker {} panicked: {}", worker_id, message);
        Err(AlignerError::WorkerError(format!(
            "Worker {} panicked: {}",
            worker_id, message
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_become_worker_errors() {
        let result = guard_panics(3, || panic!("matrix exploded"));
        assert_eq!(
            result,
            Err(AlignerError::WorkerError(
                "Worker 3 panicked: matrix exploded".to_string()
            ))
        );
    }

    #[test]
    fn errors_pass_through_unchanged() {
        let result = guard_panics(0, || Err(AlignerError::InvalidConfig("bad".to_string())));
        assert_eq!(result, Err(AlignerError::InvalidConfig("bad".to_string())));
    }

    #[test]
    fn panic_payload_messages() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*owned), "owned");
        let opaque: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(&*opaque), "unknown panic");
    }
}
