//! Background job polling for the GUI thread.
//!
//! A job is a worker running off-thread; the GUI polls it once per frame. A
//! worker that dies without reporting resolves to an error, so a polled job
//! always settles.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Handle to a background task producing one result.
pub struct AsyncJob<T> {
    receiver: Receiver<Result<T>>,
    done: bool,
}

impl<T> AsyncJob<T> {
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver,
            done: false,
        }
    }

    /// Non-blocking poll. Returns `Some(result)` exactly once when the worker
    /// settles; `None` while it is still running or after it settled.
    pub fn poll(&mut self) -> Option<Result<T>> {
        if self.done {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.done = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                Some(Err(anyhow!("Worker task disconnected")))
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_poll_settles_once() {
        let (tx, rx) = mpsc::channel();
        let mut job: AsyncJob<u32> = AsyncJob::new(rx);

        assert!(job.poll().is_none());
        tx.send(Ok(7)).unwrap();

        let result = job.poll().unwrap();
        assert_eq!(result.unwrap(), 7);
        assert!(job.poll().is_none());
        assert!(!job.is_running());
    }

    #[test]
    fn test_dropped_worker_settles_with_error() {
        let (tx, rx) = mpsc::channel::<Result<u32>>();
        let mut job = AsyncJob::new(rx);
        drop(tx);

        let result = job.poll().unwrap();
        assert!(result.is_err());
        assert!(!job.is_running());
    }
}
