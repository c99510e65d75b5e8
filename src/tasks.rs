use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use tracing::error;

/// Runs blocking work on short-lived worker threads and posts completion
/// messages back to the interface thread's queue.
///
/// The interface thread owns the matching `Receiver` and drains it once per
/// frame; workers never touch interface state themselves.
pub struct TaskRunner<T> {
    completions: Sender<T>,
}

impl<T: Send + 'static> TaskRunner<T> {
    pub fn new() -> (Self, Receiver<T>) {
        let (tx, rx) = channel();
        (Self { completions: tx }, rx)
    }

    /// Runs `task` off the interface thread. `on_complete` is posted once
    /// the task returns, including when it panics.
    pub fn run<F>(&self, task: F, on_complete: Option<T>)
    where
        F: FnOnce() + Send + 'static,
    {
        let completions = self.completions.clone();
        thread::spawn(move || {
            if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                error!("Background task panicked");
            }
            if let Some(message) = on_complete {
                // The receiver is gone only when the panel is shutting down.
                let _ = completions.send(message);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn completion_arrives_after_task() {
        let (runner, rx) = TaskRunner::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        runner.run(move || flag.store(true, Ordering::SeqCst), Some(7usize));

        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 7);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn completion_is_not_posted_before_task_finishes() {
        let (runner, rx) = TaskRunner::new();
        let (release_tx, release_rx) = channel::<()>();

        runner.run(
            move || {
                let _ = release_rx.recv();
            },
            Some("done"),
        );

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        release_tx.send(()).unwrap();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), "done");
    }

    #[test]
    fn panicking_task_still_completes() {
        let (runner, rx) = TaskRunner::new();
        runner.run(|| panic!("boom"), Some(1u8));
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 1);
    }

    #[test]
    fn no_completion_requested() {
        let (runner, rx) = TaskRunner::<u8>::new();
        let (done_tx, done_rx) = channel();
        runner.run(move || done_tx.send(()).unwrap(), None);

        done_rx.recv_timeout(WAIT).unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
