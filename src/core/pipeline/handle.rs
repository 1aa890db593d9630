//! Handles to tasks running on a background thread.

use super::CancellationToken;
use std::panic;
use std::thread::JoinHandle;

/// A task running on its own thread
pub struct TaskHandle<T> {
    cancel: CancellationToken,
    join: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(cancel: CancellationToken, join: JoinHandle<T>) -> Self {
        Self { cancel, join }
    }

    /// Ask the task to stop; it returns its partial result soon after
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task's result.
    ///
    /// A panic inside the task is resumed on the calling thread.
    pub fn join(self) -> T {
        match self.join.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn stop_reaches_the_task() {
        let cancel = CancellationToken::new();
        let seen = cancel.clone();
        let handle = TaskHandle::new(
            cancel,
            thread::spawn(move || {
                while !seen.is_cancelled() {
                    thread::sleep(Duration::from_millis(1));
                }
                "stopped"
            }),
        );

        handle.stop();
        assert_eq!(handle.join(), "stopped");
    }

    #[test]
    fn finished_task_reports_finished() {
        let handle = TaskHandle::new(CancellationToken::new(), thread::spawn(|| 42));

        while !handle.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(handle.join(), 42);
    }
}
