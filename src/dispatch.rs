//! Foreground dispatchers: where completion callbacks run.
//!
//! The callback API finishes each operation on the background runtime, then
//! hands the callback to a [`Dispatcher`]. Pick one per application:
//!
//! - a [`tokio::runtime::Handle`]: the callback becomes a task on that runtime
//! - [`Inline`]: the callback runs right away on the background task
//! - [`ForegroundQueue`]: the callback is queued until the owning loop (a UI
//!   thread, a game loop...) drains it with [`ForegroundLoop`]

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

/// A completion callback ready to run.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs completion callbacks on some execution context.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, task: Task);
}

impl Dispatcher for Handle {
    fn dispatch(&self, task: Task) {
        self.spawn(async move { task() });
    }
}

/// Runs the callback immediately, on whatever thread finished the operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Dispatcher for Inline {
    fn dispatch(&self, task: Task) {
        task();
    }
}

/// Sending half: queues callbacks for a [`ForegroundLoop`].
#[derive(Debug, Clone)]
pub struct ForegroundQueue {
    tx: mpsc::UnboundedSender<Task>,
}

/// Receiving half: runs queued callbacks on the thread that owns it.
#[derive(Debug)]
pub struct ForegroundLoop {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl ForegroundQueue {
    pub fn new() -> (ForegroundQueue, ForegroundLoop) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ForegroundQueue { tx }, ForegroundLoop { rx })
    }
}

impl Dispatcher for ForegroundQueue {
    fn dispatch(&self, task: Task) {
        if self.tx.send(task).is_err() {
            debug!("foreground loop is gone, dropping callback");
        }
    }
}

impl ForegroundLoop {
    /// Run every callback queued so far. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait for the next callback and run it.
    ///
    /// Returns false once every [`ForegroundQueue`] (including the engine's)
    /// has been dropped and the queue is empty.
    pub async fn next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}
