//! Running closures on the frame thread.
//!
//! Other threads hold an [`Invoker`] and hand it closures. The frame thread
//! owns the matching [`InvokeQueue`] and drains it once per frame, before
//! input dispatch, so invoked work never overlaps a frame phase.
//!
//! ```
//! use std::thread;
//! use trellis::geometry::Size;
//! use trellis::invoke::InvokeQueue;
//! use trellis::tree::UiTree;
//!
//! let mut tree = UiTree::new(Size::new(10, 10));
//! let mut queue = InvokeQueue::new();
//! let invoker = queue.invoker();
//!
//! let worker = thread::spawn(move || {
//!     invoker.invoke(|tree| tree.set_viewport(Size::new(40, 20)))
//! });
//! while !worker.is_finished() {
//!     queue.drain(&mut tree);
//! }
//! worker.join().unwrap().unwrap();
//! assert_eq!(tree.viewport(), Size::new(40, 20));
//! ```

use std::thread::{self, ThreadId};

use tokio::sync::{mpsc, oneshot};

use crate::error::{Result, TrellisError};
use crate::tree::UiTree;

type Action = Box<dyn FnOnce(&mut UiTree) + Send>;

struct Job {
    action: Action,
    done: Option<oneshot::Sender<()>>,
}

/// Sending half. Cheap to clone and safe to move to other threads.
#[derive(Clone)]
pub struct Invoker {
    sender: mpsc::UnboundedSender<Job>,
    frame_thread: ThreadId,
}

impl Invoker {
    /// Queue `action` and block until the frame thread has run it.
    ///
    /// Must not be called from the frame thread itself, nor from inside an
    /// async runtime (use [`invoke_async`](Self::invoke_async) there).
    pub fn invoke(&self, action: impl FnOnce(&mut UiTree) + Send + 'static) -> Result<()> {
        if thread::current().id() == self.frame_thread {
            return Err(TrellisError::InvalidOperation(
                "invoke from the frame thread would never complete".into(),
            ));
        }
        let done = self.enqueue(Box::new(action), true)?;
        match done {
            Some(done) => done.blocking_recv().map_err(|_| TrellisError::InvokeClosed),
            None => Ok(()),
        }
    }

    /// Queue `action` and wait for it without blocking the calling thread.
    pub async fn invoke_async(&self, action: impl FnOnce(&mut UiTree) + Send + 'static) -> Result<()> {
        let done = self.enqueue(Box::new(action), true)?;
        match done {
            Some(done) => done.await.map_err(|_| TrellisError::InvokeClosed),
            None => Ok(()),
        }
    }

    /// Queue `action` without waiting for it.
    pub fn post(&self, action: impl FnOnce(&mut UiTree) + Send + 'static) -> Result<()> {
        self.enqueue(Box::new(action), false).map(|_| ())
    }

    fn enqueue(&self, action: Action, wait: bool) -> Result<Option<oneshot::Receiver<()>>> {
        let (done, receiver) = if wait {
            let (sender, receiver) = oneshot::channel();
            (Some(sender), Some(receiver))
        } else {
            (None, None)
        };
        self.sender
            .send(Job { action, done })
            .map_err(|_| TrellisError::InvokeClosed)?;
        Ok(receiver)
    }
}

/// Receiving half, owned by the frame thread.
pub struct InvokeQueue {
    receiver: mpsc::UnboundedReceiver<Job>,
    sender: mpsc::UnboundedSender<Job>,
    frame_thread: ThreadId,
}

impl InvokeQueue {
    /// Create a queue bound to the calling thread.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            receiver,
            sender,
            frame_thread: thread::current().id(),
        }
    }

    pub fn invoker(&self) -> Invoker {
        Invoker {
            sender: self.sender.clone(),
            frame_thread: self.frame_thread,
        }
    }

    /// Run every queued closure in arrival order. Returns how many ran.
    pub fn drain(&mut self, tree: &mut UiTree) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            (job.action)(tree);
            if let Some(done) = job.done {
                // The caller may have given up waiting.
                let _ = done.send(());
            }
            ran += 1;
        }
        if ran > 0 {
            log::trace!("ran {} invoked closures", ran);
        }
        ran
    }
}

impl Default for InvokeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn test_post_runs_in_order_on_drain() {
        let mut tree = UiTree::new(Size::new(10, 10));
        let mut queue = InvokeQueue::new();
        let invoker = queue.invoker();
        invoker.post(|tree| tree.set_viewport(Size::new(1, 1))).unwrap();
        invoker.post(|tree| tree.set_viewport(Size::new(2, 2))).unwrap();
        assert_eq!(tree.viewport(), Size::new(10, 10));

        assert_eq!(queue.drain(&mut tree), 2);
        assert_eq!(tree.viewport(), Size::new(2, 2));
        assert_eq!(queue.drain(&mut tree), 0);
    }

    #[test]
    fn test_invoke_on_frame_thread_is_rejected() {
        let queue = InvokeQueue::new();
        let result = queue.invoker().invoke(|_| {});
        assert!(matches!(result, Err(TrellisError::InvalidOperation(_))));
    }

    #[test]
    fn test_invoke_after_queue_dropped() {
        let queue = InvokeQueue::new();
        let invoker = queue.invoker();
        drop(queue);
        assert!(matches!(invoker.post(|_| {}), Err(TrellisError::InvokeClosed)));
    }

    #[tokio::test]
    async fn test_invoke_async_completes_after_drain() {
        let mut tree = UiTree::new(Size::new(10, 10));
        let mut queue = InvokeQueue::new();
        let invoker = queue.invoker();

        let pending = invoker.invoke_async(|tree| tree.set_viewport(Size::new(5, 5)));
        tokio::pin!(pending);
        assert!(poll_once(pending.as_mut()).await.is_none());

        queue.drain(&mut tree);
        pending.await.unwrap();
        assert_eq!(tree.viewport(), Size::new(5, 5));
    }

    /// Poll a future once, returning its output if it was ready.
    async fn poll_once<F: std::future::Future + Unpin>(future: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            output = future => Some(output),
            _ = std::future::ready(()) => None,
        }
    }
}
