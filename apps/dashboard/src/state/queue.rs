//! # Queue State

use std::sync::{Arc, Mutex, PoisonError};

use melatea_core::queue::OrderQueue;

#[derive(Debug, Default)]
pub struct QueueState {
    queue: Arc<Mutex<OrderQueue>>,
}

impl QueueState {
    pub fn new() -> Self {
        QueueState::default()
    }

    pub fn with_queue<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderQueue) -> R,
    {
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        f(&queue)
    }

    pub fn with_queue_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderQueue) -> R,
    {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut queue)
    }
}
