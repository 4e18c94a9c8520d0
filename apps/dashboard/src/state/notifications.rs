//! # Notification State
//!
//! Backs the header bell.

use std::sync::{Arc, Mutex, PoisonError};

use melatea_core::notifications::NotificationCenter;

#[derive(Debug, Default)]
pub struct NotificationState {
    center: Arc<Mutex<NotificationCenter>>,
}

impl NotificationState {
    pub fn new() -> Self {
        NotificationState::default()
    }

    pub fn with_center<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&NotificationCenter) -> R,
    {
        let center = self.center.lock().unwrap_or_else(PoisonError::into_inner);
        f(&center)
    }

    pub fn with_center_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut NotificationCenter) -> R,
    {
        let mut center = self.center.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut center)
    }
}
