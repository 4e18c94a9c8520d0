//! # Employee State

use std::sync::{Arc, Mutex, PoisonError};

use melatea_core::employees::EmployeeRoster;

#[derive(Debug, Default)]
pub struct EmployeeState {
    roster: Arc<Mutex<EmployeeRoster>>,
}

impl EmployeeState {
    pub fn new() -> Self {
        EmployeeState::default()
    }

    pub fn with_roster<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EmployeeRoster) -> R,
    {
        let roster = self.roster.lock().unwrap_or_else(PoisonError::into_inner);
        f(&roster)
    }

    pub fn with_roster_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut EmployeeRoster) -> R,
    {
        let mut roster = self.roster.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut roster)
    }
}
