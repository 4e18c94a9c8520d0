//! # Auth State
//!
//! A single logged-in flag, remembered with the name that logged in.
//! There are no credentials to check and no tokens.
//!
//! ## Route Guard
//! ```text
//! command ──► require_login() ──► Ok  ──► run
//!                     │
//!                     └──────────► Err(UNAUTHORIZED)
//! ```

use std::sync::{Arc, RwLock};

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct AuthState {
    user: Arc<RwLock<Option<String>>>,
}

impl AuthState {
    pub fn new() -> Self {
        AuthState::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.read().map(|u| u.is_some()).unwrap_or(false)
    }

    /// Name used to log in, if any.
    pub fn current_user(&self) -> Option<String> {
        self.user.read().ok().and_then(|u| u.clone())
    }

    pub fn sign_in(&self, username: impl Into<String>) {
        if let Ok(mut u) = self.user.write() {
            *u = Some(username.into());
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut u) = self.user.write() {
            *u = None;
        }
    }

    /// Fails with `UNAUTHORIZED` unless someone is logged in.
    pub fn require_login(&self) -> Result<(), ApiError> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(ApiError::unauthorized())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_flag_round_trip() {
        let auth = AuthState::new();
        assert_eq!(auth.require_login().unwrap_err().code, ErrorCode::Unauthorized);

        auth.sign_in("airlangga");
        assert!(auth.is_logged_in());
        assert_eq!(auth.current_user().as_deref(), Some("airlangga"));
        assert!(auth.require_login().is_ok());

        auth.sign_out();
        assert!(!auth.is_logged_in());
    }
}
