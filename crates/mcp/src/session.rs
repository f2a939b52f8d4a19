// Per-connection session negotiation.
//
// A streaming connection opens a session in `Negotiating`, moves it to
// `Active` once the client has been told its endpoint, and to `Closed` when
// the stream goes away. Follow-up requests are only accepted for `Active`
// sessions.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Negotiating,
    Active,
    Closed,
}

impl SessionState {
    /// Apply a transition, rejecting anything that moves backwards or
    /// leaves `Closed`.
    pub fn transition(self, to: SessionState) -> Result<SessionState, SessionError> {
        match (self, to) {
            (Self::Negotiating, Self::Active)
            | (Self::Negotiating, Self::Closed)
            | (Self::Active, Self::Closed) => Ok(to),
            (from, to) => Err(SessionError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Negotiating => "negotiating",
            Self::Active => "active",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// Live sessions keyed by id
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_sessions<R>(&self, f: impl FnOnce(&mut HashMap<String, SessionState>) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sessions)
    }

    /// Register a new session in `Negotiating`. Dropping the handle closes it.
    pub fn open(&self) -> SessionHandle {
        let id = Uuid::new_v4().to_string();
        self.with_sessions(|sessions| sessions.insert(id.clone(), SessionState::Negotiating));
        tracing::debug!(session_id = %id, "Session opened");

        SessionHandle {
            id,
            registry: self.clone(),
        }
    }

    pub fn state(&self, id: &str) -> Option<SessionState> {
        self.with_sessions(|sessions| sessions.get(id).copied())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.state(id) == Some(SessionState::Active)
    }

    pub fn activate(&self, id: &str) -> Result<(), SessionError> {
        self.with_sessions(|sessions| {
            let state = sessions.get_mut(id).ok_or(SessionError::NotFound)?;
            *state = state.transition(SessionState::Active)?;
            Ok(())
        })
    }

    /// Move the session to `Closed` and forget it
    pub fn close(&self, id: &str) -> Result<(), SessionError> {
        self.with_sessions(|sessions| {
            let state = sessions.get(id).copied().ok_or(SessionError::NotFound)?;
            state.transition(SessionState::Closed)?;
            sessions.remove(id);
            Ok(())
        })
    }

    pub fn len(&self) -> usize {
        self.with_sessions(|sessions| sessions.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned by the streaming connection; closes the session on drop
#[derive(Debug)]
pub struct SessionHandle {
    id: String,
    registry: SessionRegistry,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn activate(&self) -> Result<(), SessionError> {
        self.registry.activate(&self.id)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.registry.close(&self.id).is_ok() {
            tracing::debug!(session_id = %self.id, "Session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_transitions() {
        use SessionState::*;

        assert_eq!(Negotiating.transition(Active), Ok(Active));
        assert_eq!(Negotiating.transition(Closed), Ok(Closed));
        assert_eq!(Active.transition(Closed), Ok(Closed));

        assert!(Active.transition(Negotiating).is_err());
        assert!(Active.transition(Active).is_err());
        assert!(Closed.transition(Active).is_err());
        assert!(Closed.transition(Closed).is_err());
    }

    #[test]
    fn test_session_lifecycle() {
        let registry = SessionRegistry::new();
        let handle = registry.open();
        let id = handle.id().to_string();

        assert_eq!(registry.state(&id), Some(SessionState::Negotiating));
        assert!(!registry.is_active(&id));

        handle.activate().unwrap();
        assert!(registry.is_active(&id));
        assert_eq!(
            handle.activate(),
            Err(SessionError::InvalidTransition {
                from: SessionState::Active,
                to: SessionState::Active
            })
        );

        drop(handle);
        assert_eq!(registry.state(&id), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_session() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.activate("nope"), Err(SessionError::NotFound));
        assert_eq!(registry.close("nope"), Err(SessionError::NotFound));
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let first = registry.open();
        let second = registry.open();
        assert_ne!(first.id(), second.id());
        assert_eq!(registry.len(), 2);

        first.activate().unwrap();
        assert!(!registry.is_active(second.id()));

        drop(first);
        assert_eq!(registry.len(), 1);
    }
}
