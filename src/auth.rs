use crate::error::{Error, Result};
use crate::model::{Role, Session};
use uuid::Uuid;

/// Decides whether a username/password pair opens a session. This is a
/// stand-in for real authentication and is not a security boundary.
pub trait CredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> Result<Session>;
}

#[derive(Debug, Clone)]
pub struct StaticCredentials {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self {
            username: "mentor".to_string(),
            password: "admin123".to_string(),
            display_name: "Mentor Admin".to_string(),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<Session> {
        if username.to_lowercase() != self.username.to_lowercase() || password != self.password {
            return Err(Error::InvalidCredentials);
        }
        Ok(Session {
            username: self.display_name.clone(),
            role: Role::Mentor,
            token: Uuid::new_v4().simple().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    /// A failed login leaves the state untouched.
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        let session = verifier.verify(username, password)?;
        *self = SessionState::Authenticated(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        *self = SessionState::Anonymous;
    }

    pub fn current(&self) -> Option<&Session> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(s) => Some(s),
        }
    }

    /// Resolves a caller-supplied token to the active mentor session.
    pub fn authorize(&self, token: Option<&str>) -> Result<&Session> {
        match (self.current(), token) {
            (Some(s), Some(t)) if s.token == t && s.role == Role::Mentor => Ok(s),
            _ => Err(Error::Unauthorized),
        }
    }
}
