use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::config::AppState;
use super::handlers::Detail;

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_DAYS: i64 = 30;

const SESSION_TTL: Duration = Duration::from_secs(SESSION_DAYS as u64 * 24 * 60 * 60);

/// Live admin sessions. Only SHA-256 hashes of tokens are kept.
#[derive(Debug, Default)]
pub struct Sessions {
    expiry: Mutex<HashMap<Vec<u8>, Instant>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(token: &str) -> Vec<u8> {
        Sha256::digest(token.as_bytes()).to_vec()
    }

    /// Start a session and return its token
    pub fn issue(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.lock().insert(Self::hash(&token), Instant::now() + SESSION_TTL);
        token
    }

    pub fn validate(&self, token: &str) -> bool {
        let now = Instant::now();
        let mut sessions = self.lock();
        sessions.retain(|_, expires| *expires > now);
        sessions.contains_key(&Self::hash(token))
    }

    pub fn revoke(&self, token: &str) {
        self.lock().remove(&Self::hash(token));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Vec<u8>, Instant>> {
        self.expiry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Compare two secrets in time independent of where they differ
pub fn secrets_match(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

pub fn unauthorized() -> actix_web::Error {
    InternalError::from_response(
        "Unauthorized",
        HttpResponse::Unauthorized().json(Detail::new("Unauthorized")),
    )
    .into()
}

/// Extractor for handlers that need a logged-in administrator
pub struct Admin;

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let authorized = req
            .app_data::<web::Data<AppState>>()
            .zip(req.cookie(SESSION_COOKIE))
            .map(|(state, cookie)| state.sessions.validate(cookie.value()))
            .unwrap_or(false);

        ready(if authorized {
            Ok(Admin)
        } else {
            Err(unauthorized())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_validate_revoke() {
        let sessions = Sessions::new();
        let token = sessions.issue();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(sessions.validate(&token));
        assert!(!sessions.validate("not-a-token"));

        sessions.revoke(&token);
        assert!(!sessions.validate(&token));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let sessions = Sessions::new();
        assert_ne!(sessions.issue(), sessions.issue());
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("admin", "admin"));
        assert!(secrets_match("", ""));
        assert!(!secrets_match("admin", "Admin"));
        assert!(!secrets_match("admin", "admin2"));
        assert!(!secrets_match("", "admin"));
    }

    #[test]
    fn test_only_hash_is_stored() {
        let sessions = Sessions::new();
        let token = sessions.issue();
        let stored = sessions.lock();
        assert!(stored.contains_key(&Sessions::hash(&token)));
        assert!(!stored.contains_key(token.as_bytes()));
    }
}
