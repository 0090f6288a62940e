//! Operator sessions
//!
//! A session is created by [`SessionRegistry::load`] on login and lives
//! until [`SessionRegistry::clear`] or its expiry. Tokens are signed JWTs
//! carrying the session id, so a token outlives nothing: once its session
//! is cleared the token is rejected even if the signature is still valid.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::permissions::{Permission, Role};
use crate::models::SessionView;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // session id
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if self.role.can(permission) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("{} may not do this", self.role.name())))
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            username: self.username.clone(),
            role: self.role.name().to_string(),
            area_id: self.role.area_id(),
            expires_at: self.expires_at,
        }
    }
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Session>>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Start a session for an authenticated operator and sign its token.
    pub fn load(&self, user_id: i64, username: &str, role: Role) -> Result<(String, Session), ApiError> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            username: username.to_string(),
            role,
            expires_at: Utc::now() + self.ttl,
        };
        let claims = Claims {
            sub: session.id,
            user_id,
            username: session.username.clone(),
            role,
            exp: session.expires_at.timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Unauthorized(format!("could not sign token: {e}")))?;

        self.sessions.write().insert(session.id, session.clone());
        tracing::info!(session = %session.id, username, role = role.name(), "session started");
        Ok((token, session))
    }

    /// Session behind `token`, if it is valid and still registered.
    pub fn resolve(&self, token: &str) -> Result<Session, ApiError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?
            .claims;

        let mut sessions = self.sessions.write();
        match sessions.get(&claims.sub) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.clone()),
            Some(_) => {
                sessions.remove(&claims.sub);
                Err(ApiError::Unauthorized("session expired".into()))
            }
            None => Err(ApiError::Unauthorized("session is not active".into())),
        }
    }

    pub fn clear(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "session cleared");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
