//! Service configuration from `REPORTA_*` environment variables

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use reporta_forms::UploadPolicy;
use reporta_workflow::WorkflowFlavor;
use thiserror::Error;
use tracing::{info, warn};

use crate::notify::NotificationPermission;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },

    #[error("{key} is required when {because}")]
    Missing { key: &'static str, because: &'static str },
}

/// Where rows and uploaded files live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local tables seeded with demo data
    Memory,
    /// Hosted PostgREST + Storage API project
    Rest { url: String, key: String },
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub storage_bucket: String,
    pub storage_public_url: Option<String>,
    pub jwt_secret: String,
    pub session_ttl_secs: i64,
    pub workflow: WorkflowFlavor,
    pub upload: UploadPolicy,
    pub notifications: NotificationPermission,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::Memory,
            storage_bucket: "reportes".into(),
            storage_public_url: None,
            jwt_secret: "reporta-dev-secret-change-me".into(),
            session_ttl_secs: 8 * 3600,
            workflow: WorkflowFlavor::Tracking,
            upload: UploadPolicy::default(),
            notifications: NotificationPermission::Default,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to [`Default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store = match var("REPORTA_STORE").as_deref().unwrap_or("memory") {
            "memory" => StoreBackend::Memory,
            "rest" => StoreBackend::Rest {
                url: var("REPORTA_STORE_URL").ok_or(ConfigError::Missing {
                    key: "REPORTA_STORE_URL",
                    because: "REPORTA_STORE=rest",
                })?,
                key: var("REPORTA_STORE_KEY").ok_or(ConfigError::Missing {
                    key: "REPORTA_STORE_KEY",
                    because: "REPORTA_STORE=rest",
                })?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "REPORTA_STORE",
                    value: other.to_string(),
                    reason: "expected memory or rest".into(),
                })
            }
        };

        let jwt_secret = match var("REPORTA_JWT_SECRET") {
            Some(secret) => secret,
            None => {
                warn!("REPORTA_JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let allowed_mime_types = match var("REPORTA_UPLOAD_ALLOWED_TYPES") {
            Some(list) => list
                .split(',')
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            None => defaults.upload.allowed_mime_types,
        };

        let config = Self {
            bind_addr: parse_or(var("REPORTA_BIND_ADDR"), "REPORTA_BIND_ADDR", defaults.bind_addr)?,
            store,
            storage_bucket: var("REPORTA_STORAGE_BUCKET").unwrap_or(defaults.storage_bucket),
            storage_public_url: var("REPORTA_STORAGE_PUBLIC_URL"),
            jwt_secret,
            session_ttl_secs: parse_or(var("REPORTA_SESSION_TTL_SECS"), "REPORTA_SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            workflow: parse_or(var("REPORTA_WORKFLOW"), "REPORTA_WORKFLOW", defaults.workflow)?,
            upload: UploadPolicy {
                max_bytes: parse_or(var("REPORTA_UPLOAD_MAX_BYTES"), "REPORTA_UPLOAD_MAX_BYTES", defaults.upload.max_bytes)?,
                allowed_mime_types,
            },
            notifications: parse_or(var("REPORTA_NOTIFICATIONS"), "REPORTA_NOTIFICATIONS", defaults.notifications)?,
        };

        if config.session_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "REPORTA_SESSION_TTL_SECS",
                value: config.session_ttl_secs.to_string(),
                reason: "must be positive".into(),
            });
        }
        Ok(config)
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
