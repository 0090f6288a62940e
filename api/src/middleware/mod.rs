//! Request-level access control

pub mod auth;
pub mod permissions;

pub use auth::CurrentSession;
pub use permissions::{Permission, Role};
