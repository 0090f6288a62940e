//! API Routes

pub mod admin;
pub mod areas;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod locations;
pub mod notifications;
pub mod reports;
pub mod students;
pub mod uploads;

#[cfg(test)]
mod tests;
