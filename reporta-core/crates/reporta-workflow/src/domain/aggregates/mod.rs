//! Aggregates
pub mod tracker;
pub use tracker::StatusTracker;
