//! Application services
//!
//! Each service is a set of async functions over [`ApiState`](crate::ApiState):
//! they read and write rows through the relational store port, apply the
//! form and workflow rules, and return API models. Route handlers only
//! extract, authorize and wrap.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod students;
pub mod submissions;
pub mod uploads;

/// Table names in the hosted database.
pub mod tables {
    pub const AREAS: &str = "areas";
    pub const AREA_FIELDS: &str = "area_fields";
    pub const SELECTION_OPTIONS: &str = "selection_options";
    pub const AREA_SUBMISSIONS: &str = "area_submissions";
    pub const PABELLONES: &str = "pabellones";
    pub const SALONES: &str = "salones";
    pub const ALUMNOS: &str = "alumnos";
    pub const ADMIN_USER: &str = "admin_user";
}
