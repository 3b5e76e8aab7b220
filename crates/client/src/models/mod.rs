//! Wire models and form DTOs for the backend resources.
//!
//! Each submodule contains:
//! - A `Deserialize` record struct matching the backend's JSON
//! - A `Serialize` + `Validate` create DTO for `POST`
//! - A `Serialize` + `Validate` update DTO (all `Option` fields) for `PUT`

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod branch;
pub mod class;
pub mod enrollment;
pub mod lesson_plan;
pub mod school;
pub mod student;
pub mod teacher;
pub mod user;
