//! Campus domain core.
//!
//! Pure, I/O-free building blocks shared by the API client and the screen
//! controllers: the role policy table, role-management guards, the
//! navigation filter, messaging rules and form validation.

pub mod error;
pub mod messaging;
pub mod navigation;
pub mod role_management;
pub mod roles;
pub mod types;
pub mod user;
pub mod validation;
