//! Domain layer: business rules, access decisions and persistence contracts.
//!
//! The domain layer never imports `api::*`.

pub mod access;
pub mod error;
pub mod password;
pub mod repos;
pub mod service;
pub mod validation;
pub mod views;
