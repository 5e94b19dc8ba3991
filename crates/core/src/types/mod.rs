//! Core types for Shopnear.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod geo;
pub mod id;
pub mod role;

pub use email::{Email, EmailError};
pub use geo::Coordinates;
pub use id::*;
pub use role::Role;
