//! Shopnear Core - Shared types library.
//!
//! This crate provides common types used across all Shopnear components:
//! - `api` - HTTP service for shop discovery and subscriptions
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated emails, principal roles, and
//!   geographic coordinates with geodesic distance

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
