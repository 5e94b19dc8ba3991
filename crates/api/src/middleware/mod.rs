//! HTTP middleware for the API.
//!
//! The auth gates are extractors rather than layers: a handler states the
//! principal kind it requires in its signature and receives the verified row.

pub mod auth;

pub use auth::{
    AUTH_COOKIE, AuthRejection, CurrentAdmin, CurrentShop, CurrentUser, auth_cookie,
    clear_auth_cookie,
};
