//! HTTP handlers for vitrine-auth.

pub mod auth;
