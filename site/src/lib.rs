//! Rommelaere Rénov site backend
//!
//! Content API, cookie sessions and the admin gate for the company's
//! marketing site, plus the seed/export tooling used by the `site` binary.

pub mod api;
pub mod auth;
pub mod config;
pub mod entity;
pub mod seed;
pub mod store;
