//! # Rehearsal Scheduler Backend
//!
//! Scheduling backend for bands: members create bands, collect availability
//! through polls, schedule rehearsals, record attendance and ask for the
//! best candidate times.
//!
//! ## Architecture
//!
//! - [`models`]: Value types and typed identifiers
//! - [`scheduler`]: Suggested-time ranking engine (pure and synchronous)
//! - [`db`]: Repository traits, the in-memory repository and snapshot seeding
//! - [`services`]: Access checks, validation and orchestration
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based REST API (feature `http-server`)

// RepositoryError carries an ErrorContext on every variant.
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
