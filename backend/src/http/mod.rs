//! HTTP server module.
//!
//! This module provides an axum-based HTTP server that exposes the scheduler
//! as a REST API on top of the service layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - Caller identity from the user header                  │
//! │  - Query parsing and JSON (de)serialization              │
//! │  - CORS, compression, timeout, error mapping             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (crate::services)                         │
//! │  - Access checks and validation                          │
//! │  - Ranking engine invocation                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (crate::db)                            │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use auth::CurrentUser;
pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
