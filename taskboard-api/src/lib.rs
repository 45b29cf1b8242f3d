//! # Taskboard API Server Library
//!
//! HTTP surface for managing users and their scheduled tasks.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and the JWT layer
//! - `config`: Configuration from environment variables
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: `Json` and `Path` extractors that reject with [`error::ApiError`]
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
