//! Diabetes screening API
//!
//! An HTTP service that loads pre-trained diabetes classifiers (and their
//! feature scalers) from disk at startup and serves prediction endpoints.
//! Requests carry eight named numeric medical features; responses carry the
//! predicted class index and a human-readable diagnosis.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod ml;

pub use error::{AppError, Result};
