//! Client for the rehoming service REST API: typed wire structs, the
//! normalized error shape, and the retrying HTTP wrapper.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, RetryPolicy};
pub use error::ApiError;
