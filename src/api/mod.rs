//! API Module
//!
//! HTTP handlers and routing for the cache diagnostics API.
//!
//! # Endpoints
//! - `PUT /payload/:key` - Cache a raw payload
//! - `GET /payload/:key` - Fetch a cached payload
//! - `DELETE /payload/:key` - Remove a payload
//! - `DELETE /payload` - Clear the cache
//! - `POST /cleanup` - Remove expired payloads
//! - `POST /shrink` - Evict down to a byte target
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
