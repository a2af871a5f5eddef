//! API Module
//!
//! HTTP handlers and routing exposing the caches over a REST API.
//!
//! # Endpoints
//! - `POST /store` - Store a payload
//! - `GET /retrieve/:key` - Retrieve a payload
//! - `GET /replay/:operation` - Replay a call history
//! - `GET /fetch?resource=` - Fetch through the resource cache
//! - `GET /count?resource=` - Resource fetch count
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
