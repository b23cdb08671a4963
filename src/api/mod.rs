//! API Module
//!
//! HTTP handlers and routing for the viewer REST API.
//!
//! # Endpoints
//! - `POST /documents/open` - Open a document
//! - `POST /documents/page` - Fetch a page of a sheet
//! - `POST /documents/invalidate` - Invalidate and reload a document
//! - `POST /documents/close` - Close a document
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
