//! HTTP API for informer
//!
//! This crate maps the read-only listing routes onto a `ResourceLister`
//! and serves them as JSON.

mod handlers;
mod router;
mod server;

pub use handlers::AppState;
pub use router::{get_only, json_content_type, router};
pub use server::{DEFAULT_LISTEN_ADDR, serve, shutdown_signal};
