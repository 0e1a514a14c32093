//! tinyweb - a minimal embeddable HTTP server.
//!
//! Exact-path routing (one table per method), cookie-backed sessions with
//! sliding expiration and a background sweep, and static file delivery.
//! Handlers are plain functions from a [`context::RequestContext`] to a
//! [`result::RequestResult`] describing how the exchange concludes.

pub mod config;
pub mod context;
pub mod form;
pub mod http;
pub mod result;
pub mod router;
pub mod server;
pub mod session;
