//! rawhttp - HTTP/1.x from raw socket bytes
//!
//! Request parsing, response status decisions, and a small static file server
//! built on top of them.

pub mod config;
pub mod http;
pub mod routes;
pub mod server;
