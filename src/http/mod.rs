//! HTTP protocol implementation.
//!
//! This module turns raw request bytes into a [`request::Request`], decides the
//! response status from that request and the resolved content, and writes the
//! result back. Every connection carries exactly one request.
//!
//! # Architecture
//!
//! - **`parser`**: Tolerant request parser (header folding, chunked bodies)
//! - **`request`**: Request representation, methods and versions
//! - **`resource`**: Content attached to a response
//! - **`response`**: Status decision engine and response assembly
//! - **`date`**: HTTP-date parsing and formatting
//! - **`writer`**: Serializes and writes responses to the client
//! - **`connection`**: Per-connection state machine and message framing
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer one complete message
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route, run handler, decide status
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Status priority
//!
//! The first matching row wins:
//!
//! ```text
//! 404  no content resolved, and the method is not HEAD
//! 501  method is not GET, HEAD, POST, PUT or DELETE
//! 400  no target or version, or missing Host (HTTP/1.1, or >1.1
//!      without an absolute-URI target)
//! 304  GET with If-Modified-Since later than the content
//! 412  If-Unmodified-Since earlier than the content
//! 100  Expect: 100-continue on HTTP > 1.0
//! 200  otherwise
//! ```

pub mod connection;
pub mod date;
pub mod parser;
pub mod request;
pub mod resource;
pub mod response;
pub mod writer;
