//! Routing collaborators
//!
//! Maps request paths onto files, loads file content, and runs the per-method
//! route handlers that attach content to a response.

pub mod dispatcher;
pub mod files;
pub mod handler;
pub mod router;

pub use dispatcher::Dispatcher;
pub use handler::{HandlerFuture, RouteHandler};
pub use router::{FileRouter, RouteMatch};
