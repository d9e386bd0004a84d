use std::collections::HashMap;
use std::sync::Arc;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder};
use crate::routes::handler::{RouteHandler, StaticFileHandler, SubmissionHandler};
use crate::routes::router::FileRouter;

/// Resolves a request to its route and runs the handler registered for the
/// request method.
pub struct Dispatcher {
    router: FileRouter,
    handlers: HashMap<Method, Arc<dyn RouteHandler>>,
}

impl Dispatcher {
    /// A dispatcher with no handlers; every request resolves to no content.
    pub fn new(router: FileRouter) -> Self {
        Self {
            router,
            handlers: HashMap::new(),
        }
    }

    /// GET serves files, POST acknowledges submissions.
    pub fn with_defaults(router: FileRouter) -> Self {
        let mut dispatcher = Self::new(router);
        dispatcher
            .register(Method::Get, Arc::new(StaticFileHandler))
            .register(Method::Post, Arc::new(SubmissionHandler));
        dispatcher
    }

    pub fn register(&mut self, method: Method, handler: Arc<dyn RouteHandler>) -> &mut Self {
        self.handlers.insert(method, handler);
        self
    }

    pub fn router(&self) -> &FileRouter {
        &self.router
    }

    /// Runs the matching handler, if any, and leaves the status undecided.
    ///
    /// HEAD runs the GET handler. A missing route, missing handler, or failed
    /// handler all leave the builder without a resource.
    pub async fn prepare(&self, req: &Request) -> ResponseBuilder {
        let mut builder = ResponseBuilder::new();

        let Some(route) = req.path.as_deref().and_then(|p| self.router.match_path(p)) else {
            tracing::debug!(path = ?req.path, "No route matched");
            return builder;
        };

        let method = match &req.method {
            Some(Method::Head) => Method::Get,
            Some(method) => method.clone(),
            None => return builder,
        };

        let Some(handler) = self.handlers.get(&method) else {
            tracing::debug!(%method, route = %route.route, "No handler for method");
            return builder;
        };

        if let Err(e) = handler.handle(req, &route, &mut builder).await {
            tracing::warn!(
                %method,
                route = %route.route,
                error = %e,
                "Route handler failed"
            );
        }

        builder
    }

    /// Produces the final response for `req`.
    pub async fn respond(&self, req: &Request) -> Response {
        self.prepare(req).await.build(req)
    }
}
