use std::future::Future;
use std::pin::Pin;

use crate::http::request::Request;
use crate::http::resource::Resource;
use crate::http::response::ResponseBuilder;
use crate::routes::files::load_file;
use crate::routes::router::RouteMatch;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Per-method handler for a matched route.
///
/// A handler may attach a resource and extra headers to the response. It does
/// not choose the status code; that is decided afterwards from the request and
/// whatever the handler attached.
pub trait RouteHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        req: &'a Request,
        route: &'a RouteMatch,
        res: &'a mut ResponseBuilder,
    ) -> HandlerFuture<'a>;
}

/// Serves the file backing the route.
pub struct StaticFileHandler;

impl RouteHandler for StaticFileHandler {
    fn handle<'a>(
        &'a self,
        _req: &'a Request,
        route: &'a RouteMatch,
        res: &'a mut ResponseBuilder,
    ) -> HandlerFuture<'a> {
        Box::pin(async move {
            let resource = load_file(&route.file_path).await?;
            res.set_resource(resource);
            Ok(())
        })
    }
}

/// Acknowledges a submitted body with a short plain-text summary.
pub struct SubmissionHandler;

impl RouteHandler for SubmissionHandler {
    fn handle<'a>(
        &'a self,
        req: &'a Request,
        route: &'a RouteMatch,
        res: &'a mut ResponseBuilder,
    ) -> HandlerFuture<'a> {
        Box::pin(async move {
            let received = req.body.as_ref().map_or(0, |b| b.len());
            let text = format!("POST {}: received {} bytes\n", route.route, received);
            res.set_resource(Resource::from_text(text, "text/plain"));
            Ok(())
        })
    }
}
