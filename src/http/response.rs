use bytes::Bytes;
use std::time::SystemTime;

use crate::http::date::{format_http_date, parse_conditional_date};
use crate::http::request::{Method, Request, Version};
use crate::http::resource::Resource;

/// HTTP status codes the server can answer with.
///
/// - `Continue` (100): client may send the body it is holding back
/// - `Ok` (200): Request successful
/// - `NotModified` (304): cached copy is still current
/// - `BadRequest` (400): Malformed request or missing Host
/// - `NotFound` (404): Resource not found
/// - `PreconditionFailed` (412): resource changed since the given date
/// - `NotImplemented` (501): HTTP method not supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 100 Continue
    Continue,
    /// 200 OK
    Ok,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 412 Precondition Failed
    PreconditionFailed,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotModified.as_u16(), 304);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Continue => 100,
            StatusCode::Ok => 200,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::PreconditionFailed => 412,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the reason phrase sent in the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::PreconditionFailed.reason_phrase(), "Precondition Failed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Continue => "Continue",
            StatusCode::Ok => "OK",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::PreconditionFailed => "Precondition Failed",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Inputs every status condition is evaluated against.
struct Evaluation<'a> {
    req: &'a Request,
    resource: Option<&'a Resource>,
    now: SystemTime,
}

type Condition = fn(&Evaluation<'_>) -> bool;

/// Status conditions in priority order. The first one that holds decides the
/// status; if none does, the answer is 200.
const STATUS_CONDITIONS: [(StatusCode, Condition); 6] = [
    (StatusCode::NotFound, route_missing),
    (StatusCode::NotImplemented, method_not_implemented),
    (StatusCode::BadRequest, request_target_invalid),
    (StatusCode::NotModified, not_modified_since),
    (StatusCode::PreconditionFailed, modified_since_precondition),
    (StatusCode::Continue, expects_continue),
];

// HEAD is exempt even when nothing was resolved for the path.
fn route_missing(ev: &Evaluation<'_>) -> bool {
    ev.resource.is_none() && !ev.req.is(&Method::Head)
}

fn method_not_implemented(ev: &Evaluation<'_>) -> bool {
    !ev.req.method.as_ref().is_some_and(Method::is_supported)
}

fn request_target_invalid(ev: &Evaluation<'_>) -> bool {
    let req = ev.req;
    let (Some(path), Some(version)) = (req.path.as_deref(), req.version) else {
        return true;
    };

    let has_host = req.non_empty_header("host").is_some();
    let absolute = path.starts_with("http://") || path.starts_with("https://");

    (version == Version::HTTP_1_1 && !has_host)
        || (version > Version::HTTP_1_1 && !has_host && !absolute)
}

fn not_modified_since(ev: &Evaluation<'_>) -> bool {
    if !ev.req.is(&Method::Get) {
        return false;
    }

    match (conditional_date(ev, "if-modified-since"), ev.resource) {
        (Some(since), Some(resource)) => resource.last_modified < since,
        _ => false,
    }
}

fn modified_since_precondition(ev: &Evaluation<'_>) -> bool {
    match (conditional_date(ev, "if-unmodified-since"), ev.resource) {
        (Some(since), Some(resource)) => resource.last_modified > since,
        _ => false,
    }
}

fn expects_continue(ev: &Evaluation<'_>) -> bool {
    ev.req.version.is_some_and(|v| v > Version::HTTP_1_0)
        && ev.req.header("expect") == Some("100-continue")
}

fn conditional_date(ev: &Evaluation<'_>, header: &str) -> Option<SystemTime> {
    let raw = ev.req.non_empty_header(header)?;
    let date = parse_conditional_date(raw, ev.now);
    if date.is_none() {
        tracing::debug!(header, value = raw, "Ignoring unusable conditional date");
    }
    date
}

/// Decides the status code for `req` given the resolved resource, if any.
pub fn decide_status(req: &Request, resource: Option<&Resource>, now: SystemTime) -> StatusCode {
    let ev = Evaluation { req, resource, now };

    STATUS_CONDITIONS
        .iter()
        .find(|(_, condition)| condition(&ev))
        .map(|(status, _)| *status)
        .unwrap_or(StatusCode::Ok)
}

/// Decides the full response for `req`, using the current time.
pub fn decide(req: &Request, resource: Option<Resource>) -> Response {
    decide_at(req, resource, SystemTime::now())
}

/// Like [`decide`], with an explicit clock.
pub fn decide_at(req: &Request, resource: Option<Resource>, now: SystemTime) -> Response {
    let mut builder = ResponseBuilder::new();
    if let Some(resource) = resource {
        builder.set_resource(resource);
    }
    builder.build_at(req, now)
}

/// A finalized HTTP response.
///
/// Headers keep their emission order: the base headers first, then whatever
/// the route handler added.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    /// Present only when the body is actually sent.
    pub body: Option<Bytes>,
}

impl Response {
    /// First value of the header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn sends_body(&self) -> bool {
        self.body.is_some()
    }

    /// `HTTP/1.1 <code> <reason>`
    pub fn status_line(&self) -> String {
        format!(
            "HTTP/1.1 {} {}",
            self.status.as_u16(),
            self.status.reason_phrase()
        )
    }

    /// A 400 response for messages that could not be read at all.
    pub fn bad_request() -> Self {
        ResponseBuilder::new().finish(StatusCode::BadRequest, false, SystemTime::now())
    }
}

/// Mutable response state a route handler fills in before the status is decided.
///
/// # Example
///
/// ```
/// # use rawhttp::http::request::{Method, RequestBuilder, Version};
/// # use rawhttp::http::resource::Resource;
/// # use rawhttp::http::response::{ResponseBuilder, StatusCode};
/// let req = RequestBuilder::new()
///     .method(Method::Get)
///     .path("/")
///     .version(Version::HTTP_1_0)
///     .build();
///
/// let mut builder = ResponseBuilder::new();
/// builder.set_resource(Resource::from_text("hi", "text/plain"));
/// builder.header("Cache-Control", "no-cache");
///
/// let response = builder.build(&req);
/// assert_eq!(response.status, StatusCode::Ok);
/// assert_eq!(response.header("cache-control"), Some("no-cache"));
/// ```
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    resource: Option<Resource>,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the content to send.
    pub fn set_resource(&mut self, resource: Resource) -> &mut Self {
        self.resource = Some(resource);
        self
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Adds an extra header, emitted after the base headers.
    ///
    /// The name is lower-cased. Extra headers are sent even when empty.
    pub fn header(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.headers.push((key.to_ascii_lowercase(), value.into()));
        self
    }

    /// Decides the status and builds the final Response.
    pub fn build(self, req: &Request) -> Response {
        self.build_at(req, SystemTime::now())
    }

    pub fn build_at(self, req: &Request, now: SystemTime) -> Response {
        let status = decide_status(req, self.resource.as_ref(), now);
        tracing::debug!(
            status = status.as_u16(),
            method = ?req.method,
            path = ?req.path,
            "Decided response status"
        );
        self.finish(status, req.is(&Method::Head), now)
    }

    fn finish(self, status: StatusCode, head_request: bool, now: SystemTime) -> Response {
        let (content_type, content_length) = match &self.resource {
            Some(resource) => (
                resource.content_type.clone(),
                match resource.size {
                    0 => String::new(),
                    size => size.to_string(),
                },
            ),
            None => (String::new(), String::new()),
        };

        let base = [
            ("content-type", content_type),
            ("content-length", content_length),
            ("date", format_http_date(now)),
            ("connection", "close".to_string()),
        ];

        let mut headers: Vec<(String, String)> = base
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        headers.extend(self.headers);

        let body = self
            .resource
            .filter(|_| status == StatusCode::Ok && !head_request)
            .map(|resource| resource.content);

        Response {
            status,
            headers,
            body,
        }
    }
}
