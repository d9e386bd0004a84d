use std::collections::HashMap;
use std::fmt;

/// HTTP request methods.
///
/// The five methods the server implements have their own variants. Any other
/// token is kept verbatim in `Extension` so the response engine can answer it
/// with 501 Not Implemented instead of the parser rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
    /// HEAD - Like GET but without the response body
    Head,
    /// POST - Create or submit data
    Post,
    /// PUT - Replace a resource
    Put,
    /// DELETE - Delete a resource
    Delete,
    /// Any other token, case preserved
    Extension(String),
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Matching is case-sensitive; `get` is an extension method, not GET.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::Get);
    /// assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            other => Method::Extension(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Extension(token) => token,
        }
    }

    /// Whether the server implements this method.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Method::Extension(_))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric protocol version taken from the `HTTP/x.y` token.
///
/// Compared as a decimal number, so `1.2 > 1.1 > 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Version(pub f64);

impl Version {
    pub const HTTP_1_0: Version = Version(1.0);
    pub const HTTP_1_1: Version = Version(1.1);

    /// Extracts the trailing `digits.digits` of a version token.
    ///
    /// Returns `None` when the token does not end in that shape.
    ///
    /// ```
    /// # use rawhttp::http::request::Version;
    /// assert_eq!(Version::from_token("HTTP/1.1"), Some(Version::HTTP_1_1));
    /// assert_eq!(Version::from_token("HTTP/1"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        let minor_start = bytes
            .iter()
            .rposition(|b| !b.is_ascii_digit())
            .map(|i| i + 1)
            .unwrap_or(0);
        if minor_start == bytes.len() || minor_start == 0 || bytes[minor_start - 1] != b'.' {
            return None;
        }

        let dot = minor_start - 1;
        let major_start = bytes[..dot]
            .iter()
            .rposition(|b| !b.is_ascii_digit())
            .map(|i| i + 1)
            .unwrap_or(0);
        if major_start == dot {
            return None;
        }

        token[major_start..].parse().ok().map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{:.1}", self.0)
    }
}

/// A parsed HTTP request.
///
/// Request-line fields are optional: an empty or truncated request line still
/// produces a `Request`, and the response engine turns the missing pieces into
/// 400/501 answers. Header names are always lower-case.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: Option<Method>,
    /// Raw request-target, origin-form (`/a/b`) or absolute-URI form.
    pub path: Option<String>,
    pub version: Option<Version>,
    pub headers: HashMap<String, String>,
    /// Present only when a body section existed or chunks were decoded.
    pub body: Option<String>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<Version>,
    headers: HashMap<String, String>,
    body: Option<String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Adds a header; the name is lower-cased.
    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            path: self.path,
            version: self.version,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Request {
    /// Retrieves a header value by name. The name is matched case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        match self.headers.get(key) {
            Some(v) => Some(v.as_str()),
            None => self
                .headers
                .get(&key.to_ascii_lowercase())
                .map(|v| v.as_str()),
        }
    }

    /// Like [`Request::header`], but treats an empty value as absent.
    pub fn non_empty_header(&self, key: &str) -> Option<&str> {
        self.header(key).filter(|v| !v.is_empty())
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("content-length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Parses the `cookie` header into name/value pairs.
    ///
    /// Pairs are separated by `"; "`; a pair without `=` maps to an empty value.
    pub fn cookies(&self) -> HashMap<String, String> {
        let Some(raw) = self.non_empty_header("cookie") else {
            return HashMap::new();
        };

        raw.split("; ")
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    }

    /// True if the method is exactly `method`.
    pub fn is(&self, method: &Method) -> bool {
        self.method.as_ref() == Some(method)
    }
}
