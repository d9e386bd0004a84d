use rawhttp::http::request::{Method, Request, RequestBuilder, Version};
use std::collections::HashMap;

#[test]
fn test_request_header_retrieval() {
    let mut headers = HashMap::new();
    headers.insert("host".to_string(), "example.com".to_string());
    headers.insert("content-type".to_string(), "application/json".to_string());

    let req = Request {
        method: Some(Method::Get),
        path: Some("/".to_string()),
        version: Some(Version::HTTP_1_1),
        headers,
        body: None,
    };

    assert_eq!(req.header("host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("missing"), None);
}

#[test]
fn test_request_non_empty_header() {
    let req = RequestBuilder::new().header("Host", "").build();

    assert_eq!(req.header("host"), Some(""));
    assert_eq!(req.non_empty_header("host"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let req = RequestBuilder::new().header("Content-Length", "42").build();
    assert_eq!(req.content_length(), 42);
}

#[test]
fn test_request_content_length_missing_or_invalid() {
    assert_eq!(RequestBuilder::new().build().content_length(), 0);

    let req = RequestBuilder::new()
        .header("Content-Length", "not-a-number")
        .build();
    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_request_cookies() {
    let req = RequestBuilder::new()
        .header("Cookie", "session=abc123; theme=dark; flag")
        .build();

    let cookies = req.cookies();
    assert_eq!(cookies.len(), 3);
    assert_eq!(cookies.get("session").unwrap(), "abc123");
    assert_eq!(cookies.get("theme").unwrap(), "dark");
    assert_eq!(cookies.get("flag").unwrap(), "");
}

#[test]
fn test_request_cookie_value_with_equals() {
    let req = RequestBuilder::new().header("cookie", "token=a=b").build();

    assert_eq!(req.cookies().get("token").unwrap(), "a=b");
}

#[test]
fn test_request_no_cookies() {
    assert!(RequestBuilder::new().build().cookies().is_empty());
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::parse("GET"), Method::Get);
    assert_eq!(Method::parse("HEAD"), Method::Head);
    assert_eq!(Method::parse("POST"), Method::Post);
    assert_eq!(Method::parse("PUT"), Method::Put);
    assert_eq!(Method::parse("DELETE"), Method::Delete);
    assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
}

#[test]
fn test_request_method_support() {
    for token in ["GET", "HEAD", "POST", "PUT", "DELETE"] {
        assert!(Method::parse(token).is_supported(), "{token}");
    }
    for token in ["OPTIONS", "PATCH", "TRACE", "get"] {
        assert!(!Method::parse(token).is_supported(), "{token}");
    }
    assert_eq!(Method::parse("PATCH").to_string(), "PATCH");
}

#[test]
fn test_version_from_token() {
    assert_eq!(Version::from_token("HTTP/1.0"), Some(Version::HTTP_1_0));
    assert_eq!(Version::from_token("HTTP/1.1"), Some(Version::HTTP_1_1));
    assert_eq!(Version::from_token("HTTP/2.0"), Some(Version(2.0)));
    assert_eq!(Version::from_token("1.2"), Some(Version(1.2)));
    assert_eq!(Version::from_token("HTTP/1"), None);
    assert_eq!(Version::from_token("HTTP/1."), None);
    assert_eq!(Version::from_token("HTTP/.1"), None);
    assert_eq!(Version::from_token(""), None);
}

#[test]
fn test_version_ordering() {
    assert!(Version(1.2) > Version::HTTP_1_1);
    assert!(Version::HTTP_1_1 > Version::HTTP_1_0);
    assert_eq!(Version::HTTP_1_1.to_string(), "HTTP/1.1");
}

#[test]
fn test_request_builder_lowercases_headers() {
    let req = RequestBuilder::new()
        .method(Method::Post)
        .path("/api")
        .version(Version::HTTP_1_1)
        .header("X-Custom", "value")
        .body("payload")
        .build();

    assert!(req.headers.contains_key("x-custom"));
    assert!(req.is(&Method::Post));
    assert_eq!(req.body.as_deref(), Some("payload"));
}
