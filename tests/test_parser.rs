use dirserve::error::HttpError;
use dirserve::http::parser::parse_request_line;
use dirserve::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_ignores_headers_and_body() {
    let req = b"POST /api HTTP/1.1\r\nBrokenHeader\r\nContent-Length: 5\r\n\r\nhello";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.target, "/api");
}

#[test]
fn test_parse_without_line_terminator() {
    let parsed = parse_request_line(b"GET /a.html HTTP/1.0").unwrap();

    assert_eq!(parsed.target, "/a.html");
    assert_eq!(parsed.version, "HTTP/1.0");
}

#[test]
fn test_parse_bare_lf() {
    let parsed = parse_request_line(b"GET /x HTTP/1.1\nHost: y\n\n").unwrap();
    assert_eq!(parsed.target, "/x");
}

#[test]
fn test_parse_keeps_percent_encoding_and_query() {
    let parsed = parse_request_line(b"GET /my%20file.pdf?x=1 HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.target, "/my%20file.pdf?x=1");
    assert_eq!(parsed.path(), "/my%20file.pdf");
}

#[test]
fn test_parse_method_only_is_malformed() {
    assert!(matches!(
        parse_request_line(b"GET\r\n\r\n"),
        Err(HttpError::MalformedRequest)
    ));
}

#[test]
fn test_parse_two_tokens_is_malformed() {
    assert!(matches!(
        parse_request_line(b"GET /\r\n\r\n"),
        Err(HttpError::MalformedRequest)
    ));
}

#[test]
fn test_parse_four_tokens_is_malformed() {
    assert!(matches!(
        parse_request_line(b"GET / HTTP/1.1 extra\r\n\r\n"),
        Err(HttpError::MalformedRequest)
    ));
}

#[test]
fn test_parse_empty_is_malformed() {
    assert!(matches!(
        parse_request_line(b""),
        Err(HttpError::MalformedRequest)
    ));
    assert!(matches!(
        parse_request_line(b"\r\n"),
        Err(HttpError::MalformedRequest)
    ));
}

#[test]
fn test_parse_version_value_not_validated() {
    let parsed = parse_request_line(b"GET / banana\r\n\r\n").unwrap();
    assert_eq!(parsed.version, "banana");
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
        ("BREW", Method::Other("BREW".to_string())),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let parsed = parse_request_line(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}

#[test]
fn test_parse_tolerates_extra_whitespace() {
    let parsed = parse_request_line(b"GET   /a.html \t HTTP/1.1  \r\n").unwrap();
    assert_eq!(parsed.target, "/a.html");
}
