use crate::error::HttpError;
use crate::http::request::{Method, Request};

/// Parses the request line out of the raw bytes read from a connection.
///
/// Only the first line is looked at. It ends at the first `\n` (with an
/// optional preceding `\r`) or at the end of the buffer when no newline
/// arrived. Everything after it is ignored.
pub fn parse_request_line(buf: &[u8]) -> Result<Request, HttpError> {
    let line_end = buf
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(buf.len());

    let line = String::from_utf8_lossy(&buf[..line_end]);
    let mut parts = line.split_whitespace();

    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(HttpError::MalformedRequest);
    };

    Ok(Request {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Returns true once `buf` holds a complete header block.
///
/// Accepts both CRLF and bare LF line endings.
pub fn headers_complete(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.windows(2).any(|w| w == b"\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request_line(req).unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.target, "/");
        assert_eq!(parsed.version, "HTTP/1.1");
    }

    #[test]
    fn headers_complete_detects_both_terminators() {
        assert!(headers_complete(b"GET / HTTP/1.1\r\n\r\n"));
        assert!(headers_complete(b"GET / HTTP/1.1\n\n"));
        assert!(!headers_complete(b"GET / HTTP/1.1\r\nHost: x\r\n"));
    }
}
