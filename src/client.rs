//! Raw-socket client
//!
//! Sends one `GET`, reads until the server closes, and splits what came back
//! into status line, headers and body. No `Content-Length` handling: the
//! server always closes after one response.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use bytes::BytesMut;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default directory for saved downloads.
pub const DOWNLOAD_DIR: &str = "downloads";

const BUFFER_SIZE: usize = 4096;

/// Same as the listing hrefs: unreserved characters and `/` pass through.
const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("malformed HTTP response: no header/body separator")]
    MalformedResponse,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status_line: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        self.status_line.starts_with("HTTP/1.1 200")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Lowercased `Content-Type`, `application/octet-stream` when absent.
    pub fn content_type(&self) -> String {
        self.header("content-type")
            .unwrap_or("application/octet-stream")
            .to_ascii_lowercase()
    }
}

/// Prefixes `/` when missing.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

pub fn build_request(host: &str, port: u16, path: &str) -> Vec<u8> {
    let path = normalize_path(path);
    format!(
        "GET {} HTTP/1.1\r\nHost: {}:{}\r\nConnection: close\r\n\r\n",
        utf8_percent_encode(&path, PATH),
        host,
        port
    )
    .into_bytes()
}

/// Sends the request and returns every byte received until the peer closes.
pub async fn fetch(host: &str, port: u16, path: &str) -> Result<Vec<u8>, ClientError> {
    let mut stream = TcpStream::connect((host, port)).await?;
    stream.write_all(&build_request(host, port, path)).await?;
    stream.flush().await?;

    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        if buffer.capacity() == buffer.len() {
            buffer.reserve(BUFFER_SIZE);
        }
        if stream.read_buf(&mut buffer).await? == 0 {
            break;
        }
    }

    Ok(buffer.to_vec())
}

/// Splits on the first CRLFCRLF, falling back to LFLF.
pub fn parse_response(raw: &[u8]) -> Result<RawResponse, ClientError> {
    let (head, body) = split_once(raw, b"\r\n\r\n")
        .or_else(|| split_once(raw, b"\n\n"))
        .ok_or(ClientError::MalformedResponse)?;

    // Latin-1: every byte maps to one char.
    let head: String = head.iter().map(|&b| b as char).collect();
    let mut lines = head.lines();

    let status_line = lines.next().unwrap_or("HTTP/1.1 ???").to_string();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    Ok(RawResponse {
        status_line,
        headers,
        body: body.to_vec(),
    })
}

fn split_once<'a>(haystack: &'a [u8], sep: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    haystack
        .windows(sep.len())
        .position(|w| w == sep)
        .map(|pos| (&haystack[..pos], &haystack[pos + sep.len()..]))
}

/// The last path segment, or `downloaded_file` when there is none.
pub fn download_name(request_path: &str) -> String {
    let base = request_path.rsplit('/').next().unwrap_or_default();
    match base {
        "" | "." | ".." => "downloaded_file".to_string(),
        name => name.to_string(),
    }
}

/// Writes `data` into `dir` under the base name of `request_path`.
pub fn save_file(dir: &Path, request_path: &str, data: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let out = dir.join(download_name(request_path));
    std::fs::write(&out, data)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_encoded_and_closes() {
        let req = build_request("localhost", 8000, "my file.pdf");
        assert_eq!(
            req,
            b"GET /my%20file.pdf HTTP/1.1\r\nHost: localhost:8000\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn parse_splits_headers_and_body() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: Text/HTML\r\nContent-Length: 2\r\n\r\nhi";
        let response = parse_response(raw).unwrap();

        assert!(response.is_ok());
        assert_eq!(response.content_type(), "text/html");
        assert_eq!(response.header("Content-Length"), Some("2"));
        assert_eq!(response.body, b"hi");
    }

    #[test]
    fn parse_falls_back_to_bare_newlines() {
        let response = parse_response(b"HTTP/1.1 404 Not Found\nX: y\n\nmissing").unwrap();
        assert!(!response.is_ok());
        assert_eq!(response.body, b"missing");
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert!(matches!(
            parse_response(b"HTTP/1.1 200 OK\r\n"),
            Err(ClientError::MalformedResponse)
        ));
    }

    #[test]
    fn body_may_contain_separator() {
        let response = parse_response(b"HTTP/1.1 200 OK\r\n\r\na\r\n\r\nb").unwrap();
        assert_eq!(response.body, b"a\r\n\r\nb");
    }

    #[test]
    fn download_name_drops_directories() {
        assert_eq!(download_name("/docs/../../etc/report.pdf"), "report.pdf");
        assert_eq!(download_name("/docs/"), "downloaded_file");
        assert_eq!(download_name("/.."), "downloaded_file");
    }

    #[test]
    fn save_file_writes_into_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = save_file(dir.path(), "/sub/b.pdf", b"%PDF").unwrap();

        assert_eq!(out, dir.path().join("b.pdf"));
        assert_eq!(std::fs::read(out).unwrap(), b"%PDF");
    }
}
