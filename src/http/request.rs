/// HTTP request methods.
///
/// The server only serves `GET`. Every other token is still carried through
/// parsing so the dispatcher can answer it with 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token found in the method position
    Other(String),
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Matching is case-sensitive, so `get` becomes `Method::Other("get")`.
    ///
    /// # Example
    ///
    /// ```
    /// # use dirserve::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(token) => token,
        }
    }
}

/// The request line of a client request.
///
/// Header lines and bodies are never interpreted by this server, so only the
/// three tokens of the first line are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, still percent-encoded (e.g. "/docs/My%20File.pdf")
    pub target: String,
    /// HTTP version token, present but never validated
    pub version: String,
}

impl Request {
    /// The target with any query or fragment removed.
    ///
    /// Targets that do not start with `/` are treated as `/`.
    pub fn path(&self) -> &str {
        normalize_target(&self.target)
    }
}

/// Strips `?query` / `#fragment` and maps non-origin-form targets to `/`.
pub fn normalize_target(target: &str) -> &str {
    if !target.starts_with('/') {
        return "/";
    }

    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}
