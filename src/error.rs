//! Request-level error taxonomy.
//!
//! Every variant maps onto exactly one canned HTTP response. Transport
//! failures never reach this type: they are reported through `anyhow` at the
//! connection boundary, where no response can be written anymore.

use crate::http::response::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The first line did not split into `<METHOD> <TARGET> <VERSION>`.
    #[error("malformed request line")]
    MalformedRequest,

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Outside the root, missing, disallowed extension or unknown MIME type.
    /// The caller is deliberately unable to tell these apart.
    #[error("resource not found")]
    NotFound,

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::MalformedRequest => StatusCode::BadRequest,
            HttpError::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            HttpError::NotFound => StatusCode::NotFound,
            HttpError::Io(_) => StatusCode::InternalServerError,
        }
    }

    /// Builds the response sent to the client for this error.
    pub fn into_response(self) -> Response {
        match self {
            HttpError::MalformedRequest => Response::bad_request(),
            HttpError::UnsupportedMethod(_) => Response::method_not_allowed(),
            HttpError::NotFound => Response::not_found(),
            HttpError::Io(_) => Response::internal_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(HttpError::MalformedRequest.status().as_u16(), 400);
        assert_eq!(HttpError::UnsupportedMethod("POST".into()).status().as_u16(), 405);
        assert_eq!(HttpError::NotFound.status().as_u16(), 404);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(HttpError::from(io).status().as_u16(), 500);
    }

    #[test]
    fn into_response_matches_status() {
        let response = HttpError::UnsupportedMethod("DELETE".into()).into_response();
        assert_eq!(response.status, StatusCode::MethodNotAllowed);
        assert_eq!(response.headers.get("Allow"), Some("GET"));
    }
}
