//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server side: one request per connection,
//! only the request line is interpreted, every response carries
//! `Connection: close`.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Extracts the request line from the raw bytes
//! - **`request`**: Request line representation and target normalization
//! - **`response`**: Status codes, ordered headers, builder and canned responses
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read until header block end, budget or EOF
//!        └──────┬──────┘
//!               │ Bytes received (nothing received → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, dispatch, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, shut down write half
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dirserve::config::Config;
//! use dirserve::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = Server::bind(&Config::default()).await?;
//!     server.run().await
//! }
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
