//! dirserve - minimal HTTP/1.1 directory server
//!
//! Serves one directory tree over plain TCP, one connection at a time,
//! with hand-built request parsing and response framing. Also ships the
//! raw-socket client used to exercise it.

pub mod client;
pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod server;
