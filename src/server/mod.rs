//! TCP side of the server: the sequential accept loop and request dispatch.

pub mod handler;
pub mod listener;

pub use handler::FileService;
pub use listener::Server;
