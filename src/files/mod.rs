//! Filesystem side of the server: target resolution, MIME lookup and
//! directory listings. All of it is blocking and meant to run on the
//! blocking thread pool.

pub mod listing;
pub mod mime;
pub mod resolver;

pub use listing::DirectoryEntry;
pub use mime::MimeRegistry;
pub use resolver::{ResolvedTarget, Resolver};
