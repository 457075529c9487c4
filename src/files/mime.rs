//! MIME type lookup
//!
//! An explicit extension table built once at startup and handed to the
//! resolver. Tests can build their own with [`MimeRegistry::empty`].

use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct MimeRegistry {
    types: HashMap<String, String>,
}

impl MimeRegistry {
    /// A registry that knows no types at all.
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Registers `content_type` for `ext`. A leading dot is ignored and the
    /// extension is stored lowercase.
    pub fn insert(&mut self, ext: &str, content_type: impl Into<String>) {
        self.types.insert(normalize_extension(ext), content_type.into());
    }

    pub fn lookup(&self, ext: &str) -> Option<&str> {
        self.types
            .get(&normalize_extension(ext))
            .map(String::as_str)
    }

    /// Looks up the type for a path by its extension.
    pub fn for_path(&self, path: &Path) -> Option<&str> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| self.lookup(e))
    }
}

impl Default for MimeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (ext, content_type) in [
            // Text
            ("html", "text/html; charset=utf-8"),
            ("htm", "text/html; charset=utf-8"),
            ("css", "text/css"),
            ("js", "text/javascript"),
            ("json", "application/json"),
            ("txt", "text/plain"),
            ("csv", "text/csv"),
            ("xml", "application/xml"),
            // Images
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("svg", "image/svg+xml"),
            ("ico", "image/x-icon"),
            ("webp", "image/webp"),
            // Documents / archives
            ("pdf", "application/pdf"),
            ("zip", "application/zip"),
            ("gz", "application/gzip"),
        ] {
            registry.insert(ext, content_type);
        }
        registry
    }
}

/// Lowercases an extension and drops a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
