//! URL path to filesystem resolution
//!
//! Maps a request target onto the served tree and classifies what it finds.
//! Everything the caller must not learn about (paths outside the root,
//! missing files, disallowed extensions, unknown MIME types) collapses into
//! [`ResolvedTarget::NotFound`].

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use walkdir::WalkDir;

use crate::files::mime::{MimeRegistry, normalize_extension};
use crate::http::request::normalize_target;

/// Outcome of resolving one request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// An existing directory inside the root (canonical path).
    Directory(PathBuf),
    /// A servable regular file and the content type it is served with.
    File { path: PathBuf, content_type: String },
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    allowed_extensions: HashSet<String>,
    mime: MimeRegistry,
}

impl Resolver {
    /// Creates a resolver for `root`.
    ///
    /// The root is canonicalized once here; every containment check compares
    /// against that canonical form. Fails if the root does not exist.
    pub fn new<I, S>(
        root: impl AsRef<Path>,
        allowed_extensions: I,
        mime: MimeRegistry,
    ) -> std::io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            root: std::fs::canonicalize(root)?,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
            mime,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a raw (percent-encoded) request target.
    pub fn resolve(&self, target: &str) -> ResolvedTarget {
        let decoded = decode_path(normalize_target(target));
        let relative = decoded.trim_start_matches('/');

        match std::fs::canonicalize(self.root.join(relative)) {
            Ok(candidate) => {
                if !candidate.starts_with(&self.root) {
                    return ResolvedTarget::NotFound;
                }

                match std::fs::metadata(&candidate) {
                    Ok(meta) if meta.is_dir() => ResolvedTarget::Directory(candidate),
                    Ok(meta) if meta.is_file() => self.classify_file(candidate),
                    _ => self.search_by_name(relative),
                }
            }
            // Nothing at the direct path. Only paths that lexically stay
            // inside the root may fall back to the name search.
            Err(_) if stays_inside(relative) => self.search_by_name(relative),
            Err(_) => ResolvedTarget::NotFound,
        }
    }

    /// Walks the whole tree for a regular file with the same base name as
    /// `relative`.
    ///
    /// Within each directory, files are checked before subdirectories are
    /// entered, and both are visited in file-name order, so the first match
    /// is the same on every filesystem.
    fn search_by_name(&self, relative: &str) -> ResolvedTarget {
        let name = relative.rsplit('/').next().unwrap_or_default();
        if name.is_empty() || name == "." || name == ".." {
            return ResolvedTarget::NotFound;
        }

        let found = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| entry.file_type().is_file() && entry.file_name() == OsStr::new(name));

        let Some(entry) = found else {
            return ResolvedTarget::NotFound;
        };

        tracing::debug!(path = %entry.path().display(), "Found file via recursive search");

        match std::fs::canonicalize(entry.path()) {
            Ok(path) if path.starts_with(&self.root) => self.classify_file(path),
            _ => ResolvedTarget::NotFound,
        }
    }

    fn classify_file(&self, path: PathBuf) -> ResolvedTarget {
        let Some(ext) = path
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
        else {
            return ResolvedTarget::NotFound;
        };

        if !self.allowed_extensions.contains(&ext) {
            return ResolvedTarget::NotFound;
        }

        match self.mime.lookup(&ext) {
            Some(content_type) => ResolvedTarget::File {
                content_type: content_type.to_string(),
                path,
            },
            None => ResolvedTarget::NotFound,
        }
    }
}

/// Percent-decodes a URL path. Invalid UTF-8 sequences are replaced.
pub fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Lexical check that `relative` never climbs above its starting point.
fn stays_inside(relative: &str) -> bool {
    let mut depth = 0usize;
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => depth += 1,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ALLOWED: [&str; 4] = [".html", ".png", ".pdf", ".jpg"];

    fn fixture() -> (TempDir, Resolver) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.html"), b"0123456789").unwrap();
        fs::write(dir.path().join("notes.txt"), b"plain").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.pdf"), b"").unwrap();

        let resolver = Resolver::new(dir.path(), ALLOWED, MimeRegistry::default()).unwrap();
        (dir, resolver)
    }

    #[test]
    fn resolves_root_as_directory() {
        let (_dir, resolver) = fixture();
        assert_eq!(
            resolver.resolve("/"),
            ResolvedTarget::Directory(resolver.root().to_path_buf())
        );
    }

    #[test]
    fn resolves_direct_file_with_content_type() {
        let (_dir, resolver) = fixture();
        match resolver.resolve("/a.html") {
            ResolvedTarget::File { path, content_type } => {
                assert_eq!(path, resolver.root().join("a.html"));
                assert_eq!(content_type, "text/html; charset=utf-8");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn disallowed_extension_is_not_found() {
        let (_dir, resolver) = fixture();
        assert_eq!(resolver.resolve("/notes.txt"), ResolvedTarget::NotFound);
    }

    #[test]
    fn traversal_is_not_found() {
        let (_dir, resolver) = fixture();
        assert_eq!(resolver.resolve("/../a.html"), ResolvedTarget::NotFound);
        assert_eq!(resolver.resolve("/sub/../../etc/passwd"), ResolvedTarget::NotFound);
        assert_eq!(resolver.resolve("/%2e%2e/%2e%2e/etc/passwd"), ResolvedTarget::NotFound);
    }

    #[test]
    fn fallback_finds_nested_file_by_name() {
        let (_dir, resolver) = fixture();
        match resolver.resolve("/b.pdf") {
            ResolvedTarget::File { path, content_type } => {
                assert_eq!(path, resolver.root().join("sub").join("b.pdf"));
                assert_eq!(content_type, "application/pdf");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fallback_prefers_shallower_match() {
        let (dir, resolver) = fixture();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join("dup.png"), b"deep").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b").join("dup.png"), b"other").unwrap();

        match resolver.resolve("/missing/dup.png") {
            ResolvedTarget::File { path, .. } => {
                assert_eq!(path, resolver.root().join("a").join("dup.png"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fallback_name_match_is_case_sensitive() {
        let (_dir, resolver) = fixture();
        assert_eq!(resolver.resolve("/B.pdf"), ResolvedTarget::NotFound);
    }

    #[test]
    fn percent_encoded_names_are_decoded() {
        let (dir, resolver) = fixture();
        fs::write(dir.path().join("my file.jpg"), b"jpeg").unwrap();
        assert!(matches!(
            resolver.resolve("/my%20file.jpg"),
            ResolvedTarget::File { .. }
        ));
    }

    #[test]
    fn extension_check_ignores_case() {
        let (dir, resolver) = fixture();
        fs::write(dir.path().join("LOUD.PNG"), b"png").unwrap();
        match resolver.resolve("/LOUD.PNG") {
            ResolvedTarget::File { content_type, .. } => assert_eq!(content_type, "image/png"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_mime_is_not_found_even_if_allowed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.html"), b"x").unwrap();

        let resolver = Resolver::new(dir.path(), ALLOWED, MimeRegistry::empty()).unwrap();
        assert_eq!(resolver.resolve("/a.html"), ResolvedTarget::NotFound);
    }

    #[test]
    fn query_string_is_ignored() {
        let (_dir, resolver) = fixture();
        assert!(matches!(
            resolver.resolve("/a.html?download=1"),
            ResolvedTarget::File { .. }
        ));
    }

    #[test]
    fn stays_inside_tracks_depth() {
        assert!(stays_inside(""));
        assert!(stays_inside("a/../b"));
        assert!(!stays_inside("a/../../b"));
        assert!(!stays_inside(".."));
    }
}
