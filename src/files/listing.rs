//! HTML directory index

use std::fs;
use std::path::Path;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left as-is in hrefs: unreserved plus the path separator.
const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Files that belong to the deployment itself and never show up in a listing.
pub const HIDDEN_ENTRIES: &[&str] = &[
    "Cargo.toml",
    "Cargo.lock",
    "README.md",
    "DESIGN.md",
    "Dockerfile",
    "docker-compose.yml",
    "config.yaml",
    ".DS_Store",
];

const FORBIDDEN_PAGE: &[u8] = b"<html><body><h1>Forbidden</h1></body></html>";

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
    pub size_bytes: u64,
}

/// Reads the direct children of `dir`, sorted by name, without the hidden
/// entries. Entries whose metadata cannot be read are skipped.
pub fn read_entries(dir: &Path) -> std::io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if HIDDEN_ENTRIES.contains(&name.as_str()) {
            continue;
        }

        // Follows symlinks, so a link to a directory is listed as one.
        let Ok(meta) = fs::metadata(entry.path()) else {
            continue;
        };

        entries.push(DirectoryEntry {
            name,
            is_directory: meta.is_dir(),
            size_bytes: if meta.is_dir() { 0 } else { meta.len() },
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Renders the listing page for `dir`, shown under the decoded URL path
/// `request_path`.
///
/// If the directory cannot be read, a minimal Forbidden page is returned
/// instead so the response itself still succeeds.
pub fn render(request_path: &str, dir: &Path) -> Vec<u8> {
    match read_entries(dir) {
        Ok(entries) => render_entries(request_path, &entries).into_bytes(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Directory not listable");
            FORBIDDEN_PAGE.to_vec()
        }
    }
}

pub fn render_entries(request_path: &str, entries: &[DirectoryEntry]) -> String {
    let title = escape_html(request_path);

    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        "<html lang='en'>".to_string(),
        "<head>".to_string(),
        "<meta charset='utf-8'>".to_string(),
        "<meta name='viewport' content='width=device-width, initial-scale=1'>".to_string(),
        format!("<title>Content of {title}</title>"),
        "<style>".to_string(),
        "table { border-collapse: collapse; width: 100%; }".to_string(),
        "th, td { border: 1px solid black; padding: 8px; text-align: left; }".to_string(),
        "</style>".to_string(),
        "</head>".to_string(),
        "<body>".to_string(),
        "<header>".to_string(),
        format!("<h1>Content of {title}</h1>"),
        "</header>".to_string(),
        "<main>".to_string(),
    ];

    if let Some(parent) = parent_path(request_path) {
        lines.push(format!(
            r#"<a class="parent-link" href="{}">⬆ Parent directory</a>"#,
            utf8_percent_encode(&parent, PATH)
        ));
    }

    lines.push("<table>".to_string());
    lines.push("<thead><tr><th>Name</th><th>Size</th></tr></thead>".to_string());
    lines.push("<tbody>".to_string());

    for entry in entries {
        let href = utf8_percent_encode(&entry.name, PATH).to_string();
        let name = escape_html(&entry.name);

        let row = if entry.is_directory {
            format!(r#"<tr class="dir"><td><a href="{href}/">{name}/</a></td><td>—</td></tr>"#)
        } else {
            format!(
                r#"<tr class="file"><td><a href="{href}">{name}</a></td><td>{}</td></tr>"#,
                format_size(entry.size_bytes)
            )
        };
        lines.push(row);
    }

    lines.push("</tbody></table></main></body></html>".to_string());
    lines.join("\n")
}

/// The parent of a directory URL path, or `None` at the root.
///
/// `/a/b/` and `/a/b` both give `/a/`; `/a/` gives `/`.
pub fn parent_path(request_path: &str) -> Option<String> {
    if request_path == "/" {
        return None;
    }

    let trimmed = request_path.trim_end_matches('/');
    let parent = trimmed.rsplit_once('/').map(|(head, _)| head).unwrap_or("");

    Some(if parent.is_empty() {
        "/".to_string()
    } else {
        format!("{parent}/")
    })
}

/// Human-readable size in base-1024 units with one decimal place.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
