//! Classification of top-level source entries.
//!
//! The source directory is flat. Every entry is one of:
//!
//! - `*.page`: a page, rendered to `<stem>.html`
//! - `*.template`: a template, registered under its stem
//! - `config.json`: the site configuration
//! - any other file: a static asset, copied verbatim
//! - a directory: not descended into
//!
//! A page's identity is its file stem: `hello.page` → `hello`, written to
//! `hello.html`.

use std::path::{Path, PathBuf};

pub const PAGE_EXTENSION: &str = "page";
pub const TEMPLATE_EXTENSION: &str = "template";
pub const CONFIG_FILE: &str = "config.json";
pub const OUTPUT_EXTENSION: &str = "html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Page,
    Template,
    Config,
    Static,
    Directory,
}

/// Classify a source entry by name. Directories are detected on disk.
pub fn classify(path: &Path) -> SourceKind {
    if path.is_dir() {
        return SourceKind::Directory;
    }
    classify_name(path)
}

/// Classify by file name alone.
pub fn classify_name(path: &Path) -> SourceKind {
    if path.file_name().is_some_and(|n| n == CONFIG_FILE) {
        return SourceKind::Config;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(PAGE_EXTENSION) => SourceKind::Page,
        Some(TEMPLATE_EXTENSION) => SourceKind::Template,
        _ => SourceKind::Static,
    }
}

/// Page or template identity: the file stem.
pub fn entry_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Destination of a page: `<dst>/<name>.html`.
pub fn output_path(dst: &Path, name: &str) -> PathBuf {
    dst.join(format!("{name}.{OUTPUT_EXTENSION}"))
}
