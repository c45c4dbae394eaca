//! Site build: the whole run from source directory to destination directory.
//!
//! ## Stages
//!
//! ```text
//! 1. check      converter can run           (before anything is touched)
//! 2. config     src/config.json  → BaseStore
//! 3. templates  src/*.template   → TemplateRegistry
//! 4. clear      remove every top-level entry of dst/
//! 5. pages      src/*.page       → dst/*.html   (sorted, one at a time)
//! 6. statics    other src/ files → dst/          (byte-for-byte)
//! ```
//!
//! Every error is fatal and returned as a [`BuildError`]; nothing is retried.
//! Output written before the failure is left in place. The `BaseStore` and
//! `TemplateRegistry` are built once and only borrowed by page runs.
//!
//! Only the top level of the source directory is considered. Subdirectories
//! are neither scanned for pages nor copied.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{self, ConfigError};
use crate::convert::{ConvertError, MarkupConverter};
use crate::naming::{self, SourceKind};
use crate::output;
use crate::page::{self, PageError, PageReport, PageSource};
use crate::template::{TemplateError, TemplateRegistry};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{0}")]
    MissingConverter(#[source] ConvertError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Template(#[from] TemplateError),
    #[error("failed to read source directory {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to clear output {path}: {source}")]
    ClearOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("page '{name}': {source}")]
    Page {
        name: String,
        #[source]
        source: PageError,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    CopyStatic {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where to read from and write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src"),
            destination: PathBuf::from("dst"),
        }
    }
}

/// Everything a successful build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    /// Destination paths of copied static files.
    pub statics: Vec<PathBuf>,
}

/// Run a full build.
pub fn build(
    options: &SiteOptions,
    converter: &dyn MarkupConverter,
) -> Result<BuildReport, BuildError> {
    output::print_start();
    converter.check().map_err(BuildError::MissingConverter)?;

    output::print_config_stage();
    let base = config::load_config(&options.source)?;

    let templates = TemplateRegistry::load(&options.source)?;
    output::print_templates(templates.names());

    output::print_clear_stage();
    clear_dir(&options.destination)?;

    let entries = list_entries(&options.source)?;

    output::print_pages_stage();
    let mut pages = Vec::new();
    for path in entries.iter().filter(|p| naming::classify(p) == SourceKind::Page) {
        let page = PageSource::new(path, &options.destination);
        output::print_page_start(&page.name);
        let report = page::process_page(&page, &base, converter, &templates).map_err(|source| {
            BuildError::Page {
                name: page.name.clone(),
                source,
            }
        })?;
        output::print_page_done(&report);
        pages.push(report);
    }

    let statics = copy_statics(&entries, &options.destination)?;

    Ok(BuildReport { pages, statics })
}

/// Sorted top-level entries of a directory.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let read_err = |source| BuildError::ReadSource {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(read_err)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort();
    Ok(entries)
}

/// Remove every top-level entry of `dir`, creating it if missing.
pub fn clear_dir(dir: &Path) -> Result<(), BuildError> {
    let clear_err = |path: &Path, source| BuildError::ClearOutput {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(|e| clear_err(dir, e))?;
    for entry in fs::read_dir(dir).map_err(|e| clear_err(dir, e))? {
        let path = entry.map_err(|e| clear_err(dir, e))?.path();
        // symlink_metadata so a link to a directory is removed, not followed
        let is_dir = fs::symlink_metadata(&path)
            .map(|m| m.is_dir())
            .map_err(|e| clear_err(&path, e))?;
        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| clear_err(&path, e))?;
    }
    Ok(())
}

/// Copy every static file among `entries` into `dst`.
fn copy_statics(entries: &[PathBuf], dst: &Path) -> Result<Vec<PathBuf>, BuildError> {
    output::print_statics_stage();
    let mut copied = Vec::new();
    for path in entries {
        match naming::classify(path) {
            SourceKind::Static => {}
            SourceKind::Directory => {
                output::print_static_skipped(path);
                continue;
            }
            _ => continue,
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = dst.join(file_name);
        if same_file(path, &target) {
            continue;
        }
        fs::copy(path, &target).map_err(|source| BuildError::CopyStatic {
            from: path.clone(),
            to: target.clone(),
            source,
        })?;
        output::print_static_copied(path);
        copied.push(target);
    }
    Ok(copied)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
