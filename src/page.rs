//! Page processing: one `.page` file in, one `.html` file out.
//!
//! ```text
//! BaseStore ──clone──▶ PageStore ──scan──▶ { body, PageStore', template }
//!                                              │
//!                          body ──convert──▶ HTML
//!                                              │
//!      PageStore' + name + content ──render(template)──▶ bytes ──▶ dst/<name>.html
//! ```
//!
//! `name` and `content` are reserved: they are set after scanning, so a page
//! cannot override them with directives.
//!
//! Page bytes are never required to be UTF-8: the body reaches the converter
//! as read from disk.
//!
//! [`render_page`] is the pure part of the pipeline (no filesystem access);
//! [`process_page`] wraps it with reading the source and writing the output.
//! Any failure aborts the page, and the template is checked before anything
//! is written.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{self, BaseStore, ConfigError, ConfigValue, PageStore};
use crate::convert::{ConvertError, MarkupConverter};
use crate::directive;
use crate::naming;
use crate::template::{TemplateError, TemplateRenderer};

/// Store key receiving the page identity.
pub const NAME_KEY: &str = "name";
/// Store key receiving the converted HTML body.
pub const CONTENT_KEY: &str = "content";

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read page {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("markup conversion failed: {0}")]
    Conversion(#[from] ConvertError),
    #[error("Template {0} not found.")]
    TemplateNotFound(String),
    #[error("{0}")]
    Render(#[from] TemplateError),
    #[error("failed to write {path}: {source}")]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A page found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    /// Identity, the source file stem.
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl PageSource {
    /// Describe the page at `source`, writing into `dst`.
    pub fn new(source: &Path, dst: &Path) -> Self {
        let name = naming::entry_name(source);
        let destination = naming::output_path(dst, &name);
        Self {
            name,
            source: source.to_path_buf(),
            destination,
        }
    }
}

/// Result of [`render_page`].
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub template: String,
    /// Whether the page picked its template with `---settemplate`.
    pub template_selected: bool,
    /// The final render context, reserved keys included.
    pub context: PageStore,
    pub output: Vec<u8>,
}

/// What [`process_page`] produced, for progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub name: String,
    pub template: String,
    pub template_selected: bool,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Run a page's raw bytes through clone, scan, convert and render.
pub fn render_page(
    name: &str,
    text: &[u8],
    base: &BaseStore,
    converter: &dyn MarkupConverter,
    renderer: &dyn TemplateRenderer,
) -> Result<RenderedPage, PageError> {
    let mut store = config::clone_store(base)?;
    let scanned = directive::scan(text, &mut store);

    let html = converter.convert(&scanned.body)?;

    if !renderer.has_template(&scanned.template) {
        return Err(PageError::TemplateNotFound(scanned.template));
    }

    store.insert(NAME_KEY.to_string(), ConfigValue::from(name));
    store.insert(
        CONTENT_KEY.to_string(),
        ConfigValue::Scalar(String::from_utf8_lossy(&html).into_owned()),
    );

    let output = renderer.render(&scanned.template, &store)?;

    Ok(RenderedPage {
        template: scanned.template,
        template_selected: scanned.template_selected,
        context: store,
        output,
    })
}

/// Process one page file and write its HTML, replacing any existing file.
pub fn process_page(
    page: &PageSource,
    base: &BaseStore,
    converter: &dyn MarkupConverter,
    renderer: &dyn TemplateRenderer,
) -> Result<PageReport, PageError> {
    let text = fs::read(&page.source).map_err(|source| PageError::SourceRead {
        path: page.source.clone(),
        source,
    })?;

    let rendered = render_page(&page.name, &text, base, converter, renderer)?;

    fs::write(&page.destination, &rendered.output).map_err(|source| {
        PageError::DestinationWrite {
            path: page.destination.clone(),
            source,
        }
    })?;

    Ok(PageReport {
        name: page.name.clone(),
        template: rendered.template,
        template_selected: rendered.template_selected,
        output: page.destination.clone(),
        bytes: rendered.output.len(),
    })
}
