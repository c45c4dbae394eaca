//! Template registry and rendering.
//!
//! Every `*.template` file in the source directory becomes one template named
//! after its stem: `default.template` → `default`. Templates use
//! [Tera](https://keats.github.io/tera/) syntax and see the page store as
//! their context:
//!
//! ```text
//! <title>{{ title }}: {{ name }}</title>
//! {{ content }}
//! {% for tag in tags %}<li>{{ tag }}</li>{% endfor %}
//! {% for label, href in links %}<a href="{{ href }}">{{ label }}</a>{% endfor %}
//! ```
//!
//! Template names carry no `.html` suffix, so Tera's auto-escaping stays off
//! and `content` is inserted as the HTML the converter produced.
//!
//! All templates are parsed together, so `{% extends %}` and `{% include %}`
//! may refer to any other template by name regardless of file order.

use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

use crate::config::PageStore;
use crate::naming::{self, SourceKind};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error reading templates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template parse error: {0}")]
    Parse(String),
    #[error("template '{0}' not found")]
    NotFound(String),
    #[error("failed to render template '{name}': {message}")]
    Render { name: String, message: String },
}

/// Renders a named template against a page store.
pub trait TemplateRenderer {
    fn has_template(&self, name: &str) -> bool;

    fn render(&self, name: &str, context: &PageStore) -> Result<Vec<u8>, TemplateError>;
}

/// All templates of a site, parsed once and shared read-only by every page.
pub struct TemplateRegistry {
    tera: Tera,
    names: Vec<String>,
}

impl TemplateRegistry {
    /// Load every `*.template` file at the top level of `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let io_err = |source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| naming::classify(p) == SourceKind::Template)
            .collect();
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in &paths {
            let text = fs::read_to_string(path).map_err(|source| TemplateError::Io {
                path: path.clone(),
                source,
            })?;
            sources.push((naming::entry_name(path), text));
        }
        Self::from_sources(sources)
    }

    /// Build a registry from `(name, source)` pairs.
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self, TemplateError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let sources: Vec<(String, String)> = sources
            .into_iter()
            .map(|(n, s)| (n.into(), s.into()))
            .collect();
        let names = sources.iter().map(|(n, _)| n.clone()).collect();

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)
            .map_err(|e| TemplateError::Parse(error_chain(&e)))?;

        Ok(Self { tera, names })
    }

    /// Template names in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TemplateRenderer for TemplateRegistry {
    fn has_template(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn render(&self, name: &str, context: &PageStore) -> Result<Vec<u8>, TemplateError> {
        if !self.has_template(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        let render_err = |e: tera::Error| TemplateError::Render {
            name: name.to_string(),
            message: error_chain(&e),
        };
        let context = Context::from_serialize(context).map_err(render_err)?;
        self.tera
            .render(name, &context)
            .map(String::into_bytes)
            .map_err(render_err)
    }
}

/// Tera puts the useful detail in the source chain; flatten it.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
