//! Shared test utilities for the pagesmith test suite.
//!
//! Provides a temp-dir site fixture and in-memory stand-ins for the two
//! external collaborators, so page processing can be tested without a
//! `markdown` binary or real template syntax.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new()
//!     .file("config.json", r#"{"title": "Site"}"#)
//!     .file("default.template", "{{title}}: {{content}}")
//!     .file("hello.page", "Body\n");
//!
//! let converter = FakeConverter::new();
//! let renderer = FakeRenderer::new(&[("default", "{{content}}")]);
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use crate::config::{ConfigValue, PageStore};
use crate::convert::{ConvertError, MarkupConverter};
use crate::template::{TemplateError, TemplateRenderer};

// =========================================================================
// Fixture setup
// =========================================================================

/// A temp directory holding `src/` and `dst/` for one test.
pub struct SiteFixture {
    tmp: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("src")).unwrap();
        Self { tmp }
    }

    /// Write a file into `src/`.
    pub fn file(self, name: &str, contents: &str) -> Self {
        fs::write(self.src().join(name), contents).unwrap();
        self
    }

    pub fn src(&self) -> PathBuf {
        self.tmp.path().join("src")
    }

    pub fn dst(&self) -> PathBuf {
        self.tmp.path().join("dst")
    }

    pub fn read_output(&self, name: &str) -> String {
        read_to_string(&self.dst().join(name))
    }
}

pub fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// Sorted top-level file names in a directory.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

// =========================================================================
// Fake converter
// =========================================================================

/// Wraps the body in `<conv>…</conv>` and records every input.
#[derive(Default)]
pub struct FakeConverter {
    inputs: Mutex<Vec<String>>,
    fail: bool,
    missing: bool,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every conversion fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `check` fails as if the converter were not installed.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl MarkupConverter for FakeConverter {
    fn check(&self) -> Result<(), ConvertError> {
        if self.missing {
            return Err(ConvertError::NotFound {
                command: "fake".into(),
                source: which::Error::CannotFindBinaryPath,
            });
        }
        Ok(())
    }

    fn convert(&self, body: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let body = String::from_utf8_lossy(body);
        self.inputs.lock().unwrap().push(body.to_string());
        if self.fail {
            return Err(ConvertError::Io {
                command: "fake".into(),
                source: std::io::Error::other("fake conversion failure"),
            });
        }
        Ok(format!("<conv>{body}</conv>").into_bytes())
    }
}

// =========================================================================
// Fake renderer
// =========================================================================

/// In-memory templates with `{{key}}` substitution of scalar values.
///
/// A placeholder naming a key that is absent (or not a scalar) is a render
/// error.
pub struct FakeRenderer {
    templates: HashMap<String, String>,
    rendered: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn new(templates: &[(&str, &str)]) -> Self {
        Self {
            templates: templates
                .iter()
                .map(|(n, t)| (n.to_string(), t.to_string()))
                .collect(),
            rendered: Mutex::new(Vec::new()),
        }
    }

    /// Names of templates rendered so far, in order.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

impl TemplateRenderer for FakeRenderer {
    fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn render(&self, name: &str, context: &PageStore) -> Result<Vec<u8>, TemplateError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        self.rendered.lock().unwrap().push(name.to_string());

        let mut out = String::new();
        let mut rest = template.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| TemplateError::Render {
                name: name.to_string(),
                message: "unclosed placeholder".into(),
            })?;
            let key = after[..end].trim();
            match context.get(key) {
                Some(ConfigValue::Scalar(value)) => out.push_str(value),
                _ => {
                    return Err(TemplateError::Render {
                        name: name.to_string(),
                        message: format!("no scalar value for '{key}'"),
                    });
                }
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out.into_bytes())
    }
}
