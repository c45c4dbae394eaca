//! # Pagesmith
//!
//! A minimal static site generator. A flat source directory holds pages,
//! templates and one configuration file; every build regenerates the whole
//! destination directory.
//!
//! ```text
//! src/
//! ├── config.json          # site-wide values: strings, string maps, string lists
//! ├── default.template     # Tera template, used unless a page picks another
//! ├── post.template
//! ├── hello.page           # → dst/hello.html
//! └── style.css            # copied verbatim → dst/style.css
//! ```
//!
//! # Pages and Directives
//!
//! A page is markdown with optional control lines, which are stripped before
//! conversion:
//!
//! ```text
//! ---set title Hello          → title = "Hello"
//! ---setblock summary         → summary = the lines up to ---endblock
//! ---endblock
//! ---settemplate post         → render with post.template
//! ```
//!
//! # Pipeline
//!
//! ```text
//! config.json → BaseStore ─┐
//!                          ├─ per page: clone → scan → convert → render → write
//! *.template → Registry ───┘
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.json` loading, the typed per-page store and the cloner |
//! | [`directive`] | Line scanner for `---set`, `---setblock`, `---settemplate` |
//! | [`convert`] | Markup converter trait; external `markdown` command and built-in `pulldown-cmark` |
//! | [`template`] | Template renderer trait and the Tera-backed registry |
//! | [`page`] | One page from source text to written HTML |
//! | [`site`] | The full build: checks, clearing, page loop, static copy |
//! | [`naming`] | Source entry classification and page identity |
//! | [`output`] | Progress output |
//!
//! # Library Use
//!
//! The external collaborators are traits, so a build can run without a
//! `markdown` binary:
//!
//! ```no_run
//! use pagesmith::convert::BuiltinConverter;
//! use pagesmith::site::{self, SiteOptions};
//!
//! let report = site::build(&SiteOptions::default(), &BuiltinConverter)?;
//! println!("{} pages", report.pages.len());
//! # Ok::<(), pagesmith::site::BuildError>(())
//! ```

pub mod config;
pub mod convert;
pub mod directive;
pub mod naming;
pub mod output;
pub mod page;
pub mod site;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
