//! Page directive scanner.
//!
//! A page is prose interleaved with line-anchored control lines:
//!
//! ```text
//! ---set title Hello World
//! ---settemplate post
//! ---setblock summary
//! Any number of raw lines,
//! kept verbatim.
//! ---endblock
//! # Body
//!
//! Everything else is copied to the body.
//! ```
//!
//! [`scan`] walks the text once, front to back. Directive lines write into the
//! page's [`PageStore`] or pick the template; every other line lands in the
//! body unchanged, terminators included. There is no lookahead beyond reading
//! a block up to its `---endblock`.
//!
//! Keys and template names are lowercase ASCII letters only. A `---` line
//! that does not match one of the exact forms is ordinary body text.
//!
//! The scanner works on bytes, so a page in a legacy encoding passes through
//! to the converter untouched. Only directive values are decoded, lossily,
//! when they are stored.

use regex::bytes::Regex;
use std::sync::LazyLock;

use crate::config::{ConfigValue, PageStore};

/// Template used when a page does not select one.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Terminator for `---setblock`.
pub const END_BLOCK: &[u8] = b"---endblock";

static SET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^---set ([a-z]+) (.+)\n?$").unwrap());
static SET_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^---setblock ([a-z]+)\n?$").unwrap());
static SET_TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^---settemplate ([a-z]+)\n?$").unwrap());

/// A recognized control line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `---set <key> <value>`; the value is the raw rest of the line.
    SetScalar { key: String, value: Vec<u8> },
    /// `---setblock <key>`; the value is the lines up to `---endblock`.
    SetBlock { key: String },
    /// `---settemplate <name>`
    SetTemplate { name: String },
}

/// Result of scanning one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// All non-directive lines in order, terminators preserved.
    pub body: Vec<u8>,
    /// Selected template, [`DEFAULT_TEMPLATE`] unless overridden.
    pub template: String,
    /// Whether any `---settemplate` line was seen.
    pub template_selected: bool,
}

/// Recognize a single line (with or without its `\n`) as a directive.
pub fn classify(line: &[u8]) -> Option<Directive> {
    if let Some(caps) = SET_RE.captures(line) {
        return Some(Directive::SetScalar {
            key: ascii_key(&caps[1]),
            value: caps[2].to_vec(),
        });
    }
    if let Some(caps) = SET_BLOCK_RE.captures(line) {
        return Some(Directive::SetBlock {
            key: ascii_key(&caps[1]),
        });
    }
    SET_TEMPLATE_RE
        .captures(line)
        .map(|caps| Directive::SetTemplate {
            name: ascii_key(&caps[1]),
        })
}

// Keys match `[a-z]+`, so they are always ASCII.
fn ascii_key(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode(bytes: &[u8]) -> ConfigValue {
    ConfigValue::Scalar(String::from_utf8_lossy(bytes).into_owned())
}

/// Scan a page, applying directives to `store`.
///
/// A `---setblock` with no matching `---endblock` runs to the end of the page.
pub fn scan(text: &[u8], store: &mut PageStore) -> ScanOutcome {
    let mut outcome = ScanOutcome {
        body: Vec::with_capacity(text.len()),
        template: DEFAULT_TEMPLATE.to_string(),
        template_selected: false,
    };

    let mut lines = text.split_inclusive(|b| *b == b'\n');
    while let Some(line) = lines.next() {
        match classify(line) {
            Some(Directive::SetScalar { key, value }) => {
                store.insert(key, decode(&value));
            }
            Some(Directive::SetBlock { key }) => {
                let block = collect_block(&mut lines);
                store.insert(key, decode(&block));
            }
            Some(Directive::SetTemplate { name }) => {
                outcome.template = name;
                outcome.template_selected = true;
            }
            None => outcome.body.extend_from_slice(line),
        }
    }

    outcome
}

fn collect_block<'a>(lines: &mut impl Iterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut block = Vec::new();
    for line in lines {
        if line.strip_suffix(b"\n").unwrap_or(line) == END_BLOCK {
            break;
        }
        block.extend_from_slice(line);
    }
    block
}
