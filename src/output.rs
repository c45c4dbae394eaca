//! CLI progress output.
//!
//! Every stage of a build announces itself before it runs, so when a build
//! aborts the last line printed names the stage (and page) that failed.
//!
//! ```text
//! Running pagesmith...
//! Reading config.
//! Reading templates:
//!     default
//!     special
//! Removing any previous output.
//! Processing pages:
//!     about
//!         → about.html (template: special)
//!     hello
//!         → hello.html
//! Copying static files:
//!     style.css
//!     skipped directory: images
//! Built 2 pages, copied 1 static file → dst
//! ```
//!
//! Each `format_*` function is pure and returns the lines; the `print_*`
//! wrappers write them to stdout.

use std::path::Path;

use crate::page::PageReport;
use crate::site::BuildReport;

const INDENT: &str = "    ";

pub fn format_start() -> Vec<String> {
    vec![format!("Running {}...", env!("CARGO_PKG_NAME"))]
}

pub fn format_config_stage() -> Vec<String> {
    vec!["Reading config.".to_string()]
}

pub fn format_templates(names: &[String]) -> Vec<String> {
    std::iter::once("Reading templates:".to_string())
        .chain(names.iter().map(|n| format!("{INDENT}{n}")))
        .collect()
}

pub fn format_clear_stage() -> Vec<String> {
    vec!["Removing any previous output.".to_string()]
}

pub fn format_pages_stage() -> Vec<String> {
    vec!["Processing pages:".to_string()]
}

pub fn format_page_start(name: &str) -> Vec<String> {
    vec![format!("{INDENT}{name}")]
}

pub fn format_page_done(report: &PageReport) -> Vec<String> {
    let file = file_name(&report.output);
    if report.template_selected {
        vec![format!(
            "{INDENT}{INDENT}→ {file} (template: {})",
            report.template
        )]
    } else {
        vec![format!("{INDENT}{INDENT}→ {file}")]
    }
}

pub fn format_statics_stage() -> Vec<String> {
    vec!["Copying static files:".to_string()]
}

pub fn format_static_copied(path: &Path) -> Vec<String> {
    vec![format!("{INDENT}{}", file_name(path))]
}

pub fn format_static_skipped(path: &Path) -> Vec<String> {
    vec![format!("{INDENT}skipped directory: {}", file_name(path))]
}

pub fn format_summary(report: &BuildReport, destination: &Path) -> Vec<String> {
    vec![format!(
        "Built {}, copied {} → {}",
        plural(report.pages.len(), "page"),
        plural(report.statics.len(), "static file"),
        destination.display()
    )]
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn print(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

pub fn print_start() {
    print(format_start());
}

pub fn print_config_stage() {
    print(format_config_stage());
}

pub fn print_templates(names: &[String]) {
    print(format_templates(names));
}

pub fn print_clear_stage() {
    print(format_clear_stage());
}

pub fn print_pages_stage() {
    print(format_pages_stage());
}

pub fn print_page_start(name: &str) {
    print(format_page_start(name));
}

pub fn print_page_done(report: &PageReport) {
    print(format_page_done(report));
}

pub fn print_statics_stage() {
    print(format_statics_stage());
}

pub fn print_static_copied(path: &Path) {
    print(format_static_copied(path));
}

pub fn print_static_skipped(path: &Path) {
    print(format_static_skipped(path));
}

pub fn print_summary(report: &BuildReport, destination: &Path) {
    print(format_summary(report, destination));
}
