//! Human-readable output.
//!
//! Lines are emitted as tracing events on [`PRINT_TARGET`] so they share the
//! writer with log events and never tear the progress line.

use std::fmt::Display;

use colored::*;
use console::{Alignment, measure_text_width, pad_str};
use tracing::info;

use crate::terminal::colors;

pub const WIDTH: usize = 64;
/// Events on this target are printed verbatim by the log formatter.
pub const PRINT_TARGET: &str = "assetscout::print";
const KEY_WIDTH: usize = 20;
const TREE_KEY_WIDTH: usize = 9;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn banner(quiet: u8) {
    if quiet > 0 {
        return;
    }
    let name = format!("assetscout {}", env!("CARGO_PKG_VERSION"));
    print(&format!(
        "{}  {}",
        name.color(colors::PRIMARY).bold(),
        "network asset discovery and onboarding".color(colors::SEPARATOR)
    ));
    rule();
}

/// `── TITLE ─────────`, left aligned.
pub fn header(title: &str, quiet: u8) {
    if quiet > 0 {
        return;
    }
    let label = format!(" {} ", title.to_uppercase());
    let tail = WIDTH.saturating_sub(measure_text_width(&label) + 2);
    print(&format!(
        "{}{}{}",
        "──".color(colors::SEPARATOR),
        label.color(colors::ACCENT).bold(),
        "─".repeat(tail).color(colors::SEPARATOR)
    ));
}

pub fn rule() {
    print(&"━".repeat(WIDTH).color(colors::SEPARATOR).to_string());
}

/// `key.......: value`, with keys padded to a shared width.
pub fn aligned_line(key: &str, value: impl Display) {
    let dots = ".".repeat(KEY_WIDTH.saturating_sub(measure_text_width(key)));
    print_status(format!(
        "{}{}{} {value}",
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    ));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    print(&format!("{} {}", "›".color(colors::SEPARATOR), msg.as_ref()));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{} {}",
        format!("#{idx}").color(colors::ACCENT),
        name.color(colors::PRIMARY).bold()
    ));
}

pub fn tree(items: Vec<(String, ColoredString)>) {
    let last = items.len().saturating_sub(1);
    for (i, (key, value)) in items.into_iter().enumerate() {
        let branch = if i == last { "╰" } else { "│" };
        print(&format!(
            "  {} {} {}",
            branch.color(colors::SEPARATOR),
            pad_str(&key, TREE_KEY_WIDTH, Alignment::Left, None).as_ref().color(colors::TEXT_DEFAULT),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    print(&pad_str(msg, WIDTH, Alignment::Center, None));
}

pub fn no_results() {
    centerln(&"no host answered".color(colors::MISSING).bold().to_string());
    centerln(
        &"check the target, or raise --probe-timeout-ms on slow links"
            .color(colors::SEPARATOR)
            .to_string(),
    );
}

pub fn end_of_program() {
    rule();
}
