//! Terminal output formatting with colors
//!
//! Status lines go to stdout, diagnostics to stderr. `colored` honors
//! NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Summary line of a finished command.
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// One entry in a list of produced artifacts or passed checks.
pub fn artifact(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "✓".green(), msg);
}

/// One failed check, e.g. a subtotal that disagrees with its leaves.
pub fn mismatch(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

pub fn written(path: &Path) {
    println!("{}: {}", "Written".green(), path.display());
}

pub fn created(path: &Path) {
    println!("{}: {}", "Created".green(), path.display());
}

pub fn section(title: &(impl Display + ?Sized)) {
    println!("{}", title.to_string().cyan().bold());
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored data output (previews, config dumps).
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
