//! budget-tree: indented budget spreadsheets to hierarchical trees and flat tables
//!
//! Layers, innermost first:
//! - [`domain`]: row classification, hierarchy building, flattening, analyses
//! - [`application`]: services and output renderings
//! - [`infrastructure`]: filesystem, workbook reader, service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
