// CLI module for opustags
//
// Thin layer over the library: option parsing, comment list input, listing output
// and the temporary-file handling around an edit.

pub mod commands;
pub mod config;
pub mod input;
pub mod output;

pub use config::{Config, Destination, OutputFormat};
pub use output::OutputFormatter;
