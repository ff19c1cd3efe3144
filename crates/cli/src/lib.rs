//! Command-line front end of the Edubase downloader.

pub mod cli;
pub mod logging;
pub mod output;
pub mod prompt;
