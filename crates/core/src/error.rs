//! Error types for the download pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Pipeline error, one variant per stage.
///
/// [`Error::is_fatal`] separates the kinds that end the run from the
/// per-document kinds the orchestrator records and moves past.
#[derive(Debug, Error)]
pub enum Error {
	#[error("browser setup failed: {0}")]
	Setup(String),

	#[error("login failed: {0}")]
	Auth(String),

	#[error("library scan failed: {0}")]
	Scan(String),

	#[error("capture of document {document} failed: {reason}")]
	Capture { document: String, reason: String },

	#[error("assembly of {} failed: {reason}", path.display())]
	Assembly { path: PathBuf, reason: String },

	#[error("selection aborted: {0}")]
	Prompt(String),
}

/// Stage an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Setup,
	Auth,
	Scan,
	Capture,
	Assembly,
	Prompt,
}

impl Error {
	pub(crate) fn capture(document: &str, reason: impl ToString) -> Self {
		Self::Capture {
			document: document.to_string(),
			reason: reason.to_string(),
		}
	}

	pub(crate) fn assembly(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
		Self::Assembly {
			path: path.into(),
			reason: reason.to_string(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Setup(_) => ErrorKind::Setup,
			Self::Auth(_) => ErrorKind::Auth,
			Self::Scan(_) => ErrorKind::Scan,
			Self::Capture { .. } => ErrorKind::Capture,
			Self::Assembly { .. } => ErrorKind::Assembly,
			Self::Prompt(_) => ErrorKind::Prompt,
		}
	}

	/// Whether the error ends the whole run rather than a single document.
	pub fn is_fatal(&self) -> bool {
		!matches!(self.kind(), ErrorKind::Capture | ErrorKind::Assembly)
	}

	/// One-line marker printed ahead of the cause.
	pub fn marker(&self) -> &'static str {
		match self.kind() {
			ErrorKind::Setup => "There was an error while setting up the browser",
			ErrorKind::Auth => "There was an error during login",
			ErrorKind::Scan => "There was an error while reading the library",
			ErrorKind::Capture | ErrorKind::Assembly => "There was an error during download",
			ErrorKind::Prompt => "No book was selected",
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_per_document_kinds_are_recoverable() {
		assert!(Error::Setup("no chrome".into()).is_fatal());
		assert!(Error::Auth("rejected".into()).is_fatal());
		assert!(Error::Scan("empty".into()).is_fatal());
		assert!(Error::Prompt("eof".into()).is_fatal());
		assert!(!Error::capture("5317", "timeout").is_fatal());
		assert!(!Error::assembly("5317.pdf", "disk full").is_fatal());
	}

	#[test]
	fn display_names_document_and_path() {
		assert_eq!(Error::capture("5317", "renderer crashed").to_string(), "capture of document 5317 failed: renderer crashed");
		assert_eq!(Error::assembly("out/5317.pdf", "disk full").to_string(), "assembly of out/5317.pdf failed: disk full");
	}
}
