//! The probe abstraction: one in-page script plus the parser for its result.

use thiserror::Error;

/// Errors produced while interpreting a probe result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
	/// The pagination widget was not rendered.
	#[error("pagination widget not found")]
	MissingPagination,

	/// No pagination label carried the `"/ "` marker.
	#[error("no page label containing \"/ \" in {0:?}")]
	MissingPageMarker(String),

	/// The text after the marker is not a positive page count.
	#[error("invalid page count {0:?}")]
	InvalidPageCount(String),

	/// The script result is not the JSON shape the parser expects.
	#[error("{probe} returned malformed JSON: {reason}")]
	MalformedResult { probe: &'static str, reason: String },
}

/// A question asked of the live reader page.
///
/// The browser evaluates [`Probe::script`] and returns its value as a string;
/// [`Probe::parse`] turns that string into a typed answer. Parsers never touch
/// the browser, so they are tested against fixture HTML and JSON.
pub trait Probe {
	/// Typed answer of the probe.
	type Output;

	/// Human-readable name used in logs and errors.
	fn name(&self) -> &'static str;

	/// JavaScript expression evaluated in the page; must yield a string.
	fn script(&self) -> &'static str;

	/// Interprets the raw script result.
	fn parse(&self, raw: &str) -> Result<Self::Output, ProbeError>;
}
