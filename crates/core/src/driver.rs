//! Browser seam of the pipeline.
//!
//! Every stage talks to the browser through [`ReaderPage`], which covers just
//! the primitives the reader needs. The production implementation lives in
//! [`crate::chrome`]; tests drive the stages with scripted pages.

use async_trait::async_trait;
use edubase_protocol::{Probe, ProbeError};
use thiserror::Error;
use tracing::trace;

use crate::config::SessionConfig;

/// Failure of a browser primitive, before it is attributed to a stage.
#[derive(Debug, Error)]
pub enum DriverError {
	#[error("browser launch failed: {0}")]
	Launch(String),

	#[error("navigation to {url} failed: {reason}")]
	Navigation { url: String, reason: String },

	#[error("timed out after {ms}ms waiting for {condition}")]
	Timeout { ms: u64, condition: String },

	#[error("script evaluation failed: {0}")]
	Script(String),

	#[error("element {selector} not usable: {reason}")]
	Element { selector: String, reason: String },

	#[error(transparent)]
	Cdp(#[from] chromiumoxide::error::CdpError),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// The single page of an isolated browser context.
#[async_trait]
pub trait ReaderPage: Send + Sync {
	/// Navigates the page to `url` and waits for the navigation to commit.
	async fn goto(&self, url: &str) -> DriverResult<()>;

	/// Evaluates a JavaScript expression; strings are returned verbatim,
	/// other values as their JSON text.
	async fn evaluate_value(&self, expression: &str) -> DriverResult<String>;

	/// Focuses the element matching `selector` and types `text` into it.
	async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()>;

	/// Clicks the element matching `selector`.
	async fn click(&self, selector: &str) -> DriverResult<()>;

	/// Switches CSS media emulation to `print`.
	async fn emulate_print_media(&self) -> DriverResult<()>;

	/// Prints the current page to PDF bytes.
	async fn print_pdf(&self) -> DriverResult<Vec<u8>>;

	/// Tears down the page, its context and the browser behind it.
	async fn close(self: Box<Self>) -> DriverResult<()>;
}

/// Starts a browser and hands out its page.
#[async_trait]
pub trait Launcher: Send + Sync {
	async fn launch(&self, config: &SessionConfig) -> DriverResult<Box<dyn ReaderPage>>;
}

/// Why a probe produced no answer.
#[derive(Debug, Error)]
pub enum ProbeFailure {
	#[error(transparent)]
	Driver(#[from] DriverError),

	#[error(transparent)]
	Parse(#[from] ProbeError),
}

/// Evaluates `probe`'s script on `page` and parses the result.
pub async fn run_probe<P>(page: &dyn ReaderPage, probe: &P) -> Result<P::Output, ProbeFailure>
where
	P: Probe + Sync,
{
	let raw = page.evaluate_value(probe.script()).await?;
	trace!(target = "edubase.driver", probe = probe.name(), bytes = raw.len(), "probe evaluated");
	Ok(probe.parse(&raw)?)
}
