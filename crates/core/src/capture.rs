//! Page-by-page capture of one document.
//!
//! Each page of the reader is navigated to, left to settle and printed on its
//! own. Pages are streamed to a [`PageSink`] as soon as they are printed, so
//! a document never has to be held in memory twice.

use edubase_protocol::{PageCountProbe, scripts, urls};
use tracing::{debug, info};

use crate::config::CaptureOptions;
use crate::driver::{ReaderPage, run_probe};
use crate::error::{Error, Result};
use crate::wait::{settle, wait_for_network_idle};

/// Printed PDF bytes of one reader page. Indices start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUnit {
	pub index: u32,
	pub bytes: Vec<u8>,
}

/// Receiver of captured pages, in page order.
pub trait PageSink: Send {
	fn accept(&mut self, unit: PageUnit) -> Result<()>;
}

impl PageSink for Vec<PageUnit> {
	fn accept(&mut self, unit: PageUnit) -> Result<()> {
		self.push(unit);
		Ok(())
	}
}

/// Captures every page of `document_id` into `sink` and returns the number of
/// pages captured.
///
/// An error from the sink aborts the capture and is returned unchanged.
pub async fn capture(page: &dyn ReaderPage, document_id: &str, options: &CaptureOptions, sink: &mut dyn PageSink) -> Result<u32> {
	page.goto(&urls::reader_url(document_id, 1)).await.map_err(|e| Error::capture(document_id, e))?;
	wait_for_network_idle(page, options.idle).await.map_err(|e| Error::capture(document_id, e))?;
	settle(options.initial_settle).await;

	let total = run_probe(page, &PageCountProbe).await.map_err(|e| Error::capture(document_id, e))?;
	info!(target = "edubase.capture", document = document_id, pages = total, "capturing document");

	if options.css_patch {
		let outcome = page
			.evaluate_value(&scripts::inject_style(scripts::PRINT_STYLE_PATCH))
			.await
			.map_err(|e| Error::capture(document_id, e))?;
		page.emulate_print_media().await.map_err(|e| Error::capture(document_id, e))?;
		debug!(target = "edubase.capture", document = document_id, style = %outcome, "print style applied");
	}

	for index in 1..=total {
		page.goto(&urls::reader_url(document_id, index)).await.map_err(|e| Error::capture(document_id, e))?;
		wait_for_network_idle(page, options.idle).await.map_err(|e| Error::capture(document_id, e))?;
		settle(options.page_settle).await;

		let bytes = page.print_pdf().await.map_err(|e| Error::capture(document_id, e))?;
		info!(
			target = "edubase.capture",
			document = document_id,
			page = index,
			total,
			bytes = bytes.len(),
			"page captured"
		);
		sink.accept(PageUnit { index, bytes })?;
	}

	Ok(total)
}
