//! Library scan.

use edubase_protocol::{CatalogProbe, Document, scripts, selectors};
use tracing::{debug, info};

use crate::config::CatalogOptions;
use crate::driver::{ReaderPage, run_probe};
use crate::error::{Error, Result};
use crate::wait::{settle, wait_for_selector};

/// Lists the documents of the signed-in account in library order.
///
/// The library renders lazily, so the list is scrolled one viewport at a time
/// until a scroll reveals no new entries or the iteration cap is reached.
pub async fn list_documents(page: &dyn ReaderPage, options: &CatalogOptions) -> Result<Vec<Document>> {
	wait_for_selector(page, selectors::LIBRARY_ENTRY, options.ready)
		.await
		.map_err(scan)?;

	let mut count = entry_count(page).await?;
	let mut iterations = 0;
	while iterations < options.max_scroll_iterations {
		iterations += 1;
		page.evaluate_value(scripts::SCROLL_ONE_VIEWPORT).await.map_err(scan)?;
		settle(options.scroll_pause).await;
		let next = entry_count(page).await?;
		debug!(target = "edubase", iteration = iterations, entries = next, "library scrolled");
		if next <= count {
			break;
		}
		count = next;
	}
	settle(options.settle).await;

	let documents = run_probe(page, &CatalogProbe).await.map_err(scan)?;
	if documents.is_empty() {
		return Err(Error::Scan("no documents found".into()));
	}
	info!(target = "edubase", documents = documents.len(), scrolls = iterations, "library scanned");
	Ok(documents)
}

fn scan(err: impl std::fmt::Display) -> Error {
	Error::Scan(err.to_string())
}

async fn entry_count(page: &dyn ReaderPage) -> Result<usize> {
	let raw = page.evaluate_value(scripts::LIBRARY_ENTRY_COUNT).await.map_err(scan)?;
	raw.trim()
		.parse()
		.map_err(|_| Error::Scan(format!("unexpected library entry count {raw:?}")))
}
