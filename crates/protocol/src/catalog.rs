//! Library catalog extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Deserialize;

use crate::document::Document;
use crate::probe::{Probe, ProbeError};

static DOC_HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#doc/(\d+)").expect("DOC_HREF_RE should compile"));

/// Extracts the numeric document id from a library anchor `href`.
///
/// `"#doc/5317/1"` yields `"5317"`; anything without `#doc/<digits>` yields `None`.
pub fn extract_document_id(href: &str) -> Option<String> {
	DOC_HREF_RE.captures(href).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

/// `href` and `title` attributes of one library anchor, as read by the DOM.
#[derive(Debug, Deserialize)]
struct LibraryAnchor {
	href: Option<String>,
	title: Option<String>,
}

/// Parses the anchors serialized by [`CatalogProbe`] into [`Document`]s, in
/// library order.
///
/// Anchors without a matching `href` are skipped, as are repeated ids. An
/// empty result means an empty library.
pub fn parse_catalog(raw: &str) -> Result<Vec<Document>, ProbeError> {
	if raw.trim().is_empty() {
		return Ok(Vec::new());
	}
	let anchors: Vec<LibraryAnchor> = serde_json::from_str(raw).map_err(|e| ProbeError::MalformedResult {
		probe: CatalogProbe.name(),
		reason: e.to_string(),
	})?;

	let mut seen = HashSet::new();
	Ok(anchors
		.into_iter()
		.filter_map(|anchor| {
			let id = extract_document_id(anchor.href.as_deref()?)?;
			let title = anchor.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
			Some(Document { id, title })
		})
		.filter(|doc| seen.insert(doc.id.clone()))
		.collect())
}

/// Reads `href` and `title` of every library anchor as a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogProbe;

impl Probe for CatalogProbe {
	type Output = Vec<Document>;

	fn name(&self) -> &'static str {
		"catalog"
	}

	fn script(&self) -> &'static str {
		"JSON.stringify(Array.from( \
			document.querySelectorAll('#libraryItems li a[href]'), \
			(a) => ({ href: a.getAttribute('href'), title: a.getAttribute('title') }) \
		))"
	}

	fn parse(&self, raw: &str) -> Result<Vec<Document>, ProbeError> {
		parse_catalog(raw)
	}
}
