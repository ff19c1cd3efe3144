//! Page count discovery from the reader's pagination widget.
//!
//! The reader exposes no document metadata; the only source for the number of
//! pages is the label `"<current> / <total>"` (or a lone `"/ <total>"` span)
//! inside `#pagination`.

use crate::html::collapse_whitespace;
use crate::probe::{Probe, ProbeError};

const PAGE_MARKER: &str = "/ ";

/// Parses the total from a pagination label such as `"12 / 34"`.
pub fn parse_total_pages(label: &str) -> Result<u32, ProbeError> {
	let Some((_, total)) = label.rsplit_once(PAGE_MARKER) else {
		return Err(ProbeError::MissingPageMarker(label.to_string()));
	};
	let total = total.trim();
	match total.parse::<u32>() {
		Ok(0) | Err(_) => Err(ProbeError::InvalidPageCount(total.to_string())),
		Ok(pages) => Ok(pages),
	}
}

/// Reads the text of every `<span>` inside `#pagination` as a JSON array of
/// strings, or the widget's whole text when it has no spans. An empty string
/// means the widget is absent.
///
/// Nested spans are listed too, outer first, so a label such as
/// `<span><span>12</span> / 34</span>` still yields `"12 / 34"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageCountProbe;

impl Probe for PageCountProbe {
	type Output = u32;

	fn name(&self) -> &'static str {
		"page-count"
	}

	fn script(&self) -> &'static str {
		"(() => { \
			const p = document.getElementById('pagination'); \
			if (!p) { return ''; } \
			const spans = Array.from(p.querySelectorAll('span'), (s) => s.textContent || ''); \
			return JSON.stringify(spans.length ? spans : [p.textContent || '']); \
		})()"
	}

	fn parse(&self, raw: &str) -> Result<u32, ProbeError> {
		if raw.trim().is_empty() {
			return Err(ProbeError::MissingPagination);
		}

		let labels: Vec<String> = serde_json::from_str(raw).map_err(|e| ProbeError::MalformedResult {
			probe: self.name(),
			reason: e.to_string(),
		})?;
		let labels: Vec<String> = labels.iter().map(|label| collapse_whitespace(label)).collect();

		match labels.iter().find(|label| label.contains(PAGE_MARKER)) {
			Some(label) => parse_total_pages(label),
			None => {
				let text: Vec<&str> = labels.iter().map(String::as_str).filter(|label| !label.is_empty()).collect();
				Err(ProbeError::MissingPageMarker(text.join(" ")))
			}
		}
	}
}
