//! In-page JavaScript snippets that are not tied to a single probe.
//!
//! Every snippet is an expression whose value is read back as a string.

/// Resource timing entries kept per page. The browser default of 250 would
/// freeze the count on long books.
pub const RESOURCE_BUFFER_SIZE: u32 = 100_000;

/// `"loading"` while the document is incomplete or an eagerly loaded image is
/// still in flight, otherwise the number of resources fetched so far. Two
/// equal consecutive readings mean the network went quiet.
///
/// The resource timing buffer is raised to [`RESOURCE_BUFFER_SIZE`] on every
/// call, so the count keeps growing past the browser default.
pub const NETWORK_ACTIVITY: &str = "(() => { \
	performance.setResourceTimingBufferSize(100000); \
	if (document.readyState !== 'complete') { return 'loading'; } \
	const pending = Array.from(document.images).some((img) => !img.complete && img.loading !== 'lazy'); \
	return pending ? 'loading' : String(performance.getEntriesByType('resource').length); \
})()";

/// Number of rendered library entries.
pub const LIBRARY_ENTRY_COUNT: &str = "String(document.querySelectorAll('#libraryItems li').length)";

/// Scrolls the window (and the library list, which scrolls on its own) by one viewport height.
pub const SCROLL_ONE_VIEWPORT: &str = "(() => { \
	const list = document.getElementById('libraryItems'); \
	if (list) { list.scrollTop += list.clientHeight || window.innerHeight; } \
	window.scrollBy(0, window.innerHeight); \
	return String(window.scrollY); \
})()";

/// Stylesheet applied before printing. The reader draws the page background
/// and the text layer in separately positioned boxes which drift apart under
/// print layout; pinning both to the page origin realigns them and hides the
/// reader chrome.
pub const PRINT_STYLE_PATCH: &str = "\
#pagination, header, nav, .lu-toolbar, .lu-sidebar { display: none !important; }
html, body { margin: 0 !important; padding: 0 !important; background: #fff !important; }
.lu-page, .lu-page-background, .lu-page-content, .lu-text-layer {
	position: absolute !important;
	top: 0 !important;
	left: 0 !important;
	margin: 0 !important;
	transform: none !important;
}
@page { margin: 0; }
";

/// Expression appending [`PRINT_STYLE_PATCH`] to the document head once.
pub fn inject_style(css: &str) -> String {
	format!(
		"(() => {{ \
			if (document.getElementById('edubase-dl-style')) {{ return 'present'; }} \
			const style = document.createElement('style'); \
			style.id = 'edubase-dl-style'; \
			style.textContent = {css}; \
			document.head.appendChild(style); \
			return 'injected'; \
		}})()",
		css = js_string(css)
	)
}

/// `"true"` when at least one element matches `selector`.
pub fn selector_present(selector: &str) -> String {
	format!("String(document.querySelector({}) !== null)", js_string(selector))
}

/// Quotes `value` as a JavaScript string literal.
pub fn js_string(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);
	out.push('\'');
	for c in value.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'\'' => out.push_str("\\'"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'\u{2028}' => out.push_str("\\u2028"),
			'\u{2029}' => out.push_str("\\u2029"),
			c => out.push(c),
		}
	}
	out.push('\'');
	out
}
