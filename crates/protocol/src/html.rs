//! Small regex-based HTML helpers for the login signal parser.
//!
//! The login page's markup is shallow and machine-generated, so pattern
//! matching on serialized HTML is enough; nothing here tries to be a general
//! parser. Parsers that need attributes or nested text get them from the
//! browser as JSON instead.

use std::sync::LazyLock;

use regex_lite::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG_RE should compile"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#([xX]?)([0-9a-fA-F]+);").expect("NUMERIC_ENTITY_RE should compile"));
static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("MULTI_SPACE regex should compile"));

/// Decode the named entities the reader emits plus any numeric reference.
pub(crate) fn decode_html_entities(s: &str) -> String {
	let named = s
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&apos;", "'")
		.replace("&nbsp;", " ");

	let numeric = NUMERIC_ENTITY_RE.replace_all(&named, |caps: &regex_lite::Captures<'_>| {
		let radix = if caps[1].is_empty() { 10 } else { 16 };
		u32::from_str_radix(&caps[2], radix)
			.ok()
			.and_then(char::from_u32)
			.map(String::from)
			.unwrap_or_else(|| caps[0].to_string())
	});

	// `&amp;` last so that "&amp;lt;" stays "&lt;"
	numeric.replace("&amp;", "&")
}

/// Trims `text` and folds every whitespace run into one space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
	MULTI_SPACE.replace_all(text.trim(), " ").to_string()
}

/// Text content of an HTML fragment with whitespace collapsed.
pub(crate) fn text_content(html: &str) -> String {
	let stripped = TAG_RE.replace_all(html, " ");
	collapse_whitespace(&decode_html_entities(&stripped))
}

/// Inner HTML of the first container element carrying `id`.
pub(crate) fn inner_html_by_id<'h>(html: &'h str, id: &str) -> Option<&'h str> {
	for tag in ["div", "ul", "ol", "nav", "section", "footer", "span"] {
		let pattern = format!(
			r#"(?is)<{tag}\b[^>]*\bid=["']{id}["'][^>]*>(.*?)</{tag}>"#,
			tag = tag,
			id = regex_lite::escape(id)
		);
		if let Ok(re) = Regex::new(&pattern) {
			if let Some(m) = re.captures(html).and_then(|caps| caps.get(1)) {
				return Some(m.as_str());
			}
		}
	}
	None
}

/// Text following the first opening tag whose class list contains `class`,
/// up to the next closing tag.
///
/// `class` must be a whole entry of the list: `alert` does not match
/// `alert-danger`.
pub(crate) fn text_after_class(html: &str, class: &str) -> Option<String> {
	let pattern = format!(
		r#"(?is)<[a-z][a-z0-9]*\b[^>]*\bclass=(?:"(?:[^"]*\s)?{0}(?:\s[^"]*)?"|'(?:[^']*\s)?{0}(?:\s[^']*)?')[^>]*>"#,
		regex_lite::escape(class)
	);
	let re = Regex::new(&pattern).ok()?;
	let open = re.find(html)?;
	let rest = &html[open.end()..];
	let end = rest.find("</").unwrap_or(rest.len());
	Some(text_content(&rest[..end]))
}
