//! URL templates of the reader application.

/// Origin of the hosted reader.
pub const BASE_URL: &str = "https://app.edubase.ch";

/// Landing page with the login popup opened.
pub fn login_url() -> String {
	format!("{BASE_URL}/#promo?popup=login")
}

/// Reader view of `page` (1-based) inside document `document_id`.
pub fn reader_url(document_id: &str, page: u32) -> String {
	format!("{BASE_URL}/#doc/{document_id}/{page}")
}
