//! Catalog entry type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Books every account owns from the start.
pub const DEFAULT_DOCUMENT_IDS: &[&str] = &["12849", "5317", "59767", "58311", "58216"];

/// One book visible in the library of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
	/// Numeric id used in reader URLs and output file names.
	pub id: String,
	/// Display title, when the library entry carries one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

impl Document {
	pub fn new(id: impl Into<String>, title: Option<String>) -> Self {
		Self { id: id.into(), title }
	}

	/// File name of the assembled book, `<id>.pdf`.
	pub fn file_name(&self) -> String {
		format!("{}.pdf", self.id)
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.title {
			Some(title) => write!(f, "{} ({})", self.id, title),
			None => f.write_str(&self.id),
		}
	}
}

/// Whether `id` is one of [`DEFAULT_DOCUMENT_IDS`].
pub fn is_default_document(id: &str) -> bool {
	DEFAULT_DOCUMENT_IDS.contains(&id)
}
