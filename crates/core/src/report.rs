//! Per-document outcomes of a batch.

use std::path::PathBuf;

use edubase_protocol::Document;
use serde::Serialize;

use crate::error::Error;

/// What happened to one targeted document.
#[derive(Debug)]
pub enum DocumentOutcome {
	Downloaded { path: PathBuf, pages: usize },
	/// The artifact already existed and was left as is.
	Skipped { path: PathBuf },
	Failed { error: Error },
}

impl DocumentOutcome {
	pub fn status(&self) -> OutcomeStatus {
		match self {
			Self::Downloaded { .. } => OutcomeStatus::Downloaded,
			Self::Skipped { .. } => OutcomeStatus::Skipped,
			Self::Failed { .. } => OutcomeStatus::Failed,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
	Downloaded,
	Skipped,
	Failed,
}

/// Outcomes in target order.
#[derive(Debug, Default)]
pub struct BatchReport {
	entries: Vec<(Document, DocumentOutcome)>,
}

impl BatchReport {
	pub fn record(&mut self, document: Document, outcome: DocumentOutcome) {
		self.entries.push((document, outcome));
	}

	pub fn entries(&self) -> &[(Document, DocumentOutcome)] {
		&self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn downloaded(&self) -> usize {
		self.count(OutcomeStatus::Downloaded)
	}

	pub fn skipped(&self) -> usize {
		self.count(OutcomeStatus::Skipped)
	}

	pub fn failed(&self) -> usize {
		self.count(OutcomeStatus::Failed)
	}

	/// Outcome recorded for `document_id`, if it was targeted.
	pub fn outcome(&self, document_id: &str) -> Option<&DocumentOutcome> {
		self.entries
			.iter()
			.find(|(document, _)| document.id == document_id)
			.map(|(_, outcome)| outcome)
	}

	pub fn summary(&self) -> ReportSummary {
		ReportSummary {
			ok: self.failed() == 0,
			downloaded: self.downloaded(),
			skipped: self.skipped(),
			failed: self.failed(),
			documents: self.entries.iter().map(|(document, outcome)| DocumentSummary::new(document, outcome)).collect(),
		}
	}

	fn count(&self, status: OutcomeStatus) -> usize {
		self.entries.iter().filter(|(_, outcome)| outcome.status() == status).count()
	}
}

/// Serializable view of a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
	pub ok: bool,
	pub downloaded: usize,
	pub skipped: usize,
	pub failed: usize,
	pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
	pub id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	pub status: OutcomeStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub path: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pages: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl DocumentSummary {
	fn new(document: &Document, outcome: &DocumentOutcome) -> Self {
		let mut summary = Self {
			id: document.id.clone(),
			title: document.title.clone(),
			status: outcome.status(),
			path: None,
			pages: None,
			error: None,
		};
		match outcome {
			DocumentOutcome::Downloaded { path, pages } => {
				summary.path = Some(path.clone());
				summary.pages = Some(*pages);
			}
			DocumentOutcome::Skipped { path } => summary.path = Some(path.clone()),
			DocumentOutcome::Failed { error } => summary.error = Some(error.to_string()),
		}
		summary
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> BatchReport {
		let mut report = BatchReport::default();
		report.record(
			Document::new("5317", Some("Biologie".into())),
			DocumentOutcome::Downloaded {
				path: "5317.pdf".into(),
				pages: 12,
			},
		);
		report.record(
			Document::new("59767", None),
			DocumentOutcome::Failed {
				error: Error::capture("59767", "timed out"),
			},
		);
		report.record(Document::new("12849", None), DocumentOutcome::Skipped { path: "12849.pdf".into() });
		report
	}

	#[test]
	fn counts_by_status() {
		let report = sample();
		assert_eq!(report.downloaded(), 1);
		assert_eq!(report.failed(), 1);
		assert_eq!(report.skipped(), 1);
		assert!(matches!(report.outcome("59767"), Some(DocumentOutcome::Failed { .. })));
		assert!(report.outcome("1").is_none());
	}

	#[test]
	fn summary_serializes_per_document_fields() {
		let json = serde_json::to_value(sample().summary()).unwrap();
		assert_eq!(json["ok"], false);
		assert_eq!(json["documents"][0]["status"], "downloaded");
		assert_eq!(json["documents"][0]["pages"], 12);
		assert_eq!(json["documents"][1]["error"], "capture of document 59767 failed: timed out");
		assert!(json["documents"][2].get("title").is_none());
	}
}
