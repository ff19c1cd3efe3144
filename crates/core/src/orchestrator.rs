//! Batch driver: login, scan, selection, then one download per target.

use std::io;

use async_trait::async_trait;
use edubase_protocol::{Document, is_default_document};
use tracing::{debug, info, warn};

use crate::assemble::DocumentAssembler;
use crate::capture::capture;
use crate::catalog::list_documents;
use crate::config::{Credentials, DownloadConfig};
use crate::driver::{Launcher, ReaderPage};
use crate::error::{Error, Result};
use crate::report::{BatchReport, DocumentOutcome};
use crate::session::Session;

/// Interactive choice of a single document.
#[async_trait]
pub trait SelectionPrompt: Send {
	/// Presents `documents` and reads one answer.
	///
	/// A closed input stream is reported as [`io::ErrorKind::UnexpectedEof`].
	async fn ask(&mut self, documents: &[Document]) -> io::Result<String>;

	/// Called when an answer names no listed document, before asking again.
	fn rejected(&mut self, _input: &str) {}
}

/// Runs a whole batch in one browser session.
pub struct Orchestrator<L> {
	launcher: L,
	config: DownloadConfig,
}

impl<L: Launcher> Orchestrator<L> {
	pub fn new(launcher: L, config: DownloadConfig) -> Self {
		Self { launcher, config }
	}

	pub fn config(&self) -> &DownloadConfig {
		&self.config
	}

	/// Logs in, scans the library, downloads the selected documents and
	/// closes the session.
	///
	/// Only fatal errors are returned; per-document failures end up in the
	/// report. Once the browser launched, it is closed on every path.
	pub async fn run(&self, credentials: &Credentials, prompt: &mut dyn SelectionPrompt) -> Result<BatchReport> {
		let session = Session::open(&self.launcher, &self.config.session).await?;
		let result = self.run_in(&session, credentials, prompt).await;
		session.close().await;
		result
	}

	async fn run_in(&self, session: &Session, credentials: &Credentials, prompt: &mut dyn SelectionPrompt) -> Result<BatchReport> {
		session.authenticate(credentials, &self.config.login).await?;
		let documents = list_documents(session.page(), &self.config.catalog).await?;
		let targets = select_targets(&documents, &self.config, prompt).await?;

		let mut report = BatchReport::default();
		for document in targets {
			let outcome = self.download(session.page(), &document).await;
			report.record(document, outcome);
		}

		info!(
			target = "edubase",
			downloaded = report.downloaded(),
			skipped = report.skipped(),
			failed = report.failed(),
			"batch finished"
		);
		Ok(report)
	}

	async fn download(&self, page: &dyn ReaderPage, document: &Document) -> DocumentOutcome {
		let path = self.config.output_path(&document.file_name());
		if path.exists() {
			info!(target = "edubase", document = %document.id, path = %path.display(), "already downloaded, skipping");
			return DocumentOutcome::Skipped { path };
		}

		info!(target = "edubase", document = %document, "downloading");
		let mut assembler = DocumentAssembler::new(&path);
		let result = match capture(page, &document.id, &self.config.capture, &mut assembler).await {
			Ok(_) => assembler.finish(),
			Err(err) => Err(err),
		};

		match result {
			Ok(pages) => DocumentOutcome::Downloaded { path, pages },
			Err(error) => {
				warn!(target = "edubase", document = %document.id, error = %error, "download failed");
				DocumentOutcome::Failed { error }
			}
		}
	}
}

/// Picks the documents to download from the scanned catalog.
///
/// In batch mode every candidate is taken. Otherwise `prompt` is asked until
/// it answers with a listed id; closing its input ends the run.
pub async fn select_targets(documents: &[Document], config: &DownloadConfig, prompt: &mut dyn SelectionPrompt) -> Result<Vec<Document>> {
	let candidates: Vec<Document> = documents
		.iter()
		.filter(|document| !(config.skip_default_documents && is_default_document(&document.id)))
		.cloned()
		.collect();
	debug!(
		target = "edubase",
		scanned = documents.len(),
		candidates = candidates.len(),
		"selection candidates"
	);

	if config.download_all {
		return Ok(candidates);
	}
	if candidates.is_empty() {
		return Err(Error::Scan("no documents left to choose from".into()));
	}

	loop {
		let answer = prompt.ask(&candidates).await.map_err(|e| match e.kind() {
			io::ErrorKind::UnexpectedEof => Error::Prompt("input closed".into()),
			_ => Error::Prompt(e.to_string()),
		})?;
		let answer = answer.trim();
		if let Some(document) = candidates.iter().find(|document| document.id == answer) {
			return Ok(vec![document.clone()]);
		}
		debug!(target = "edubase", input = answer, "unknown document id");
		prompt.rejected(answer);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::VecDeque;

	use super::*;

	struct Answers {
		queue: VecDeque<&'static str>,
		rejected: Vec<String>,
	}

	impl Answers {
		fn new(answers: &[&'static str]) -> Self {
			Self {
				queue: answers.iter().copied().collect(),
				rejected: Vec::new(),
			}
		}
	}

	#[async_trait]
	impl SelectionPrompt for Answers {
		async fn ask(&mut self, _documents: &[Document]) -> io::Result<String> {
			self.queue
				.pop_front()
				.map(str::to_string)
				.ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
		}

		fn rejected(&mut self, input: &str) {
			self.rejected.push(input.to_string());
		}
	}

	fn catalog() -> Vec<Document> {
		vec![
			Document::new("5317", Some("Biologie".into())),
			Document::new("70001", None),
			Document::new("70002", None),
		]
	}

	#[tokio::test]
	async fn download_all_takes_every_document() {
		let config = DownloadConfig::default().with_download_all(true);
		let targets = select_targets(&catalog(), &config, &mut Answers::new(&[])).await.unwrap();
		assert_eq!(targets, catalog());
	}

	#[tokio::test]
	async fn skip_defaults_filters_account_defaults() {
		let config = DownloadConfig::default()
			.with_download_all(true)
			.with_skip_default_documents(true);
		let targets = select_targets(&catalog(), &config, &mut Answers::new(&[])).await.unwrap();
		let ids: Vec<_> = targets.iter().map(|d| d.id.as_str()).collect();
		assert_eq!(ids, ["70001", "70002"]);
	}

	#[tokio::test]
	async fn invalid_answers_are_asked_again() {
		let mut prompt = Answers::new(&["abc", "99", " 70002\n"]);
		let targets = select_targets(&catalog(), &DownloadConfig::default(), &mut prompt)
			.await
			.unwrap();
		assert_eq!(targets, vec![Document::new("70002", None)]);
		assert_eq!(prompt.rejected, ["abc", "99"]);
	}

	#[tokio::test]
	async fn skipped_default_is_not_selectable() {
		let config = DownloadConfig::default().with_skip_default_documents(true);
		let mut prompt = Answers::new(&["5317", "70001"]);
		let targets = select_targets(&catalog(), &config, &mut prompt).await.unwrap();
		assert_eq!(targets[0].id, "70001");
		assert_eq!(prompt.rejected, ["5317"]);
	}

	#[tokio::test]
	async fn closed_input_is_fatal() {
		let err = select_targets(&catalog(), &DownloadConfig::default(), &mut Answers::new(&["nope"]))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::Prompt(_)));
		assert!(err.is_fatal());
	}

	#[tokio::test]
	async fn nothing_left_to_choose_is_a_scan_error() {
		let config = DownloadConfig::default().with_skip_default_documents(true);
		let defaults = vec![Document::new("5317", None)];
		let err = select_targets(&defaults, &config, &mut Answers::new(&["5317"])).await.unwrap_err();
		assert!(matches!(err, Error::Scan(_)));
	}
}
