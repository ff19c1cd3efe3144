use std::io::{self, Write};

use clap::ValueEnum;
use edubase::{BatchReport, DocumentOutcome};

/// Format of the batch report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// One status line per document
	#[default]
	Text,
	/// JSON summary
	Json,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

/// Writes `report` to `out`.
pub fn print_report(report: &BatchReport, format: OutputFormat, out: &mut dyn Write) -> io::Result<()> {
	match format {
		OutputFormat::Json => {
			serde_json::to_writer_pretty(&mut *out, &report.summary())?;
			writeln!(out)
		}
		OutputFormat::Text => print_text(report, out),
	}
}

fn print_text(report: &BatchReport, out: &mut dyn Write) -> io::Result<()> {
	for (document, outcome) in report.entries() {
		match outcome {
			DocumentOutcome::Downloaded { path, pages } => {
				writeln!(out, "[+] {document}: {pages} pages saved to {}", path.display())?;
			}
			DocumentOutcome::Skipped { path } => {
				writeln!(out, "[-] {document}: {} already exists", path.display())?;
			}
			DocumentOutcome::Failed { error } => {
				writeln!(out, "[!] {document}: {}: {error}", error.marker())?;
			}
		}
	}
	writeln!(
		out,
		"{} downloaded, {} skipped, {} failed",
		report.downloaded(),
		report.skipped(),
		report.failed()
	)
}

#[cfg(test)]
mod tests {
	use edubase::{Document, Error};

	use super::*;

	fn report() -> BatchReport {
		let mut report = BatchReport::default();
		report.record(
			Document::new("5317", Some("Biologie".into())),
			DocumentOutcome::Downloaded {
				path: "out/5317.pdf".into(),
				pages: 3,
			},
		);
		report.record(Document::new("12849", None), DocumentOutcome::Skipped { path: "out/12849.pdf".into() });
		report.record(
			Document::new("70001", None),
			DocumentOutcome::Failed {
				error: Error::Assembly {
					path: "out/70001.pdf".into(),
					reason: "disk full".into(),
				},
			},
		);
		report
	}

	#[test]
	fn text_report_has_one_line_per_document() {
		let mut out = Vec::new();
		print_report(&report(), OutputFormat::Text, &mut out).unwrap();
		let text = String::from_utf8(out).unwrap();
		let lines: Vec<_> = text.lines().collect();
		assert_eq!(
			lines,
			[
				"[+] 5317 (Biologie): 3 pages saved to out/5317.pdf",
				"[-] 12849: out/12849.pdf already exists",
				"[!] 70001: There was an error during download: assembly of out/70001.pdf failed: disk full",
				"1 downloaded, 1 skipped, 1 failed",
			]
		);
	}

	#[test]
	fn json_report_is_the_summary() {
		let mut out = Vec::new();
		print_report(&report(), OutputFormat::Json, &mut out).unwrap();
		let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
		assert_eq!(json["ok"], false);
		assert_eq!(json["downloaded"], 1);
		assert_eq!(json["documents"][1]["status"], "skipped");
	}
}
