use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use edubase::{CaptureOptions, DownloadConfig, SessionConfig};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "edubase-dl")]
#[command(about = "Download books from the Edubase reader as PDF files")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8,

	/// Edubase login (e-mail address)
	#[arg(short, long)]
	pub username: String,

	/// Edubase password; asked for on stdin when omitted
	#[arg(short, long)]
	pub password: Option<String>,

	/// Chrome or Chromium binary to drive instead of the discovered one
	#[arg(short, long, value_name = "PATH")]
	pub chrome_path: Option<PathBuf>,

	/// Download every book in the library instead of asking for one
	#[arg(short, long)]
	pub all: bool,

	/// Show the browser window
	#[arg(short, long)]
	pub show: bool,

	/// Print pages without the layout fix stylesheet
	#[arg(long)]
	pub disable_css_patch: bool,

	/// Seconds to let each page render before printing it
	#[arg(long, value_name = "SECONDS", default_value = "0.75", value_parser = parse_delay)]
	pub page_delay: Duration,

	/// Leave the books every account starts with out of the selection
	#[arg(long)]
	pub skip_defaults: bool,

	/// Directory receiving the <id>.pdf files
	#[arg(short, long, value_name = "DIR", default_value = ".")]
	pub output_dir: PathBuf,

	/// User agent of the browser context
	#[arg(long, value_name = "UA")]
	pub user_agent: Option<String>,

	/// Format of the final report
	#[arg(short, long, value_enum, default_value_t)]
	pub format: OutputFormat,
}

impl Cli {
	pub fn download_config(&self) -> DownloadConfig {
		let mut session = SessionConfig::default()
			.with_headless(!self.show)
			.with_executable_path(self.chrome_path.clone());
		if let Some(user_agent) = &self.user_agent {
			session = session.with_user_agent(user_agent.as_str());
		}
		let capture = CaptureOptions::default()
			.with_page_settle(self.page_delay)
			.with_css_patch(!self.disable_css_patch);

		DownloadConfig::default()
			.with_session(session)
			.with_capture(capture)
			.with_download_all(self.all)
			.with_skip_default_documents(self.skip_defaults)
			.with_output_dir(&self.output_dir)
	}
}

/// Parses a non-negative number of seconds.
pub fn parse_delay(value: &str) -> Result<Duration, String> {
	let seconds: f64 = value
		.trim()
		.parse()
		.map_err(|_| format!("`{value}` is not a number of seconds"))?;
	if !seconds.is_finite() || seconds < 0.0 {
		return Err(format!("`{value}` must be a non-negative number of seconds"));
	}
	Ok(Duration::from_secs_f64(seconds))
}
