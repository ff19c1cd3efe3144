//! Run configuration.
//!
//! Every struct carries the defaults the reader needs in practice; the CLI
//! overrides individual fields with the `with_*` builders.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::wait::PollPolicy;

/// User agent of a current desktop Chrome on Windows.
pub const DEFAULT_USER_AGENT: &str =
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Account credentials, immutable once built.
#[derive(Clone)]
pub struct Credentials {
	username: String,
	password: String,
}

impl Credentials {
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
		}
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn password(&self) -> &str {
		&self.password
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// How the browser is launched.
#[derive(Debug, Clone, Serialize)]
pub struct SessionConfig {
	/// Run without a visible window.
	pub headless: bool,
	/// Browser binary; discovered on the system when `None`.
	pub executable_path: Option<PathBuf>,
	/// User agent of the isolated context.
	pub user_agent: String,
	/// Bound on a single navigation.
	pub navigation_timeout: Duration,
	/// Bound on a single CDP request.
	pub request_timeout: Duration,
	/// Window size in CSS pixels.
	pub window_size: (u32, u32),
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			headless: true,
			executable_path: None,
			user_agent: DEFAULT_USER_AGENT.to_string(),
			navigation_timeout: Duration::from_secs(60),
			request_timeout: Duration::from_secs(30),
			window_size: (1280, 1800),
		}
	}
}

impl SessionConfig {
	/// Sets headless/headful mode.
	pub fn with_headless(mut self, headless: bool) -> Self {
		self.headless = headless;
		self
	}

	/// Sets an explicit browser binary.
	pub fn with_executable_path(mut self, path: Option<PathBuf>) -> Self {
		self.executable_path = path;
		self
	}

	/// Sets the context user agent.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();
		self
	}
}

/// Timing of the login flow.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOptions {
	/// Network-idle detection after opening the login popup.
	pub idle: PollPolicy,
	/// Pause after the popup went idle; the app keeps rendering after that.
	pub settle: Duration,
	/// Pause between typing the credentials and submitting.
	pub pre_submit: Duration,
	/// Polling of the post-login signal.
	pub signal: PollPolicy,
}

impl Default for LoginOptions {
	fn default() -> Self {
		Self {
			idle: PollPolicy::NETWORK_IDLE,
			settle: Duration::from_secs(3),
			pre_submit: Duration::from_secs(1),
			signal: PollPolicy::new(Duration::from_millis(500), 60),
		}
	}
}

/// Timing of the library scan.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogOptions {
	/// Polling for the first rendered library entry.
	pub ready: PollPolicy,
	/// Upper bound on scroll gestures used to defeat lazy loading.
	pub max_scroll_iterations: u32,
	/// Pause after each scroll gesture before re-counting.
	pub scroll_pause: Duration,
	/// Pause after the last scroll before reading the catalog.
	pub settle: Duration,
}

impl Default for CatalogOptions {
	fn default() -> Self {
		Self {
			ready: PollPolicy::new(Duration::from_millis(500), 60),
			max_scroll_iterations: 100,
			scroll_pause: Duration::from_millis(300),
			settle: Duration::from_secs(1),
		}
	}
}

/// Timing and rendering switches of the page capture.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOptions {
	/// Network-idle detection after each navigation.
	pub idle: PollPolicy,
	/// Pause after the first page went idle, before reading the pagination.
	pub initial_settle: Duration,
	/// Pause after each page went idle, before printing it.
	pub page_settle: Duration,
	/// Inject the print stylesheet and emulate print media.
	pub css_patch: bool,
}

impl Default for CaptureOptions {
	fn default() -> Self {
		Self {
			idle: PollPolicy::NETWORK_IDLE,
			initial_settle: Duration::from_secs(1),
			page_settle: Duration::from_millis(750),
			css_patch: true,
		}
	}
}

impl CaptureOptions {
	/// Sets the per-page settle delay.
	pub fn with_page_settle(mut self, delay: Duration) -> Self {
		self.page_settle = delay;
		self
	}

	/// Enables or disables the print stylesheet patch.
	pub fn with_css_patch(mut self, enabled: bool) -> Self {
		self.css_patch = enabled;
		self
	}
}

/// Complete configuration of one run.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadConfig {
	pub session: SessionConfig,
	pub login: LoginOptions,
	pub catalog: CatalogOptions,
	pub capture: CaptureOptions,
	/// Download every document instead of asking for one.
	pub download_all: bool,
	/// Leave the books every account starts with out of the selection.
	pub skip_default_documents: bool,
	/// Directory receiving `<id>.pdf` files.
	pub output_dir: PathBuf,
}

impl Default for DownloadConfig {
	fn default() -> Self {
		Self {
			session: SessionConfig::default(),
			login: LoginOptions::default(),
			catalog: CatalogOptions::default(),
			capture: CaptureOptions::default(),
			download_all: false,
			skip_default_documents: false,
			output_dir: PathBuf::from("."),
		}
	}
}

impl DownloadConfig {
	pub fn with_session(mut self, session: SessionConfig) -> Self {
		self.session = session;
		self
	}

	pub fn with_capture(mut self, capture: CaptureOptions) -> Self {
		self.capture = capture;
		self
	}

	pub fn with_download_all(mut self, all: bool) -> Self {
		self.download_all = all;
		self
	}

	pub fn with_skip_default_documents(mut self, skip: bool) -> Self {
		self.skip_default_documents = skip;
		self
	}

	pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.output_dir = dir.into();
		self
	}

	/// `file_name` inside the output directory.
	pub fn output_path(&self, file_name: &str) -> PathBuf {
		self.output_dir.join(file_name)
	}
}
