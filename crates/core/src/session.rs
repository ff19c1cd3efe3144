//! Browser session lifecycle and login.

use edubase_protocol::{LoginSignal, LoginSignalProbe, selectors, urls};
use tracing::{debug, info, warn};

use crate::config::{Credentials, LoginOptions, SessionConfig};
use crate::driver::{DriverError, Launcher, ProbeFailure, ReaderPage, run_probe};
use crate::error::{Error, Result};
use crate::wait::{poll_until, settle, wait_for_network_idle};

/// An open browser with one page in an isolated context.
///
/// Other stages borrow [`Session::page`]; [`Session::close`] consumes the
/// session so it can run only once.
pub struct Session {
	page: Box<dyn ReaderPage>,
}

impl Session {
	/// Launches the browser and opens the session page.
	pub async fn open(launcher: &dyn Launcher, config: &SessionConfig) -> Result<Self> {
		let page = launcher.launch(config).await.map_err(|e| Error::Setup(e.to_string()))?;
		info!(target = "edubase.session", headless = config.headless, "browser session opened");
		Ok(Self { page })
	}

	pub fn page(&self) -> &dyn ReaderPage {
		self.page.as_ref()
	}

	/// Signs in through the login popup.
	///
	/// A rejection reported by the form is final; a page that shows neither
	/// the library nor an error within the signal budget also fails.
	pub async fn authenticate(&self, credentials: &Credentials, options: &LoginOptions) -> Result<()> {
		let page = self.page();
		let auth = |e: DriverError| Error::Auth(e.to_string());

		info!(target = "edubase.session", user = credentials.username(), "logging in");
		page.goto(&urls::login_url()).await.map_err(auth)?;
		wait_for_network_idle(page, options.idle).await.map_err(auth)?;
		settle(options.settle).await;

		page.type_text(selectors::LOGIN_USERNAME, credentials.username()).await.map_err(auth)?;
		page.type_text(selectors::LOGIN_PASSWORD, credentials.password()).await.map_err(auth)?;
		settle(options.pre_submit).await;
		page.click(selectors::LOGIN_SUBMIT).await.map_err(auth)?;

		let signal = poll_until(options.signal, "login signal", move || async move {
			match run_probe(page, &LoginSignalProbe).await {
				Ok(LoginSignal::Pending) => Ok(None),
				Ok(signal) => Ok(Some(signal)),
				Err(ProbeFailure::Driver(err)) => Err(err),
				Err(ProbeFailure::Parse(err)) => Err(DriverError::Script(err.to_string())),
			}
		})
		.await
		.map_err(|e| Error::Auth(format!("login signal absent: {e}")))?;

		match signal {
			LoginSignal::Authenticated => {
				info!(target = "edubase.session", "login successful");
				Ok(())
			}
			LoginSignal::Rejected(message) if message.is_empty() => Err(Error::Auth("credentials rejected".into())),
			LoginSignal::Rejected(message) => Err(Error::Auth(format!("credentials rejected: {message}"))),
			LoginSignal::Pending => Err(Error::Auth("login signal absent".into())),
		}
	}

	/// Closes page, context and browser. Failures are logged, not returned.
	pub async fn close(self) {
		match self.page.close().await {
			Ok(()) => debug!(target = "edubase.session", "browser session closed"),
			Err(err) => warn!(target = "edubase.session", error = %err, "browser session did not close cleanly"),
		}
	}
}
