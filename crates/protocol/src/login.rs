//! Post-login state detection.
//!
//! After the credentials are submitted the application either renders the
//! library (at least one entry in `#libraryItems`) or keeps the popup open and
//! flags the form with an error class.

use crate::html::{inner_html_by_id, text_after_class};
use crate::probe::{Probe, ProbeError};
use crate::selectors::{LIBRARY_CONTAINER_ID, LOGIN_ERROR_CLASSES};

/// What the page says about the login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginSignal {
	/// The library rendered at least one entry.
	Authenticated,
	/// The login form reported an error; carries its message (possibly empty).
	Rejected(String),
	/// Neither signal is visible yet.
	Pending,
}

/// Classifies a serialized `<body>`.
pub fn parse_login_signal(body: &str) -> LoginSignal {
	if inner_html_by_id(body, LIBRARY_CONTAINER_ID).is_some_and(|inner| inner.contains("<li")) {
		return LoginSignal::Authenticated;
	}

	LOGIN_ERROR_CLASSES
		.iter()
		.find_map(|class| text_after_class(body, class))
		.map_or(LoginSignal::Pending, LoginSignal::Rejected)
}

/// Serializes the current `<body>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginSignalProbe;

impl Probe for LoginSignalProbe {
	type Output = LoginSignal;

	fn name(&self) -> &'static str {
		"login-signal"
	}

	fn script(&self) -> &'static str {
		"document.body ? document.body.outerHTML : ''"
	}

	fn parse(&self, raw: &str) -> Result<LoginSignal, ProbeError> {
		Ok(parse_login_signal(raw))
	}
}
