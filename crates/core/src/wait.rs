//! Bounded polling waits.
//!
//! Network idle is a weak render signal for the reader, so every wait is a
//! readiness predicate polled at a fixed interval for a fixed number of
//! attempts. The worst-case latency of a wait is `interval * max_attempts`.

use std::future::Future;
use std::time::Duration;

use edubase_protocol::scripts;
use serde::Serialize;
use tracing::{debug, trace};

use crate::driver::{DriverError, DriverResult, ReaderPage};

/// Interval and attempt budget of a polling wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollPolicy {
	pub interval: Duration,
	pub max_attempts: u32,
}

impl PollPolicy {
	/// 250ms quiet window, 30s budget.
	pub const NETWORK_IDLE: Self = Self::new(Duration::from_millis(250), 120);

	pub const fn new(interval: Duration, max_attempts: u32) -> Self {
		Self { interval, max_attempts }
	}

	/// Worst-case time spent polling.
	pub fn budget(&self) -> Duration {
		self.interval.saturating_mul(self.max_attempts)
	}

	fn timeout(&self, condition: &str) -> DriverError {
		DriverError::Timeout {
			ms: u64::try_from(self.budget().as_millis()).unwrap_or(u64::MAX),
			condition: condition.to_string(),
		}
	}
}

/// Polls `check` until it yields `Some`, sleeping `policy.interval` between
/// attempts.
///
/// Errors from `check` count as "not ready yet" and are logged at debug. The
/// wait fails with [`DriverError::Timeout`] once the attempts are spent.
pub async fn poll_until<T, F, Fut>(policy: PollPolicy, condition: &str, mut check: F) -> DriverResult<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = DriverResult<Option<T>>>,
{
	for attempt in 1..=policy.max_attempts.max(1) {
		match check().await {
			Ok(Some(value)) => {
				trace!(target = "edubase.wait", %condition, attempt, "condition met");
				return Ok(value);
			}
			Ok(None) => {}
			Err(err) => debug!(target = "edubase.wait", %condition, attempt, error = %err, "readiness check failed"),
		}
		tokio::time::sleep(policy.interval).await;
	}

	Err(policy.timeout(condition))
}

/// Waits until at least one element matches `selector`.
pub async fn wait_for_selector(page: &dyn ReaderPage, selector: &str, policy: PollPolicy) -> DriverResult<()> {
	let script = scripts::selector_present(selector);
	let script = script.as_str();
	poll_until(policy, selector, move || async move {
		let present = page.evaluate_value(script).await?;
		Ok((present == "true").then_some(()))
	})
	.await
}

/// Waits until the document is complete, no eager image is in flight and no
/// new resources were fetched between two consecutive polls.
pub async fn wait_for_network_idle(page: &dyn ReaderPage, policy: PollPolicy) -> DriverResult<()> {
	let mut previous: Option<String> = None;

	for attempt in 1..=policy.max_attempts.max(1) {
		match page.evaluate_value(scripts::NETWORK_ACTIVITY).await {
			Ok(reading) if reading != "loading" => {
				if previous.as_deref() == Some(reading.as_str()) {
					trace!(target = "edubase.wait", attempt, resources = %reading, "network idle");
					return Ok(());
				}
				previous = Some(reading);
			}
			Ok(_) => previous = None,
			Err(err) => {
				debug!(target = "edubase.wait", attempt, error = %err, "network activity probe failed");
				previous = None;
			}
		}
		tokio::time::sleep(policy.interval).await;
	}

	Err(policy.timeout("network idle"))
}

/// Sleeps for `delay` unless it is zero.
pub async fn settle(delay: Duration) {
	if !delay.is_zero() {
		tokio::time::sleep(delay).await;
	}
}
