//! Chromium-backed [`ReaderPage`] over the DevTools protocol.

mod browser_finder;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetEmulatedMediaParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use self::browser_finder::find_chrome_executable;
use crate::config::SessionConfig;
use crate::driver::{DriverError, DriverResult, Launcher, ReaderPage};

/// Launches a local Chrome/Chromium process per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

#[async_trait]
impl Launcher for ChromeLauncher {
	async fn launch(&self, config: &SessionConfig) -> DriverResult<Box<dyn ReaderPage>> {
		let executable = config.executable_path.clone().or_else(find_chrome_executable);
		debug!(
			target = "edubase.session",
			headless = config.headless,
			executable = ?executable,
			"launching browser"
		);

		let (width, height) = config.window_size;
		let mut builder = BrowserConfig::builder()
			.request_timeout(config.request_timeout)
			.window_size(width, height)
			.arg("--no-first-run")
			.arg("--no-default-browser-check");
		if !config.headless {
			builder = builder.with_head();
		}
		if let Some(path) = &executable {
			builder = builder.chrome_executable(path);
		}
		let browser_config = builder.build().map_err(DriverError::Launch)?;

		let (mut browser, mut handler) = Browser::launch(browser_config).await?;
		let events = tokio::spawn(async move {
			while let Some(event) = handler.next().await {
				if let Err(err) = event {
					debug!(target = "edubase.session", error = %err, "devtools handler error");
				}
			}
		});

		match open_isolated_page(&mut browser, config).await {
			Ok(page) => Ok(Box::new(ChromePage {
				browser,
				page,
				events,
				navigation_timeout: config.navigation_timeout,
			})),
			Err(err) => {
				if let Err(close_err) = shutdown(&mut browser, &events).await {
					warn!(target = "edubase.session", error = %close_err, "browser cleanup after failed setup");
				}
				Err(err)
			}
		}
	}
}

async fn open_isolated_page(browser: &mut Browser, config: &SessionConfig) -> DriverResult<Page> {
	let context_id = browser.create_browser_context(CreateBrowserContextParams::default()).await?;
	let target = CreateTargetParams::builder()
		.url("about:blank")
		.browser_context_id(context_id)
		.build()
		.map_err(DriverError::Launch)?;
	let page = browser.new_page(target).await?;
	page.execute(SetUserAgentOverrideParams::new(config.user_agent.clone())).await?;
	Ok(page)
}

async fn shutdown(browser: &mut Browser, events: &JoinHandle<()>) -> DriverResult<()> {
	let closed = browser.close().await.map(|_| ());
	let waited = browser.wait().await.map(|_| ());
	events.abort();
	closed?;
	waited?;
	Ok(())
}

/// One page in an isolated context of a browser this session owns.
pub struct ChromePage {
	browser: Browser,
	page: Page,
	events: JoinHandle<()>,
	navigation_timeout: std::time::Duration,
}

#[async_trait]
impl ReaderPage for ChromePage {
	async fn goto(&self, url: &str) -> DriverResult<()> {
		match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
			Ok(Ok(_)) => Ok(()),
			Ok(Err(err)) => Err(DriverError::Navigation {
				url: url.to_string(),
				reason: err.to_string(),
			}),
			Err(_) => Err(DriverError::Timeout {
				ms: u64::try_from(self.navigation_timeout.as_millis()).unwrap_or(u64::MAX),
				condition: format!("navigation to {url}"),
			}),
		}
	}

	async fn evaluate_value(&self, expression: &str) -> DriverResult<String> {
		let params = EvaluateParams::builder()
			.expression(expression)
			.return_by_value(true)
			.await_promise(true)
			.build()
			.map_err(DriverError::Script)?;
		let result = self
			.page
			.evaluate_expression(params)
			.await
			.map_err(|e| DriverError::Script(e.to_string()))?;
		Ok(match result.value() {
			Some(Value::String(s)) => s.clone(),
			Some(Value::Null) | None => String::new(),
			Some(other) => other.to_string(),
		})
	}

	async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()> {
		let element = self.page.find_element(selector).await.map_err(|e| element_error(selector, e))?;
		element.click().await.map_err(|e| element_error(selector, e))?;
		element.type_str(text).await.map_err(|e| element_error(selector, e))?;
		Ok(())
	}

	async fn click(&self, selector: &str) -> DriverResult<()> {
		let element = self.page.find_element(selector).await.map_err(|e| element_error(selector, e))?;
		element.click().await.map_err(|e| element_error(selector, e))?;
		Ok(())
	}

	async fn emulate_print_media(&self) -> DriverResult<()> {
		self.page.execute(SetEmulatedMediaParams::builder().media("print").build()).await?;
		Ok(())
	}

	async fn print_pdf(&self) -> DriverResult<Vec<u8>> {
		let params = PrintToPdfParams {
			print_background: Some(true),
			prefer_css_page_size: Some(true),
			..Default::default()
		};
		Ok(self.page.pdf(params).await?)
	}

	async fn close(self: Box<Self>) -> DriverResult<()> {
		let ChromePage {
			mut browser, page, events, ..
		} = *self;
		if let Err(err) = page.close().await {
			debug!(target = "edubase.session", error = %err, "page close failed, closing browser anyway");
		}
		shutdown(&mut browser, &events).await
	}
}

fn element_error(selector: &str, err: impl std::fmt::Display) -> DriverError {
	DriverError::Element {
		selector: selector.to_string(),
		reason: err.to_string(),
	}
}
