//! Scripted reader for pipeline tests.
//!
//! [`FakeReader`] plays the Edubase web app: it answers the in-page scripts
//! the pipeline evaluates, renders the library in lazy batches, and prints
//! small one-page PDFs. Everything the pipeline does is recorded for
//! assertions.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use edubase::driver::{DriverError, DriverResult, Launcher, ReaderPage};
use edubase::{CaptureOptions, CatalogOptions, DownloadConfig, LoginOptions, PollPolicy, SelectionPrompt, SessionConfig};
use edubase_protocol::{CatalogProbe, Document, LoginSignalProbe, PageCountProbe, Probe, extract_document_id, scripts, selectors};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream};
use serde_json::{Value, json};

/// Entries the library renders per scroll.
const LIBRARY_BATCH: usize = 2;

#[derive(Debug, Clone)]
struct Book {
	id: String,
	title: Option<String>,
	pages: u32,
}

/// Everything the pipeline did to the fake browser.
#[derive(Debug, Default, Clone)]
pub struct Recorded {
	pub launches: u32,
	pub closes: u32,
	pub visits: Vec<String>,
	pub typed: Vec<(String, String)>,
	pub clicks: Vec<String>,
	pub printed: Vec<(String, u32)>,
	pub scrolls: usize,
	pub styles_injected: u32,
	pub print_media: u32,
}

impl Recorded {
	/// Whether any navigation targeted `document_id`.
	pub fn visited_document(&self, document_id: &str) -> bool {
		self.visits
			.iter()
			.any(|url| extract_document_id(url).as_deref() == Some(document_id))
	}
}

#[derive(Debug, Default)]
struct State {
	books: Vec<Book>,
	placeholder_entry: bool,
	rejection: Option<String>,
	stall_login: bool,
	fail_launch: bool,
	fail_print: Option<(String, u32)>,
	signed_in: bool,
	current: Option<(String, u32)>,
	recorded: Recorded,
}

/// Builder and handle of the scripted reader.
#[derive(Clone, Default)]
pub struct FakeReader {
	state: Arc<Mutex<State>>,
}

impl FakeReader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a book with `pages` pages to the library.
	pub fn book(self, id: &str, title: Option<&str>, pages: u32) -> Self {
		self.lock().books.push(Book {
			id: id.to_string(),
			title: title.map(str::to_string),
			pages,
		});
		self
	}

	/// Library renders an entry without a document link.
	pub fn placeholder_entry(self) -> Self {
		self.lock().placeholder_entry = true;
		self
	}

	/// Login form answers with an error message.
	pub fn reject_login(self, message: &str) -> Self {
		self.lock().rejection = Some(message.to_string());
		self
	}

	/// Login form keeps spinning after submit: neither the library nor an
	/// error ever shows up.
	pub fn stall_login(self) -> Self {
		self.lock().stall_login = true;
		self
	}

	pub fn fail_launch(self) -> Self {
		self.lock().fail_launch = true;
		self
	}

	/// Printing `page` of `document_id` fails.
	pub fn fail_print(self, document_id: &str, page: u32) -> Self {
		self.lock().fail_print = Some((document_id.to_string(), page));
		self
	}

	/// Starts with the library already rendered.
	pub fn signed_in(self) -> Self {
		self.lock().signed_in = true;
		self
	}

	pub fn launcher(&self) -> FakeLauncher {
		FakeLauncher { state: Arc::clone(&self.state) }
	}

	pub fn recorded(&self) -> Recorded {
		self.lock().recorded.clone()
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		lock(&self.state)
	}
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
	state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct FakeLauncher {
	state: Arc<Mutex<State>>,
}

#[async_trait]
impl Launcher for FakeLauncher {
	async fn launch(&self, _config: &SessionConfig) -> DriverResult<Box<dyn ReaderPage>> {
		let mut state = lock(&self.state);
		if state.fail_launch {
			return Err(DriverError::Launch("no browser binary".into()));
		}
		state.recorded.launches += 1;
		Ok(Box::new(FakePage {
			state: Arc::clone(&self.state),
		}))
	}
}

pub struct FakePage {
	state: Arc<Mutex<State>>,
}

impl FakePage {
	fn visible_entries(state: &State) -> usize {
		let rendered = LIBRARY_BATCH * (state.recorded.scrolls + 1);
		let total = state.books.len() + usize::from(state.placeholder_entry);
		rendered.min(total)
	}

	fn body(state: &State) -> String {
		if state.signed_in {
			let mut items = String::new();
			if state.placeholder_entry {
				items.push_str("<li class=\"hint\">Noch keine Bücher</li>");
			}
			for book in &state.books {
				items.push_str(&format!("<li><a href=\"#doc/{}/1\">{}</a></li>", book.id, book.id));
			}
			return format!("<body><ul id=\"libraryItems\">{items}</ul></body>");
		}
		if state.recorded.clicks.is_empty() {
			return "<body><form class=\"login\"></form></body>".to_string();
		}
		match &state.rejection {
			Some(message) => format!("<body><div class=\"alert alert-danger\">{message}</div></body>"),
			None => "<body><div class=\"spinner\"></div></body>".to_string(),
		}
	}

	fn catalog(state: &State) -> String {
		let anchors: Vec<_> = state
			.books
			.iter()
			.take(Self::visible_entries(state).saturating_sub(usize::from(state.placeholder_entry)))
			.map(|book| json!({ "href": format!("#doc/{}/1", book.id), "title": book.title }))
			.collect();
		Value::Array(anchors).to_string()
	}

	fn pagination(state: &State) -> String {
		let Some((id, page)) = &state.current else {
			return String::new();
		};
		match state.books.iter().find(|book| &book.id == id) {
			Some(book) if book.pages > 0 => json!([page.to_string(), format!("/ {}", book.pages)]).to_string(),
			_ => String::new(),
		}
	}
}

#[async_trait]
impl ReaderPage for FakePage {
	async fn goto(&self, url: &str) -> DriverResult<()> {
		let mut state = lock(&self.state);
		state.recorded.visits.push(url.to_string());
		state.current = extract_document_id(url).map(|id| {
			let page = url.rsplit_once('/').and_then(|(_, page)| page.parse().ok()).unwrap_or(1);
			(id, page)
		});
		Ok(())
	}

	async fn evaluate_value(&self, expression: &str) -> DriverResult<String> {
		let mut state = lock(&self.state);
		let value = if expression == scripts::NETWORK_ACTIVITY {
			"7".to_string()
		} else if expression == LoginSignalProbe.script() {
			Self::body(&state)
		} else if expression == scripts::selector_present(selectors::LIBRARY_ENTRY) {
			(state.signed_in && Self::visible_entries(&state) > 0).to_string()
		} else if expression == scripts::LIBRARY_ENTRY_COUNT {
			Self::visible_entries(&state).to_string()
		} else if expression == scripts::SCROLL_ONE_VIEWPORT {
			state.recorded.scrolls += 1;
			"0".to_string()
		} else if expression == CatalogProbe.script() {
			Self::catalog(&state)
		} else if expression == PageCountProbe.script() {
			Self::pagination(&state)
		} else if expression.contains("edubase-dl-style") {
			state.recorded.styles_injected += 1;
			"injected".to_string()
		} else {
			return Err(DriverError::Script(format!("unexpected script: {expression}")));
		};
		Ok(value)
	}

	async fn type_text(&self, selector: &str, text: &str) -> DriverResult<()> {
		lock(&self.state).recorded.typed.push((selector.to_string(), text.to_string()));
		Ok(())
	}

	async fn click(&self, selector: &str) -> DriverResult<()> {
		let mut state = lock(&self.state);
		state.recorded.clicks.push(selector.to_string());
		if selector == selectors::LOGIN_SUBMIT && state.rejection.is_none() && !state.stall_login {
			state.signed_in = true;
		}
		Ok(())
	}

	async fn emulate_print_media(&self) -> DriverResult<()> {
		lock(&self.state).recorded.print_media += 1;
		Ok(())
	}

	async fn print_pdf(&self) -> DriverResult<Vec<u8>> {
		let mut state = lock(&self.state);
		let Some((id, page)) = state.current.clone() else {
			return Err(DriverError::Script("nothing to print".into()));
		};
		if state.fail_print.as_ref() == Some(&(id.clone(), page)) {
			return Err(DriverError::Script("renderer crashed".into()));
		}
		state.recorded.printed.push((id, page));
		Ok(page_pdf(100 + i64::from(page)))
	}

	async fn close(self: Box<Self>) -> DriverResult<()> {
		lock(&self.state).recorded.closes += 1;
		Ok(())
	}
}

/// Prompt answering from a fixed list, then reporting a closed input.
pub struct ScriptedPrompt {
	answers: VecDeque<String>,
	pub asked: usize,
	pub rejected: Vec<String>,
}

impl ScriptedPrompt {
	pub fn new(answers: &[&str]) -> Self {
		Self {
			answers: answers.iter().map(|a| a.to_string()).collect(),
			asked: 0,
			rejected: Vec::new(),
		}
	}
}

#[async_trait]
impl SelectionPrompt for ScriptedPrompt {
	async fn ask(&mut self, _documents: &[Document]) -> io::Result<String> {
		self.asked += 1;
		self.answers
			.pop_front()
			.ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
	}

	fn rejected(&mut self, input: &str) {
		self.rejected.push(input.to_string());
	}
}

/// Configuration without any waiting.
pub fn fast_config(output_dir: &std::path::Path) -> DownloadConfig {
	let fast = PollPolicy::new(Duration::ZERO, 5);
	DownloadConfig {
		login: LoginOptions {
			idle: fast,
			settle: Duration::ZERO,
			pre_submit: Duration::ZERO,
			signal: fast,
		},
		catalog: CatalogOptions {
			ready: fast,
			max_scroll_iterations: 100,
			scroll_pause: Duration::ZERO,
			settle: Duration::ZERO,
		},
		capture: CaptureOptions {
			idle: fast,
			initial_settle: Duration::ZERO,
			page_settle: Duration::ZERO,
			css_patch: true,
		},
		..DownloadConfig::default()
	}
	.with_output_dir(output_dir)
}

/// Number of pages in the PDF at `path`.
pub fn pdf_page_count(path: &std::path::Path) -> usize {
	lopdf::Document::load(path).expect("output should be a readable PDF").get_pages().len()
}

/// One-page PDF whose media box is `width` points wide.
pub fn page_pdf(width: i64) -> Vec<u8> {
	let mut doc = lopdf::Document::with_version("1.5");
	let tree_id = doc.new_object_id();
	let content = Content {
		operations: vec![Operation::new("BT", vec![]), Operation::new("ET", vec![])],
	};
	let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap_or_default()));
	let page_id = doc.add_object(Dictionary::from_iter([
		("Type", Object::Name(b"Page".to_vec())),
		("Parent", Object::Reference(tree_id)),
		("Contents", Object::Reference(content_id)),
		("MediaBox", Object::Array(vec![0.into(), 0.into(), width.into(), 842.into()])),
	]));
	doc.objects.insert(
		tree_id,
		Object::Dictionary(Dictionary::from_iter([
			("Type", Object::Name(b"Pages".to_vec())),
			("Kids", Object::Array(vec![Object::Reference(page_id)])),
			("Count", Object::Integer(1)),
		])),
	);
	let catalog_id = doc.add_object(Dictionary::from_iter([
		("Type", Object::Name(b"Catalog".to_vec())),
		("Pages", Object::Reference(tree_id)),
	]));
	doc.trailer.set("Root", Object::Reference(catalog_id));

	let mut bytes = Vec::new();
	doc.save_to(&mut bytes).expect("fixture PDF should serialize");
	bytes
}
