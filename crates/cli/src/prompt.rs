//! Terminal prompts on stdin.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use edubase::SelectionPrompt;
use edubase_protocol::Document;

/// Asks for one document id on stdin.
///
/// The library listing is printed before the first question only.
#[derive(Debug, Default)]
pub struct StdinPrompt {
	listed: bool,
}

#[async_trait]
impl SelectionPrompt for StdinPrompt {
	async fn ask(&mut self, documents: &[Document]) -> io::Result<String> {
		let mut text = String::new();
		if !self.listed {
			text.push_str(&render_listing(documents));
			self.listed = true;
		}
		text.push_str("Book ID: ");
		read_line(text).await
	}

	fn rejected(&mut self, input: &str) {
		println!("[!] Invalid ID: {input}");
	}
}

/// Reads the account password.
pub async fn read_password() -> io::Result<String> {
	let line = read_line("Password: ".to_string()).await?;
	Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Available documents, one `id  title` line each.
pub fn render_listing(documents: &[Document]) -> String {
	let width = documents.iter().map(|document| document.id.len()).max().unwrap_or(0);
	let mut listing = String::from("Available books:\n");
	for document in documents {
		match &document.title {
			Some(title) => listing.push_str(&format!("  {:<width$}  {title}\n", document.id)),
			None => listing.push_str(&format!("  {}\n", document.id)),
		}
	}
	listing
}

/// Prints `prompt` and reads one line off the blocking stdin handle.
async fn read_line(prompt: String) -> io::Result<String> {
	tokio::task::spawn_blocking(move || {
		let mut stdout = io::stdout().lock();
		stdout.write_all(prompt.as_bytes())?;
		stdout.flush()?;
		drop(stdout);

		let mut line = String::new();
		if io::stdin().lock().read_line(&mut line)? == 0 {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
		}
		Ok(line)
	})
	.await
	.map_err(io::Error::other)?
}
