//! Merging of per-page PDFs into one document.
//!
//! Every captured page arrives as a standalone PDF. Its objects are
//! renumbered past the ones already collected, its page nodes are re-parented
//! under a single page tree, and its catalog and page tree are dropped.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document as PdfDocument, Object, ObjectId};
use tracing::{debug, info, warn};

use crate::capture::{PageSink, PageUnit};
use crate::error::{Error, Result};

/// Page attributes a page node may inherit from its ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on page tree depth, against reference cycles in broken input.
const MAX_TREE_DEPTH: usize = 32;

/// Builds one PDF from page units appended in order.
///
/// Nothing touches the file system until [`DocumentAssembler::finish`],
/// which writes `<path>.part` and renames it over `path` once complete.
pub struct DocumentAssembler {
	path: PathBuf,
	document: PdfDocument,
	pages_id: ObjectId,
	kids: Vec<ObjectId>,
	next_index: u32,
}

impl DocumentAssembler {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		let mut document = PdfDocument::with_version("1.5");
		let pages_id = document.new_object_id();
		Self {
			path: path.into(),
			document,
			pages_id,
			kids: Vec::new(),
			next_index: 1,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Number of PDF pages collected so far.
	pub fn page_count(&self) -> usize {
		self.kids.len()
	}

	/// Appends the pages of `unit`. Units must arrive with indices 1, 2, 3...
	pub fn append(&mut self, unit: PageUnit) -> Result<()> {
		if unit.index != self.next_index {
			return Err(Error::assembly(
				&self.path,
				format!("page {} arrived out of sequence, expected page {}", unit.index, self.next_index),
			));
		}

		let mut source = PdfDocument::load_mem(&unit.bytes)
			.map_err(|e| Error::assembly(&self.path, format!("page {} is not a readable PDF: {e}", unit.index)))?;
		source.renumber_objects_with(self.document.max_id + 1);
		self.document.max_id = self.document.max_id.max(source.max_id);

		let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
		if page_ids.is_empty() {
			return Err(Error::assembly(&self.path, format!("page {} contains no PDF pages", unit.index)));
		}
		let mut inherited: BTreeMap<ObjectId, Vec<(&'static [u8], Object)>> = page_ids
			.iter()
			.map(|&id| (id, inherited_attributes(&source, id)))
			.collect();

		for (id, object) in source.objects {
			if let Some(attributes) = inherited.remove(&id) {
				if let Object::Dictionary(mut page) = object {
					for (key, value) in attributes {
						page.set(key, value);
					}
					page.set("Parent", Object::Reference(self.pages_id));
					self.document.objects.insert(id, Object::Dictionary(page));
				}
				continue;
			}
			match object.type_name().unwrap_or(b"") {
				b"Catalog" | b"Pages" | b"Outlines" | b"Outline" => {}
				_ => {
					self.document.objects.insert(id, object);
				}
			}
		}

		debug!(target = "edubase", page = unit.index, pdf_pages = page_ids.len(), "page appended");
		self.kids.extend(page_ids);
		self.next_index += 1;
		Ok(())
	}

	/// Writes the document and returns its page count.
	///
	/// On failure the partial file is removed and `path` is left untouched.
	pub fn finish(self) -> Result<usize> {
		let Self {
			path,
			mut document,
			pages_id,
			kids,
			..
		} = self;
		if kids.is_empty() {
			return Err(Error::assembly(&path, "no pages to write"));
		}

		let count = kids.len();
		let pages = Dictionary::from_iter([
			("Type", Object::Name(b"Pages".to_vec())),
			("Kids", Object::Array(kids.into_iter().map(Object::Reference).collect())),
			("Count", Object::Integer(i64::try_from(count).unwrap_or(i64::MAX))),
		]);
		document.objects.insert(pages_id, Object::Dictionary(pages));
		let catalog_id = document.add_object(Dictionary::from_iter([
			("Type", Object::Name(b"Catalog".to_vec())),
			("Pages", Object::Reference(pages_id)),
		]));
		document.trailer.set("Root", Object::Reference(catalog_id));
		document.compress();

		let part = part_path(&path);
		let written = write_file(&mut document, &part).and_then(|()| fs::rename(&part, &path));
		if let Err(err) = written {
			if let Err(cleanup) = fs::remove_file(&part) {
				if cleanup.kind() != io::ErrorKind::NotFound {
					warn!(target = "edubase", path = %part.display(), error = %cleanup, "partial file left behind");
				}
			}
			return Err(Error::assembly(&path, err));
		}

		info!(target = "edubase", path = %path.display(), pages = count, "document written");
		Ok(count)
	}
}

impl PageSink for DocumentAssembler {
	fn accept(&mut self, unit: PageUnit) -> Result<()> {
		self.append(unit)
	}
}

/// Assembles `units` into `path` in one call.
pub fn assemble(units: impl IntoIterator<Item = PageUnit>, path: impl Into<PathBuf>) -> Result<usize> {
	let mut assembler = DocumentAssembler::new(path);
	for unit in units {
		assembler.append(unit)?;
	}
	assembler.finish()
}

/// `<path>.part`, next to the final file so the rename stays on one file system.
pub fn part_path(path: &Path) -> PathBuf {
	let mut name = OsString::from(path.as_os_str());
	name.push(".part");
	PathBuf::from(name)
}

fn write_file(document: &mut PdfDocument, path: &Path) -> io::Result<()> {
	let mut writer = BufWriter::new(File::create(path)?);
	document
		.save_to(&mut writer)
		.map_err(|e| io::Error::other(e.to_string()))?;
	writer.flush()
}

fn inherited_attributes(source: &PdfDocument, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
	let mut found: Vec<(&'static [u8], Object)> = Vec::new();
	let Ok(page) = source.get_dictionary(page_id) else {
		return found;
	};

	let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
	let mut depth = 0;
	while let Some(id) = parent {
		depth += 1;
		if depth > MAX_TREE_DEPTH {
			break;
		}
		let Ok(node) = source.get_dictionary(id) else {
			break;
		};
		for key in INHERITABLE {
			if page.has(key) || found.iter().any(|(k, _)| *k == key) {
				continue;
			}
			if let Ok(value) = node.get(key) {
				found.push((key, value.clone()));
			}
		}
		parent = node.get(b"Parent").and_then(Object::as_reference).ok();
	}
	found
}
