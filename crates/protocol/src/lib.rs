//! Remote surface of the Edubase web reader.
//!
//! Everything this workspace knows about the host application lives here:
//! URL templates, DOM selectors, the in-page scripts evaluated by the browser,
//! and the pure parsers that turn their results into typed values.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure: no browser, no I/O, only strings in and values out
//! * Fixture-testable: every parser runs against captured HTML or JSON
//! * Brittle on purpose: when the remote markup changes, only this crate moves
//!
//! The browser-driving pipeline in `edubase-core` evaluates a [`Probe`]'s
//! script and hands the raw result back to [`Probe::parse`].

pub mod catalog;
pub mod document;
mod html;
pub mod login;
pub mod pagination;
pub mod probe;
pub mod scripts;
pub mod selectors;
pub mod urls;

pub use catalog::{CatalogProbe, extract_document_id, parse_catalog};
pub use document::{DEFAULT_DOCUMENT_IDS, Document, is_default_document};
pub use login::{LoginSignal, LoginSignalProbe, parse_login_signal};
pub use pagination::{PageCountProbe, parse_total_pages};
pub use probe::{Probe, ProbeError};
