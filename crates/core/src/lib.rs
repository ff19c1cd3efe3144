//! Download pipeline for Edubase books.
//!
//! One run opens a single browser session, signs in, scans the library and
//! turns every targeted document into `<id>.pdf`:
//!
//! - [`session`]: browser launch, isolated context and login
//! - [`catalog`]: library scan with lazy-load scrolling
//! - [`capture`]: page-by-page printing behind render waits
//! - [`assemble`]: merge of the printed pages with an atomic write
//! - [`orchestrator`]: selection and per-document failure isolation
//!
//! The browser is reached through the [`driver::ReaderPage`] seam, so every
//! stage except [`chrome`] runs against scripted pages in tests.

pub mod assemble;
pub mod capture;
pub mod catalog;
pub mod chrome;
pub mod config;
pub mod driver;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod session;
pub mod wait;

pub use assemble::{DocumentAssembler, assemble};
pub use capture::{PageSink, PageUnit, capture};
pub use catalog::list_documents;
pub use chrome::ChromeLauncher;
pub use config::{CaptureOptions, CatalogOptions, Credentials, DownloadConfig, LoginOptions, SessionConfig};
pub use driver::{DriverError, Launcher, ReaderPage};
pub use edubase_protocol::Document;
pub use error::{Error, ErrorKind, Result};
pub use orchestrator::{Orchestrator, SelectionPrompt, select_targets};
pub use report::{BatchReport, DocumentOutcome, ReportSummary};
pub use session::Session;
pub use wait::PollPolicy;
