//! Labor-law PDF ingestion: extract text, classify the jurisdiction through
//! a chat-completion service, segment the document into numbered provisions,
//! route each one into a topical category, validate, and persist to SQLite.
//!
//! The pipeline is best-effort by design: classification failures fall back
//! to the primary jurisdiction, and malformed provisions are dropped with a
//! recorded reason instead of aborting the document.

pub mod classifier;
pub mod db;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod profile;
pub mod provision;
pub mod rules;

pub use classifier::{Classifier, DocumentClass};
pub use parser::ParseReport;
pub use pipeline::{process_document, process_text, process_text_with, PipelineError};
pub use profile::JurisdictionProfile;
pub use provision::{DropReason, Dropped, Jurisdiction, Provision};
pub use rules::RoutingRules;
