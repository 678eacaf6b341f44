//! doctoscan - practitioner record extraction and filtering for
//! Doctolib-style directory listings.
//!
//! The crate turns opaque listing blocks (anything implementing
//! [`source::ListingBlock`]) into canonical [`record::Record`]s through
//! per-field fallback heuristics, then filters them against a
//! [`config::FilterSpec`]. Browser automation, CLI parsing and CSV writing
//! are the caller's business.

pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod record;
pub mod source;

pub use config::{ExtractConfig, FilterSpec, MissingPricePolicy, Selectors};
pub use error::{Result, ScanError};
pub use pipeline::{run, PipelineState, RunOutcome};
pub use record::{ConsultationMode, DiagnosticEvent, DiagnosticKind, InsuranceSector, Record};
pub use source::{HtmlListingSource, ListingBlock, ListingSource};
