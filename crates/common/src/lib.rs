//! Stepview Common Library
//!
//! The data-producing half of a step report: the report document, the
//! content-addressed artifact store, the report tree finalizer and the
//! output directory layout.

pub mod assets;
pub mod document;
pub mod error;
pub mod layout;
pub mod store;
pub mod tree;

// Re-export commonly used types
pub use assets::AssetRewriter;
pub use document::{
    Attachment, BackgroundStep, Element, ElementKind, EmailBody, EmailSummary, Feature, MatchedArg,
    MultilineArg, ReportDocument, Stats, Status, Step, StepError, Tally,
};
pub use error::{Error, Result};
pub use layout::OutputLayout;
pub use store::{ArtifactStore, StoreStats};

/// Stepview version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
