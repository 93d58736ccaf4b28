//! Stepview Report
//!
//! Listens to an acceptance-test runner and turns its lifecycle events into
//! a browsable report:
//!
//! - [`Correlator`] captures a page and the outbound mails of every step and
//!   records them in the report document
//! - [`Console`] prints live progress and the end-of-suite summary
//! - [`ReportFormatter`] is the [`SuiteListener`] a runner attaches; it
//!   drives both and writes `results.json` when the suite finishes

pub mod capture;
pub mod config;
pub mod console;
pub mod correlator;
pub mod error;
pub mod events;
pub mod format;
pub mod formatter;
pub mod snippet;
pub mod wrap;

pub use capture::{CaptureError, Mail, MailCapture, MailPart, NoScreen, Outbox, ScreenCapture};
pub use config::ReporterConfig;
pub use console::{Console, ConsoleOptions, MessageBuffer};
pub use correlator::Correlator;
pub use error::{ReportError, ReportResult};
pub use events::{RunnerEvent, SuiteListener};
pub use format::{FormatKey, FormatTable, Style};
pub use formatter::ReportFormatter;
pub use snippet::SnippetDialect;
