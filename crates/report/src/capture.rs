//! Side-effect capture: screenshots and outbound mail
//!
//! The browser driver and the mail subsystem live outside this crate; they
//! are reached through [`ScreenCapture`] and [`MailCapture`].

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stepview_common::assets::escape_html;

/// Failures of a capture call; these never abort the suite
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Screen capture unavailable: {0}")]
    Unavailable(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Browser driver hook for full-page screenshots
pub trait ScreenCapture {
    /// Save a PNG of the current page to `path`
    fn save_screenshot(&mut self, path: &Path) -> Result<(), CaptureError>;
}

/// Screen capture for runs without a browser
#[derive(Debug, Default)]
pub struct NoScreen;

impl ScreenCapture for NoScreen {
    fn save_screenshot(&mut self, _path: &Path) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable("no browser attached".to_string()))
    }
}

/// One MIME part of a captured mail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailPart {
    pub content_type: String,
    pub body: String,
}

/// An outbound mail captured during a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mail {
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub from: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub parts: Vec<MailPart>,
}

/// Rendered mail part kinds kept as artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailContent {
    Html,
    Plain,
}

impl MailContent {
    pub fn mime(&self) -> &'static str {
        match self {
            MailContent::Html => "text/html",
            MailContent::Plain => "text/plain",
        }
    }

    /// Artifact suffix, e.g. `.text.plain.email.html`
    pub fn suffix(&self) -> String {
        format!(".{}.email.html", self.mime().replace('/', "."))
    }
}

impl Mail {
    /// First part whose content type mentions the given MIME type
    pub fn part(&self, content: MailContent) -> Option<&MailPart> {
        self.parts
            .iter()
            .find(|p| p.content_type.contains(content.mime()))
    }
}

/// Source of mails sent since the last drain
pub trait MailCapture {
    fn drain(&mut self) -> Vec<Mail>;
}

/// In-memory outbox fed by the runner
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<Mail>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&mut self, mail: Mail) {
        self.queue.push_back(mail);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl MailCapture for Outbox {
    fn drain(&mut self) -> Vec<Mail> {
        self.queue.drain(..).collect()
    }
}

/// `<unix-seconds><5 random digits>.png`
pub fn screenshot_filename() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..5)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{}{}.png", chrono::Utc::now().timestamp(), digits)
}

/// Path of a new screenshot under the screenshots directory
pub fn screenshot_path(screenshots_dir: &Path) -> PathBuf {
    screenshots_dir.join(screenshot_filename())
}

/// HTML page showing a screenshot, as seen from `results/`
pub fn screenshot_page(filename: &str) -> String {
    format!(
        "<html>\n  <body>\n    <img src=\"../screenshots/{}\">\n  </body>\n</html>\n",
        filename
    )
}

/// HTML page showing a plain-text mail body
pub fn plain_text_page(text: &str) -> String {
    format!("<html><body><pre>{}</pre></body></html>", escape_html(text))
}
