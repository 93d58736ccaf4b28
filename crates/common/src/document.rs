//! Report document: features, elements, steps and their artifact references
//!
//! The document is an ordered tree built incrementally while the suite runs.
//! Order of features, elements and steps is exactly the order in which the
//! runner reported them.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Step (and element) status as reported by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
    Pending,
    Undefined,
}

impl Status {
    /// Summary order used in "N steps (...)" lines
    pub const SUMMARY_ORDER: [Status; 5] = [
        Status::Failed,
        Status::Skipped,
        Status::Undefined,
        Status::Pending,
        Status::Passed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Pending => "pending",
            Status::Undefined => "undefined",
        }
    }

    fn severity(&self) -> u8 {
        match self {
            Status::Passed => 0,
            Status::Skipped => 1,
            Status::Pending => 2,
            Status::Undefined => 3,
            Status::Failed => 4,
        }
    }

    /// Combine two statuses, keeping the more severe one
    pub fn merge(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Passed
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a feature element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Background,
    Scenario,
    ScenarioOutline,
    ExampleRow,
}

impl Default for ElementKind {
    fn default() -> Self {
        Self::Scenario
    }
}

/// Root of the report: every feature in run order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportDocument {
    pub features: Vec<Feature>,
}

impl ReportDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_feature_mut(&mut self) -> Option<&mut Feature> {
        self.features.last_mut()
    }

    pub fn current_element_mut(&mut self) -> Option<&mut Element> {
        self.current_feature_mut()?.elements.last_mut()
    }

    pub fn current_step_mut(&mut self) -> Option<&mut Step> {
        self.current_element_mut()?.steps.last_mut()
    }

    /// All elements of every feature with their owning feature, in order
    pub fn elements(&self) -> impl Iterator<Item = (&Feature, &Element)> {
        self.features
            .iter()
            .flat_map(|f| f.elements.iter().map(move |e| (f, e)))
    }

    /// All steps with their owning feature and element, in order
    pub fn steps(&self) -> impl Iterator<Item = (&Feature, &Element, &Step)> {
        self.elements()
            .flat_map(|(f, e)| e.steps.iter().map(move |s| (f, e, s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub uri: String,
    pub line: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Feature {
    /// `uri:line` of a line in this feature's file
    pub fn location(&self, line: u32) -> String {
        format!("{}:{}", self.uri, line)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub keyword: String,
    pub name: String,
    pub line: u32,
    /// Line of the enclosing scenario outline, for example rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_line: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Element {
    pub fn is_background(&self) -> bool {
        self.kind == ElementKind::Background
    }

    /// Line a rerun of this element should point at
    pub fn rerun_line(&self) -> u32 {
        match self.kind {
            ElementKind::ExampleRow => self.outline_line.unwrap_or(self.line),
            _ => self.line,
        }
    }

    /// Fold a finished step's status into the element status
    pub fn absorb(&mut self, status: Status) {
        self.status = self.status.merge(status);
    }
}

/// Span of a matched step argument inside the step name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedArg {
    /// Byte offset into the step name
    pub offset: usize,
    pub value: String,
}

/// Doc string or data table attached to a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MultilineArg {
    DocString {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    Table {
        rows: Vec<Vec<String>>,
    },
}

/// Exception raised by a failing step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
    pub message: String,
    pub kind: String,
    #[serde(default)]
    pub backtrace: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub keyword: String,
    pub name: String,
    pub line: u32,
    #[serde(default)]
    pub status: Status,
    /// `file:line` of the matching step definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<MatchedArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiline_arg: Option<MultilineArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<StepError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(flatten)]
    pub attachment: Option<Attachment>,
}

impl Step {
    pub fn new(keyword: impl Into<String>, name: impl Into<String>, line: u32) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            line,
            ..Default::default()
        }
    }

    /// Attach the step's artifact references. Allowed once per step.
    pub fn attach(&mut self, attachment: Attachment) -> Result<()> {
        if self.attachment.is_some() {
            return Err(Error::AlreadyAttached {
                keyword: self.keyword.clone(),
                name: self.name.clone(),
            });
        }
        self.attachment = Some(attachment);
        Ok(())
    }

    pub fn html_file(&self) -> Option<&str> {
        self.attachment.as_ref()?.html_file.as_deref()
    }

    pub fn emails(&self) -> &[EmailSummary] {
        self.attachment
            .as_ref()
            .map(|a| a.emails.as_slice())
            .unwrap_or(&[])
    }
}

/// A background step that did not pass. Kept for the summary after the
/// background element itself has been pruned from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundStep {
    pub feature_uri: String,
    pub step: Step,
}

impl BackgroundStep {
    /// `uri:line` of the step in its feature file
    pub fn location(&self) -> String {
        format!("{}:{}", self.feature_uri, self.step.line)
    }
}

/// Artifact references attached to a finished step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub html_file: Option<String>,
    #[serde(default)]
    pub emails: Vec<EmailSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub to: Vec<String>,
    pub from: Vec<String>,
    pub subject: String,
    pub body: EmailBody,
}

/// Artifact filenames of an email's rendered parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailBody {
    pub html: Option<String>,
    pub text: Option<String>,
}

/// Per-status counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub pending: usize,
    pub undefined: usize,
}

impl Tally {
    pub fn add(&mut self, status: Status) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Passed => self.passed,
            Status::Failed => self.failed,
            Status::Skipped => self.skipped,
            Status::Pending => self.pending,
            Status::Undefined => self.undefined,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.pending + self.undefined
    }

    fn slot(&mut self, status: Status) -> &mut usize {
        match status {
            Status::Passed => &mut self.passed,
            Status::Failed => &mut self.failed,
            Status::Skipped => &mut self.skipped,
            Status::Pending => &mut self.pending,
            Status::Undefined => &mut self.undefined,
        }
    }
}

/// Status aggregates, computed read-only from a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub features: usize,
    pub scenarios: Tally,
    pub steps: Tally,
}

impl Stats {
    /// Count scenarios (outline rows included, outlines and backgrounds not)
    /// and every step of the document
    pub fn collect(doc: &ReportDocument) -> Self {
        let mut stats = Stats {
            features: doc.features.len(),
            ..Default::default()
        };

        for (_, element) in doc.elements() {
            if matches!(element.kind, ElementKind::Scenario | ElementKind::ExampleRow) {
                stats.scenarios.add(element.status);
            }
        }
        for (_, _, step) in doc.steps() {
            stats.steps.add(step.status);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Status::Passed, Status::Skipped, Status::Skipped)]
    #[test_case(Status::Failed, Status::Skipped, Status::Failed)]
    #[test_case(Status::Pending, Status::Undefined, Status::Undefined)]
    #[test_case(Status::Passed, Status::Passed, Status::Passed)]
    fn test_status_merge(a: Status, b: Status, expected: Status) {
        assert_eq!(a.merge(b), expected);
        assert_eq!(b.merge(a), expected);
    }

    #[test]
    fn test_attach_only_once() {
        let mut step = Step::new("Given ", "I am on the login page", 3);
        step.attach(Attachment::default()).unwrap();

        let err = step.attach(Attachment::default()).unwrap_err();
        assert!(matches!(err, Error::AlreadyAttached { .. }));
    }

    #[test]
    fn test_step_json_shape() {
        let mut step = Step::new("Then ", "I see the dashboard", 7);
        step.attach(Attachment {
            html_file: Some("abc.html".into()),
            emails: vec![EmailSummary {
                to: vec!["a@example.com".into()],
                from: vec!["b@example.com".into()],
                subject: "Welcome".into(),
                body: EmailBody {
                    html: Some("h.text.html.email.html".into()),
                    text: None,
                },
            }],
        })
        .unwrap();

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["html_file"], "abc.html");
        assert_eq!(json["emails"][0]["subject"], "Welcome");
        assert_eq!(json["emails"][0]["body"]["html"], "h.text.html.email.html");
        assert!(json["emails"][0]["body"]["text"].is_null());
        assert_eq!(json["status"], "passed");
    }

    #[test]
    fn test_unattached_step_has_no_artifact_keys() {
        let json = serde_json::to_value(Step::new("Given ", "x", 1)).unwrap();
        assert!(json.get("html_file").is_none());
        assert!(json.get("emails").is_none());
    }

    #[test]
    fn test_stats_collect() {
        let mut doc = ReportDocument::new();
        let mut failing = Element {
            name: "Bad login".into(),
            ..Default::default()
        };
        for status in [Status::Passed, Status::Failed, Status::Skipped] {
            failing.steps.push(Step {
                status,
                ..Default::default()
            });
            failing.absorb(status);
        }
        let outline = Element {
            kind: ElementKind::ScenarioOutline,
            ..Default::default()
        };
        let row = Element {
            kind: ElementKind::ExampleRow,
            ..Default::default()
        };
        doc.features.push(Feature {
            elements: vec![failing, outline, row],
            ..Default::default()
        });

        let stats = Stats::collect(&doc);
        assert_eq!(stats.features, 1);
        assert_eq!(stats.scenarios.total(), 2);
        assert_eq!(stats.scenarios.failed, 1);
        assert_eq!(stats.scenarios.passed, 1);
        assert_eq!(stats.steps.total(), 3);
        assert_eq!(stats.steps.get(Status::Skipped), 1);
    }

    #[test]
    fn test_rerun_line_of_example_row() {
        let row = Element {
            kind: ElementKind::ExampleRow,
            line: 14,
            outline_line: Some(9),
            ..Default::default()
        };
        assert_eq!(row.rerun_line(), 9);
    }
}
