//! Lifecycle events consumed from the external test runner
//!
//! The runner drives the report through [`SuiteListener`], either by calling
//! the hooks directly or by handing over recorded [`RunnerEvent`]s (one JSON
//! object per line, tagged by `event`).

use serde::{Deserialize, Serialize};
use stepview_common::{ElementKind, MatchedArg, MultilineArg, Status, StepError};

use crate::capture::Mail;
use crate::error::ReportResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStarted {
    #[serde(default = "default_feature_keyword")]
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub uri: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_feature_keyword() -> String {
    "Feature".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStarted {
    #[serde(default)]
    pub kind: ElementKind,
    #[serde(default = "default_scenario_keyword")]
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub outline_line: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_scenario_keyword() -> String {
    "Scenario".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStarted {
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub line: u32,
}

/// Result of a step as decided by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFinished {
    pub status: Status,
    /// `file:line` of the matching step definition
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub args: Vec<MatchedArg>,
    #[serde(default)]
    pub multiline_arg: Option<MultilineArg>,
    #[serde(default)]
    pub exception: Option<StepError>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl StepFinished {
    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            location: None,
            args: Vec::new(),
            multiline_arg: None,
            exception: None,
            duration_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteFinished {
    /// Wall-clock duration measured by the runner
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Step definition languages loaded by the runner (for snippets)
    #[serde(default)]
    pub languages: Vec<String>,
}

/// One recorded lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunnerEvent {
    FeatureStarted(FeatureStarted),
    ScenarioStarted(ScenarioStarted),
    StepStarted(StepStarted),
    StepFinished(StepFinished),
    ScenarioFinished,
    FeatureFinished,
    SuiteFinished(SuiteFinished),
    /// Free-form output from a step definition
    Message { text: String },
    /// A rendered document to show for the current step
    DocumentCaptured { html: String },
    /// An email sent during the current step
    MailDelivered { mail: Mail },
}

impl RunnerEvent {
    /// Parse one line of a recorded event stream
    pub fn from_json(line: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Hooks the runner calls, in order, on its own thread
pub trait SuiteListener {
    fn before_feature(&mut self, feature: &FeatureStarted) -> ReportResult<()>;

    fn before_scenario(&mut self, scenario: &ScenarioStarted) -> ReportResult<()>;

    fn before_step(&mut self, step: &StepStarted) -> ReportResult<()>;

    fn after_step(&mut self, result: &StepFinished) -> ReportResult<()>;

    fn after_scenario(&mut self) -> ReportResult<()> {
        Ok(())
    }

    fn after_feature(&mut self) -> ReportResult<()>;

    fn after_suite(&mut self, suite: &SuiteFinished) -> ReportResult<()>;

    fn message(&mut self, _text: &str) -> ReportResult<()> {
        Ok(())
    }

    fn document_captured(&mut self, _html: &str) -> ReportResult<()> {
        Ok(())
    }

    fn mail_delivered(&mut self, _mail: &Mail) -> ReportResult<()> {
        Ok(())
    }

    /// Route a recorded event to its hook
    fn dispatch(&mut self, event: &RunnerEvent) -> ReportResult<()> {
        match event {
            RunnerEvent::FeatureStarted(e) => self.before_feature(e),
            RunnerEvent::ScenarioStarted(e) => self.before_scenario(e),
            RunnerEvent::StepStarted(e) => self.before_step(e),
            RunnerEvent::StepFinished(e) => self.after_step(e),
            RunnerEvent::ScenarioFinished => self.after_scenario(),
            RunnerEvent::FeatureFinished => self.after_feature(),
            RunnerEvent::SuiteFinished(e) => self.after_suite(e),
            RunnerEvent::Message { text } => self.message(text),
            RunnerEvent::DocumentCaptured { html } => self.document_captured(html),
            RunnerEvent::MailDelivered { mail } => self.mail_delivered(mail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recorded_events() {
        let lines = [
            r#"{"event":"feature_started","name":"Login","uri":"features/login.feature","line":1}"#,
            r#"{"event":"scenario_started","kind":"background","keyword":"Background","name":"","line":3}"#,
            r#"{"event":"step_started","keyword":"Given ","name":"I am on the login page","line":4}"#,
            r#"{"event":"step_finished","status":"failed","exception":{"message":"boom","kind":"RuntimeError","backtrace":["steps.rs:10"]}}"#,
            r#"{"event":"message","text":"tagged"}"#,
            r#"{"event":"scenario_finished"}"#,
            r#"{"event":"feature_finished"}"#,
            r#"{"event":"suite_finished","duration_ms":1500,"languages":["rust"]}"#,
        ];
        let events: Vec<RunnerEvent> = lines.iter().map(|l| RunnerEvent::from_json(l).unwrap()).collect();

        match &events[0] {
            RunnerEvent::FeatureStarted(f) => {
                assert_eq!(f.keyword, "Feature");
                assert_eq!(f.uri, "features/login.feature");
            }
            other => panic!("unexpected {:?}", other),
        }
        match &events[1] {
            RunnerEvent::ScenarioStarted(s) => assert_eq!(s.kind, ElementKind::Background),
            other => panic!("unexpected {:?}", other),
        }
        match &events[3] {
            RunnerEvent::StepFinished(s) => {
                assert_eq!(s.status, Status::Failed);
                assert_eq!(s.exception.as_ref().unwrap().kind, "RuntimeError");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(events[5], RunnerEvent::ScenarioFinished);
        assert_eq!(
            events[7],
            RunnerEvent::SuiteFinished(SuiteFinished {
                duration_ms: Some(1500),
                languages: vec!["rust".into()],
            })
        );
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(RunnerEvent::from_json(r#"{"event":"teleported"}"#).is_err());
    }
}
