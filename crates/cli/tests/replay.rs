//! Replay command tests
//!
//! Feeds recorded event streams through the replay entry point.

use std::io::Cursor;
use std::path::Path;

use stepview_cli::commands::{replay, summary};
use stepview_report::ReporterConfig;
use tempfile::TempDir;

const LOGIN_EVENTS: &str = r#"
{"event":"feature_started","name":"Login","uri":"features/login.feature","line":1}
{"event":"scenario_started","kind":"background","keyword":"Background","name":"","line":2}
{"event":"step_started","keyword":"Given ","name":"a user \"ann\" exists","line":3}
{"event":"step_finished","status":"passed","args":[{"offset":8,"value":"ann"}]}
{"event":"scenario_finished"}
{"event":"scenario_started","name":"Valid login","line":5}
{"event":"step_started","keyword":"Given ","name":"I am on the login page","line":6}
{"event":"document_captured","html":"<img src=\"/images/logo.png\">"}
{"event":"step_finished","status":"passed","location":"steps/login.rs:4"}
{"event":"step_started","keyword":"When ","name":"I sign in","line":7}
{"event":"message","text":"signing in as ann"}
{"event":"mail_delivered","mail":{"to":["ann@example.com"],"subject":"New sign-in","parts":[{"content_type":"text/plain","body":"Hi Ann"}]}}
{"event":"step_finished","status":"passed"}
{"event":"scenario_finished"}
{"event":"scenario_started","name":"Locked account","line":9}
{"event":"step_started","keyword":"Then ","name":"I see an error","line":10}
{"event":"step_finished","status":"failed","exception":{"message":"no error shown","kind":"AssertionError"}}
{"event":"scenario_finished"}
{"event":"feature_finished"}
{"event":"suite_finished","duration_ms":1200}
"#;

fn config(root: &Path) -> ReporterConfig {
    ReporterConfig {
        output_dir: root.join("report"),
        color: false,
        ..Default::default()
    }
}

#[test]
fn test_replay_writes_report_and_reports_failure() {
    let tmp = TempDir::new().unwrap();
    let config = config(tmp.path());
    let mut out = Vec::new();

    let outcome = replay::replay(Cursor::new(LOGIN_EVENTS), &mut out, &config).unwrap();
    assert_eq!(outcome.events, 20);
    assert!(outcome.failed);
    assert!(outcome.results.is_file());

    let doc = summary::load(&outcome.results).unwrap();
    let rows = summary::rows(&doc);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].scenarios, 2);
    assert_eq!(rows[0].failed, 1);
    assert_eq!(rows[0].steps, 3);
    assert_eq!(rows[0].emails, 1);

    let console = String::from_utf8(out).unwrap();
    assert!(console.contains("signing in as ann"));
    assert!(console.contains("Failing Scenarios:"));
    assert!(console.contains("cucumber features/login.feature:9 # Scenario: Locked account"));
    assert!(console.contains("2 scenarios (1 failed, 1 passed)"));
}

#[test]
fn test_replay_without_suite_finished_still_writes_results() {
    let tmp = TempDir::new().unwrap();
    let config = config(tmp.path());
    let events = LOGIN_EVENTS
        .lines()
        .filter(|l| !l.contains("suite_finished"))
        .collect::<Vec<_>>()
        .join("\n");

    let outcome = replay::replay(Cursor::new(events), Vec::new(), &config).unwrap();
    assert_eq!(outcome.events, 19);
    assert!(outcome.results.is_file());
}

#[test]
fn test_invalid_event_names_the_line() {
    let tmp = TempDir::new().unwrap();
    let config = config(tmp.path());
    let events = "{\"event\":\"feature_started\",\"name\":\"A\",\"uri\":\"a.feature\"}\nnot json\n";

    let err = replay::replay(Cursor::new(events), Vec::new(), &config).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn test_step_outside_scenario_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = config(tmp.path());
    let events = "{\"event\":\"step_started\",\"keyword\":\"Given \",\"name\":\"orphan\"}\n";

    let err = replay::replay(Cursor::new(events), Vec::new(), &config).unwrap_err();
    assert!(format!("{:#}", err).contains("out of order"));
}
