//! Per-feature overview of a finished report

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use stepview_common::{ElementKind, Feature, ReportDocument, Status};

use crate::output::{self, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// results.json to read (defaults to the configured output directory)
    pub results: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    pub feature: String,
    pub uri: String,
    pub scenarios: usize,
    pub failed: usize,
    pub steps: usize,
    pub pages: usize,
    pub emails: usize,
}

impl FeatureRow {
    pub fn from_feature(feature: &Feature) -> Self {
        let scenarios: Vec<_> = feature
            .elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Scenario | ElementKind::ExampleRow))
            .collect();
        let steps = || feature.elements.iter().flat_map(|e| e.steps.iter());

        Self {
            feature: feature.name.clone(),
            uri: feature.uri.clone(),
            scenarios: scenarios.len(),
            failed: scenarios.iter().filter(|e| e.status == Status::Failed).count(),
            steps: steps().count(),
            pages: steps().filter(|s| s.html_file().is_some()).count(),
            emails: steps().map(|s| s.emails().len()).sum(),
        }
    }
}

impl TableDisplay for FeatureRow {
    fn headers() -> Vec<&'static str> {
        vec!["Feature", "File", "Scenarios", "Failed", "Steps", "Pages", "Emails"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.feature.clone(),
            self.uri.clone(),
            self.scenarios.to_string(),
            self.failed.to_string(),
            self.steps.to_string(),
            self.pages.to_string(),
            self.emails.to_string(),
        ]
    }
}

pub fn load(path: &Path) -> Result<ReportDocument> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn rows(doc: &ReportDocument) -> Vec<FeatureRow> {
    doc.features.iter().map(FeatureRow::from_feature).collect()
}

pub fn execute(path: &Path, format: OutputFormat) -> Result<()> {
    let doc = load(path)?;
    output::print_list(&rows(&doc), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepview_common::{Attachment, Element, EmailSummary, Step};

    #[test]
    fn test_feature_row_counts() {
        let mut with_page = Step::new("Given ", "a page", 2);
        with_page
            .attach(Attachment {
                html_file: Some("a.html".into()),
                emails: vec![EmailSummary::default()],
            })
            .unwrap();
        let feature = Feature {
            name: "Login".into(),
            uri: "features/login.feature".into(),
            elements: vec![
                Element {
                    kind: ElementKind::Scenario,
                    status: Status::Failed,
                    steps: vec![with_page, Step::new("Then ", "nothing", 3)],
                    ..Default::default()
                },
                Element {
                    kind: ElementKind::ScenarioOutline,
                    ..Default::default()
                },
                Element {
                    kind: ElementKind::ExampleRow,
                    steps: vec![Step::new("Given ", "a row", 9)],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            FeatureRow::from_feature(&feature),
            FeatureRow {
                feature: "Login".into(),
                uri: "features/login.feature".into(),
                scenarios: 2,
                failed: 1,
                steps: 3,
                pages: 1,
                emails: 1,
            }
        );
    }
}
