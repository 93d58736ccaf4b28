//! Report tree finalization: background pruning and serialization

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::document::{BackgroundStep, Feature, ReportDocument, Status};
use crate::Result;

/// Remove background elements from a single feature.
///
/// Runners report the background once per scenario, so it appears as a
/// duplicated element in front of every scenario.
pub fn prune_feature(feature: &mut Feature) -> usize {
    let before = feature.elements.len();
    feature.elements.retain(|element| !element.is_background());
    before - feature.elements.len()
}

/// Background steps of a feature that failed, are pending or undefined.
///
/// The background repeats in front of every scenario, so each step line is
/// reported once.
pub fn background_issues(feature: &Feature) -> Vec<BackgroundStep> {
    let mut issues: Vec<BackgroundStep> = Vec::new();
    let steps = feature
        .elements
        .iter()
        .filter(|element| element.is_background())
        .flat_map(|element| element.steps.iter());
    for step in steps {
        if matches!(step.status, Status::Passed | Status::Skipped) {
            continue;
        }
        if issues.iter().any(|seen| seen.step.line == step.line) {
            continue;
        }
        issues.push(BackgroundStep {
            feature_uri: feature.uri.clone(),
            step: step.clone(),
        });
    }
    issues
}

/// Remove background elements from every feature of the document
pub fn prune(doc: &mut ReportDocument) {
    let removed: usize = doc.features.iter_mut().map(prune_feature).sum();
    if removed > 0 {
        debug!("Pruned {} background element(s)", removed);
    }
}

/// Serialize the document as pretty-printed JSON
pub fn finalize(doc: &ReportDocument) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(doc)?)
}

/// Serialize the document and write it to `path` via a temp file
pub fn write(doc: &ReportDocument, path: &Path) -> Result<()> {
    let bytes = finalize(doc)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &bytes)?;
    fs::rename(&tmp_path, path)?;

    info!("Report written to: {}", path.display());
    Ok(())
}
