//! Step-to-artifact correlation
//!
//! The correlator owns the report document for the whole run. Each finished
//! step gets exactly one page (a staged document or a screenshot) and the
//! mails sent while it ran, stored content-addressed under `results/`.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use stepview_common::store::HTML_SUFFIX;
use stepview_common::{
    assets, tree, ArtifactStore, AssetRewriter, Attachment, BackgroundStep, Element, ElementKind,
    EmailBody, EmailSummary, Feature, OutputLayout, ReportDocument, Status, Step,
};

use crate::capture::{self, CaptureError, Mail, MailCapture, MailContent, NoScreen, Outbox, ScreenCapture};
use crate::error::{ReportError, ReportResult};
use crate::events::{FeatureStarted, ScenarioStarted, StepFinished, StepStarted, SuiteFinished, SuiteListener};

pub struct Correlator {
    document: ReportDocument,
    layout: OutputLayout,
    store: ArtifactStore,
    rewriter: Option<AssetRewriter>,
    screen: Box<dyn ScreenCapture>,
    outbox: Outbox,
    mail_sources: Vec<Box<dyn MailCapture>>,
    staged: Option<String>,
    /// Outcome of the background that ran last, inherited by the next scenario
    background_status: Option<Status>,
    background_steps: Vec<BackgroundStep>,
}

impl Correlator {
    /// Prepare the output layout and open the artifact store under it
    pub fn open(layout: OutputLayout, asset_root: Option<&Path>) -> ReportResult<Self> {
        let rewriter = layout.prepare(asset_root)?;
        let store = ArtifactStore::open(layout.results_dir())?;
        Ok(Self {
            document: ReportDocument::new(),
            layout,
            store,
            rewriter,
            screen: Box::new(NoScreen),
            outbox: Outbox::new(),
            mail_sources: Vec::new(),
            staged: None,
            background_status: None,
            background_steps: Vec::new(),
        })
    }

    pub fn with_screen(mut self, screen: impl ScreenCapture + 'static) -> Self {
        self.screen = Box::new(screen);
        self
    }

    /// Mail source drained after every step, next to the built-in outbox
    pub fn add_mail_source(&mut self, source: Box<dyn MailCapture>) {
        self.mail_sources.push(source);
    }

    pub fn document(&self) -> &ReportDocument {
        &self.document
    }

    pub fn into_document(self) -> ReportDocument {
        self.document
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Background steps that did not pass, from every pruned background
    pub fn background_steps(&self) -> &[BackgroundStep] {
        &self.background_steps
    }

    /// Use `html` as the page of the step that finishes next
    pub fn stage_document(&mut self, html: impl Into<String>) {
        self.staged = Some(html.into());
    }

    /// Prune backgrounds and write `results.json`
    pub fn finish(&mut self) -> ReportResult<PathBuf> {
        for feature in &self.document.features {
            self.background_steps.extend(tree::background_issues(feature));
        }
        tree::prune(&mut self.document);
        let path = self.layout.results_json();
        tree::write(&self.document, &path)?;
        let stats = self.store.stats();
        info!(
            "Report complete: {} feature(s), {} artifact(s) written, {} reused",
            self.document.features.len(),
            stats.writes,
            stats.hits
        );
        Ok(path)
    }

    /// The staged document, or else a screenshot of the current page
    fn capture_page(&mut self) -> ReportResult<Option<String>> {
        if let Some(html) = self.staged.take() {
            let html = assets::rewrite(self.rewriter.as_ref(), &html);
            let name = self.store.put(html, HTML_SUFFIX)?;
            debug!("Stored captured document as {}", name);
            return Ok(Some(name));
        }

        let path = capture::screenshot_path(&self.layout.screenshots_dir());
        match self.screen.save_screenshot(&path) {
            Ok(()) => {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let name = self.store.put(capture::screenshot_page(&filename), HTML_SUFFIX)?;
                debug!("Stored screenshot {} as {}", filename, name);
                Ok(Some(name))
            }
            Err(CaptureError::Unavailable(reason)) => {
                debug!("No screenshot taken: {}", reason);
                Ok(None)
            }
            Err(e) => {
                warn!("Screenshot capture failed, step has no page: {}", e);
                Ok(None)
            }
        }
    }

    fn capture_mails(&mut self) -> ReportResult<Vec<EmailSummary>> {
        let mut mails = self.outbox.drain();
        for source in &mut self.mail_sources {
            mails.extend(source.drain());
        }
        mails.iter().map(|mail| self.store_mail(mail)).collect()
    }

    fn store_mail(&mut self, mail: &Mail) -> ReportResult<EmailSummary> {
        let html = match mail.part(MailContent::Html) {
            Some(part) => {
                let body = assets::rewrite(self.rewriter.as_ref(), &part.body);
                Some(self.store.put(body, &MailContent::Html.suffix())?)
            }
            None => None,
        };
        let text = match mail.part(MailContent::Plain) {
            Some(part) => Some(
                self.store
                    .put(capture::plain_text_page(&part.body), &MailContent::Plain.suffix())?,
            ),
            None => None,
        };
        debug!("Stored mail '{}' to {}", mail.subject, mail.to.join(", "));

        Ok(EmailSummary {
            to: mail.to.clone(),
            from: mail.from.clone(),
            subject: mail.subject.clone(),
            body: EmailBody { html, text },
        })
    }

    fn current_step(&mut self) -> ReportResult<&mut Step> {
        self.document
            .current_step_mut()
            .ok_or_else(|| ReportError::OutOfOrder("step finished before any step started".to_string()))
    }
}

impl SuiteListener for Correlator {
    fn before_feature(&mut self, feature: &FeatureStarted) -> ReportResult<()> {
        debug!("Feature: {} ({})", feature.name, feature.uri);
        self.background_status = None;
        self.document.features.push(Feature {
            keyword: feature.keyword.clone(),
            name: feature.name.clone(),
            description: feature.description.clone(),
            uri: feature.uri.clone(),
            line: feature.line,
            tags: feature.tags.clone(),
            elements: Vec::new(),
        });
        Ok(())
    }

    fn before_scenario(&mut self, scenario: &ScenarioStarted) -> ReportResult<()> {
        let feature = self.document.current_feature_mut().ok_or_else(|| {
            ReportError::OutOfOrder(format!("scenario '{}' started outside a feature", scenario.name))
        })?;
        if let Some(background) = feature.elements.last().filter(|e| e.is_background()) {
            self.background_status = Some(background.status);
        }

        // A failed background skips the scenario's own steps; the scenario
        // carries the background's outcome instead
        let status = match scenario.kind {
            ElementKind::Scenario | ElementKind::ExampleRow => {
                self.background_status.take().unwrap_or_default()
            }
            _ => Status::default(),
        };
        feature.elements.push(Element {
            kind: scenario.kind,
            keyword: scenario.keyword.clone(),
            name: scenario.name.clone(),
            line: scenario.line,
            outline_line: scenario.outline_line,
            tags: scenario.tags.clone(),
            status,
            ..Default::default()
        });
        Ok(())
    }

    fn before_step(&mut self, step: &StepStarted) -> ReportResult<()> {
        let element = self.document.current_element_mut().ok_or_else(|| {
            ReportError::OutOfOrder(format!("step '{}' started outside a scenario", step.name))
        })?;
        element.steps.push(Step::new(step.keyword.clone(), step.name.clone(), step.line));
        Ok(())
    }

    fn after_step(&mut self, result: &StepFinished) -> ReportResult<()> {
        if self.current_step()?.attachment.is_some() {
            return Err(ReportError::OutOfOrder(
                "step finished twice without a new step starting".to_string(),
            ));
        }

        let html_file = self.capture_page()?;
        let emails = self.capture_mails()?;

        let step = self.current_step()?;
        step.status = result.status;
        step.location = result.location.clone();
        step.args = result.args.clone();
        step.multiline_arg = result.multiline_arg.clone();
        step.exception = result.exception.clone();
        step.duration_ms = result.duration_ms;
        step.attach(Attachment { html_file, emails })?;

        if let Some(element) = self.document.current_element_mut() {
            element.absorb(result.status);
        }
        Ok(())
    }

    fn after_feature(&mut self) -> ReportResult<()> {
        let feature = self
            .document
            .current_feature_mut()
            .ok_or_else(|| ReportError::OutOfOrder("feature finished before it started".to_string()))?;
        let issues = tree::background_issues(feature);
        let pruned = tree::prune_feature(feature);
        debug!("Finished feature {} ({} background(s) pruned)", feature.name, pruned);
        if !issues.is_empty() {
            warn!("{} background step(s) of {} did not pass", issues.len(), feature.uri);
        }
        self.background_steps.extend(issues);
        self.background_status = None;
        Ok(())
    }

    fn after_suite(&mut self, _suite: &SuiteFinished) -> ReportResult<()> {
        self.finish()?;
        Ok(())
    }

    fn document_captured(&mut self, html: &str) -> ReportResult<()> {
        self.stage_document(html);
        Ok(())
    }

    fn mail_delivered(&mut self, mail: &Mail) -> ReportResult<()> {
        self.outbox.deliver(mail.clone());
        Ok(())
    }
}
