//! The listener a runner attaches: correlation plus console output

use std::io::Write;
use std::time::{Duration, Instant};

use stepview_common::{Element, Feature, OutputLayout, ReportDocument, Stats, Status};

use crate::capture::{Mail, ScreenCapture};
use crate::config::ReporterConfig;
use crate::console::{Console, ConsoleOptions};
use crate::correlator::Correlator;
use crate::error::ReportResult;
use crate::events::{FeatureStarted, ScenarioStarted, StepFinished, StepStarted, SuiteFinished, SuiteListener};
use crate::format::FormatTable;

/// Fans every runner event out to the [`Correlator`] and the [`Console`]
pub struct ReportFormatter<W: Write> {
    correlator: Correlator,
    console: Console<W>,
    started: Instant,
}

impl<W: Write> ReportFormatter<W> {
    pub fn new(correlator: Correlator, console: Console<W>) -> Self {
        Self {
            correlator,
            console,
            started: Instant::now(),
        }
    }

    /// Build the whole pipeline from configuration, printing to `out`
    pub fn from_config(config: &ReporterConfig, out: W) -> ReportResult<Self> {
        let formats = FormatTable::new(config.colors.as_deref(), config.color)?;
        let console = Console::new(out, formats, ConsoleOptions::from(config));
        let correlator = Correlator::open(
            OutputLayout::new(&config.output_dir),
            config.asset_root.as_deref(),
        )?;
        Ok(Self::new(correlator, console))
    }

    pub fn with_screen(mut self, screen: impl ScreenCapture + 'static) -> Self {
        self.correlator = self.correlator.with_screen(screen);
        self
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub fn correlator_mut(&mut self) -> &mut Correlator {
        &mut self.correlator
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn into_parts(self) -> (Correlator, Console<W>) {
        (self.correlator, self.console)
    }

    /// Whether any scenario or pruned background step failed so far
    pub fn has_failures(&self) -> bool {
        Stats::collect(self.correlator.document()).scenarios.failed > 0
            || self
                .correlator
                .background_steps()
                .iter()
                .any(|b| b.step.status == Status::Failed)
    }
}

fn current(doc: &ReportDocument) -> Option<(&Feature, &Element)> {
    let feature = doc.features.last()?;
    Some((feature, feature.elements.last()?))
}

impl<W: Write> SuiteListener for ReportFormatter<W> {
    fn before_feature(&mut self, feature: &FeatureStarted) -> ReportResult<()> {
        self.correlator.before_feature(feature)?;
        if let Some(feature) = self.correlator.document().features.last() {
            self.console.feature_name(feature)?;
        }
        Ok(())
    }

    fn before_scenario(&mut self, scenario: &ScenarioStarted) -> ReportResult<()> {
        self.correlator.before_scenario(scenario)?;
        if let Some((feature, element)) = current(self.correlator.document()) {
            self.console.scenario_name(feature, element)?;
        }
        Ok(())
    }

    fn before_step(&mut self, step: &StepStarted) -> ReportResult<()> {
        self.correlator.before_step(step)
    }

    fn after_step(&mut self, result: &StepFinished) -> ReportResult<()> {
        self.correlator.after_step(result)?;
        let step = current(self.correlator.document()).and_then(|(_, e)| e.steps.last());
        if let Some(step) = step {
            self.console.step(step)?;
        }
        Ok(())
    }

    fn after_scenario(&mut self) -> ReportResult<()> {
        self.correlator.after_scenario()?;
        if let Some((_, element)) = current(self.correlator.document()) {
            self.console.scenario_finished(element)?;
        }
        Ok(())
    }

    fn after_feature(&mut self) -> ReportResult<()> {
        self.correlator.after_feature()
    }

    fn after_suite(&mut self, suite: &SuiteFinished) -> ReportResult<()> {
        self.correlator.after_suite(suite)?;
        let elapsed = suite
            .duration_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.started.elapsed());
        self.console.summary(
            self.correlator.document(),
            self.correlator.background_steps(),
            elapsed,
            &suite.languages,
        )
    }

    fn message(&mut self, text: &str) -> ReportResult<()> {
        self.console.puts(text)
    }

    fn document_captured(&mut self, html: &str) -> ReportResult<()> {
        self.correlator.document_captured(html)
    }

    fn mail_delivered(&mut self, mail: &Mail) -> ReportResult<()> {
        self.correlator.mail_delivered(mail)
    }
}
