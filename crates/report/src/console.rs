//! Console reporter: live progress lines and the end-of-suite summary
//!
//! Everything goes through a [`FormatTable`], so the same code produces
//! colored terminal output and plain text for tests and pipes.

use std::io::Write;
use std::time::Duration;

use stepview_common::{
    BackgroundStep, Element, ElementKind, Feature, MultilineArg, ReportDocument, Stats, Status, Step, StepError,
    Tally,
};

use crate::config::ReporterConfig;
use crate::error::ReportResult;
use crate::format::{FormatKey, FormatTable};
use crate::snippet::{self, SnippetDialect};
use crate::wrap::{indent, linebreaks};

const SCENARIO_INDENT: usize = 2;
const STEP_INDENT: usize = 4;
const DETAIL_INDENT: usize = 6;

/// Console behavior switches
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleOptions {
    pub source: bool,
    pub snippets: bool,
    pub wip: bool,
    pub truncate_width: Option<usize>,
    pub buffer_messages: bool,
    pub profiles: Vec<String>,
    pub rerun_command: String,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self::from(&ReporterConfig::default())
    }
}

impl From<&ReporterConfig> for ConsoleOptions {
    fn from(config: &ReporterConfig) -> Self {
        Self {
            source: config.source,
            snippets: config.snippets,
            wip: config.wip,
            truncate_width: config.truncate_width,
            buffer_messages: config.buffer_messages,
            profiles: config.profiles.clone(),
            rerun_command: config.rerun_command.clone(),
        }
    }
}

/// Messages held back until the current step or table row is done
#[derive(Debug, Default)]
pub struct MessageBuffer {
    messages: Vec<String>,
}

impl MessageBuffer {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

/// Terminal renderer for one suite run
pub struct Console<W: Write> {
    out: W,
    formats: FormatTable,
    options: ConsoleOptions,
    buffer: MessageBuffer,
    /// Inside an example row: messages wait for the row to finish
    in_table_row: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, formats: FormatTable, options: ConsoleOptions) -> Self {
        Self {
            out,
            formats,
            options,
            buffer: MessageBuffer::default(),
            in_table_row: false,
        }
    }

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Tags, `Feature: name` and the description
    pub fn feature_name(&mut self, feature: &Feature) -> ReportResult<()> {
        self.tags(&feature.tags, 0)?;
        let mut lines = feature.name.lines();
        let first = lines.next().unwrap_or_default();
        let heading = format!("{}: {}", feature.keyword, first);
        let comment = self
            .options
            .source
            .then(|| feature.location(feature.line));
        self.line_with_comment(&heading, comment.as_deref())?;
        for line in lines.chain(feature.description.lines()) {
            writeln!(self.out, "{}", indent(line.trim(), SCENARIO_INDENT))?;
        }
        Ok(())
    }

    /// Blank line, tags and the element heading of a scenario or background
    pub fn scenario_name(&mut self, feature: &Feature, element: &Element) -> ReportResult<()> {
        self.in_table_row = element.kind == ElementKind::ExampleRow;
        let depth = if self.in_table_row {
            STEP_INDENT
        } else {
            SCENARIO_INDENT
        };
        writeln!(self.out)?;
        self.tags(&element.tags, depth)?;

        let mut lines = element.name.lines();
        let first = lines.next().unwrap_or_default();
        let heading = indent(&format!("{}: {}", element.keyword, first), depth);
        let comment = self.options.source.then(|| feature.location(element.line));
        self.line_with_comment(&heading, comment.as_deref())?;
        for line in lines {
            writeln!(self.out, "{}", indent(line.trim(), depth + 2))?;
        }
        Ok(())
    }

    /// A finished step with its multiline argument, exception and any
    /// buffered messages
    pub fn step(&mut self, step: &Step) -> ReportResult<()> {
        let status = step.status;
        let text = format!(
            "{}{}{}",
            " ".repeat(STEP_INDENT),
            self.formats.paint(FormatKey::status(status), &step.keyword),
            self.step_name(step)
        );
        let comment = if self.options.source {
            step.location.as_deref()
        } else {
            None
        };
        self.line_with_comment(&text, comment)?;

        if let Some(arg) = &step.multiline_arg {
            let rendered = multiline_text(arg);
            let rendered = indent(&rendered, DETAIL_INDENT);
            writeln!(self.out, "{}", self.formats.format_string(&rendered, FormatKey::status(status)))?;
        }
        if let Some(exception) = &step.exception {
            let text = indent(&exception_text(exception, self.options.truncate_width), DETAIL_INDENT);
            writeln!(self.out, "{}", self.formats.format_string(&text, FormatKey::status(status)))?;
        }
        if self.in_table_row {
            return Ok(());
        }
        self.print_messages()
    }

    /// Output from a step definition
    pub fn puts(&mut self, message: &str) -> ReportResult<()> {
        if self.options.buffer_messages {
            self.buffer.push(message);
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", self.formats.format_string(message, FormatKey::TAG))?;
        Ok(())
    }

    /// Flush buffered messages, one per line under the step
    pub fn print_messages(&mut self) -> ReportResult<()> {
        for message in self.buffer.take() {
            let text = indent(&message, DETAIL_INDENT);
            writeln!(self.out, "{}", self.formats.format_string(&text, FormatKey::TAG))?;
        }
        Ok(())
    }

    /// Flush buffered messages as a single line after a table row
    pub fn print_table_row_messages(&mut self) -> ReportResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let joined = self.buffer.take().join(", ");
        writeln!(self.out, "{}", indent(&self.formats.paint(FormatKey::TAG, &joined), SCENARIO_INDENT))?;
        Ok(())
    }

    /// Called when an element is done; flushes what the element held back
    pub fn scenario_finished(&mut self, element: &Element) -> ReportResult<()> {
        self.in_table_row = false;
        match element.kind {
            ElementKind::ExampleRow => self.print_table_row_messages(),
            _ => self.print_messages(),
        }
    }

    /// End-of-suite summary. `background` holds the background steps that
    /// did not pass; they are no longer part of the pruned document.
    pub fn summary(
        &mut self,
        doc: &ReportDocument,
        background: &[BackgroundStep],
        elapsed: Duration,
        languages: &[String],
    ) -> ReportResult<()> {
        writeln!(self.out)?;
        self.print_pending(doc, background)?;
        self.print_failed(doc, background)?;
        self.print_stats(doc, elapsed)?;
        if self.options.snippets {
            self.print_snippets(doc, languages)?;
        }
        if self.options.wip {
            self.print_wip(doc)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn print_pending(
        &mut self,
        doc: &ReportDocument,
        background: &[BackgroundStep],
    ) -> ReportResult<()> {
        let key = FormatKey::status(Status::Pending);
        let pending: Vec<String> = background
            .iter()
            .map(|b| (b.location(), &b.step))
            .chain(doc.steps().map(|(f, _, s)| (f.location(s.line), s)))
            .filter(|(_, s)| s.status == Status::Pending)
            .map(|(location, s)| format!("{}:in `{}{}'", location, s.keyword, s.name))
            .collect();
        if pending.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{}", self.formats.paint(key, "(::) pending steps (::)"))?;
        writeln!(self.out)?;
        for line in pending {
            writeln!(self.out, "{}", self.formats.paint(key, &line))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn print_failed(
        &mut self,
        doc: &ReportDocument,
        background: &[BackgroundStep],
    ) -> ReportResult<()> {
        let key = FormatKey::status(Status::Failed);
        let failures: Vec<String> = background
            .iter()
            .map(|b| &b.step)
            .chain(doc.steps().map(|(_, _, s)| s))
            .filter(|s| s.status == Status::Failed)
            .filter_map(|s| s.exception.as_ref())
            .map(|e| exception_text(e, self.options.truncate_width))
            .collect();
        if failures.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{}", self.formats.paint(key, "(::) failed steps (::)"))?;
        writeln!(self.out)?;
        for failure in failures {
            writeln!(self.out, "{}", self.formats.format_string(&failure, key))?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn print_stats(&mut self, doc: &ReportDocument, elapsed: Duration) -> ReportResult<()> {
        self.print_rerun_list(doc, Status::Failed, "Failing Scenarios:", Status::Failed)?;

        let stats = Stats::collect(doc);
        let scenarios = count_summary(&stats.scenarios, "scenario", &self.formats);
        let steps = count_summary(&stats.steps, "step", &self.formats);
        writeln!(self.out, "{}", scenarios)?;
        writeln!(self.out, "{}", steps)?;
        writeln!(self.out, "{}", format_duration(elapsed))?;
        Ok(())
    }

    fn print_snippets(&mut self, doc: &ReportDocument, languages: &[String]) -> ReportResult<()> {
        let (dialect, guessed) = SnippetDialect::resolve(languages);
        let snippets = snippet::snippets(doc, dialect);
        if snippets.is_empty() {
            return Ok(());
        }
        let key = FormatKey::status(Status::Undefined);
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            self.formats
                .paint(key, "You can implement step definitions for undefined steps with these snippets:")
        )?;
        writeln!(self.out)?;
        for snippet in snippets {
            writeln!(self.out, "{}", self.formats.format_string(&snippet, key))?;
            writeln!(self.out)?;
        }
        if guessed {
            let note = format!(
                "Snippets are shown in {}. Report the step definition language in \
                 suite_finished.languages to get snippets in another language.",
                dialect.name()
            );
            writeln!(self.out, "{}", self.formats.paint(key, &note))?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn print_wip(&mut self, doc: &ReportDocument) -> ReportResult<()> {
        let passed = rerun_lines(doc, Status::Passed, &self.options);
        if passed.is_empty() {
            let note = "The --wip switch was used, so the failures were expected. All is good.";
            writeln!(self.out, "{}", self.formats.paint(FormatKey::status(Status::Passed), note))?;
            return Ok(());
        }
        self.print_rerun_list(
            doc,
            Status::Passed,
            "The --wip switch was used, so I didn't expect anything to pass. These scenarios passed:",
            Status::Failed,
        )
    }

    fn print_rerun_list(
        &mut self,
        doc: &ReportDocument,
        status: Status,
        heading: &str,
        heading_status: Status,
    ) -> ReportResult<()> {
        let lines = rerun_lines(doc, status, &self.options);
        if lines.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{}", self.formats.paint(FormatKey::status(heading_status), heading))?;
        writeln!(self.out)?;
        for (command, comment) in lines {
            let command = self.formats.paint(FormatKey::status(status), &command);
            match comment {
                Some(comment) if self.options.source => {
                    writeln!(self.out, "{} {}", command, self.formats.paint(FormatKey::COMMENT, &comment))?
                }
                _ => writeln!(self.out, "{}", command)?,
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn tags(&mut self, tags: &[String], depth: usize) -> ReportResult<()> {
        if tags.is_empty() {
            return Ok(());
        }
        let line = indent(&tags.join(" "), depth);
        writeln!(self.out, "{}", self.formats.paint(FormatKey::TAG, &line))?;
        Ok(())
    }

    fn line_with_comment(&mut self, text: &str, comment: Option<&str>) -> ReportResult<()> {
        match comment {
            Some(comment) => writeln!(
                self.out,
                "{} {}",
                text,
                self.formats.paint(FormatKey::COMMENT, &format!("# {}", comment))
            )?,
            None => writeln!(self.out, "{}", text)?,
        }
        Ok(())
    }

    /// Step name with matched arguments in the parameter style
    fn step_name(&self, step: &Step) -> String {
        let text_key = FormatKey::status(step.status);
        let param_key = FormatKey::param(step.status);
        let name = step.name.as_str();

        let mut args: Vec<_> = step.args.iter().collect();
        args.sort_by_key(|a| a.offset);

        let mut out = String::new();
        let mut cursor = 0;
        for arg in args {
            let end = arg.offset + arg.value.len();
            let fits = arg.offset >= cursor
                && name.get(arg.offset..end) == Some(arg.value.as_str());
            if !fits || arg.value.is_empty() {
                continue;
            }
            out.push_str(&self.formats.paint(text_key, &name[cursor..arg.offset]));
            out.push_str(&self.formats.paint(param_key, &arg.value));
            cursor = end;
        }
        out.push_str(&self.formats.paint(text_key, &name[cursor..]));
        out
    }
}

/// `message (kind)` optionally wrapped, followed by the backtrace
pub fn exception_text(error: &StepError, truncate_width: Option<usize>) -> String {
    let head = format!("{} ({})", error.message, error.kind);
    let head = match truncate_width {
        Some(width) => linebreaks(&head, width),
        None => head,
    };
    std::iter::once(head)
        .chain(error.backtrace.iter().cloned())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<minutes>m<seconds>.<millis>s`
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let minutes = (total / 60.0).floor();
    format!("{}m{:.3}s", minutes as u64, total - minutes * 60.0)
}

/// `3 scenarios (1 failed, 2 passed)` with each count in its status style
pub fn count_summary(tally: &Tally, noun: &str, formats: &FormatTable) -> String {
    let total = tally.total();
    let plural = if total == 1 { "" } else { "s" };
    let mut line = format!("{} {}{}", total, noun, plural);
    let parts: Vec<String> = Status::SUMMARY_ORDER
        .iter()
        .filter(|s| tally.get(**s) > 0)
        .map(|s| formats.paint(FormatKey::status(*s), &format!("{} {}", tally.get(*s), s)))
        .collect();
    if !parts.is_empty() {
        line.push_str(&format!(" ({})", parts.join(", ")));
    }
    line
}

/// Doc string in `"""` fences or a table with aligned columns
pub fn multiline_text(arg: &MultilineArg) -> String {
    match arg {
        MultilineArg::DocString {
            content,
            content_type,
        } => {
            let fence = format!("\"\"\"{}", content_type.as_deref().unwrap_or_default());
            format!("{}\n{}\n\"\"\"", fence, content)
        }
        MultilineArg::Table { rows } => {
            let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
            let widths: Vec<usize> = (0..columns)
                .map(|c| {
                    rows.iter()
                        .filter_map(|r| r.get(c))
                        .map(|cell| cell.chars().count())
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            rows.iter()
                .map(|row| {
                    let cells: Vec<String> = widths
                        .iter()
                        .enumerate()
                        .map(|(c, width)| {
                            let cell = row.get(c).map(String::as_str).unwrap_or_default();
                            format!(" {:<width$} ", cell, width = *width)
                        })
                        .collect();
                    format!("|{}|", cells.join("|"))
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Rerun commands for scenarios with the given status, outline rows folded
/// onto their outline, duplicates removed
fn rerun_lines(
    doc: &ReportDocument,
    status: Status,
    options: &ConsoleOptions,
) -> Vec<(String, Option<String>)> {
    let mut prefix = options.rerun_command.clone();
    for profile in &options.profiles {
        prefix.push_str(&format!(" -p {}", profile));
    }

    let mut lines: Vec<(String, Option<String>)> = Vec::new();
    for (feature, element) in doc.elements() {
        let counted = matches!(element.kind, ElementKind::Scenario | ElementKind::ExampleRow);
        if !counted || element.status != status {
            continue;
        }
        let command = format!("{} {}", prefix, feature.location(element.rerun_line()));
        if lines.iter().any(|(c, _)| *c == command) {
            continue;
        }
        let comment = format!("# {}: {}", element.keyword, element.name);
        lines.push((command, Some(comment)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepview_common::MatchedArg;

    fn console(options: ConsoleOptions) -> Console<Vec<u8>> {
        Console::new(Vec::new(), FormatTable::monochrome(), options)
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    fn step(keyword: &str, name: &str, line: u32, status: Status) -> Step {
        Step {
            status,
            ..Step::new(keyword, name, line)
        }
    }

    fn login_document() -> ReportDocument {
        let failing = StepError {
            message: "expected dashboard".into(),
            kind: "AssertionError".into(),
            backtrace: vec!["steps/login.rs:42".into()],
        };
        let mut failed_step = step("Then ", "I see the dashboard", 5, Status::Failed);
        failed_step.exception = Some(failing);

        let scenario = |name: &str, line: u32, status: Status, steps: Vec<Step>| Element {
            kind: ElementKind::Scenario,
            keyword: "Scenario".into(),
            name: name.into(),
            line,
            status,
            steps,
            ..Default::default()
        };
        let row = |line: u32, status: Status| Element {
            kind: ElementKind::ExampleRow,
            keyword: "Example".into(),
            name: format!("row {}", line),
            line,
            outline_line: Some(10),
            status,
            steps: vec![step("Given ", "a row", line, status)],
            ..Default::default()
        };

        ReportDocument {
            features: vec![Feature {
                keyword: "Feature".into(),
                name: "Login".into(),
                uri: "features/login.feature".into(),
                line: 1,
                elements: vec![
                    scenario(
                        "Valid login",
                        3,
                        Status::Failed,
                        vec![step("Given ", "I am on the login page", 4, Status::Passed), failed_step],
                    ),
                    scenario(
                        "Reset",
                        7,
                        Status::Pending,
                        vec![step("Given ", "I forgot my password", 8, Status::Pending)],
                    ),
                    row(14, Status::Failed),
                    row(15, Status::Failed),
                ],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_step_line_with_params_and_comment() {
        let mut console = console(ConsoleOptions::default());
        let mut s = step("Given ", r#"I log in as "admin""#, 4, Status::Passed);
        s.args = vec![MatchedArg {
            offset: 13,
            value: "admin".into(),
        }];
        s.location = Some("steps/login.rs:10".into());

        console.step(&s).unwrap();
        assert_eq!(
            output(console),
            "    Given I log in as \"admin\" # steps/login.rs:10\n"
        );
    }

    #[test]
    fn test_params_use_param_style() {
        colored::control::set_override(true);
        let table = FormatTable::new(None, true).unwrap();
        let mut s = step("Given ", "I have 3 cukes", 4, Status::Passed);
        s.args = vec![MatchedArg {
            offset: 7,
            value: "3".into(),
        }];
        let expected = format!(
            "{}{}{}",
            table.paint(FormatKey::status(Status::Passed), "I have "),
            table.paint(FormatKey::param(Status::Passed), "3"),
            table.paint(FormatKey::status(Status::Passed), " cukes"),
        );
        let console = Console::new(Vec::new(), table, ConsoleOptions::default());
        let name = console.step_name(&s);
        colored::control::unset_override();

        assert_eq!(name, expected);
        assert_ne!(name, "I have 3 cukes");
    }

    #[test]
    fn test_step_with_exception_and_table() {
        let mut console = console(ConsoleOptions {
            source: false,
            ..Default::default()
        });
        let mut s = step("Then ", "the totals are", 9, Status::Failed);
        s.multiline_arg = Some(MultilineArg::Table {
            rows: vec![
                vec!["name".into(), "total".into()],
                vec!["apples".into(), "3".into()],
            ],
        });
        s.exception = Some(StepError {
            message: "bad total".into(),
            kind: "Mismatch".into(),
            backtrace: vec!["steps.rs:1".into()],
        });

        console.step(&s).unwrap();
        assert_eq!(
            output(console),
            "    Then the totals are\n\
             \x20     | name   | total |\n\
             \x20     | apples | 3     |\n\
             \x20     bad total (Mismatch)\n\
             \x20     steps.rs:1\n"
        );
    }

    #[test]
    fn test_exception_text_wraps_message_only() {
        let error = StepError {
            message: "aaa bbb ccc".into(),
            kind: "E".into(),
            backtrace: vec!["a very long backtrace line".into()],
        };
        assert_eq!(
            exception_text(&error, Some(7)),
            "aaa bbb\nccc (E)\na very long backtrace line"
        );
        assert_eq!(
            exception_text(&error, None),
            "aaa bbb ccc (E)\na very long backtrace line"
        );
    }

    #[test]
    fn test_buffered_messages_flush_after_step() {
        let mut console = console(ConsoleOptions {
            buffer_messages: true,
            source: false,
            ..Default::default()
        });
        console.puts("first").unwrap();
        console.puts("second").unwrap();
        assert!(console.get_ref().is_empty());

        console.step(&step("Given ", "x", 1, Status::Passed)).unwrap();
        assert_eq!(output(console), "    Given x\n      first\n      second\n");
    }

    #[test]
    fn test_table_row_messages_join() {
        let mut console = console(ConsoleOptions {
            buffer_messages: true,
            ..Default::default()
        });
        console.puts("a").unwrap();
        console.puts("b").unwrap();
        console
            .scenario_finished(&Element {
                kind: ElementKind::ExampleRow,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(output(console), "  a, b\n");
    }

    #[test]
    fn test_unbuffered_message_prints_immediately() {
        let mut console = console(ConsoleOptions::default());
        console.puts("hello").unwrap();
        assert_eq!(output(console), "\nhello\n");
    }

    #[test]
    fn test_summary_sections_in_order() {
        let mut console = console(ConsoleOptions {
            profiles: vec!["ci".into()],
            ..Default::default()
        });
        console
            .summary(&login_document(), &[], Duration::from_millis(61_500), &[])
            .unwrap();
        let out = output(console);

        let pending = out.find("(::) pending steps (::)").unwrap();
        let failed = out.find("(::) failed steps (::)").unwrap();
        let failing = out.find("Failing Scenarios:").unwrap();
        let counts = out.find("4 scenarios (3 failed, 1 pending)").unwrap();
        assert!(pending < failed && failed < failing && failing < counts);

        assert!(out.contains("features/login.feature:8:in `Given I forgot my password'"));
        assert!(out.contains("expected dashboard (AssertionError)\nsteps/login.rs:42"));
        assert!(out.contains("cucumber -p ci features/login.feature:3 # Scenario: Valid login\n"));
        assert_eq!(out.matches("features/login.feature:10").count(), 1);
        assert!(out.contains("5 steps (3 failed, 1 pending, 1 passed)\n"));
        assert!(out.contains("1m1.500s"));
        assert!(!out.contains("--wip"));
    }

    #[test]
    fn test_summary_prints_snippets_with_language_note() {
        let mut doc = login_document();
        doc.features[0].elements[1].steps[0].status = Status::Undefined;

        let mut console = console(ConsoleOptions::default());
        console.summary(&doc, &[], Duration::ZERO, &[]).unwrap();
        let out = output(console);
        assert!(out.contains("#[given(expr = \"I forgot my password\")]"));
        assert!(out.contains("Snippets are shown in Rust."));

        let mut console = console_with_snippets_off();
        console.summary(&doc, &[], Duration::ZERO, &["rust".into()]).unwrap();
        assert!(!output(console).contains("#[given"));
    }

    fn console_with_snippets_off() -> Console<Vec<u8>> {
        console(ConsoleOptions {
            snippets: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_wip_reports_passing_scenarios() {
        let mut doc = login_document();
        doc.features[0].elements[0].status = Status::Passed;

        let mut console = console(ConsoleOptions {
            wip: true,
            source: false,
            ..Default::default()
        });
        console.summary(&doc, &[], Duration::ZERO, &[]).unwrap();
        let out = output(console);
        assert!(out.contains("These scenarios passed:\n\ncucumber features/login.feature:3\n"));
    }

    #[test]
    fn test_wip_without_passing_scenarios() {
        let mut console = console(ConsoleOptions {
            wip: true,
            ..Default::default()
        });
        console.summary(&login_document(), &[], Duration::ZERO, &[]).unwrap();
        assert!(output(console).contains("the failures were expected. All is good."));
    }

    #[test]
    fn test_count_summary() {
        let formats = FormatTable::monochrome();
        let mut tally = Tally::default();
        assert_eq!(count_summary(&tally, "scenario", &formats), "0 scenarios");
        tally.add(Status::Passed);
        assert_eq!(count_summary(&tally, "scenario", &formats), "1 scenario (1 passed)");
        tally.add(Status::Skipped);
        tally.add(Status::Failed);
        assert_eq!(
            count_summary(&tally, "step", &formats),
            "3 steps (1 failed, 1 skipped, 1 passed)"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0m0.000s");
        assert_eq!(format_duration(Duration::from_millis(1_234)), "0m1.234s");
        assert_eq!(format_duration(Duration::from_millis(125_050)), "2m5.050s");
    }

    #[test]
    fn test_scenario_heading() {
        let feature = Feature {
            uri: "features/a.feature".into(),
            ..Default::default()
        };
        let element = Element {
            keyword: "Scenario".into(),
            name: "Valid login\nwith remember me".into(),
            line: 3,
            tags: vec!["@smoke".into()],
            ..Default::default()
        };
        let mut console = console(ConsoleOptions::default());
        console.scenario_name(&feature, &element).unwrap();
        assert_eq!(
            output(console),
            "\n  @smoke\n  Scenario: Valid login # features/a.feature:3\n    with remember me\n"
        );
    }
}
