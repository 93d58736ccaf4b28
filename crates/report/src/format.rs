//! Status and role to terminal style mapping
//!
//! Every line the console prints is styled through a [`FormatKey`]: the kind
//! of line (a step status, a source comment or a tag) and the role of the
//! text inside it (plain text or a matched step parameter). The table is
//! complete by construction and checked once when it is built.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use colored::{Color, ColoredString, Colorize};
use stepview_common::Status;

use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Status(Status),
    Comment,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Text,
    Param,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatKey {
    pub kind: LineKind,
    pub role: Role,
}

impl FormatKey {
    pub const COMMENT: FormatKey = FormatKey::text(LineKind::Comment);
    pub const TAG: FormatKey = FormatKey::text(LineKind::Tag);

    pub const fn text(kind: LineKind) -> Self {
        Self {
            kind,
            role: Role::Text,
        }
    }

    pub const fn status(status: Status) -> Self {
        Self::text(LineKind::Status(status))
    }

    pub const fn param(status: Status) -> Self {
        Self {
            kind: LineKind::Status(status),
            role: Role::Param,
        }
    }

    /// Every key the console may ask for
    pub fn required() -> Vec<FormatKey> {
        let mut keys = Vec::with_capacity(12);
        for status in Status::SUMMARY_ORDER {
            keys.push(Self::status(status));
            keys.push(Self::param(status));
        }
        keys.push(Self::COMMENT);
        keys.push(Self::TAG);
        keys
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.kind {
            LineKind::Status(status) => status.as_str(),
            LineKind::Comment => "comment",
            LineKind::Tag => "tag",
        };
        match self.role {
            Role::Text => f.write_str(base),
            Role::Param => write!(f, "{}_param", base),
        }
    }
}

impl FromStr for FormatKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKey::required()
            .into_iter()
            .find(|k| k.to_string() == s)
            .ok_or_else(|| ReportError::InvalidStyle {
                spec: s.to_string(),
                reason: "unknown format name".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Bold,
    Dimmed,
    Italic,
    Underline,
}

/// An optional foreground color plus decorations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<Color>,
    pub decorations: Vec<Decoration>,
}

impl Style {
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            decorations: Vec::new(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.decorations.push(Decoration::Bold);
        self
    }

    pub fn paint(&self, text: &str) -> String {
        let mut painted: ColoredString = text.normal();
        if let Some(color) = self.color {
            painted = painted.color(color);
        }
        for decoration in &self.decorations {
            painted = match decoration {
                Decoration::Bold => painted.bold(),
                Decoration::Dimmed => painted.dimmed(),
                Decoration::Italic => painted.italic(),
                Decoration::Underline => painted.underline(),
            };
        }
        painted.to_string()
    }
}

impl FromStr for Style {
    type Err = ReportError;

    /// Parse `red,bold` style lists
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut style = Style::default();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part {
                "bold" => style.decorations.push(Decoration::Bold),
                "dimmed" | "dim" => style.decorations.push(Decoration::Dimmed),
                "italic" => style.decorations.push(Decoration::Italic),
                "underline" => style.decorations.push(Decoration::Underline),
                "grey" | "gray" => style.color = Some(Color::BrightBlack),
                color => {
                    let parsed = color.parse::<Color>().map_err(|_| ReportError::InvalidStyle {
                        spec: spec.to_string(),
                        reason: format!("unknown color or decoration '{}'", color),
                    })?;
                    style.color = Some(parsed);
                }
            }
        }
        Ok(style)
    }
}

/// Complete mapping from format keys to styles
#[derive(Debug, Clone)]
pub struct FormatTable {
    styles: HashMap<FormatKey, Style>,
    color: bool,
}

impl FormatTable {
    /// Default styles with optional `key=style:key=style` overrides
    pub fn new(overrides: Option<&str>, color: bool) -> ReportResult<Self> {
        let mut styles = default_styles();
        if let Some(overrides) = overrides {
            for (key, style) in parse_overrides(overrides)? {
                styles.insert(key, style);
            }
        }
        Self::from_styles(styles, color)
    }

    /// Table that never emits escape codes
    pub fn monochrome() -> Self {
        Self {
            styles: default_styles(),
            color: false,
        }
    }

    /// Build from an explicit map, failing on the first missing key
    pub fn from_styles(styles: HashMap<FormatKey, Style>, color: bool) -> ReportResult<Self> {
        if let Some(missing) = FormatKey::required()
            .into_iter()
            .find(|k| !styles.contains_key(k))
        {
            return Err(ReportError::MissingFormat(missing));
        }
        Ok(Self { styles, color })
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    /// Style a single-line fragment
    pub fn paint(&self, key: FormatKey, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match self.styles.get(&key) {
            Some(style) => style.paint(text),
            None => text.to_string(),
        }
    }

    /// Style every line of `text` separately
    pub fn format_string(&self, text: &str, key: FormatKey) -> String {
        text.split('\n')
            .map(|line| self.paint(key, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn default_styles() -> HashMap<FormatKey, Style> {
    let mut styles = HashMap::new();
    for (status, color) in [
        (Status::Passed, Color::Green),
        (Status::Failed, Color::Red),
        (Status::Skipped, Color::Cyan),
        (Status::Pending, Color::Yellow),
        (Status::Undefined, Color::Yellow),
    ] {
        styles.insert(FormatKey::status(status), Style::color(color));
        styles.insert(FormatKey::param(status), Style::color(color).bold());
    }
    styles.insert(FormatKey::COMMENT, Style::color(Color::BrightBlack));
    styles.insert(FormatKey::TAG, Style::color(Color::Cyan));
    styles
}

fn parse_overrides(spec: &str) -> ReportResult<Vec<(FormatKey, Style)>> {
    spec.split(':')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> ReportResult<(FormatKey, Style)> {
            let (key, style) = entry.split_once('=').ok_or_else(|| ReportError::InvalidStyle {
                spec: entry.to_string(),
                reason: "expected name=style".to_string(),
            })?;
            Ok((key.trim().parse()?, style.parse()?))
        })
        .collect()
}
