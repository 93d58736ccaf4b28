//! Step definition snippets for undefined steps

use once_cell::sync::Lazy;
use regex::Regex;
use stepview_common::{MultilineArg, ReportDocument, Status, Step};

static PARAMETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""[^"]*"|-?\b\d+\.\d+\b|-?\b\d+\b"#).expect("static regex")
});

/// Target language of generated snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetDialect {
    /// `cucumber` crate attribute macros
    Rust,
    /// cucumber-js step functions
    JavaScript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    String,
    Int,
    Float,
}

impl ParamKind {
    fn name(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
        }
    }

    fn rust_type(&self) -> &'static str {
        match self {
            ParamKind::String => "String",
            ParamKind::Int => "i64",
            ParamKind::Float => "f64",
        }
    }
}

/// A step name turned into a cucumber expression
#[derive(Debug, Clone, PartialEq, Eq)]
struct Expression {
    text: String,
    params: Vec<ParamKind>,
    words: Vec<String>,
}

impl Expression {
    fn parse(name: &str) -> Self {
        let mut text = String::new();
        let mut params = Vec::new();
        let mut words = Vec::new();
        let mut last = 0;

        for m in PARAMETER.find_iter(name) {
            push_literal(&mut text, &mut words, &name[last..m.start()]);
            let kind = if m.as_str().starts_with('"') {
                ParamKind::String
            } else if m.as_str().contains('.') {
                ParamKind::Float
            } else {
                ParamKind::Int
            };
            text.push('{');
            text.push_str(kind.name());
            text.push('}');
            params.push(kind);
            last = m.end();
        }
        push_literal(&mut text, &mut words, &name[last..]);

        Self {
            text,
            params,
            words,
        }
    }

    /// Parameter names, numbered from the second use of a kind on
    fn param_names(&self) -> Vec<(String, ParamKind)> {
        let mut seen: Vec<ParamKind> = Vec::new();
        self.params
            .iter()
            .map(|kind| {
                seen.push(*kind);
                let n = seen.iter().filter(|k| *k == kind).count();
                let name = if n == 1 {
                    kind.name().to_string()
                } else {
                    format!("{}{}", kind.name(), n)
                };
                (name, *kind)
            })
            .collect()
    }

    fn function_name(&self) -> String {
        if self.words.is_empty() {
            return "step".to_string();
        }
        let name = self.words.join("_");
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("step_{}", name)
        } else {
            name
        }
    }
}

fn push_literal(text: &mut String, words: &mut Vec<String>, literal: &str) {
    for c in literal.chars() {
        if matches!(c, '(' | ')' | '{' | '}' | '/' | '\\') {
            text.push('\\');
        }
        text.push(c);
    }
    words.extend(
        literal
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase()),
    );
}

fn escape_quoted(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Given/When/Then for snippets; anything else reads as Given
fn canonical_keyword(keyword: &str) -> &'static str {
    match keyword.trim() {
        "When" => "When",
        "Then" => "Then",
        _ => "Given",
    }
}

impl SnippetDialect {
    pub fn from_language(language: &str) -> Option<Self> {
        match language.trim().to_ascii_lowercase().as_str() {
            "rust" | "rs" => Some(SnippetDialect::Rust),
            "javascript" | "js" | "typescript" | "ts" => Some(SnippetDialect::JavaScript),
            _ => None,
        }
    }

    /// Pick the dialect for the loaded step definition languages.
    ///
    /// Returns `true` as the second element when the choice is a guess
    /// because zero or several dialects were loaded.
    pub fn resolve(languages: &[String]) -> (Self, bool) {
        let mut dialects: Vec<SnippetDialect> = languages
            .iter()
            .filter_map(|l| Self::from_language(l))
            .collect();
        dialects.dedup();
        match dialects.as_slice() {
            [only] => (*only, false),
            _ => (SnippetDialect::Rust, true),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SnippetDialect::Rust => "Rust",
            SnippetDialect::JavaScript => "JavaScript",
        }
    }

    /// Step definition skeleton for one undefined step
    pub fn snippet(&self, keyword: &str, name: &str, multiline: Option<&MultilineArg>) -> String {
        let expr = Expression::parse(name);
        let keyword = canonical_keyword(keyword);

        match self {
            SnippetDialect::Rust => {
                let mut args = vec!["world: &mut World".to_string()];
                args.extend(
                    expr.param_names()
                        .into_iter()
                        .map(|(n, k)| format!("{}: {}", n, k.rust_type())),
                );
                if multiline.is_some() {
                    args.push("step: &Step".to_string());
                }
                format!(
                    "#[{}(expr = \"{}\")]\nasync fn {}({}) {{\n    todo!()\n}}",
                    keyword.to_lowercase(),
                    escape_quoted(&expr.text, '"'),
                    expr.function_name(),
                    args.join(", ")
                )
            }
            SnippetDialect::JavaScript => {
                let mut args: Vec<String> = expr.param_names().into_iter().map(|(n, _)| n).collect();
                match multiline {
                    Some(MultilineArg::DocString { .. }) => args.push("docString".to_string()),
                    Some(MultilineArg::Table { .. }) => args.push("dataTable".to_string()),
                    None => {}
                }
                format!(
                    "{}('{}', function ({}) {{\n  // Write code here that turns the phrase above into concrete actions\n  return 'pending';\n}});",
                    keyword,
                    escape_quoted(&expr.text, '\''),
                    args.join(", ")
                )
            }
        }
    }
}

/// Undefined steps in run order, with And/But/* resolved to the keyword
/// they continue
pub fn undefined_steps(doc: &ReportDocument) -> Vec<(&'static str, &Step)> {
    let mut found = Vec::new();
    for (_, element) in doc.elements() {
        let mut actual = "Given";
        for step in &element.steps {
            match step.keyword.trim() {
                "And" | "But" | "*" => {}
                other => actual = canonical_keyword(other),
            }
            if step.status == Status::Undefined {
                found.push((actual, step));
            }
        }
    }
    found
}

/// Deduplicated snippets for every undefined step of the document
pub fn snippets(doc: &ReportDocument, dialect: SnippetDialect) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (keyword, step) in undefined_steps(doc) {
        let snippet = dialect.snippet(keyword, &step.name, step.multiline_arg.as_ref());
        if !out.contains(&snippet) {
            out.push(snippet);
        }
    }
    out
}
