//! Rewriting of asset URLs in captured HTML
//!
//! Snapshots are rendered from `results/`, next to a copy of the
//! application's public directory in `results/public/`. Absolute asset URLs
//! are rewritten to point into that copy.

use once_cell::sync::Lazy;
use regex::Regex;

static REMOTE_IMAGES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(["'])https?://[^"'\s]*?/images"#).expect("static regex")
});

/// Rewrites absolute asset references to the co-located public copy
#[derive(Debug, Clone)]
pub struct AssetRewriter {
    local: Option<Regex>,
}

impl AssetRewriter {
    /// Build a rewriter for the given top-level public directory names
    /// (e.g. `stylesheets`, `javascripts`, `images`)
    pub fn new<I, S>(directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = directories
            .into_iter()
            .map(|d| regex::escape(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();

        let local = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r#"(["'])/({})"#, alternatives.join("|"));
            Regex::new(&pattern).ok()
        };

        Self { local }
    }

    /// Rewrite `"/<dir>` and `"http://host/.../images` references
    pub fn rewrite(&self, html: &str) -> String {
        let html = match &self.local {
            Some(local) => local.replace_all(html, "${1}public/${2}"),
            None => html.into(),
        };
        REMOTE_IMAGES
            .replace_all(&html, "${1}public/images")
            .into_owned()
    }
}

/// Rewrite with an optional rewriter; no asset root means no rewriting
pub fn rewrite(rewriter: Option<&AssetRewriter>, html: &str) -> String {
    match rewriter {
        Some(r) => r.rewrite(html),
        None => html.to_string(),
    }
}

/// Escape text for inclusion in an HTML body
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn rewriter() -> AssetRewriter {
        AssetRewriter::new(["stylesheets", "javascripts", "images"])
    }

    #[test_case(
        r#"<link href="/stylesheets/app.css">"#,
        r#"<link href="public/stylesheets/app.css">"#
        ; "double quoted stylesheet"
    )]
    #[test_case(
        "<script src='/javascripts/app.js'></script>",
        "<script src='public/javascripts/app.js'></script>"
        ; "single quoted script"
    )]
    #[test_case(
        r#"<img src="http://localhost:3000/assets/images/logo.png">"#,
        r#"<img src="public/images/logo.png">"#
        ; "remote images"
    )]
    #[test_case(
        r#"<a href="/users/1">me</a>"#,
        r#"<a href="/users/1">me</a>"#
        ; "unknown directory untouched"
    )]
    #[test_case(
        r#"<a href="http://example.com/about">x</a>"#,
        r#"<a href="http://example.com/about">x</a>"#
        ; "remote non image untouched"
    )]
    fn test_rewrite(input: &str, expected: &str) {
        assert_eq!(rewriter().rewrite(input), expected);
    }

    #[test]
    fn test_remote_rewrite_does_not_cross_attributes() {
        let html = r#"<a href="http://a.test/x">a</a><img src="http://b.test/images/y.png">"#;
        assert_eq!(
            rewriter().rewrite(html),
            r#"<a href="http://a.test/x">a</a><img src="public/images/y.png">"#
        );
    }

    #[test]
    fn test_empty_asset_root_still_rewrites_remote_images() {
        let html = r#"<img src="http://localhost/images/a.png"><link href="/stylesheets/a.css">"#;
        assert_eq!(
            AssetRewriter::new(Vec::<String>::new()).rewrite(html),
            r#"<img src="public/images/a.png"><link href="/stylesheets/a.css">"#
        );
    }

    #[test]
    fn test_no_asset_root_means_no_rewrite() {
        let html = r#"<img src="http://localhost/images/a.png"><link href="/stylesheets/a.css">"#;
        assert_eq!(rewrite(None, html), html);
    }

    #[test]
    fn test_directory_names_are_escaped() {
        let r = AssetRewriter::new(["a.b"]);
        assert_eq!(r.rewrite(r#""/a.b/x""#), r#""public/a.b/x""#);
        assert_eq!(r.rewrite(r#""/aXb/x""#), r#""/aXb/x""#);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }
}
