//! Message wrapping for long exception messages

use regex::Regex;

/// Greedily break `text` into lines of at most `max` characters.
///
/// Each chunk is 1..=`max` non-newline characters ending at whitespace or
/// the end of input. The chunk's trailing whitespace is dropped and it is
/// terminated with a newline, so no line is longer than `max` unless it is a
/// single token longer than `max`.
pub fn linebreaks(text: &str, max: usize) -> String {
    if max == 0 {
        return text.to_string();
    }
    let chunk = match Regex::new(&format!(r".{{1,{}}}(?:\s|\z)", max)) {
        Ok(re) => re,
        Err(_) => return text.to_string(),
    };

    let wrapped = chunk.replace_all(text, |caps: &regex::Captures<'_>| {
        format!("{}\n", caps[0].trim_end())
    });
    wrapped.trim_end().to_string()
}

/// Indent every line of `text` by `width` spaces
pub fn indent(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
