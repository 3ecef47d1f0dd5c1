//! Inline Markdown: text to runs and back.
//!
//! Parsing walks an ordered pattern table. At each step the earliest-starting
//! match wins; when two patterns start at the same offset the one listed first
//! wins. Matched text is never re-parsed, so styles do not nest.

use crate::ir::nodes::{Run, RunStyle};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Link,
    Code,
    Bold,
    Strike,
    Italic,
}

static PATTERNS: Lazy<Vec<(Token, Regex)>> = Lazy::new(|| {
    [
        (Token::Link, r"\[([^\]]+)\]\(([^)]+)\)"),
        (Token::Code, r"`([^`]+)`"),
        (Token::Bold, r"\*\*([^*]+)\*\*"),
        (Token::Bold, r"__([^_]+)__"),
        (Token::Strike, r"~~([^~]+)~~"),
        (Token::Italic, r"\*([^*]+)\*"),
        (Token::Italic, r"_([^_]+)_"),
    ]
    .into_iter()
    .map(|(token, pattern)| (token, Regex::new(pattern).expect("inline pattern compiles")))
    .collect()
});

struct InlineMatch<'a> {
    token: Token,
    start: usize,
    end: usize,
    content: &'a str,
    url: &'a str,
}

impl InlineMatch<'_> {
    fn into_run(self) -> Run {
        let style = match self.token {
            Token::Link => RunStyle::Link(self.url.to_string()),
            Token::Code => RunStyle::InlineCode,
            Token::Bold => RunStyle::Bold,
            Token::Strike => RunStyle::Strikethrough,
            Token::Italic => RunStyle::Italic,
        };
        Run::styled(self.content, style)
    }
}

fn next_match(text: &str) -> Option<InlineMatch<'_>> {
    let mut best: Option<InlineMatch<'_>> = None;
    for (token, regex) in PATTERNS.iter() {
        let Some(caps) = regex.captures(text) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if best.as_ref().is_some_and(|b| whole.start() >= b.start) {
            continue;
        }
        best = Some(InlineMatch {
            token: *token,
            start: whole.start(),
            end: whole.end(),
            content: caps.get(1).map_or("", |m| m.as_str()),
            url: caps.get(2).map_or("", |m| m.as_str()),
        });
    }
    best
}

/// Split Markdown inline text into runs. Never returns an empty list.
pub fn parse_inline(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(found) = next_match(rest) else {
            runs.push(Run::plain(rest));
            break;
        };
        if found.start > 0 {
            runs.push(Run::plain(&rest[..found.start]));
        }
        let end = found.end;
        runs.push(found.into_run());
        rest = &rest[end..];
    }

    if runs.is_empty() {
        runs.push(Run::plain(""));
    }
    runs
}

/// Render runs back to Markdown inline text.
///
/// Equations use `$...$` when they share the line with other runs and
/// `$$...$$` when they are the only run.
pub fn render_runs(runs: &[Run]) -> String {
    let inline = runs.len() > 1;
    runs.iter().map(|run| render_run(run, inline)).collect()
}

fn render_run(run: &Run, inline: bool) -> String {
    match run {
        Run::Text { content, style } => {
            let (open, close) = match style {
                RunStyle::Plain => ("", ""),
                RunStyle::Bold => ("**", "**"),
                RunStyle::Italic => ("_", "_"),
                RunStyle::Strikethrough => ("~~", "~~"),
                RunStyle::Underline => ("<u>", "</u>"),
                RunStyle::InlineCode => ("`", "`"),
                RunStyle::Link(url) if url.is_empty() => ("", ""),
                RunStyle::Link(url) => return format!("[{content}]({url})"),
            };
            format!("{open}{content}{close}")
        }
        Run::MentionUser { user_id } => user_id.clone(),
        Run::MentionDoc { title, url } => {
            if title.is_empty() {
                url.clone()
            } else {
                format!("[{title}]({url})")
            }
        }
        Run::Equation { content } => {
            let symbol = if inline { "$" } else { "$$" };
            let body = content.trim_end_matches('\n');
            format!("{symbol}{body}{symbol}")
        }
        Run::Unrecognized => {
            tracing::trace!("dropping inline element with no recognized payload");
            String::new()
        }
    }
}
