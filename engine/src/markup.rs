//! Console output markup
//!
//! Built-in replies use a small trusted subset:
//!
//! - `<span class="accent">`, `<span class="file">`, `<span class="bold">`
//! - `<pre>` blocks
//! - the entities `&lt; &gt; &amp; &quot;`
//!
//! AI gateway text is inserted verbatim and is not escaped; front ends must
//! treat that channel as untrusted.

use regex::Regex;
use std::sync::OnceLock;

/// Emphasis classes supported by [`span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Accent,
    File,
    Bold,
}

impl Style {
    fn class(self) -> &'static str {
        match self {
            Style::Accent => "accent",
            Style::File => "file",
            Style::Bold => "bold",
        }
    }

    fn ansi(class: &str) -> &'static str {
        match class {
            "accent" => "\x1b[36m",
            "file" => "\x1b[33m",
            "bold" => "\x1b[1m",
            _ => "",
        }
    }
}

/// Wrap trusted text in an emphasis span.
pub fn span(style: Style, text: &str) -> String {
    format!("<span class=\"{}\">{}</span>", style.class(), text)
}

/// Wrap trusted text in a preformatted block.
pub fn pre(text: &str) -> String {
    format!("<pre>{}</pre>", text)
}

/// Escape untrusted text for inclusion in markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<span class="([a-z]+)">(.*?)</span>"#).expect("Invalid span pattern")
    })
}

fn pre_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<pre>\n?(.*?)\n?</pre>").expect("Invalid pre pattern")
    })
}

/// Render markup for a terminal. With `color` false the tags are stripped.
pub fn to_terminal(markup: &str, color: bool) -> String {
    let text = pre_pattern().replace_all(markup, "$1");
    let text = span_pattern().replace_all(&text, |caps: &regex::Captures<'_>| {
        if color {
            format!("{}{}\x1b[0m", Style::ansi(&caps[1]), &caps[2])
        } else {
            caps[2].to_string()
        }
    });

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }

    #[test]
    fn test_to_terminal_plain() {
        let markup = format!("{} is {}", span(Style::File, "about.md"), span(Style::Bold, "open"));
        assert_eq!(to_terminal(&markup, false), "about.md is open");
    }

    #[test]
    fn test_to_terminal_color() {
        let rendered = to_terminal(&span(Style::Accent, "hi"), true);
        assert_eq!(rendered, "\x1b[36mhi\x1b[0m");
    }

    #[test]
    fn test_to_terminal_pre_and_entities() {
        let rendered = to_terminal("<pre>\n  &lt; moo &gt;\n</pre>", false);
        assert_eq!(rendered, "  < moo >");
    }

    #[test]
    fn test_escaped_ampersand_roundtrip() {
        assert_eq!(to_terminal(&escape("&lt;"), false), "&lt;");
    }
}
