//! Simulated install job with incremental output
//!
//! A [`ProgressJob`] yields its intermediate lines as a lazy, finite stream.
//! The orchestrator drains the stream into the console, then appends the
//! terminal line from [`ProgressJob::finish`].

use futures::stream::{self, Stream, StreamExt};
use rand::Rng;
use std::time::Duration;

/// Number of bar segments; one progress line per segment plus the 0% line.
const SEGMENTS: usize = 10;

const QUOTES: &[&str] = &[
    "Talk is cheap. Show me the code.",
    "Code is like humor. When you have to explain it, it’s bad.",
    "First, solve the problem. Then, write the code.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressJob {
    package: &'static str,
}

impl ProgressJob {
    /// The only installable package.
    pub fn motivation() -> Self {
        Self {
            package: "motivation",
        }
    }

    pub fn package(&self) -> &'static str {
        self.package
    }

    /// Intro line followed by the 0%..=100% bars, each bar after `step`.
    pub fn lines(&self, step: Duration) -> impl Stream<Item = String> + Send + 'static {
        let intro = format!("Fetching {}...", self.package);
        stream::once(async move { intro }).chain(stream::iter(0..=SEGMENTS).then(
            move |filled| async move {
                tokio::time::sleep(step).await;
                bar(filled)
            },
        ))
    }

    /// Install summary closing with a randomly chosen quote.
    pub fn finish<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let quote = QUOTES[rng.gen_range(0..QUOTES.len())];
        format!(
            "\n+ {}@1.0.0\nadded 1 package from 1 contributor in 1s\n\n\"{}\"",
            self.package, quote
        )
    }
}

fn bar(filled: usize) -> String {
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(SEGMENTS - filled),
        filled * 100 / SEGMENTS
    )
}

/// Parse the percentage of a progress line, if it is one.
pub fn percent_of(line: &str) -> Option<u32> {
    let rest = line.strip_prefix('[')?;
    let (_, tail) = rest.split_once("] ")?;
    tail.strip_suffix('%')?.parse().ok()
}
