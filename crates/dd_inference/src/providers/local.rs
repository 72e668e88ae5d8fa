use std::fmt;
use std::panic;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use dd_core::{take_chars, Result, SummaryProvider, SummaryRequest, SummaryResponse};
use crate::bullets::{generic_summary, pad_to, LOCAL_FILLER};

const CONTENT_LIMIT: usize = 3000;
const MIN_SENTENCE_CHARS: usize = 30;
const MAX_SENTENCE_CHARS: usize = 200;
const DUPLICATE_PREFIX_CHARS: usize = 20;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref KEY_PATTERNS: Vec<Regex> = [
        r"(?i)study|research|found|discovered|revealed|showed|indicated|suggested|concluded",
        r"(?i)according to|researchers|scientists|experts|study",
        r"(?i)important|significant|key|major|critical|essential",
        r"(?i)impact|effect|result|outcome|consequence",
        r"(?i)future|next|upcoming|planned|expected",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

/// Keyword-scored extractive summary. Never fails.
#[derive(Default)]
pub struct LocalHeuristicProvider;

impl fmt::Debug for LocalHeuristicProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalHeuristicProvider").finish()
    }
}

impl LocalHeuristicProvider {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`SummaryProvider::summarize`], without the `Result`.
    pub fn summarize_now(&self, request: &SummaryRequest) -> SummaryResponse {
        let max_points = request.max_points;
        let summary = panic::catch_unwind(|| key_points(&request.content, max_points))
            .unwrap_or_else(|_| {
                tracing::error!("local summarization panicked; using generic summary");
                generic_summary(max_points)
            });
        SummaryResponse::success(summary)
    }
}

#[async_trait]
impl SummaryProvider for LocalHeuristicProvider {
    fn name(&self) -> &str {
        "Local"
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResponse> {
        Ok(self.summarize_now(request))
    }
}

fn sentences(content: &str) -> Vec<&str> {
    SENTENCE_END
        .split(content)
        .map(str::trim)
        .filter(|s| {
            let len = s.chars().count();
            len > MIN_SENTENCE_CHARS && len < MAX_SENTENCE_CHARS
        })
        .filter(|s| {
            let lower = s.to_lowercase();
            !lower.contains("cookie") && !lower.contains("privacy policy")
        })
        .collect()
}

fn key_points(content: &str, max_points: usize) -> Vec<String> {
    let normalized = WHITESPACE.replace_all(content, " ");
    let clean = take_chars(normalized.trim(), CONTENT_LIMIT);
    let sentences = sentences(clean);

    let mut points: Vec<String> = Vec::new();

    for sentence in &sentences {
        if points.len() >= max_points {
            break;
        }
        let important = KEY_PATTERNS.iter().any(|pattern| pattern.is_match(sentence));
        let prefix = take_chars(sentence, DUPLICATE_PREFIX_CHARS).to_lowercase();
        let duplicate = points.iter().any(|point| point.to_lowercase().contains(&prefix));
        if important && !duplicate {
            points.push(format!("{}.", sentence));
        }
    }

    while points.len() < max_points {
        let longest = sentences
            .iter()
            .filter(|s| {
                let prefix = take_chars(s, DUPLICATE_PREFIX_CHARS);
                !points.iter().any(|point| point.contains(prefix))
            })
            .fold(None::<&&str>, |best, s| match best {
                Some(b) if b.chars().count() >= s.chars().count() => Some(b),
                _ => Some(s),
            });
        match longest {
            Some(sentence) => points.push(format!("{}.", sentence)),
            None => break,
        }
    }

    pad_to(&mut points, max_points, LOCAL_FILLER);
    points.into_iter().map(|point| format!("• {}", point)).collect()
}
