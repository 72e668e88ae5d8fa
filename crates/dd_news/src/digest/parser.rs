//! Recovers topic cards from digest text.
//!
//! Three strategies run in order and the first one that yields any card wins.
//! The text may come from [`super::format_digest`] or from anything else
//! shaped roughly like it, so the later strategies are deliberately loose.

use lazy_static::lazy_static;
use regex::Regex;
use dd_core::TopicCard;
use super::formatter::TOPIC_MARKER;

pub type Strategy = fn(&str) -> Vec<TopicCard>;

pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("strict", parse_strict),
    ("relaxed", parse_relaxed),
    ("fallback", parse_fallback),
];

/// Topics searched for by [`parse_fallback`].
pub const CANONICAL_TOPICS: [&str; 5] = ["AI POLICY", "BIOTECH", "ETHEREUM", "CLIMATE TECH", "SPACE EXPLORATION"];

const FALLBACK_ARTICLES_PER_TOPIC: usize = 3;
const MIN_ARTICLE_CHARS: usize = 20;
const MAX_HEADER_CHARS: usize = 100;

lazy_static! {
    static ref STRICT_TOPIC: Regex = Regex::new(r"🔹\s*([^:]+):").unwrap();
    static ref NUMBERED: Regex = Regex::new(r"^\s*\d+\.\s").unwrap();
    static ref NUMBER_PREFIX: Regex = Regex::new(r"^\s*\d+\.\s*").unwrap();
    static ref LEADING_DECORATION: Regex = Regex::new(r"^[🔹•\s]+").unwrap();
    static ref TRAILING_COLON: Regex = Regex::new(r":\s*$").unwrap();
}

/// Collects (topic, articles) runs into cards, dropping topics with no articles.
#[derive(Default)]
struct CardBuilder {
    cards: Vec<TopicCard>,
    topic: String,
    articles: Vec<String>,
}

impl CardBuilder {
    fn open(&mut self, topic: String) {
        self.flush();
        self.topic = topic;
    }

    fn has_topic(&self) -> bool {
        !self.topic.is_empty()
    }

    fn push(&mut self, article: String) {
        self.articles.push(article);
    }

    fn flush(&mut self) {
        let articles = std::mem::take(&mut self.articles);
        if self.has_topic() && !articles.is_empty() {
            self.cards.push(TopicCard::new(self.topic.clone(), articles));
        }
    }

    fn finish(mut self) -> Vec<TopicCard> {
        self.flush();
        self.cards
    }
}

fn mentions_metadata(line: &str) -> bool {
    line.contains("Source:") || line.contains("Published:")
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Marker-headed topics with numbered article lines.
pub fn parse_strict(text: &str) -> Vec<TopicCard> {
    let mut builder = CardBuilder::default();
    // Indent of the first article under the current topic. Deeper lines are
    // descriptions even when they happen to start with "N. ".
    let mut article_indent: Option<usize> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.contains(TOPIC_MARKER) && line.contains(':') {
            let topic = STRICT_TOPIC
                .captures(line)
                .map(|caps| caps[1].trim().to_string())
                .unwrap_or_default();
            builder.open(topic);
            article_indent = None;
        } else if builder.has_topic() && NUMBERED.is_match(line) {
            let indent = indent_of(raw);
            if *article_indent.get_or_insert(indent) < indent {
                continue;
            }
            let article = NUMBER_PREFIX.replace(line, "");
            if !article.is_empty() && !mentions_metadata(&article) {
                builder.push(article.into_owned());
            }
        }
    }

    builder.finish()
}

fn is_header_line(line: &str) -> bool {
    line.contains("TOPICS:")
        || line.contains("Topics:")
        || line.contains("Timeframe:")
        || line.contains("Here's what's happening")
}

/// Any short colon-terminated line opens a topic; any long line is an article.
pub fn parse_relaxed(text: &str) -> Vec<TopicCard> {
    let mut builder = CardBuilder::default();

    for line in text.lines() {
        let line = line.trim();
        if is_header_line(line) {
            continue;
        }

        let marked_header = line.contains(TOPIC_MARKER) && line.contains(':');
        let loose_header =
            line.contains(':') && !line.starts_with('•') && line.chars().count() < MAX_HEADER_CHARS;

        if marked_header || loose_header {
            let topic = LEADING_DECORATION.replace(line, "");
            let topic = TRAILING_COLON.replace(&topic, "");
            builder.open(topic.into_owned());
        } else if builder.has_topic()
            && line.chars().count() > MIN_ARTICLE_CHARS
            && !mentions_metadata(line)
            && !line.contains("Summary:")
            && !line.contains("Stay informed")
        {
            builder.push(line.to_string());
        }
    }

    builder.finish()
}

/// Lines mentioning one of the [`CANONICAL_TOPICS`], up to three per topic.
pub fn parse_fallback(text: &str) -> Vec<TopicCard> {
    let lines: Vec<&str> = text.lines().collect();

    CANONICAL_TOPICS
        .iter()
        .filter_map(|topic| {
            let needle = topic.to_lowercase();
            let articles: Vec<String> = lines
                .iter()
                .filter(|line| {
                    line.to_lowercase().contains(&needle)
                        && line.chars().count() > MIN_ARTICLE_CHARS
                        && !mentions_metadata(line)
                        && !line.contains("Summary:")
                })
                .take(FALLBACK_ARTICLES_PER_TOPIC)
                .map(|line| line.to_string())
                .collect();
            (!articles.is_empty()).then(|| TopicCard::new(*topic, articles))
        })
        .collect()
}

/// Parses digest text into topic cards. Empty when nothing recognizable was
/// found, in which case callers show the raw text.
pub fn parse_digest(text: &str) -> Vec<TopicCard> {
    for (name, strategy) in STRATEGIES {
        let cards = strategy(text);
        if !cards.is_empty() {
            tracing::debug!(strategy = name, cards = cards.len(), "digest parsed");
            return cards;
        }
    }
    tracing::debug!("no topic cards recognized in digest");
    Vec::new()
}
