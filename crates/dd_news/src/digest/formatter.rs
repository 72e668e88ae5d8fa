use std::fmt::Write;
use chrono::{DateTime, Local, TimeZone, Utc};
use dd_core::{take_chars, Article};

pub const TOPIC_MARKER: &str = "🔹";
pub const ARTICLES_PER_TOPIC: usize = 3;
const DESCRIPTION_CHARS: usize = 150;

/// Index of the topic an article belongs to: the first topic mentioned in its
/// title, description or body, else the first topic.
fn assign_topic(article: &Article, topics: &[String]) -> usize {
    let title = article.title.to_lowercase();
    let description = article.description.as_deref().unwrap_or("").to_lowercase();
    let content = article.content.as_deref().unwrap_or("").to_lowercase();

    topics
        .iter()
        .position(|topic| {
            let topic = topic.to_lowercase();
            title.contains(&topic) || description.contains(&topic) || content.contains(&topic)
        })
        .unwrap_or(0)
}

pub fn group_by_topic<'a>(articles: &'a [Article], topics: &[String]) -> Vec<Vec<&'a Article>> {
    let mut groups: Vec<Vec<&Article>> = vec![Vec::new(); topics.len()];
    if topics.is_empty() {
        return groups;
    }
    for article in articles {
        groups[assign_topic(article, topics)].push(article);
    }
    groups
}

pub fn format_digest(articles: &[Article], topics: &[String], timeframe: &str) -> String {
    format_digest_at(articles, topics, timeframe, Local::now())
}

/// Renders the digest as of `now`, with timestamps in `now`'s zone.
pub fn format_digest_at<Tz>(articles: &[Article], topics: &[String], timeframe: &str, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let zone = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = write!(out, "📰 Daily Digest - {}\n\n", now.format("%A, %B %-d, %Y"));
    let _ = writeln!(out, "Topics: {}", topics.join(", "));
    let _ = write!(out, "Timeframe: {}\n\n", timeframe);
    out.push_str("Here's what's happening in your areas of interest:\n\n");

    let groups = group_by_topic(articles, topics);
    for (topic, group) in topics.iter().zip(&groups) {
        if group.is_empty() {
            let _ = write!(out, "{} {}: No recent news found.\n\n", TOPIC_MARKER, topic.to_uppercase());
            continue;
        }

        let _ = writeln!(out, "{} {}:", TOPIC_MARKER, topic.to_uppercase());
        for (index, article) in group.iter().take(ARTICLES_PER_TOPIC).enumerate() {
            let published = article.published_or(now_utc).with_timezone(&zone);
            let _ = writeln!(out, "   {}. {}", index + 1, article.title);
            let _ = writeln!(
                out,
                "      Source: {} | Published: {}",
                article.source,
                published.format("%-m/%-d/%Y, %-I:%M:%S %p")
            );
            if let Some(description) = article.description.as_deref() {
                let _ = writeln!(out, "      {}...", take_chars(description, DESCRIPTION_CHARS));
            }
            out.push('\n');
        }
    }

    let covered = groups.iter().filter(|g| !g.is_empty()).count();
    let _ = writeln!(
        out,
        "\n📊 Summary: Found {} articles across {} topics.",
        articles.len(),
        covered
    );
    out.push_str("\nStay informed! Check back tomorrow for your next digest.");
    out
}
