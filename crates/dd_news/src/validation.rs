use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use dd_core::{Error, Result};

pub const MIN_TOPIC_CHARS: usize = 2;
pub const MAX_TOPIC_CHARS: usize = 50;

lazy_static! {
    static ref ALLOWED: Regex = Regex::new(r"^[a-zA-Z0-9\s\-_&]+$").unwrap();
    static ref ONLY_VOWELS: Regex = Regex::new(r"(?i)^[aeiou]{3,}$").unwrap();
    static ref ONLY_CONSONANTS: Regex = Regex::new(r"(?i)^[bcdfghjklmnpqrstvwxyz]{5,}$").unwrap();
    static ref ONLY_DIGITS: Regex = Regex::new(r"^[0-9]{3,}$").unwrap();
}

/// Why a topic was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicIssue {
    #[error("topic must be between 2 and 50 characters")]
    Length,
    #[error("topic may only contain letters, digits, spaces, '-', '_' and '&'")]
    Characters,
    #[error("topic looks like gibberish")]
    Gibberish,
}

fn repeated_char(topic: &str) -> bool {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => topic.chars().count() >= 4 && chars.all(|c| c == first),
        None => false,
    }
}

pub fn check_topic(topic: &str) -> std::result::Result<(), TopicIssue> {
    let len = topic.chars().count();
    if !(MIN_TOPIC_CHARS..=MAX_TOPIC_CHARS).contains(&len) {
        return Err(TopicIssue::Length);
    }
    if !ALLOWED.is_match(topic) {
        return Err(TopicIssue::Characters);
    }
    if ONLY_VOWELS.is_match(topic)
        || ONLY_CONSONANTS.is_match(topic)
        || repeated_char(topic)
        || ONLY_DIGITS.is_match(topic)
    {
        return Err(TopicIssue::Gibberish);
    }
    Ok(())
}

pub fn is_valid_topic(topic: &str) -> bool {
    check_topic(topic).is_ok()
}

/// Fails with [`Error::InvalidTopic`] naming every topic that does not pass.
pub fn validate_topics<S: AsRef<str>>(topics: &[S]) -> Result<()> {
    let invalid: Vec<String> = topics
        .iter()
        .map(AsRef::as_ref)
        .filter(|topic| !is_valid_topic(topic))
        .map(String::from)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        tracing::debug!(?invalid, "rejected topics");
        Err(Error::InvalidTopic(invalid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_reasonable_topics() {
        for topic in ["ab", "AI Policy", "R&D", "climate-tech", "web_3", "GPT 4"] {
            assert!(is_valid_topic(topic), "{topic} should be valid");
        }
    }

    #[test]
    fn test_rejects_gibberish() {
        assert_eq!(check_topic("aaaa"), Err(TopicIssue::Gibberish));
        assert_eq!(check_topic("12345"), Err(TopicIssue::Gibberish));
        assert_eq!(check_topic("eio"), Err(TopicIssue::Gibberish));
        assert_eq!(check_topic("xkcdq"), Err(TopicIssue::Gibberish));
        assert_eq!(check_topic("zzzz"), Err(TopicIssue::Gibberish));
        // four consonants and two digits are still fine
        assert!(is_valid_topic("xkcd"));
        assert!(is_valid_topic("42"));
    }

    #[test]
    fn test_rejects_bad_length_and_characters() {
        assert_eq!(check_topic("a"), Err(TopicIssue::Length));
        assert_eq!(check_topic(&"a b".repeat(20)), Err(TopicIssue::Length));
        assert_eq!(check_topic("AI!"), Err(TopicIssue::Characters));
        assert_eq!(check_topic("café"), Err(TopicIssue::Characters));
    }

    #[test]
    fn test_validate_topics_lists_every_invalid_topic() {
        let err = validate_topics(&["Space", "aaaa", "!!"]).unwrap_err();
        assert!(matches!(err, Error::InvalidTopic(ref topics) if topics == &["aaaa", "!!"]));
        assert_eq!(
            err.to_string(),
            "Invalid topics detected: aaaa, !!. Please enter valid topic names."
        );
        assert!(validate_topics(&["Space", "Biotech"]).is_ok());
    }
}
