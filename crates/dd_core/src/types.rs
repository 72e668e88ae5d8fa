use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_POINTS: usize = 5;
pub const DEFAULT_TIMEFRAME: &str = "Last 24 hours";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            source: source.into(),
            published_at: None,
            url: None,
            content: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Publish time, with a missing timestamp read as `now`.
    pub fn published_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.published_at.unwrap_or(now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestRequest {
    pub topics: Vec<String>,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

impl DigestRequest {
    /// Builds a request, dropping repeated topics while keeping first-seen order.
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for topic in topics {
            let topic = topic.into();
            if !unique.contains(&topic) {
                unique.push(topic);
            }
        }
        Self {
            topics: unique,
            timeframe: default_timeframe(),
        }
    }

    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }
}

fn default_timeframe() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestResponse {
    pub content: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub content: String,
    pub title: String,
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

impl SummaryRequest {
    pub fn new(content: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: title.into(),
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: Vec<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryResponse {
    pub fn success(summary: Vec<String>) -> Self {
        Self {
            summary,
            success: true,
            error: None,
        }
    }
}

/// Color scheme of a topic card, chosen from the topic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Ai,
    Biotech,
    Ethereum,
    Climate,
    Space,
    Default,
}

/// Icon of a topic card, chosen from the topic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardIcon {
    Ai,
    Biotech,
    Ethereum,
    Climate,
    Space,
    Default,
}

const THEME_KEYS: [(&str, CardColor, CardIcon); 5] = [
    ("ai", CardColor::Ai, CardIcon::Ai),
    ("biotech", CardColor::Biotech, CardIcon::Biotech),
    ("ethereum", CardColor::Ethereum, CardIcon::Ethereum),
    ("climate", CardColor::Climate, CardIcon::Climate),
    ("space", CardColor::Space, CardIcon::Space),
];

impl CardColor {
    pub fn for_topic(topic: &str) -> Self {
        let topic = topic.to_lowercase();
        THEME_KEYS
            .iter()
            .find(|(key, _, _)| topic.contains(key))
            .map(|(_, color, _)| *color)
            .unwrap_or(CardColor::Default)
    }
}

impl CardIcon {
    pub fn for_topic(topic: &str) -> Self {
        let topic = topic.to_lowercase();
        THEME_KEYS
            .iter()
            .find(|(key, _, _)| topic.contains(key))
            .map(|(_, _, icon)| *icon)
            .unwrap_or(CardIcon::Default)
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            CardIcon::Ai => "🤖",
            CardIcon::Biotech => "🧬",
            CardIcon::Ethereum => "₿",
            CardIcon::Climate => "🌱",
            CardIcon::Space => "🚀",
            CardIcon::Default => "📰",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCard {
    pub topic: String,
    pub articles: Vec<String>,
    pub color: CardColor,
    pub icon: CardIcon,
}

impl TopicCard {
    pub fn new(topic: impl Into<String>, articles: Vec<String>) -> Self {
        let topic = topic.into();
        Self {
            color: CardColor::for_topic(&topic),
            icon: CardIcon::for_topic(&topic),
            topic,
            articles,
        }
    }
}

/// Opaque identifier handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
