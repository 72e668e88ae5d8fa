//! Canned articles used when no provider returns anything for a topic.

use chrono::{DateTime, Duration, Utc};
use dd_core::Article;

/// Source name recorded in a digest built from canned articles.
pub const FALLBACK_SOURCE: &str = "Fallback News";

struct Canned {
    title: &'static str,
    description: &'static str,
    source: &'static str,
    hours_ago: i64,
}

const fn canned(title: &'static str, description: &'static str, source: &'static str, hours_ago: i64) -> Canned {
    Canned { title, description, source, hours_ago }
}

const CANNED: [(&str, [Canned; 3]); 5] = [
    (
        "ai",
        [
            canned(
                "OpenAI Releases GPT-4 Turbo with Enhanced Capabilities",
                "OpenAI has announced the release of GPT-4 Turbo, featuring improved reasoning and reduced costs.",
                "TechCrunch",
                2,
            ),
            canned(
                "Google Introduces New AI Safety Framework",
                "Google has launched a comprehensive AI safety framework to ensure responsible AI development.",
                "The Verge",
                4,
            ),
            canned(
                "Microsoft Integrates AI Features into Windows 11",
                "Microsoft has announced new AI-powered features coming to Windows 11 in the next update.",
                "CNET",
                6,
            ),
        ],
    ),
    (
        "biotech",
        [
            canned(
                "Breakthrough in CRISPR Gene Editing Shows Promise",
                "Scientists report significant progress in CRISPR gene editing technology for treating genetic disorders.",
                "Nature",
                3,
            ),
            canned(
                "New Cancer Immunotherapy Treatment Enters Phase 3 Trials",
                "A promising new cancer immunotherapy treatment has advanced to Phase 3 clinical trials.",
                "Science Daily",
                5,
            ),
            canned(
                "FDA Approves Novel Drug for Rare Autoimmune Disease",
                "The FDA has approved a new treatment for a rare autoimmune disease affecting thousands of patients.",
                "Medical News Today",
                7,
            ),
        ],
    ),
    (
        "ethereum",
        [
            canned(
                "Ethereum Network Upgrade Improves Transaction Speed",
                "Latest Ethereum network upgrade significantly improves transaction processing speed and reduces fees.",
                "CoinDesk",
                2,
            ),
            canned(
                "Major DeFi Protocol Launches on Ethereum with $50M TVL",
                "A new DeFi protocol has launched on Ethereum, quickly reaching $50 million in total value locked.",
                "Decrypt",
                4,
            ),
            canned(
                "Ethereum Foundation Announces New Developer Grants",
                "The Ethereum Foundation has announced new grants to support the developer ecosystem.",
                "CryptoSlate",
                6,
            ),
        ],
    ),
    (
        "climate",
        [
            canned(
                "New Carbon Capture Technology Achieves 90% Efficiency",
                "Breakthrough carbon capture technology has achieved 90% efficiency in pilot program.",
                "Scientific American",
                3,
            ),
            canned(
                "Global Renewable Energy Investment Reaches Record $500B",
                "Global investment in renewable energy has reached a record $500 billion in the third quarter.",
                "Bloomberg",
                5,
            ),
            canned(
                "International Climate Summit Agrees on New Emission Targets",
                "World leaders have agreed on new emission reduction targets at the latest climate summit.",
                "Reuters",
                7,
            ),
        ],
    ),
    (
        "space",
        [
            canned(
                "SpaceX Successfully Launches Starship Prototype",
                "SpaceX has successfully launched its Starship prototype to orbit in a major milestone.",
                "Space.com",
                2,
            ),
            canned(
                "NASA Announces Plans for Mars Sample Return Mission",
                "NASA has unveiled detailed plans for its ambitious Mars sample return mission.",
                "NASA",
                4,
            ),
            canned(
                "Private Space Company Achieves First Commercial Lunar Landing",
                "A private space company has successfully achieved the first commercial lunar landing.",
                "Space News",
                6,
            ),
        ],
    ),
];

fn build(title: String, description: String, source: &str, hours_ago: i64, now: DateTime<Utc>) -> Article {
    Article::new(title, source)
        .with_description(description)
        .with_published_at(now - Duration::hours(hours_ago))
}

/// Canned articles for `topic`: the first keyed list whose key contains, or is
/// contained in, the lowercased topic; otherwise three generic articles naming it.
pub fn fallback_articles(topic: &str, now: DateTime<Utc>) -> Vec<Article> {
    let lower = topic.to_lowercase();

    if let Some((_, articles)) = CANNED
        .iter()
        .find(|(key, _)| lower.contains(key) || key.contains(lower.as_str()))
    {
        return articles
            .iter()
            .map(|c| build(c.title.to_string(), c.description.to_string(), c.source, c.hours_ago, now))
            .collect();
    }

    vec![
        build(
            format!("Latest Developments in {}", topic),
            format!(
                "Recent developments and breakthroughs in the {} field have been reported by industry experts.",
                topic
            ),
            "Industry News",
            2,
            now,
        ),
        build(
            format!("{} Sector Shows Promising Growth", topic),
            format!(
                "The {} sector continues to show promising growth with new innovations and investments.",
                topic
            ),
            "Market Watch",
            4,
            now,
        ),
        build(
            format!("New Research Advances in {}", topic),
            format!(
                "Researchers have made significant advances in {} technology and applications.",
                topic
            ),
            "Research Weekly",
            6,
            now,
        ),
    ]
}
