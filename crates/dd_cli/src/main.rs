use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dd_core::{logging::init_logging, CardIcon, DigestRequest, DEFAULT_TIMEFRAME};
use dd_inference::SummarizationPipeline;
use dd_news::{check_topic, parse_digest, ContentExtractor, NewsAggregator};
use dd_storage::Session;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

const MAX_TIMEOUT_SECS: u64 = 24 * 3600;

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        _ => None,
    }
}

/// Adds `digits` worth of `unit` seconds to `total`, refusing anything past a day.
fn accumulate(total: u64, digits: &str, unit: u64) -> Option<u64> {
    digits
        .parse::<u64>()
        .ok()?
        .checked_mul(unit)
        .and_then(|secs| total.checked_add(secs))
        .filter(|secs| *secs <= MAX_TIMEOUT_SECS)
}

/// Timeouts written as `30s`, `2m`, `1m30s` or a bare number of seconds.
impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let input = s.trim();
        let too_long = || format!("Invalid or too long duration: {} (at most 24h)", input);
        let mut total = 0u64;
        let mut digits = String::new();

        for c in input.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if let Some(unit) = unit_seconds(c) {
                total = accumulate(total, &digits, unit).ok_or_else(too_long)?;
                digits.clear();
            } else {
                return Err(format!("Invalid duration unit '{}' in {}", c, input));
            }
        }
        if !digits.is_empty() {
            total = accumulate(total, &digits, 1).ok_or_else(too_long)?;
        }

        if total == 0 {
            return Err("Duration must be a positive number of seconds, minutes or hours".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(name = "dd", author, version, about = "Daily news digests and article summaries", long_about = None)]
struct Cli {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
    #[arg(long, env = "OPENAI_MODEL")]
    openai_model: Option<String>,
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,
    #[arg(long, env = "ANTHROPIC_MODEL")]
    anthropic_model: Option<String>,
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    gnews_api_key: Option<String>,
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    firebase_api_key: Option<String>,
    #[arg(long, env = "FIREBASE_PROJECT_ID")]
    firebase_project_id: Option<String>,
    /// Timeout for each outbound request (e.g. 10s, 1m)
    #[arg(long, default_value = "10s")]
    timeout: HumanDuration,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = dd_web::state::DEFAULT_BIND_ADDR)]
        bind: String,
        /// Hide error details from API responses when set to "production"
        #[arg(long, env = "APP_ENV", default_value = "development")]
        env: String,
    },
    /// Fetch an article and print its bullet-point summary
    Summarize { url: String },
    /// Build a digest for one or more topics
    Digest {
        #[arg(required = true)]
        topics: Vec<String>,
        #[arg(long, default_value = DEFAULT_TIMEFRAME)]
        timeframe: String,
        /// Print the topic cards instead of the raw digest
        #[arg(long)]
        cards: bool,
    },
    /// Check whether a topic would be accepted
    Validate { topic: String },
    /// Manage saved interests
    Prefs {
        #[command(flatten)]
        account: Account,
        /// Create the account before signing in
        #[arg(long)]
        sign_up: bool,
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(Args, Debug)]
struct Account {
    #[arg(long, env = "DD_EMAIL")]
    email: String,
    #[arg(long, env = "DD_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum PrefsCommands {
    Show,
    Add { topic: String },
    Remove { topic: String },
}

impl Cli {
    fn inference_config(&self) -> dd_inference::Config {
        dd_inference::Config {
            openai_api_key: self.openai_api_key.clone(),
            openai_model: self.openai_model.clone(),
            anthropic_api_key: self.anthropic_api_key.clone(),
            anthropic_model: self.anthropic_model.clone(),
            timeout: self.timeout.0,
            ..Default::default()
        }
    }

    fn news_config(&self) -> dd_news::Config {
        dd_news::Config {
            news_api_key: self.news_api_key.clone(),
            gnews_api_key: self.gnews_api_key.clone(),
            timeout: self.timeout.0,
            ..Default::default()
        }
    }

    fn storage_config(&self) -> dd_storage::Config {
        dd_storage::Config {
            firebase_api_key: self.firebase_api_key.clone(),
            firebase_project_id: self.firebase_project_id.clone(),
            timeout: self.timeout.0,
            ..Default::default()
        }
    }
}

/// Points already carry their bullet marker.
fn render_summary(title: &str, points: &[String]) -> String {
    let mut out = format!("{}\n", title);
    for point in points {
        out.push_str(point);
        out.push('\n');
    }
    out
}

fn print_list(items: &[String]) {
    if items.is_empty() {
        println!("(no interests saved)");
    }
    for item in items {
        println!("- {}", item);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging("info");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { bind, env } => {
            let config = dd_web::Config {
                bind_addr: bind.clone(),
                production: env.eq_ignore_ascii_case("production"),
                fetch_timeout: cli.timeout.0,
                inference: cli.inference_config(),
                news: cli.news_config(),
            };
            info!("🚀 Starting API server on {}", config.bind_addr);
            dd_web::serve(&config).await?;
        }
        Commands::Summarize { url } => {
            let extractor = ContentExtractor::new(cli.timeout.0)?;
            let pipeline = SummarizationPipeline::from_config(&cli.inference_config())?;
            let article = extractor
                .extract(url)
                .await
                .with_context(|| format!("could not read {}", url))?;
            info!("📄 Extracted {} characters from {}", article.content.chars().count(), url);
            let summary = pipeline.summarize_text(&article.content, &article.title).await;
            print!("{}", render_summary(&article.title, &summary.summary));
        }
        Commands::Digest { topics, timeframe, cards } => {
            let aggregator = NewsAggregator::from_config(&cli.news_config())?;
            let request = DigestRequest::new(topics.iter().cloned()).with_timeframe(timeframe.clone());
            let digest = aggregator.aggregate(&request).await?;
            if *cards {
                for card in parse_digest(&digest.content) {
                    println!("{} {}", card.icon.glyph(), card.topic);
                    for article in &card.articles {
                        println!("   {}", article);
                    }
                    println!();
                }
            } else {
                println!("{}", digest.content);
            }
            if !digest.sources.is_empty() {
                println!("Sources: {}", digest.sources.join(", "));
            }
        }
        Commands::Validate { topic } => match check_topic(topic.trim()) {
            Ok(()) => println!("✅ \"{}\" is a valid topic ({} card)", topic.trim(), CardIcon::for_topic(topic).glyph()),
            Err(issue) => anyhow::bail!("\"{}\" rejected: {}", topic, issue),
        },
        Commands::Prefs { account, sign_up, command } => {
            let session = Session::from_config(&cli.storage_config())?;
            info!("🔐 Using {} identity backend", session.backend());
            if *sign_up {
                session.sign_up(&account.email, &account.password).await?;
            } else {
                session.sign_in(&account.email, &account.password).await?;
            }
            let interests = match command {
                PrefsCommands::Show => session.preferences().await?,
                PrefsCommands::Add { topic } => session.add_interest(topic.trim()).await?,
                PrefsCommands::Remove { topic } => session.remove_interest(topic.trim()).await?,
            };
            print_list(&interests);
            session.sign_out().await?;
        }
    }

    Ok(())
}
