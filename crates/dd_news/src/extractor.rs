use std::time::Duration;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Node, Selector};
use serde::Serialize;
use url::Url;
use dd_core::{take_chars, Error, Result};

pub const MIN_CONTENT_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 4000;
pub const DEFAULT_TITLE: &str = "Article";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements removed together with everything inside them.
const DROPPED_ELEMENTS: &[&str] = &[
    // page chrome
    "script", "noscript", "template", "style", "nav", "header", "footer", "aside", "form",
    // interactive
    "button", "input", "select", "textarea",
    // embedded and media
    "iframe", "embed", "object", "applet", "canvas", "svg", "img", "video", "audio", "source",
    "track", "map", "area",
    // metadata
    "link", "meta", "base",
    // inline decoration
    "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "kbd", "mark", "q", "rp", "rt",
    "ruby", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
];

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
}

/// Fetches a page and reduces it to a bounded plain-text excerpt.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: Client,
}

impl ContentExtractor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn extract(&self, url: &str) -> Result<ExtractedArticle> {
        let url = Url::parse(url).map_err(|_| Error::Validation("Invalid URL format".to_string()))?;
        tracing::debug!(%url, "fetching article");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("text/html"))
            .unwrap_or(false);
        if !is_html {
            return Err(Error::Fetch("URL does not point to an HTML page".to_string()));
        }

        let html = response.text().await.map_err(|e| Error::Fetch(e.to_string()))?;
        let article = extract_from_html(&html)?;
        tracing::info!(%url, chars = article.content.chars().count(), "article extracted");
        Ok(article)
    }
}

pub fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Text of the document with dropped elements removed and every other
/// element boundary turned into whitespace.
fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    let mut stack = vec![(document.tree.root(), false)];

    while let Some((node, closing)) = stack.pop() {
        if closing {
            text.push(' ');
            continue;
        }
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) => {
                if DROPPED_ELEMENTS.contains(&el.name()) {
                    continue;
                }
                text.push(' ');
                stack.push((node, true));
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            Node::Document | Node::Fragment => {
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            _ => {}
        }
    }
    text
}

pub fn extract_from_html(html: &str) -> Result<ExtractedArticle> {
    let document = Html::parse_document(html);
    let title = extract_title(&document);

    let text = visible_text(&document);
    let content = WHITESPACE.replace_all(&text, " ").trim().to_string();

    let length = content.chars().count();
    if length < MIN_CONTENT_CHARS {
        return Err(Error::InsufficientContent { length });
    }

    let content = if length > MAX_CONTENT_CHARS {
        format!("{}...", take_chars(&content, MAX_CONTENT_CHARS))
    } else {
        content
    };

    Ok(ExtractedArticle { title, content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, routing::get, Router};

    fn page(body: &str) -> String {
        format!(
            "<html><head><title>  Rust 2.0 Released </title><style>p {{ color: red }}</style></head><body>{}</body></html>",
            body
        )
    }

    fn long_paragraph() -> String {
        "The compiler team shipped a new release with faster builds and better diagnostics. ".repeat(4)
    }

    #[test]
    fn test_strips_non_content_elements() {
        let html = page(&format!(
            "<nav>Home | About</nav><header>Site header</header>\
             <p>{}<em>emphasis</em><span>inline</span>tail</p>\
             <script>var x = 1;</script><footer>Copyright</footer>\
             <button>Subscribe</button><img src=\"a.png\"><aside>Related</aside>",
            long_paragraph()
        ));
        let article = extract_from_html(&html).unwrap();
        assert_eq!(article.title, "Rust 2.0 Released");
        for dropped in ["Home", "Site header", "emphasis", "inline", "var x", "Copyright", "Subscribe", "Related", "color: red"] {
            assert!(!article.content.contains(dropped), "{dropped} should be removed");
        }
        assert!(article.content.contains("better diagnostics"));
        assert!(article.content.ends_with("tail"));
        assert!(!article.content.contains("  "));
    }

    #[test]
    fn test_noscript_and_template_markup_is_dropped() {
        let html = page(&format!(
            "<p>{}</p><template><div>Hidden card</div></template>\
             <noscript><img src=\"https://px.example/t.gif\" height=\"1\"></noscript>",
            long_paragraph()
        ));
        let article = extract_from_html(&html).unwrap();
        assert!(!article.content.contains("<img"));
        assert!(!article.content.contains("px.example"));
        assert!(!article.content.contains("Hidden card"));
        assert!(article.content.ends_with("better diagnostics."));
    }

    #[test]
    fn test_block_boundaries_become_spaces() {
        let html = page(&format!("<div>{}</div><p>first</p><p>second</p>", long_paragraph()));
        let article = extract_from_html(&html).unwrap();
        assert!(article.content.contains("first second"));
    }

    #[test]
    fn test_short_pages_are_rejected() {
        let err = extract_from_html(&page("<p>Too short to summarize.</p>")).unwrap_err();
        assert!(matches!(err, Error::InsufficientContent { .. }));
    }

    #[test]
    fn test_long_pages_are_truncated() {
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(2000));
        let article = extract_from_html(&html).unwrap();
        assert_eq!(article.title, DEFAULT_TITLE);
        assert_eq!(article.content.chars().count(), MAX_CONTENT_CHARS + 3);
        assert!(article.content.ends_with("..."));
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_extract_fetches_html() {
        let body = page(&format!("<article><p>{}</p></article>", long_paragraph()));
        let router = Router::new()
            .route(
                "/post",
                get(move || {
                    let body = body.clone();
                    async move { ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body) }
                }),
            )
            .route(
                "/data.json",
                get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{}") }),
            );
        let base = serve(router).await;
        let extractor = ContentExtractor::new(Duration::from_secs(5)).unwrap();

        let article = extractor.extract(&format!("{}/post", base)).await.unwrap();
        assert_eq!(article.title, "Rust 2.0 Released");

        let err = extractor.extract(&format!("{}/data.json", base)).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch article: URL does not point to an HTML page");

        let err = extractor.extract(&format!("{}/missing", base)).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch article: 404 Not Found");

        let err = extractor.extract("not a url").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
