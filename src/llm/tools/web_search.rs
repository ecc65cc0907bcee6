//! 网页搜索工具（DuckDuckGo HTML接口）

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;

use super::SearchTool;
use crate::config::SearchConfig;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("title pattern is valid")
});
static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#).expect("snippet pattern is valid")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

const NO_RESULT: &str = "No good search result found";

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// 网页搜索工具
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    http: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl WebSearchTool {
    pub const NAME: &'static str = "Web Search";
    pub const DESCRIPTION: &'static str = "A useful tool for searching the Internet to find story based on the similar ideas. Worth using for getting titles of the similar story. Use precise questions.";

    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client for web search")?;
        Ok(Self {
            http,
            endpoint: config.web_search_url.clone(),
            max_results: config.max_web_results,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let html = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_results(&html, self.max_results))
    }
}

#[async_trait]
impl SearchTool for WebSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn run(&self, query: &str) -> Result<String> {
        tracing::info!(tool = Self::NAME, query, "🔧 调用工具");

        let hits = self.search(query).await?;
        tracing::debug!(tool = Self::NAME, hits = hits.len(), "搜索完成");

        Ok(format_results(&hits))
    }
}

/// 从DuckDuckGo HTML结果页中提取标题、摘要与链接
///
/// 摘要只在本条结果的标题链接与下一条标题链接之间查找。
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let titles: Vec<_> = TITLE_RE.captures_iter(html).collect();
    let mut hits = Vec::new();

    for (i, cap) in titles.iter().enumerate() {
        if hits.len() >= limit {
            break;
        }
        let (Some(whole), Some(href), Some(title)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        let title = clean_text(title.as_str());
        if title.is_empty() {
            continue;
        }

        let block_end = titles
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());
        let snippet = SNIPPET_RE
            .captures(&html[whole.end()..block_end])
            .and_then(|snippet| snippet.get(1))
            .map(|m| clean_text(m.as_str()))
            .unwrap_or_default();

        hits.push(SearchHit {
            title,
            snippet,
            url: resolve_redirect(href.as_str()),
        });
    }

    hits
}

/// 将结果格式化为Agent可读的文本
pub fn format_results(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULT.to_string();
    }

    hits.iter()
        .map(|hit| {
            if hit.snippet.is_empty() {
                format!("{} ({})", hit.title, hit.url)
            } else {
                format!("{}: {} ({})", hit.title, hit.snippet, hit.url)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// DuckDuckGo的结果链接是跳转地址，真实地址在`uddg`参数中
fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or(absolute)
}

fn clean_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, "");
    stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FMemento_(film)&amp;rut=abc">Memento (film) - <b>Wikipedia</b></a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">A man with anterograde amnesia &amp; a <b>Polaroid</b> camera.</a>
</div>
<div class="result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://example.com/face-blind">Face blind detective novels</a>
  </h2>
  <a class="result__snippet" href="https://example.com/face-blind">Prosopagnosia in crime fiction.</a>
</div>
"#;

    #[test]
    fn test_parse_results() {
        let hits = parse_results(SAMPLE, 10);
        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].title, "Memento (film) - Wikipedia");
        assert_eq!(
            hits[0].snippet,
            "A man with anterograde amnesia & a Polaroid camera."
        );
        assert_eq!(hits[0].url, "https://en.wikipedia.org/wiki/Memento_(film)");

        assert_eq!(hits[1].title, "Face blind detective novels");
        assert_eq!(hits[1].url, "https://example.com/face-blind");
    }

    #[test]
    fn test_snippet_stays_with_its_result() {
        let html = r#"
<div class="result">
  <a class="result__a" href="https://example.com/alpha">Alpha</a>
</div>
<div class="result">
  <a class="result__a" href="https://example.com/beta">Beta</a>
  <a class="result__snippet" href="https://example.com/beta">Beta snippet</a>
</div>
"#;
        let hits = parse_results(html, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Alpha");
        assert_eq!(hits[0].snippet, "");
        assert_eq!(hits[1].title, "Beta");
        assert_eq!(hits[1].snippet, "Beta snippet");
        assert_eq!(hits[1].url, "https://example.com/beta");
    }

    #[test]
    fn test_parse_results_respects_limit() {
        assert_eq!(parse_results(SAMPLE, 1).len(), 1);
        assert!(parse_results(SAMPLE, 0).is_empty());
    }

    #[test]
    fn test_parse_results_without_matches() {
        assert!(parse_results("<html><body>no results</body></html>", 5).is_empty());
    }

    #[test]
    fn test_format_results() {
        let hits = vec![
            SearchHit {
                title: "Memento".to_string(),
                snippet: "Amnesia thriller.".to_string(),
                url: "https://example.com/memento".to_string(),
            },
            SearchHit {
                title: "Untitled".to_string(),
                snippet: String::new(),
                url: "https://example.com/u".to_string(),
            },
        ];
        assert_eq!(
            format_results(&hits),
            "Memento: Amnesia thriller. (https://example.com/memento)\nUntitled (https://example.com/u)"
        );
        assert_eq!(format_results(&[]), NO_RESULT);
    }

    #[test]
    fn test_tool_metadata() {
        let tool = WebSearchTool::new(&SearchConfig::default()).unwrap();
        assert_eq!(tool.name(), "Web Search");
        assert!(tool.description().contains("similar story"));
    }
}
