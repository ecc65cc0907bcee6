//! 百科查询工具（MediaWiki API）

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use super::SearchTool;
use crate::config::SearchConfig;

const NO_RESULT: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

/// 百科摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub summary: String,
}

/// 百科查询工具
#[derive(Debug, Clone)]
pub struct WikipediaTool {
    http: reqwest::Client,
    api_url: String,
    top_k: usize,
    max_chars: usize,
}

impl WikipediaTool {
    pub const NAME: &'static str = "Wikipedia";
    pub const DESCRIPTION: &'static str = "Encyclopedic lookup backed by Wikipedia. Useful for facts about authors, books, films, genres and literary history. Input should be a short search query.";

    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client for Wikipedia")?;
        Ok(Self {
            http,
            api_url: config.wikipedia_api_url.clone(),
            top_k: config.wikipedia_top_k,
            max_chars: config.wikipedia_max_chars,
        })
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.top_k.to_string();
        let response: SearchResponse = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(titles_from_search(response, self.top_k))
    }

    async fn fetch_summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let response: ExtractResponse = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(summary_from_extract(response))
    }
}

#[async_trait]
impl SearchTool for WikipediaTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn run(&self, query: &str) -> Result<String> {
        tracing::info!(tool = Self::NAME, query, "🔧 调用工具");

        let titles = self.search_titles(query).await?;
        let mut summaries = Vec::new();
        // 逐个页面顺序请求
        for title in &titles {
            if let Some(summary) = self.fetch_summary(title).await? {
                summaries.push(summary);
            }
        }
        tracing::debug!(tool = Self::NAME, pages = summaries.len(), "百科查询完成");

        Ok(format_summaries(&summaries, self.max_chars))
    }
}

fn titles_from_search(response: SearchResponse, top_k: usize) -> Vec<String> {
    response
        .query
        .map(|query| query.search)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.title)
        .take(top_k)
        .collect()
}

fn summary_from_extract(response: ExtractResponse) -> Option<PageSummary> {
    let query = response.query?;
    query.pages.into_values().find_map(|page| {
        let extract = page.extract?.trim().to_string();
        if extract.is_empty() {
            return None;
        }
        Some(PageSummary {
            title: page.title,
            summary: extract,
        })
    })
}

/// 拼接为`Page: ...\nSummary: ...`段落并按字符截断
pub fn format_summaries(summaries: &[PageSummary], max_chars: usize) -> String {
    if summaries.is_empty() {
        return NO_RESULT.to_string();
    }

    let text = summaries
        .iter()
        .map(|page| format!("Page: {}\nSummary: {}", page.title, page.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_from_search() {
        let payload = r#"{
            "batchcomplete": "",
            "query": {
                "searchinfo": {"totalhits": 3},
                "search": [
                    {"ns": 0, "title": "Prosopagnosia", "pageid": 1},
                    {"ns": 0, "title": "Faces in the Crowd (film)", "pageid": 2},
                    {"ns": 0, "title": "Memento (film)", "pageid": 3}
                ]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(
            titles_from_search(response, 2),
            vec!["Prosopagnosia", "Faces in the Crowd (film)"]
        );
    }

    #[test]
    fn test_titles_from_empty_search() {
        let response: SearchResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(titles_from_search(response, 3).is_empty());
    }

    #[test]
    fn test_summary_from_extract() {
        let payload = r#"{
            "query": {
                "pages": {
                    "5413930": {
                        "pageid": 5413930,
                        "title": "Faces in the Crowd (film)",
                        "extract": "  Faces in the Crowd is a 2011 thriller about a woman with face blindness.  "
                    }
                }
            }
        }"#;
        let response: ExtractResponse = serde_json::from_str(payload).unwrap();
        let summary = summary_from_extract(response).unwrap();
        assert_eq!(summary.title, "Faces in the Crowd (film)");
        assert_eq!(
            summary.summary,
            "Faces in the Crowd is a 2011 thriller about a woman with face blindness."
        );
    }

    #[test]
    fn test_summary_from_missing_page() {
        let payload = r#"{"query": {"pages": {"-1": {"ns": 0, "title": "Nope", "missing": ""}}}}"#;
        let response: ExtractResponse = serde_json::from_str(payload).unwrap();
        assert!(summary_from_extract(response).is_none());
    }

    #[test]
    fn test_format_summaries() {
        let pages = vec![
            PageSummary {
                title: "A".to_string(),
                summary: "First.".to_string(),
            },
            PageSummary {
                title: "B".to_string(),
                summary: "Second.".to_string(),
            },
        ];
        assert_eq!(
            format_summaries(&pages, 4000),
            "Page: A\nSummary: First.\n\nPage: B\nSummary: Second."
        );
        assert_eq!(format_summaries(&pages, 7), "Page: A");
        assert_eq!(format_summaries(&[], 4000), NO_RESULT);
    }

    #[test]
    fn test_truncation_is_char_safe() {
        let pages = vec![PageSummary {
            title: "東京".to_string(),
            summary: "物語".to_string(),
        }];
        assert_eq!(format_summaries(&pages, 8), "Page: 東京");
    }
}
