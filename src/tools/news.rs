//! NewsAPI search tool.

use super::{Tool, ToolResult};
use crate::config::credentials::NEWS_API_KEY;
use crate::config::NewsSettings;
use crate::error::{KioskError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Searches recent articles for a topic via NewsAPI's `everything` endpoint.
pub struct NewsSearchTool {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    language: String,
    max_articles: u32,
}

/// One article returned by the search.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub source: ArticleSource,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

impl Article {
    fn summary(&self) -> String {
        format!(
            "Title: {}\nSource: {}\nURL: {}\nDescription: {}\n",
            self.title.as_deref().unwrap_or("N/A"),
            self.source.name.as_deref().unwrap_or("N/A"),
            self.url.as_deref().unwrap_or("N/A"),
            self.description.as_deref().unwrap_or("N/A"),
        )
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

impl NewsSearchTool {
    pub fn new(settings: &NewsSettings, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            api_key,
            language: settings.language.clone(),
            max_articles: settings.max_articles,
        })
    }

    /// Fetch articles for `topic`, newest first.
    #[instrument(skip(self))]
    pub async fn search(&self, topic: &str) -> Result<Vec<Article>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(KioskError::MissingCredential(NEWS_API_KEY))?;

        let page_size = self.max_articles.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", topic),
                ("sortBy", "publishedAt"),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        // NewsAPI reports failures in the body as well as the status code.
        let body: NewsResponse = response.json().await?;
        if body.status.as_deref() != Some("ok") {
            return Err(KioskError::Upstream(
                body.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        debug!("NewsAPI returned {} articles", body.articles.len());
        Ok(body.articles)
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    fn name(&self) -> &str {
        "news_search"
    }

    async fn run(&self, topic: &str) -> ToolResult {
        if self.api_key.is_none() {
            return ToolResult::failure("Missing NEWS_API_KEY.");
        }

        match self.search(topic).await {
            Ok(articles) if articles.is_empty() => ToolResult::failure("No articles found."),
            Ok(articles) => {
                info!("Found {} articles for '{}'", articles.len(), topic);
                let summaries: Vec<String> = articles.iter().map(Article::summary).collect();
                ToolResult::success(summaries.join("\n\n"))
            }
            Err(KioskError::Upstream(message)) => ToolResult::failure(message),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn tool(endpoint: String, key: Option<&str>) -> NewsSearchTool {
        let settings = NewsSettings {
            endpoint,
            ..Default::default()
        };
        NewsSearchTool::new(&settings, key.map(str::to_string), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_fails_for_any_input() {
        let tool = tool("http://127.0.0.1:9/v2/everything".to_string(), None);
        for topic in ["AI", "", "climate change"] {
            let result = tool.run(topic).await;
            assert!(!result.is_ok());
            assert_eq!(result.error(), Some("Missing NEWS_API_KEY."));
        }
    }

    #[tokio::test]
    async fn test_articles_are_formatted_and_joined() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/everything")
                    .query_param("q", "Bitcoin")
                    .query_param("sortBy", "publishedAt")
                    .query_param("language", "en")
                    .query_param("pageSize", "5")
                    .query_param("apiKey", "news-key");
                then.status(200).json_body(json!({
                    "status": "ok",
                    "totalResults": 2,
                    "articles": [
                        {"title": "BTC up", "source": {"id": null, "name": "Wire"}, "url": "https://a.example", "description": "Rally"},
                        {"title": "BTC down", "source": {"id": null, "name": "Daily"}, "url": "https://b.example", "description": null}
                    ]
                }));
            })
            .await;

        let result = tool(server.url("/v2/everything"), Some("news-key"))
            .run("Bitcoin")
            .await;

        mock.assert_async().await;
        assert_eq!(
            result.output(),
            Some(
                "Title: BTC up\nSource: Wire\nURL: https://a.example\nDescription: Rally\n\n\n\
                 Title: BTC down\nSource: Daily\nURL: https://b.example\nDescription: N/A\n"
            )
        );
    }

    #[tokio::test]
    async fn test_provider_error_message_is_returned() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/everything");
                then.status(401).json_body(json!({
                    "status": "error",
                    "code": "apiKeyInvalid",
                    "message": "Your API key is invalid or incorrect."
                }));
            })
            .await;

        let result = tool(server.url("/v2/everything"), Some("bad")).run("AI").await;
        assert_eq!(result.error(), Some("Your API key is invalid or incorrect."));
    }

    #[tokio::test]
    async fn test_empty_article_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/everything");
                then.status(200)
                    .json_body(json!({"status": "ok", "totalResults": 0, "articles": []}));
            })
            .await;

        let result = tool(server.url("/v2/everything"), Some("k")).run("zzz").await;
        assert_eq!(result.error(), Some("No articles found."));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_contained() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/everything");
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let result = tool(server.url("/v2/everything"), Some("k")).run("AI").await;
        assert!(!result.is_ok());
        assert!(result.error().unwrap().starts_with("HTTP error"));
    }
}
