//! HTTP client for the exchange chart endpoint and the article service.
//!
//! One method per endpoint. There is no retry: a failed request is returned
//! to the caller, which decides whether to show it or ask again.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::Result;
use crate::error::CandleviewError;
use crate::models::Pair;
use crate::models::article::{Article, ArticleListResponse, CreateArticleRequest};
use crate::models::candle::{Candle, ChartResponse, Interval};

/// Upper bound on a single request, including the body download.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client shared by every fetch in the application.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    articles_url: String,
}

impl ApiClient {
    /// Creates a client for the given exchange and article service bases.
    ///
    /// # Errors
    ///
    /// Returns [`CandleviewError::Http`] if the underlying HTTP client
    /// cannot be built.
    pub fn new(api_url: &str, articles_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            articles_url: articles_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the chart URL for a pair, interval and window size.
    pub fn chart_url(&self, pair: &Pair, interval: Interval, size: usize) -> String {
        format!(
            "{}/public/v2/chart/{}/{}?interval={}&size={}",
            self.api_url,
            pair.quote,
            pair.target,
            interval.as_str(),
            size
        )
    }

    /// Fetches up to `size` candles, newest first as the exchange sends them.
    ///
    /// # Errors
    ///
    /// Returns [`CandleviewError::Http`] on transport failures, a non-2xx
    /// status or a body that is not a chart response, and
    /// [`CandleviewError::Api`] when the body reports `result: "error"`.
    pub async fn fetch_chart(
        &self,
        pair: &Pair,
        interval: Interval,
        size: usize,
    ) -> Result<Vec<Candle>> {
        let url = self.chart_url(pair, interval, size);
        debug!(%url, "Fetching chart");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: ChartResponse = response.json().await?;

        if body.is_error() {
            return Err(CandleviewError::Api {
                code: body.error_code.unwrap_or_else(|| "unknown".to_string()),
                message: format!("chart request for {pair} failed"),
            });
        }

        info!(
            %pair,
            interval = interval.as_str(),
            requested = size,
            received = body.chart.len(),
            "Fetched chart"
        );
        Ok(body.chart)
    }

    /// Lists every published article.
    ///
    /// # Errors
    ///
    /// Returns [`CandleviewError::Http`] on transport failures, a non-2xx
    /// status or an unreadable body.
    pub async fn list_articles(&self) -> Result<Vec<Article>> {
        let url = format!("{}/api/articles", self.articles_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: ArticleListResponse = response.json().await?;

        debug!(count = body.articles.len(), "Fetched articles");
        Ok(body.articles)
    }

    /// Publishes a new article with the given HTML content.
    ///
    /// # Errors
    ///
    /// Returns [`CandleviewError::MalformedMessage`] for empty content and
    /// [`CandleviewError::Http`] on transport failures or a non-2xx status.
    pub async fn create_article(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(CandleviewError::MalformedMessage(
                "article content is empty".to_string(),
            ));
        }

        let url = format!("{}/api/articles", self.articles_url);
        let request = CreateArticleRequest {
            content: content.to_string(),
        };
        self.client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        info!(bytes = content.len(), "Article published");
        Ok(())
    }
}
