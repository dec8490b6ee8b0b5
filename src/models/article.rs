//! Article service models.

use serde::{Deserialize, Serialize};

/// A published article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub id: String,
    /// Sanitized HTML body.
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Body of `GET /api/articles`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleListResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Body of `POST /api/articles`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateArticleRequest {
    pub content: String,
}
