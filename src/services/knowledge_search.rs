use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub title: String,
    pub content: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    /// Returns up to `limit` documents for `topic`, most relevant first.
    async fn search(&self, topic: &str, limit: usize) -> AppResult<Vec<SearchDocument>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
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
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: bool,
}

/// MediaWiki search: titles from `list=search`, then a plain-text extract per title.
pub struct WikipediaSearch {
    client: reqwest::Client,
    api_url: String,
    doc_chars_max: usize,
}

impl WikipediaSearch {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("quizgpt-server/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            api_url: config.wikipedia_api_url.clone(),
            doc_chars_max: config.wikipedia_doc_chars_max,
        }
    }

    async fn search_titles(&self, topic: &str, limit: usize) -> AppResult<Vec<String>> {
        let limit = limit.to_string();
        let response: SearchResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", topic),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(search_error)?
            .json()
            .await
            .map_err(search_error)?;

        Ok(titles_from(response))
    }

    async fn fetch_extract(&self, title: &str) -> AppResult<Option<SearchDocument>> {
        let response: ExtractResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(search_error)?
            .json()
            .await
            .map_err(search_error)?;

        Ok(document_from(response, self.doc_chars_max))
    }
}

#[async_trait]
impl KnowledgeSearch for WikipediaSearch {
    async fn search(&self, topic: &str, limit: usize) -> AppResult<Vec<SearchDocument>> {
        let titles = self.search_titles(topic, limit).await?;
        log::info!("Wikipedia search for '{}' matched {} titles", topic, titles.len());

        let mut documents = Vec::with_capacity(titles.len());
        for title in titles.iter().take(limit) {
            match self.fetch_extract(title).await? {
                Some(document) => documents.push(document),
                None => log::warn!("Wikipedia page '{}' has no extract, skipping", title),
            }
        }

        Ok(documents)
    }
}

fn titles_from(response: SearchResponse) -> Vec<String> {
    response
        .query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default()
}

fn document_from(response: ExtractResponse, doc_chars_max: usize) -> Option<SearchDocument> {
    let page = response
        .query?
        .pages
        .into_iter()
        .find(|page| !page.missing)?;

    let extract = page.extract.filter(|text| !text.trim().is_empty())?;

    Some(SearchDocument {
        title: page.title,
        content: truncate_chars(&extract, doc_chars_max),
    })
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

fn search_error(err: reqwest::Error) -> AppError {
    log::error!("Wikipedia request failed: {}", err);
    AppError::SearchServiceError(err.to_string())
}
