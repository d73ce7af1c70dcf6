//! PubMed record retrieval through NCBI E-utilities
//!
//! Only the `esummary` endpoint is used; it returns citation metadata as
//! JSON. Abstracts are not part of the summary and are left empty.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::PubmedConfig;
use crate::store::NewPublication;

#[derive(Error, Debug)]
pub enum PubmedError {
    #[error("PubMed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("PubMed returned status {0}")]
    Status(u16),

    #[error("PubMed has no record for id {0}")]
    NotFound(String),

    #[error("Unexpected PubMed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PubmedClient: Send + Sync {
    async fn fetch(&self, pubmed_id: &str) -> Result<NewPublication, PubmedError>;
}

/// `esummary.fcgi?db=pubmed&retmode=json` client.
#[derive(Debug, Clone)]
pub struct EutilsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EutilsClient {
    pub fn new(config: &PubmedConfig) -> Result<Self, PubmedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("gw-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    result: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<SummaryAuthor>,
    #[serde(default)]
    fulljournalname: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    pages: Option<String>,
    #[serde(default)]
    pubdate: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryAuthor {
    name: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `"2009 Dec 3"` -> `(Some("2009"), Some("Dec"))`
fn split_pubdate(pubdate: Option<&str>) -> (Option<String>, Option<String>) {
    let mut parts = pubdate.unwrap_or_default().split_whitespace();
    let year = parts.next().map(str::to_string);
    let month = parts.next().map(str::to_string);
    (year, month)
}

impl Summary {
    fn into_publication(self, pubmed_id: &str) -> NewPublication {
        let (year, month) = split_pubdate(self.pubdate.as_deref());
        let authors = self
            .authors
            .into_iter()
            .map(|a| a.name)
            .collect::<Vec<_>>()
            .join(", ");

        NewPublication {
            pubmed_id: Some(pubmed_id.to_string()),
            title: non_empty(self.title),
            authors: non_empty(Some(authors)),
            abstract_text: None,
            journal: non_empty(self.fulljournalname).or_else(|| non_empty(self.source)),
            volume: non_empty(self.volume),
            pages: non_empty(self.pages),
            month,
            year,
        }
    }
}

#[async_trait]
impl PubmedClient for EutilsClient {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, pubmed_id: &str) -> Result<NewPublication, PubmedError> {
        let url = format!("{}/esummary.fcgi", self.base_url);
        let mut params = vec![("db", "pubmed"), ("retmode", "json"), ("id", pubmed_id)];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.as_str()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(PubmedError::Status(response.status().as_u16()));
        }

        let body: SummaryResponse = response.json().await?;
        let record = body
            .result
            .and_then(|mut result| result.remove(pubmed_id))
            .ok_or_else(|| PubmedError::NotFound(pubmed_id.to_string()))?;
        let summary: Summary =
            serde_json::from_value(record).map_err(|e| PubmedError::Malformed(e.to_string()))?;

        if summary.error.is_some() {
            return Err(PubmedError::NotFound(pubmed_id.to_string()));
        }

        tracing::debug!("Fetched PubMed summary");
        Ok(summary.into_publication(pubmed_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> EutilsClient {
        EutilsClient::new(&PubmedConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn summary_body() -> serde_json::Value {
        serde_json::json!({
            "header": {"type": "esummary", "version": "0.3"},
            "result": {
                "uids": ["19958391"],
                "19958391": {
                    "uid": "19958391",
                    "title": "GeneWeaver: a web-based system for integrative functional genomics.",
                    "authors": [{"name": "Baker EJ"}, {"name": "Jay JJ"}],
                    "source": "Nucleic Acids Res",
                    "fulljournalname": "Nucleic acids research",
                    "volume": "40",
                    "pages": "D1067-76",
                    "pubdate": "2012 Jan"
                }
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_maps_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .and(query_param("db", "pubmed"))
            .and(query_param("id", "19958391"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary_body()))
            .mount(&server)
            .await;

        let publication = client_for(&server, Some("secret")).fetch("19958391").await.unwrap();
        assert_eq!(publication.pubmed_id.as_deref(), Some("19958391"));
        assert_eq!(publication.authors.as_deref(), Some("Baker EJ, Jay JJ"));
        assert_eq!(publication.journal.as_deref(), Some("Nucleic acids research"));
        assert_eq!(publication.year.as_deref(), Some("2012"));
        assert_eq!(publication.month.as_deref(), Some("Jan"));
    }

    #[tokio::test]
    async fn test_fetch_unknown_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"uids": [], "1": {"uid": "1", "error": "cannot get document summary"}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(matches!(client.fetch("1").await, Err(PubmedError::NotFound(_))));
        assert!(matches!(client.fetch("2").await, Err(PubmedError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server, None).fetch("19958391").await;
        assert!(matches!(result, Err(PubmedError::Status(503))));
    }

    #[test]
    fn test_split_pubdate() {
        assert_eq!(split_pubdate(Some("2009 Dec 3")), (Some("2009".into()), Some("Dec".into())));
        assert_eq!(split_pubdate(None), (None, None));
    }
}
