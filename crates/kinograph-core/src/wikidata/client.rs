//! HTTP client for the Wikidata APIs
//!
//! Provides entity search and description lookup through the MediaWiki
//! action API, and one-hop link expansion through the SPARQL query service.
//! Every call carries the configured timeout; a timed-out or failed call is
//! a recoverable error the pipeline absorbs per item.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use crate::config::WikidataConfig;
use crate::error::{Error, Result};

use super::KnowledgeBase;
use super::types::{
    EntitiesResponse, EntityLink, SearchHit, SearchResponse, SparqlResponse,
};

/// IRI prefix of Wikidata entities in SPARQL results
const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

/// Public action API endpoint used when the builder gets no override
const DEFAULT_API_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";

/// Public SPARQL endpoint used when the builder gets no override
const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Maximum candidates requested per search; only the first is accepted
const SEARCH_LIMIT: usize = 5;

/// One-hop outgoing-link query. `{id}` is substituted with a validated
/// entity id before dispatch.
const LINK_QUERY: &str = r#"
PREFIX entity: <http://www.wikidata.org/entity/>
SELECT ?propLabel ?valUrl ?valLabel
WHERE {
  entity:{id} ?propUrl ?valUrl .
  ?property ?ref ?propUrl .
  ?property rdf:type wikibase:Property .
  ?property rdfs:label ?propLabel .
  ?valUrl rdfs:label ?valLabel .
  FILTER (LANG(?valLabel) = 'en') .
  FILTER (LANG(?propLabel) = 'en')
}
"#;

/// Wikidata API client
///
/// Thread-safe; clones share the underlying connection pool.
#[derive(Clone)]
pub struct WikidataClient {
    http_client: HttpClient,
    api_endpoint: String,
    sparql_endpoint: String,
}

impl std::fmt::Debug for WikidataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikidataClient")
            .field("api_endpoint", &self.api_endpoint)
            .field("sparql_endpoint", &self.sparql_endpoint)
            .finish()
    }
}

/// Builder for creating a WikidataClient
#[derive(Debug, Default)]
pub struct WikidataClientBuilder {
    api_endpoint: Option<String>,
    sparql_endpoint: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
}

impl WikidataClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the MediaWiki action API endpoint
    pub fn api_endpoint(mut self, url: impl Into<String>) -> Self {
        self.api_endpoint = Some(url.into());
        self
    }

    /// Set the SPARQL query service endpoint
    pub fn sparql_endpoint(mut self, url: impl Into<String>) -> Self {
        self.sparql_endpoint = Some(url.into());
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the per-call timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<WikidataClient> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(self.timeout_secs.unwrap_or(30)))
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| format!("kinograph/{}", env!("CARGO_PKG_VERSION"))),
            )
            .build()
            .map_err(Error::Network)?;

        Ok(WikidataClient {
            http_client,
            api_endpoint: self
                .api_endpoint
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            sparql_endpoint: self
                .sparql_endpoint
                .unwrap_or_else(|| DEFAULT_SPARQL_ENDPOINT.to_string()),
        })
    }
}

impl WikidataClient {
    /// Create a client from configuration
    pub fn new(config: &WikidataConfig) -> Result<Self> {
        WikidataClient::builder()
            .api_endpoint(&config.api_endpoint)
            .sparql_endpoint(&config.sparql_endpoint)
            .user_agent(&config.user_agent)
            .timeout_secs(config.timeout_secs)
            .build()
    }

    /// Create a new builder
    pub fn builder() -> WikidataClientBuilder {
        WikidataClientBuilder::new()
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(Error::KnowledgeBase(format!(
                "HTTP {status}: {snippet}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl KnowledgeBase for WikidataClient {
    async fn search(&self, name: &str) -> Result<Vec<SearchHit>> {
        debug!(name, "Searching Wikidata entities");

        let response = self
            .http_client
            .get(&self.api_endpoint)
            .query(&[
                ("action", "wbsearchentities"),
                ("format", "json"),
                ("language", "en"),
                ("limit", &SEARCH_LIMIT.to_string()),
                ("search", name),
            ])
            .send()
            .await
            .map_err(Error::Network)?;

        let response = Self::check_status(response).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::KnowledgeBase(format!("failed to parse search response: {e}")))?;

        Ok(body
            .search
            .into_iter()
            .enumerate()
            .map(|(rank, entry)| SearchHit {
                label: entry.label.unwrap_or_else(|| entry.id.clone()),
                id: entry.id,
                rank,
            })
            .collect())
    }

    async fn describe(&self, entity_id: &str) -> Result<Option<String>> {
        validate_entity_id(entity_id)?;
        debug!(entity_id, "Fetching entity description");

        let response = self
            .http_client
            .get(&self.api_endpoint)
            .query(&[
                ("action", "wbgetentities"),
                ("format", "json"),
                ("props", "descriptions"),
                ("languages", "en"),
                ("ids", entity_id),
            ])
            .send()
            .await
            .map_err(Error::Network)?;

        let response = Self::check_status(response).await?;
        let body: EntitiesResponse = response.json().await.map_err(|e| {
            Error::KnowledgeBase(format!("failed to parse entity response: {e}"))
        })?;

        Ok(body
            .entities
            .get(entity_id)
            .and_then(|entry| entry.descriptions.get("en"))
            .map(|term| term.value.clone()))
    }

    async fn linked_entities(&self, entity_id: &str) -> Result<Vec<EntityLink>> {
        validate_entity_id(entity_id)?;
        debug!(entity_id, "Querying one-hop entity links");

        let query = LINK_QUERY.replace("{id}", entity_id);

        let response = self
            .http_client
            .get(&self.sparql_endpoint)
            .header("Accept", "application/sparql-results+json")
            .query(&[("format", "json"), ("query", query.as_str())])
            .send()
            .await
            .map_err(Error::Network)?;

        let response = Self::check_status(response).await?;
        let body: SparqlResponse = response.json().await.map_err(|e| {
            Error::KnowledgeBase(format!("failed to parse SPARQL response: {e}"))
        })?;

        let links = body
            .results
            .bindings
            .into_iter()
            .filter_map(|binding| {
                // Keep only bindings whose value is itself an entity IRI;
                // literals and external URLs are not graph nodes.
                let target_iri = binding.get("valUrl")?.value.as_str();
                let target_id = target_iri.strip_prefix(ENTITY_PREFIX)?;
                if !is_entity_id(target_id) {
                    return None;
                }
                let target_name = binding.get("valLabel")?.value.clone();
                Some(EntityLink {
                    target_id: target_id.to_string(),
                    target_name,
                    relation: binding.get("propLabel").map(|v| v.value.clone()),
                })
            })
            .collect();

        Ok(links)
    }
}

/// Shape check for entity ids, e.g. `Q42`
fn is_entity_id(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next() == Some('Q') && {
        let rest = chars.as_str();
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Reject ids that are not of entity shape before interpolating them into a
/// query.
fn validate_entity_id(id: &str) -> Result<()> {
    if is_entity_id(id) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("not a Wikidata entity id: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(server: &mockito::ServerGuard) -> WikidataClient {
        WikidataClient::builder()
            .api_endpoint(format!("{}/w/api.php", server.url()))
            .sparql_endpoint(format!("{}/sparql", server.url()))
            .timeout_secs(5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_entity_id_shape() {
        assert!(is_entity_id("Q1"));
        assert!(is_entity_id("Q171048"));
        assert!(!is_entity_id("P31"));
        assert!(!is_entity_id("Q"));
        assert!(!is_entity_id("Q1 } SELECT"));
    }

    #[test]
    fn test_builder_defaults() {
        let client = WikidataClient::builder().build().unwrap();
        assert!(client.api_endpoint.contains("wikidata.org"));
        assert!(client.sparql_endpoint.contains("query.wikidata.org"));
    }

    #[test]
    fn test_client_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WikidataClient>();
    }

    #[tokio::test]
    async fn test_search_returns_ranked_hits() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/w/api.php")
            .match_query(mockito::Matcher::UrlEncoded(
                "search".into(),
                "Toy Story film".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"search":[{"id":"Q171048","label":"Toy Story"},{"id":"Q1","label":"universe"}]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let hits = client.search("Toy Story film").await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "Q171048");
        assert_eq!(hits[0].label, "Toy Story");
        assert_eq!(hits[0].rank, 0);
        assert_eq!(hits[1].rank, 1);
    }

    #[tokio::test]
    async fn test_search_empty_result_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/w/api.php")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"search":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let hits = client.search("No Such Movie film").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_is_recoverable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/w/api.php")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("upstream overloaded")
            .create_async()
            .await;

        let client = test_client(&server);
        let err = client.search("Heat film").await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_describe_extracts_english_description() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/w/api.php")
            .match_query(mockito::Matcher::UrlEncoded("ids".into(), "Q171048".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"entities":{"Q171048":{"descriptions":{"en":{"language":"en","value":"1995 animated film"}}}}}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let description = client.describe("Q171048").await.unwrap();
        assert_eq!(description.as_deref(), Some("1995 animated film"));
    }

    #[tokio::test]
    async fn test_describe_missing_description_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/w/api.php")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"entities":{"Q171048":{"descriptions":{}}}}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        assert!(client.describe("Q171048").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_linked_entities_keeps_only_entity_targets() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sparql")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/sparql-results+json")
            .with_body(
                r#"{"results":{"bindings":[
                    {"propLabel":{"value":"production company"},
                     "valUrl":{"type":"uri","value":"http://www.wikidata.org/entity/Q127552"},
                     "valLabel":{"value":"Pixar"}},
                    {"propLabel":{"value":"official website"},
                     "valUrl":{"type":"uri","value":"https://toystory.example"},
                     "valLabel":{"value":"toystory.example"}}
                ]}}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let links = client.linked_entities("Q171048").await.unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_id, "Q127552");
        assert_eq!(links[0].target_name, "Pixar");
        assert_eq!(links[0].relation.as_deref(), Some("production company"));
    }

    #[tokio::test]
    async fn test_linked_entities_rejects_malformed_id() {
        let server = mockito::Server::new_async().await;
        let client = test_client(&server);
        assert!(client.linked_entities("not-an-id").await.is_err());
    }
}
