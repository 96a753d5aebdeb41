//! Search-engine HTTP client.
//!
//! Sync client for an Elasticsearch-compatible API: index lifecycle, bulk
//! document loading and the boosted query the site's search box issues.
//! Documents are submitted with auto-generated IDs; re-indexing a version
//! without deleting the index first therefore duplicates its documents,
//! which is why the CLI exposes a recreate step.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::info;
use ureq::Agent;

use crate::{SearchDocument, SearchError};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Search-engine client bound to one index.
pub struct SearchClient {
    agent: Agent,
    base_url: String,
    index: String,
}

/// One query hit: relevance score plus the stored document.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Relevance score assigned by the engine.
    #[serde(rename = "_score")]
    pub score: f64,
    /// The indexed document.
    #[serde(rename = "_source")]
    pub document: SearchDocument,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

impl SearchClient {
    /// Create a client for `index` at `base_url`.
    #[must_use]
    pub fn new(base_url: &str, index: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            index: index.to_owned(),
        }
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }

    /// Create the index with its analyzer and field mappings.
    pub fn create_index(&self) -> Result<(), SearchError> {
        info!("creating index {}", self.index);
        let response = self
            .agent
            .put(&self.index_url())
            .send_json(index_mapping())?;
        check(response)?;
        Ok(())
    }

    /// Delete the index. A missing index is not an error.
    pub fn delete_index(&self) -> Result<(), SearchError> {
        info!("deleting index {}", self.index);
        let response = self.agent.delete(&self.index_url()).call()?;
        if response.status().as_u16() == 404 {
            return Ok(());
        }
        check(response)?;
        Ok(())
    }

    /// Bulk-load a stream of documents, returning how many were submitted.
    ///
    /// The stream is consumed lazily into the NDJSON request body; an
    /// extraction error aborts the load before anything is submitted.
    pub fn index_documents<I>(&self, documents: I) -> Result<usize, SearchError>
    where
        I: IntoIterator<Item = Result<SearchDocument, SearchError>>,
    {
        let (body, count) = bulk_body(&self.index, documents)?;
        if count == 0 {
            info!("no documents to index");
            return Ok(0);
        }

        let url = format!("{}/_bulk", self.base_url);
        let bytes = body.into_bytes();
        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .send(&bytes[..])?;
        check(response)?;

        info!("indexed {count} documents into {}", self.index);
        Ok(count)
    }

    /// Run the boosted version-filtered query, top five hits by score.
    pub fn search(&self, version: &str, keywords: &str) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/_search", self.index_url());
        let response = self
            .agent
            .post(&url)
            .send_json(query_body(version, keywords))?;
        let response = check(response)?;

        let parsed: SearchResponse = response.into_body().read_json()?;
        Ok(parsed.hits.hits)
    }
}

/// Surface a non-success response as a structured error.
fn check(
    response: ureq::http::Response<ureq::Body>,
) -> Result<ureq::http::Response<ureq::Body>, SearchError> {
    let status = response.status().as_u16();
    if status >= 400 {
        let body = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(SearchError::Response { status, body });
    }
    Ok(response)
}

/// The boosted boolean query body.
///
/// `version` is a non-scoring filter; `html` (boost 1) and `title`
/// (boost 3) drive relevance. Top five hits.
#[must_use]
pub fn query_body(version: &str, keywords: &str) -> serde_json::Value {
    json!({
        "from": 0, "size": 5,
        "query": {
            "bool": {
                "filter": [
                    {"match": {"version": version}}
                ],
                "should": [
                    {"match": {
                        "html": {
                            "query": keywords,
                            "boost": 1
                        }
                    }},
                    {"match": {
                        "title": {
                            "query": keywords,
                            "boost": 3
                        }
                    }}
                ]
            }
        }
    })
}

/// Build the NDJSON `_bulk` body: an action line and a source line per
/// document, no explicit IDs.
pub fn bulk_body<I>(index: &str, documents: I) -> Result<(String, usize), SearchError>
where
    I: IntoIterator<Item = Result<SearchDocument, SearchError>>,
{
    let mut body = String::new();
    let mut count = 0;
    for document in documents {
        let document = document?;
        body.push_str(&json!({"index": {"_index": index}}).to_string());
        body.push('\n');
        body.push_str(&serde_json::to_string(&document)?);
        body.push('\n');
        count += 1;
    }
    Ok((body, count))
}

/// Index settings: an analyzer that strips markup from the `html` field
/// before tokenizing, text mappings everywhere else.
fn index_mapping() -> serde_json::Value {
    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "htmlStripAnalyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase"],
                        "char_filter": ["html_strip"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "html": {"type": "text", "analyzer": "htmlStripAnalyzer"},
                "title": {"type": "text"},
                "parent_title": {"type": "text"},
                "version": {"type": "text"},
                "slug": {"type": "text"},
                "h1": {"type": "text"},
                "h2": {"type": "text"},
                "h3": {"type": "text"}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(slug: &str) -> SearchDocument {
        SearchDocument {
            version: "2.0".to_owned(),
            title: "Install".to_owned(),
            parent_title: String::new(),
            slug: slug.to_owned(),
            html: "<p>Run the installer.</p>".to_owned(),
            h1: vec!["Install".to_owned()],
            h2: Vec::new(),
            h3: Vec::new(),
        }
    }

    #[test]
    fn query_body_matches_the_wire_contract() {
        let body = query_body("2.0", "install");
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 5);
        assert_eq!(
            body["query"]["bool"]["filter"][0]["match"]["version"],
            "2.0"
        );
        let should = &body["query"]["bool"]["should"];
        assert_eq!(should[0]["match"]["html"]["query"], "install");
        assert_eq!(should[0]["match"]["html"]["boost"], 1);
        assert_eq!(should[1]["match"]["title"]["query"], "install");
        assert_eq!(should[1]["match"]["title"]["boost"], 3);
    }

    #[test]
    fn bulk_body_writes_two_lines_per_document() {
        let documents = vec![Ok(document("a.html")), Ok(document("b.html"))];
        let (body, count) = bulk_body("docs", documents).unwrap();

        assert_eq!(count, 2);
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#"{"index":{"_index":"docs"}}"#);
        assert!(lines[1].contains("\"slug\":\"a.html\""));
        assert_eq!(lines[2], r#"{"index":{"_index":"docs"}}"#);
        assert!(lines[3].contains("\"slug\":\"b.html\""));
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn bulk_body_has_no_document_ids_so_duplicates_accumulate() {
        // Two identical documents submit as two independent index actions;
        // without an _id the engine stores both.
        let documents = vec![Ok(document("a.html")), Ok(document("a.html"))];
        let (body, count) = bulk_body("docs", documents).unwrap();

        assert_eq!(count, 2);
        assert!(!body.contains("_id"));
        assert_eq!(
            body.lines()
                .filter(|line| line.contains("\"slug\":\"a.html\""))
                .count(),
            2
        );
    }

    #[test]
    fn bulk_body_propagates_extraction_errors() {
        let documents = vec![
            Ok(document("a.html")),
            Err(SearchError::Response {
                status: 500,
                body: "boom".to_owned(),
            }),
        ];
        let err = bulk_body("docs", documents).unwrap_err();
        assert!(matches!(err, SearchError::Response { .. }));
    }

    #[test]
    fn search_hits_deserialize_from_engine_response() {
        let raw = r#"{
            "took": 2,
            "hits": {
                "total": {"value": 1},
                "hits": [
                    {"_score": 4.2, "_source": {
                        "version": "2.0", "title": "Install", "parent_title": "",
                        "slug": "install.html", "html": "<p>installer</p>",
                        "h1": ["Install"], "h2": [], "h3": []
                    }}
                ]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.hits.hits.len(), 1);
        let hit = &parsed.hits.hits[0];
        assert!((hit.score - 4.2).abs() < f64::EPSILON);
        assert_eq!(hit.document.slug, "install.html");
    }
}
