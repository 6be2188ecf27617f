use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    APP_NAME, METADATA_CONTENT_TYPE, METADATA_VERSION, PDF_CONTENT_TYPE, PDF_VERSION, SearchField,
    TransactionEdge,
};
use crate::error::ScivaultError;

const QUERY_LIMIT: usize = 100;

pub trait GraphqlClient: Send + Sync {
    fn metadata_edges(
        &self,
        field: SearchField,
        value: &str,
    ) -> Result<Vec<TransactionEdge>, ScivaultError>;
    fn pdf_edges(&self, dois: &[String]) -> Result<Vec<TransactionEdge>, ScivaultError>;
}

#[derive(Clone)]
pub struct IrysGraphqlClient {
    client: Client,
    endpoint: String,
}

impl IrysGraphqlClient {
    pub fn new(endpoint: &str) -> Result<Self, ScivaultError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("scivault/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ScivaultError::GraphqlHttp(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    fn post_query(&self, query: &str) -> Result<Vec<TransactionEdge>, ScivaultError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryBody { query })
            .send()
            .map_err(|err| ScivaultError::GraphqlHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "GraphQL request failed".to_string());
            return Err(ScivaultError::GraphqlStatus { status, message });
        }
        let payload: GraphqlResponse = response
            .json()
            .map_err(|err| ScivaultError::GraphqlHttp(err.to_string()))?;
        Ok(payload.into_edges())
    }
}

impl GraphqlClient for IrysGraphqlClient {
    fn metadata_edges(
        &self,
        field: SearchField,
        value: &str,
    ) -> Result<Vec<TransactionEdge>, ScivaultError> {
        self.post_query(&metadata_query(field, value))
    }

    fn pdf_edges(&self, dois: &[String]) -> Result<Vec<TransactionEdge>, ScivaultError> {
        if dois.is_empty() {
            return Ok(Vec::new());
        }
        self.post_query(&pdf_query(dois))
    }
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<GraphqlData>,
}

impl GraphqlResponse {
    fn into_edges(self) -> Vec<TransactionEdge> {
        self.data
            .and_then(|data| data.transactions)
            .map(|connection| {
                connection
                    .edges
                    .into_iter()
                    .map(|edge| edge.node)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    #[serde(default)]
    transactions: Option<TransactionConnection>,
}

#[derive(Debug, Deserialize)]
struct TransactionConnection {
    #[serde(default)]
    edges: Vec<EdgeEnvelope>,
}

#[derive(Debug, Deserialize)]
struct EdgeEnvelope {
    node: TransactionEdge,
}

fn metadata_query(field: SearchField, value: &str) -> String {
    transaction_query(&[
        tag_filter("App-Name", &[APP_NAME]),
        tag_filter("Content-Type", &[METADATA_CONTENT_TYPE]),
        tag_filter("Version", &[METADATA_VERSION]),
        tag_filter(field.tag_name(), &[value]),
    ])
}

fn pdf_query(dois: &[String]) -> String {
    let values = dois.iter().map(|doi| doi.as_str()).collect::<Vec<_>>();
    transaction_query(&[
        tag_filter("App-Name", &[APP_NAME]),
        tag_filter("Content-Type", &[PDF_CONTENT_TYPE]),
        tag_filter("Version", &[PDF_VERSION]),
        tag_filter("doi", &values),
    ])
}

fn transaction_query(filters: &[String]) -> String {
    format!(
        "query {{\n  transactions(\n    tags: [\n      {}\n    ],\n    first: {}\n  ) {{\n    edges {{\n      node {{\n        id\n        tags {{\n          name\n          value\n        }}\n      }}\n    }}\n  }}\n}}",
        filters.join(",\n      "),
        QUERY_LIMIT
    )
}

fn tag_filter(name: &str, values: &[&str]) -> String {
    let list = values
        .iter()
        .map(|value| Value::from(*value).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{{ name: {}, values: [{}] }}",
        Value::from(name),
        list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_query_filters() {
        let query = metadata_query(SearchField::Doi, "10.1000/demo");
        assert!(query.contains(r#"{ name: "App-Name", values: ["scivault"] }"#));
        assert!(query.contains(r#"{ name: "Content-Type", values: ["application/json"] }"#));
        assert!(query.contains(r#"{ name: "Version", values: ["1.0.3"] }"#));
        assert!(query.contains(r#"{ name: "doi", values: ["10.1000/demo"] }"#));
        assert!(query.contains("first: 100"));
    }

    #[test]
    fn metadata_query_escapes_value() {
        let query = metadata_query(SearchField::Title, "on \"quoted\" titles");
        assert!(query.contains(r#"values: ["on \"quoted\" titles"]"#));
    }

    #[test]
    fn pdf_query_lists_all_dois() {
        let dois = vec!["10.1/a".to_string(), "10.1/b".to_string()];
        let query = pdf_query(&dois);
        assert!(query.contains(r#"{ name: "doi", values: ["10.1/a", "10.1/b"] }"#));
        assert!(query.contains(r#"{ name: "Content-Type", values: ["application/pdf"] }"#));
        assert!(query.contains(r#"{ name: "Version", values: ["1.0.1"] }"#));
    }

    #[test]
    fn decode_response_envelope() {
        let body = r#"{
            "data": {
                "transactions": {
                    "edges": [
                        {
                            "node": {
                                "id": "tx1",
                                "tags": [{"name": "doi", "value": "10.1/a"}]
                            }
                        }
                    ]
                }
            }
        }"#;
        let response: GraphqlResponse = serde_json::from_str(body).unwrap();
        let edges = response.into_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "tx1");
        assert_eq!(edges[0].tag_value("doi"), Some("10.1/a"));
    }

    #[test]
    fn decode_response_without_data() {
        let response: GraphqlResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(response.into_edges().is_empty());
    }
}
