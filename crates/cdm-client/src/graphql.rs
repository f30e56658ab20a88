//! Cloud management plane (GraphQL) client
//!
//! The cloud plane exposes a single GraphQL endpoint at `/api/graphql` and
//! issues bearer tokens from `/api/client_token` for service accounts.
//! A response carrying an `errors` array is always surfaced as
//! [`CdmError::GraphQl`], even when partial `data` came back.

use crate::common::decode_response;
use crate::error::CdmError;
use crate::resolver::{ObjectType, single_match};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

const SLA_DOMAINS_QUERY: &str = r#"
query SlaDomains($name: String!) {
  slaDomains(filter: [{field: NAME, text: $name}]) {
    edges { node { id name } }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlaDomainsData {
    sla_domains: Connection<NamedNode>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct NamedNode {
    id: String,
    name: String,
}

/// Cloud management plane client
#[derive(Debug, Clone)]
pub struct CloudClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl CloudClient {
    /// Create a client from an existing access token
    pub fn new(base_url: &str, access_token: String) -> Result<Self, CdmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(CdmError::Http)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Exchange service-account credentials for an access token
    pub async fn login(base_url: &str, client_id: &str, client_secret: &str) -> Result<Self, CdmError> {
        let mut cloud = Self::new(base_url, String::new())?;
        let url = format!("{}/api/client_token", cloud.base_url);
        debug!("Requesting cloud access token for client {}", client_id);

        let response = cloud
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&json!({ "client_id": client_id, "client_secret": client_secret }))
            .send()
            .await
            .map_err(CdmError::Http)?;
        let token: TokenResponse = decode_response(&Method::POST, "client_token", response)
            .await
            .map_err(|e| match e {
                CdmError::Api { status, message } if status == 400 => {
                    CdmError::Authentication(message)
                }
                other => other,
            })?;

        cloud.access_token = token.access_token;
        Ok(cloud)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a query or mutation and decode `data` into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, CdmError> {
        let url = format!("{}/api/graphql", self.base_url);
        debug!("POST {} ({} bytes of query)", url, query.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
            .json(&GraphQlRequest { query, variables: &variables })
            .send()
            .await
            .map_err(CdmError::Http)?;

        let envelope: GraphQlResponse<T> = decode_response(&Method::POST, "graphql", response).await?;
        into_data(envelope)
    }

    /// Resolve an SLA Domain name to its id
    pub async fn sla_domain_id(&self, name: &str) -> Result<String, CdmError> {
        let data: SlaDomainsData = self.execute(SLA_DOMAINS_QUERY, json!({ "name": name })).await?;
        let nodes = data.sla_domains.edges.into_iter().map(|edge| edge.node).collect();
        single_match(nodes, ObjectType::SlaDomain, name, |n: &NamedNode| n.name.as_str()).map(|n| n.id)
    }
}

/// Unwrap a GraphQL envelope, turning any reported error into `CdmError::GraphQl`
pub fn into_data<T>(envelope: GraphQlResponse<T>) -> Result<T, CdmError> {
    if !envelope.errors.is_empty() {
        let messages = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CdmError::GraphQl(messages));
    }
    envelope
        .data
        .ok_or_else(|| CdmError::GraphQl("response contained neither data nor errors".to_string()))
}
