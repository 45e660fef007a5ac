use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use super::payload::{parse_detail, parse_summaries};
use super::rest::decode_body;
use super::{CountryDetailSource, CountryListSource};
use crate::error::{DirectoryError, Result, SourceError, SourceResult};
use crate::types::{CountryDetail, CountrySummary};

pub const COUNTRIES_QUERY: &str = "query GetCountries {
  countries {
    name { common }
    flag
    population
    region
    capital
  }
}";

pub const COUNTRY_BY_NAME_QUERY: &str = "query GetCountryByName($name: String!) {
  countryByName(name: $name) {
    name { common official nativeName { language official common } }
    flag
    population
    region
    capital
    currencies { code name symbol }
    borders
    flags { png svg alt }
    languages { key value }
  }
}";

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// GraphQL-over-HTTP client for the country gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GatewayClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Client(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Runs a query and returns `data.<field>`.
    async fn query_field(&self, query: &str, variables: Value, field: &str) -> SourceResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        // GraphQL servers report resolver errors with a 200 and an `errors`
        // array, but some send them with a 4xx/5xx; prefer the message.
        let envelope = decode_body(&body).unwrap_or(Value::Null);
        if let Some(message) = graphql_errors(&envelope) {
            return Err(SourceError::Graphql(message));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        Ok(extract_field(envelope, field))
    }
}

fn graphql_errors(envelope: &Value) -> Option<String> {
    let errors = envelope.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<&str> = errors
        .iter()
        .map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown gateway error")
        })
        .collect();
    Some(messages.join("; "))
}

fn extract_field(envelope: Value, field: &str) -> Value {
    match envelope {
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Object(mut data)) => data.remove(field).unwrap_or(Value::Null),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

#[async_trait]
impl CountryListSource for GatewayClient {
    async fn list_countries(&self) -> SourceResult<Vec<CountrySummary>> {
        let payload = self
            .query_field(COUNTRIES_QUERY, json!({}), "countries")
            .await?;
        parse_summaries(payload)
    }
}

#[async_trait]
impl CountryDetailSource for GatewayClient {
    async fn country_detail(&self, name: &str) -> SourceResult<Option<CountryDetail>> {
        let payload = self
            .query_field(COUNTRY_BY_NAME_QUERY, json!({ "name": name }), "countryByName")
            .await?;
        parse_detail(payload)
    }
}
