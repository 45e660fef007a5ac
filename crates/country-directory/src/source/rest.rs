use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::payload::{parse_detail_list, parse_summaries};
use super::{CountryDetailSource, CountryFilterSource, CountryListSource};
use crate::error::{DirectoryError, Result, SourceError, SourceResult};
use crate::types::{CountryDetail, CountrySummary, SearchCriterion};

const SUMMARY_FIELDS: &str = "name,capital,population,region,flag";

/// Client for the public REST countries API (`/v3.1`).
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Client(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn list_url(&self) -> String {
        format!("{}/all?fields={SUMMARY_FIELDS}", self.base_url)
    }

    pub fn filter_url(&self, criterion: SearchCriterion, term: &str) -> String {
        format!(
            "{}/{}/{}?fields={SUMMARY_FIELDS}",
            self.base_url,
            criterion.as_str(),
            urlencoding::encode(term.trim())
        )
    }

    pub fn detail_url(&self, name: &str) -> String {
        format!(
            "{}/name/{}?fullText=true",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    async fn get_json(&self, url: &str) -> SourceResult<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        decode_body(&body)
    }
}

pub(crate) fn decode_body(body: &str) -> SourceResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| SourceError::Decode(format!("invalid JSON body: {e}")))
}

#[async_trait]
impl CountryListSource for RestCountriesClient {
    async fn list_countries(&self) -> SourceResult<Vec<CountrySummary>> {
        let payload = self.get_json(&self.list_url()).await?;
        parse_summaries(payload)
    }
}

#[async_trait]
impl CountryFilterSource for RestCountriesClient {
    async fn filter_countries(
        &self,
        criterion: SearchCriterion,
        term: &str,
    ) -> SourceResult<Vec<CountrySummary>> {
        let payload = self.get_json(&self.filter_url(criterion, term)).await?;
        parse_summaries(payload)
    }
}

#[async_trait]
impl CountryDetailSource for RestCountriesClient {
    async fn country_detail(&self, name: &str) -> SourceResult<Option<CountryDetail>> {
        match self.get_json(&self.detail_url(name)).await {
            Ok(payload) => parse_detail_list(payload),
            Err(SourceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
