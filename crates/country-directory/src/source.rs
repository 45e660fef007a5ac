//! Collaborators that supply country data.
//!
//! The controller only sees the three traits below; the concrete clients
//! talk to the REST API and to the GraphQL gateway.

pub mod gateway;
pub mod payload;
pub mod rest;
#[cfg(test)]
pub(crate) mod scripted;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DirectoryConfig;
use crate::error::{Result, SourceResult};
use crate::types::{CountryDetail, CountrySummary, SearchCriterion};

pub use gateway::GatewayClient;
pub use rest::RestCountriesClient;

/// Full unfiltered catalogue, returned in one response.
#[async_trait]
pub trait CountryListSource: Send + Sync {
    async fn list_countries(&self) -> SourceResult<Vec<CountrySummary>>;
}

/// Server-side filtering by one criterion.
#[async_trait]
pub trait CountryFilterSource: Send + Sync {
    async fn filter_countries(
        &self,
        criterion: SearchCriterion,
        term: &str,
    ) -> SourceResult<Vec<CountrySummary>>;
}

/// Exact-name lookup. `Ok(None)` means the country does not exist.
#[async_trait]
pub trait CountryDetailSource: Send + Sync {
    async fn country_detail(&self, name: &str) -> SourceResult<Option<CountryDetail>>;
}

#[derive(Clone)]
pub struct DirectorySources {
    pub list: Arc<dyn CountryListSource>,
    pub filter: Arc<dyn CountryFilterSource>,
    pub detail: Arc<dyn CountryDetailSource>,
}

impl std::fmt::Debug for DirectorySources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySources").finish_non_exhaustive()
    }
}

impl DirectorySources {
    pub fn new(
        list: Arc<dyn CountryListSource>,
        filter: Arc<dyn CountryFilterSource>,
        detail: Arc<dyn CountryDetailSource>,
    ) -> Self {
        Self {
            list,
            filter,
            detail,
        }
    }

    /// List and filter go straight to the REST API; details go through the
    /// gateway, which reshapes the upstream record.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self> {
        let rest = Arc::new(RestCountriesClient::new(
            &config.rest_base_url,
            config.request_timeout(),
        )?);
        let gateway = Arc::new(GatewayClient::new(
            &config.gateway_url,
            config.request_timeout(),
        )?);
        Ok(Self::new(rest.clone(), rest, gateway))
    }
}
