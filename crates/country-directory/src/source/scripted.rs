//! Test double whose responses are released by the test, in any order.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::{CountryDetailSource, CountryFilterSource, CountryListSource, DirectorySources};
use crate::error::{SourceError, SourceResult};
use crate::types::{CountryDetail, CountrySummary, SearchCriterion};

pub(crate) enum ScriptedRequest {
    List {
        reply: oneshot::Sender<SourceResult<Vec<CountrySummary>>>,
    },
    Filter {
        criterion: SearchCriterion,
        term: String,
        reply: oneshot::Sender<SourceResult<Vec<CountrySummary>>>,
    },
    Detail {
        name: String,
        reply: oneshot::Sender<SourceResult<Option<CountryDetail>>>,
    },
}

pub(crate) struct ScriptedSource {
    requests: mpsc::UnboundedSender<ScriptedRequest>,
}

impl ScriptedSource {
    pub(crate) fn sources() -> (DirectorySources, mpsc::UnboundedReceiver<ScriptedRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        let source = Arc::new(Self { requests });
        (
            DirectorySources::new(source.clone(), source.clone(), source),
            rx,
        )
    }

    async fn ask<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<SourceResult<T>>) -> ScriptedRequest,
    ) -> SourceResult<T> {
        let (reply, rx) = oneshot::channel();
        if self.requests.send(build(reply)).is_err() {
            return Err(SourceError::Decode("scripted source closed".to_string()));
        }
        rx.await
            .unwrap_or_else(|_| Err(SourceError::Decode("scripted reply dropped".to_string())))
    }
}

#[async_trait]
impl CountryListSource for ScriptedSource {
    async fn list_countries(&self) -> SourceResult<Vec<CountrySummary>> {
        self.ask(|reply| ScriptedRequest::List { reply }).await
    }
}

#[async_trait]
impl CountryFilterSource for ScriptedSource {
    async fn filter_countries(
        &self,
        criterion: SearchCriterion,
        term: &str,
    ) -> SourceResult<Vec<CountrySummary>> {
        let term = term.to_string();
        self.ask(|reply| ScriptedRequest::Filter {
            criterion,
            term,
            reply,
        })
        .await
    }
}

#[async_trait]
impl CountryDetailSource for ScriptedSource {
    async fn country_detail(&self, name: &str) -> SourceResult<Option<CountryDetail>> {
        let name = name.to_string();
        self.ask(|reply| ScriptedRequest::Detail { name, reply })
            .await
    }
}

pub(crate) fn countries(prefix: &str, count: usize) -> Vec<CountrySummary> {
    (0..count)
        .map(|index| CountrySummary::new(format!("{prefix}-{index}")))
        .collect()
}

pub(crate) fn detail(name: &str) -> CountryDetail {
    CountryDetail {
        summary: CountrySummary::new(name),
        official_name: format!("Republic of {name}"),
        native_names: Vec::new(),
        currencies: Vec::new(),
        borders: Vec::new(),
        languages: Vec::new(),
        flags: Default::default(),
    }
}
