use crate::{
    config::StoreConfig,
    error::StoreError,
    retry::RetryError,
    store::FilterStore,
};
use async_trait::async_trait;
use model::{CustomFilter, FilterId, NewCustomFilter};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

/// Filter store reached over the HTTP interface of the filter service.
#[derive(Debug, Clone)]
pub struct HttpFilterStore {
    client: Client,
    config: StoreConfig,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    success: bool,
    id: Option<FilterId>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpFilterStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = config.http_client()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(StoreConfig::from_env())
    }

    /// Sends the request built by `build`, retrying transient failures, and
    /// returns the body of a successful response.
    async fn send<F>(&self, build: F) -> Result<String, StoreError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let this = self;
        let build = &build;
        this.config
            .retry
            .run(move || this.attempt(build(&this.client)), StoreError::is_transient)
            .await
            .map_err(|err| match err {
                RetryError::Fatal(err) => err,
                RetryError::AttemptsExceeded(err) => StoreError::RetriesExhausted(format!(
                    "{} attempts failed, last error: {}",
                    this.config.retry.max_attempts, err
                )),
            })
    }

    async fn attempt(&self, request: RequestBuilder) -> Result<String, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Message carried by an `{"error": ...}` body, or the raw body otherwise.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(StoreError::Decode)
}

fn not_found_as(id: &FilterId) -> impl FnOnce(StoreError) -> StoreError + '_ {
    move |err| match err {
        StoreError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            StoreError::NotFound(id.clone())
        }
        other => other,
    }
}

/// A 400 on save is either a label clash or some other validation failure.
fn rejected_save_as(label: &str) -> impl FnOnce(StoreError) -> StoreError + '_ {
    move |err| match err {
        StoreError::Status { status, message } if status == StatusCode::BAD_REQUEST.as_u16() => {
            if message.to_lowercase().contains("already exists") {
                StoreError::DuplicateLabel(label.to_string())
            } else {
                StoreError::Rejected(message)
            }
        }
        other => other,
    }
}

#[async_trait]
impl FilterStore for HttpFilterStore {
    async fn get_filter(&self, id: &FilterId) -> Result<CustomFilter, StoreError> {
        let url = self.config.endpoint(&format!("get-filter/{id}"));
        debug!("Fetching custom filter {}", id);

        let body = self
            .send(|client| client.get(&url))
            .await
            .map_err(not_found_as(id))?;
        decode(&body)
    }

    async fn list_filters(&self) -> Result<Vec<CustomFilter>, StoreError> {
        let url = self.config.endpoint("get-filters");
        let body = self.send(|client| client.get(&url)).await?;
        let filters: Vec<CustomFilter> = decode(&body)?;
        debug!("Loaded {} custom filters", filters.len());
        Ok(filters)
    }

    async fn save_filter(&self, filter: &NewCustomFilter) -> Result<FilterId, StoreError> {
        let url = self.config.endpoint("save-filter");

        let body = self
            .send(|client| client.post(&url).json(filter))
            .await
            .map_err(rejected_save_as(&filter.label))?;

        let response: SaveResponse = decode(&body)?;
        match response {
            SaveResponse {
                success: true,
                id: Some(id),
                ..
            } => {
                info!("Saved custom filter '{}' as {}", filter.label, id);
                Ok(id)
            }
            SaveResponse { error, .. } => Err(StoreError::Rejected(
                error.unwrap_or_else(|| "save was not acknowledged".to_string()),
            )),
        }
    }

    async fn delete_filter(&self, id: &FilterId) -> Result<(), StoreError> {
        let url = self.config.endpoint(&format!("delete-filter/{id}"));
        self.send(|client| client.delete(&url))
            .await
            .map_err(not_found_as(id))?;
        info!("Deleted custom filter {}", id);
        Ok(())
    }
}
