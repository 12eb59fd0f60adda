use crate::{config::StoreConfig, error::ExecutorError, store::http::error_message};
use async_trait::async_trait;
use model::QueryDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

/// Runs a compiled query against the document collection.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run_query(&self, query: &QueryDocument) -> Result<Vec<Value>, ExecutorError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest<'a> {
    query: &'a QueryDocument,
    is_aggregation: bool,
}

#[derive(Debug, Deserialize)]
struct RunQueryResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Executor backed by the `run-query` endpoint of the filter service.
#[derive(Debug, Clone)]
pub struct HttpQueryExecutor {
    client: reqwest::Client,
    url: String,
}

impl HttpQueryExecutor {
    pub fn new(config: &StoreConfig) -> Result<Self, crate::error::StoreError> {
        Ok(Self {
            client: config.http_client()?,
            url: config.endpoint("run-query"),
        })
    }
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn run_query(&self, query: &QueryDocument) -> Result<Vec<Value>, ExecutorError> {
        debug!("Running query with {} stage(s)", query.stages().len());

        let response = self
            .client
            .post(&self.url)
            .json(&RunQueryRequest {
                query,
                is_aggregation: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            error!("Query failed with status {}: {}", status, message);
            return Err(ExecutorError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let response: RunQueryResponse =
            serde_json::from_str(&body).map_err(ExecutorError::Decode)?;
        debug!("Query returned {} document(s)", response.results.len());
        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Expression;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let query = QueryDocument::matching(Expression::call(
            "$gt",
            vec![Expression::field("rb"), Expression::literal(0.5)],
        ));
        let body = serde_json::to_value(RunQueryRequest {
            query: &query,
            is_aggregation: true,
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "query": [{"$match": {"$expr": {"$gt": ["$rb", 0.5]}}}],
                "isAggregation": true
            })
        );
    }

    #[test]
    fn test_response_decoding() {
        let response: RunQueryResponse = serde_json::from_str(
            r#"{"results": [{"_id": {"$oid": "1"}, "rb": 0.7}, {"_id": {"$oid": "2"}, "rb": 0.9}]}"#,
        )
        .unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1]["rb"], json!(0.9));
    }
}
