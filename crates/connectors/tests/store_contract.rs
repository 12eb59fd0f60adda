use connectors::{
    FilterStore, InMemoryFilterStore, RetryError, RetryPolicy, StoreConfig, StoreError,
};
use model::{CustomFilter, FilterId, NewCustomFilter, OperatorCode, Pipeline, Step};
use std::{sync::Arc, time::Duration};
use tracing_test::traced_test;

fn saved(id: &str, label: &str) -> CustomFilter {
    let pipeline = Pipeline::new().push_step(
        Step::range(format!("{id}-step"), "drb")
            .with_operator(OperatorCode::Lt)
            .with_literal(0.9),
    );
    NewCustomFilter::from_pipeline(label, &pipeline)
        .unwrap()
        .into_saved(FilterId::from(id))
}

#[tokio::test]
async fn test_store_is_usable_as_trait_object() {
    let store: Arc<dyn FilterStore> = Arc::new(InMemoryFilterStore::with_filters([
        saved("f1", "low drb"),
        saved("f2", "real"),
    ]));

    let filter = store.get_filter(&FilterId::from("f2")).await.unwrap();
    assert_eq!(filter.label, "real");
    assert_eq!(filter.pipeline().len(), 1);
    assert_eq!(store.list_filters().await.unwrap().len(), 2);

    let err = store.get_filter(&FilterId::from("missing")).await.unwrap_err();
    assert_eq!(err.to_string(), "Filter not found: missing");
}

#[tokio::test]
async fn test_concurrent_saves_keep_labels_unique() {
    let store = Arc::new(InMemoryFilterStore::new());
    let template = saved("x", "x");
    let payload =
        NewCustomFilter::from_pipeline("shared", &Pipeline::from_parts(template.steps, vec![]))
            .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let payload = payload.clone();
            tokio::spawn(async move { store.save_filter(&payload).await })
        })
        .collect();

    let mut stored = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => stored += 1,
            Err(StoreError::DuplicateLabel(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(stored, 1);
    assert_eq!(duplicates, 7);
}

#[tokio::test]
#[traced_test]
async fn test_transient_store_errors_are_retried_and_logged() {
    let policy = StoreConfig::default()
        .with_retry(RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(1)))
        .retry;

    let result: Result<(), _> = policy
        .run(
            || async {
                Err(StoreError::Status {
                    status: 503,
                    message: "unavailable".into(),
                })
            },
            StoreError::is_transient,
        )
        .await;

    assert!(matches!(result, Err(RetryError::AttemptsExceeded(_))));
    assert!(logs_contain("Attempt 1 failed"));
}

#[test]
fn test_client_errors_are_not_transient() {
    let rejected = StoreError::Status {
        status: 400,
        message: "Filter name already exists".into(),
    };
    assert!(!rejected.is_transient());
    assert!(!StoreError::DuplicateLabel("real".into()).is_transient());
}
