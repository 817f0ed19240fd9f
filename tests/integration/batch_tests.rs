use crate::support::{certificate_page, create_test_config, mount_page, orchestrator, DETAIL_PATH};
use certfetch::{CancelSignal, CertError, ExecutionMode, FailureReason, Field};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a mixed batch 3 (identifiers 30-39)
async fn mount_mixed_batch(mock_server: &MockServer) {
    mount_page(mock_server, 31, certificate_page("F31", None)).await;
    mount_page(mock_server, 34, certificate_page("F34", None)).await;
    mount_page(mock_server, 38, certificate_page("F38", Some(Field::Folio))).await;
    mount_page(mock_server, 39, certificate_page("F39", None)).await;

    Mock::given(method("GET"))
        .and(path(format!("{}{}", DETAIL_PATH, 36)))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(mock_server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_batch_concurrent() {
    let mock_server = MockServer::start().await;
    mount_mixed_batch(&mock_server).await;

    let config = create_test_config(&mock_server, 10);
    let result = orchestrator(&config)
        .run_batch(3, ExecutionMode::Concurrent)
        .await
        .expect("Batch failed");

    assert_eq!(result.first_identifier, 30);
    assert_eq!(result.outcomes.len(), 10);
    for (position, outcome) in result.outcomes.iter().enumerate() {
        assert_eq!(outcome.identifier(), 30 + position as u64);
    }

    assert_eq!(result.stats.found, 3);
    assert_eq!(result.stats.not_found, 5);
    assert_eq!(result.stats.failed, 2);
    assert_eq!(result.stats.failed_network, 1);
    assert_eq!(result.stats.failed_page_shape, 1);
    assert!((result.stats.failure_rate() - 20.0).abs() < 1e-9);

    let folios: Vec<_> = result.records().map(|r| r.folio.as_str()).collect();
    assert_eq!(folios, vec!["F31", "F34", "F39"]);
    assert_eq!(result.failed_identifiers(), vec![36, 38]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sequential_and_concurrent_agree() {
    let mock_server = MockServer::start().await;
    mount_mixed_batch(&mock_server).await;

    let config = create_test_config(&mock_server, 10);
    let orchestrator = orchestrator(&config);

    let sequential = orchestrator
        .run_batch(3, ExecutionMode::Sequential)
        .await
        .expect("Sequential batch failed");
    let concurrent = orchestrator
        .run_batch(3, ExecutionMode::Concurrent)
        .await
        .expect("Concurrent batch failed");

    assert_eq!(sequential.outcomes, concurrent.outcomes);
    assert_eq!(sequential.stats, concurrent.stats);
}

#[tokio::test]
async fn test_empty_batch_reports_zero_failure_rate() {
    let mock_server = MockServer::start().await;

    let config = create_test_config(&mock_server, 50);
    let result = orchestrator(&config)
        .run_batch(2, ExecutionMode::Concurrent)
        .await
        .expect("Batch failed");

    assert_eq!(result.first_identifier, 100);
    assert_eq!(result.stats.not_found, 50);
    assert_eq!(result.stats.found, 0);
    assert_eq!(result.stats.failed, 0);
    assert_eq!(result.stats.failure_rate(), 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_batch_keeps_every_identifier() {
    let mock_server = MockServer::start().await;

    // Every page stalls so the whole batch is still in flight when cancelled
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server, 12);
    config.portal.request_timeout_ms = 5_000;
    let orchestrator = orchestrator(&config);

    let cancel = CancelSignal::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = orchestrator
        .run_batch_with_cancel(0, ExecutionMode::Concurrent, &cancel)
        .await
        .expect("Batch failed");

    assert_eq!(result.outcomes.len(), 12);
    assert_eq!(result.stats.failed_cancelled, 12);
    assert!(result
        .outcomes
        .iter()
        .all(|o| o.failure() == Some(FailureReason::Cancelled)));
}

#[tokio::test]
async fn test_out_of_range_batch_is_an_error() {
    let mock_server = MockServer::start().await;

    let config = create_test_config(&mock_server, 1000);
    let result = orchestrator(&config)
        .run_batch(u64::MAX / 10, ExecutionMode::Sequential)
        .await;

    assert!(matches!(result, Err(CertError::BatchRange { .. })));
}
