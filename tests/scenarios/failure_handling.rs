//! Test: Failure Handling - any failure before the deployment aborts the run

use crate::helpers::*;
use rollout::core::ArnError;
use rollout::execution::{RolloutError, RolloutEvent, RolloutStage};
use rollout::remote::RemoteError;

/// A packaging failure stops the run before any remote call
#[tokio::test]
async fn test_packaging_failure_makes_no_remote_calls() {
    let log = CallLog::default();
    let request = request("staging", &["orders", "payments", "users"]);

    let run = run_rollout(
        MockProducer::new(&log).failing_on("payments"),
        MockPlatform::new(&log),
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;

    match run.result {
        Err(RolloutError::Package(err)) => {
            assert!(err.to_string().contains("exited with code 2"));
        }
        other => panic!("expected packaging failure, got {:?}", other),
    }
    assert!(log.remote_calls().is_empty(), "calls: {:?}", log.calls());
    assert!(log.deployments().is_empty());

    assert!(run.events.iter().any(|e| matches!(
        e,
        RolloutEvent::FunctionFailed {
            stage: RolloutStage::Package,
            ..
        }
    )));
}

/// Concurrent packaging with a failure still never reaches the platform
#[tokio::test]
async fn test_concurrent_packaging_failure_makes_no_remote_calls() {
    let log = CallLog::default();
    let request = request("staging", &["orders", "payments", "users"]);

    let run = run_rollout(
        MockProducer::new(&log).failing_on("users"),
        MockPlatform::new(&log),
        MockGateway::new(&log),
        3,
        &request,
    )
    .await;

    assert!(matches!(run.result, Err(RolloutError::Package(_))));
    assert!(log.remote_calls().is_empty());
}

/// A lookup failure other than "not found" is fatal and creates nothing
#[tokio::test]
async fn test_alias_lookup_error_aborts_without_create() {
    let log = CallLog::default();
    let denied = RemoteError::with_code("GetAlias", "AccessDeniedException", "not authorized");
    let platform = MockPlatform::new(&log).failing("GetAlias", "shop-payments", denied.clone());
    let request = request("staging", &["orders", "payments", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform,
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;

    match run.result {
        Err(RolloutError::Remote {
            function,
            stage,
            source,
        }) => {
            assert_eq!(function, "shop-payments");
            assert_eq!(stage, RolloutStage::Alias);
            assert_eq!(source, denied);
        }
        other => panic!("expected alias failure, got {:?}", other),
    }

    let payments_calls = log.calls_for("shop-payments");
    assert!(!payments_calls
        .iter()
        .any(|c| matches!(c, Call::CreateAlias { .. } | Call::UpdateAlias { .. })));
    assert!(log.deployments().is_empty());
}

/// Publishing failures stop the function before it touches its alias
#[tokio::test]
async fn test_publish_failure_aborts() {
    let log = CallLog::default();
    let throttled = RemoteError::with_code("PublishVersion", "TooManyRequestsException", "slow down");
    let platform = MockPlatform::new(&log).failing("PublishVersion", "shop-orders", throttled);
    let request = request("staging", &["orders", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform,
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;

    assert!(matches!(
        run.result,
        Err(RolloutError::Remote {
            stage: RolloutStage::Publish,
            ..
        })
    ));
    assert_eq!(log.calls_for("shop-orders").len(), 1);
    assert!(log.deployments().is_empty());
}

/// Only "conflict" is tolerated on grants; anything else is fatal
#[tokio::test]
async fn test_permission_error_aborts() {
    let log = CallLog::default();
    let policy_full = RemoteError::with_code(
        "AddPermission",
        "PolicyLengthExceededException",
        "policy too large",
    );
    let platform = MockPlatform::new(&log).failing("AddPermission", "shop-users", policy_full);
    let request = request("staging", &["orders", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform,
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;

    match run.result {
        Err(RolloutError::Remote { stage, source, .. }) => {
            assert_eq!(stage, RolloutStage::Authorize);
            assert_eq!(source.code.as_deref(), Some("PolicyLengthExceededException"));
        }
        other => panic!("expected authorize failure, got {:?}", other),
    }
    assert!(log.deployments().is_empty());

    // Nothing is rolled back: the alias created for orders stays
    assert_eq!(log.creates(), 2);
}

/// A malformed alias ARN is fatal and no permission is requested for it
#[tokio::test]
async fn test_malformed_alias_arn_aborts() {
    let log = CallLog::default();
    let platform = MockPlatform::new(&log).with_bad_arn("shop-orders");
    let request = request("staging", &["orders"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform,
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;

    match run.result {
        Err(RolloutError::Arn { function, source }) => {
            assert_eq!(function, "shop-orders");
            assert!(matches!(source, ArnError::Malformed(_)));
        }
        other => panic!("expected ARN failure, got {:?}", other),
    }
    assert_eq!(log.grants(), 0);
    assert!(log.deployments().is_empty());
}

/// With concurrent functions, one failure still means no deployment
#[tokio::test]
async fn test_concurrent_failure_skips_deployment() {
    let log = CallLog::default();
    let denied = RemoteError::with_code("UpdateAlias", "AccessDeniedException", "denied");
    let platform = MockPlatform::new(&log)
        .with_alias("shop-users", "staging", 1)
        .failing("UpdateAlias", "shop-users", denied);
    let request = request("staging", &["orders", "payments", "users", "cart"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform,
        MockGateway::new(&log),
        4,
        &request,
    )
    .await;

    assert!(matches!(
        run.result,
        Err(RolloutError::Remote {
            stage: RolloutStage::Alias,
            ..
        })
    ));
    assert!(log.deployments().is_empty());
    assert!(!run
        .events
        .iter()
        .any(|e| matches!(e, RolloutEvent::AllFunctionsDeployed { .. })));
}

/// A gateway failure is reported after every function went through
#[tokio::test]
async fn test_deployment_failure_is_reported() {
    let log = CallLog::default();
    let missing_api = RemoteError::with_code("CreateDeployment", "NotFoundException", "Invalid API identifier");
    let request = request("staging", &["orders", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        MockPlatform::new(&log),
        MockGateway::new(&log).failing(missing_api.clone()),
        1,
        &request,
    )
    .await;

    match run.result {
        Err(err @ RolloutError::Deployment(_)) => {
            assert_eq!(err.stage(), RolloutStage::Deploy);
            assert_eq!(err.remote(), Some(&missing_api));
        }
        other => panic!("expected deployment failure, got {:?}", other),
    }
    assert_eq!(log.grants(), 2);
    assert_eq!(log.deployments().len(), 1);
}
