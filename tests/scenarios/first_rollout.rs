//! Test: First rollout - no aliases exist yet

use crate::helpers::*;
use rollout::execution::{AliasAction, RolloutEvent};
use std::time::Duration;

/// Three functions, nothing deployed before: every alias is created
#[tokio::test]
async fn test_first_rollout_creates_every_alias() {
    let log = CallLog::default();
    let platform = MockPlatform::new(&log);
    let request = request("staging", &["orders", "payments", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform.clone(),
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;
    let result = run.result.expect("rollout should succeed");

    assert_eq!(log.packages(), 3);
    assert_eq!(log.publishes(), 3);
    assert_eq!(log.creates(), 3);
    assert_eq!(log.updates(), 0);
    assert_eq!(log.grants(), 3);
    assert_eq!(log.deployments(), vec![staging_deployment()]);
    assert_deployment_last(&log);

    // Every alias targets the version that was just published
    for name in ["shop-orders", "shop-payments", "shop-users"] {
        assert_eq!(platform.alias_target(name, "staging").as_deref(), Some("1"));
        assert!(platform.has_permission(name, "staging"));
    }

    assert_eq!(result.stage, "staging");
    assert_eq!(result.deployment_id, "dep-0001");
    let names: Vec<_> = result.functions.iter().map(|f| f.function_name.as_str()).collect();
    assert_eq!(names, vec!["shop-orders", "shop-payments", "shop-users"]);
    assert!(result.functions.iter().all(|f| f.alias_created));
    assert!(result.functions.iter().all(|f| !f.permission_existed));
    assert!(result.functions.iter().all(|f| f.version == "1"));
}

/// Each function goes publish → get alias → create alias → grant, in order
#[tokio::test]
async fn test_per_function_call_order() {
    let log = CallLog::default();
    let request = request("staging", &["orders"]);

    let run = run_rollout(
        MockProducer::new(&log),
        MockPlatform::new(&log),
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;
    run.result.unwrap();

    assert_eq!(
        log.calls_for("shop-orders"),
        vec![
            Call::PublishVersion {
                function: "shop-orders".to_string()
            },
            Call::GetAlias {
                function: "shop-orders".to_string(),
                alias: "staging".to_string()
            },
            Call::CreateAlias {
                function: "shop-orders".to_string(),
                alias: "staging".to_string(),
                version: "1".to_string()
            },
            Call::AddPermission {
                function: "shop-orders".to_string(),
                qualifier: "staging".to_string(),
                source_arn: format!("arn:aws:execute-api:{}:{}:{}/*", REGION, ACCOUNT, API_ID),
            },
        ]
    );
}

/// Functions rolled out concurrently still share one deployment at the end
#[tokio::test]
async fn test_concurrent_rollout_joins_before_deploying() {
    let log = CallLog::default();
    let request = request("staging", &["orders", "payments", "users", "search", "cart"]);

    let run = run_rollout(
        MockProducer::new(&log).with_delay(Duration::from_millis(5)),
        MockPlatform::new(&log).with_delay(Duration::from_millis(5)),
        MockGateway::new(&log),
        3,
        &request,
    )
    .await;
    let result = run.result.expect("rollout should succeed");

    assert_eq!(log.creates(), 5);
    assert_eq!(log.grants(), 5);
    assert_eq!(log.deployments().len(), 1);
    assert_deployment_last(&log);

    // Results keep directory order regardless of completion order
    let names: Vec<_> = result.functions.iter().map(|f| f.function_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["shop-orders", "shop-payments", "shop-users", "shop-search", "shop-cart"]
    );
}

/// Packaging finishes for every function before any remote call
#[tokio::test]
async fn test_packaging_precedes_remote_calls() {
    let log = CallLog::default();
    let request = request("staging", &["orders", "payments", "users"]);

    run_rollout(
        MockProducer::new(&log),
        MockPlatform::new(&log),
        MockGateway::new(&log),
        2,
        &request,
    )
    .await
    .result
    .unwrap();

    let calls = log.calls();
    let last_package = calls
        .iter()
        .rposition(|c| matches!(c, Call::Package { .. }))
        .unwrap();
    let first_remote = calls
        .iter()
        .position(|c| !matches!(c, Call::Package { .. }))
        .unwrap();
    assert!(last_package < first_remote, "calls: {:?}", calls);
}

/// Events describe the run from start to the deployment
#[tokio::test]
async fn test_events_trace_the_rollout() {
    let log = CallLog::default();
    let request = request("staging", &["orders", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        MockPlatform::new(&log),
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;
    let result = run.result.unwrap();

    assert!(matches!(
        run.events.first(),
        Some(RolloutEvent::RolloutStarted { function_count: 2, .. })
    ));
    match run.events.last() {
        Some(RolloutEvent::DeploymentCreated {
            run_id,
            deployment_id,
            stage,
        }) => {
            assert_eq!(*run_id, result.run_id);
            assert_eq!(deployment_id, "dep-0001");
            assert_eq!(stage, "staging");
        }
        other => panic!("expected deployment event last, got {:?}", other),
    }

    let created = run
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                RolloutEvent::AliasReconciled {
                    action: AliasAction::Created,
                    ..
                }
            )
        })
        .count();
    assert_eq!(created, 2);

    let all_deployed = run
        .events
        .iter()
        .position(|e| matches!(e, RolloutEvent::AllFunctionsDeployed { .. }))
        .unwrap();
    let last_authorized = run
        .events
        .iter()
        .rposition(|e| matches!(e, RolloutEvent::InvocationAuthorized { .. }))
        .unwrap();
    assert!(last_authorized < all_deployed);
    assert!(!run
        .events
        .iter()
        .any(|e| matches!(e, RolloutEvent::FunctionFailed { .. })));
}
