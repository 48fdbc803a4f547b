//! Test: Existing aliases and permissions from earlier rollouts

use crate::helpers::*;

/// One function already has a staging alias: it is moved, the others created
#[tokio::test]
async fn test_existing_alias_is_updated_others_created() {
    let log = CallLog::default();
    let platform = MockPlatform::new(&log).with_alias("shop-payments", "staging", 3);
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

    assert_eq!(log.creates(), 2);
    assert_eq!(log.updates(), 1);
    assert_eq!(log.grants(), 3);
    assert_eq!(log.deployments(), vec![staging_deployment()]);
    assert_deployment_last(&log);

    // The pre-existing alias now points at the newly published version
    assert_eq!(platform.alias_target("shop-payments", "staging").as_deref(), Some("4"));
    assert_eq!(
        log.count(|c| matches!(
            c,
            Call::UpdateAlias { function, version, .. } if function == "shop-payments" && version == "4"
        )),
        1
    );
    assert_eq!(
        log.count(|c| matches!(c, Call::CreateAlias { function, .. } if function == "shop-payments")),
        0
    );

    let payments = result
        .functions
        .iter()
        .find(|f| f.function_name == "shop-payments")
        .unwrap();
    assert!(!payments.alias_created);
    assert_eq!(payments.version, "4");
}

/// Aliases of other environments are left alone
#[tokio::test]
async fn test_alias_of_other_environment_is_ignored() {
    let log = CallLog::default();
    let platform = MockPlatform::new(&log).with_alias("shop-orders", "production", 7);
    let request = request("staging", &["orders"]);

    run_rollout(
        MockProducer::new(&log),
        platform.clone(),
        MockGateway::new(&log),
        1,
        &request,
    )
    .await
    .result
    .unwrap();

    assert_eq!(log.creates(), 1);
    assert_eq!(log.updates(), 0);
    assert_eq!(platform.alias_target("shop-orders", "staging").as_deref(), Some("8"));
    assert_eq!(platform.alias_target("shop-orders", "production").as_deref(), Some("7"));
}

/// A grant that already exists is not an error
#[tokio::test]
async fn test_existing_permission_is_tolerated() {
    let log = CallLog::default();
    let platform = MockPlatform::new(&log)
        .with_alias("shop-orders", "staging", 1)
        .with_permission("shop-orders", "staging");
    let request = request("staging", &["orders", "users"]);

    let run = run_rollout(
        MockProducer::new(&log),
        platform,
        MockGateway::new(&log),
        1,
        &request,
    )
    .await;
    let result = run.result.expect("rollout should succeed");

    assert_eq!(log.grants(), 2);
    assert_eq!(log.deployments().len(), 1);

    let orders = &result.functions[0];
    assert_eq!(orders.function_name, "shop-orders");
    assert!(orders.permission_existed);
    assert!(!result.functions[1].permission_existed);
}

/// Rolling out twice: the second run only updates and re-grants
#[tokio::test]
async fn test_repeated_rollout_is_idempotent() {
    let log = CallLog::default();
    let platform = MockPlatform::new(&log);
    let request = request("staging", &["orders", "payments", "users"]);

    for _ in 0..2 {
        run_rollout(
            MockProducer::new(&log),
            platform.clone(),
            MockGateway::new(&log),
            2,
            &request,
        )
        .await
        .result
        .expect("rollout should succeed");
    }

    assert_eq!(log.publishes(), 6);
    assert_eq!(log.creates(), 3);
    assert_eq!(log.updates(), 3);
    assert_eq!(log.grants(), 6);
    assert_eq!(log.deployments().len(), 2);

    for name in ["shop-orders", "shop-payments", "shop-users"] {
        assert_eq!(platform.alias_target(name, "staging").as_deref(), Some("2"));
    }
}
