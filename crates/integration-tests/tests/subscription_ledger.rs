//! Integration tests for the subscription ledger.
//!
//! These tests require a running `PostgreSQL` database with migrations
//! applied (task: `cargo run -p shopnear-cli -- migrate`).
//!
//! The invariant under test: after any committed mutation, the cached
//! `shops.subscriber_count` equals the real row count of the ledger.

use shopnear_api::db::SubscriptionLedger;
use shopnear_api::db::subscriptions::LedgerError;
use shopnear_core::{ShopId, UserId};
use shopnear_integration_tests::{
    cached_subscriber_count, ledger_row_count, seed_shop, seed_user, test_pool, unique_email,
};

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_subscribe_updates_counter_from_ledger() {
    let pool = test_pool().await;
    let shop_id = seed_shop(&pool, &unique_email("ledger-shop"), 13.0827, 80.2707).await;
    let user_id = seed_user(&pool, &unique_email("ledger-user")).await;

    let ledger = SubscriptionLedger::new(&pool);
    let count = ledger
        .subscribe(ShopId::new(shop_id), UserId::new(user_id))
        .await
        .expect("subscribe should succeed");

    assert_eq!(count, 1);
    assert_eq!(ledger_row_count(&pool, shop_id).await, 1);
    assert_eq!(cached_subscriber_count(&pool, shop_id).await, 1);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_double_subscribe_fails_and_count_unchanged() {
    let pool = test_pool().await;
    let shop_id = seed_shop(&pool, &unique_email("double-shop"), 13.0827, 80.2707).await;
    let user_id = seed_user(&pool, &unique_email("double-user")).await;

    let ledger = SubscriptionLedger::new(&pool);
    let first = ledger
        .subscribe(ShopId::new(shop_id), UserId::new(user_id))
        .await
        .expect("first subscribe should succeed");
    assert_eq!(first, 1);

    let second = ledger
        .subscribe(ShopId::new(shop_id), UserId::new(user_id))
        .await;
    assert!(matches!(second, Err(LedgerError::AlreadySubscribed)));

    // The failed transaction must leave both the ledger and the cache alone.
    assert_eq!(ledger_row_count(&pool, shop_id).await, 1);
    assert_eq!(cached_subscriber_count(&pool, shop_id).await, 1);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_unsubscribe_nonexistent_fails_and_count_unchanged() {
    let pool = test_pool().await;
    let shop_id = seed_shop(&pool, &unique_email("unsub-shop"), 13.0827, 80.2707).await;
    let user_id = seed_user(&pool, &unique_email("unsub-user")).await;

    let ledger = SubscriptionLedger::new(&pool);
    let result = ledger
        .unsubscribe(ShopId::new(shop_id), UserId::new(user_id))
        .await;

    assert!(matches!(result, Err(LedgerError::NotSubscribed)));
    assert_eq!(ledger_row_count(&pool, shop_id).await, 0);
    assert_eq!(cached_subscriber_count(&pool, shop_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_subscribe_then_unsubscribe_roundtrip() {
    let pool = test_pool().await;
    let shop_id = seed_shop(&pool, &unique_email("rt-shop"), 13.0827, 80.2707).await;
    let user_id = seed_user(&pool, &unique_email("rt-user")).await;

    let ledger = SubscriptionLedger::new(&pool);
    let after_subscribe = ledger
        .subscribe(ShopId::new(shop_id), UserId::new(user_id))
        .await
        .expect("subscribe should succeed");
    assert_eq!(after_subscribe, 1);
    assert!(
        ledger
            .is_subscribed(ShopId::new(shop_id), UserId::new(user_id))
            .await
            .expect("is_subscribed should succeed")
    );

    let after_unsubscribe = ledger
        .unsubscribe(ShopId::new(shop_id), UserId::new(user_id))
        .await
        .expect("unsubscribe should succeed");
    assert_eq!(after_unsubscribe, 0);
    assert_eq!(ledger_row_count(&pool, shop_id).await, 0);
    assert_eq!(cached_subscriber_count(&pool, shop_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_subscribe_to_missing_shop() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, &unique_email("noshop-user")).await;

    let ledger = SubscriptionLedger::new(&pool);
    let result = ledger
        .subscribe(ShopId::new(i32::MAX), UserId::new(user_id))
        .await;

    assert!(matches!(result, Err(LedgerError::ShopNotFound)));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_account_deletion_recounts_affected_shops() {
    let pool = test_pool().await;
    let shop_a = seed_shop(&pool, &unique_email("del-shop-a"), 13.0827, 80.2707).await;
    let shop_b = seed_shop(&pool, &unique_email("del-shop-b"), 13.0827, 80.2707).await;
    let doomed = seed_user(&pool, &unique_email("del-user")).await;
    let survivor = seed_user(&pool, &unique_email("del-survivor")).await;

    let ledger = SubscriptionLedger::new(&pool);
    for (shop, user) in [(shop_a, doomed), (shop_b, doomed), (shop_b, survivor)] {
        ledger
            .subscribe(ShopId::new(shop), UserId::new(user))
            .await
            .expect("subscribe should succeed");
    }
    assert_eq!(cached_subscriber_count(&pool, shop_a).await, 1);
    assert_eq!(cached_subscriber_count(&pool, shop_b).await, 2);

    shopnear_api::db::UserRepository::new(&pool)
        .delete(UserId::new(doomed))
        .await
        .expect("delete should succeed");

    // The cascade removed the doomed user's edges and the cached counters
    // followed in the same transaction.
    assert_eq!(ledger_row_count(&pool, shop_a).await, 0);
    assert_eq!(cached_subscriber_count(&pool, shop_a).await, 0);
    assert_eq!(ledger_row_count(&pool, shop_b).await, 1);
    assert_eq!(cached_subscriber_count(&pool, shop_b).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_fifty_concurrent_subscribes_yield_exact_count() {
    let pool = test_pool().await;
    let shop_id = seed_shop(&pool, &unique_email("race-shop"), 13.0827, 80.2707).await;

    let mut user_ids = Vec::with_capacity(50);
    for _ in 0..50 {
        user_ids.push(seed_user(&pool, &unique_email("race-user")).await);
    }

    let mut handles = Vec::with_capacity(50);
    for user_id in user_ids {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            SubscriptionLedger::new(&pool)
                .subscribe(ShopId::new(shop_id), UserId::new(user_id))
                .await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("task should not panic")
            .expect("each distinct-user subscribe should succeed");
    }

    // Exactly 50 rows, no duplicate pairs, and the cache agrees.
    assert_eq!(ledger_row_count(&pool, shop_id).await, 50);
    assert_eq!(cached_subscriber_count(&pool, shop_id).await, 50);

    let distinct_pairs = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT (shop_id, user_id)) FROM shop_subscriptions WHERE shop_id = $1",
    )
    .bind(shop_id)
    .fetch_one(&pool)
    .await
    .expect("Failed to count distinct pairs");
    assert_eq!(distinct_pairs, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_concurrent_double_subscribe_leaves_one_row() {
    let pool = test_pool().await;
    let shop_id = seed_shop(&pool, &unique_email("pair-race-shop"), 13.0827, 80.2707).await;
    let user_id = seed_user(&pool, &unique_email("pair-race-user")).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            SubscriptionLedger::new(&pool)
                .subscribe(ShopId::new(shop_id), UserId::new(user_id))
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(_) => successes += 1,
            Err(LedgerError::AlreadySubscribed) => {}
            Err(other) => panic!("unexpected ledger error: {other}"),
        }
    }

    assert_eq!(successes, 1, "exactly one racer may win");
    assert_eq!(ledger_row_count(&pool, shop_id).await, 1);
    assert_eq!(cached_subscriber_count(&pool, shop_id).await, 1);
}
