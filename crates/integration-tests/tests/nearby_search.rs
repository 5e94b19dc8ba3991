//! Integration tests for proximity search over seeded shops.
//!
//! These tests require a running `PostgreSQL` database with migrations
//! applied. Seeded shops share the unique `integration.test` email domain so
//! reruns don't collide; searches use a dedicated patch of ocean far from
//! other tests' seeds to keep results deterministic.

use shopnear_api::services::ShopService;
use shopnear_api::services::shops::NearbyParams;
use shopnear_integration_tests::{seed_shop, test_pool, unique_email};

// An otherwise-empty spot in the Bay of Bengal, well away from the Chennai
// coordinates used by the ledger tests.
const CENTER_LAT: f64 = 9.4321;
const CENTER_LON: f64 = 85.8765;

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_nearby_filters_orders_and_caps() {
    let pool = test_pool().await;

    // ~1.1 km, ~3.3 km, and ~2.2 km north of the center, plus one ~11 km out.
    let near = seed_shop(&pool, &unique_email("geo-a"), CENTER_LAT + 0.01, CENTER_LON).await;
    let far = seed_shop(&pool, &unique_email("geo-b"), CENTER_LAT + 0.03, CENTER_LON).await;
    let mid = seed_shop(&pool, &unique_email("geo-c"), CENTER_LAT + 0.02, CENTER_LON).await;
    let outside = seed_shop(&pool, &unique_email("geo-d"), CENTER_LAT + 0.1, CENTER_LON).await;

    let results = ShopService::new(&pool)
        .find_nearby(NearbyParams {
            latitude: CENTER_LAT,
            longitude: CENTER_LON,
            radius_meters: 5000.0,
            limit: 10,
        })
        .await
        .expect("search should succeed");

    let ids: Vec<i32> = results.iter().map(|s| s.id.as_i32()).collect();
    assert!(ids.contains(&near));
    assert!(ids.contains(&mid));
    assert!(ids.contains(&far));
    assert!(!ids.contains(&outside), "shop beyond the radius must be excluded");

    // Every result is inside the radius and ordering is ascending.
    for shop in &results {
        assert!(shop.distance_meters <= 5000.0);
    }
    for pair in results.windows(2) {
        assert!(pair[0].distance_meters <= pair[1].distance_meters);
    }
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_nearby_respects_limit() {
    let pool = test_pool().await;

    for i in 0..5 {
        seed_shop(
            &pool,
            &unique_email("limit"),
            CENTER_LAT + 0.001 * f64::from(i),
            CENTER_LON + 0.05,
        )
        .await;
    }

    let results = ShopService::new(&pool)
        .find_nearby(NearbyParams {
            latitude: CENTER_LAT,
            longitude: CENTER_LON + 0.05,
            radius_meters: 5000.0,
            limit: 3,
        })
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 3);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_nearby_empty_when_nothing_in_radius() {
    let pool = test_pool().await;

    // Search a different empty patch with a tight radius.
    let results = ShopService::new(&pool)
        .find_nearby(NearbyParams {
            latitude: -48.8765,
            longitude: -123.3933,
            radius_meters: 100.0,
            limit: 10,
        })
        .await
        .expect("search should succeed");

    assert!(results.is_empty());
}
