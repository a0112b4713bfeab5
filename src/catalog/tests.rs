use super::mock::MockCatalogClient;
use super::model::Building;
use crate::catalog::CatalogClient;

fn building(id: i64, lat: f64, lng: f64, tier: i32) -> Building {
    Building {
        id,
        tax_lot_id: format!("TL-{id}"),
        name: format!("Building {id}"),
        address: format!("{id} Example St"),
        lat,
        lng,
        tier,
        is_landmark: false,
        walk_score: None,
    }
}

#[test]
fn building_deserializes_with_optional_fields_absent() {
    let json = r#"{
        "id": 7,
        "tax_lot_id": "TL-7",
        "name": "Flatiron",
        "address": "175 5th Ave",
        "lat": 40.7411,
        "lng": -73.9897,
        "tier": 2
    }"#;

    let b: Building = serde_json::from_str(json).unwrap();
    assert_eq!(b.id, 7);
    assert!(!b.is_landmark);
    assert!(b.walk_score.is_none());
}

#[tokio::test]
async fn mock_filters_by_tier_and_radius() {
    let catalog = MockCatalogClient::new(vec![
        building(1, 40.7411, -73.9897, 2),
        building(2, 40.7411, -73.9897, 0),
        // ~1.1km north of the query point
        building(3, 40.7511, -73.9897, 2),
    ]);

    let results = catalog
        .find_within_radius(40.7411, -73.9897, 200.0, 1)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 1);
    assert_eq!(catalog.query_count(), 1);
}

#[tokio::test]
async fn failing_mock_surfaces_unreachable() {
    let catalog = MockCatalogClient::failing();
    let err = catalog
        .find_within_radius(0.0, 0.0, 100.0, 1)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("catalog"));
}
