use std::collections::HashMap;

use qdrant_client::qdrant::vectors_output::VectorsOptions;
use qdrant_client::qdrant::{RetrievedPoint, Value, VectorOutput, VectorsOutput};

use super::mock::MockReferenceStore;
use super::*;
use crate::vectors::l2_norm;

fn retrieved_point(vector: Option<Vec<f32>>, payload: Vec<(&str, Value)>) -> RetrievedPoint {
    let payload: HashMap<String, Value> = payload
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    RetrievedPoint {
        payload,
        vectors: vector.map(|data| VectorsOutput {
            vectors_options: Some(VectorsOptions::Vector(VectorOutput {
                data,
                ..Default::default()
            })),
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn mock_returns_empty_for_unknown_building() {
    let store = MockReferenceStore::new();
    let refs = store.embeddings_for(99).await.unwrap();
    assert!(refs.is_empty());
}

#[tokio::test]
async fn mock_groups_references_by_building() {
    let mut store = MockReferenceStore::new();
    store.insert_vector(1, vec![1.0, 0.0]);
    store.insert_vector(1, vec![0.0, 1.0]);
    store.insert_vector(2, vec![1.0, 0.0]);

    assert_eq!(store.embeddings_for(1).await.unwrap().len(), 2);
    assert_eq!(store.embeddings_for(2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn failing_mock_surfaces_lookup_error() {
    let store = MockReferenceStore::failing();
    let err = store.embeddings_for(1).await.unwrap_err();
    assert!(matches!(err, RefStoreError::LookupFailed { building_id: 1, .. }));
}

#[test]
fn off_unit_vector_is_renormalized_at_the_boundary() {
    let point = retrieved_point(
        Some(vec![3.0, 4.0]),
        vec![
            ("building_id", Value::from(7i64)),
            ("angle_deg", Value::from(90i64)),
            ("pitch_deg", Value::from(-5i64)),
            ("image_key", Value::from("refs/7/90.jpg")),
        ],
    );

    let reference = ReferenceEmbedding::from_retrieved_point(point).unwrap();
    assert_eq!(reference.building_id, 7);
    assert_eq!(reference.angle_deg, 90);
    assert_eq!(reference.pitch_deg, -5);
    assert_eq!(reference.image_key, "refs/7/90.jpg");
    assert!((l2_norm(&reference.vector) - 1.0).abs() < 1e-6);
    assert!((reference.vector[0] - 0.6).abs() < 1e-6);
    assert!((reference.vector[1] - 0.8).abs() < 1e-6);
}

#[test]
fn unit_vector_passes_through_unchanged() {
    let point = retrieved_point(
        Some(vec![0.6, 0.8]),
        vec![("building_id", Value::from(1i64))],
    );

    let reference = ReferenceEmbedding::from_retrieved_point(point).unwrap();
    assert_eq!(reference.vector, vec![0.6, 0.8]);
    // Optional capture metadata defaults when the payload omits it.
    assert_eq!(reference.angle_deg, 0);
    assert_eq!(reference.pitch_deg, 0);
    assert!(reference.image_key.is_empty());
}

#[test]
fn zero_vector_is_dropped() {
    let point = retrieved_point(
        Some(vec![0.0, 0.0, 0.0]),
        vec![("building_id", Value::from(1i64))],
    );
    assert!(ReferenceEmbedding::from_retrieved_point(point).is_none());
}

#[test]
fn missing_vector_is_dropped() {
    let point = retrieved_point(None, vec![("building_id", Value::from(1i64))]);
    assert!(ReferenceEmbedding::from_retrieved_point(point).is_none());
}

#[test]
fn missing_building_id_is_dropped() {
    let point = retrieved_point(Some(vec![0.6, 0.8]), vec![]);
    assert!(ReferenceEmbedding::from_retrieved_point(point).is_none());
}
