use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, RgbImage};

use super::*;
use crate::catalog::{Building, MockCatalogClient};
use crate::config::MatchConfig;
use crate::encoder::{EncoderConfig, FacadeEncoder};
use crate::refstore::MockReferenceStore;
use crate::scoring::{NoMatchReason, ScanOutcome};
use crate::vectors::{dot, l2_normalize};

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, image::Rgb([90, 120, 200]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn building(id: i64, lat: f64, lng: f64, is_landmark: bool) -> Building {
    Building {
        id,
        tax_lot_id: format!("TL-{id}"),
        name: format!("Building {id}"),
        address: String::new(),
        lat,
        lng,
        tier: 1,
        is_landmark,
        walk_score: None,
    }
}

fn stub_encoder() -> Arc<FacadeEncoder> {
    Arc::new(FacadeEncoder::load(EncoderConfig::stub()).unwrap())
}

fn query_vector(encoder: &FacadeEncoder, photo: &[u8]) -> Vec<f32> {
    encoder.encode(photo).unwrap()
}

/// Builds a unit vector whose dot product with unit `query` is `similarity`.
fn vector_with_similarity(query: &[f32], similarity: f32) -> Vec<f32> {
    // Gram-Schmidt against an axis not parallel to the query.
    let axis = {
        let mut flipped: Vec<f32> = query.iter().rev().map(|x| x + 0.5).collect();
        l2_normalize(&mut flipped);
        flipped
    };
    let projection = dot(&axis, query);
    let mut orthogonal: Vec<f32> = axis
        .iter()
        .zip(query.iter())
        .map(|(a, q)| a - projection * q)
        .collect();
    l2_normalize(&mut orthogonal);

    let residual = (1.0 - similarity * similarity).sqrt();
    let mut v: Vec<f32> = query
        .iter()
        .zip(orthogonal.iter())
        .map(|(q, o)| similarity * q + residual * o)
        .collect();
    l2_normalize(&mut v);
    v
}

// Query point used throughout; buildings placed ~30m north of it.
const LAT: f64 = 40.7411;
const LNG: f64 = -73.9897;
const LAT_30M_NORTH: f64 = 40.74137;

fn request(photo: Vec<u8>) -> ScanRequest {
    ScanRequest {
        photo,
        lat: LAT,
        lng: LNG,
        gps_accuracy_m: 5.0,
        heading_deg: 0.0,
        pitch_deg: 10.0,
    }
}

#[tokio::test]
async fn perfect_reference_is_a_confident_match() {
    // One candidate 30m away with a reference identical to the query vector.
    let encoder = stub_encoder();
    let photo = png_bytes();
    let query = query_vector(&encoder, &photo);

    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query);

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo)).await.unwrap();

    match report.outcome {
        ScanOutcome::Matched {
            building,
            confidence,
            alternates,
        } => {
            assert_eq!(building.id, 1);
            // 30m is outside the 25m proximity threshold, so no boost applies.
            assert!((confidence - 1.0).abs() < 1e-4);
            assert!(alternates.is_empty());
        }
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn empty_neighborhood_is_no_buildings_nearby() {
    let pipeline = ScanPipeline::new(
        stub_encoder(),
        MockCatalogClient::new(vec![]),
        MockReferenceStore::new(),
        MatchConfig::default(),
    );

    let report = pipeline.run(request(png_bytes())).await.unwrap();

    match report.outcome {
        ScanOutcome::NoMatch { reason } => {
            assert_eq!(reason, NoMatchReason::NoBuildingsNearby);
        }
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn weak_similarity_is_below_confidence() {
    let encoder = stub_encoder();
    let photo = png_bytes();
    let query = query_vector(&encoder, &photo);

    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, vector_with_similarity(&query, 0.50));

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo)).await.unwrap();

    match report.outcome {
        ScanOutcome::NoMatch { reason } => {
            assert_eq!(reason, NoMatchReason::BelowConfidence);
        }
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn landmark_boost_decides_between_close_candidates() {
    let encoder = stub_encoder();
    let photo = png_bytes();
    let query = query_vector(&encoder, &photo);

    let catalog = MockCatalogClient::new(vec![
        building(1, LAT_30M_NORTH, LNG, false),
        building(2, LAT_30M_NORTH, LNG + 0.0001, true),
    ]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, vector_with_similarity(&query, 0.80));
    refs.insert_vector(2, vector_with_similarity(&query, 0.79));

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo)).await.unwrap();

    match report.outcome {
        ScanOutcome::Matched {
            building,
            confidence,
            ..
        } => {
            assert_eq!(building.id, 2);
            assert!((confidence - 0.8295).abs() < 1e-3);
        }
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn candidates_without_imagery_are_no_matches_found() {
    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)]);

    let pipeline = ScanPipeline::new(
        stub_encoder(),
        catalog,
        MockReferenceStore::new(),
        MatchConfig::default(),
    );

    let report = pipeline.run(request(png_bytes())).await.unwrap();

    match report.outcome {
        ScanOutcome::NoMatch { reason } => {
            assert_eq!(reason, NoMatchReason::NoMatchesFound);
        }
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn invalid_photo_short_circuits_before_the_catalog() {
    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)]);

    let pipeline = ScanPipeline::new(
        stub_encoder(),
        catalog,
        MockReferenceStore::new(),
        MatchConfig::default(),
    );

    let report = pipeline.run(request(b"not an image".to_vec())).await.unwrap();

    match report.outcome {
        ScanOutcome::NoMatch { reason } => assert_eq!(reason, NoMatchReason::InvalidPhoto),
        other => panic!("unexpected outcome: {other}"),
    }

    assert_eq!(pipeline.catalog().query_count(), 0);
}

#[tokio::test]
async fn elapsed_budget_is_a_timeout_no_match() {
    let encoder = stub_encoder();
    let photo = png_bytes();
    let query = query_vector(&encoder, &photo);

    // A match exists, but the catalog answers far too slowly for the budget.
    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)])
        .with_delay(Duration::from_millis(500));
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query);

    let mut config = MatchConfig::default();
    config.scan_timeout_ms = 10;

    let pipeline = ScanPipeline::new(encoder, catalog, refs, config);
    let report = pipeline.run(request(photo)).await.unwrap();

    match report.outcome {
        ScanOutcome::NoMatch { reason } => assert_eq!(reason, NoMatchReason::Timeout),
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn catalog_outage_is_a_hard_failure() {
    let pipeline = ScanPipeline::new(
        stub_encoder(),
        MockCatalogClient::failing(),
        MockReferenceStore::new(),
        MatchConfig::default(),
    );

    let err = pipeline.run(request(png_bytes())).await.unwrap_err();
    assert!(matches!(err, ScanError::Catalog(_)));
}

#[tokio::test]
async fn ref_store_outage_is_a_hard_failure() {
    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)]);

    let pipeline = ScanPipeline::new(
        stub_encoder(),
        catalog,
        MockReferenceStore::failing(),
        MatchConfig::default(),
    );

    let err = pipeline.run(request(png_bytes())).await.unwrap_err();
    assert!(matches!(err, ScanError::RefStore(_)));
}

#[tokio::test]
async fn reference_cache_serves_repeat_scans() {
    let encoder = stub_encoder();
    let photo = png_bytes();
    let query = query_vector(&encoder, &photo);

    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG, false)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query);

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());

    let first = pipeline.run(request(photo.clone())).await.unwrap();
    let second = pipeline.run(request(photo)).await.unwrap();

    assert!(first.outcome.is_matched());
    assert!(second.outcome.is_matched());
    assert_eq!(pipeline.catalog().query_count(), 2);
}
