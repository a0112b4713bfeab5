//! End-to-end scan tests against the public API, using the `mock` feature
//! for the catalog and reference store.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbImage};

use sightline::{
    Building, EncoderConfig, FacadeEncoder, MatchConfig, MockCatalogClient, MockReferenceStore,
    NoMatchReason, ScanOutcome, ScanPipeline, ScanRequest,
};

const LAT: f64 = 40.7411;
const LNG: f64 = -73.9897;
const LAT_30M_NORTH: f64 = 40.74137;

fn png_bytes(seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(16, 16, |x, y| {
        image::Rgb([seed, (x * 16) as u8, (y * 16) as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn building(id: i64, lat: f64, lng: f64) -> Building {
    Building {
        id,
        tax_lot_id: format!("TL-{id}"),
        name: format!("Building {id}"),
        address: format!("{id} Example St"),
        lat,
        lng,
        tier: 1,
        is_landmark: false,
        walk_score: Some(87.0),
    }
}

fn request(photo: Vec<u8>, heading_deg: f32) -> ScanRequest {
    ScanRequest {
        photo,
        lat: LAT,
        lng: LNG,
        gps_accuracy_m: 8.0,
        heading_deg,
        pitch_deg: 15.0,
    }
}

#[tokio::test]
async fn full_pipeline_matches_and_reports_latency() {
    let encoder = Arc::new(FacadeEncoder::load(EncoderConfig::stub()).unwrap());
    let photo = png_bytes(1);
    let query = encoder.encode(&photo).unwrap();

    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query);

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo, 0.0)).await.unwrap();

    assert!(report.outcome.is_matched());
    assert!(report.outcome.confidence().unwrap() > 0.99);
    // Latency is attached to every outcome.
    assert!(report.latency.as_nanos() > 0);
}

#[tokio::test]
async fn view_cone_excludes_a_building_behind_the_user() {
    let encoder = Arc::new(FacadeEncoder::load(EncoderConfig::stub()).unwrap());
    let photo = png_bytes(2);
    let query = encoder.encode(&photo).unwrap();

    // The only candidate sits due north; the device faces due south.
    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query);

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo, 180.0)).await.unwrap();

    match report.outcome {
        ScanOutcome::NoMatch { reason } => assert_eq!(reason, NoMatchReason::NoBuildingsNearby),
        other => panic!("unexpected outcome: {other}"),
    }
}

#[tokio::test]
async fn best_of_k_picks_the_closest_reference_angle() {
    let encoder = Arc::new(FacadeEncoder::load(EncoderConfig::stub()).unwrap());
    let photo = png_bytes(3);
    let query = encoder.encode(&photo).unwrap();

    // Same building captured from two angles; only one matches the photo.
    let other_shot = encoder.encode(&png_bytes(4)).unwrap();
    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, other_shot);
    refs.insert_vector(1, query);

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo, 0.0)).await.unwrap();

    assert!(report.outcome.is_matched());
    assert!(report.outcome.confidence().unwrap() > 0.99);
}

#[tokio::test]
async fn concurrent_scans_share_one_pipeline() {
    let encoder = Arc::new(FacadeEncoder::load(EncoderConfig::stub()).unwrap());
    let photo = png_bytes(5);
    let query = encoder.encode(&photo).unwrap();

    let catalog = MockCatalogClient::new(vec![building(1, LAT_30M_NORTH, LNG)]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query);

    let pipeline = Arc::new(ScanPipeline::new(
        encoder,
        catalog,
        refs,
        MatchConfig::default(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let photo = photo.clone();
            tokio::spawn(async move { pipeline.run(request(photo, 0.0)).await })
        })
        .collect();

    for handle in handles {
        let report = handle.await.unwrap().unwrap();
        assert!(report.outcome.is_matched());
    }
}

#[tokio::test]
async fn alternates_carry_scores_and_distances() {
    let encoder = Arc::new(FacadeEncoder::load(EncoderConfig::stub()).unwrap());
    let photo = png_bytes(6);
    let query = encoder.encode(&photo).unwrap();

    let catalog = MockCatalogClient::new(vec![
        building(1, LAT_30M_NORTH, LNG),
        building(2, 40.74155, LNG),
    ]);
    let mut refs = MockReferenceStore::new();
    refs.insert_vector(1, query.clone());
    // A noticeably weaker second candidate, still above threshold.
    let mut weaker = query;
    for x in weaker.iter_mut().take(64) {
        *x = -*x;
    }
    sightline::l2_normalize(&mut weaker);
    refs.insert_vector(2, weaker);

    let pipeline = ScanPipeline::new(encoder, catalog, refs, MatchConfig::default());
    let report = pipeline.run(request(photo, 0.0)).await.unwrap();

    match report.outcome {
        ScanOutcome::Matched {
            building,
            alternates,
            ..
        } => {
            assert_eq!(building.id, 1);
            assert_eq!(alternates.len(), 1);
            assert_eq!(alternates[0].building.id, 2);
            assert!(alternates[0].score < 1.0);
            assert!(alternates[0].distance_m > 0.0);
        }
        other => panic!("unexpected outcome: {other}"),
    }
}
