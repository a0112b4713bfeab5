//! Geodesic math and geospatial candidate selection.
//!
//! Distances use the haversine formula on a spherical Earth; at scan
//! radii (tens to hundreds of meters) the error versus an ellipsoid is
//! far below GPS accuracy.

pub mod selector;


pub use selector::{CandidateSelector, NearbyBuilding};

/// Mean Earth radius, meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two WGS84 points, meters.
pub fn haversine_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Initial great-circle bearing from point 1 toward point 2, degrees in `[0, 360)`.
pub fn initial_bearing_deg(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Smallest absolute difference between two compass bearings, degrees in `[0, 180]`.
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Whether `bearing` lies inside the cone of `cone_deg` total width centered
/// on `heading`. Inclusive at the edges; a cone of 360° or wider always matches.
pub fn within_view_cone(bearing: f64, heading: f64, cone_deg: f64) -> bool {
    if cone_deg >= 360.0 {
        return true;
    }

    angular_difference_deg(bearing, heading) <= cone_deg / 2.0
}
