//! Geographic <-> unit-sphere conversions.
//!
//! Every component that touches globe geometry goes through these two
//! functions, so the polar-axis convention here is load-bearing: +y is the
//! north pole, and the prime meridian faces +x. Changing either breaks the
//! inverse round-trip and every consumer downstream.

use super::Vec3;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat_deg: f64,
    pub lng_deg: f64,
}

impl LatLng {
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }
}

/// Wrap a longitude into `[-180, 180)`.
pub fn normalize_lng_deg(lng_deg: f64) -> f64 {
    let mut lng = (lng_deg + 180.0) % 360.0;
    if lng < 0.0 {
        lng += 360.0;
    }
    lng - 180.0
}

/// Convert latitude/longitude (degrees) to a position on a sphere of the
/// given radius.
pub fn lat_lng_to_sphere(lat_deg: f64, lng_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lng_deg + 180.0).to_radians();

    let x = -radius * phi.sin() * theta.cos();
    let y = radius * phi.cos();
    let z = radius * phi.sin() * theta.sin();

    Vec3::new(x, y, z)
}

/// Inverse of [`lat_lng_to_sphere`].
///
/// The input is normalized first, so positions off the sphere surface are
/// handled without error. Returns `None` only for a zero-length input.
pub fn sphere_to_lat_lng(position: Vec3) -> Option<LatLng> {
    let n = position.normalized()?;

    let lat = 90.0 - n.y.clamp(-1.0, 1.0).acos().to_degrees();
    let lng = normalize_lng_deg(n.z.atan2(-n.x).to_degrees() - 180.0);

    Some(LatLng::new(lat, lng))
}
