//! Geometric fallback picking.
//!
//! Point-in-polygon against the loaded country outlines. Slower than the id
//! pass but has no rendering dependency, so it always works. Polygon
//! bounding boxes are precomputed once per dataset and pruned before the
//! crossing test runs.

use formats::country::CountrySet;
use foundation::bounds::LonLatBounds;
use foundation::math::normalize_lng_deg;

/// Precomputed per-polygon bounds for one dataset.
///
/// Ordering contract: candidates are tested in load order, so when outlines
/// overlap the earliest feature wins, every time.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuPicker {
    // (feature index, polygon index, bounds) in load order.
    entries: Vec<(usize, usize, LonLatBounds)>,
    dataset_version: String,
}

impl CpuPicker {
    pub fn new(countries: &CountrySet) -> Self {
        let mut entries = Vec::new();
        for (fi, feature) in countries.features().iter().enumerate() {
            for (pi, polygon) in feature.polygons.iter().enumerate() {
                if let Some(exterior) = polygon.rings.first() {
                    entries.push((fi, pi, LonLatBounds::from_rings([exterior.iter()])));
                }
            }
        }
        Self {
            entries,
            dataset_version: countries.dataset_version().to_string(),
        }
    }

    pub fn dataset_version(&self) -> &str {
        &self.dataset_version
    }

    /// Country id at a surface coordinate, or `None` over the ocean.
    pub fn pick(&self, countries: &CountrySet, lat_deg: f64, lng_deg: f64) -> Option<u16> {
        let lng = normalize_lng_deg(lng_deg);
        for &(fi, pi, ref bounds) in &self.entries {
            if !bounds.contains(lng, lat_deg) {
                continue;
            }
            let feature = &countries.features()[fi];
            let polygon = &feature.polygons[pi];
            if point_in_polygon(&polygon.rings, lng, lat_deg) {
                return Some(feature.id);
            }
        }
        None
    }
}

/// Even-odd crossing test over all rings. A point inside the exterior but
/// also inside a hole crosses an even number of edges and reads outside.
fn point_in_polygon(rings: &[Vec<(f64, f64)>], lng: f64, lat: f64) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = ring[i];
            let (xj, yj) = ring[j];
            if ((yi > lat) != (yj > lat))
                && lng < (xj - xi) * (lat - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}
