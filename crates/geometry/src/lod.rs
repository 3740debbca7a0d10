/// Named level-of-detail presets, ordered from densest to coarsest.
///
/// `Near` is selected when the camera is close enough that flat facets on
/// long triangles become visible against the sphere's curvature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LodLevel {
    Near,
    Medium,
    Far,
    /// The single-landmass preset: coarser still, holes dropped upstream.
    LandMass,
}

/// Subdivision policy: split triangles whose longest chord exceeds
/// `max_edge_length` (in sphere-radius units for a unit sphere), at most
/// `max_depth` passes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LodConfig {
    pub max_edge_length: f64,
    pub max_depth: u32,
}

impl LodConfig {
    pub fn for_level(level: LodLevel) -> Self {
        match level {
            LodLevel::Near => Self {
                max_edge_length: 0.08,
                max_depth: 5,
            },
            LodLevel::Medium => Self {
                max_edge_length: 0.15,
                max_depth: 4,
            },
            LodLevel::Far => Self {
                max_edge_length: 0.3,
                max_depth: 3,
            },
            // Tuned to keep the landmass smooth without heavy geometry.
            LodLevel::LandMass => Self {
                max_edge_length: 0.18,
                max_depth: 4,
            },
        }
    }

    /// Scale the edge threshold for a sphere of the given radius (presets
    /// are expressed for a unit sphere).
    pub fn scaled_to_radius(self, radius: f64) -> Self {
        Self {
            max_edge_length: self.max_edge_length * radius,
            max_depth: self.max_depth,
        }
    }
}

/// Pick a level from camera distance, in radii from the sphere center.
/// Thresholds match the interactive globe's zoom range (1.5 to 4 radii).
pub fn lod_for_camera_distance(distance_radii: f64) -> LodLevel {
    if distance_radii < 1.8 {
        LodLevel::Near
    } else if distance_radii < 2.8 {
        LodLevel::Medium
    } else {
        LodLevel::Far
    }
}
