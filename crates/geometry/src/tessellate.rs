//! Spherical polygon tessellation.
//!
//! Country rings arrive in lng/lat degrees; triangulation happens in that
//! 2D space and vertices are then wrapped onto the sphere. The triangulation
//! algorithm sits behind the narrow [`Triangulator`] trait so ear-clipping
//! can be swapped for a sweep-line tessellator without touching callers.

use earcutr::earcut;
use formats::country::{LngLat, Polygon};
use foundation::math::lat_lng_to_sphere;

use crate::mesh::MeshBuffers;

#[derive(Debug, Clone, PartialEq)]
pub enum TessellationError {
    /// The exterior ring jumps across the date line; triangulating it in
    /// lng/lat space would produce world-spanning triangles, so the polygon
    /// is skipped entirely.
    AntimeridianCrossing,
    /// Fewer than 3 distinct points in the exterior ring.
    DegenerateRing,
    /// The triangulation algorithm failed on this polygon.
    Algorithm { reason: String },
}

impl std::fmt::Display for TessellationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TessellationError::AntimeridianCrossing => {
                write!(f, "exterior ring crosses the antimeridian")
            }
            TessellationError::DegenerateRing => write!(f, "ring has fewer than 3 points"),
            TessellationError::Algorithm { reason } => {
                write!(f, "triangulation failed: {reason}")
            }
        }
    }
}

impl std::error::Error for TessellationError {}

/// 2D triangulation output: vertices in lng/lat plus a flat triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    pub vertices: Vec<LngLat>,
    pub indices: Vec<usize>,
}

/// Narrow seam over the triangulation algorithm. Rings follow GeoJSON
/// convention: ring 0 exterior, the rest holes.
pub trait Triangulator {
    fn triangulate(&self, rings: &[Vec<LngLat>]) -> Result<Triangulation, TessellationError>;
}

/// Ear-clipping triangulation with hole subtraction via `earcutr`.
#[derive(Debug, Default, Copy, Clone)]
pub struct EarcutTriangulator;

impl Triangulator for EarcutTriangulator {
    fn triangulate(&self, rings: &[Vec<LngLat>]) -> Result<Triangulation, TessellationError> {
        let mut coords: Vec<f64> = Vec::new();
        let mut vertices: Vec<LngLat> = Vec::new();
        let mut hole_indices: Vec<usize> = Vec::new();

        for (ring_index, ring) in rings.iter().enumerate() {
            let points = open_ring(ring);
            if points.len() < 3 {
                if ring_index == 0 {
                    return Err(TessellationError::DegenerateRing);
                }
                // A degenerate hole is dropped, not fatal.
                continue;
            }

            if ring_index > 0 {
                hole_indices.push(vertices.len());
            }
            for &(lng, lat) in points {
                coords.push(lng);
                coords.push(lat);
                vertices.push((lng, lat));
            }
        }

        if vertices.len() < 3 {
            return Err(TessellationError::DegenerateRing);
        }

        let indices = earcut(&coords, &hole_indices, 2).map_err(|e| {
            TessellationError::Algorithm {
                reason: format!("{e:?}"),
            }
        })?;
        if indices.is_empty() {
            return Err(TessellationError::Algorithm {
                reason: "no triangles produced".to_string(),
            });
        }

        Ok(Triangulation { vertices, indices })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TessellationOptions {
    /// Drop hole rings before triangulating. The single-landmass variant
    /// renders lakes as filled land in exchange for less geometry; country
    /// fills keep their holes.
    pub drop_holes: bool,
    /// Longitude jump between consecutive exterior points that marks an
    /// antimeridian crossing.
    pub antimeridian_jump_deg: f64,
    /// Decimal places for the in-polygon vertex dedup key.
    pub dedup_decimals: u32,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            drop_holes: false,
            antimeridian_jump_deg: 90.0,
            dedup_decimals: 6,
        }
    }
}

/// True when consecutive points jump more than `threshold_deg` in longitude.
pub fn crosses_antimeridian(ring: &[LngLat], threshold_deg: f64) -> bool {
    ring.windows(2)
        .any(|w| (w[1].0 - w[0].0).abs() > threshold_deg)
}

/// Tessellate one polygon onto a sphere of the given radius, tagging every
/// vertex with `country_id`.
///
/// Within the polygon, identical (lng, lat) pairs (rounded to the dedup
/// precision) share one output vertex so the interior has no seams.
pub fn tessellate_polygon(
    triangulator: &dyn Triangulator,
    polygon: &Polygon,
    country_id: u16,
    radius: f64,
    options: &TessellationOptions,
) -> Result<MeshBuffers, TessellationError> {
    let Some(exterior) = polygon.rings.first() else {
        return Err(TessellationError::DegenerateRing);
    };
    if crosses_antimeridian(exterior, options.antimeridian_jump_deg) {
        return Err(TessellationError::AntimeridianCrossing);
    }

    let rings: &[Vec<LngLat>] = if options.drop_holes {
        &polygon.rings[..1]
    } else {
        &polygon.rings
    };

    let triangulation = triangulator.triangulate(rings)?;

    let scale = 10f64.powi(options.dedup_decimals as i32);
    let mut mesh = MeshBuffers::new();
    let mut dedup: std::collections::BTreeMap<(i64, i64), u32> = std::collections::BTreeMap::new();

    let mut resolve = |mesh: &mut MeshBuffers, (lng, lat): LngLat| -> u32 {
        let key = ((lng * scale).round() as i64, (lat * scale).round() as i64);
        *dedup.entry(key).or_insert_with(|| {
            mesh.push_vertex(lat_lng_to_sphere(lat, lng, radius), country_id)
        })
    };

    for triangle in triangulation.indices.chunks_exact(3) {
        let va = triangulation.vertices[triangle[0]];
        let mut vb = triangulation.vertices[triangle[1]];
        let mut vc = triangulation.vertices[triangle[2]];
        // Earcut keeps the input ring's winding; datasets are not consistent
        // about it. Force counter-clockwise in lng/lat so every triangle
        // faces outward on the sphere and back-face culling is reliable.
        let area2 = (vb.0 - va.0) * (vc.1 - va.1) - (vb.1 - va.1) * (vc.0 - va.0);
        if area2 < 0.0 {
            std::mem::swap(&mut vb, &mut vc);
        }

        let a = resolve(&mut mesh, va);
        let b = resolve(&mut mesh, vb);
        let c = resolve(&mut mesh, vc);
        // Dedup can collapse slivers; drop them.
        if a != b && b != c && c != a {
            mesh.push_triangle(a, b, c);
        }
    }

    Ok(mesh)
}

fn open_ring(ring: &[LngLat]) -> &[LngLat] {
    if ring.len() >= 2 {
        let first = ring[0];
        let last = ring[ring.len() - 1];
        if (first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9 {
            return &ring[..ring.len() - 1];
        }
    }
    ring
}
