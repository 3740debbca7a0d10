//! Vertex welding across polygon meshes.
//!
//! Polygons of one country are tessellated independently, so vertices along
//! a shared border exist once per polygon. Welding merges vertices that
//! coincide within a tolerance and carry the same country id, then drops
//! triangles the merge collapsed. Vertices of different countries are never
//! merged even when coincident, so borders keep two vertices and picking
//! stays unambiguous.

use std::collections::BTreeMap;

use crate::mesh::MeshBuffers;
use foundation::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldOptions {
    /// Vertices closer than this (in mesh units) are merge candidates.
    pub tolerance: f64,
}

impl Default for WeldOptions {
    fn default() -> Self {
        Self { tolerance: 1e-7 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeldStats {
    pub vertices_merged: usize,
    pub triangles_dropped: usize,
}

/// Weld coincident same-country vertices in place.
///
/// Deterministic: candidates are bucketed on a quantized grid keyed with
/// `BTreeMap`, and the surviving vertex of each merged group is the one with
/// the lowest original index.
pub fn weld_vertices(mesh: &mut MeshBuffers, options: &WeldOptions) -> WeldStats {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return WeldStats::default();
    }

    let inv = 1.0 / options.tolerance;
    let mut buckets: BTreeMap<(i64, i64, i64, u16), u32> = BTreeMap::new();
    // Old index -> canonical old index.
    let mut canonical: Vec<u32> = Vec::with_capacity(vertex_count);
    let mut merged = 0usize;

    for v in 0..vertex_count as u32 {
        let p = mesh.position(v);
        let country_id = mesh.country_ids[v as usize];
        let key = grid_key(p, inv, country_id);
        match buckets.get(&key) {
            Some(&survivor) if close(p, mesh.position(survivor), options.tolerance) => {
                canonical.push(survivor);
                merged += 1;
            }
            _ => {
                buckets.insert(key, v);
                canonical.push(v);
            }
        }
    }

    if merged == 0 {
        return WeldStats::default();
    }

    // Compact the vertex buffers to the survivors, preserving order.
    let mut remap: Vec<u32> = vec![u32::MAX; vertex_count];
    let mut compact = MeshBuffers::new();
    for v in 0..vertex_count as u32 {
        if canonical[v as usize] == v {
            remap[v as usize] =
                compact.push_vertex(mesh.position(v), mesh.country_ids[v as usize]);
        }
    }

    let mut triangles_dropped = 0usize;
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        let a = remap[canonical[a as usize] as usize];
        let b = remap[canonical[b as usize] as usize];
        let c = remap[canonical[c as usize] as usize];
        if a == b || b == c || a == c {
            triangles_dropped += 1;
        } else {
            compact.push_triangle(a, b, c);
        }
    }

    *mesh = compact;
    WeldStats {
        vertices_merged: merged,
        triangles_dropped,
    }
}

fn grid_key(p: Vec3, inv: f64, country_id: u16) -> (i64, i64, i64, u16) {
    (
        (p.x * inv).round() as i64,
        (p.y * inv).round() as i64,
        (p.z * inv).round() as i64,
        country_id,
    )
}

fn close(a: Vec3, b: Vec3, tolerance: f64) -> bool {
    (a - b).length() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::{WeldOptions, weld_vertices};
    use crate::mesh::MeshBuffers;
    use foundation::math::Vec3;

    #[test]
    fn coincident_same_country_vertices_merge() {
        let mut mesh = MeshBuffers::new();
        let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 1.0), 1);
        let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), 1);
        let c = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), 1);
        mesh.push_triangle(a, b, c);
        // Second triangle repeats the shared edge with its own vertices.
        let b2 = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), 1);
        let c2 = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), 1);
        let d = mesh.push_vertex(Vec3::new(1.0, 1.0, 0.0), 1);
        mesh.push_triangle(b2, d, c2);

        let stats = weld_vertices(&mut mesh, &WeldOptions::default());
        assert_eq!(stats.vertices_merged, 2);
        assert_eq!(stats.triangles_dropped, 0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        // The shared edge now appears twice through the same vertex pair.
        let shared: Vec<_> = mesh
            .edge_use_counts()
            .into_iter()
            .filter(|&(_, count)| count == 2)
            .collect();
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn different_countries_are_never_merged() {
        let mut mesh = MeshBuffers::new();
        let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 1.0), 1);
        let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), 1);
        let c = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), 1);
        mesh.push_triangle(a, b, c);
        let a2 = mesh.push_vertex(Vec3::new(0.0, 0.0, 1.0), 2);
        let b2 = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), 2);
        let d = mesh.push_vertex(Vec3::new(-1.0, 0.0, 0.0), 2);
        mesh.push_triangle(a2, d, b2);

        let stats = weld_vertices(&mut mesh, &WeldOptions::default());
        assert_eq!(stats.vertices_merged, 0);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_country_id(0), Some(1));
        assert_eq!(mesh.triangle_country_id(1), Some(2));
    }

    #[test]
    fn collapsed_triangles_are_dropped() {
        let mut mesh = MeshBuffers::new();
        let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 0.0), 3);
        let b = mesh.push_vertex(Vec3::new(1e-9, 0.0, 0.0), 3);
        let c = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), 3);
        mesh.push_triangle(a, b, c);

        let stats = weld_vertices(
            &mut mesh,
            &WeldOptions { tolerance: 1e-7 },
        );
        assert_eq!(stats.vertices_merged, 1);
        assert_eq!(stats.triangles_dropped, 1);
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn vertices_outside_tolerance_survive() {
        let mut mesh = MeshBuffers::new();
        mesh.push_vertex(Vec3::new(0.0, 0.0, 0.0), 1);
        mesh.push_vertex(Vec3::new(0.5, 0.0, 0.0), 1);
        let stats = weld_vertices(&mut mesh, &WeldOptions { tolerance: 1e-3 });
        assert_eq!(stats.vertices_merged, 0);
        assert_eq!(mesh.vertex_count(), 2);
    }
}
