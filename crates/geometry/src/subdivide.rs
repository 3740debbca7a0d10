//! Adaptive spherical subdivision.
//!
//! A triangle whose vertices were wrapped onto the sphere still renders as a
//! flat facet; long edges make that visible, more so at close camera
//! distances. Each pass splits every triangle whose longest chord exceeds
//! the LOD threshold into four, projecting edge midpoints back onto the
//! sphere. Midpoints are cached by unordered vertex-index pair so adjacent
//! triangles reuse the same new vertex and the mesh stays watertight.

use std::collections::BTreeMap;

use crate::lod::LodConfig;
use crate::mesh::MeshBuffers;

/// Subdivide in place. Returns the number of passes that split anything.
pub fn subdivide_spherical(mesh: &mut MeshBuffers, radius: f64, lod: LodConfig) -> u32 {
    let mut midpoints: BTreeMap<(u32, u32), u32> = BTreeMap::new();
    let mut passes = 0;

    for _ in 0..lod.max_depth {
        let mut next_indices: Vec<u32> = Vec::with_capacity(mesh.indices.len());
        let mut did_split = false;

        for t in 0..mesh.triangle_count() {
            let [i0, i1, i2] = mesh.triangle(t);
            let v0 = mesh.position(i0);
            let v1 = mesh.position(i1);
            let v2 = mesh.position(i2);

            let longest = (v1 - v0)
                .length()
                .max((v2 - v1).length())
                .max((v0 - v2).length());

            if longest > lod.max_edge_length {
                did_split = true;
                // All three corners share one country id by invariant; the
                // midpoints inherit it.
                let country_id = mesh.country_ids[i0 as usize];
                let m01 = midpoint(mesh, &mut midpoints, i0, i1, radius, country_id);
                let m12 = midpoint(mesh, &mut midpoints, i1, i2, radius, country_id);
                let m20 = midpoint(mesh, &mut midpoints, i2, i0, radius, country_id);

                next_indices.extend_from_slice(&[i0, m01, m20]);
                next_indices.extend_from_slice(&[m01, i1, m12]);
                next_indices.extend_from_slice(&[m20, m12, i2]);
                next_indices.extend_from_slice(&[m01, m12, m20]);
            } else {
                next_indices.extend_from_slice(&[i0, i1, i2]);
            }
        }

        mesh.indices = next_indices;
        if !did_split {
            break;
        }
        passes += 1;
    }

    passes
}

fn midpoint(
    mesh: &mut MeshBuffers,
    cache: &mut BTreeMap<(u32, u32), u32>,
    a: u32,
    b: u32,
    radius: f64,
    country_id: u16,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }

    let mid = (mesh.position(a) + mesh.position(b)).scale(0.5);
    // Project back onto the sphere; a degenerate midpoint (antipodal pair)
    // cannot occur for triangle edges produced by tessellation.
    let on_sphere = match mid.normalized() {
        Some(n) => n.scale(radius),
        None => mid,
    };

    let index = mesh.push_vertex(on_sphere, country_id);
    cache.insert(key, index);
    index
}
