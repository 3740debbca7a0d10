use std::collections::BTreeMap;

use foundation::math::Vec3;

/// Flat triangle-mesh buffers in the layout the renderer uploads directly:
/// 3 floats per vertex position, 3 indices per triangle, and one country id
/// per vertex for the picking shader.
///
/// Invariants maintained by producers:
/// - every vertex sits on the build sphere (`|position| == radius` within
///   1e-6 relative tolerance);
/// - all three vertices of a triangle carry the same country id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f64>,
    pub indices: Vec<u32>,
    pub country_ids: Vec<u16>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: u32) -> Vec3 {
        let i = vertex as usize * 3;
        Vec3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    pub fn push_vertex(&mut self, position: Vec3, country_id: u16) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions
            .extend_from_slice(&[position.x, position.y, position.z]);
        self.country_ids.push(country_id);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let i = t * 3;
        [self.indices[i], self.indices[i + 1], self.indices[i + 2]]
    }

    /// The single country id shared by a triangle's vertices, or `None`
    /// when the purity invariant is broken.
    pub fn triangle_country_id(&self, t: usize) -> Option<u16> {
        let [a, b, c] = self.triangle(t);
        let id = self.country_ids[a as usize];
        if self.country_ids[b as usize] == id && self.country_ids[c as usize] == id {
            Some(id)
        } else {
            None
        }
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &MeshBuffers) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.country_ids.extend_from_slice(&other.country_ids);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// How many triangles use each undirected edge.
    ///
    /// Interior edges appear exactly twice, boundary edges once; any other
    /// count means a crack or a degenerate triangle.
    pub fn edge_use_counts(&self) -> BTreeMap<(u32, u32), usize> {
        let mut counts = BTreeMap::new();
        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let key = if u < v { (u, v) } else { (v, u) };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Undirected edges used by exactly one triangle, as position pairs so
    /// the set survives re-indexing.
    pub fn boundary_edge_positions(&self) -> Vec<[(i64, i64, i64); 2]> {
        let quantize = |v: Vec3| {
            (
                (v.x * 1e9).round() as i64,
                (v.y * 1e9).round() as i64,
                (v.z * 1e9).round() as i64,
            )
        };
        let mut edges: Vec<[(i64, i64, i64); 2]> = self
            .edge_use_counts()
            .into_iter()
            .filter(|(_, count)| *count == 1)
            .map(|((u, v), _)| {
                let mut pair = [quantize(self.position(u)), quantize(self.position(v))];
                pair.sort();
                pair
            })
            .collect();
        edges.sort();
        edges
    }
}
