//! Country-id render pass.
//!
//! Draws the globe mesh with each triangle flat-shaded by its country id,
//! encoded as `r + 256 * g`. Id 0 is never drawn; a cleared pixel therefore
//! reads back as ocean.

use crate::camera::{Camera, Mat4};
use crate::target::IdTarget;
use geometry::mesh::MeshBuffers;

/// Encode a country id into RGBA channels.
pub fn encode_id(id: u16) -> [u8; 4] {
    [(id % 256) as u8, (id / 256) as u8, 0, 255]
}

/// Decode a readback pixel. Returns `None` for the ocean (id 0).
pub fn decode_id(rgba: [u8; 4]) -> Option<u16> {
    let id = rgba[0] as u16 + 256 * rgba[1] as u16;
    if id == 0 { None } else { Some(id) }
}

/// Render the mesh's country ids into the target.
///
/// `model` carries the globe's current rotation so the id pass sees exactly
/// what the visible render saw this frame. `projection` is supplied
/// separately so callers can substitute a view-offset matrix for 1x1 picks.
pub fn render_id_pass(
    target: &mut IdTarget,
    mesh: &MeshBuffers,
    model: &Mat4,
    camera: &Camera,
    projection: &Mat4,
) {
    target.clear();
    let mvp = projection.mul(&camera.view()).mul(model);
    let width = target.width() as f64;
    let height = target.height() as f64;

    for t in 0..mesh.triangle_count() {
        let id = match mesh.triangle_country_id(t) {
            Some(id) if id != 0 => id,
            _ => continue,
        };
        let [i0, i1, i2] = mesh.triangle(t);
        let clip = [
            mvp.transform_point(mesh.position(i0)),
            mvp.transform_point(mesh.position(i1)),
            mvp.transform_point(mesh.position(i2)),
        ];
        // No near-plane clipping: a triangle straddling the camera is skipped
        // outright. The globe is always fully in front of the pick camera.
        if clip.iter().any(|c| c[3] <= 0.0) {
            continue;
        }

        let screen: Vec<[f64; 3]> = clip
            .iter()
            .map(|&[x, y, z, w]| {
                [
                    (x / w + 1.0) * 0.5 * width,
                    (1.0 - y / w) * 0.5 * height,
                    z / w,
                ]
            })
            .collect();

        raster_triangle(target, &screen, encode_id(id));
    }
}

fn raster_triangle(target: &mut IdTarget, v: &[[f64; 3]], rgba: [u8; 4]) {
    // Counter-clockwise world winding flips to clockwise under the screen's
    // downward y, so front faces have negative signed area. Back faces are
    // culled: the pass draws no ocean sphere, and far-hemisphere countries
    // must not show through it.
    let area = edge(v[0], v[1], v[2][0], v[2][1]);
    if area >= -1e-12 {
        return;
    }

    let min_x = v.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let max_x = v.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    let min_y = v.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let max_y = v.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.floor().max(0.0) as u32;
    let x1 = (max_x.ceil() as i64).min(target.width() as i64 - 1);
    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = (max_y.ceil() as i64).min(target.height() as i64 - 1);
    if x1 < x0 as i64 || y1 < y0 as i64 {
        return;
    }

    for y in y0..=y1 as u32 {
        for x in x0..=x1 as u32 {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            let w0 = edge(v[1], v[2], px, py) / area;
            let w1 = edge(v[2], v[0], px, py) / area;
            let w2 = edge(v[0], v[1], px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let depth = w0 * v[0][2] + w1 * v[1][2] + w2 * v[2][2];
            target.write_if_nearer(x, y, depth, rgba);
        }
    }
}

fn edge(a: [f64; 3], b: [f64; 3], px: f64, py: f64) -> f64 {
    (b[0] - a[0]) * (py - a[1]) - (b[1] - a[1]) * (px - a[0])
}
