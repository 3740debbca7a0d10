//! Id-pass picking.
//!
//! The preferred path: render the globe mesh into a 1x1 target with the
//! cursor pixel recentered by a view offset, read the single pixel back and
//! decode the country id. The model rotation is taken from the globe right
//! before the pass so the pick always sees the frame the user clicked on.

use crate::globe::Globe;
use gpu::camera::{Camera, Mat4};
use gpu::id_pass::{decode_id, render_id_pass};
use gpu::target::IdTarget;
use geometry::mesh::MeshBuffers;

#[derive(Debug)]
pub struct IdPassPicker {
    target: IdTarget,
}

impl Default for IdPassPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl IdPassPicker {
    pub fn new() -> Self {
        Self {
            target: IdTarget::new(1, 1),
        }
    }

    /// Country id under the cursor, or `None` over the ocean.
    pub fn pick(
        &mut self,
        mesh: &MeshBuffers,
        globe: &Globe,
        camera: &Camera,
        viewport: (u32, u32),
        cursor: (u32, u32),
    ) -> Option<u16> {
        let (width, height) = viewport;
        let (x, y) = cursor;
        if width == 0 || height == 0 || x >= width || y >= height {
            return None;
        }

        let model = Mat4::rotation_y(globe.rotation_y_rad());
        let projection = camera.projection_with_view_offset(width, height, x, y, 1, 1);
        render_id_pass(&mut self.target, mesh, &model, camera, &projection);
        decode_id(self.target.pixel(0, 0))
    }
}
