//! Globe state: orientation, idle auto-rotation and the cursor ray.

use foundation::math::{LatLng, Vec3, sphere_to_lat_lng};
use gpu::camera::Camera;

/// Radians per second while idle; one revolution in roughly two minutes.
pub const AUTO_ROTATE_SPEED: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Globe {
    pub radius: f64,
    rotation_y_rad: f64,
    auto_rotate: bool,
}

impl Globe {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            rotation_y_rad: 0.0,
            auto_rotate: true,
        }
    }

    pub fn rotation_y_rad(&self) -> f64 {
        self.rotation_y_rad
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// Advance idle rotation. A no-op once the user has taken over.
    pub fn advance(&mut self, dt_s: f64) {
        if self.auto_rotate && dt_s > 0.0 {
            self.rotation_y_rad =
                (self.rotation_y_rad + AUTO_ROTATE_SPEED * dt_s) % std::f64::consts::TAU;
        }
    }

    /// First user interaction stops auto-rotation for good.
    pub fn note_interaction(&mut self) {
        self.auto_rotate = false;
    }

    /// Manual rotation from a drag.
    pub fn rotate_by(&mut self, delta_rad: f64) {
        self.note_interaction();
        self.rotation_y_rad = (self.rotation_y_rad + delta_rad) % std::f64::consts::TAU;
    }

    /// Lat/lng under a world-space point on the globe surface, accounting for
    /// the current rotation.
    pub fn surface_lat_lng(&self, world_point: Vec3) -> Option<LatLng> {
        // Undo the model rotation about y before inverting the projection.
        let (s, c) = (-self.rotation_y_rad).sin_cos();
        let local = Vec3::new(
            c * world_point.x + s * world_point.z,
            world_point.y,
            -s * world_point.x + c * world_point.z,
        );
        sphere_to_lat_lng(local)
    }
}

/// Ray from the camera through a screen pixel, in world space.
pub fn cursor_ray(camera: &Camera, width: u32, height: u32, x_px: f64, y_px: f64) -> Option<Ray> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc_x = (x_px / width as f64) * 2.0 - 1.0;
    let ndc_y = 1.0 - (y_px / height as f64) * 2.0;

    let forward = (camera.target - camera.position).normalized()?;
    let side = forward.cross(camera.up).normalized()?;
    let up = side.cross(forward);

    let half_h = (camera.fov_y_rad * 0.5).tan();
    let half_w = half_h * camera.aspect;
    let dir = forward + side.scale(ndc_x * half_w) + up.scale(ndc_y * half_h);
    Some(Ray {
        origin: camera.position,
        dir: dir.normalized()?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Nearest intersection with a sphere of `radius` centered at the origin.
    pub fn hit_sphere(&self, radius: f64) -> Option<Vec3> {
        let b = self.origin.dot(self.dir);
        let c = self.origin.dot(self.origin) - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        if t < 0.0 {
            return None;
        }
        Some(self.origin + self.dir.scale(t))
    }
}
