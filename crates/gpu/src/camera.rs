//! Perspective camera and the 4x4 transforms the id pass needs.

use foundation::math::Vec3;

/// Row-major 4x4 matrix. Enough linear algebra for the id pass; not a
/// general-purpose math type.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4(pub [[f64; 4]; 4]);

impl Mat4 {
    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self(m)
    }

    pub fn rotation_y(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        Self([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Mat4(out)
    }

    /// Transform a point, returning homogeneous clip coordinates.
    pub fn transform_point(&self, p: Vec3) -> [f64; 4] {
        let v = [p.x, p.y, p.z, 1.0];
        let mut out = [0.0; 4];
        for (i, cell) in out.iter_mut().enumerate() {
            *cell = (0..4).map(|k| self.0[i][k] * v[k]).sum();
        }
        out
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64, aspect: f64) -> Self {
        Self {
            position,
            target,
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_y_rad,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        let forward = match (self.target - self.position).normalized() {
            Some(f) => f,
            // Camera sitting on its target has no view direction.
            None => Vec3::new(0.0, 0.0, -1.0),
        };
        let side = match forward.cross(self.up).normalized() {
            Some(s) => s,
            None => Vec3::new(1.0, 0.0, 0.0),
        };
        let up = side.cross(forward);
        Mat4([
            [side.x, side.y, side.z, -side.dot(self.position)],
            [up.x, up.y, up.z, -up.dot(self.position)],
            [-forward.x, -forward.y, -forward.z, forward.dot(self.position)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn projection(&self) -> Mat4 {
        let top = self.near * (self.fov_y_rad * 0.5).tan();
        let right = top * self.aspect;
        frustum(-right, right, -top, top, self.near, self.far)
    }

    /// Projection for a sub-rectangle of the full viewport.
    ///
    /// Rendering with this matrix maps the `width` x `height` pixel window at
    /// `(x, y)` of a `full_width` x `full_height` frame onto the whole render
    /// target, so a single cursor pixel can be drawn into a 1x1 target.
    pub fn projection_with_view_offset(
        &self,
        full_width: u32,
        full_height: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Mat4 {
        let top = self.near * (self.fov_y_rad * 0.5).tan();
        let full_h = 2.0 * top;
        let full_w = full_h * self.aspect;

        let px_w = full_w / full_width as f64;
        let px_h = full_h / full_height as f64;
        let left = -full_w * 0.5 + x as f64 * px_w;
        let window_top = top - y as f64 * px_h;
        frustum(
            left,
            left + width as f64 * px_w,
            window_top - height as f64 * px_h,
            window_top,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection().mul(&self.view())
    }
}

fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4 {
    let w = right - left;
    let h = top - bottom;
    let d = far - near;
    Mat4([
        [2.0 * near / w, 0.0, (right + left) / w, 0.0],
        [0.0, 2.0 * near / h, (top + bottom) / h, 0.0],
        [0.0, 0.0, -(far + near) / d, -2.0 * far * near / d],
        [0.0, 0.0, -1.0, 0.0],
    ])
}
