//! Click-versus-drag disambiguation.
//!
//! Rotating the globe and picking a country share the same pointer button.
//! A press only counts as a pick if the pointer stayed within a small
//! radius and the camera did not move between press and release.

use foundation::math::Vec2;

/// Maximum pointer travel, in pixels, for a press to still be a click.
pub const CLICK_SLOP_PX: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickTracker {
    press: Option<Vec2>,
    max_travel: f64,
    camera_moved: bool,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.press = Some(Vec2::new(x, y));
        self.max_travel = 0.0;
        self.camera_moved = false;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(press) = self.press {
            let travel = (Vec2::new(x, y) - press).length();
            self.max_travel = self.max_travel.max(travel);
        }
    }

    /// Programmatic or inertial camera motion also cancels the click.
    pub fn note_camera_moved(&mut self) {
        if self.press.is_some() {
            self.camera_moved = true;
        }
    }

    /// Release. Returns the press position when the gesture was a click.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.pointer_move(x, y);
        let press = self.press.take()?;
        let was_click = self.max_travel <= CLICK_SLOP_PX && !self.camera_moved;
        self.camera_moved = false;
        if was_click { Some((press.x, press.y)) } else { None }
    }
}
