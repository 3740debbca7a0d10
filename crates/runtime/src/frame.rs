use foundation::time::Time;

/// Per-frame metadata for the host render loop.
///
/// The globe runs single-threaded and cooperative: the host calls into the
/// quality controller and the scene once per frame with the measured delta.
/// `Frame` carries that timebase explicitly so nothing reads a wall clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Measured delta time for this frame (seconds).
    pub dt_s: f64,
    /// Accumulated engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time(0.0),
        }
    }

    /// The next frame, `dt_s` seconds after this one.
    pub fn advance(self, dt_s: f64) -> Self {
        Self {
            index: self.index + 1,
            dt_s,
            time: Time(self.time.0 + self.dt_s),
        }
    }
}
