//! Frame-rate-driven quality tiers.
//!
//! A hysteresis control loop, not a PID controller: degrading is instant the
//! moment average FPS dips under the lower threshold, upgrading requires a
//! long streak above a stricter threshold. The asymmetry is the design —
//! react fast to stutter, never flap back and forth around one threshold.

use std::collections::VecDeque;

/// Renderer settings bound to one quality tier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QualitySettings {
    pub dot_count: u32,
    pub show_atmosphere: bool,
    pub show_arcs: bool,
}

/// Tiers from highest detail (0) to minimal.
pub const QUALITY_TIERS: [QualitySettings; 4] = [
    QualitySettings {
        dot_count: 12_000,
        show_atmosphere: true,
        show_arcs: true,
    },
    QualitySettings {
        dot_count: 8_000,
        show_atmosphere: true,
        show_arcs: true,
    },
    QualitySettings {
        dot_count: 5_000,
        show_atmosphere: false,
        show_arcs: true,
    },
    QualitySettings {
        dot_count: 3_000,
        show_atmosphere: false,
        show_arcs: false,
    },
];

const FPS_SAMPLE_COUNT: usize = 60;
const DEGRADE_FPS: f64 = 55.5;
const UPGRADE_FPS: f64 = 58.0;
const COOLDOWN_FRAMES: u32 = 120;
// Upgrading needs a much longer streak than the cooldown.
const UPGRADE_STREAK_FRAMES: u32 = COOLDOWN_FRAMES * 2;

/// Per-frame telemetry for display only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QualityTelemetry {
    pub tier: usize,
    pub fps: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TierTransition {
    Degraded { from: usize, to: usize },
    Upgraded { from: usize, to: usize },
}

/// Samples frame deltas and walks the tier ladder.
///
/// State transitions are driven only by sustained frame-time measurements,
/// never directly by user action. Consumers read `settings()` each frame and
/// must treat the record as read-only.
#[derive(Debug)]
pub struct QualityController {
    tier: usize,
    frame_deltas: VecDeque<f64>,
    cooldown: u32,
    upgrade_streak: u32,
    fps: f64,
}

impl QualityController {
    pub fn new(initial_tier: usize) -> Self {
        Self {
            tier: initial_tier.min(QUALITY_TIERS.len() - 1),
            frame_deltas: VecDeque::with_capacity(FPS_SAMPLE_COUNT),
            cooldown: 0,
            upgrade_streak: 0,
            fps: 60.0,
        }
    }

    pub fn tier(&self) -> usize {
        self.tier
    }

    pub fn settings(&self) -> QualitySettings {
        QUALITY_TIERS[self.tier]
    }

    pub fn telemetry(&self) -> QualityTelemetry {
        QualityTelemetry {
            tier: self.tier,
            fps: self.fps.round() as u32,
        }
    }

    /// Feed one measured frame delta (seconds). Returns the transition taken
    /// this frame, if any.
    pub fn on_frame(&mut self, dt_s: f64) -> Option<TierTransition> {
        if !(dt_s > 0.0) || !dt_s.is_finite() {
            return None;
        }

        self.frame_deltas.push_back(dt_s);
        if self.frame_deltas.len() > FPS_SAMPLE_COUNT {
            self.frame_deltas.pop_front();
        }

        // Wait for half a window before trusting the average.
        if self.frame_deltas.len() < FPS_SAMPLE_COUNT / 2 {
            return None;
        }

        let avg_dt: f64 =
            self.frame_deltas.iter().sum::<f64>() / self.frame_deltas.len() as f64;
        self.fps = 1.0 / avg_dt;

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        if self.fps < DEGRADE_FPS && self.tier < QUALITY_TIERS.len() - 1 {
            // Down is immediate: stutter must be answered now.
            let from = self.tier;
            self.tier += 1;
            self.begin_cooldown();
            return Some(TierTransition::Degraded {
                from,
                to: self.tier,
            });
        }

        if self.fps > UPGRADE_FPS && self.tier > 0 {
            self.upgrade_streak += 1;
            if self.upgrade_streak > UPGRADE_STREAK_FRAMES {
                let from = self.tier;
                self.tier -= 1;
                self.begin_cooldown();
                return Some(TierTransition::Upgraded {
                    from,
                    to: self.tier,
                });
            }
        } else {
            self.upgrade_streak = 0;
        }

        None
    }

    fn begin_cooldown(&mut self) {
        self.cooldown = COOLDOWN_FRAMES;
        self.upgrade_streak = 0;
        // The new tier's workload needs fresh samples.
        self.frame_deltas.clear();
    }
}

/// Settings for a tier without FPS monitoring (clamped to the ladder).
pub fn quality_settings(tier: usize) -> QualitySettings {
    QUALITY_TIERS[tier.min(QUALITY_TIERS.len() - 1)]
}
