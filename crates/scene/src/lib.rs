pub mod globe;
pub mod picking;
pub mod selection;

pub use globe::*;
pub use selection::*;

// Whole-session behavior: dataset in, frames advancing, clicks resolving
// and the quality controller reacting to frame times.
#[cfg(test)]
mod session_tests {
    use crate::globe::Globe;
    use crate::picking::gesture::ClickTracker;
    use crate::picking::Picker;
    use crate::selection::{SelectionChange, SelectionState};
    use formats::country::{CountryFeature, CountrySet, Polygon};
    use foundation::math::Vec3;
    use geometry::build::BuildOptions;
    use geometry::cache::GeometryCache;
    use geometry::lod::{LodLevel, lod_for_camera_distance};
    use gpu::camera::Camera;
    use pretty_assertions::assert_eq;
    use runtime::event_bus::EventBus;
    use runtime::frame::Frame;
    use runtime::metrics::Metrics;
    use runtime::quality::{QualityController, TierTransition};

    fn square(lng0: f64, lat0: f64, side: f64) -> Vec<(f64, f64)> {
        vec![
            (lng0, lat0),
            (lng0 + side, lat0),
            (lng0 + side, lat0 + side),
            (lng0, lat0 + side),
            (lng0, lat0),
        ]
    }

    fn dataset() -> CountrySet {
        CountrySet::from_features(
            vec![
                CountryFeature {
                    id: 1,
                    code: "AAA".to_string(),
                    name: "Country A".to_string(),
                    polygons: vec![Polygon {
                        rings: vec![square(0.0, 0.0, 10.0)],
                    }],
                },
                CountryFeature {
                    id: 2,
                    code: "BBB".to_string(),
                    name: "Country B".to_string(),
                    polygons: vec![Polygon {
                        rings: vec![square(20.0, 0.0, 10.0)],
                    }],
                },
            ],
            "session-test".to_string(),
        )
    }

    #[test]
    fn click_selects_drag_does_not() {
        let countries = dataset();

        // Camera on the axis through (lat 5, lng 5), the middle of
        // Country A. Projection puts that point at
        // (-sin 85 cos 185, cos 85, sin 85 sin 185) ~ (0.992, 0.087, -0.087).
        let toward = Vec3::new(0.992, 0.087, -0.087);
        let camera = Camera::look_at(
            toward.scale(2.5),
            Vec3::zero(),
            std::f64::consts::FRAC_PI_3,
            1.0,
        );

        let level = lod_for_camera_distance(camera.position.length());
        assert_eq!(level, LodLevel::Medium);

        let mut cache = GeometryCache::new();
        let (mesh, stats) = cache
            .get_or_build(&countries, level, &BuildOptions::default())
            .clone();
        assert_eq!(stats.polygons_skipped, 0);

        let mut metrics = Metrics::new();
        metrics.inc_counter("tessellation.polygons_skipped", stats.polygons_skipped as u64);
        metrics.inc_counter("subdivision.passes", stats.subdivision_passes as u64);
        metrics.set_gauge("mesh.triangles", stats.triangles as i64);
        assert_eq!(metrics.counter("tessellation.polygons_skipped"), 0);
        assert!(metrics.counter("subdivision.passes") > 0);
        assert!(metrics.gauge("mesh.triangles").unwrap() > 0);

        let mut globe = Globe::new(1.0);
        globe.note_interaction();
        let mut picker = Picker::new(&countries);
        let mut tracker = ClickTracker::new();
        let mut selection = SelectionState::new();
        let mut bus = EventBus::new();
        let frame = Frame::first();

        // Clean click in the viewport center.
        tracker.pointer_down(100.0, 100.0);
        let press = tracker.pointer_up(100.0, 100.0).expect("click");
        let pick = picker.pick(&countries, &mesh, &globe, &camera, (200, 200), press);
        let change = selection.apply_pick(pick, &mut bus, frame);
        assert!(matches!(change, SelectionChange::Selected(ref s) if s.id == 1));

        // A drag across the globe must not change the selection.
        tracker.pointer_down(100.0, 100.0);
        tracker.pointer_move(160.0, 100.0);
        assert_eq!(tracker.pointer_up(160.0, 100.0), None);
        assert_eq!(selection.current().map(|s| s.id), Some(1));

        // Click the ocean: selection clears and says so on the bus.
        let ocean = Vec3::new(0.0, -1.0, 0.0);
        let south_camera = Camera {
            up: Vec3::new(0.0, 0.0, 1.0),
            ..Camera::look_at(
                ocean.scale(3.0),
                Vec3::zero(),
                std::f64::consts::FRAC_PI_3,
                1.0,
            )
        };
        tracker.pointer_down(100.0, 100.0);
        let press = tracker.pointer_up(100.0, 100.0).expect("click");
        let pick = picker.pick(&countries, &mesh, &globe, &south_camera, (200, 200), press);
        assert_eq!(selection.apply_pick(pick, &mut bus, frame), SelectionChange::Cleared);
        assert_eq!(bus.events_of_kind("selection").len(), 2);
    }

    #[test]
    fn heavy_frames_degrade_quality_mid_session() {
        let mut controller = QualityController::new(0);
        let mut frame = Frame::first();
        let mut transitions = Vec::new();

        // A minute at 60 fps, then a stutter.
        for _ in 0..120 {
            frame = frame.advance(1.0 / 60.0);
            if let Some(t) = controller.on_frame(frame.dt_s) {
                transitions.push(t);
            }
        }
        for _ in 0..40 {
            frame = frame.advance(1.0 / 40.0);
            if let Some(t) = controller.on_frame(frame.dt_s) {
                transitions.push(t);
            }
        }

        assert_eq!(transitions, vec![TierTransition::Degraded { from: 0, to: 1 }]);
        assert!(controller.settings().dot_count < 12_000);
    }
}
