//! Country picking.
//!
//! Three strategies, tried in order of preference:
//!
//! 1. id pass: render the cursor pixel with country ids and read it back;
//! 2. raster: constant-time lookup into the precomputed id raster;
//! 3. cpu: point-in-polygon against the loaded outlines.
//!
//! A strategy answers both "which country" and "nothing here"; falling
//! through happens only when a strategy is unavailable, never because it
//! returned ocean.

pub mod color;
pub mod cpu;
pub mod gesture;
pub mod raster;

pub use color::IdPassPicker;
pub use cpu::CpuPicker;
pub use gesture::{CLICK_SLOP_PX, ClickTracker};
pub use raster::RasterPicker;

use crate::globe::{Globe, cursor_ray};
use formats::country::CountrySet;
use geometry::mesh::MeshBuffers;
use gpu::camera::Camera;
use gpu::capability::IdPassCapability;

/// What a successful pick resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySelection {
    pub id: u16,
    pub code: String,
    pub name: String,
}

#[derive(Debug)]
pub struct Picker {
    capability: IdPassCapability,
    id_pass: IdPassPicker,
    raster: Option<RasterPicker>,
    cpu: CpuPicker,
}

impl Picker {
    pub fn new(countries: &CountrySet) -> Self {
        Self {
            capability: IdPassCapability::new(),
            id_pass: IdPassPicker::new(),
            raster: None,
            cpu: CpuPicker::new(countries),
        }
    }

    /// Attach a raster picker, used whenever the id pass is unavailable.
    pub fn with_raster(mut self, raster: RasterPicker) -> Self {
        self.raster = Some(raster);
        self
    }

    /// The integration layer reports readback failures here; after repeated
    /// failures picks route to the raster/cpu strategies.
    pub fn note_id_pass_failure(&mut self) {
        self.capability.record_failure();
    }

    pub fn recheck_id_pass(&mut self) {
        self.capability.recheck();
    }

    pub fn id_pass_available(&self) -> bool {
        self.capability.is_available()
    }

    /// Resolve the country under the cursor.
    ///
    /// `None` means ocean, space past the globe's limb, or a cursor outside
    /// the viewport.
    pub fn pick(
        &mut self,
        countries: &CountrySet,
        mesh: &MeshBuffers,
        globe: &Globe,
        camera: &Camera,
        viewport: (u32, u32),
        cursor: (f64, f64),
    ) -> Option<CountrySelection> {
        let id = if self.capability.is_available() {
            let px = (cursor.0.floor().max(0.0) as u32, cursor.1.floor().max(0.0) as u32);
            let id = self.id_pass.pick(mesh, globe, camera, viewport, px);
            self.capability.record_success();
            id
        } else {
            let lat_lng = cursor_ray(camera, viewport.0, viewport.1, cursor.0, cursor.1)
                .and_then(|ray| ray.hit_sphere(globe.radius))
                .and_then(|hit| globe.surface_lat_lng(hit))?;
            match &self.raster {
                Some(raster) => raster.pick(lat_lng.lat_deg, lat_lng.lng_deg),
                None => self.cpu.pick(countries, lat_lng.lat_deg, lat_lng.lng_deg),
            }
        };

        let feature = countries.by_id(id?)?;
        Some(CountrySelection {
            id: feature.id,
            code: feature.code.clone(),
            name: feature.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Picker;
    use crate::globe::Globe;
    use formats::country::{CountryFeature, CountrySet, Polygon};
    use foundation::math::Vec3;
    use geometry::build::{BuildOptions, build_globe_mesh};
    use gpu::camera::Camera;

    // Square country centered on lng -90, lat 0: the point of the globe
    // facing a camera parked on the +z axis.
    fn dataset() -> CountrySet {
        CountrySet::from_features(
            vec![
                CountryFeature {
                    id: 1,
                    code: "AAA".to_string(),
                    name: "Country A".to_string(),
                    polygons: vec![Polygon {
                        rings: vec![vec![
                            (-110.0, -20.0),
                            (-70.0, -20.0),
                            (-70.0, 20.0),
                            (-110.0, 20.0),
                            (-110.0, -20.0),
                        ]],
                    }],
                },
                CountryFeature {
                    id: 2,
                    code: "BBB".to_string(),
                    name: "Country B".to_string(),
                    polygons: vec![Polygon {
                        rings: vec![vec![
                            (60.0, -20.0),
                            (100.0, -20.0),
                            (100.0, 20.0),
                            (60.0, 20.0),
                            (60.0, -20.0),
                        ]],
                    }],
                },
            ],
            "picker-test".to_string(),
        )
    }

    fn front_camera() -> Camera {
        Camera::look_at(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::zero(),
            std::f64::consts::FRAC_PI_3,
            1.0,
        )
    }

    #[test]
    fn id_pass_and_cpu_agree_on_the_front_country() {
        let countries = dataset();
        let (mesh, _) = build_globe_mesh(&countries, &BuildOptions::default());
        let globe = Globe::new(1.0);
        let camera = front_camera();

        let mut picker = Picker::new(&countries);
        let via_id_pass = picker
            .pick(&countries, &mesh, &globe, &camera, (200, 200), (100.0, 100.0))
            .expect("id pass pick");
        assert_eq!(via_id_pass.code, "AAA");

        // Disable the id pass; the same click must resolve geometrically.
        for _ in 0..3 {
            picker.note_id_pass_failure();
        }
        assert!(!picker.id_pass_available());
        let via_cpu = picker
            .pick(&countries, &mesh, &globe, &camera, (200, 200), (100.0, 100.0))
            .expect("cpu pick");
        assert_eq!(via_cpu, via_id_pass);
    }

    #[test]
    fn ocean_and_limb_clicks_resolve_to_nothing() {
        let countries = dataset();
        let (mesh, _) = build_globe_mesh(&countries, &BuildOptions::default());
        let globe = Globe::new(1.0);
        let camera = front_camera();

        let mut picker = Picker::new(&countries);
        // Past the limb.
        assert_eq!(
            picker.pick(&countries, &mesh, &globe, &camera, (200, 200), (2.0, 2.0)),
            None
        );

        // Same spot with the id pass disabled: the ray misses the sphere.
        for _ in 0..3 {
            picker.note_id_pass_failure();
        }
        assert_eq!(
            picker.pick(&countries, &mesh, &globe, &camera, (200, 200), (2.0, 2.0)),
            None
        );
    }

    #[test]
    fn recheck_restores_the_id_pass() {
        let countries = dataset();
        let mut picker = Picker::new(&countries);
        for _ in 0..3 {
            picker.note_id_pass_failure();
        }
        assert!(!picker.id_pass_available());
        picker.recheck_id_pass();
        assert!(picker.id_pass_available());
    }

    #[test]
    fn rotation_brings_the_far_country_under_the_cursor() {
        let countries = dataset();
        let (mesh, _) = build_globe_mesh(&countries, &BuildOptions::default());
        let mut globe = Globe::new(1.0);
        let camera = front_camera();
        let mut picker = Picker::new(&countries);

        // Rotating by a moves lng x to lng x + a; Country B's center at
        // lng 80 reaches the front (lng -90) with a = -170 degrees.
        globe.rotate_by((-90.0f64 - 80.0).to_radians());
        let hit = picker
            .pick(&countries, &mesh, &globe, &camera, (200, 200), (100.0, 100.0))
            .expect("pick after rotation");
        assert_eq!(hit.code, "BBB");
    }
}
