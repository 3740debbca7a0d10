//! Whole-globe mesh construction.
//!
//! Tessellates every country polygon onto the sphere, subdivides to the
//! requested LOD and welds duplicated border-interior vertices. A polygon
//! that fails tessellation (antimeridian crossing, degenerate ring) is
//! skipped and counted; one bad ring must not take the globe down.

use crate::lod::LodConfig;
use crate::mesh::MeshBuffers;
use crate::subdivide::subdivide_spherical;
use crate::tessellate::{EarcutTriangulator, TessellationOptions, Triangulator, tessellate_polygon};
use crate::weld::{WeldOptions, weld_vertices};
use formats::country::CountrySet;

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub tessellation: TessellationOptions,
    pub weld: WeldOptions,
    pub lod: LodConfig,
    pub radius: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tessellation: TessellationOptions::default(),
            weld: WeldOptions::default(),
            lod: LodConfig::for_level(crate::lod::LodLevel::Medium),
            radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildStats {
    pub polygons_in: usize,
    pub polygons_skipped: usize,
    pub triangles: usize,
    pub subdivision_passes: u32,
    pub vertices_welded: usize,
}

/// Build the full country mesh for a dataset.
///
/// Deterministic for a given dataset and options: features are visited in
/// load order and every stage below is order-stable.
pub fn build_globe_mesh(countries: &CountrySet, options: &BuildOptions) -> (MeshBuffers, BuildStats) {
    build_globe_mesh_with(&EarcutTriangulator, countries, options)
}

/// Same pipeline with a caller-supplied triangulator, for tests and tools.
pub fn build_globe_mesh_with<T: Triangulator>(
    triangulator: &T,
    countries: &CountrySet,
    options: &BuildOptions,
) -> (MeshBuffers, BuildStats) {
    let mut mesh = MeshBuffers::new();
    let mut stats = BuildStats::default();

    for feature in countries.features() {
        for polygon in &feature.polygons {
            stats.polygons_in += 1;
            match tessellate_polygon(
                triangulator,
                polygon,
                feature.id,
                options.radius,
                &options.tessellation,
            ) {
                Ok(part) => mesh.append(&part),
                Err(_) => stats.polygons_skipped += 1,
            }
        }
    }

    stats.subdivision_passes = subdivide_spherical(&mut mesh, options.radius, options.lod);
    let weld = weld_vertices(&mut mesh, &options.weld);
    stats.vertices_welded = weld.vertices_merged;
    stats.triangles = mesh.triangle_count();
    (mesh, stats)
}

#[cfg(test)]
mod tests {
    use super::{BuildOptions, build_globe_mesh};
    use crate::lod::LodConfig;
    use formats::country::{CountryFeature, CountrySet, Polygon};
    use pretty_assertions::assert_eq;

    fn square(lng0: f64, lat0: f64, side: f64) -> Polygon {
        Polygon {
            rings: vec![vec![
                (lng0, lat0),
                (lng0 + side, lat0),
                (lng0 + side, lat0 + side),
                (lng0, lat0 + side),
                (lng0, lat0),
            ]],
        }
    }

    fn two_country_set() -> CountrySet {
        CountrySet::from_features(
            vec![
                CountryFeature {
                    id: 1,
                    code: "AAA".to_string(),
                    name: "Country A".to_string(),
                    polygons: vec![square(0.0, 0.0, 10.0)],
                },
                CountryFeature {
                    id: 2,
                    code: "BBB".to_string(),
                    name: "Country B".to_string(),
                    polygons: vec![square(20.0, 0.0, 10.0)],
                },
            ],
            "test-dataset".to_string(),
        )
    }

    #[test]
    fn builds_all_polygons_of_a_clean_dataset() {
        let countries = two_country_set();
        let (mesh, stats) = build_globe_mesh(&countries, &BuildOptions::default());
        assert_eq!(stats.polygons_in, 2);
        assert_eq!(stats.polygons_skipped, 0);
        assert_eq!(stats.triangles, mesh.triangle_count());
        assert!(stats.subdivision_passes > 0);
        assert!(mesh.triangle_count() >= 4);

        for t in 0..mesh.triangle_count() {
            let id = mesh.triangle_country_id(t);
            assert!(id == Some(1) || id == Some(2));
        }
    }

    #[test]
    fn antimeridian_polygon_is_skipped_not_fatal() {
        let mut countries = two_country_set();
        let mut features = countries.features().to_vec();
        features.push(CountryFeature {
            id: 3,
            code: "CCC".to_string(),
            name: "Wrapper".to_string(),
            polygons: vec![Polygon {
                rings: vec![vec![
                    (170.0, 0.0),
                    (-170.0, 0.0),
                    (-170.0, 10.0),
                    (170.0, 10.0),
                    (170.0, 0.0),
                ]],
            }],
        });
        countries = CountrySet::from_features(features, "test-dataset".to_string());

        let (mesh, stats) = build_globe_mesh(&countries, &BuildOptions::default());
        assert_eq!(stats.polygons_in, 3);
        assert_eq!(stats.polygons_skipped, 1);
        for t in 0..mesh.triangle_count() {
            assert_ne!(mesh.triangle_country_id(t), Some(3));
        }
    }

    #[test]
    fn output_is_deterministic() {
        let countries = two_country_set();
        let options = BuildOptions::default();
        let (first, _) = build_globe_mesh(&countries, &options);
        let (second, _) = build_globe_mesh(&countries, &options);
        assert_eq!(first, second);
        assert_eq!(
            first.boundary_edge_positions(),
            second.boundary_edge_positions()
        );
    }

    #[test]
    fn denser_lod_produces_more_triangles() {
        let countries = two_country_set();
        let coarse = BuildOptions {
            lod: LodConfig {
                max_edge_length: 0.3,
                max_depth: 3,
            },
            ..BuildOptions::default()
        };
        let fine = BuildOptions {
            lod: LodConfig {
                max_edge_length: 0.05,
                max_depth: 6,
            },
            ..BuildOptions::default()
        };
        let (_, coarse_stats) = build_globe_mesh(&countries, &coarse);
        let (_, fine_stats) = build_globe_mesh(&countries, &fine);
        assert!(fine_stats.triangles > coarse_stats.triangles);
        assert!(fine_stats.subdivision_passes > coarse_stats.subdivision_passes);
    }
}
