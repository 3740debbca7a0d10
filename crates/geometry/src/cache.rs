//! Memoized globe meshes.
//!
//! Rebuilding the country mesh is by far the most expensive CPU step, and
//! LOD switches during camera movement would trigger it every few seconds.
//! The cache keys finished meshes by dataset version, LOD level and sphere
//! radius; a key hit returns the stored mesh without touching the
//! tessellator.

use std::collections::BTreeMap;

use crate::build::{BuildOptions, BuildStats, build_globe_mesh};
use crate::lod::{LodConfig, LodLevel};
use crate::mesh::MeshBuffers;
use formats::country::CountrySet;
use foundation::math::StableF64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeometryKey {
    pub dataset_version: String,
    pub lod: LodLevel,
    pub radius: StableF64,
}

#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: BTreeMap<GeometryKey, (MeshBuffers, BuildStats)>,
    build_count: usize,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the mesh for this dataset/LOD/radius, building it on first use.
    pub fn get_or_build(
        &mut self,
        countries: &CountrySet,
        level: LodLevel,
        options: &BuildOptions,
    ) -> &(MeshBuffers, BuildStats) {
        let key = GeometryKey {
            dataset_version: countries.dataset_version().to_string(),
            lod: level,
            radius: StableF64(options.radius),
        };
        let build_count = &mut self.build_count;
        self.entries.entry(key).or_insert_with(|| {
            *build_count += 1;
            let options = BuildOptions {
                lod: LodConfig::for_level(level).scaled_to_radius(options.radius),
                ..options.clone()
            };
            build_globe_mesh(countries, &options)
        })
    }

    /// How many meshes were actually built (cache misses).
    pub fn build_count(&self) -> usize {
        self.build_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop meshes for datasets other than the one currently loaded.
    pub fn retain_dataset(&mut self, dataset_version: &str) {
        self.entries
            .retain(|key, _| key.dataset_version == dataset_version);
    }
}
