//! Country boundary features.
//!
//! Ids are positional: geometry index + 1, with 0 reserved for ocean. The
//! same ordered dataset is used to generate the country-id raster, so the
//! loader also reports the blake3 hash of the topology bytes as the dataset
//! version; artifacts carry the hash and a mismatch fails loudly instead of
//! silently desyncing ids.

use serde::{Deserialize, Serialize};

use crate::topojson::{ArcRing, TopoGeometryKind, TopoJsonError, Topology};

/// `(lng, lat)` in degrees, GeoJSON axis order.
pub type LngLat = (f64, f64);

/// One polygon: ring 0 is the exterior boundary, the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<LngLat>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    /// 1-based positional id; 0 is reserved for "no country".
    pub id: u16,
    /// External identifier from the dataset, or the index as a string.
    pub code: String,
    pub name: String,
    pub polygons: Vec<Polygon>,
}

#[derive(Debug)]
pub enum CountryLoadError {
    Topology(TopoJsonError),
    TooManyCountries { count: usize },
}

impl std::fmt::Display for CountryLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountryLoadError::Topology(e) => write!(f, "topology error: {e}"),
            CountryLoadError::TooManyCountries { count } => {
                write!(f, "{count} countries exceed the u16 id space")
            }
        }
    }
}

impl std::error::Error for CountryLoadError {}

/// The loaded, immutable country list plus its dataset version.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySet {
    features: Vec<CountryFeature>,
    dataset_version: String,
}

impl CountrySet {
    /// Load countries from a TopoJSON payload.
    ///
    /// Deterministic: the same payload always yields the same id mapping.
    /// Geometries that are not polygons still occupy their positional id so
    /// the mapping never shifts; rings with fewer than 3 distinct points
    /// are dropped without failing the load.
    pub fn from_topojson_str(payload: &str, object: &str) -> Result<Self, CountryLoadError> {
        let topology =
            Topology::from_json_str(payload).map_err(CountryLoadError::Topology)?;
        let dataset_version = blake3::hash(payload.as_bytes()).to_hex().to_string();
        Self::from_topology(&topology, object, dataset_version)
    }

    pub fn from_topology(
        topology: &Topology,
        object: &str,
        dataset_version: String,
    ) -> Result<Self, CountryLoadError> {
        let geometries = topology.object(object).map_err(CountryLoadError::Topology)?;
        if geometries.len() >= u16::MAX as usize {
            return Err(CountryLoadError::TooManyCountries {
                count: geometries.len(),
            });
        }

        let mut features = Vec::with_capacity(geometries.len());
        for (index, geometry) in geometries.iter().enumerate() {
            let code = geometry
                .id
                .clone()
                .unwrap_or_else(|| index.to_string());
            let name = geometry
                .name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string());

            let ring_sets: Vec<&Vec<ArcRing>> = match &geometry.kind {
                TopoGeometryKind::Polygon(rings) => vec![rings],
                TopoGeometryKind::MultiPolygon(polys) => polys.iter().collect(),
                TopoGeometryKind::Unsupported => Vec::new(),
            };

            let mut polygons = Vec::with_capacity(ring_sets.len());
            for ring_refs in ring_sets {
                let mut rings = Vec::with_capacity(ring_refs.len());
                for refs in ring_refs {
                    let ring = topology
                        .ring_coordinates(refs)
                        .map_err(CountryLoadError::Topology)?;
                    if distinct_points(&ring) >= 3 {
                        rings.push(ring);
                    } else if rings.is_empty() {
                        // Degenerate exterior: the whole polygon is unusable.
                        break;
                    }
                }
                if !rings.is_empty() {
                    polygons.push(Polygon { rings });
                }
            }

            features.push(CountryFeature {
                id: (index + 1) as u16,
                code,
                name,
                polygons,
            });
        }

        Ok(Self {
            features,
            dataset_version,
        })
    }

    /// Assemble a set directly from features, bypassing TopoJSON. Used by
    /// tests and synthetic fixtures; callers are responsible for keeping
    /// ids positional.
    pub fn from_features(features: Vec<CountryFeature>, dataset_version: String) -> Self {
        Self {
            features,
            dataset_version,
        }
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    /// Blake3 hex of the topology payload this set was loaded from.
    pub fn dataset_version(&self) -> &str {
        &self.dataset_version
    }

    pub fn by_id(&self, id: u16) -> Option<&CountryFeature> {
        if id == 0 {
            return None;
        }
        self.features.get(id as usize - 1)
    }

    pub fn index_entries(&self) -> Vec<CountryIndexEntry> {
        self.features
            .iter()
            .map(|f| CountryIndexEntry {
                id: f.id,
                code: f.code.clone(),
                name: f.name.clone(),
            })
            .collect()
    }
}

/// One row of the sidecar index written next to the generated raster, so a
/// raster id resolves to code/name without reloading the topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryIndexEntry {
    pub id: u16,
    pub code: String,
    pub name: String,
}

fn distinct_points(ring: &[LngLat]) -> usize {
    let mut count = 0;
    for (i, p) in ring.iter().enumerate() {
        if !ring[..i].contains(p) {
            count += 1;
        }
    }
    count
}
