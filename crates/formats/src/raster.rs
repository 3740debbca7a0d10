//! Country-id raster artifact (GCIR).
//!
//! A fixed equirectangular grid where every pixel holds the id of the
//! country covering it (0 = ocean). Generated offline by the tools crate
//! from the same ordered dataset as [`crate::country::CountrySet`]; the
//! embedded blake3 dataset hash is what keeps the two in sync.
//!
//! Layout (little-endian):
//! ```text
//! magic    [u8; 4]   "GCIR"
//! version  u16
//! flags    u16       reserved, 0
//! width    u32
//! height   u32
//! dataset  [u8; 32]  blake3 of the topology payload
//! ids      [u16; width * height]   row-major, north at row 0
//! ```

const MAGIC: [u8; 4] = *b"GCIR";
const VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 2 + 4 + 4 + 32;

#[derive(Debug)]
pub enum RasterError {
    UnexpectedEof,
    InvalidMagic,
    UnsupportedVersion { found: u16 },
    SizeMismatch { expected: usize, found: usize },
    EmptyRaster,
    DatasetMismatch { raster: String, loaded: String },
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::UnexpectedEof => write!(f, "unexpected EOF"),
            RasterError::InvalidMagic => write!(f, "invalid GCIR magic"),
            RasterError::UnsupportedVersion { found } => {
                write!(f, "unsupported GCIR version: {found}")
            }
            RasterError::SizeMismatch { expected, found } => {
                write!(f, "id payload holds {found} entries, header implies {expected}")
            }
            RasterError::EmptyRaster => write!(f, "raster dimensions must be non-zero"),
            RasterError::DatasetMismatch { raster, loaded } => {
                write!(
                    f,
                    "raster was generated from dataset {raster}, loaded features are {loaded}"
                )
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// Read-only country-id grid, built once and shared for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryIdRaster {
    width: u32,
    height: u32,
    dataset_hash: [u8; 32],
    ids: Vec<u16>,
}

impl CountryIdRaster {
    pub fn new(
        width: u32,
        height: u32,
        dataset_hash: [u8; 32],
        ids: Vec<u16>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyRaster);
        }
        let expected = width as usize * height as usize;
        if ids.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                found: ids.len(),
            });
        }
        Ok(Self {
            width,
            height,
            dataset_hash,
            ids,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dataset_hash_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in &self.dataset_hash {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    /// Fails loudly when the raster was generated from a different topology
    /// than the loaded feature set.
    pub fn verify_dataset(&self, dataset_version: &str) -> Result<(), RasterError> {
        let own = self.dataset_hash_hex();
        if own != dataset_version {
            return Err(RasterError::DatasetMismatch {
                raster: own,
                loaded: dataset_version.to_string(),
            });
        }
        Ok(())
    }

    pub fn id_at_pixel(&self, x: u32, y: u32) -> u16 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.ids[y as usize * self.width as usize + x as usize]
    }

    /// Equirectangular lookup; pixel coordinates are floored then clamped
    /// to the image bounds. Returns `None` over ocean (id 0).
    pub fn id_at_lat_lng(&self, lat_deg: f64, lng_deg: f64) -> Option<u16> {
        let x = ((lng_deg + 180.0) / 360.0 * self.width as f64).floor();
        let y = ((90.0 - lat_deg) / 180.0 * self.height as f64).floor();

        let x = (x.max(0.0) as u32).min(self.width - 1);
        let y = (y.max(0.0) as u32).min(self.height - 1);

        match self.id_at_pixel(x, y) {
            0 => None,
            id => Some(id),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.ids.len() * 2);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.dataset_hash);
        for id in &self.ids {
            out.extend_from_slice(&id.to_le_bytes());
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        if bytes.len() < HEADER_LEN {
            return Err(RasterError::UnexpectedEof);
        }
        if bytes[0..4] != MAGIC {
            return Err(RasterError::InvalidMagic);
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(RasterError::UnsupportedVersion { found: version });
        }

        let width = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let height = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        let mut dataset_hash = [0u8; 32];
        dataset_hash.copy_from_slice(&bytes[16..48]);

        let payload = &bytes[HEADER_LEN..];
        if payload.len() % 2 != 0 {
            return Err(RasterError::UnexpectedEof);
        }
        let ids: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();

        Self::new(width, height, dataset_hash, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryIdRaster, RasterError};

    fn checker_raster() -> CountryIdRaster {
        // 4x2 grid: west half id 1, east half id 2, except the NW corner
        // pixel which is ocean.
        let ids = vec![0, 1, 2, 2, 1, 1, 2, 2];
        CountryIdRaster::new(4, 2, [7u8; 32], ids).expect("raster")
    }

    #[test]
    fn encode_decode_round_trip() {
        let raster = checker_raster();
        let decoded = CountryIdRaster::decode(&raster.encode()).expect("decode");
        assert_eq!(decoded, raster);
    }

    #[test]
    fn lat_lng_maps_equirectangular_with_clamping() {
        let raster = checker_raster();
        // lng -90 -> x=1, lat 45 -> y=0.
        assert_eq!(raster.id_at_lat_lng(45.0, -90.0), Some(1));
        // East half.
        assert_eq!(raster.id_at_lat_lng(-45.0, 90.0), Some(2));
        // Exactly on the far edges clamps into range instead of indexing out.
        assert_eq!(raster.id_at_lat_lng(-90.0, 180.0), Some(2));
        assert_eq!(raster.id_at_lat_lng(90.0, -180.0), None); // ocean corner
    }

    #[test]
    fn ocean_decodes_to_none() {
        let raster = checker_raster();
        assert_eq!(raster.id_at_lat_lng(89.0, -179.0), None);
    }

    #[test]
    fn dataset_verification_is_loud() {
        let raster = checker_raster();
        let own = raster.dataset_hash_hex();
        assert!(raster.verify_dataset(&own).is_ok());
        assert!(matches!(
            raster.verify_dataset("deadbeef"),
            Err(RasterError::DatasetMismatch { .. })
        ));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(matches!(
            CountryIdRaster::decode(b"GCIR"),
            Err(RasterError::UnexpectedEof)
        ));

        let mut bytes = checker_raster().encode();
        bytes[0] = b'X';
        assert!(matches!(
            CountryIdRaster::decode(&bytes),
            Err(RasterError::InvalidMagic)
        ));

        let mut bytes = checker_raster().encode();
        bytes[4] = 9;
        assert!(matches!(
            CountryIdRaster::decode(&bytes),
            Err(RasterError::UnsupportedVersion { found: 9 })
        ));

        let mut bytes = checker_raster().encode();
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            CountryIdRaster::decode(&bytes),
            Err(RasterError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            CountryIdRaster::new(0, 2, [0; 32], vec![]),
            Err(RasterError::EmptyRaster)
        ));
    }
}
