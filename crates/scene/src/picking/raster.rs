//! Precomputed-raster picking.
//!
//! A constant-time table lookup into the offline country-id raster. The
//! raster embeds the hash of the dataset it was baked from; a picker refuses
//! to pair with a mismatched dataset rather than return stale ids.

use formats::country::CountrySet;
use formats::raster::{CountryIdRaster, RasterError};

#[derive(Debug, Clone, PartialEq)]
pub struct RasterPicker {
    raster: CountryIdRaster,
}

impl RasterPicker {
    /// Pair a raster with the dataset it must describe.
    pub fn new(raster: CountryIdRaster, countries: &CountrySet) -> Result<Self, RasterError> {
        raster.verify_dataset(countries.dataset_version())?;
        Ok(Self { raster })
    }

    pub fn pick(&self, lat_deg: f64, lng_deg: f64) -> Option<u16> {
        self.raster.id_at_lat_lng(lat_deg, lng_deg)
    }
}
