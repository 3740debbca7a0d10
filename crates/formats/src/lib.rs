pub mod country;
pub mod raster;
pub mod topojson;

pub use country::*;
pub use raster::*;
pub use topojson::*;
