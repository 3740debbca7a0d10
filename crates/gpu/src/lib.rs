//! Offscreen id rendering for picking.
//!
//! The picking path renders country ids instead of colors: each triangle is
//! shaded with its country id encoded in the red/green channels, the pixel
//! under the cursor is read back and decoded. Rendering a 1x1 target with a
//! view offset keeps the readback to a single pixel.

pub mod camera;
pub mod capability;
pub mod id_pass;
pub mod target;

pub use camera::*;
pub use capability::*;
pub use id_pass::*;
pub use target::*;
