pub mod build;
pub mod cache;
pub mod lod;
pub mod mesh;
pub mod subdivide;
pub mod tessellate;
pub mod weld;

pub use build::*;
pub use cache::*;
pub use lod::*;
pub use mesh::*;
pub use subdivide::*;
pub use tessellate::*;
pub use weld::*;
