//! CPU-side geometry for whatever draws the frame
//!
//! The browser host uploads the flattened triangle list from
//! [`build_scene`] straight into a typed array; no GPU API is assumed here.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::build_scene;
pub use vertex::{Vertex, flatten};
