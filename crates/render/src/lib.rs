#![warn(missing_docs)]
//! Procedural meshes and colors shared by the controller and widget layers.
//!
//! Everything here is pure data: builders return [`MeshBuffers`] which the
//! scene graph references from geometry nodes.

mod color;
mod mesh;

pub use color::Color;
pub use mesh::{
    build_beam_mesh, build_handle_disk, build_quad_mesh, Face, MeshBuffers, MeshHash, MeshVertex,
    BEAM_HALF_SIZE, BEAM_LENGTH, DEFAULT_DISK_SIDES,
};
