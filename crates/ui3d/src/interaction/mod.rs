//! Pointer interaction with widget surfaces.

pub mod raycaster;

pub use raycaster::{raycast_quads, Ray};
