//! Interactive widget surfaces for the VR shell.
//!
//! Widgets are flat quads placed in world space. Controllers point at them
//! with rays; hits are mapped back into texture pixels so content can react.
//!
//! # Features
//!
//! - **Quads**: double-sided textured rectangles with ray intersection and
//!   world-to-texture coordinate mapping
//! - **Resizer**: bars and circular handles framing a quad, with proximity
//!   hit-testing
//! - **Pointer rays**: rays derived from controller poses plus nearest-hit picking
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use vrshell_scene::Scene;
//! use vrshell_ui3d::{Quad, Ray};
//!
//! let mut scene = Scene::new();
//! let mut quad = Quad::create(&mut scene, Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0))
//!     .expect("fresh scene");
//! quad.set_texture_size(800, 600);
//!
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
//! let hit = quad.test_intersection(&scene, ray.origin, ray.direction, false).unwrap();
//! assert!(hit.is_inside);
//! assert_eq!(quad.convert_to_quad_coordinates(hit.point), (400.0, 300.0));
//! ```

pub mod components;
pub mod interaction;

pub use components::quad::{Quad, QuadHit, ScaleMode};
pub use components::resizer::{
    ResizeBar, ResizeHandle, ResizeMode, WidgetResizer, ACTIVE_COLOR, BAR_SIZE, DEFAULT_COLOR,
    HANDLE_RADIUS,
};
pub use interaction::{raycast_quads, Ray};
