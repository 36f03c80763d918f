//! 3D UI Components
//!
//! Content surfaces and the overlays that frame them.

pub mod quad;
pub mod resizer;

pub use quad::{Quad, QuadHit, ScaleMode};
pub use resizer::{ResizeBar, ResizeHandle, ResizeMode, WidgetResizer};
