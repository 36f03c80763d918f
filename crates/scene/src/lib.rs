#![warn(missing_docs)]
//! In-memory scene graph used by the controller and widget layers.
//!
//! Nodes live in an arena owned by [`Scene`] and are addressed through
//! [`NodeId`] handles. The graph supports the small set of node kinds the
//! shell needs: plain groups, toggles (per-child visibility switches),
//! transforms and geometry leaves. A node may have several parents, which is
//! how one beam mesh is shared between every controller.

mod graph;
mod loader;
mod state;

pub use graph::{NodeId, NodeKind, Scene, SceneError};
pub use loader::{MeshLibrary, ModelError, ModelLoader};
pub use state::{Material, RenderState, TextureHandle};
