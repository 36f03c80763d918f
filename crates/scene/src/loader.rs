use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use vrshell_render::MeshBuffers;

use crate::graph::{NodeId, Scene, SceneError};

/// Errors emitted while populating a model group.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No model is registered under the requested name.
    #[error("model not found: {0}")]
    NotFound(String),
    /// Attaching the loaded geometry failed.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Populates a target group with the nodes of a named model.
///
/// Loaders may finish at any time; callers only hand over the group that the
/// model should appear under.
pub trait ModelLoader {
    /// Load `file_name` and attach its nodes under `target`.
    fn load_model(
        &mut self,
        scene: &mut Scene,
        file_name: &str,
        target: NodeId,
    ) -> Result<(), ModelError>;
}

/// Loader serving meshes registered in memory.
#[derive(Debug, Default, Clone)]
pub struct MeshLibrary {
    meshes: HashMap<String, Arc<MeshBuffers>>,
}

impl MeshLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mesh` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, mesh: MeshBuffers) {
        self.meshes.insert(name.into(), Arc::new(mesh));
    }

    /// Whether a mesh is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }

    /// Number of registered meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl ModelLoader for MeshLibrary {
    fn load_model(
        &mut self,
        scene: &mut Scene,
        file_name: &str,
        target: NodeId,
    ) -> Result<(), ModelError> {
        let mesh = self
            .meshes
            .get(file_name)
            .cloned()
            .ok_or_else(|| ModelError::NotFound(file_name.to_string()))?;
        let geometry = scene.create_geometry(mesh);
        scene.add_child(target, geometry)?;
        debug!(model = file_name, %target, "model attached");
        Ok(())
    }
}
