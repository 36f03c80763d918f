use std::fmt;
use std::sync::Arc;

use glam::Mat4;
use thiserror::Error;
use vrshell_render::MeshBuffers;

use crate::state::{Material, RenderState, TextureHandle};

/// Handle to a node stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain container.
    Group,
    /// Container with a visibility switch per child.
    Toggle,
    /// Container applying a local transform to its children.
    Transform,
    /// Leaf holding a mesh and its render state.
    Geometry,
}

impl NodeKind {
    fn is_container(self) -> bool {
        !matches!(self, NodeKind::Geometry)
    }
}

/// Errors raised by structural scene operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The handle does not belong to this scene.
    #[error("unknown scene node {0}")]
    UnknownNode(NodeId),
    /// The node exists but has the wrong kind for the operation.
    #[error("scene node {node} is a {found:?}, expected {expected:?}")]
    WrongKind {
        /// Offending node.
        node: NodeId,
        /// Kind the operation requires.
        expected: NodeKind,
        /// Kind the node actually has.
        found: NodeKind,
    },
    /// Geometry nodes cannot have children.
    #[error("scene node {0} is a leaf and cannot hold children")]
    LeafParent(NodeId),
    /// The child is not attached to the given parent.
    #[error("scene node {child} is not a child of {parent}")]
    NotAChild {
        /// Parent that was queried.
        parent: NodeId,
        /// Child that was expected under it.
        child: NodeId,
    },
    /// Attaching the child would make the graph cyclic.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
}

#[derive(Debug, Clone)]
struct GeometryData {
    mesh: Arc<MeshBuffers>,
    render_state: RenderState,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
    /// Toggle only: children currently switched off.
    disabled: Vec<NodeId>,
    local: Mat4,
    geometry: Option<GeometryData>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parents: Vec::new(),
            children: Vec::new(),
            disabled: Vec::new(),
            local: Mat4::IDENTITY,
            geometry: None,
        }
    }
}

/// Arena-backed scene graph.
///
/// Nodes are never freed; detaching a subtree with
/// [`Scene::remove_from_parents`] leaves its handles valid so it can be
/// re-attached later.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a plain group node.
    pub fn create_group(&mut self) -> NodeId {
        self.push(Node::new(NodeKind::Group))
    }

    /// Create a toggle node.
    pub fn create_toggle(&mut self) -> NodeId {
        self.push(Node::new(NodeKind::Toggle))
    }

    /// Create a transform node initialised to identity.
    pub fn create_transform(&mut self) -> NodeId {
        self.push(Node::new(NodeKind::Transform))
    }

    /// Create a geometry leaf referencing `mesh`.
    pub fn create_geometry(&mut self, mesh: Arc<MeshBuffers>) -> NodeId {
        let mut node = Node::new(NodeKind::Geometry);
        node.geometry = Some(GeometryData {
            mesh,
            render_state: RenderState::default(),
        });
        self.push(node)
    }

    /// Kind of `id`, if it exists.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id.index()).map(|node| node.kind)
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Child at `index` under `id`.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Parents of `id`.
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map(|node| node.parents.as_slice())
            .unwrap_or(&[])
    }

    /// Attach `child` under `parent`. Attaching an existing child is a no-op.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let parent_kind = self.node(parent)?.kind;
        self.node(child)?;
        if !parent_kind.is_container() {
            return Err(SceneError::LeafParent(parent));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        if self.nodes[parent.index()].children.contains(&child) {
            return Ok(());
        }
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parents.push(parent);
        Ok(())
    }

    /// Detach `id` from every parent it is attached to.
    pub fn remove_from_parents(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parents = std::mem::take(&mut self.node_mut(id)?.parents);
        for parent in parents {
            let node = &mut self.nodes[parent.index()];
            node.children.retain(|child| *child != id);
            node.disabled.retain(|child| *child != id);
        }
        Ok(())
    }

    /// Detach `child` from `parent` only, keeping its other parents.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(child)?;
        let node = self.node_mut(parent)?;
        if !node.children.contains(&child) {
            return Err(SceneError::NotAChild { parent, child });
        }
        node.children.retain(|id| *id != child);
        node.disabled.retain(|id| *id != child);
        self.nodes[child.index()].parents.retain(|id| *id != parent);
        Ok(())
    }

    /// Enable or disable a single child of a toggle.
    pub fn toggle_child(
        &mut self,
        toggle: NodeId,
        child: NodeId,
        enabled: bool,
    ) -> Result<(), SceneError> {
        let node = self.expect_kind_mut(toggle, NodeKind::Toggle)?;
        if !node.children.contains(&child) {
            return Err(SceneError::NotAChild {
                parent: toggle,
                child,
            });
        }
        node.disabled.retain(|id| *id != child);
        if !enabled {
            node.disabled.push(child);
        }
        Ok(())
    }

    /// Enable or disable every child of a toggle.
    pub fn toggle_all(&mut self, toggle: NodeId, enabled: bool) -> Result<(), SceneError> {
        let node = self.expect_kind_mut(toggle, NodeKind::Toggle)?;
        node.disabled = if enabled {
            Vec::new()
        } else {
            node.children.clone()
        };
        Ok(())
    }

    /// Whether `child` is attached under `parent` and not switched off by it.
    pub fn is_enabled(&self, parent: NodeId, child: NodeId) -> bool {
        self.nodes.get(parent.index()).is_some_and(|node| {
            node.children.contains(&child) && !node.disabled.contains(&child)
        })
    }

    /// Whether every toggle on the first-parent chain above `id` enables it.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.parents(current).first().copied() {
            if !self.is_enabled(parent, current) {
                return false;
            }
            current = parent;
        }
        self.nodes.get(id.index()).is_some()
    }

    /// Set the local matrix of a transform node.
    pub fn set_transform(&mut self, id: NodeId, transform: Mat4) -> Result<(), SceneError> {
        self.expect_kind_mut(id, NodeKind::Transform)?.local = transform;
        Ok(())
    }

    /// Local matrix of a transform node.
    pub fn transform(&self, id: NodeId) -> Option<Mat4> {
        self.nodes
            .get(id.index())
            .filter(|node| node.kind == NodeKind::Transform)
            .map(|node| node.local)
    }

    /// Accumulated transform of `id`, following the first parent up to the root.
    ///
    /// The node's own local matrix is included when it is a transform.
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut result = self.transform(id).unwrap_or(Mat4::IDENTITY);
        let mut current = id;
        while let Some(parent) = self.parents(current).first().copied() {
            if let Some(local) = self.transform(parent) {
                result = local * result;
            }
            current = parent;
        }
        result
    }

    /// Mesh referenced by a geometry node.
    pub fn mesh(&self, id: NodeId) -> Option<&Arc<MeshBuffers>> {
        self.nodes
            .get(id.index())
            .and_then(|node| node.geometry.as_ref())
            .map(|geometry| &geometry.mesh)
    }

    /// Render state of a geometry node.
    pub fn render_state(&self, id: NodeId) -> Option<&RenderState> {
        self.nodes
            .get(id.index())
            .and_then(|node| node.geometry.as_ref())
            .map(|geometry| &geometry.render_state)
    }

    /// Replace the material of a geometry node.
    pub fn set_material(&mut self, id: NodeId, material: Material) -> Result<(), SceneError> {
        self.render_state_mut(id)?.material = material;
        Ok(())
    }

    /// Enable or disable lighting for a geometry node.
    pub fn set_lights_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), SceneError> {
        self.render_state_mut(id)?.lights_enabled = enabled;
        Ok(())
    }

    /// Bind (or unbind) a texture on a geometry node.
    pub fn set_texture(
        &mut self,
        id: NodeId,
        texture: Option<TextureHandle>,
    ) -> Result<(), SceneError> {
        self.render_state_mut(id)?.texture = texture;
        Ok(())
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id.index()).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(SceneError::UnknownNode(id))
    }

    fn expect_kind_mut(&mut self, id: NodeId, expected: NodeKind) -> Result<&mut Node, SceneError> {
        let node = self.node_mut(id)?;
        if node.kind != expected {
            return Err(SceneError::WrongKind {
                node: id,
                expected,
                found: node.kind,
            });
        }
        Ok(node)
    }

    fn render_state_mut(&mut self, id: NodeId) -> Result<&mut RenderState, SceneError> {
        let node = self.expect_kind_mut(id, NodeKind::Geometry)?;
        match node.geometry.as_mut() {
            Some(geometry) => Ok(&mut geometry.render_state),
            None => Err(SceneError::UnknownNode(id)),
        }
    }

    /// Whether `ancestor` is reachable from `id` through any parent link.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            for parent in self.parents(current) {
                if *parent == ancestor {
                    return true;
                }
                pending.push(*parent);
            }
        }
        false
    }
}
