//! Registry of controllers and their scene nodes.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use tracing::{debug, error, warn};
use vrshell_render::{build_beam_mesh, Color};
use vrshell_scene::{Material, ModelError, ModelLoader, NodeId, NodeKind, Scene, SceneError};

use crate::controller::{
    effective_visibility, Button, CapabilityFlags, Controller, ControllerNodes,
    CONTROLLER_MAX_AXES, CONTROLLER_MAX_BUTTON_COUNT,
};
use crate::delegate::ControllerDelegate;
use crate::pointer::Pointer;

/// State of a model group slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSlot {
    /// Nothing requested for this index yet.
    Empty,
    /// Group that holds (or will hold) the model's nodes.
    Ready(NodeId),
    /// Loading failed; controllers asking for this model stay unconfigured.
    Failed,
}

/// Owns every controller slot, the per-model groups and the shared beam geometry.
///
/// Controller transforms hang under a single toggle root so the whole set can be
/// hidden at once. Pointer cursors go into a separate container supplied by the
/// caller, since they are placed in world space rather than under the device.
#[derive(Debug)]
pub struct ControllerContainer {
    list: Vec<Controller>,
    root: NodeId,
    pointer_container: Option<NodeId>,
    models: Vec<ModelSlot>,
    beam_model: Option<NodeId>,
    visible: bool,
}

impl ControllerContainer {
    /// Create an empty registry with a fresh root toggle.
    pub fn new(scene: &mut Scene, pointer_container: Option<NodeId>) -> Self {
        Self {
            list: Vec::new(),
            root: scene.create_toggle(),
            pointer_container,
            models: Vec::new(),
            beam_model: None,
            visible: true,
        }
    }

    /// Toggle node parenting every controller transform.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Group that receives each controller's pointer, if any.
    pub fn pointer_container(&self) -> Option<NodeId> {
        self.pointer_container
    }

    /// Shared beam geometry, once [`initialize_beam`](Self::initialize_beam) ran.
    pub fn beam_model(&self) -> Option<NodeId> {
        self.beam_model
    }

    /// Registry-wide visibility switch.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// All slots, indexed by controller index.
    pub fn controllers(&self) -> &[Controller] {
        &self.list
    }

    /// Mutable access to all slots.
    pub fn controllers_mut(&mut self) -> &mut [Controller] {
        &mut self.list
    }

    /// Slot at `index`, if the list reaches that far.
    pub fn controller(&self, index: usize) -> Option<&Controller> {
        self.list.get(index)
    }

    /// Mutable slot at `index`.
    pub fn controller_mut(&mut self, index: usize) -> Option<&mut Controller> {
        self.list.get_mut(index)
    }

    /// State of the model group for `model_index`.
    pub fn model_slot(&self, model_index: usize) -> ModelSlot {
        self.models
            .get(model_index)
            .copied()
            .unwrap_or(ModelSlot::Empty)
    }

    /// Load a controller model into the group for `model_index`.
    ///
    /// A failed load marks the slot so later controllers asking for it are
    /// left unconfigured. Loading again into a failed slot retries with a
    /// fresh group.
    pub fn load_controller_model(
        &mut self,
        scene: &mut Scene,
        model_index: usize,
        loader: &mut dyn ModelLoader,
        file_name: &str,
    ) -> Result<(), ModelError> {
        if self.model_slot(model_index) == ModelSlot::Failed {
            self.models[model_index] = ModelSlot::Empty;
        }
        let ModelSlot::Ready(group) = self.set_up_models_group(scene, model_index) else {
            return Ok(());
        };
        match loader.load_model(scene, file_name, group) {
            Ok(()) => {
                debug!(model_index, file_name, "controller model loaded");
                Ok(())
            }
            Err(err) => {
                error!(model_index, file_name, %err, "Failed to load controller model");
                self.models[model_index] = ModelSlot::Failed;
                Err(err)
            }
        }
    }

    /// Build the shared beam geometry and attach it to every configured controller.
    pub fn initialize_beam(&mut self, scene: &mut Scene) {
        if self.beam_model.is_some() {
            return;
        }
        let beam = scene.create_geometry(Arc::new(build_beam_mesh()));
        report(scene.set_material(beam, Material::flat(Color::WHITE)), "beam material");
        report(scene.set_lights_enabled(beam, false), "beam lighting");
        self.beam_model = Some(beam);

        for controller in &mut self.list {
            let beam_transform = controller.beam_transform_matrix;
            let Some(nodes) = controller.nodes.as_mut() else {
                continue;
            };
            if nodes.beam_toggle.is_some() {
                continue;
            }
            match attach_beam(scene, beam, nodes.transform, beam_transform) {
                Ok((toggle, parent)) => {
                    nodes.beam_toggle = Some(toggle);
                    nodes.beam_parent = Some(parent);
                }
                Err(err) => error!(index = controller.index, %err, "failed to attach beam"),
            }
        }
    }

    /// Show or hide the beam of one controller.
    pub fn set_beam_visible(&mut self, scene: &mut Scene, index: usize, visible: bool) {
        let Some(toggle) = self
            .list
            .get(index)
            .and_then(|controller| controller.nodes.as_ref())
            .and_then(|nodes| nodes.beam_toggle)
        else {
            return;
        };
        report(scene.toggle_all(toggle, visible), "beam visibility");
    }

    /// Global visibility. Showing restores only controllers that are enabled and visible.
    pub fn set_all_visible(&mut self, scene: &mut Scene, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if !visible {
            report(scene.toggle_all(self.root, false), "hide controllers");
        }
        for index in 0..self.list.len() {
            self.sync_visibility(scene, index);
        }
    }

    /// Recolor every beam and pointer cursor.
    pub fn set_pointer_color(&mut self, scene: &mut Scene, color: Color) {
        let material = Material::flat(color);
        for controller in &mut self.list {
            let Some(nodes) = controller.nodes.as_mut() else {
                continue;
            };
            if let Some(parent) = nodes.beam_parent {
                let geometry = scene
                    .children(parent)
                    .iter()
                    .copied()
                    .find(|child| scene.kind(*child) == Some(NodeKind::Geometry));
                if let Some(geometry) = geometry {
                    report(scene.set_material(geometry, material), "beam color");
                }
            }
            report(nodes.pointer.set_pointer_color(scene, color), "pointer color");
        }
    }

    /// Detach every controller from the scene and reset all slots.
    pub fn reset(&mut self, scene: &mut Scene) {
        let beam = self.beam_model;
        for controller in &mut self.list {
            detach(scene, controller, beam);
            controller.reset();
        }
    }

    /// Latch button and touch state of every controller.
    pub fn end_frame(&mut self) {
        for controller in &mut self.list {
            controller.end_frame();
        }
    }

    fn set_up_models_group(&mut self, scene: &mut Scene, model_index: usize) -> ModelSlot {
        if model_index >= self.models.len() {
            self.models.resize(model_index + 1, ModelSlot::Empty);
        }
        if self.models[model_index] == ModelSlot::Empty {
            self.models[model_index] = ModelSlot::Ready(scene.create_group());
        }
        self.models[model_index]
    }

    fn configure(
        &self,
        scene: &mut Scene,
        group: NodeId,
        beam_transform: Mat4,
    ) -> Result<ControllerNodes, SceneError> {
        let transform = scene.create_transform();
        scene.add_child(transform, group)?;

        let pointer = Pointer::create(scene)?;
        let (beam_toggle, beam_parent) = match self.beam_model {
            Some(beam) => {
                let (toggle, parent) = attach_beam(scene, beam, transform, beam_transform)?;
                (Some(toggle), Some(parent))
            }
            None => (None, None),
        };

        scene.add_child(self.root, transform)?;
        scene.toggle_child(self.root, transform, false)?;
        if let Some(container) = self.pointer_container {
            scene.add_child(container, pointer.root())?;
        }

        Ok(ControllerNodes {
            transform,
            beam_toggle,
            beam_parent,
            pointer,
        })
    }

    fn sync_visibility(&mut self, scene: &mut Scene, index: usize) {
        let global = self.visible;
        let root = self.root;
        let Some(controller) = self.list.get(index) else {
            return;
        };
        let Some(nodes) = controller.nodes.as_ref() else {
            return;
        };
        let visible = effective_visibility(global, controller.enabled, controller.visible);
        report(
            scene.toggle_child(root, nodes.transform, visible),
            "controller visibility",
        );
        if !visible {
            report(nodes.pointer.set_visible(scene, false), "pointer visibility");
        }
    }
}

/// Put the shared beam under a fresh toggle on `transform`, hidden.
///
/// Returns the toggle and the beam's direct parent, which is a beam transform
/// only when `beam_transform` is not the identity.
fn attach_beam(
    scene: &mut Scene,
    beam: NodeId,
    transform: NodeId,
    beam_transform: Mat4,
) -> Result<(NodeId, NodeId), SceneError> {
    let toggle = scene.create_toggle();
    let parent = if beam_transform == Mat4::IDENTITY {
        scene.add_child(toggle, beam)?;
        toggle
    } else {
        let beam_parent = scene.create_transform();
        scene.set_transform(beam_parent, beam_transform)?;
        scene.add_child(beam_parent, beam)?;
        scene.add_child(toggle, beam_parent)?;
        beam_parent
    };
    scene.add_child(transform, toggle)?;
    scene.toggle_all(toggle, false)?;
    Ok((toggle, parent))
}

/// Unlink a controller's subtree from the registry and from the shared model
/// group and beam, so neither keeps a dead parent.
fn detach(scene: &mut Scene, controller: &Controller, beam: Option<NodeId>) {
    if let Some(nodes) = controller.nodes.as_ref() {
        if let (Some(beam), Some(parent)) = (beam, nodes.beam_parent) {
            report(scene.remove_child(parent, beam), "detach beam");
        }
        let models: Vec<NodeId> = scene
            .children(nodes.transform)
            .iter()
            .copied()
            .filter(|child| Some(*child) != nodes.beam_toggle)
            .collect();
        for group in models {
            report(scene.remove_child(nodes.transform, group), "detach model");
        }
        report(scene.remove_from_parents(nodes.transform), "detach controller");
        report(
            scene.remove_from_parents(nodes.pointer.root()),
            "detach pointer",
        );
    }
}

fn report(result: Result<(), SceneError>, what: &str) {
    if let Err(err) = result {
        warn!(%err, "{what} failed");
    }
}

impl ControllerDelegate for ControllerContainer {
    fn create_controller_with_beam(
        &mut self,
        scene: &mut Scene,
        index: usize,
        model_index: Option<usize>,
        immersive_name: &str,
        beam_transform: Mat4,
    ) {
        while self.list.len() <= index {
            let next = self.list.len();
            self.list.push(Controller::new(next));
        }
        {
            let controller = &mut self.list[index];
            controller.index = index;
            controller.immersive_name = immersive_name.to_string();
        }
        let Some(model_index) = model_index else {
            return;
        };
        if self.list[index].nodes.is_some() {
            return;
        }

        let ModelSlot::Ready(group) = self.set_up_models_group(scene, model_index) else {
            error!(index, model_index, "Failed to add controller model");
            return;
        };
        match self.configure(scene, group, beam_transform) {
            Ok(nodes) => {
                let controller = &mut self.list[index];
                controller.beam_transform_matrix = beam_transform;
                controller.visible = false;
                controller.nodes = Some(nodes);
                debug!(index, model_index, immersive_name, "controller created");
            }
            Err(err) => error!(index, model_index, %err, "Failed to add controller model"),
        }
        self.sync_visibility(scene, index);
    }

    fn destroy_controller(&mut self, scene: &mut Scene, index: usize) {
        let beam = self.beam_model;
        let Some(controller) = self.list.get_mut(index) else {
            return;
        };
        detach(scene, controller, beam);
        controller.reset();
        debug!(index, "controller destroyed");
    }

    fn controller_count(&self) -> usize {
        self.list.len()
    }

    fn set_capability_flags(&mut self, index: usize, flags: CapabilityFlags) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.device_capabilities = flags;
        }
    }

    fn set_enabled(&mut self, scene: &mut Scene, index: usize, enabled: bool) {
        let Some(controller) = self.list.get_mut(index) else {
            return;
        };
        controller.enabled = enabled;
        if !enabled {
            controller.visible = false;
        }
        self.sync_visibility(scene, index);
    }

    fn set_visible(&mut self, scene: &mut Scene, index: usize, visible: bool) {
        let Some(controller) = self.list.get_mut(index) else {
            return;
        };
        controller.visible = visible;
        self.sync_visibility(scene, index);
    }

    fn set_transform(&mut self, scene: &mut Scene, index: usize, transform: Mat4) {
        let Some(controller) = self.list.get_mut(index) else {
            return;
        };
        controller.transform_matrix = transform;
        if let Some(nodes) = controller.nodes.as_ref() {
            report(scene.set_transform(nodes.transform, transform), "controller transform");
        }
    }

    fn set_button_count(&mut self, index: usize, count: u32) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.num_buttons = count;
        }
    }

    fn set_button_state(
        &mut self,
        index: usize,
        button: Button,
        immersive_index: Option<usize>,
        pressed: bool,
        touched: bool,
        immersive_trigger: Option<f32>,
    ) {
        debug_assert!(
            immersive_index.map_or(true, |i| i < CONTROLLER_MAX_BUTTON_COUNT),
            "immersive index out of range"
        );
        let Some(controller) = self.list.get_mut(index) else {
            return;
        };
        controller.button_state.set(button, pressed);

        let Some(immersive_index) = immersive_index else {
            return;
        };
        if immersive_index < 64 {
            let mask = 1u64 << immersive_index;
            if pressed {
                controller.immersive_pressed_state |= mask;
            } else {
                controller.immersive_pressed_state &= !mask;
            }
            if touched {
                controller.immersive_touched_state |= mask;
            } else {
                controller.immersive_touched_state &= !mask;
            }
        }
        let value = match immersive_trigger {
            Some(value) if value >= 0.0 => value,
            _ if pressed => 1.0,
            _ => 0.0,
        };
        if let Some(slot) = controller.immersive_trigger_values.get_mut(immersive_index) {
            *slot = value;
        }
    }

    fn set_axes(&mut self, index: usize, data: &[f32]) {
        debug_assert!(data.len() <= CONTROLLER_MAX_AXES, "too many axes");
        let Some(controller) = self.list.get_mut(index) else {
            return;
        };
        let count = data.len().min(CONTROLLER_MAX_AXES);
        controller.immersive_axes[..count].copy_from_slice(&data[..count]);
        controller.num_axes = count;
    }

    fn set_left_handed(&mut self, index: usize, left_handed: bool) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.left_handed = left_handed;
        }
    }

    fn set_touch_position(&mut self, index: usize, x: f32, y: f32) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.touched = true;
            controller.touch_x = x;
            controller.touch_y = y;
        }
    }

    fn end_touch(&mut self, index: usize) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.touched = false;
        }
    }

    fn set_scrolled_delta(&mut self, index: usize, dx: f32, dy: f32) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.scroll_delta_x = dx;
            controller.scroll_delta_y = dy;
        }
    }

    fn set_angular_acceleration(&mut self, index: usize, value: Vec3) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.angular_acceleration = value;
        }
    }

    fn set_angular_velocity(&mut self, index: usize, value: Vec3) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.angular_velocity = value;
        }
    }

    fn set_linear_acceleration(&mut self, index: usize, value: Vec3) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.linear_acceleration = value;
        }
    }

    fn set_linear_velocity(&mut self, index: usize, value: Vec3) {
        if let Some(controller) = self.list.get_mut(index) {
            controller.linear_velocity = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrshell_render::build_quad_mesh;
    use vrshell_scene::MeshLibrary;

    struct Fixture {
        scene: Scene,
        pointers: NodeId,
        container: ControllerContainer,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let pointers = scene.create_group();
        let container = ControllerContainer::new(&mut scene, Some(pointers));
        Fixture {
            scene,
            pointers,
            container,
        }
    }

    fn library() -> MeshLibrary {
        let mut library = MeshLibrary::new();
        library.insert("left.obj", build_quad_mesh(Vec3::ZERO, Vec3::ONE));
        library
    }

    fn shown(fx: &Fixture, index: usize) -> bool {
        let nodes = fx.container.controller(index).unwrap().nodes().unwrap();
        fx.scene.is_enabled(fx.container.root(), nodes.transform)
    }

    #[test]
    fn create_grows_list_with_matching_indices() {
        let mut fx = fixture();
        fx.container
            .create_controller(&mut fx.scene, 2, Some(0), "Oculus Touch (Right)");
        assert_eq!(fx.container.controller_count(), 3);
        for (position, controller) in fx.container.controllers().iter().enumerate() {
            assert_eq!(controller.index, position);
        }
        let created = fx.container.controller(2).unwrap();
        assert!(created.is_configured());
        assert_eq!(created.immersive_name, "Oculus Touch (Right)");
        assert!(!fx.container.controller(0).unwrap().is_configured());
    }

    #[test]
    fn create_without_model_leaves_slot_unconfigured() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, None, "");
        assert_eq!(fx.container.controller_count(), 1);
        assert!(!fx.container.controller(0).unwrap().is_configured());
    }

    #[test]
    fn created_controller_starts_hidden_and_attached() {
        let mut fx = fixture();
        let mut loader = library();
        fx.container
            .load_controller_model(&mut fx.scene, 0, &mut loader, "left.obj")
            .unwrap();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "left");

        let nodes = fx.container.controller(0).unwrap().nodes().unwrap().clone();
        assert!(fx.scene.children(fx.container.root()).contains(&nodes.transform));
        assert!(!shown(&fx, 0));
        assert!(fx.scene.children(fx.pointers).contains(&nodes.pointer.root()));
        assert!(!nodes.pointer.is_visible(&fx.scene));
        // Model group sits under the transform with the loaded geometry inside.
        let group = fx.scene.child(nodes.transform, 0).unwrap();
        assert_eq!(fx.scene.children(group).len(), 1);
    }

    #[test]
    fn failed_model_leaves_slot_unconfigured() {
        let mut fx = fixture();
        let mut loader = library();
        let err = fx
            .container
            .load_controller_model(&mut fx.scene, 1, &mut loader, "missing.obj")
            .unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
        assert_eq!(fx.container.model_slot(1), ModelSlot::Failed);

        fx.container.create_controller(&mut fx.scene, 0, Some(1), "right");
        assert_eq!(fx.container.controller_count(), 1);
        assert!(!fx.container.controller(0).unwrap().is_configured());

        // Setters stay harmless on the unconfigured slot.
        fx.container.set_enabled(&mut fx.scene, 0, true);
        fx.container.set_visible(&mut fx.scene, 0, true);
        fx.container
            .set_transform(&mut fx.scene, 0, Mat4::from_translation(Vec3::X));
        assert_eq!(
            fx.container.controller(0).unwrap().transform_matrix,
            Mat4::from_translation(Vec3::X)
        );
    }

    #[test]
    fn failed_model_can_be_reloaded() {
        let mut fx = fixture();
        let mut loader = library();
        let _ = fx
            .container
            .load_controller_model(&mut fx.scene, 0, &mut loader, "missing.obj");
        fx.container
            .load_controller_model(&mut fx.scene, 0, &mut loader, "left.obj")
            .unwrap();
        assert!(matches!(fx.container.model_slot(0), ModelSlot::Ready(_)));
    }

    #[test]
    fn model_group_is_shared_between_controllers() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        fx.container.create_controller(&mut fx.scene, 1, Some(0), "");
        let ModelSlot::Ready(group) = fx.container.model_slot(0) else {
            panic!("group expected");
        };
        assert_eq!(fx.scene.parents(group).len(), 2);
    }

    #[test]
    fn create_then_destroy_keeps_count() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "left");
        let nodes = fx.container.controller(0).unwrap().nodes().unwrap().clone();

        fx.container.destroy_controller(&mut fx.scene, 0);
        assert_eq!(fx.container.controller_count(), 1);
        let controller = fx.container.controller(0).unwrap();
        assert!(!controller.is_configured());
        assert!(controller.immersive_name.is_empty());
        assert!(fx.scene.parents(nodes.transform).is_empty());
        assert!(fx.scene.parents(nodes.pointer.root()).is_empty());
    }

    #[test]
    fn reconnect_cycles_leave_single_parents_on_shared_nodes() {
        let mut fx = fixture();
        fx.container.initialize_beam(&mut fx.scene);
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        let beam = fx.container.beam_model().unwrap();
        let ModelSlot::Ready(group) = fx.container.model_slot(0) else {
            panic!("group expected");
        };

        for _ in 0..20 {
            fx.container.destroy_controller(&mut fx.scene, 0);
            assert!(fx.scene.parents(beam).is_empty());
            assert!(fx.scene.parents(group).is_empty());
            fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        }

        assert_eq!(fx.scene.parents(beam).len(), 1);
        assert_eq!(fx.scene.parents(group).len(), 1);
        let nodes = fx.container.controller(0).unwrap().nodes().unwrap();
        assert_eq!(fx.scene.parents(group), &[nodes.transform]);

        let pose = Mat4::from_translation(Vec3::new(0.5, 1.0, -2.0));
        fx.container.set_transform(&mut fx.scene, 0, pose);
        assert_eq!(fx.scene.world_transform(beam), pose);
    }

    #[test]
    fn reset_releases_offset_beam() {
        let mut fx = fixture();
        fx.container.initialize_beam(&mut fx.scene);
        let offset = Mat4::from_translation(Vec3::new(0.0, -0.02, 0.0));
        fx.container
            .create_controller_with_beam(&mut fx.scene, 0, Some(0), "", offset);
        fx.container
            .create_controller_with_beam(&mut fx.scene, 1, Some(0), "", offset);
        let beam = fx.container.beam_model().unwrap();
        assert_eq!(fx.scene.parents(beam).len(), 2);

        fx.container.reset(&mut fx.scene);
        assert!(fx.scene.parents(beam).is_empty());

        fx.container
            .create_controller_with_beam(&mut fx.scene, 1, Some(0), "", offset);
        let nodes = fx.container.controller(1).unwrap().nodes().unwrap();
        assert_eq!(fx.scene.parents(beam), &[nodes.beam_parent.unwrap()]);
    }

    #[test]
    fn enabled_and_visible_show_controller() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        fx.container.set_enabled(&mut fx.scene, 0, true);
        assert!(!shown(&fx, 0));
        fx.container.set_visible(&mut fx.scene, 0, true);
        assert!(shown(&fx, 0));

        fx.container.set_enabled(&mut fx.scene, 0, false);
        assert!(!shown(&fx, 0));
        assert!(!fx.container.controller(0).unwrap().visible);
    }

    #[test]
    fn hiding_hides_pointer() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        fx.container.set_enabled(&mut fx.scene, 0, true);
        fx.container.set_visible(&mut fx.scene, 0, true);
        let pointer = fx.container.controller(0).unwrap().nodes().unwrap().pointer.clone();
        pointer.set_visible(&mut fx.scene, true).unwrap();

        fx.container.set_visible(&mut fx.scene, 0, false);
        assert!(!pointer.is_visible(&fx.scene));
    }

    #[test]
    fn global_visibility_restores_only_eligible() {
        let mut fx = fixture();
        for index in 0..3 {
            fx.container.create_controller(&mut fx.scene, index, Some(0), "");
        }
        fx.container.set_enabled(&mut fx.scene, 0, true);
        fx.container.set_visible(&mut fx.scene, 0, true);
        fx.container.set_enabled(&mut fx.scene, 1, true);
        fx.container.set_visible(&mut fx.scene, 1, true);
        fx.container.set_enabled(&mut fx.scene, 1, false);
        fx.container.set_visible(&mut fx.scene, 2, true);

        fx.container.set_all_visible(&mut fx.scene, false);
        assert!(!fx.container.is_visible());
        assert!((0..3).all(|index| !shown(&fx, index)));

        // Requests made while globally hidden stay hidden.
        fx.container.set_visible(&mut fx.scene, 0, true);
        assert!(!shown(&fx, 0));

        fx.container.set_all_visible(&mut fx.scene, true);
        assert!(shown(&fx, 0));
        assert!(!shown(&fx, 1));
        assert!(!shown(&fx, 2));
    }

    #[test]
    fn button_state_is_idempotent_and_clears_exact_bit() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, None, "");
        fx.container
            .set_button_state(0, Button::TRIGGER, Some(0), true, true, None);
        fx.container
            .set_button_state(0, Button::A, Some(3), true, false, Some(0.5));
        let before = fx.container.controller(0).unwrap().clone();
        fx.container
            .set_button_state(0, Button::A, Some(3), true, false, Some(0.5));
        let after = fx.container.controller(0).unwrap();
        assert_eq!(before.button_state, after.button_state);
        assert_eq!(before.immersive_pressed_state, after.immersive_pressed_state);

        fx.container
            .set_button_state(0, Button::TRIGGER, Some(0), false, false, None);
        let controller = fx.container.controller(0).unwrap();
        assert_eq!(controller.button_state, Button::A);
        assert_eq!(controller.immersive_pressed_state, 1 << 3);
        assert_eq!(controller.immersive_touched_state, 0);
        assert_eq!(controller.trigger_value(0), Some(0.0));
        assert_eq!(controller.trigger_value(3), Some(0.5));
    }

    #[test]
    fn trigger_defaults_follow_pressed() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, None, "");
        fx.container
            .set_button_state(0, Button::TRIGGER, Some(0), true, true, Some(-1.0));
        assert_eq!(fx.container.controller(0).unwrap().trigger_value(0), Some(1.0));
        assert!(fx.container.controller(0).unwrap().immersive_touched(0));

        // Without an immersive index only the button bit changes.
        fx.container
            .set_button_state(0, Button::B, None, true, false, Some(0.3));
        let controller = fx.container.controller(0).unwrap();
        assert!(controller.button_pressed(Button::B));
        assert_eq!(controller.immersive_pressed_state, 1);
    }

    #[test]
    fn axes_are_copied_and_counted() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, None, "");
        let data = [0.1, -0.2, 0.3, -0.4, 0.5, -0.6];
        fx.container.set_axes(0, &data);
        assert_eq!(fx.container.controller(0).unwrap().axes(), &data);

        fx.container.set_axes(0, &[]);
        let controller = fx.container.controller(0).unwrap();
        assert_eq!(controller.num_axes, 0);
        assert!(controller.axes().is_empty());
    }

    #[test]
    fn invalid_index_is_ignored() {
        let mut fx = fixture();
        fx.container.set_enabled(&mut fx.scene, 4, true);
        fx.container.set_axes(4, &[1.0]);
        fx.container.set_touch_position(4, 1.0, 1.0);
        fx.container.destroy_controller(&mut fx.scene, 4);
        assert_eq!(fx.container.controller_count(), 0);
    }

    #[test]
    fn touch_and_motion_setters() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, None, "");
        fx.container.set_touch_position(0, 0.2, 0.8);
        fx.container.set_scrolled_delta(0, 0.0, -1.5);
        fx.container.set_left_handed(0, true);
        fx.container.set_button_count(0, 4);
        fx.container
            .set_capability_flags(0, CapabilityFlags::ORIENTATION | CapabilityFlags::POSITION);
        fx.container.set_linear_velocity(0, Vec3::new(0.0, 0.0, -1.0));
        fx.container.set_angular_velocity(0, Vec3::Y);
        fx.container.set_linear_acceleration(0, Vec3::X);
        fx.container.set_angular_acceleration(0, Vec3::Z);

        let controller = fx.container.controller(0).unwrap();
        assert!(controller.touched);
        assert_eq!((controller.touch_x, controller.touch_y), (0.2, 0.8));
        assert_eq!(controller.scroll_delta_y, -1.5);
        assert!(controller.left_handed);
        assert_eq!(controller.num_buttons, 4);
        assert!(controller
            .device_capabilities
            .contains(CapabilityFlags::POSITION));
        assert_eq!(controller.linear_velocity, Vec3::NEG_Z);
        assert_eq!(controller.angular_velocity, Vec3::Y);
        assert_eq!(controller.linear_acceleration, Vec3::X);
        assert_eq!(controller.angular_acceleration, Vec3::Z);

        fx.container.end_touch(0);
        assert!(!fx.container.controller(0).unwrap().touched);
    }

    #[test]
    fn transform_reaches_scene_node() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        let pose = Mat4::from_translation(Vec3::new(0.2, 1.4, -0.3));
        fx.container.set_transform(&mut fx.scene, 0, pose);
        let nodes = fx.container.controller(0).unwrap().nodes().unwrap();
        assert_eq!(fx.scene.transform(nodes.transform), Some(pose));
    }

    #[test]
    fn beam_is_built_once_and_attached_retroactively() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        assert!(fx.container.controller(0).unwrap().nodes().unwrap().beam_toggle.is_none());

        fx.container.initialize_beam(&mut fx.scene);
        let beam = fx.container.beam_model().unwrap();
        fx.container.initialize_beam(&mut fx.scene);
        assert_eq!(fx.container.beam_model(), Some(beam));

        let nodes = fx.container.controller(0).unwrap().nodes().unwrap();
        let toggle = nodes.beam_toggle.unwrap();
        assert_eq!(nodes.beam_parent, Some(toggle));
        assert!(fx.scene.children(toggle).contains(&beam));
        assert!(!fx.scene.is_enabled(toggle, beam));
        assert!(!fx.scene.render_state(beam).unwrap().lights_enabled);
    }

    #[test]
    fn beam_transform_adds_sub_transform() {
        let mut fx = fixture();
        fx.container.initialize_beam(&mut fx.scene);
        let beam = fx.container.beam_model().unwrap();
        let tilt = Mat4::from_rotation_x(-0.7);
        fx.container
            .create_controller_with_beam(&mut fx.scene, 0, Some(0), "", tilt);
        fx.container.create_controller(&mut fx.scene, 1, Some(0), "");

        let nodes = fx.container.controller(0).unwrap().nodes().unwrap();
        let parent = nodes.beam_parent.unwrap();
        let toggle = nodes.beam_toggle.unwrap();
        assert_ne!(parent, toggle);
        assert_eq!(fx.scene.transform(parent), Some(tilt));
        assert_eq!(fx.container.controller(0).unwrap().beam_transform_matrix, tilt);
        // The geometry is shared by both controllers.
        assert_eq!(fx.scene.parents(beam).len(), 2);

        fx.container.set_beam_visible(&mut fx.scene, 0, true);
        assert!(fx.scene.is_enabled(toggle, parent));
    }

    #[test]
    fn pointer_color_reaches_beam_and_cursor() {
        let mut fx = fixture();
        fx.container.initialize_beam(&mut fx.scene);
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        let color = Color::from_rgb_hex(0x00FF00);
        fx.container.set_pointer_color(&mut fx.scene, color);

        let beam = fx.container.beam_model().unwrap();
        assert_eq!(fx.scene.render_state(beam).unwrap().material.diffuse, color);
        let nodes = fx.container.controller(0).unwrap().nodes().unwrap();
        assert_eq!(nodes.pointer.color(), color);
    }

    #[test]
    fn reset_detaches_everything() {
        let mut fx = fixture();
        fx.container.create_controller(&mut fx.scene, 0, Some(0), "");
        fx.container.create_controller(&mut fx.scene, 1, Some(0), "");
        fx.container.reset(&mut fx.scene);

        assert_eq!(fx.container.controller_count(), 2);
        assert!(fx.scene.children(fx.container.root()).is_empty());
        assert!(fx.scene.children(fx.pointers).is_empty());
        assert!(fx
            .container
            .controllers()
            .iter()
            .all(|controller| !controller.is_configured()));
    }
}
