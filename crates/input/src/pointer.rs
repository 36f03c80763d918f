//! Cursor drawn where a controller's beam meets a widget.

use std::sync::Arc;

use glam::Mat4;
use vrshell_render::{build_handle_disk, Color, DEFAULT_DISK_SIDES};
use vrshell_scene::{Material, NodeId, Scene, SceneError};

/// Radius of the cursor disk in world units.
pub const POINTER_RADIUS: f32 = 0.01;

/// Disk-shaped cursor under a toggle, hidden until a widget is targeted.
#[derive(Debug, Clone)]
pub struct Pointer {
    root: NodeId,
    transform: NodeId,
    geometry: NodeId,
    color: Color,
}

impl Pointer {
    /// Build the cursor nodes. The returned pointer starts hidden.
    pub fn create(scene: &mut Scene) -> Result<Self, SceneError> {
        let geometry = scene.create_geometry(Arc::new(build_handle_disk(
            POINTER_RADIUS,
            DEFAULT_DISK_SIDES,
        )));
        scene.set_material(geometry, Material::flat(Color::WHITE))?;
        scene.set_lights_enabled(geometry, false)?;

        let transform = scene.create_transform();
        scene.add_child(transform, geometry)?;
        let root = scene.create_toggle();
        scene.add_child(root, transform)?;
        scene.toggle_all(root, false)?;

        Ok(Self {
            root,
            transform,
            geometry,
            color: Color::WHITE,
        })
    }

    /// Toggle node owning the cursor; attach this to the pointer container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn geometry(&self) -> NodeId {
        self.geometry
    }

    pub fn set_visible(&self, scene: &mut Scene, visible: bool) -> Result<(), SceneError> {
        scene.toggle_all(self.root, visible)
    }

    pub fn is_visible(&self, scene: &Scene) -> bool {
        scene.is_enabled(self.root, self.transform)
    }

    /// Recolor the cursor disk.
    pub fn set_pointer_color(&mut self, scene: &mut Scene, color: Color) -> Result<(), SceneError> {
        scene.set_material(self.geometry, Material::flat(color))?;
        self.color = color;
        Ok(())
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Place the cursor in world space.
    pub fn set_transform(&self, scene: &mut Scene, transform: Mat4) -> Result<(), SceneError> {
        scene.set_transform(self.transform, transform)
    }

    pub fn transform(&self, scene: &Scene) -> Mat4 {
        scene.transform(self.transform).unwrap_or(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn pointer_starts_hidden() {
        let mut scene = Scene::new();
        let pointer = Pointer::create(&mut scene).unwrap();
        assert!(!pointer.is_visible(&scene));

        pointer.set_visible(&mut scene, true).unwrap();
        assert!(pointer.is_visible(&scene));
    }

    #[test]
    fn color_reaches_material() {
        let mut scene = Scene::new();
        let mut pointer = Pointer::create(&mut scene).unwrap();
        let color = Color::from_rgb_hex(0xFF0000);
        pointer.set_pointer_color(&mut scene, color).unwrap();

        let state = scene.render_state(pointer.geometry()).unwrap();
        assert_eq!(state.material.diffuse, color);
        assert!(!state.lights_enabled);
        assert_eq!(pointer.color(), color);
    }

    #[test]
    fn transform_is_stored() {
        let mut scene = Scene::new();
        let pointer = Pointer::create(&mut scene).unwrap();
        let placed = Mat4::from_translation(Vec3::new(0.0, 1.0, -2.0));
        pointer.set_transform(&mut scene, placed).unwrap();
        assert_eq!(pointer.transform(&scene), placed);
    }
}
