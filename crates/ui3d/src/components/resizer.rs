//! Widget resizer - Draggable bars and handles framing a quad

use std::sync::Arc;

use glam::{Mat4, Vec3};
use tracing::debug;
use vrshell_render::{build_handle_disk, Color, DEFAULT_DISK_SIDES};
use vrshell_scene::{Material, NodeId, Scene, SceneError};

use super::quad::Quad;

/// Thickness of a resize bar in world units.
pub const BAR_SIZE: f32 = 0.04;
/// Radius of a resize handle disk.
pub const HANDLE_RADIUS: f32 = 0.08;
/// Idle color of bars and handles (teal).
pub const DEFAULT_COLOR: u32 = 0x2BD5D5FF;
/// Color of the bar or handle being dragged (amber).
pub const ACTIVE_COLOR: u32 = 0xF7CE4D;

/// Bars and handles float just in front of the quad.
const OVERLAY_DEPTH: f32 = 0.005;
const DEPTH_SLACK: f32 = 0.1;

fn overlay_material(active: bool) -> Material {
    Material {
        ambient: Color::rgb(0.5, 0.5, 0.5),
        diffuse: if active {
            Color::from_rgb_hex(ACTIVE_COLOR)
        } else {
            Color::from_rgba_hex(DEFAULT_COLOR)
        },
        specular: Color::BLACK,
        specular_exponent: 0.0,
    }
}

/// Which bounds a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    Horizontal,
    Vertical,
    Both,
}

/// A thin rectangle along one edge of the widget.
#[derive(Debug, Clone)]
pub struct ResizeBar {
    /// Anchor in the unit square spanned by the bounds.
    pub center: Vec3,
    /// Fraction of the widget width/height covered along the free axis; zero
    /// keeps the axis at [`BAR_SIZE`].
    pub scale: Vec3,
    geometry: NodeId,
    transform: NodeId,
}

impl ResizeBar {
    fn create(scene: &mut Scene, center: Vec3, scale: Vec3) -> Result<Self, SceneError> {
        let half = Vec3::new(BAR_SIZE * 0.5, BAR_SIZE * 0.5, 0.0);
        let geometry = Quad::create_geometry(scene, -half, half);
        let transform = scene.create_transform();
        scene.add_child(transform, geometry)?;
        let bar = Self {
            center,
            scale,
            geometry,
            transform,
        };
        bar.set_active(scene, false)?;
        Ok(bar)
    }

    /// Switch between the idle and the active material.
    pub fn set_active(&self, scene: &mut Scene, active: bool) -> Result<(), SceneError> {
        scene.set_material(self.geometry, overlay_material(active))
    }

    pub fn transform_node(&self) -> NodeId {
        self.transform
    }

    pub fn geometry_node(&self) -> NodeId {
        self.geometry
    }
}

/// A circular grab point at a corner or edge midpoint.
#[derive(Debug, Clone)]
pub struct ResizeHandle {
    /// Anchor in the unit square spanned by the bounds.
    pub center: Vec3,
    pub mode: ResizeMode,
    /// Indices into [`WidgetResizer::bars`] highlighted with this handle.
    pub attached_bars: Vec<usize>,
    geometry: NodeId,
    transform: NodeId,
}

impl ResizeHandle {
    fn create(
        scene: &mut Scene,
        center: Vec3,
        mode: ResizeMode,
        attached_bars: Vec<usize>,
    ) -> Result<Self, SceneError> {
        let geometry =
            scene.create_geometry(Arc::new(build_handle_disk(HANDLE_RADIUS, DEFAULT_DISK_SIDES)));
        let transform = scene.create_transform();
        scene.add_child(transform, geometry)?;
        let handle = Self {
            center,
            mode,
            attached_bars,
            geometry,
            transform,
        };
        handle.set_active(scene, false)?;
        Ok(handle)
    }

    /// Switch between the idle and the active material.
    pub fn set_active(&self, scene: &mut Scene, active: bool) -> Result<(), SceneError> {
        scene.set_material(self.geometry, overlay_material(active))
    }

    pub fn transform_node(&self) -> NodeId {
        self.transform
    }

    pub fn geometry_node(&self) -> NodeId {
        self.geometry
    }
}

/// Overlay of resize affordances around a `[min, max]` rectangle.
///
/// Transforms are derived from the bounds in [`WidgetResizer::update_resize_size`];
/// there is no incremental path, so any bounds change must go through
/// [`WidgetResizer::set_bounds`].
#[derive(Debug, Clone)]
pub struct WidgetResizer {
    root: NodeId,
    min: Vec3,
    max: Vec3,
    bars: Vec<ResizeBar>,
    handles: Vec<ResizeHandle>,
}

impl WidgetResizer {
    /// Build the 8 bars and 8 handles for the given bounds.
    pub fn create(scene: &mut Scene, min: Vec3, max: Vec3) -> Result<Self, SceneError> {
        let mut resizer = Self {
            root: scene.create_toggle(),
            min,
            max,
            bars: Vec::with_capacity(8),
            handles: Vec::with_capacity(8),
        };

        let horizontal = Vec3::new(0.0, 0.5, 0.0);
        let vertical = Vec3::new(0.5, 0.0, 0.0);
        let left_top = resizer.add_bar(scene, Vec3::new(0.0, 0.75, 0.0), horizontal)?;
        let left_bottom = resizer.add_bar(scene, Vec3::new(0.0, 0.25, 0.0), horizontal)?;
        let right_top = resizer.add_bar(scene, Vec3::new(1.0, 0.75, 0.0), horizontal)?;
        let right_bottom = resizer.add_bar(scene, Vec3::new(1.0, 0.25, 0.0), horizontal)?;
        let top_left = resizer.add_bar(scene, Vec3::new(0.25, 1.0, 0.0), vertical)?;
        let top_right = resizer.add_bar(scene, Vec3::new(0.75, 1.0, 0.0), vertical)?;
        let bottom_left = resizer.add_bar(scene, Vec3::new(0.25, 0.0, 0.0), vertical)?;
        let bottom_right = resizer.add_bar(scene, Vec3::new(0.75, 0.0, 0.0), vertical)?;

        use ResizeMode::{Both, Horizontal, Vertical};
        let handles = [
            (Vec3::new(0.0, 1.0, 0.0), Both, [left_top, top_left]),
            (Vec3::new(1.0, 1.0, 0.0), Both, [right_top, top_right]),
            (Vec3::new(0.0, 0.0, 0.0), Both, [left_bottom, bottom_left]),
            (Vec3::new(1.0, 0.0, 0.0), Both, [right_bottom, bottom_right]),
            (Vec3::new(0.5, 1.0, 0.0), Vertical, [top_left, top_right]),
            (Vec3::new(0.5, 0.0, 0.0), Vertical, [bottom_left, bottom_right]),
            (Vec3::new(0.0, 0.5, 0.0), Horizontal, [left_top, left_bottom]),
            (Vec3::new(1.0, 0.5, 0.0), Horizontal, [right_top, right_bottom]),
        ];
        for (center, mode, bars) in handles {
            resizer.add_handle(scene, center, mode, bars.to_vec())?;
        }

        resizer.update_resize_size(scene)?;
        Ok(resizer)
    }

    /// Toggle node owning every bar and handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    pub fn bars(&self) -> &[ResizeBar] {
        &self.bars
    }

    pub fn handles(&self) -> &[ResizeHandle] {
        &self.handles
    }

    pub fn toggle_visible(&self, scene: &mut Scene, visible: bool) -> Result<(), SceneError> {
        scene.toggle_all(self.root, visible)
    }

    /// Move the frame to new bounds and re-layout every bar and handle.
    pub fn set_bounds(&mut self, scene: &mut Scene, min: Vec3, max: Vec3) -> Result<(), SceneError> {
        self.min = min;
        self.max = max;
        debug!(?min, ?max, "resizer bounds updated");
        self.update_resize_size(scene)
    }

    /// Recompute every bar and handle transform from the current bounds.
    pub fn update_resize_size(&self, scene: &mut Scene) -> Result<(), SceneError> {
        let width = self.world_width();
        let height = self.world_height();

        for bar in &self.bars {
            let target_width = if bar.scale.x > 0.0 {
                bar.scale.x * width.abs()
            } else {
                BAR_SIZE
            };
            let target_height = if bar.scale.y > 0.0 {
                bar.scale.y * height.abs()
            } else {
                BAR_SIZE
            };
            let matrix = Mat4::from_translation(self.anchor(bar.center, OVERLAY_DEPTH))
                * Mat4::from_scale(Vec3::new(
                    target_width / BAR_SIZE,
                    target_height / BAR_SIZE,
                    1.0,
                ));
            scene.set_transform(bar.transform, matrix)?;
        }

        for handle in &self.handles {
            let matrix = Mat4::from_translation(self.anchor(handle.center, OVERLAY_DEPTH));
            scene.set_transform(handle.transform, matrix)?;
        }
        Ok(())
    }

    /// Whether `point` grabs the frame: inside the bounds grown by half a bar,
    /// or close enough to a handle.
    pub fn test_intersection(&self, point: Vec3) -> bool {
        let extra_min = Vec3::new(self.min.x - BAR_SIZE * 0.5, self.min.y - BAR_SIZE * 0.5, 0.0);
        let extra_max = Vec3::new(self.max.x + BAR_SIZE * 0.5, self.max.y + BAR_SIZE * 0.5, 0.0);

        let inside = point.x >= extra_min.x
            && point.y >= extra_min.y
            && point.z >= extra_min.z - DEPTH_SLACK
            && point.x <= extra_max.x
            && point.y <= extra_max.y
            && point.z <= extra_max.z + DEPTH_SLACK;

        inside || self.intersecting_handle(point).is_some()
    }

    /// Index of the first handle within two radii of `point`.
    pub fn intersecting_handle(&self, point: Vec3) -> Option<usize> {
        self.handles.iter().position(|handle| {
            let world_center = self.anchor(handle.center, 0.0);
            (point - world_center).length() < HANDLE_RADIUS * 2.0
        })
    }

    /// Highlight a handle together with the bars it drags.
    pub fn highlight_handle(
        &self,
        scene: &mut Scene,
        index: usize,
        active: bool,
    ) -> Result<(), SceneError> {
        let Some(handle) = self.handles.get(index) else {
            return Ok(());
        };
        handle.set_active(scene, active)?;
        for bar in handle.attached_bars.iter().filter_map(|i| self.bars.get(*i)) {
            bar.set_active(scene, active)?;
        }
        Ok(())
    }

    fn add_bar(&mut self, scene: &mut Scene, center: Vec3, scale: Vec3) -> Result<usize, SceneError> {
        let bar = ResizeBar::create(scene, center, scale)?;
        scene.add_child(self.root, bar.transform)?;
        self.bars.push(bar);
        Ok(self.bars.len() - 1)
    }

    fn add_handle(
        &mut self,
        scene: &mut Scene,
        center: Vec3,
        mode: ResizeMode,
        bars: Vec<usize>,
    ) -> Result<(), SceneError> {
        let handle = ResizeHandle::create(scene, center, mode, bars)?;
        scene.add_child(self.root, handle.transform)?;
        self.handles.push(handle);
        Ok(())
    }

    fn anchor(&self, center: Vec3, z: f32) -> Vec3 {
        Vec3::new(
            self.min.x + self.world_width() * center.x,
            self.min.y + self.world_height() * center.y,
            z,
        )
    }

    fn world_width(&self) -> f32 {
        self.max.x - self.min.x
    }

    fn world_height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
