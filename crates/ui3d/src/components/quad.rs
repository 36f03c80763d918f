//! Quad - A flat, textured content surface

use std::sync::Arc;

use glam::{Vec2, Vec3};
use tracing::debug;
use vrshell_render::build_quad_mesh;
use vrshell_scene::{Material, NodeId, Scene, SceneError, TextureHandle};

/// Below this magnitude a dot product counts as zero.
const EPSILON: f32 = 0.000_000_01;
/// Depth tolerance when deciding whether a hit lies on the quad.
const DEPTH_SLACK: f32 = 0.1;

/// How content is fitted into the quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Stretch content over the whole surface.
    #[default]
    Fill,
    /// Keep the aspect ratio, matching the width.
    AspectWidth,
    /// Keep the aspect ratio, matching the height.
    AspectHeight,
}

/// Result of a ray hitting the quad's plane.
///
/// All points are in the quad's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadHit {
    /// Hit point, clamped into the quad's X/Y bounds when clamping was requested.
    pub point: Vec3,
    /// Unclamped intersection with the plane.
    pub raw_point: Vec3,
    /// Whether the unclamped point lies inside the quad.
    pub is_inside: bool,
    /// Distance from the (local) ray origin to `raw_point`.
    pub distance: f32,
}

/// A rectangle in local space, spanning `world_min` to `world_max`.
///
/// The scene subtree is `root (toggle) -> transform -> geometry`. Moving the
/// quad is done through the transform node; the bounds never change.
#[derive(Debug, Clone)]
pub struct Quad {
    root: NodeId,
    transform: NodeId,
    geometry: NodeId,
    world_min: Vec3,
    world_max: Vec3,
    texture_width: u32,
    texture_height: u32,
    scale_mode: ScaleMode,
}

impl Quad {
    /// Build the quad's nodes in `scene`.
    pub fn create(scene: &mut Scene, min: Vec3, max: Vec3) -> Result<Self, SceneError> {
        let geometry = Self::create_geometry(scene, min, max);
        let transform = scene.create_transform();
        scene.add_child(transform, geometry)?;
        let root = scene.create_toggle();
        scene.add_child(root, transform)?;
        Ok(Self {
            root,
            transform,
            geometry,
            world_min: min,
            world_max: max,
            texture_width: 0,
            texture_height: 0,
            scale_mode: ScaleMode::Fill,
        })
    }

    /// Create a detached double-sided quad geometry node.
    pub fn create_geometry(scene: &mut Scene, min: Vec3, max: Vec3) -> NodeId {
        scene.create_geometry(Arc::new(build_quad_mesh(min, max)))
    }

    /// Bind `texture` and record its pixel size.
    pub fn set_texture(
        &mut self,
        scene: &mut Scene,
        texture: TextureHandle,
        width: u32,
        height: u32,
    ) -> Result<(), SceneError> {
        scene.set_texture(self.geometry, Some(texture))?;
        self.set_texture_size(width, height);
        debug!(texture = texture.0, width, height, "quad texture bound");
        Ok(())
    }

    /// Record the pixel size of the content without rebinding a texture.
    pub fn set_texture_size(&mut self, width: u32, height: u32) {
        self.texture_width = width;
        self.texture_height = height;
    }

    /// Replace the surface material.
    pub fn set_material(&self, scene: &mut Scene, material: Material) -> Result<(), SceneError> {
        scene.set_material(self.geometry, material)
    }

    /// Texture size in pixels.
    pub fn texture_size(&self) -> (u32, u32) {
        (self.texture_width, self.texture_height)
    }

    pub fn world_min(&self) -> Vec3 {
        self.world_min
    }

    pub fn world_max(&self) -> Vec3 {
        self.world_max
    }

    /// Width and height in local units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.world_max.x - self.world_min.x,
            self.world_max.y - self.world_min.y,
        )
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.scale_mode = mode;
    }

    /// Front-face normal in local space.
    pub fn normal(&self, scene: &Scene) -> Vec3 {
        scene
            .mesh(self.geometry)
            .and_then(|mesh| mesh.normals.first().copied())
            .unwrap_or(Vec3::Z)
    }

    /// Toggle node owning the quad; attach this to the world.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Transform node positioning the quad.
    pub fn transform_node(&self) -> NodeId {
        self.transform
    }

    /// Show or hide the quad. Hidden quads never report hits.
    pub fn toggle_visible(&self, scene: &mut Scene, visible: bool) -> Result<(), SceneError> {
        scene.toggle_all(self.root, visible)
    }

    /// Intersect a world-space ray with the quad's front face.
    ///
    /// Returns `None` when the quad is hidden, the ray grazes or points away
    /// from the front face, or the origin lies on the plane.
    pub fn test_intersection(
        &self,
        scene: &Scene,
        origin: Vec3,
        direction: Vec3,
        clamp: bool,
    ) -> Option<QuadHit> {
        if !scene.is_enabled(self.root, self.transform) {
            return None;
        }
        let inverse = scene.world_transform(self.transform).inverse();
        let point = inverse.transform_point3(origin);
        let direction = inverse.transform_vector3(direction);
        let normal = self.normal(scene);

        let dot_normals = direction.dot(normal);
        if dot_normals > -EPSILON {
            return None;
        }
        let dot_v = (self.world_min - point).dot(normal);
        if dot_v < EPSILON && dot_v > -EPSILON {
            return None;
        }

        let raw_point = point + direction * (dot_v / dot_normals);
        let is_inside = self.contains(raw_point);
        let distance = (raw_point - point).length();

        let mut result = raw_point;
        if clamp {
            result.x = clamp_axis(result.x, self.world_min.x, self.world_max.x);
            result.y = clamp_axis(result.y, self.world_min.y, self.world_max.y);
        }

        Some(QuadHit {
            point: result,
            raw_point,
            is_inside,
            distance,
        })
    }

    /// Map a local point to texture pixels, origin top-left.
    pub fn convert_to_quad_coordinates(&self, point: Vec3) -> (f32, f32) {
        let (min, max) = (self.world_min, self.world_max);
        let x = clamp_axis(point.x, min.x, max.x);
        let y = clamp_axis(point.y, min.y, max.y);
        (
            (x - min.x) / (max.x - min.x) * self.texture_width as f32,
            (max.y - y) / (max.y - min.y) * self.texture_height as f32,
        )
    }

    fn contains(&self, point: Vec3) -> bool {
        let (min, max) = (self.world_min, self.world_max);
        point.x >= min.x
            && point.y >= min.y
            && point.z >= min.z - DEPTH_SLACK
            && point.x <= max.x
            && point.y <= max.y
            && point.z <= max.z + DEPTH_SLACK
    }
}

/// Clamp without asserting `min <= max`, upper bound first.
fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}
