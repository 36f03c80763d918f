//! Pointer rays - Detect which widget a controller is aiming at

use glam::{Mat4, Vec3};
use vrshell_scene::Scene;

use crate::components::quad::{Quad, QuadHit};

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Where the ray starts.
    pub origin: Vec3,
    /// Direction of travel (normalized).
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray leaving a pose along its local -Z axis, the way beams point.
    pub fn from_pose(pose: Mat4) -> Self {
        Self::new(
            pose.transform_point3(Vec3::ZERO),
            pose.transform_vector3(Vec3::NEG_Z),
        )
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Raycast against several quads and return the closest in-bounds hit.
///
/// Returns the index of the quad in `quads` alongside the hit.
pub fn raycast_quads(scene: &Scene, ray: &Ray, quads: &[&Quad]) -> Option<(usize, QuadHit)> {
    let mut closest_hit: Option<(usize, QuadHit)> = None;
    let mut closest_distance = f32::MAX;

    for (index, quad) in quads.iter().enumerate() {
        let Some(hit) = quad.test_intersection(scene, ray.origin, ray.direction, false) else {
            continue;
        };
        if hit.is_inside && hit.distance < closest_distance {
            closest_distance = hit.distance;
            closest_hit = Some((index, hit));
        }
    }

    closest_hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn pose_ray_points_down_negative_z() {
        let pose = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 1.5, 0.0),
        );
        let ray = Ray::from_pose(pose);
        assert!((ray.origin - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-6);
        // Rotating -Z by +90 degrees about Y yields -X.
        assert!((ray.direction - Vec3::NEG_X).length() < 1e-6);
        assert!((ray.at(2.0) - Vec3::new(-2.0, 1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn nearest_quad_wins() {
        let mut scene = Scene::new();
        let near =
            Quad::create(&mut scene, Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let far =
            Quad::create(&mut scene, Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        scene
            .set_transform(far.transform_node(), Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)))
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        let (index, hit) = raycast_quads(&scene, &ray, &[&far, &near]).expect("hit");
        assert_eq!(index, 1);
        assert!((hit.distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_bounds_hits_are_ignored() {
        let mut scene = Scene::new();
        let quad =
            Quad::create(&mut scene, Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let ray = Ray::new(Vec3::new(5.0, 0.0, 2.0), Vec3::NEG_Z);
        assert!(raycast_quads(&scene, &ray, &[&quad]).is_none());
    }
}
