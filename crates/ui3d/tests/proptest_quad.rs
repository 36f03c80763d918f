//! Property tests for quad picking
//!
//! Ray hits and texture coordinates must stay consistent for arbitrary
//! quad bounds, texture sizes and ray origins.

use glam::Vec3;
use proptest::prelude::*;
use vrshell_scene::Scene;
use vrshell_ui3d::{raycast_quads, Quad, Ray};

fn quad(scene: &mut Scene, width: f32, height: f32, texture: (u32, u32)) -> Quad {
    let half = Vec3::new(width * 0.5, height * 0.5, 0.0);
    let mut quad = Quad::create(scene, -half, half).expect("fresh scene");
    quad.set_texture_size(texture.0, texture.1);
    quad
}

proptest! {
    /// Property: Texture coordinates never leave the texture
    #[test]
    fn coordinates_stay_in_texture(
        width in 0.1f32..10.0,
        height in 0.1f32..10.0,
        tex_w in 1u32..4096,
        tex_h in 1u32..4096,
        px in -50.0f32..50.0,
        py in -50.0f32..50.0,
    ) {
        let mut scene = Scene::new();
        let quad = quad(&mut scene, width, height, (tex_w, tex_h));
        let (x, y) = quad.convert_to_quad_coordinates(Vec3::new(px, py, 0.0));
        prop_assert!((0.0..=tex_w as f32).contains(&x));
        prop_assert!((0.0..=tex_h as f32).contains(&y));
    }

    /// Property: Straight-on rays inside the bounds hit inside at the origin depth
    #[test]
    fn frontal_rays_hit_inside(
        width in 0.1f32..10.0,
        height in 0.1f32..10.0,
        u in 0.0f32..1.0,
        v in 0.0f32..1.0,
        depth in 0.05f32..20.0,
    ) {
        let mut scene = Scene::new();
        let quad = quad(&mut scene, width, height, (512, 512));
        let target = Vec3::new((u - 0.5) * width, (v - 0.5) * height, 0.0);
        let ray = Ray::new(target + Vec3::Z * depth, Vec3::NEG_Z);

        let hit = quad
            .test_intersection(&scene, ray.origin, ray.direction, true)
            .expect("frontal ray hits");
        prop_assert!(hit.is_inside);
        prop_assert!((hit.distance - depth).abs() < depth * 1e-4 + 1e-5);
        prop_assert_eq!(hit.point, hit.raw_point);

        let picked = raycast_quads(&scene, &ray, &[&quad]);
        prop_assert_eq!(picked.map(|(index, _)| index), Some(0));
    }

    /// Property: Clamped points always lie within the bounds
    #[test]
    fn clamped_points_within_bounds(
        ox in -20.0f32..20.0,
        oy in -20.0f32..20.0,
        dx in -1.0f32..1.0,
        dy in -1.0f32..1.0,
    ) {
        let mut scene = Scene::new();
        let quad = quad(&mut scene, 2.0, 2.0, (64, 64));
        let origin = Vec3::new(ox, oy, 1.0);
        let direction = Vec3::new(dx, dy, -1.0);
        if let Some(hit) = quad.test_intersection(&scene, origin, direction, true) {
            prop_assert!(hit.point.x >= -1.0 && hit.point.x <= 1.0);
            prop_assert!(hit.point.y >= -1.0 && hit.point.y <= 1.0);
        }
    }
}
