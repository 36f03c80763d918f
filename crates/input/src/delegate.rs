use glam::{Mat4, Vec3};
use vrshell_scene::Scene;

use crate::controller::{Button, CapabilityFlags};

/// Operations a device backend uses to report controller input.
///
/// Every method addresses a controller by slot index. Out-of-range indices are
/// ignored by implementations; only [`create_controller`](Self::create_controller)
/// grows the set of slots.
pub trait ControllerDelegate {
    /// Create a controller whose beam leaves from the device origin.
    fn create_controller(
        &mut self,
        scene: &mut Scene,
        index: usize,
        model_index: Option<usize>,
        immersive_name: &str,
    ) {
        self.create_controller_with_beam(scene, index, model_index, immersive_name, Mat4::IDENTITY);
    }

    /// Create a controller with an explicit beam pose relative to the device.
    fn create_controller_with_beam(
        &mut self,
        scene: &mut Scene,
        index: usize,
        model_index: Option<usize>,
        immersive_name: &str,
        beam_transform: Mat4,
    );

    /// Detach the controller's nodes and reset its slot.
    fn destroy_controller(&mut self, scene: &mut Scene, index: usize);

    /// Number of slots, configured or not.
    fn controller_count(&self) -> usize;

    fn set_capability_flags(&mut self, index: usize, flags: CapabilityFlags);
    fn set_enabled(&mut self, scene: &mut Scene, index: usize, enabled: bool);
    fn set_visible(&mut self, scene: &mut Scene, index: usize, visible: bool);
    fn set_transform(&mut self, scene: &mut Scene, index: usize, transform: Mat4);
    fn set_button_count(&mut self, index: usize, count: u32);

    /// Record a button change.
    ///
    /// `immersive_index` addresses the immersive button model; `immersive_trigger`
    /// is the analog value for it, defaulting to 1.0 or 0.0 from `pressed`.
    fn set_button_state(
        &mut self,
        index: usize,
        button: Button,
        immersive_index: Option<usize>,
        pressed: bool,
        touched: bool,
        immersive_trigger: Option<f32>,
    );

    fn set_axes(&mut self, index: usize, data: &[f32]);
    fn set_left_handed(&mut self, index: usize, left_handed: bool);
    fn set_touch_position(&mut self, index: usize, x: f32, y: f32);
    fn end_touch(&mut self, index: usize);
    fn set_scrolled_delta(&mut self, index: usize, dx: f32, dy: f32);
    fn set_angular_acceleration(&mut self, index: usize, value: Vec3);
    fn set_angular_velocity(&mut self, index: usize, value: Vec3);
    fn set_linear_acceleration(&mut self, index: usize, value: Vec3);
    fn set_linear_velocity(&mut self, index: usize, value: Vec3);
}
