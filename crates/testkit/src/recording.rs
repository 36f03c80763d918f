use glam::{Mat4, Vec3};
use vrshell_input::{Button, CapabilityFlags, ControllerDelegate, ControllerEvent, Pose};
use vrshell_scene::Scene;

/// Delegate double that records every call as a [`ControllerEvent`].
///
/// Transforms are stored as [`Pose`]s, so scale is dropped. Recorded calls can
/// be replayed into another delegate with [`ControllerEvent::apply`].
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    calls: Vec<ControllerEvent>,
    count: usize,
}

impl RecordingDelegate {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> &[ControllerEvent] {
        &self.calls
    }

    /// Remove and return the recorded calls.
    pub fn take_calls(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.calls)
    }

    fn push(&mut self, event: ControllerEvent) {
        self.calls.push(event);
    }
}

fn pose(matrix: Mat4) -> Pose {
    let (_, rotation, translation) = matrix.to_scale_rotation_translation();
    Pose {
        position: translation.to_array(),
        rotation: rotation.to_array(),
    }
}

impl ControllerDelegate for RecordingDelegate {
    fn create_controller_with_beam(
        &mut self,
        _scene: &mut Scene,
        index: usize,
        model_index: Option<usize>,
        immersive_name: &str,
        beam_transform: Mat4,
    ) {
        self.count = self.count.max(index + 1);
        self.push(ControllerEvent::Create {
            index,
            model: model_index,
            name: immersive_name.to_string(),
            beam: (beam_transform != Mat4::IDENTITY).then(|| pose(beam_transform)),
        });
    }

    fn destroy_controller(&mut self, _scene: &mut Scene, index: usize) {
        self.push(ControllerEvent::Destroy { index });
    }

    fn controller_count(&self) -> usize {
        self.count
    }

    fn set_capability_flags(&mut self, index: usize, flags: CapabilityFlags) {
        self.push(ControllerEvent::SetCapabilityFlags { index, flags });
    }

    fn set_enabled(&mut self, _scene: &mut Scene, index: usize, enabled: bool) {
        self.push(ControllerEvent::SetEnabled { index, enabled });
    }

    fn set_visible(&mut self, _scene: &mut Scene, index: usize, visible: bool) {
        self.push(ControllerEvent::SetVisible { index, visible });
    }

    fn set_transform(&mut self, _scene: &mut Scene, index: usize, transform: Mat4) {
        self.push(ControllerEvent::SetTransform {
            index,
            pose: pose(transform),
        });
    }

    fn set_button_count(&mut self, index: usize, count: u32) {
        self.push(ControllerEvent::SetButtonCount { index, count });
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
        self.push(ControllerEvent::SetButtonState {
            index,
            button,
            immersive_index,
            pressed,
            touched,
            trigger: immersive_trigger,
        });
    }

    fn set_axes(&mut self, index: usize, data: &[f32]) {
        self.push(ControllerEvent::SetAxes {
            index,
            values: data.to_vec(),
        });
    }

    fn set_left_handed(&mut self, index: usize, left_handed: bool) {
        self.push(ControllerEvent::SetLeftHanded { index, left_handed });
    }

    fn set_touch_position(&mut self, index: usize, x: f32, y: f32) {
        self.push(ControllerEvent::SetTouchPosition { index, x, y });
    }

    fn end_touch(&mut self, index: usize) {
        self.push(ControllerEvent::EndTouch { index });
    }

    fn set_scrolled_delta(&mut self, index: usize, dx: f32, dy: f32) {
        self.push(ControllerEvent::SetScrolledDelta { index, dx, dy });
    }

    fn set_angular_acceleration(&mut self, index: usize, value: Vec3) {
        self.push(ControllerEvent::SetAngularAcceleration {
            index,
            value: value.to_array(),
        });
    }

    fn set_angular_velocity(&mut self, index: usize, value: Vec3) {
        self.push(ControllerEvent::SetAngularVelocity {
            index,
            value: value.to_array(),
        });
    }

    fn set_linear_acceleration(&mut self, index: usize, value: Vec3) {
        self.push(ControllerEvent::SetLinearAcceleration {
            index,
            value: value.to_array(),
        });
    }

    fn set_linear_velocity(&mut self, index: usize, value: Vec3) {
        self.push(ControllerEvent::SetLinearVelocity {
            index,
            value: value.to_array(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_create_records_no_beam() {
        let mut scene = Scene::new();
        let mut recorder = RecordingDelegate::new();
        recorder.create_controller(&mut scene, 1, Some(0), "left");
        assert_eq!(recorder.controller_count(), 2);
        assert_eq!(
            recorder.calls(),
            &[ControllerEvent::Create {
                index: 1,
                model: Some(0),
                name: "left".to_string(),
                beam: None,
            }]
        );
    }

    #[test]
    fn transforms_are_recorded_as_poses() {
        let mut scene = Scene::new();
        let mut recorder = RecordingDelegate::new();
        recorder.set_transform(
            &mut scene,
            0,
            Mat4::from_translation(Vec3::new(0.5, 1.0, -2.0)),
        );
        let calls = recorder.take_calls();
        assert!(recorder.calls().is_empty());
        match &calls[0] {
            ControllerEvent::SetTransform { index, pose } => {
                assert_eq!(*index, 0);
                assert_eq!(pose.position, [0.5, 1.0, -2.0]);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
