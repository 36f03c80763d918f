//! Serializable form of every [`ControllerDelegate`] call.
//!
//! Scripts replay recorded device traffic by deserializing a list of events
//! and applying them in order.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use vrshell_scene::Scene;

use crate::controller::{Button, CapabilityFlags};
use crate::delegate::ControllerDelegate;

/// Position plus rotation quaternion (`[x, y, z, w]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: identity_rotation(),
        }
    }
}

impl Pose {
    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_array(self.rotation).normalize(),
            Vec3::from_array(self.position),
        )
    }
}

/// One controller delegate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControllerEvent {
    Create {
        index: usize,
        #[serde(default)]
        model: Option<usize>,
        #[serde(default)]
        name: String,
        #[serde(default)]
        beam: Option<Pose>,
    },
    Destroy {
        index: usize,
    },
    SetCapabilityFlags {
        index: usize,
        flags: CapabilityFlags,
    },
    SetEnabled {
        index: usize,
        enabled: bool,
    },
    SetVisible {
        index: usize,
        visible: bool,
    },
    SetTransform {
        index: usize,
        pose: Pose,
    },
    SetButtonCount {
        index: usize,
        count: u32,
    },
    SetButtonState {
        index: usize,
        button: Button,
        #[serde(default)]
        immersive_index: Option<usize>,
        pressed: bool,
        #[serde(default)]
        touched: bool,
        #[serde(default)]
        trigger: Option<f32>,
    },
    SetAxes {
        index: usize,
        values: Vec<f32>,
    },
    SetLeftHanded {
        index: usize,
        left_handed: bool,
    },
    SetTouchPosition {
        index: usize,
        x: f32,
        y: f32,
    },
    EndTouch {
        index: usize,
    },
    SetScrolledDelta {
        index: usize,
        dx: f32,
        dy: f32,
    },
    SetAngularAcceleration {
        index: usize,
        value: [f32; 3],
    },
    SetAngularVelocity {
        index: usize,
        value: [f32; 3],
    },
    SetLinearAcceleration {
        index: usize,
        value: [f32; 3],
    },
    SetLinearVelocity {
        index: usize,
        value: [f32; 3],
    },
}

impl ControllerEvent {
    /// Controller slot the event addresses.
    pub fn index(&self) -> usize {
        match self {
            Self::Create { index, .. }
            | Self::Destroy { index }
            | Self::SetCapabilityFlags { index, .. }
            | Self::SetEnabled { index, .. }
            | Self::SetVisible { index, .. }
            | Self::SetTransform { index, .. }
            | Self::SetButtonCount { index, .. }
            | Self::SetButtonState { index, .. }
            | Self::SetAxes { index, .. }
            | Self::SetLeftHanded { index, .. }
            | Self::SetTouchPosition { index, .. }
            | Self::EndTouch { index }
            | Self::SetScrolledDelta { index, .. }
            | Self::SetAngularAcceleration { index, .. }
            | Self::SetAngularVelocity { index, .. }
            | Self::SetLinearAcceleration { index, .. }
            | Self::SetLinearVelocity { index, .. } => *index,
        }
    }

    /// Dispatch the event to `delegate`.
    pub fn apply(&self, delegate: &mut dyn ControllerDelegate, scene: &mut Scene) {
        match self {
            Self::Create {
                index,
                model,
                name,
                beam,
            } => match beam {
                Some(pose) => delegate.create_controller_with_beam(
                    scene,
                    *index,
                    *model,
                    name,
                    pose.to_mat4(),
                ),
                None => delegate.create_controller(scene, *index, *model, name),
            },
            Self::Destroy { index } => delegate.destroy_controller(scene, *index),
            Self::SetCapabilityFlags { index, flags } => {
                delegate.set_capability_flags(*index, *flags)
            }
            Self::SetEnabled { index, enabled } => delegate.set_enabled(scene, *index, *enabled),
            Self::SetVisible { index, visible } => delegate.set_visible(scene, *index, *visible),
            Self::SetTransform { index, pose } => {
                delegate.set_transform(scene, *index, pose.to_mat4())
            }
            Self::SetButtonCount { index, count } => delegate.set_button_count(*index, *count),
            Self::SetButtonState {
                index,
                button,
                immersive_index,
                pressed,
                touched,
                trigger,
            } => delegate.set_button_state(
                *index,
                *button,
                *immersive_index,
                *pressed,
                *touched,
                *trigger,
            ),
            Self::SetAxes { index, values } => delegate.set_axes(*index, values),
            Self::SetLeftHanded { index, left_handed } => {
                delegate.set_left_handed(*index, *left_handed)
            }
            Self::SetTouchPosition { index, x, y } => delegate.set_touch_position(*index, *x, *y),
            Self::EndTouch { index } => delegate.end_touch(*index),
            Self::SetScrolledDelta { index, dx, dy } => {
                delegate.set_scrolled_delta(*index, *dx, *dy)
            }
            Self::SetAngularAcceleration { index, value } => {
                delegate.set_angular_acceleration(*index, Vec3::from_array(*value))
            }
            Self::SetAngularVelocity { index, value } => {
                delegate.set_angular_velocity(*index, Vec3::from_array(*value))
            }
            Self::SetLinearAcceleration { index, value } => {
                delegate.set_linear_acceleration(*index, Vec3::from_array(*value))
            }
            Self::SetLinearVelocity { index, value } => {
                delegate.set_linear_velocity(*index, Vec3::from_array(*value))
            }
        }
    }
}
