//! Per-device controller state.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use vrshell_scene::NodeId;

use crate::pointer::Pointer;

/// Capacity of the immersive trigger-value buffer.
pub const CONTROLLER_MAX_BUTTON_COUNT: usize = 6;
/// Capacity of the raw axis buffer.
pub const CONTROLLER_MAX_AXES: usize = 6;

bitflags::bitflags! {
    /// Abstract buttons shared by every controller model.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Button: u32 {
        /// Primary trigger.
        const TRIGGER = 1 << 0;
        /// Touchpad or thumbstick click.
        const TOUCHPAD = 1 << 1;
        /// Application/menu button.
        const APP = 1 << 2;
        /// Face button A.
        const A = 1 << 3;
        /// Face button B.
        const B = 1 << 4;
        /// Face button X.
        const X = 1 << 5;
        /// Face button Y.
        const Y = 1 << 6;
        /// Any other button, only reported in immersive mode.
        const OTHERS = 1 << 7;
    }
}

bitflags::bitflags! {
    /// What the physical device is able to report.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CapabilityFlags: u32 {
        /// Reports orientation.
        const ORIENTATION = 1 << 0;
        /// Reports position.
        const POSITION = 1 << 1;
        /// Poses are relative to floor height.
        const STAND_ON_FLOOR_HEIGHT = 1 << 2;
        /// The device is connected.
        const PRESENT = 1 << 3;
        /// Reports a separate grip-space position.
        const GRIP_SPACE_POSITION = 1 << 4;
        /// Reports angular acceleration.
        const ANGULAR_ACCELERATION = 1 << 5;
        /// Reports linear acceleration.
        const LINEAR_ACCELERATION = 1 << 6;
        /// Usable in inline sessions.
        const INLINE_SESSION = 1 << 7;
        /// Usable in immersive VR sessions.
        const IMMERSIVE_VR_SESSION = 1 << 8;
    }
}

/// Scene nodes owned by a configured controller.
#[derive(Debug, Clone)]
pub struct ControllerNodes {
    /// Transform carrying the controller model and beam.
    pub transform: NodeId,
    /// Toggle switching the beam on and off; absent until the beam exists.
    pub beam_toggle: Option<NodeId>,
    /// Direct parent of the shared beam geometry (the toggle or a beam transform).
    pub beam_parent: Option<NodeId>,
    /// Cursor drawn where the beam meets a widget.
    pub pointer: Pointer,
}

/// Snapshot of one input device.
///
/// A controller without [`ControllerNodes`] is unconfigured: it still records
/// input but nothing is drawn for it.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    /// Slot index; always equal to the position in the registry.
    pub index: usize,
    pub enabled: bool,
    /// Visibility requested for this controller, before global visibility applies.
    pub visible: bool,
    pub focused: bool,
    /// Handle of the widget the controller points at.
    pub widget: u32,
    /// Pointer position on the target widget, in texture pixels.
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub button_state: Button,
    pub last_button_state: Button,
    pub num_buttons: u32,
    pub touched: bool,
    pub was_touched: bool,
    pub touch_x: f32,
    pub touch_y: f32,
    pub last_touch_x: f32,
    pub last_touch_y: f32,
    pub scroll_start: f64,
    pub scroll_delta_x: f32,
    pub scroll_delta_y: f32,
    /// World pose of the device.
    pub transform_matrix: Mat4,
    /// Beam pose relative to the device.
    pub beam_transform_matrix: Mat4,
    pub immersive_name: String,
    /// Pressed bits of the immersive button model, one per immersive index.
    pub immersive_pressed_state: u64,
    /// Touched bits of the immersive button model.
    pub immersive_touched_state: u64,
    pub immersive_trigger_values: [f32; CONTROLLER_MAX_BUTTON_COUNT],
    pub immersive_axes: [f32; CONTROLLER_MAX_AXES],
    /// Number of valid entries in `immersive_axes`.
    pub num_axes: usize,
    pub left_handed: bool,
    pub in_dead_zone: bool,
    pub last_hover_event: f64,
    pub device_capabilities: CapabilityFlags,
    pub angular_acceleration: Vec3,
    pub angular_velocity: Vec3,
    pub linear_acceleration: Vec3,
    pub linear_velocity: Vec3,
    pub(crate) nodes: Option<ControllerNodes>,
}

impl Controller {
    /// Create an unconfigured controller for slot `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Whether scene nodes are attached to this slot.
    pub fn is_configured(&self) -> bool {
        self.nodes.is_some()
    }

    /// Scene nodes of a configured controller.
    pub fn nodes(&self) -> Option<&ControllerNodes> {
        self.nodes.as_ref()
    }

    /// The valid prefix of the axis buffer.
    pub fn axes(&self) -> &[f32] {
        &self.immersive_axes[..self.num_axes.min(CONTROLLER_MAX_AXES)]
    }

    /// Analog value recorded for an immersive button.
    pub fn trigger_value(&self, immersive_index: usize) -> Option<f32> {
        self.immersive_trigger_values.get(immersive_index).copied()
    }

    /// Whether the immersive button at `immersive_index` is pressed.
    pub fn immersive_pressed(&self, immersive_index: usize) -> bool {
        immersive_index < 64 && self.immersive_pressed_state & (1 << immersive_index) != 0
    }

    /// Whether the immersive button at `immersive_index` is touched.
    pub fn immersive_touched(&self, immersive_index: usize) -> bool {
        immersive_index < 64 && self.immersive_touched_state & (1 << immersive_index) != 0
    }

    pub fn button_pressed(&self, button: Button) -> bool {
        self.button_state.contains(button)
    }

    /// Pressed now but not at the end of the previous frame.
    pub fn button_just_pressed(&self, button: Button) -> bool {
        self.button_state.contains(button) && !self.last_button_state.contains(button)
    }

    /// Released since the end of the previous frame.
    pub fn button_just_released(&self, button: Button) -> bool {
        !self.button_state.contains(button) && self.last_button_state.contains(button)
    }

    /// World pose the pointer beam leaves from.
    pub fn pointer_pose(&self) -> Mat4 {
        self.transform_matrix * self.beam_transform_matrix
    }

    /// Latch current button and touch state as the previous frame's.
    pub fn end_frame(&mut self) {
        self.last_button_state = self.button_state;
        self.was_touched = self.touched;
        self.last_touch_x = self.touch_x;
        self.last_touch_y = self.touch_y;
    }

    /// Clear everything except the slot index and drop scene-node ownership.
    ///
    /// Detaching the nodes from the scene is the registry's job.
    pub fn reset(&mut self) {
        *self = Self::new(self.index);
    }
}

/// Whether a controller is drawn, given the registry-wide switch and its own flags.
pub fn effective_visibility(global_visible: bool, enabled: bool, visible: bool) -> bool {
    global_visible && enabled && visible
}
