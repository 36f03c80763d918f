//! Controller input for the VR shell.
//!
//! Device backends report input through [`ControllerDelegate`]. The
//! [`ControllerContainer`] implements it, keeping one [`Controller`] per slot
//! together with the scene nodes that draw the device, its pointer beam and
//! its cursor.

mod container;
mod controller;
mod delegate;
mod events;
mod pointer;

pub use container::{ControllerContainer, ModelSlot};
pub use controller::{
    effective_visibility, Button, CapabilityFlags, Controller, ControllerNodes,
    CONTROLLER_MAX_AXES, CONTROLLER_MAX_BUTTON_COUNT,
};
pub use delegate::ControllerDelegate;
pub use events::{ControllerEvent, Pose};
pub use pointer::{Pointer, POINTER_RADIUS};
