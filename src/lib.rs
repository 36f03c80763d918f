//! vrshell - Controller tracking and interactive widget surfaces for a VR browser shell
//!
//! The workspace crates provide the scene graph, controller registry and
//! widget geometry; this crate wires them into a headless session driven by
//! scripted controller events.

pub mod config;
pub mod session;

pub use config::{ShellConfig, WindowConfig};
pub use session::{PointerSample, SessionScript, ShellSession, WINDOW_WIDGET};
