//! Headless shell session: a scene, the controller registry and one content window.
//!
//! Scripts feed controller events frame by frame; every frame each drawn
//! controller casts its beam at the window and reports where it lands.

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, warn};
use vrshell_input::{effective_visibility, ControllerContainer, ControllerDelegate, ControllerEvent};
use vrshell_scene::{ModelLoader, NodeId, Scene};
use vrshell_ui3d::{Quad, Ray, WidgetResizer};

use crate::config::ShellConfig;

/// Widget handle reported for controllers pointing at the content window.
pub const WINDOW_WIDGET: u32 = 1;
/// Cursor offset in front of the window surface.
const CURSOR_OFFSET: f32 = 0.002;

/// Controller events grouped by frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    pub frames: Vec<Vec<ControllerEvent>>,
}

impl SessionScript {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Where one controller's beam met the content window during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Index of the sampled controller.
    pub controller: usize,
    /// Whether the beam hit inside the window bounds.
    pub inside: bool,
    /// Horizontal pointer position in texture pixels, from the left edge.
    pub x: f32,
    /// Vertical pointer position in texture pixels, from the top edge.
    pub y: f32,
    /// Distance from the beam origin to the window plane.
    pub distance: f32,
    /// Resize handle under the beam, if any.
    pub resizer_handle: Option<usize>,
}

pub struct ShellSession {
    scene: Scene,
    world: NodeId,
    controllers: ControllerContainer,
    window: Quad,
    resizer: Option<WidgetResizer>,
    beam_transform: Mat4,
    highlighted: Vec<usize>,
    frame: u64,
}

impl ShellSession {
    /// Build the scene for `config`, loading controller models through `loader`.
    pub fn new(config: &ShellConfig, loader: &mut dyn ModelLoader) -> Result<Self> {
        let mut scene = Scene::new();
        let world = scene.create_group();
        let pointers = scene.create_group();
        let mut controllers = ControllerContainer::new(&mut scene, Some(pointers));
        scene.add_child(world, controllers.root())?;
        scene.add_child(world, pointers)?;

        for (model_index, file_name) in config.controller_models.iter().enumerate() {
            if let Err(err) =
                controllers.load_controller_model(&mut scene, model_index, loader, file_name)
            {
                warn!(model_index, file_name = %file_name, %err, "controller model unavailable");
            }
        }
        controllers.initialize_beam(&mut scene);
        controllers.set_pointer_color(&mut scene, config.pointer_color());

        let half = Vec3::new(config.window.width * 0.5, config.window.height * 0.5, 0.0);
        let mut window = Quad::create(&mut scene, -half, half)?;
        window.set_texture_size(config.window.texture_width, config.window.texture_height);
        scene.set_transform(
            window.transform_node(),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -config.window.distance)),
        )?;
        scene.add_child(world, window.root())?;

        let resizer = if config.resizer_enabled {
            let resizer = WidgetResizer::create(&mut scene, -half, half)?;
            scene.add_child(window.transform_node(), resizer.root())?;
            Some(resizer)
        } else {
            None
        };

        debug!(
            models = config.controller_models.len(),
            resizer = config.resizer_enabled,
            "shell session ready"
        );
        Ok(Self {
            scene,
            world,
            controllers,
            window,
            resizer,
            beam_transform: config.beam_transform(),
            highlighted: Vec::new(),
            frame: 0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Group holding every node of the session.
    pub fn world(&self) -> NodeId {
        self.world
    }

    pub fn controllers(&self) -> &ControllerContainer {
        &self.controllers
    }

    pub fn window(&self) -> &Quad {
        &self.window
    }

    pub fn resizer(&self) -> Option<&WidgetResizer> {
        self.resizer.as_ref()
    }

    /// Number of completed frames.
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Apply one controller event.
    ///
    /// Controllers created without an explicit beam get the configured beam pose.
    pub fn apply(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Create {
                index,
                model,
                name,
                beam: None,
            } if self.beam_transform != Mat4::IDENTITY => {
                self.controllers.create_controller_with_beam(
                    &mut self.scene,
                    *index,
                    *model,
                    name,
                    self.beam_transform,
                );
            }
            _ => event.apply(&mut self.controllers, &mut self.scene),
        }
    }

    /// Cast every drawn controller's beam at the window, then close the frame.
    pub fn frame(&mut self) -> Vec<PointerSample> {
        self.clear_highlights();

        let global = self.controllers.is_visible();
        let mut samples = Vec::new();
        let window_world = self.scene.world_transform(self.window.transform_node());

        for index in 0..self.controllers.controllers().len() {
            let Some(controller) = self.controllers.controller(index) else {
                continue;
            };
            let Some(nodes) = controller.nodes() else {
                continue;
            };
            if !effective_visibility(global, controller.enabled, controller.visible) {
                continue;
            }
            let pointer = nodes.pointer.clone();
            let ray = Ray::from_pose(controller.pointer_pose());

            let hit = self
                .window
                .test_intersection(&self.scene, ray.origin, ray.direction, false);
            let resizer_handle = match (&self.resizer, hit) {
                (Some(resizer), Some(hit)) if resizer.test_intersection(hit.raw_point) => {
                    resizer.intersecting_handle(hit.raw_point)
                }
                _ => None,
            };
            if let (Some(resizer), Some(handle)) = (&self.resizer, resizer_handle) {
                report(resizer.highlight_handle(&mut self.scene, handle, true));
                self.highlighted.push(handle);
            }

            match hit.filter(|hit| hit.is_inside) {
                Some(hit) => {
                    let (x, y) = self.window.convert_to_quad_coordinates(hit.point);
                    let cursor = window_world
                        * Mat4::from_translation(hit.point + Vec3::Z * CURSOR_OFFSET);
                    report(pointer.set_transform(&mut self.scene, cursor));
                    report(pointer.set_visible(&mut self.scene, true));
                    self.controllers.set_beam_visible(&mut self.scene, index, true);
                    if let Some(controller) = self.controllers.controller_mut(index) {
                        controller.widget = WINDOW_WIDGET;
                        controller.pointer_x = x;
                        controller.pointer_y = y;
                    }
                    samples.push(PointerSample {
                        controller: index,
                        inside: true,
                        x,
                        y,
                        distance: hit.distance,
                        resizer_handle,
                    });
                }
                None => {
                    report(pointer.set_visible(&mut self.scene, false));
                    self.controllers.set_beam_visible(&mut self.scene, index, false);
                    if let Some(controller) = self.controllers.controller_mut(index) {
                        controller.widget = 0;
                    }
                    if let Some(hit) = hit {
                        samples.push(PointerSample {
                            controller: index,
                            inside: false,
                            x: 0.0,
                            y: 0.0,
                            distance: hit.distance,
                            resizer_handle,
                        });
                    }
                }
            }
        }

        self.controllers.end_frame();
        self.frame += 1;
        samples
    }

    /// Run every frame of `script`, handing each frame's samples to `on_frame`.
    pub fn run_script<F>(&mut self, script: &SessionScript, mut on_frame: F) -> Result<()>
    where
        F: FnMut(u64, &[PointerSample]) -> Result<()>,
    {
        for events in &script.frames {
            for event in events {
                self.apply(event);
            }
            let frame = self.frame;
            let samples = self.frame();
            on_frame(frame, &samples)?;
        }
        Ok(())
    }

    /// Detach every controller and reset the registry.
    pub fn shutdown(&mut self) {
        self.clear_highlights();
        self.controllers.reset(&mut self.scene);
    }

    fn clear_highlights(&mut self) {
        let Some(resizer) = self.resizer.as_ref() else {
            return;
        };
        for handle in self.highlighted.drain(..) {
            report(resizer.highlight_handle(&mut self.scene, handle, false));
        }
    }
}

fn report(result: Result<(), vrshell_scene::SceneError>) {
    if let Err(err) = result {
        warn!(%err, "scene update failed");
    }
}
