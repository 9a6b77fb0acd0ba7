use glam::{Mat4, Vec3};
use skyrun_kernel::CameraPose;
use std::fmt::Write;

use crate::scene::{NodeKind, SceneEnvironment, SceneGraph};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn with_fov(fov_degrees: f32) -> Self {
        Self {
            fov_degrees,
            ..Self::default()
        }
    }

    /// Recompute the aspect ratio for a new output size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Camera/view configuration for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 4.0, 8.0),
            target: Vec3::Y,
        }
    }
}

impl From<CameraPose> for RenderView {
    fn from(pose: CameraPose) -> Self {
        Self {
            eye: pose.position,
            target: pose.look_at,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Renderer-agnostic interface. All drawing backends implement this trait.
///
/// The renderer reads the synced scene and a view, then draws. It never
/// mutates game state.
pub trait Renderer {
    /// One-time static scene setup (sky, fog, lights, ground).
    fn configure(&mut self, environment: &SceneEnvironment);

    /// The output surface changed size; update output dimensions and projection.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn render(&mut self, scene: &SceneGraph, view: &RenderView);

    /// Present a blocking fatal error to the user.
    fn show_fatal_error(&mut self, message: &str);
}

/// Headless renderer that formats each frame as text.
///
/// Useful for CLI output, logging and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    projection: Projection,
    size: (u32, u32),
    environment: Option<SceneEnvironment>,
    frames: u64,
    last_frame: String,
    fatal_errors: Vec<String>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projection(projection: Projection) -> Self {
        Self {
            projection,
            ..Self::default()
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn environment(&self) -> Option<&SceneEnvironment> {
        self.environment.as_ref()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of the most recent frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Every fatal error shown so far, oldest first.
    pub fn fatal_errors(&self) -> &[String] {
        &self.fatal_errors
    }
}

impl Renderer for DebugTextRenderer {
    fn configure(&mut self, environment: &SceneEnvironment) {
        tracing::debug!(background = environment.background, "scene configured");
        self.environment = Some(*environment);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.projection.resize(width, height);
        tracing::debug!(width, height, aspect = self.projection.aspect, "output resized");
    }

    fn render(&mut self, scene: &SceneGraph, view: &RenderView) {
        self.frames += 1;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (nodes={}, ground={:.3}) ===",
            self.frames,
            scene.len(),
            scene.ground_offset()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            self.projection.fov_degrees
        );
        for (id, node) in scene.nodes() {
            let p = node.transform.position;
            let tag = match node.kind {
                NodeKind::Player => "player",
                NodeKind::Enemy => "enemy",
            };
            let _ = writeln!(
                out,
                "  [{id}] {tag:<6} {} pos=({:.2}, {:.2}, {:.2}) scale={:.2}",
                node.model.source, p.x, p.y, p.z, node.transform.scale.x
            );
        }

        tracing::trace!(frame = self.frames, nodes = scene.len(), "frame rendered");
        self.last_frame = out;
    }

    fn show_fatal_error(&mut self, message: &str) {
        tracing::error!("{message}");
        self.fatal_errors.push(message.to_string());
    }
}
