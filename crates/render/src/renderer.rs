use crate::frame::{Frame, Overlay};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer only reads the extracted frame; scene state is owned by the
/// editor session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Produces a human-readable dump of a frame.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List every draw item instead of just the count.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let eye = frame.view.camera_position;
        // Writing into a String cannot fail.
        let _ = writeln!(out, "=== Frame ===");
        let _ = writeln!(out, "Camera: eye=({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z);
        let _ = writeln!(
            out,
            "Grid: {} lines, axes: {} lines",
            frame.grid.len(),
            frame.axes.iter().map(|a| a.len()).sum::<usize>()
        );
        let _ = writeln!(out, "Draw items: {}", frame.items.len());
        if self.verbose {
            for item in &frame.items {
                let p = item.model_matrix.w_axis;
                let _ = writeln!(
                    out,
                    "  {} {} handle={} pos=({:.2}, {:.2}, {:.2})",
                    item.id, item.render.model, item.render.handle, p.x, p.y, p.z
                );
            }
        }
        if !frame.wireframes.is_empty() {
            let _ = writeln!(out, "Debug AABBs: {}", frame.wireframes.len() / 12);
        }

        match &frame.overlay {
            Overlay::Move { camera_position } => {
                let _ = writeln!(
                    out,
                    "[move] camera ({:.2}, {:.2}, {:.2})",
                    camera_position.x, camera_position.y, camera_position.z
                );
            }
            Overlay::Edit {
                entity_count,
                selected,
                status,
            } => {
                let _ = writeln!(out, "[edit] entities: {entity_count}");
                match selected {
                    Some(info) => {
                        let _ = writeln!(out, "Selected: {info}");
                    }
                    None => {
                        let _ = writeln!(out, "Selected: none");
                    }
                }
                if let Some(status) = status {
                    let _ = writeln!(out, "Status: {status}");
                }
            }
        }
        out
    }
}
