use std::path::{Path, PathBuf};

use glam::Vec3;

use super::{load_model_bounds, BoundingBox, Color, DrawParams, Mesh, Model, ModelHandle, Renderer};

const DEFAULT_FRAME_TIME: f32 = 1.0 / 60.0;

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Model {
        handle: ModelHandle,
        params: DrawParams,
    },
    CubeWires {
        center: Vec3,
        size: Vec3,
        color: Color,
    },
    BoundingBox {
        bounds: BoundingBox,
        color: Color,
    },
    Line {
        start: Vec3,
        end: Vec3,
        color: Color,
    },
    Grid {
        slices: u32,
        spacing: f32,
    },
}

/// Per-frame statistics returned by [`DrawList::finish_frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub frame_index: u64,
    pub model_draws: usize,
    pub wire_draws: usize,
    pub line_draws: usize,
    pub grid_draws: usize,
}

impl FrameSummary {
    pub fn total(&self) -> usize {
        self.model_draws + self.wire_draws + self.line_draws + self.grid_draws
    }
}

#[derive(Debug)]
struct ModelRecord {
    source: Option<PathBuf>,
}

/// Headless [`Renderer`] that records every draw call of the current frame.
///
/// Models live in a slot store; unloading frees the slot and later draws of
/// that handle are dropped with a warning.
#[derive(Debug)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    models: Vec<Option<ModelRecord>>,
    frame_time: f32,
    frame_index: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::with_frame_time(DEFAULT_FRAME_TIME)
    }

    /// Create a draw list that reports `frame_time` seconds for every frame.
    pub fn with_frame_time(frame_time: f32) -> Self {
        Self {
            commands: Vec::new(),
            models: Vec::new(),
            frame_time,
            frame_index: 0,
        }
    }

    /// Draw calls recorded since the last [`finish_frame`](Self::finish_frame).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Close the current frame: summarize and clear the recorded commands.
    pub fn finish_frame(&mut self) -> FrameSummary {
        let mut summary = FrameSummary {
            frame_index: self.frame_index,
            ..FrameSummary::default()
        };
        for command in &self.commands {
            match command {
                DrawCommand::Model { .. } => summary.model_draws += 1,
                DrawCommand::CubeWires { .. } | DrawCommand::BoundingBox { .. } => {
                    summary.wire_draws += 1
                }
                DrawCommand::Line { .. } => summary.line_draws += 1,
                DrawCommand::Grid { .. } => summary.grid_draws += 1,
            }
        }
        self.commands.clear();
        self.frame_index += 1;
        summary
    }

    pub fn loaded_model_count(&self) -> usize {
        self.models.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_loaded(&self, handle: ModelHandle) -> bool {
        self.record(handle).is_some()
    }

    /// Expand every wire command of the frame into line segments
    /// (12 edges per box).
    pub fn wire_segments(&self) -> Vec<(Vec3, Vec3, Color)> {
        let mut segments = Vec::new();
        for command in &self.commands {
            match *command {
                DrawCommand::CubeWires {
                    center,
                    size,
                    color,
                } => {
                    let half = size * 0.5;
                    push_box_edges(&mut segments, center - half, center + half, color);
                }
                DrawCommand::BoundingBox { bounds, color } => {
                    push_box_edges(&mut segments, bounds.min, bounds.max, color);
                }
                DrawCommand::Line { start, end, color } => segments.push((start, end, color)),
                _ => {}
            }
        }
        segments
    }

    fn record(&self, handle: ModelHandle) -> Option<&ModelRecord> {
        self.models.get(handle.index() as usize)?.as_ref()
    }

    fn insert(&mut self, record: ModelRecord) -> ModelHandle {
        let index = match self.models.iter().position(Option::is_none) {
            Some(free) => {
                self.models[free] = Some(record);
                free
            }
            None => {
                self.models.push(Some(record));
                self.models.len() - 1
            }
        };
        ModelHandle::new(index as u32)
    }

    fn push_model(&mut self, handle: ModelHandle, params: DrawParams) {
        if !self.is_loaded(handle) {
            log::warn!("Draw of unknown model handle {}", handle.index());
            return;
        }
        self.commands.push(DrawCommand::Model { handle, params });
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DrawList {
    fn load_model(&mut self, path: &Path) -> Model {
        match load_model_bounds(path) {
            Ok(bounds) => {
                let handle = self.insert(ModelRecord {
                    source: Some(path.to_path_buf()),
                });
                log::debug!("Loaded model {} as handle {}", path.display(), handle.index());
                Model::new(handle, bounds)
            }
            Err(e) => {
                log::warn!("Failed to load model {}: {}", path.display(), e);
                Model::invalid()
            }
        }
    }

    fn model_from_mesh(&mut self, mesh: Mesh) -> Model {
        if mesh.is_empty() {
            log::warn!("Refusing to build a model from an empty mesh");
            return Model::invalid();
        }
        let bounds = mesh.bounds();
        let handle = self.insert(ModelRecord { source: None });
        log::debug!(
            "Built model {} from mesh {:?} ({} triangles, {} vertex bytes)",
            handle.index(),
            mesh.label(),
            mesh.triangle_count(),
            mesh.vertex_bytes().len()
        );
        Model::new(handle, bounds)
    }

    fn unload_model(&mut self, handle: ModelHandle) {
        let Some(slot) = self.models.get_mut(handle.index() as usize) else {
            return;
        };
        if let Some(record) = slot.take() {
            match record.source {
                Some(path) => log::debug!("Unloaded model {} ({})", handle.index(), path.display()),
                None => log::debug!("Unloaded model {} (mesh)", handle.index()),
            }
        }
    }

    fn draw_model(&mut self, handle: ModelHandle, params: &DrawParams) {
        self.push_model(handle, *params);
    }

    fn draw_model_uniform(&mut self, handle: ModelHandle, position: Vec3, scale: f32, color: Color) {
        let params = DrawParams::new(position, color).with_scale(Vec3::splat(scale));
        self.push_model(handle, params);
    }

    fn draw_cube_wires(&mut self, center: Vec3, size: Vec3, color: Color) {
        self.commands.push(DrawCommand::CubeWires {
            center,
            size,
            color,
        });
    }

    fn draw_bounding_box(&mut self, bounds: BoundingBox, color: Color) {
        self.commands.push(DrawCommand::BoundingBox { bounds, color });
    }

    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.commands.push(DrawCommand::Line { start, end, color });
    }

    fn draw_grid(&mut self, slices: u32, spacing: f32) {
        self.commands.push(DrawCommand::Grid { slices, spacing });
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }
}

fn push_box_edges(out: &mut Vec<(Vec3, Vec3, Color)>, min: Vec3, max: Vec3, color: Color) {
    let c = [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ];
    // Bottom face
    out.push((c[0], c[1], color));
    out.push((c[1], c[2], color));
    out.push((c[2], c[3], color));
    out.push((c[3], c[0], color));
    // Top face
    out.push((c[4], c[5], color));
    out.push((c[5], c[6], color));
    out.push((c[6], c[7], color));
    out.push((c[7], c[4], color));
    // Vertical edges
    out.push((c[0], c[4], color));
    out.push((c[1], c[5], color));
    out.push((c[2], c[6], color));
    out.push((c[3], c[7], color));
}
