//! egui overlay.
//!
//! [`GuiLayer`] owns the egui context and runs one egui frame per
//! application frame; [`OverlayGui`] lays out the panels inside it.

mod overlay;

pub use overlay::{FrameStats, OverlayGui};

use glam::Vec2;

/// Raw pointer and keyboard state for one frame, in screen pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuiInput {
    /// Pointer position; `None` when the pointer left the window.
    pub pointer: Option<Vec2>,
    /// Primary button held down this frame.
    pub primary_down: bool,
    /// Wheel delta in points.
    pub wheel: Vec2,
    /// Keys pressed (and released) during the frame.
    pub keys: Vec<egui::Key>,
}

/// Result of one GUI frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuiFrameOutput {
    /// Shapes produced by the frame, before tessellation.
    pub shape_count: usize,
    /// Clipped primitives after tessellation.
    pub primitive_count: usize,
    /// egui asked for another frame right away.
    pub needs_repaint: bool,
}

/// egui context plus frame bookkeeping.
pub struct GuiLayer {
    ctx: egui::Context,
    screen_size: egui::Vec2,
    pointer: Option<egui::Pos2>,
    primary_down: bool,
    in_frame: bool,
}

impl GuiLayer {
    pub fn new(width: u32, height: u32) -> Self {
        let ctx = egui::Context::default();
        let mut style = (*ctx.style()).clone();
        style.visuals.window_rounding = egui::Rounding::same(8.0);
        style.spacing.slider_width = 180.0;
        ctx.set_style(style);

        Self {
            ctx,
            screen_size: egui::vec2(width as f32, height as f32),
            pointer: None,
            primary_down: false,
            in_frame: false,
        }
    }

    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Translate this frame's input into egui events.
    ///
    /// Pointer moves and button transitions are diffed against the previous
    /// call, so a click takes one frame down and one frame up.
    pub fn raw_input(&mut self, time: f64, input: &GuiInput) -> egui::RawInput {
        let modifiers = egui::Modifiers::NONE;
        let mut events = Vec::new();

        let position = input.pointer.map(|p| egui::pos2(p.x, p.y));
        match position {
            Some(pos) => {
                if self.pointer != Some(pos) {
                    events.push(egui::Event::PointerMoved(pos));
                }
                if input.primary_down != self.primary_down {
                    events.push(egui::Event::PointerButton {
                        pos,
                        button: egui::PointerButton::Primary,
                        pressed: input.primary_down,
                        modifiers,
                    });
                }
            }
            None => {
                if self.pointer.is_some() {
                    events.push(egui::Event::PointerGone);
                }
            }
        }
        self.pointer = position;
        self.primary_down = position.is_some() && input.primary_down;

        if input.wheel != Vec2::ZERO {
            events.push(egui::Event::MouseWheel {
                unit: egui::MouseWheelUnit::Point,
                delta: egui::vec2(input.wheel.x, input.wheel.y),
                modifiers,
            });
        }

        for &key in &input.keys {
            for pressed in [true, false] {
                events.push(egui::Event::Key {
                    key,
                    physical_key: None,
                    pressed,
                    repeat: false,
                    modifiers,
                });
            }
        }

        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, self.screen_size)),
            time: Some(time),
            events,
            ..Default::default()
        }
    }

    /// Begin a new egui frame. A frame still open is closed first.
    pub fn begin_frame(&mut self, raw_input: egui::RawInput) {
        if self.in_frame {
            log::warn!("GUI frame begun twice; closing the previous one");
            self.end_frame();
        }
        self.ctx.begin_frame(raw_input);
        self.in_frame = true;
    }

    /// End the egui frame and tessellate its output.
    pub fn end_frame(&mut self) -> GuiFrameOutput {
        if !self.in_frame {
            return GuiFrameOutput::default();
        }
        self.in_frame = false;

        let full_output = self.ctx.end_frame();
        let shape_count = full_output.shapes.len();
        let needs_repaint = full_output
            .viewport_output
            .values()
            .any(|v| v.repaint_delay.is_zero());

        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        GuiFrameOutput {
            shape_count,
            primitive_count: primitives.len(),
            needs_repaint,
        }
    }

    /// The pointer is over a GUI window or dragging a widget.
    pub fn wants_capture_mouse(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    pub fn wants_capture_keyboard(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }
}
