use winit::dpi::PhysicalSize;
use winit::event::{TouchPhase, WindowEvent};

use crate::tracking::PointerSample;

/// Turns winit cursor and touch events into pointer samples for manual tracking
#[derive(Debug, Clone)]
pub struct PointerTracker {
    /// Last pointer position in physical pixels, relative to the window
    position: Option<(f32, f32)>,
    size: (f32, f32),
}

impl PointerTracker {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self {
            position: None,
            size: (size.width as f32, size.height as f32),
        }
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = (size.width as f32, size.height as f32);
    }

    /// Process a winit event; returns a sample when the pointer moved
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<PointerSample> {
        match event {
            WindowEvent::Resized(size) => {
                self.resize(*size);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::Touch(touch) => match touch.phase {
                TouchPhase::Started | TouchPhase::Moved => {
                    self.pointer_moved(touch.location.x as f32, touch.location.y as f32)
                }
                TouchPhase::Ended | TouchPhase::Cancelled => None,
            },
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
                None
            }
            _ => None,
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Option<PointerSample> {
        self.position = Some((x, y));
        let (width, height) = self.size;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(PointerSample {
            x,
            y,
            container_width: width,
            container_height: height,
        })
    }
}
