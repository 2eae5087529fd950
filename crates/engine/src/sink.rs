//! Render sink boundary.
//!
//! A sink receives the full color buffer whenever a visible cell changed and presents it.
//! The terminal front end lives in `tetris-wall-term`; an LED matrix driver would implement
//! the same trait.

use anyhow::Result;

use crate::core::ColorBuffer;
use crate::types::Rgb;

pub trait RenderSink {
    /// Show `colors` (row-major, top row first).
    fn present(&mut self, colors: &ColorBuffer) -> Result<()>;
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn present(&mut self, colors: &ColorBuffer) -> Result<()> {
        (**self).present(colors)
    }
}

/// Discards frames, counting them.
#[derive(Debug, Default)]
pub struct NullSink {
    pub frames: u64,
}

impl RenderSink for NullSink {
    fn present(&mut self, _colors: &ColorBuffer) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

/// Keeps a copy of the last presented frame.
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub frames: u64,
    last: Vec<Rgb>,
}

impl CaptureSink {
    pub fn last_frame(&self) -> &[Rgb] {
        &self.last
    }
}

impl RenderSink for CaptureSink {
    fn present(&mut self, colors: &ColorBuffer) -> Result<()> {
        self.frames += 1;
        self.last.clear();
        self.last.extend_from_slice(colors.cells());
        Ok(())
    }
}
