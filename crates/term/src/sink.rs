//! Render sink that draws the grid on the terminal.

use anyhow::Result;
use crossterm::terminal;

use crate::core::ColorBuffer;
use crate::engine::RenderSink;
use crate::matrix_view::{HalfBlockFrame, MatrixView};
use crate::renderer::TerminalRenderer;

/// Owns the terminal for its lifetime: raw mode and the alternate screen are entered in
/// [`TerminalSink::enter`] and restored on drop.
#[derive(Debug)]
pub struct TerminalSink {
    renderer: TerminalRenderer,
    view: MatrixView,
    frame: HalfBlockFrame,
    active: bool,
}

impl TerminalSink {
    pub fn new(view: MatrixView) -> Self {
        Self {
            renderer: TerminalRenderer::new(),
            view,
            frame: HalfBlockFrame::default(),
            active: false,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()?;
        self.active = true;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.renderer.exit()
    }
}

impl RenderSink for TerminalSink {
    fn present(&mut self, colors: &ColorBuffer) -> Result<()> {
        let term = terminal::size()
            .unwrap_or_else(|_| self.view.required_size(colors.width(), colors.height()));
        self.view.render_into(colors, term, &mut self.frame);
        self.renderer.draw(&self.frame)
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            log::warn!("failed to restore terminal: {}", err);
        }
    }
}
