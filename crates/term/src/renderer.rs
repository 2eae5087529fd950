//! TerminalRenderer: puts half-block frames on a real terminal.
//!
//! The first frame and any size change clear the screen and draw everything, footer
//! included. After that only runs of changed color pairs are written, and a color escape
//! is emitted only when the pen actually changes.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::matrix_view::{ColorPair, HalfBlockFrame, UPPER_HALF};
use crate::types::Rgb;

#[derive(Debug)]
pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<HalfBlockFrame>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.last = None;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw `frame`, writing only what differs from the previous one.
    pub fn draw(&mut self, frame: &HalfBlockFrame) -> Result<()> {
        self.buf.clear();
        let written = encode_frame(self.last.as_ref(), frame, &mut self.buf)?;
        if written > 0 || self.last.is_none() {
            self.flush_buf()?;
        }
        match &mut self.last {
            Some(last) => last.clone_from(frame),
            None => self.last = Some(frame.clone()),
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Current terminal colors while encoding; `None` until first set.
#[derive(Default)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl Pen {
    fn switch_to(&mut self, pair: ColorPair, out: &mut Vec<u8>) -> Result<()> {
        if self.fg != Some(pair.upper) {
            out.queue(SetForegroundColor(rgb_to_color(pair.upper)))?;
            self.fg = Some(pair.upper);
        }
        if self.bg != Some(pair.lower) {
            out.queue(SetBackgroundColor(rgb_to_color(pair.lower)))?;
            self.bg = Some(pair.lower);
        }
        Ok(())
    }
}

/// Encode `next` into `out`, diffed against `prev` when both have the same size.
///
/// Returns the number of grid cells written.
fn encode_frame(
    prev: Option<&HalfBlockFrame>,
    next: &HalfBlockFrame,
    out: &mut Vec<u8>,
) -> Result<usize> {
    let prev = prev.filter(|p| p.same_size(next));
    if prev.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut pen = Pen::default();
    let mut written = 0;
    for y in 0..next.rows() {
        let row = next.row(y);
        let old = prev.map(|p| p.row(y));
        let unchanged = |x: usize| old.is_some_and(|o| o[x] == row[x]);

        let mut x = 0;
        while x < row.len() {
            if unchanged(x) {
                x += 1;
                continue;
            }
            out.queue(cursor::MoveTo(x as u16, y))?;
            while x < row.len() && !unchanged(x) {
                pen.switch_to(row[x], out)?;
                out.queue(Print(UPPER_HALF))?;
                written += 1;
                x += 1;
            }
        }
    }

    if prev.is_none() {
        if let Some(footer) = next.footer() {
            out.queue(ResetColor)?;
            out.queue(cursor::MoveTo(0, next.rows()))?;
            let clipped: String = footer.chars().take(next.columns() as usize).collect();
            out.queue(Print(clipped))?;
        }
    }
    if written > 0 {
        out.queue(ResetColor)?;
    }
    Ok(written)
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
