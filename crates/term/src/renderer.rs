//! Flushes a framebuffer to the terminal, redrawing only rows that changed.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
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
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
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

    /// Force a full redraw on the next frame (after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb` at (`x`, `y`), then keep it as the baseline for the next diff.
    pub fn draw_at(&mut self, fb: &FrameBuffer, x: u16, y: u16) -> Result<()> {
        self.buf.clear();
        match &self.last {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_rows_into(Some(prev), fb, x, y, &mut self.buf)?;
            }
            _ => {
                self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
                encode_rows_into(None, fb, x, y, &mut self.buf)?;
            }
        }
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }
        match &mut self.last {
            Some(prev) => prev.clone_from(fb),
            None => self.last = Some(fb.clone()),
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode every row of `next` that differs from `prev` (all rows without one).
///
/// Writes nothing when the frames are identical.
pub fn encode_rows_into(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    x: u16,
    y: u16,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut current: Option<CellStyle> = None;
    let mut wrote = false;

    for row in 0..next.height() {
        let cells = next.row(row);
        if prev.is_some_and(|p| p.row(row) == cells) {
            continue;
        }
        out.queue(cursor::MoveTo(x, y.saturating_add(row)))?;
        for cell in cells {
            if current != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        wrote = true;
    }

    if wrote {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_frames_encode_nothing() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(0, 0, "ab", CellStyle::default());
        let mut out = Vec::new();
        encode_rows_into(Some(&fb.clone()), &fb, 0, 0, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_only_changed_rows_are_encoded() {
        let prev = FrameBuffer::new(3, 2);
        let mut next = prev.clone();
        next.put_str(0, 1, "xyz", CellStyle::default());

        let mut out = Vec::new();
        encode_rows_into(Some(&prev), &next, 0, 0, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("xyz"));

        let mut full = Vec::new();
        encode_rows_into(None, &next, 0, 0, &mut full).unwrap();
        assert!(full.len() > out.len());
    }
}
