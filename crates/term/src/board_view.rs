//! Pure rendering of an [`EngineView`] into a [`FrameBuffer`].
//!
//! The classic four pads sit in a 2x2 grid (green red / blue yellow). Other
//! signal sets fall back to index order, two pads per row.

use crate::core::{EngineView, GameSnapshot, SignalSet};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, Signal, SignalIndex};

pub const PAD_WIDTH: u16 = 14;
pub const PAD_HEIGHT: u16 = 5;
const PAD_GAP: u16 = 2;
const HEADER_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 3;
const COLUMNS: usize = 2;

pub const START_PROMPT: &str = "Press any color to start...";
const KEY_HINT: &str = "1-4 / g r y b pick   x abort   q quit";

const BG: Rgb = Rgb::new(0, 0, 0);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(120, 120, 120);
const ALERT: Rgb = Rgb::new(240, 80, 80);

/// Full-brightness color of a pad by label.
pub fn pad_color(label: &str) -> Rgb {
    match Signal::from_str(label) {
        Some(Signal::Green) => Rgb::new(40, 200, 70),
        Some(Signal::Red) => Rgb::new(230, 50, 50),
        Some(Signal::Yellow) => Rgb::new(240, 220, 60),
        Some(Signal::Blue) => Rgb::new(50, 110, 240),
        None => Rgb::new(180, 180, 180),
    }
}

/// Pad order on screen, row-major.
pub fn layout_order(signals: &SignalSet) -> Vec<SignalIndex> {
    let classic = signals.len() == 4
        && Signal::ALL
            .iter()
            .all(|s| signals.label(s.index()) == Some(s.as_str()));
    if classic {
        vec![
            Signal::Green.index(),
            Signal::Red.index(),
            Signal::Blue.index(),
            Signal::Yellow.index(),
        ]
    } else {
        (0..signals.len()).collect()
    }
}

/// Draws the header, the pad grid and the footer.
#[derive(Debug, Clone)]
pub struct BoardView {
    order: Vec<SignalIndex>,
    labels: Vec<String>,
}

impl BoardView {
    pub fn new(signals: &SignalSet) -> Self {
        Self {
            order: layout_order(signals),
            labels: signals.iter().map(|s| s.label.clone()).collect(),
        }
    }

    /// Minimum framebuffer size that fits the whole board.
    pub fn size(&self) -> (u16, u16) {
        let rows = self.order.len().div_ceil(COLUMNS) as u16;
        let width = COLUMNS as u16 * PAD_WIDTH + PAD_GAP;
        let height = HEADER_ROWS + rows * (PAD_HEIGHT + 1) + FOOTER_ROWS;
        (width.max(KEY_HINT.len() as u16), height)
    }

    /// Top-left corner of the pad for `index`, relative to the board origin.
    pub fn pad_origin(&self, index: SignalIndex) -> Option<(u16, u16)> {
        let slot = self.order.iter().position(|&i| i == index)?;
        let (width, _) = self.size();
        let grid_width = COLUMNS as u16 * PAD_WIDTH + PAD_GAP;
        let left = width.saturating_sub(grid_width) / 2;
        let col = (slot % COLUMNS) as u16;
        let row = (slot / COLUMNS) as u16;
        Some((
            left + col * (PAD_WIDTH + PAD_GAP),
            HEADER_ROWS + row * (PAD_HEIGHT + 1),
        ))
    }

    /// Render one frame. `blink_on` toggles the idle start prompt.
    pub fn render_into(&self, view: &EngineView, blink_on: bool, fb: &mut FrameBuffer) {
        let (width, height) = self.size();
        fb.reset(width, height);

        let header = if view.active {
            format!("Score {}", view.score)
        } else {
            "PLAY".to_string()
        };
        fb.put_centered(0, &header, CellStyle::new(TEXT, BG).bold());

        for &index in &self.order {
            self.draw_pad(index, view.is_lit(index), fb);
        }

        let status_row = height - FOOTER_ROWS + 1;
        match view.phase {
            Phase::Idle if blink_on => {
                fb.put_centered(status_row, START_PROMPT, CellStyle::new(TEXT, BG));
            }
            Phase::Idle => {}
            Phase::GameOver => {
                fb.put_centered(status_row, "GAME OVER", CellStyle::new(ALERT, BG).bold());
            }
            Phase::Playing => {
                fb.put_centered(status_row, "watch...", CellStyle::new(MUTED, BG));
            }
            Phase::AwaitingInput => {
                fb.put_centered(status_row, "your turn", CellStyle::new(TEXT, BG));
            }
            Phase::Generating | Phase::RoundComplete => {}
        }
        fb.put_centered(status_row + 1, KEY_HINT, CellStyle::new(MUTED, BG));
    }

    /// Second header row from the mirrored session state.
    pub fn draw_mirror(&self, snapshot: &GameSnapshot, fb: &mut FrameBuffer) {
        if !snapshot.playing {
            return;
        }
        let Some(color) = snapshot.chosen_color.as_deref() else {
            return;
        };
        let style = CellStyle::new(pad_color(color), BG);
        fb.put_centered(1, &format!("playing as {color}"), style);
    }

    fn draw_pad(&self, index: SignalIndex, lit: bool, fb: &mut FrameBuffer) {
        let Some((x, y)) = self.pad_origin(index) else {
            return;
        };
        let label = self.labels.get(index).map(String::as_str).unwrap_or("");
        let full = pad_color(label);
        let fill = if lit { full } else { full.dimmed() };
        fb.fill_rect(x, y, PAD_WIDTH, PAD_HEIGHT, ' ', CellStyle::new(TEXT, fill));

        let caption = format!("{} {}", index + 1, label);
        let cx = x + PAD_WIDTH.saturating_sub(caption.chars().count() as u16) / 2;
        let fg = if lit { BG } else { MUTED };
        let style = CellStyle::new(fg, fill);
        fb.put_str(cx, y + PAD_HEIGHT / 2, &caption, if lit { style.bold() } else { style });
    }
}
