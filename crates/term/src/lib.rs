//! Terminal front-end for the pad game.
//!
//! Rendering is split in two: [`BoardView`] turns an engine view into a
//! [`FrameBuffer`] without touching the terminal, and [`TerminalRenderer`]
//! flushes frames to stdout, rewriting only rows that changed.

pub mod board_view;
pub mod fb;
pub mod renderer;

pub use simon_core as core;
pub use simon_types as types;

pub use board_view::{layout_order, pad_color, BoardView, START_PROMPT};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_rows_into, TerminalRenderer};
