//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`PadInput`]s: a signal index chosen by
//! the player, an abort request, or quit. Nothing here knows about the engine's
//! phase; out-of-phase picks are the engine's business.

pub mod map;

pub use simon_types as types;

pub use map::{handle_key_event, should_quit, PadInput};
