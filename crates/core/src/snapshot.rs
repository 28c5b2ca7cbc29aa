use serde::{Deserialize, Serialize};

use crate::types::Phase;

/// Mirror of the session for external sync.
///
/// Colors are signal labels; both are `None` when no session is live.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub score: u32,
    pub playing: bool,
    pub chosen_color: Option<String>,
    pub last_user_signal: Option<String>,
    pub cursor: usize,
    pub game_over: bool,
}

/// What a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineView {
    pub phase: Phase,
    /// One flag per signal, true while that pad is lit.
    pub highlights: Vec<bool>,
    pub score: u32,
    pub active: bool,
    pub round: u32,
    /// Sequence position being played back or expected next.
    pub cursor: usize,
}

impl EngineView {
    pub fn is_lit(&self, index: usize) -> bool {
        self.highlights.get(index).copied().unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.highlights.iter().filter(|&&lit| lit).count()
    }
}
