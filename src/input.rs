// ==============================================================================
// input.rs - HELD-KEY SNAPSHOTS + SCRIPTED INPUT COLLECTOR
// ==============================================================================
// InputState is "what is held right now", nothing more: no event queue, no
// history. The host re-reads it every tick.
//
// InputScript is the headless host's input collector: a list of segments,
// each holding a key set for a number of ticks.
//
//   [
//     { "ticks": 60, "keys": ["UP"] },
//     { "ticks": 45, "keys": ["UP", "RIGHT"] },
//     { "ticks": 30, "keys": [] }
//   ]
// ==============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriftError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub const IDLE: InputState = InputState {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    pub fn from_keys<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        let mut state = InputState::IDLE;
        for key in keys {
            match key {
                Key::Up => state.forward = true,
                Key::Down => state.backward = true,
                Key::Left => state.left = true,
                Key::Right => state.right = true,
            }
        }
        state
    }

    /// -1 left, +1 right, 0 for none or both.
    pub fn steer_input(&self) -> f32 {
        (if self.right { 1.0 } else { 0.0 }) - (if self.left { 1.0 } else { 0.0 })
    }

    pub fn is_idle(&self) -> bool {
        *self == InputState::IDLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub ticks: u64,
    #[serde(default)]
    pub keys: Vec<Key>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    pub segments: Vec<ScriptSegment>,
}

impl InputScript {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DriftError::ScriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Full throttle, a long right-hand drift, a coast and a brake.
    pub fn drift_demo() -> Self {
        let seg = |ticks, keys: &[Key]| ScriptSegment { ticks, keys: keys.to_vec() };
        Self {
            segments: vec![
                seg(90, &[Key::Up]),
                seg(120, &[Key::Up, Key::Right]),
                seg(60, &[]),
                seg(45, &[Key::Left]),
                seg(60, &[Key::Down]),
            ],
        }
    }

    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks).sum()
    }

    /// Held keys for `tick` (0-based); idle once the script has run out.
    pub fn input_at(&self, tick: u64) -> InputState {
        let mut start = 0;
        for segment in &self.segments {
            let end = start + segment.ticks;
            if tick < end {
                return InputState::from_keys(segment.keys.iter().copied());
            }
            start = end;
        }
        InputState::IDLE
    }
}
