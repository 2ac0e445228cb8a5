//! Scripted input for the headless driver and for deterministic tests.
//!
//! A replay lists which actions are held on each frame. Consecutive frames
//! with the same held set are written once with a `repeat` count; the driver
//! diffs successive sets into press/release edges through
//! `InputState::apply_held`, so edge-triggered actions like jump behave the
//! same as with a live keyboard.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use scroller_core::input::Action;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Action>,
    /// Restart the round before this frame's first tick.
    #[serde(default)]
    pub restart: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// One tick's worth of scripted input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub held: Vec<Action>,
    pub restart: bool,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ReplayStep> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(ReplayStep {
                    held: frame.held.clone(),
                    restart: frame.restart && i == 0,
                });
            }
        }
        out
    }

    pub fn total_frames(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.repeat.max(1))).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !replay.fixed_dt.is_finite() || replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
