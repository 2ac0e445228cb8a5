//! Sprite-sheet row animations and the frame-cursor `Animator`.
//!
//! An animation is a contiguous run of frames on one sheet row
//! (`start_frame..=end_frame`) played at a fixed rate. Definitions are grouped
//! per entity type into an `AnimationSet`, which is immutable after load and
//! shared read-only between every instance of that type.
//!
//! Looping follows the game's convention unless the definition says otherwise:
//! `attack`, `hurt` and `death` play once, everything else loops.

use serde::Deserialize;
use std::collections::HashMap;

/// Fallback playback rate when a definition omits `fps`.
pub const DEFAULT_FPS: f32 = 8.0;

/// Highest playback rate a definition may ask for.
pub const MAX_FPS: f32 = 1000.0;

const NON_LOOPING_CLIPS: &[&str] = &["attack", "hurt", "death"];

pub fn loops_by_convention(name: &str) -> bool {
    !NON_LOOPING_CLIPS.contains(&name)
}

/// Resolved frame source for one named animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDef {
    pub row: u32,
    pub start_frame: u32,
    pub end_frame: u32,
    pub fps: f32,
    pub looping: bool,
}

impl AnimationDef {
    /// Seconds per frame. Rates are clamped to `[1, MAX_FPS]`.
    pub fn frame_period(&self) -> f32 {
        1.0 / self.fps.clamp(1.0, MAX_FPS)
    }

    pub fn frame_count(&self) -> u32 {
        self.end_frame - self.start_frame + 1
    }

    /// Duration of one play-through in seconds.
    pub fn duration(&self) -> f32 {
        self.frame_count() as f32 * self.frame_period()
    }
}

/// Authoring form of an animation as it appears in configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationSpec {
    pub row: u32,
    pub start_frame: u32,
    pub end_frame: u32,
    #[serde(default)]
    pub fps: Option<f32>,
    #[serde(default)]
    pub looping: Option<bool>,
}

/// All animations of one entity type, keyed by clip name.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    pub set_id: String,
    clips: HashMap<String, AnimationDef>,
}

impl AnimationSet {
    pub fn from_specs(set_id: &str, specs: &HashMap<String, AnimationSpec>) -> Result<Self, String> {
        if specs.is_empty() {
            return Err(format!("Animation set '{set_id}' has no animations"));
        }
        let mut clips = HashMap::with_capacity(specs.len());
        for (name, spec) in specs {
            if name.is_empty() {
                return Err(format!("Animation set '{set_id}' has an unnamed animation"));
            }
            if spec.start_frame > spec.end_frame {
                return Err(format!(
                    "Animation '{set_id}/{name}' has start_frame {} after end_frame {}",
                    spec.start_frame, spec.end_frame
                ));
            }
            let fps = spec.fps.unwrap_or(DEFAULT_FPS);
            if !fps.is_finite() || fps <= 0.0 || fps > MAX_FPS {
                return Err(format!(
                    "Animation '{set_id}/{name}' has invalid fps {fps} (expected 0 < fps <= {MAX_FPS})"
                ));
            }
            clips.insert(
                name.clone(),
                AnimationDef {
                    row: spec.row,
                    start_frame: spec.start_frame,
                    end_frame: spec.end_frame,
                    fps,
                    looping: spec.looping.unwrap_or_else(|| loops_by_convention(name)),
                },
            );
        }
        Ok(Self {
            set_id: set_id.to_string(),
            clips,
        })
    }

    pub fn get(&self, name: &str) -> Option<&AnimationDef> {
        self.clips.get(name)
    }

    /// Like `get`, but a missing clip is a configuration error.
    pub fn require(&self, name: &str) -> Result<&AnimationDef, String> {
        self.clips
            .get(name)
            .ok_or_else(|| format!("Animation set '{}' has no clip '{name}'", self.set_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnimationDef)> {
        self.clips.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Playback cursor for one entity's active animation.
#[derive(Debug, Clone)]
pub struct Animator {
    clip_name: String,
    def: AnimationDef,
    pub frame: u32,
    pub elapsed: f32,
    pub finished: bool,
}

impl Animator {
    pub fn new(set: &AnimationSet, clip_name: &str) -> Result<Self, String> {
        let def = *set.require(clip_name)?;
        Ok(Self {
            clip_name: clip_name.to_string(),
            def,
            frame: def.start_frame,
            elapsed: 0.0,
            finished: false,
        })
    }

    pub fn clip_name(&self) -> &str {
        &self.clip_name
    }

    pub fn def(&self) -> &AnimationDef {
        &self.def
    }

    pub fn row(&self) -> u32 {
        self.def.row
    }

    /// Switch to `clip_name`. Returns `Ok(false)` without touching the cursor
    /// when that clip is already active.
    pub fn set_animation(&mut self, set: &AnimationSet, clip_name: &str) -> Result<bool, String> {
        if self.clip_name == clip_name {
            return Ok(false);
        }
        let def = *set.require(clip_name)?;
        self.clip_name.clear();
        self.clip_name.push_str(clip_name);
        self.def = def;
        self.restart();
        Ok(true)
    }

    /// Rewind the active clip to its first frame.
    pub fn restart(&mut self) {
        self.frame = self.def.start_frame;
        self.elapsed = 0.0;
        self.finished = false;
    }

    /// Advance by `dt` seconds. Every whole frame period in the accumulator is
    /// consumed, however many there are. Returns true only on the call that
    /// finished a non-looping animation.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.finished {
            self.elapsed = 0.0;
            return false;
        }
        self.check_cursor();

        self.elapsed += dt;
        let period = self.def.frame_period();
        if self.elapsed < period {
            return false;
        }
        let periods = (self.elapsed / period).floor();
        self.elapsed = (self.elapsed - periods * period).max(0.0);

        let steps = periods as u64;
        let remaining = u64::from(self.def.end_frame - self.frame);
        if steps <= remaining {
            self.frame += steps as u32;
            false
        } else if self.def.looping {
            let offset = u64::from(self.frame - self.def.start_frame) + steps;
            self.frame = self.def.start_frame + (offset % u64::from(self.def.frame_count())) as u32;
            false
        } else {
            // One period past the last frame ends the play-through.
            self.frame = self.def.end_frame;
            self.finished = true;
            self.elapsed = 0.0;
            true
        }
    }

    /// Position within the clip in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let span = (self.def.end_frame - self.def.start_frame).max(1);
        self.frame.saturating_sub(self.def.start_frame) as f32 / span as f32
    }

    fn check_cursor(&mut self) {
        if self.frame < self.def.start_frame || self.frame > self.def.end_frame {
            log::error!(
                "Animator cursor {} outside [{}, {}] for clip '{}'; clamping",
                self.frame,
                self.def.start_frame,
                self.def.end_frame,
                self.clip_name
            );
            self.frame = self.frame.clamp(self.def.start_frame, self.def.end_frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(row: u32, start: u32, end: u32, fps: f32) -> AnimationSpec {
        AnimationSpec {
            row,
            start_frame: start,
            end_frame: end,
            fps: Some(fps),
            looping: None,
        }
    }

    fn hero_set() -> AnimationSet {
        let mut specs = HashMap::new();
        specs.insert("idle".to_string(), spec(0, 0, 7, 8.0));
        specs.insert("run".to_string(), spec(1, 0, 7, 12.0));
        specs.insert("attack".to_string(), spec(3, 0, 7, 14.0));
        specs.insert("hurt".to_string(), spec(5, 0, 3, 10.0));
        specs.insert("death".to_string(), spec(6, 0, 7, 10.0));
        specs.insert("blink".to_string(), spec(7, 2, 2, 10.0));
        specs.insert("pose".to_string(), spec(7, 4, 4, 10.0));
        AnimationSet::from_specs("hero", &specs).expect("valid set")
    }

    #[test]
    fn looping_follows_naming_convention() {
        let set = hero_set();
        assert!(set.require("idle").unwrap().looping);
        assert!(set.require("run").unwrap().looping);
        assert!(!set.require("attack").unwrap().looping);
        assert!(!set.require("hurt").unwrap().looping);
        assert!(!set.require("death").unwrap().looping);
    }

    #[test]
    fn explicit_looping_overrides_convention() {
        let mut specs = HashMap::new();
        let mut s = spec(0, 0, 3, 10.0);
        s.looping = Some(true);
        specs.insert("attack".to_string(), s);
        let set = AnimationSet::from_specs("x", &specs).expect("valid set");
        assert!(set.require("attack").unwrap().looping);
    }

    #[test]
    fn from_specs_rejects_inverted_range() {
        let mut specs = HashMap::new();
        specs.insert("idle".to_string(), spec(0, 5, 2, 8.0));
        let err = AnimationSet::from_specs("bad", &specs).expect_err("inverted range");
        assert!(err.contains("after end_frame"));
    }

    #[test]
    fn from_specs_rejects_nonpositive_fps() {
        let mut specs = HashMap::new();
        specs.insert("idle".to_string(), spec(0, 0, 2, 0.0));
        let err = AnimationSet::from_specs("bad", &specs).expect_err("zero fps");
        assert!(err.contains("invalid fps"));
    }

    #[test]
    fn missing_fps_uses_default() {
        let mut specs = HashMap::new();
        let mut s = spec(0, 0, 2, 1.0);
        s.fps = None;
        specs.insert("idle".to_string(), s);
        let set = AnimationSet::from_specs("x", &specs).expect("valid set");
        assert_eq!(set.require("idle").unwrap().fps, DEFAULT_FPS);
    }

    #[test]
    fn from_specs_rejects_fps_above_ceiling() {
        let mut specs = HashMap::new();
        specs.insert("idle".to_string(), spec(0, 0, 7, 1.0e9));
        let err = AnimationSet::from_specs("bad", &specs).expect_err("absurd fps");
        assert!(err.contains("invalid fps"));

        specs.insert("idle".to_string(), spec(0, 0, 7, MAX_FPS));
        assert!(AnimationSet::from_specs("fast", &specs).is_ok());
    }

    #[test]
    fn fastest_clip_consumes_a_whole_step_at_once() {
        let mut specs = HashMap::new();
        specs.insert("idle".to_string(), spec(0, 0, 7, MAX_FPS));
        specs.insert("attack".to_string(), spec(3, 0, 7, MAX_FPS));
        let set = AnimationSet::from_specs("fast", &specs).expect("valid set");

        // 1/30 s at 1000 fps is 33 whole periods: four full cycles plus one.
        let mut idle = Animator::new(&set, "idle").expect("idle exists");
        assert!(!idle.advance(1.0 / 30.0));
        assert_eq!(idle.frame, 1);
        assert!(idle.elapsed < idle.def().frame_period());

        let mut attack = Animator::new(&set, "attack").expect("attack exists");
        assert!(attack.advance(1.0 / 30.0));
        assert_eq!(attack.frame, 7);
        assert!(!attack.advance(1.0 / 30.0));
    }

    #[test]
    fn oversized_rate_on_a_raw_definition_is_clamped() {
        let def = AnimationDef {
            row: 0,
            start_frame: 0,
            end_frame: 7,
            fps: 1.0e9,
            looping: true,
        };
        assert_eq!(def.frame_period(), 1.0 / MAX_FPS);
    }

    #[test]
    fn frame_period_floors_fps_at_one() {
        let def = AnimationDef {
            row: 0,
            start_frame: 0,
            end_frame: 1,
            fps: 0.25,
            looping: true,
        };
        assert_eq!(def.frame_period(), 1.0);
    }

    #[test]
    fn unknown_clip_is_an_error() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "idle").expect("idle exists");
        let err = animator
            .set_animation(&set, "moonwalk")
            .expect_err("unknown clip should fail");
        assert!(err.contains("moonwalk"));
        assert_eq!(animator.clip_name(), "idle");
        assert!(Animator::new(&set, "moonwalk").is_err());
    }

    #[test]
    fn set_animation_same_name_is_noop() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "idle").expect("idle exists");
        animator.advance(0.3);
        let frame = animator.frame;
        let elapsed = animator.elapsed;
        assert!(frame > 0);

        let switched = animator.set_animation(&set, "idle").expect("known clip");
        assert!(!switched);
        assert_eq!(animator.frame, frame);
        assert_eq!(animator.elapsed, elapsed);
    }

    #[test]
    fn set_animation_resets_cursor() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "idle").expect("idle exists");
        animator.advance(0.3);
        assert!(animator.set_animation(&set, "hurt").expect("known clip"));
        assert_eq!(animator.frame, 0);
        assert_eq!(animator.elapsed, 0.0);
        assert!(!animator.finished);
        assert_eq!(animator.row(), 5);
    }

    #[test]
    fn restart_replays_finished_clip() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "hurt").expect("hurt exists");
        animator.advance(1.0);
        assert!(animator.finished);
        animator.restart();
        assert_eq!(animator.clip_name(), "hurt");
        assert_eq!(animator.frame, 0);
        assert!(!animator.finished);
        assert!(!animator.advance(0.05));
    }

    #[test]
    fn large_step_consumes_every_period() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "idle").expect("idle exists");
        // 8 fps: 0.5s is four whole periods.
        animator.advance(0.5 + 0.001);
        assert_eq!(animator.frame, 4);
    }

    #[test]
    fn looping_cycles_and_never_finishes() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "idle").expect("idle exists");
        let period = set.require("idle").unwrap().frame_period();
        let mut seen_wrap = false;
        let mut last = animator.frame;
        for _ in 0..40 {
            let finished = animator.advance(period + 1e-4);
            assert!(!finished);
            assert!(!animator.finished);
            if animator.frame < last {
                assert_eq!(last, 7);
                assert_eq!(animator.frame, 0);
                seen_wrap = true;
            }
            last = animator.frame;
        }
        assert!(seen_wrap, "looping clip should wrap back to start");
    }

    #[test]
    fn non_looping_reports_finished_once_and_pins_end() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "hurt").expect("hurt exists");
        let mut finished_reports = 0;
        for _ in 0..60 {
            if animator.advance(1.0 / 30.0) {
                finished_reports += 1;
            }
            assert!(animator.frame <= 3);
        }
        assert_eq!(finished_reports, 1);
        assert!(animator.finished);
        assert_eq!(animator.frame, 3);
    }

    #[test]
    fn single_frame_non_looping_finishes_on_first_crossing() {
        let mut specs = HashMap::new();
        specs.insert("death".to_string(), spec(4, 2, 2, 10.0));
        let set = AnimationSet::from_specs("x", &specs).expect("valid set");
        let mut animator = Animator::new(&set, "death").expect("death exists");
        assert!(!animator.advance(0.05));
        assert!(animator.advance(0.06));
        assert_eq!(animator.frame, 2);
    }

    #[test]
    fn single_frame_looping_holds_frame() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "blink").expect("blink exists");
        for _ in 0..10 {
            assert!(!animator.advance(0.2));
            assert_eq!(animator.frame, 2);
        }
    }

    #[test]
    fn cursor_stays_in_range_for_clamped_steps() {
        let set = hero_set();
        let names = ["idle", "run", "attack", "hurt", "death", "blink", "pose"];
        for name in names {
            let mut animator = Animator::new(&set, name).expect("clip exists");
            let def = *animator.def();
            // Deterministic pseudo-random dt in [0, 1/30].
            let mut seed: u32 = 12345;
            for _ in 0..500 {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let dt = (seed >> 16) as f32 / 65_535.0 * (1.0 / 30.0);
                animator.advance(dt);
                assert!(animator.frame >= def.start_frame && animator.frame <= def.end_frame);
            }
        }
    }

    #[test]
    fn out_of_range_cursor_is_clamped() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "pose").expect("pose exists");
        animator.frame = 9;
        animator.advance(0.0);
        assert_eq!(animator.frame, 4);
    }

    #[test]
    fn progress_spans_zero_to_one() {
        let set = hero_set();
        let mut animator = Animator::new(&set, "attack").expect("attack exists");
        assert_eq!(animator.progress(), 0.0);
        animator.frame = 7;
        assert_eq!(animator.progress(), 1.0);
        animator.frame = 3;
        assert!((animator.progress() - 3.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn specs_parse_from_json() {
        let json = r#"{
            "idle": { "row": 0, "start_frame": 0, "end_frame": 5, "fps": 8 },
            "death": { "row": 4, "start_frame": 0, "end_frame": 5 }
        }"#;
        let specs: HashMap<String, AnimationSpec> =
            serde_json::from_str(json).expect("valid json");
        let set = AnimationSet::from_specs("goblin", &specs).expect("valid set");
        assert_eq!(set.len(), 2);
        let death = set.require("death").unwrap();
        assert_eq!(death.row, 4);
        assert!(!death.looping);
        assert!((death.duration() - 6.0 / DEFAULT_FPS).abs() < 1e-6);
    }
}
