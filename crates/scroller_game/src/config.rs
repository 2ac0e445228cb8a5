//! Game tuning: world geometry plus one configuration block per entity type.
//!
//! Boxes (`hitbox`, `attack_box`) are authored in sheet-frame pixels with the
//! character facing right; they are scaled by `scale` and mirrored at runtime.
//! Everything is validated at load time so the simulation can index clips and
//! divide by sheet sizes without re-checking.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use scroller_core::animation::AnimationSpec;
use scroller_core::time::DEFAULT_MAX_DT;

pub const CONFIG_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub version: String,
    pub world: WorldConfig,
    pub ground_y: f32,
    #[serde(default = "default_max_dt")]
    pub max_dt: f32,
    pub platforms: Vec<RectConfig>,
    pub hero: EntityConfig,
    pub hero_start_x: f32,
    pub enemy_types: HashMap<String, EntityConfig>,
    pub enemies: Vec<EnemySpawn>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RectConfig {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetConfig {
    pub source: String,
    pub cols: u32,
    pub rows: u32,
}

/// Fraction of the attack animation during which a swing can land.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub start: f32,
    pub end: f32,
}

impl HitWindow {
    pub fn contains(&self, progress: f32) -> bool {
        progress > self.start && progress < self.end
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self {
            start: 0.3,
            end: 0.8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EntityConfig {
    pub sheet: SheetConfig,
    pub speed: f32,
    #[serde(default)]
    pub jump_velocity: f32,
    /// Downward acceleration in px/s². Zero gives flat patrol kinematics.
    #[serde(default)]
    pub gravity: f32,
    pub animations: HashMap<String, AnimationSpec>,
    pub hitbox: RectConfig,
    pub attack_box: RectConfig,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_health")]
    pub health: u32,
    #[serde(default = "default_attack_cooldown")]
    pub attack_cooldown: f32,
    #[serde(default = "default_invulnerability")]
    pub invulnerability: f32,
    /// Distance a landed strike pushes the defender away.
    #[serde(default)]
    pub knockback: f32,
    #[serde(default)]
    pub hit_window: HitWindow,
    /// Horizontal inset of the landing probe from each side of the body.
    #[serde(default)]
    pub foot_inset: f32,
    #[serde(default = "default_walk_clip")]
    pub walk_clip: String,
    #[serde(default = "default_aggro_range")]
    pub aggro_range: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnemySpawn {
    pub kind: String,
    pub x: f32,
}

/// Which side of the fight an entity type is on; decides the clips it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Hero,
    Enemy,
}

impl EntityConfig {
    pub fn required_clips(&self, role: EntityRole) -> Vec<&str> {
        let mut clips = vec!["idle", self.walk_clip.as_str(), "attack", "hurt", "death"];
        if role == EntityRole::Hero || self.gravity > 0.0 {
            clips.push("jump");
        }
        if role == EntityRole::Hero {
            clips.push("crouch");
            clips.push("victory");
        }
        clips
    }

    fn validate(&self, name: &str, role: EntityRole) -> Result<(), String> {
        let fail = |msg: String| {
            Err::<(), String>(format!("Config validation failed: '{name}' {msg}"))
        };

        if self.sheet.source.is_empty() {
            return fail("sheet source is empty".to_string());
        }
        if self.sheet.cols == 0 || self.sheet.rows == 0 {
            return fail("sheet cols and rows must be > 0".to_string());
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return fail(format!("speed must be >= 0 (got {})", self.speed));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return fail(format!("gravity must be >= 0 (got {})", self.gravity));
        }
        if role == EntityRole::Hero && (self.gravity <= 0.0 || self.jump_velocity <= 0.0) {
            return fail("hero needs positive gravity and jump_velocity".to_string());
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return fail(format!("scale must be > 0 (got {})", self.scale));
        }
        if self.health == 0 {
            return fail("health must be > 0".to_string());
        }
        for (label, rect) in [("hitbox", self.hitbox), ("attack_box", self.attack_box)] {
            if rect.w <= 0.0 || rect.h <= 0.0 {
                return fail(format!("{label} must have positive size"));
            }
        }
        if self.attack_cooldown < 0.0 || self.invulnerability <= 0.0 || self.knockback < 0.0 {
            return fail(
                "attack_cooldown and knockback must be >= 0, invulnerability > 0".to_string(),
            );
        }
        let window = self.hit_window;
        if !(0.0 <= window.start && window.start < window.end && window.end <= 1.0) {
            return fail(format!(
                "hit_window must satisfy 0 <= start < end <= 1 (got {} .. {})",
                window.start, window.end
            ));
        }
        if self.foot_inset < 0.0 {
            return fail("foot_inset must be >= 0".to_string());
        }
        for clip in self.required_clips(role) {
            if !self.animations.contains_key(clip) {
                return fail(format!("is missing required animation '{clip}'"));
            }
        }
        Ok(())
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.version != CONFIG_VERSION {
            return Err(format!(
                "Config validation failed: unsupported version '{}'",
                self.version
            ));
        }
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err("Config validation failed: world size must be > 0".to_string());
        }
        if !(self.max_dt > 0.0 && self.max_dt <= 0.1) {
            return Err(format!(
                "Config validation failed: max_dt must be in (0, 0.1] (got {})",
                self.max_dt
            ));
        }
        if self.platforms.is_empty() {
            log::warn!("Config has no platforms; the hero will fall forever.");
        }
        for (i, platform) in self.platforms.iter().enumerate() {
            if platform.w <= 0.0 || platform.h <= 0.0 {
                return Err(format!(
                    "Config validation failed: platform {i} must have positive size"
                ));
            }
        }

        self.hero.validate("hero", EntityRole::Hero)?;
        for (name, enemy) in &self.enemy_types {
            enemy.validate(name, EntityRole::Enemy)?;
        }

        if self.enemies.is_empty() {
            return Err("Config validation failed: at least one enemy is required".to_string());
        }
        let mut used = HashSet::new();
        for spawn in &self.enemies {
            if !self.enemy_types.contains_key(&spawn.kind) {
                return Err(format!(
                    "Config validation failed: enemy spawn references unknown kind '{}'",
                    spawn.kind
                ));
            }
            used.insert(spawn.kind.as_str());
        }
        for name in self.enemy_types.keys() {
            if !used.contains(name.as_str()) {
                log::debug!("Enemy type '{name}' is defined but never spawned");
            }
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn anim(row: u32, end_frame: u32, fps: f32) -> AnimationSpec {
    AnimationSpec {
        row,
        start_frame: 0,
        end_frame,
        fps: Some(fps),
        looping: None,
    }
}

impl Default for GameConfig {
    /// Built-in tuning for 1024x1024 sheets of 8x8 cells (128px frames).
    fn default() -> Self {
        let ground_y = 420.0;
        let world = WorldConfig {
            width: 960.0,
            height: 540.0,
        };

        let hero_animations = HashMap::from([
            ("idle".to_string(), anim(0, 7, 8.0)),
            ("run".to_string(), anim(1, 7, 12.0)),
            ("jump".to_string(), anim(2, 5, 8.0)),
            ("attack".to_string(), anim(3, 7, 14.0)),
            ("crouch".to_string(), anim(4, 3, 8.0)),
            ("hurt".to_string(), anim(5, 3, 10.0)),
            ("death".to_string(), anim(6, 7, 10.0)),
            ("victory".to_string(), anim(7, 5, 8.0)),
        ]);
        let hero = EntityConfig {
            sheet: SheetConfig {
                source: "assets/sprites/hero.png".to_string(),
                cols: 8,
                rows: 8,
            },
            speed: 220.0,
            jump_velocity: 650.0,
            gravity: 1800.0,
            animations: hero_animations,
            hitbox: RectConfig {
                x: 44.0,
                y: 40.0,
                w: 40.0,
                h: 80.0,
            },
            attack_box: RectConfig {
                x: 80.0,
                y: 50.0,
                w: 40.0,
                h: 50.0,
            },
            scale: 2.0,
            health: 3,
            attack_cooldown: 0.5,
            invulnerability: 0.8,
            knockback: 24.0,
            hit_window: HitWindow::default(),
            foot_inset: 80.0,
            walk_clip: "run".to_string(),
            aggro_range: 0.0,
        };

        let goblin_animations = HashMap::from([
            ("idle".to_string(), anim(0, 5, 8.0)),
            ("walk".to_string(), anim(1, 5, 10.0)),
            ("attack".to_string(), anim(2, 5, 10.0)),
            ("hurt".to_string(), anim(3, 3, 10.0)),
            ("death".to_string(), anim(4, 5, 10.0)),
        ]);
        let goblin = EntityConfig {
            sheet: SheetConfig {
                source: "assets/sprites/goblin.png".to_string(),
                cols: 8,
                rows: 8,
            },
            speed: 120.0,
            jump_velocity: 0.0,
            gravity: 0.0,
            animations: goblin_animations,
            hitbox: RectConfig {
                x: 44.0,
                y: 48.0,
                w: 40.0,
                h: 72.0,
            },
            attack_box: RectConfig {
                x: 76.0,
                y: 56.0,
                w: 36.0,
                h: 44.0,
            },
            scale: 2.0,
            health: 3,
            attack_cooldown: 0.8,
            invulnerability: 0.4,
            knockback: 16.0,
            hit_window: HitWindow::default(),
            foot_inset: 80.0,
            walk_clip: "walk".to_string(),
            aggro_range: default_aggro_range(),
        };

        Self {
            version: CONFIG_VERSION.to_string(),
            world,
            ground_y,
            max_dt: DEFAULT_MAX_DT,
            platforms: vec![
                RectConfig {
                    x: 0.0,
                    y: ground_y,
                    w: world.width,
                    h: world.height - ground_y,
                },
                RectConfig {
                    x: 180.0,
                    y: 340.0,
                    w: 160.0,
                    h: 20.0,
                },
                RectConfig {
                    x: 420.0,
                    y: 300.0,
                    w: 140.0,
                    h: 20.0,
                },
                RectConfig {
                    x: 680.0,
                    y: 260.0,
                    w: 160.0,
                    h: 20.0,
                },
            ],
            hero,
            hero_start_x: 80.0,
            enemy_types: HashMap::from([("goblin".to_string(), goblin)]),
            enemies: vec![EnemySpawn {
                kind: "goblin".to_string(),
                x: 640.0,
            }],
        }
    }
}

const fn default_max_dt() -> f32 {
    DEFAULT_MAX_DT
}

const fn default_scale() -> f32 {
    2.0
}

const fn default_health() -> u32 {
    3
}

const fn default_attack_cooldown() -> f32 {
    0.5
}

const fn default_invulnerability() -> f32 {
    0.4
}

const fn default_aggro_range() -> f32 {
    260.0
}

fn default_walk_clip() -> String {
    "walk".to_string()
}
