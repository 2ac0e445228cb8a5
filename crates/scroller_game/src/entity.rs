//! Simulated characters.
//!
//! An `Archetype` holds what every instance of an entity type shares: tuning,
//! the validated animation set and the sheet geometry. It is built once at
//! boot and handed out behind an `Arc`. An `Entity` is one live instance with
//! its own body, health, timers and animation cursor.
//!
//! Boxes are authored facing right in sheet-frame pixels. At runtime they are
//! scaled and, when the entity faces left, mirrored inside the body:
//! `local_x = body_w - (r.x + r.w) * scale`.

use glam::Vec2;
use std::sync::Arc;

use scroller_core::animation::{AnimationSet, Animator};

use crate::assets::SpriteSheet;
use crate::collision::{Aabb, PlatformLayout};
use crate::config::{EntityConfig, EntityRole, RectConfig};
use crate::controller::{Body, BodyParams};
use crate::state_machine::{clip_for, next_state, EntityState, StateInput};

pub type EntityId = usize;

pub const HERO_ID: EntityId = 0;

#[derive(Debug)]
pub struct Archetype {
    pub name: String,
    pub config: EntityConfig,
    pub animations: AnimationSet,
    pub sheet: SpriteSheet,
    pub params: BodyParams,
}

impl Archetype {
    pub fn build(
        name: &str,
        role: EntityRole,
        config: &EntityConfig,
        sheet: SpriteSheet,
    ) -> Result<Self, String> {
        let animations = AnimationSet::from_specs(name, &config.animations)?;
        for clip in config.required_clips(role) {
            animations.require(clip)?;
        }
        sheet.check_clips(&animations)?;
        log::debug!("Built {role:?} archetype '{name}' with {} clips", animations.len());
        Ok(Self {
            name: name.to_string(),
            config: config.clone(),
            animations,
            sheet,
            params: BodyParams::from_config(config),
        })
    }

    /// On-screen body size: one sheet frame times `scale`.
    pub fn body_size(&self) -> Vec2 {
        Vec2::new(
            self.sheet.frame_w as f32 * self.config.scale,
            self.sheet.frame_h as f32 * self.config.scale,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub archetype: Arc<Archetype>,
    pub body: Body,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
    pub health: u32,
    pub state: EntityState,
    pub animator: Animator,
    pub attack_cooldown: f32,
    pub invulnerable: f32,
    spawn: Vec2,
    spawn_facing: f32,
    /// Targets already hit by the current attack.
    struck: Vec<EntityId>,
}

impl Entity {
    /// Place an entity standing on `ground_y` with its left edge at `start_x`.
    pub fn spawn(
        id: EntityId,
        archetype: Arc<Archetype>,
        start_x: f32,
        ground_y: f32,
        facing: f32,
    ) -> Result<Self, String> {
        let size = archetype.body_size();
        let spawn = Vec2::new(start_x, ground_y - size.y);
        let animator = Animator::new(&archetype.animations, "idle")?;
        let mut body = Body::new(spawn, size);
        body.on_ground = true;
        Ok(Self {
            id,
            health: archetype.config.health,
            archetype,
            body,
            facing,
            state: EntityState::Idle,
            animator,
            attack_cooldown: 0.0,
            invulnerable: 0.0,
            spawn,
            spawn_facing: facing,
            struck: Vec::new(),
        })
    }

    /// Back to the boot state: spawn position, full health, idle.
    pub fn reset(&mut self) -> Result<(), String> {
        self.body = Body::new(self.spawn, self.archetype.body_size());
        self.body.on_ground = true;
        self.facing = self.spawn_facing;
        self.health = self.archetype.config.health;
        self.state = EntityState::Idle;
        self.animator = Animator::new(&self.archetype.animations, "idle")?;
        self.attack_cooldown = 0.0;
        self.invulnerable = 0.0;
        self.struck.clear();
        Ok(())
    }

    pub fn config(&self) -> &EntityConfig {
        &self.archetype.config
    }

    pub fn is_dead(&self) -> bool {
        self.state == EntityState::Death || self.health == 0
    }

    pub fn center_x(&self) -> f32 {
        self.body.aabb().center_x()
    }

    pub fn hurt_box(&self) -> Aabb {
        self.scaled_box(self.config().hitbox, self.facing)
    }

    pub fn attack_box(&self) -> Aabb {
        self.scaled_box(self.config().attack_box, self.facing)
    }

    /// Attack box as it would be if the entity turned to `facing`.
    pub fn attack_box_facing(&self, facing: f32) -> Aabb {
        self.scaled_box(self.config().attack_box, facing)
    }

    fn scaled_box(&self, rect: RectConfig, facing: f32) -> Aabb {
        let scale = self.config().scale;
        let w = rect.w * scale;
        let h = rect.h * scale;
        let local_x = if facing < 0.0 {
            self.body.size.x - (rect.x + rect.w) * scale
        } else {
            rect.x * scale
        };
        Aabb::new(
            self.body.position.x + local_x,
            self.body.position.y + rect.y * scale,
            w,
            h,
        )
    }

    pub fn tick_timers(&mut self, dt: f32) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);
    }

    pub fn can_attack(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    pub fn can_be_struck(&self) -> bool {
        !self.is_dead() && self.invulnerable <= 0.0
    }

    pub fn hit_window_active(&self) -> bool {
        self.state == EntityState::Attack
            && self.config().hit_window.contains(self.animator.progress())
    }

    pub fn has_struck(&self, target: EntityId) -> bool {
        self.struck.contains(&target)
    }

    pub fn record_strike(&mut self, target: EntityId) {
        self.struck.push(target);
    }

    /// Transition table input with this entity's own facts filled in.
    pub fn state_input(&self, moving: bool, crouching: bool, attack_requested: bool) -> StateInput {
        StateInput {
            health: self.health,
            grounded: self.body.on_ground,
            moving,
            crouching,
            attack_requested,
            animation_finished: self.animator.finished,
            damaged: false,
            victorious: false,
        }
    }

    /// Enter `next`, switching clips. Entering `Attack` starts the cooldown
    /// and opens a fresh struck list. Returns whether the state changed.
    pub fn set_state(&mut self, next: EntityState) -> Result<bool, String> {
        if next == self.state {
            return Ok(false);
        }
        log::debug!(
            "{}#{}: {:?} -> {:?}",
            self.archetype.name,
            self.id,
            self.state,
            next
        );
        if next == EntityState::Attack {
            self.attack_cooldown = self.config().attack_cooldown;
            self.struck.clear();
        }
        self.state = next;
        let clip = clip_for(next, &self.archetype.config.walk_clip);
        self.animator.set_animation(&self.archetype.animations, clip)?;
        Ok(true)
    }

    /// Apply one point of damage and push the entity `knockback` pixels in
    /// direction `push_dir`. Returns the state entered.
    pub fn receive_hit(
        &mut self,
        push_dir: f32,
        knockback: f32,
        layout: &PlatformLayout,
    ) -> Result<EntityState, String> {
        if self.health == 0 {
            log::error!(
                "{}#{} hit with no health left; keeping health at 0",
                self.archetype.name,
                self.id
            );
        }
        self.health = self.health.saturating_sub(1);
        self.invulnerable = self.config().invulnerability;

        let input = StateInput {
            damaged: true,
            ..self.state_input(false, false, false)
        };
        let next = next_state(self.state, &input);
        if next == EntityState::Hurt && self.state == EntityState::Hurt {
            self.animator.restart();
        } else {
            self.set_state(next)?;
        }

        let pushed = self.body.position.x + push_dir * knockback;
        self.body.position.x = layout.clamp_x(pushed, self.body.size.x);
        Ok(next)
    }
}

#[cfg(test)]
pub(crate) fn test_archetype(name: &str) -> Arc<Archetype> {
    let config = crate::config::GameConfig::default();
    let (role, entity_config) = match name {
        "hero" => (EntityRole::Hero, config.hero),
        other => (EntityRole::Enemy, config.enemy_types[other].clone()),
    };
    let sheet = SpriteSheet::from_dimensions(name, (1024, 1024), 8, 8).expect("valid sheet");
    Arc::new(Archetype::build(name, role, &entity_config, sheet).expect("valid archetype"))
}
