use glam::Vec2;

use crate::collision::{Aabb, Landing, PlatformLayout};
use crate::config::EntityConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerInput {
    pub move_x: f32,
    pub jump_pressed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BodyParams {
    pub speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub foot_inset: f32,
}

impl BodyParams {
    pub fn from_config(config: &EntityConfig) -> Self {
        Self {
            speed: config.speed,
            jump_velocity: config.jump_velocity,
            gravity: config.gravity,
            foot_inset: config.foot_inset,
        }
    }

    /// Bodies without gravity move flat along the ground and never jump.
    pub fn is_flat(&self) -> bool {
        self.gravity <= 0.0
    }
}

/// Kinematic state of one entity: top-left position, velocity, and size.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            on_ground: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// One fixed step: horizontal intent, optional jump, gravity, semi-implicit
    /// Euler integration, then landing and world clamp. Returns the landing if
    /// the body came to rest on a platform this step.
    pub fn step(
        &mut self,
        input: ControllerInput,
        params: &BodyParams,
        dt: f32,
        layout: &PlatformLayout,
    ) -> Option<Landing> {
        self.velocity.x = input.move_x * params.speed;

        if params.is_flat() {
            self.velocity.y = 0.0;
            self.position.x += self.velocity.x * dt;
            self.position.x = layout.clamp_x(self.position.x, self.size.x);
            self.on_ground = true;
            return None;
        }

        // Jump is only legal from the ground.
        if input.jump_pressed && self.on_ground {
            self.velocity.y = -params.jump_velocity;
            self.on_ground = false;
        }

        self.velocity.y += params.gravity * dt;

        let prev = self.aabb();
        self.position += self.velocity * dt;

        let landing =
            layout.resolve_landing(prev, self.aabb(), self.velocity.y, params.foot_inset);
        match landing {
            Some(landing) => {
                if !self.on_ground {
                    log::trace!("Landed on platform {} at y={}", landing.platform_index, landing.top);
                }
                self.position.y = landing.top - self.size.y;
                self.velocity.y = 0.0;
                self.on_ground = true;
            }
            None => self.on_ground = false,
        }

        self.position.x = layout.clamp_x(self.position.x, self.size.x);
        landing
    }
}
