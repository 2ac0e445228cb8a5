//! The simulation context and its per-frame loop.
//!
//! `GameWorld` owns everything a round needs: validated config, platform
//! layout, the hero, the enemies and the outcome. There are no globals; the
//! host boots a world, then calls `tick` once per frame with the raw frame
//! delta and the current input, and asks for render data afterwards.
//!
//! Tick order is fixed:
//! 1. sanitize `dt`
//! 2. hero: input, kinematics, state, strikes on enemies
//! 3. enemies in spawn order: AI, kinematics, state, strike on the hero
//! 4. advance every animator, dead entities included
//! 5. decide the outcome

use std::collections::HashMap;
use std::sync::Arc;

use scroller_core::input::{Action, InputState};
use scroller_core::time::sanitize_dt;

use crate::ai::{self, EnemyIntent};
use crate::assets::{load_sheet, SheetLoader};
use crate::collision::PlatformLayout;
use crate::combat::try_strike;
use crate::config::{EntityRole, GameConfig};
use crate::controller::ControllerInput;
use crate::entity::{Archetype, Entity, HERO_ID};
use crate::frame_event::{FrameEvent, Outcome};
use crate::render::{Renderer, SpriteDraw};
use crate::state_machine::{next_state, EntityState, StateInput};

pub struct GameWorld {
    config: GameConfig,
    layout: PlatformLayout,
    hero: Entity,
    enemies: Vec<Entity>,
    outcome: Outcome,
    tick_count: u64,
}

impl GameWorld {
    /// Validate `config`, load every sheet, then spawn the cast. Any failure
    /// aborts boot; there is no partially started world.
    pub fn boot(config: GameConfig, loader: &dyn SheetLoader) -> Result<Self, String> {
        config.validate()?;

        let hero_sheet = load_sheet(loader, &config.hero.sheet)?;
        let mut enemy_sheets = HashMap::new();
        for (name, enemy) in &config.enemy_types {
            enemy_sheets.insert(name.as_str(), load_sheet(loader, &enemy.sheet)?);
        }

        let hero_archetype = Arc::new(Archetype::build(
            "hero",
            EntityRole::Hero,
            &config.hero,
            hero_sheet,
        )?);
        let mut archetypes = HashMap::new();
        for (name, sheet) in enemy_sheets {
            let archetype =
                Archetype::build(name, EntityRole::Enemy, &config.enemy_types[name], sheet)?;
            archetypes.insert(name.to_string(), Arc::new(archetype));
        }

        let hero = Entity::spawn(
            HERO_ID,
            hero_archetype,
            config.hero_start_x,
            config.ground_y,
            1.0,
        )?;
        let mut enemies = Vec::with_capacity(config.enemies.len());
        for (index, spawn) in config.enemies.iter().enumerate() {
            let archetype = archetypes
                .get(spawn.kind.as_str())
                .ok_or_else(|| format!("Enemy spawn references unknown kind '{}'", spawn.kind))?;
            let facing = if spawn.x < config.hero_start_x { 1.0 } else { -1.0 };
            enemies.push(Entity::spawn(
                index + 1,
                Arc::clone(archetype),
                spawn.x,
                config.ground_y,
                facing,
            )?);
        }

        let layout = PlatformLayout::from_config(&config);
        log::info!(
            "World booted: {}x{} with {} platforms and {} enemies",
            config.world.width,
            config.world.height,
            layout.platforms().len(),
            enemies.len()
        );

        Ok(Self {
            config,
            layout,
            hero,
            enemies,
            outcome: Outcome::InProgress,
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn hero(&self) -> &Entity {
        &self.hero
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance the simulation by one frame. `raw_dt` is the wall-clock delta
    /// in seconds; it is sanitized before use.
    pub fn tick(&mut self, raw_dt: f64, input: &InputState) -> Result<Vec<FrameEvent>, String> {
        let dt = sanitize_dt(raw_dt, self.config.max_dt);
        self.tick_count += 1;
        log::trace!("tick {} dt {dt:.4}", self.tick_count);

        let mut events = Vec::new();
        self.update_hero(dt, input, &mut events)?;
        self.update_enemies(dt, &mut events)?;

        self.hero.animator.advance(dt);
        for enemy in &mut self.enemies {
            enemy.animator.advance(dt);
        }

        self.update_outcome(&mut events);
        Ok(events)
    }

    fn update_hero(
        &mut self,
        dt: f32,
        input: &InputState,
        events: &mut Vec<FrameEvent>,
    ) -> Result<(), String> {
        let Self {
            hero,
            enemies,
            layout,
            outcome,
            ..
        } = self;

        hero.tick_timers(dt);
        if hero.is_dead() {
            return Ok(());
        }

        let controllable = !matches!(hero.state, EntityState::Hurt | EntityState::Victory);
        let victorious = *outcome == Outcome::Won;
        let crouching = controllable && hero.body.on_ground && input.is_held(Action::Crouch);
        let move_x = if controllable && !crouching {
            input.move_axis()
        } else {
            0.0
        };
        if move_x != 0.0 {
            hero.facing = move_x.signum();
        }

        let controls = ControllerInput {
            move_x,
            jump_pressed: controllable && !crouching && input.is_just_pressed(Action::Jump),
        };
        let params = hero.archetype.params;
        hero.body.step(controls, &params, dt, layout);

        let attack_requested =
            controllable && !victorious && input.is_held(Action::Attack) && hero.can_attack();
        let state_input = StateInput {
            victorious,
            ..hero.state_input(move_x != 0.0, crouching, attack_requested)
        };
        let next = next_state(hero.state, &state_input);
        if hero.set_state(next)? && next == EntityState::Attack {
            events.push(FrameEvent::AttackStarted { id: hero.id });
        }

        if hero.hit_window_active() {
            for enemy in enemies.iter_mut() {
                if let Some(strike) = try_strike(hero, enemy, layout)? {
                    events.push(FrameEvent::EnemyDamaged {
                        id: strike.defender,
                        health: strike.health,
                    });
                    if strike.killed {
                        log::info!("Enemy #{} defeated", strike.defender);
                        events.push(FrameEvent::EntityDied {
                            id: strike.defender,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn update_enemies(&mut self, dt: f32, events: &mut Vec<FrameEvent>) -> Result<(), String> {
        let Self {
            hero,
            enemies,
            layout,
            ..
        } = self;

        for enemy in enemies.iter_mut() {
            enemy.tick_timers(dt);
            if enemy.is_dead() {
                continue;
            }

            let busy = matches!(enemy.state, EntityState::Attack | EntityState::Hurt);
            let intent = if busy {
                EnemyIntent::idle(enemy.facing)
            } else {
                ai::decide(enemy, hero)
            };
            enemy.facing = intent.facing;

            let controls = ControllerInput {
                move_x: intent.move_x,
                jump_pressed: false,
            };
            let params = enemy.archetype.params;
            enemy.body.step(controls, &params, dt, layout);

            let state_input =
                enemy.state_input(intent.move_x != 0.0, false, intent.attack_requested);
            let next = next_state(enemy.state, &state_input);
            if enemy.set_state(next)? && next == EntityState::Attack {
                events.push(FrameEvent::AttackStarted { id: enemy.id });
            }

            if enemy.hit_window_active() {
                if let Some(strike) = try_strike(enemy, hero, layout)? {
                    events.push(FrameEvent::HeroDamaged {
                        health: strike.health,
                    });
                    if strike.killed {
                        log::info!("Hero defeated by enemy #{}", enemy.id);
                        events.push(FrameEvent::EntityDied { id: HERO_ID });
                    }
                }
            }
        }
        Ok(())
    }

    fn update_outcome(&mut self, events: &mut Vec<FrameEvent>) {
        if self.outcome.is_over() {
            return;
        }
        let decided = if self.hero.is_dead() {
            Outcome::Lost
        } else if self
            .enemies
            .iter()
            .all(|enemy| enemy.is_dead() && enemy.animator.finished)
        {
            Outcome::Won
        } else {
            return;
        };
        self.outcome = decided;
        log::info!("Round over after {} ticks: {decided:?}", self.tick_count);
        events.push(FrameEvent::Outcome(decided));
    }

    /// Put every entity back at its spawn and clear the outcome.
    pub fn restart(&mut self) -> Result<(), String> {
        self.hero.reset()?;
        for enemy in &mut self.enemies {
            enemy.reset()?;
        }
        self.outcome = Outcome::InProgress;
        self.tick_count = 0;
        log::info!("World restarted");
        Ok(())
    }

    /// One draw record per entity, enemies first so the hero is on top.
    pub fn render_frame(&self) -> Vec<SpriteDraw<'_>> {
        self.enemies
            .iter()
            .chain(std::iter::once(&self.hero))
            .map(sprite_for)
            .collect()
    }

    pub fn present(&self, renderer: &mut dyn Renderer) {
        for sprite in self.render_frame() {
            renderer.draw_sprite(&sprite);
        }
    }
}

fn sprite_for(entity: &Entity) -> SpriteDraw<'_> {
    let archetype = &entity.archetype;
    let row = entity.animator.row();
    let frame = entity.animator.frame;
    SpriteDraw {
        entity: entity.id,
        source: &archetype.config.sheet.source,
        clip: entity.animator.clip_name(),
        row,
        frame,
        source_rect: archetype.sheet.frame_rect(row, frame),
        position: entity.body.position,
        facing: entity.facing,
        scale: archetype.config.scale,
    }
}
