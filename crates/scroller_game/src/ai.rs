//! Enemy behaviour: face the hero, close in when inside aggro range, swing
//! when the hero is within reach.

use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyIntent {
    pub move_x: f32,
    pub facing: f32,
    pub attack_requested: bool,
}

impl EnemyIntent {
    pub fn idle(facing: f32) -> Self {
        Self {
            move_x: 0.0,
            facing,
            attack_requested: false,
        }
    }
}

pub fn decide(enemy: &Entity, hero: &Entity) -> EnemyIntent {
    let dx = hero.center_x() - enemy.center_x();
    let facing = if dx < 0.0 { -1.0 } else { 1.0 };

    if hero.is_dead() || dx.abs() >= enemy.config().aggro_range {
        return EnemyIntent::idle(facing);
    }

    if enemy.attack_box_facing(facing).overlaps(&hero.hurt_box()) {
        return EnemyIntent {
            move_x: 0.0,
            facing,
            attack_requested: enemy.can_attack(),
        };
    }

    EnemyIntent {
        move_x: facing,
        facing,
        attack_requested: false,
    }
}
