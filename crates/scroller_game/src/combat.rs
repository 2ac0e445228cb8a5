//! Melee hit resolution.
//!
//! A swing can land only while the attacker's attack clip is inside its hit
//! window. Each attack instance hits a given target at most once, and a
//! freshly hit target is invulnerable for its configured duration.

use crate::collision::PlatformLayout;
use crate::entity::{Entity, EntityId};
use crate::state_machine::EntityState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeOutcome {
    pub defender: EntityId,
    pub health: u32,
    pub killed: bool,
}

/// Test `attacker`'s swing against `defender` and apply the hit if it lands.
pub fn try_strike(
    attacker: &mut Entity,
    defender: &mut Entity,
    layout: &PlatformLayout,
) -> Result<Option<StrikeOutcome>, String> {
    if !attacker.hit_window_active()
        || !defender.can_be_struck()
        || attacker.has_struck(defender.id)
    {
        return Ok(None);
    }
    if !attacker.attack_box().overlaps(&defender.hurt_box()) {
        return Ok(None);
    }

    attacker.record_strike(defender.id);
    let push_dir = knockback_direction(attacker, defender);
    let state = defender.receive_hit(push_dir, attacker.config().knockback, layout)?;
    log::debug!(
        "{}#{} hit {}#{} (health {})",
        attacker.archetype.name,
        attacker.id,
        defender.archetype.name,
        defender.id,
        defender.health
    );
    Ok(Some(StrikeOutcome {
        defender: defender.id,
        health: defender.health,
        killed: state == EntityState::Death,
    }))
}

/// Away from the attacker; the attacker's facing breaks a tie.
fn knockback_direction(attacker: &Entity, defender: &Entity) -> f32 {
    let dx = defender.center_x() - attacker.center_x();
    if dx == 0.0 {
        attacker.facing
    } else {
        dx.signum()
    }
}
