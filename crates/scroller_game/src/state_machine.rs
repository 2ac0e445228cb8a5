//! Entity behaviour states and the one table that decides transitions.
//!
//! Every entity runs `next_state` once per update with a fresh `StateInput`.
//! Rules are checked in priority order and the first match wins:
//!
//! 1. `Death` is absorbing.
//! 2. Zero health enters `Death`.
//! 3. Taking damage enters `Hurt`, interrupting whatever was playing.
//! 4. `Hurt` holds until its clip finishes.
//! 5. `Victory` is absorbing.
//! 6. `Attack` holds until its clip finishes.
//! 7. A requested attack enters `Attack`.
//! 8. A grounded winner enters `Victory`.
//! 9. Otherwise movement decides: airborne, crouching, walking, idle.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    Idle,
    Walk,
    Jump,
    Crouch,
    Attack,
    Hurt,
    Death,
    Victory,
}

/// Snapshot of everything the transition table looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateInput {
    pub health: u32,
    pub grounded: bool,
    pub moving: bool,
    pub crouching: bool,
    pub attack_requested: bool,
    pub animation_finished: bool,
    pub damaged: bool,
    pub victorious: bool,
}

pub fn next_state(current: EntityState, input: &StateInput) -> EntityState {
    use EntityState::*;

    if current == Death {
        return Death;
    }
    if input.health == 0 {
        return Death;
    }
    if input.damaged {
        return Hurt;
    }
    if current == Hurt && !input.animation_finished {
        return Hurt;
    }
    if current == Victory {
        return Victory;
    }
    if current == Attack && !input.animation_finished {
        return Attack;
    }
    if input.attack_requested && current != Attack {
        return Attack;
    }
    if input.victorious && input.grounded {
        return Victory;
    }

    if !input.grounded {
        Jump
    } else if input.crouching {
        Crouch
    } else if input.moving {
        Walk
    } else {
        Idle
    }
}

/// Clip played while in `state`. `walk_clip` lets each entity type name its
/// locomotion clip (`run` for the hero, `walk` for goblins).
pub fn clip_for(state: EntityState, walk_clip: &str) -> &str {
    match state {
        EntityState::Idle => "idle",
        EntityState::Walk => walk_clip,
        EntityState::Jump => "jump",
        EntityState::Crouch => "crouch",
        EntityState::Attack => "attack",
        EntityState::Hurt => "hurt",
        EntityState::Death => "death",
        EntityState::Victory => "victory",
    }
}
