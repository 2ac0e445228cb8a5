use crate::entity::EntityId;

/// How the round stands. `Won` and `Lost` are sticky until restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            Outcome::InProgress => None,
            Outcome::Won => Some("You win! Press R to restart"),
            Outcome::Lost => Some("You died! Press R to restart"),
        }
    }
}

/// Things that happened during one tick, for HUD and logging consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    AttackStarted { id: EntityId },
    HeroDamaged { health: u32 },
    EnemyDamaged { id: EntityId, health: u32 },
    EntityDied { id: EntityId },
    Outcome(Outcome),
}
