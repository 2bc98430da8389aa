use serde::{Deserialize, Serialize};

use crate::player::JumpKind;
use crate::snapshot::EntityHandle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    Spawned { player: EntityHandle, position: [f32; 3] },
    Jumped { player: EntityHandle, kind: JumpKind },
    Landed { player: EntityHandle, impact_speed: f32 },
    LeftGround { player: EntityHandle },
    Died { player: EntityHandle },
    Revived { player: EntityHandle },
    Despawned { player: EntityHandle },
}

impl PlayerEvent {
    /// Movement chatter that may be dropped when the queue is full.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Jumped { .. } | Self::Landed { .. } | Self::LeftGround { .. }
        )
    }
}
