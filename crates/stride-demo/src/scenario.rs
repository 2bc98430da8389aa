use stride::PlayerInput;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Axes held from this tick on.
    Hold(PlayerInput),
    /// Jump edge on this tick only.
    Jump,
    Damage(f32),
    Restore,
}

#[derive(Debug, Clone, Copy)]
pub struct Cue {
    pub at: u32,
    pub action: Action,
}

const fn cue(at: u32, action: Action) -> Cue {
    Cue { at, action }
}

const FORWARD: PlayerInput = PlayerInput {
    vertical: 1.0,
    ..PlayerInput::IDLE
};

const TURN_RIGHT: PlayerInput = PlayerInput {
    look_horizontal: 1.0,
    ..PlayerInput::IDLE
};

/// Settle on the ledge, run off it with a late jump, turn, double jump,
/// die, come back and keep running. Ticks assume 60 Hz.
pub fn jump_course() -> Vec<Cue> {
    vec![
        cue(60, Action::Hold(FORWARD)),
        cue(110, Action::Jump),
        cue(180, Action::Hold(TURN_RIGHT)),
        cue(240, Action::Hold(PlayerInput::IDLE)),
        cue(250, Action::Jump),
        cue(275, Action::Jump),
        cue(290, Action::Jump),
        cue(330, Action::Damage(f32::MAX)),
        cue(340, Action::Hold(FORWARD)),
        cue(390, Action::Restore),
        cue(450, Action::Jump),
    ]
}

/// Expands the cue list into the input for `tick`, plus any health action.
pub struct Script {
    cues: Vec<Cue>,
    held: PlayerInput,
}

impl Script {
    pub fn new(mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|c| c.at);
        Self {
            cues,
            held: PlayerInput::IDLE,
        }
    }

    pub fn frame(&mut self, tick: u32) -> (PlayerInput, Vec<Action>) {
        let mut input = self.held;
        let mut health = Vec::new();

        for cue in self.cues.iter().filter(|c| c.at == tick) {
            match cue.action {
                Action::Hold(axes) => {
                    self.held = axes;
                    input = PlayerInput {
                        jump_pressed: input.jump_pressed,
                        ..axes
                    };
                }
                Action::Jump => input.jump_pressed = true,
                Action::Damage(_) | Action::Restore => health.push(cue.action),
            }
        }

        (input, health)
    }
}
