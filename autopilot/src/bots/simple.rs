use super::{can_control, no_input, AutopilotBot};
use arena_core::{FrameInput, WorldSnapshot};

/// Never touches the controls. Useful as a survival floor.
pub struct IdleBot;

impl IdleBot {
    pub const ID: &'static str = "idle";
    pub const DESCRIPTION: &'static str = "Holds no keys; measures how long the field alone takes.";
}

impl AutopilotBot for IdleBot {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, _world: &WorldSnapshot) -> FrameInput {
        no_input()
    }
}

/// Turns in one direction and fires whenever the gun is ready.
#[derive(Default)]
pub struct SpinnerBot {
    clockwise: bool,
}

impl SpinnerBot {
    pub const ID: &'static str = "spinner";
    pub const DESCRIPTION: &'static str = "Rotates in place and sprays bullets.";
}

impl AutopilotBot for SpinnerBot {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn reset(&mut self, seed: u32) {
        self.clockwise = seed & 1 == 0;
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        if !can_control(world) {
            return no_input();
        }
        FrameInput {
            left: !self.clockwise,
            right: self.clockwise,
            fire: world.player.fire_cooldown <= 0.0,
            ..no_input()
        }
    }
}
