//! Zero controller for testing and automation
//!
//! This controller never acts. Games driven by two of them still run to
//! completion through draws and decking, which makes it useful for checking
//! the turn engine in isolation.

use crate::core::PlayerId;
use crate::game::controller::{Decision, GameStateView, PlayerController};

/// A controller that passes at every opportunity
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl PlayerController for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        "ZERO"
    }

    fn decide(&mut self, _view: &GameStateView) -> Option<Decision> {
        Some(Decision::pass())
    }
}
