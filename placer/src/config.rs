use serde::{Deserialize, Serialize};

use crate::directive::{Facing, Position};

/// Fixed settings for the placement state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Origin used until the first move.
    pub origin: Position,
    pub facing: Facing,
    pub conditional: bool,
    /// Whether chain blocks are "Always Active" (`auto:1b`).
    pub chain_auto: bool,
    /// Top of the column cleared by each move. Moves above it skip clearing.
    pub clear_upper_bound: i32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            origin: Position::new(0, 60, 0),
            facing: Facing::Up,
            conditional: false,
            chain_auto: true,
            clear_upper_bound: 128,
        }
    }
}
