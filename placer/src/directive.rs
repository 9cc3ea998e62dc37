use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format;

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Position { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Direction a command block's output faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[default]
    Up,
    Down,
    North,
    South,
    East,
    West,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::North => "north",
            Facing::South => "south",
            Facing::East => "east",
            Facing::West => "west",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Stack activator; runs while powered.
    Repeating,
    /// Follower; runs after the block below it.
    Chain,
}

impl BlockKind {
    /// The first block of every stack repeats, the rest chain.
    pub fn for_stack_index(stack_index: usize) -> Self {
        if stack_index == 1 {
            BlockKind::Repeating
        } else {
            BlockKind::Chain
        }
    }

    pub fn block_id(&self) -> &'static str {
        match self {
            BlockKind::Repeating => "minecraft:repeating_command_block",
            BlockKind::Chain => "minecraft:chain_command_block",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Repeating => f.write_str("repeating"),
            BlockKind::Chain => f.write_str("chain"),
        }
    }
}

/// Place one command block holding an already-escaped payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementDirective {
    pub position: Position,
    pub kind: BlockKind,
    pub auto: bool,
    pub facing: Facing,
    pub conditional: bool,
    pub payload: String,
    /// Blocks placed in the whole run, including this one.
    pub ordinal: usize,
    /// Blocks placed in the current stack, including this one.
    pub stack_index: usize,
}

/// Replace a vertical column with air before a stack is built in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearDirective {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Clear(ClearDirective),
    Place(PlacementDirective),
}

impl Directive {
    pub fn render(&self) -> String {
        match self {
            Directive::Clear(clear) => format::render_clear(clear),
            Directive::Place(place) => format::render_placement(place),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
