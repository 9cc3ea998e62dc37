use crate::directive::Position;

/// Where the next block goes and how many have been placed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementState {
    origin: Position,
    stack_index: usize,
    total_placed: usize,
}

/// Placement slot handed out by [`PlacementState::claim_slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub position: Position,
    pub stack_index: usize,
    pub ordinal: usize,
}

impl PlacementState {
    pub fn new(origin: Position) -> Self {
        PlacementState {
            origin,
            stack_index: 0,
            total_placed: 0,
        }
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn stack_index(&self) -> usize {
        self.stack_index
    }

    pub fn total_placed(&self) -> usize {
        self.total_placed
    }

    /// Start a new stack at `origin`.
    pub fn relocate(&mut self, origin: Position) {
        self.origin = origin;
        self.stack_index = 0;
    }

    /// Count one more block, return the position it occupies and move the
    /// origin up by one.
    ///
    /// Y stops at `i32::MAX`; any further blocks in the stack reuse that
    /// position and overwrite each other.
    pub fn claim_slot(&mut self) -> Slot {
        self.total_placed += 1;
        self.stack_index += 1;
        let slot = Slot {
            position: self.origin,
            stack_index: self.stack_index,
            ordinal: self.total_placed,
        };
        match self.origin.y.checked_add(1) {
            Some(y) => self.origin.y = y,
            None => tracing::warn!(
                position = %self.origin,
                block = self.total_placed,
                "stack reached the top of the coordinate range, next block overwrites this one"
            ),
        }
        slot
    }
}
