pub mod instruction;
pub mod parser;

use crate::instruction::Instruction;

/// A parsed instruction list.
#[derive(Debug, Clone)]
pub struct Program {
    /// Instructions in source order.
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True when the first instruction relocates the origin.
    pub fn starts_with_move(&self) -> bool {
        matches!(self.instructions.first(), Some(Instruction::Move { .. }))
    }

    pub fn command_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Command { .. }))
            .count()
    }
}
