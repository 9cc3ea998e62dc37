use std::ops::Range;

/// A single instruction parsed from one non-blank source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Origin relocation: `# move, x, y, z`
    Move {
        x: i32,
        y: i32,
        z: i32,
        line: usize,
        span: Range<usize>,
    },
    /// Payload command stored verbatim in one command block.
    Command {
        text: String,
        line: usize,
        span: Range<usize>,
    },
}

impl Instruction {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Instruction::Move { span, .. } => span,
            Instruction::Command { span, .. } => span,
        }
    }

    /// 1-based source line.
    pub fn line(&self) -> usize {
        match self {
            Instruction::Move { line, .. } => *line,
            Instruction::Command { line, .. } => *line,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Instruction::Move { .. })
    }
}
