use cbscript::Program;
use cbscript::instruction::Instruction;

use crate::config::PlacementConfig;
use crate::directive::{BlockKind, ClearDirective, Directive, PlacementDirective, Position};
use crate::format::escape_payload;
use crate::state::PlacementState;

/// Characters of a payload shown in progress logs.
const PREVIEW_CHARS: usize = 60;

/// The placement state machine.
///
/// Each instruction is turned into at most one directive. Moves may emit a
/// clear, commands always emit a placement.
pub struct Placer<'a> {
    config: &'a PlacementConfig,
    state: PlacementState,
}

impl<'a> Placer<'a> {
    pub fn new(config: &'a PlacementConfig) -> Self {
        Placer {
            config,
            state: PlacementState::new(config.origin),
        }
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn step(&mut self, instruction: &Instruction) -> Option<Directive> {
        match instruction {
            Instruction::Move { x, y, z, line, .. } => {
                self.apply_move(Position::new(*x, *y, *z), *line)
            }
            Instruction::Command { text, .. } => Some(Directive::Place(self.place(text))),
        }
    }

    fn apply_move(&mut self, to: Position, line: usize) -> Option<Directive> {
        let bound = self.config.clear_upper_bound;
        let clear = if to.y <= bound {
            Some(Directive::Clear(ClearDirective {
                from: to,
                to: Position::new(to.x, bound, to.z),
            }))
        } else {
            tracing::info!(
                line,
                position = %to,
                bound,
                "skipping area clear, move is above the clear bound"
            );
            None
        };

        self.state.relocate(to);
        tracing::info!(line, origin = %to, "new stack origin");
        clear
    }

    fn place(&mut self, text: &str) -> PlacementDirective {
        let slot = self.state.claim_slot();
        let kind = BlockKind::for_stack_index(slot.stack_index);
        let auto = match kind {
            BlockKind::Repeating => false,
            BlockKind::Chain => self.config.chain_auto,
        };

        tracing::info!(
            block = slot.ordinal,
            stack = slot.stack_index,
            position = %slot.position,
            %kind,
            auto,
            payload = %preview(text),
            "placing command block"
        );

        PlacementDirective {
            position: slot.position,
            kind,
            auto,
            facing: self.config.facing,
            conditional: self.config.conditional,
            payload: escape_payload(text),
            ordinal: slot.ordinal,
            stack_index: slot.stack_index,
        }
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Run the state machine over a whole program.
pub fn compile(program: &Program, config: &PlacementConfig) -> Vec<Directive> {
    if !program.is_empty() && !program.starts_with_move() {
        tracing::info!(
            origin = %config.origin,
            "no leading move, starting from the configured origin"
        );
    }

    let mut placer = Placer::new(config);
    program
        .instructions
        .iter()
        .filter_map(|instruction| placer.step(instruction))
        .collect()
}

/// [`compile`] and render every directive.
pub fn compile_commands(program: &Program, config: &PlacementConfig) -> Vec<String> {
    compile(program, config)
        .iter()
        .map(Directive::render)
        .collect()
}
