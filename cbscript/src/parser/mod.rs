pub mod classifier;
pub mod error;

pub use classifier::{LineClass, MovePattern, classify_line, classify_line_with};
pub use error::{ParseError, SourceError};

use std::path::Path;

use crate::Program;
use crate::instruction::Instruction;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse every line of the source.
    ///
    /// Malformed move lines never abort parsing: each one is reported as a
    /// warning and left out of the program.
    pub fn parse(&self) -> (Program, Vec<ParseError>) {
        let pattern = MovePattern::standard();
        let mut instructions = Vec::new();
        let mut warnings = Vec::new();
        let mut offset = 0;

        for (idx, chunk) in self.source.split_inclusive('\n').enumerate() {
            let line_number = idx + 1;
            let line_start = offset;
            offset += chunk.len();

            let raw = chunk.strip_suffix('\n').unwrap_or(chunk);
            let lead = raw.len() - raw.trim_start().len();
            let start = line_start + lead;
            let span = start..start + raw.trim().len();

            match classify_line_with(pattern, raw, line_number) {
                LineClass::Skip => {}
                LineClass::Move { x, y, z } => instructions.push(Instruction::Move {
                    x,
                    y,
                    z,
                    line: line_number,
                    span,
                }),
                LineClass::Command(text) => instructions.push(Instruction::Command {
                    text,
                    line: line_number,
                    span,
                }),
                LineClass::MalformedMove { line, text, reason } => {
                    tracing::debug!(line, %text, %reason, "skipping move with invalid coordinates");
                    warnings.push(
                        ParseError::warning(
                            format!("invalid coordinates in move instruction at line {}", line),
                            span,
                            line,
                            self.file_id,
                        )
                        .with_note(reason)
                        .with_note(format!("line skipped: {}", text)),
                    );
                }
            }
        }

        (Program { instructions }, warnings)
    }
}

/// Read an instruction file as UTF-8, dropping a leading byte-order mark.
pub fn read_source(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::from_io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        SourceError::from_io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Read and parse an instruction file in one step.
pub fn parse_file(
    path: &Path,
    file_id: usize,
) -> Result<(Program, Vec<ParseError>), SourceError> {
    let source = read_source(path)?;
    Ok(Parser::new(source, file_id).parse())
}
