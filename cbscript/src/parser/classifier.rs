use std::sync::OnceLock;

use regex::Regex;

/// Marker that turns a whole line into a comment.
pub const COMMENT_MARKER: &str = "# comment";

/// What a single source line contributes to the instruction list.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// Blank line or `# comment` line.
    Skip,
    Move { x: i32, y: i32, z: i32 },
    Command(String),
    /// The line has the move shape but a coordinate is unusable.
    MalformedMove {
        line: usize,
        text: String,
        reason: String,
    },
}

/// Recognizes `# move, <num>, <num>, <num>` lines.
///
/// Matching happens in two stages: `shape` decides whether a line is a move
/// at all, then each field is checked against `numeral`. The first two fields
/// must be numerals in full; the last only needs to start with one, and
/// anything after it (`# move, 1, 2, 3 # spawn`, a fourth field) is ignored.
/// A line that has the shape but carries a bad field is malformed rather than
/// a command.
#[derive(Debug, Clone)]
pub struct MovePattern {
    shape: Regex,
    numeral: Regex,
}

impl MovePattern {
    pub fn new(shape: Regex, numeral: Regex) -> Self {
        MovePattern { shape, numeral }
    }

    /// The pattern used by [`classify_line`].
    pub fn standard() -> &'static MovePattern {
        static PATTERN: OnceLock<MovePattern> = OnceLock::new();
        PATTERN.get_or_init(|| {
            MovePattern::new(
                Regex::new(r"^# move,([^,]*),([^,]*),(.*)$").expect("invalid move regex"),
                Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)").expect("invalid numeral regex"),
            )
        })
    }

    /// `None` if the line is not a move. Otherwise the truncated coordinates,
    /// or a reason why they could not be read.
    pub fn match_line(&self, line: &str) -> Option<Result<[i32; 3], String>> {
        let caps = self.shape.captures(line)?;
        let mut coords = [0i32; 3];
        for (slot, idx) in coords.iter_mut().zip(1..=3) {
            let field = caps.get(idx).map_or("", |m| m.as_str()).trim();
            match self.parse_coordinate(field, idx == 3) {
                Ok(value) => *slot = value,
                Err(reason) => return Some(Err(reason)),
            }
        }
        Some(Ok(coords))
    }

    fn parse_coordinate(&self, field: &str, allow_trailing: bool) -> Result<i32, String> {
        if field.is_empty() {
            return Err("missing coordinate".to_string());
        }
        let number = match self.numeral.find(field) {
            Some(m) if m.start() == 0 && (allow_trailing || m.end() == field.len()) => m.as_str(),
            _ => return Err(format!("`{}` is not a number", field)),
        };
        let value: f64 = number
            .parse()
            .map_err(|_| format!("`{}` is not a number", field))?;
        let truncated = value.trunc();
        if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
            return Err(format!("`{}` is out of range", field));
        }
        Ok(truncated as i32)
    }
}

/// Classify one newline-stripped line. `line_number` is 1-based.
pub fn classify_line(raw: &str, line_number: usize) -> LineClass {
    classify_line_with(MovePattern::standard(), raw, line_number)
}

pub fn classify_line_with(pattern: &MovePattern, raw: &str, line_number: usize) -> LineClass {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        return LineClass::Skip;
    }

    match pattern.match_line(line) {
        Some(Ok([x, y, z])) => LineClass::Move { x, y, z },
        Some(Err(reason)) => LineClass::MalformedMove {
            line: line_number,
            text: line.to_string(),
            reason,
        },
        None => LineClass::Command(line.to_string()),
    }
}
