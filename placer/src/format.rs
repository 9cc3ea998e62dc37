//! Command text for directives. Everything here is pure string building.

use crate::directive::{ClearDirective, PlacementDirective};

const CLEAR_MATERIAL: &str = "minecraft:air";

/// Make `text` safe inside a double-quoted NBT string.
///
/// Backslashes are doubled before quotes are escaped, so the backslashes
/// inserted for quotes are not doubled again.
pub fn escape_payload(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Inverse of [`escape_payload`].
pub fn unescape_payload(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

pub fn render_clear(clear: &ClearDirective) -> String {
    format!(
        "fill {} {} {} {} {} {} {} replace",
        clear.from.x, clear.from.y, clear.from.z, clear.to.x, clear.to.y, clear.to.z, CLEAR_MATERIAL
    )
}

pub fn render_placement(place: &PlacementDirective) -> String {
    format!(
        "setblock {} {} {} {}[facing={},conditional={}]{{Command:\"{}\",auto:{}}} replace",
        place.position.x,
        place.position.y,
        place.position.z,
        place.kind.block_id(),
        place.facing.as_str(),
        place.conditional,
        place.payload,
        if place.auto { "1b" } else { "0b" },
    )
}
