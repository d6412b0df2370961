// Colour names and the default series cycle

use lazy_static::lazy_static;
use plotters::style::RGBColor;
use std::collections::HashMap;

/// Colours handed out to series that do not name one.
pub const DEFAULT_CYCLE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

const CYCLE_NAMES: [&str; 10] = [
    "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive", "cyan",
];

const NAMED_COLORS: &[(&[&str], (u8, u8, u8))] = &[
    (&["white", "w"], (255, 255, 255)),
    (&["black", "k"], (0, 0, 0)),
    (&["red", "r"], (255, 0, 0)),
    (&["green", "g"], (0, 128, 0)),
    (&["blue", "b"], (0, 0, 255)),
    (&["yellow", "y"], (255, 255, 0)),
    (&["cyan", "c"], (0, 255, 255)),
    (&["magenta", "m"], (255, 0, 255)),
    (&["orange"], (255, 165, 0)),
    (&["purple"], (128, 0, 128)),
    (&["pink"], (255, 192, 203)),
    (&["brown"], (139, 69, 19)),
    (&["navy"], (0, 0, 128)),
    (&["steelblue"], (70, 130, 180)),
    (&["gray", "grey"], (128, 128, 128)),
    (&["darkgray", "darkgrey"], (64, 64, 64)),
    (&["lightgray", "lightgrey"], (192, 192, 192)),
];

lazy_static! {
    static ref NAMED: HashMap<&'static str, (u8, u8, u8)> = NAMED_COLORS
        .iter()
        .flat_map(|(names, rgb)| names.iter().map(move |name| (*name, *rgb)))
        .collect();
}

/// Parse a colour: `#RRGGBB`, `#RGB`, a name, `grayN` (0 black to 100
/// white), a cycle reference `C0`..`C9` or a `tab:` cycle name.
pub fn parse_color(input: &str) -> Option<RGBColor> {
    let input = input.trim().to_ascii_lowercase();

    if let Some(hex) = input.strip_prefix('#') {
        return hex_color(hex);
    }
    if let Some(&(r, g, b)) = NAMED.get(input.as_str()) {
        return Some(RGBColor(r, g, b));
    }
    if let Some(level) = input.strip_prefix("gray").or_else(|| input.strip_prefix("grey")) {
        let level = level.parse::<u32>().ok()?.min(100);
        let v = ((level * 255 + 50) / 100) as u8;
        return Some(RGBColor(v, v, v));
    }
    if let Some(slot) = input.strip_prefix('c') {
        let slot = slot.parse::<usize>().ok()?;
        return hex_color(&DEFAULT_CYCLE[slot % DEFAULT_CYCLE.len()][1..]);
    }
    if let Some(name) = input.strip_prefix("tab:") {
        let slot = CYCLE_NAMES.iter().position(|n| *n == name)?;
        return hex_color(&DEFAULT_CYCLE[slot][1..]);
    }
    None
}

fn hex_color(hex: &str) -> Option<RGBColor> {
    if !hex.is_ascii() {
        return None;
    }
    let digit = |i: usize, width: usize| u8::from_str_radix(&hex[i * width..(i + 1) * width], 16).ok();
    match hex.len() {
        6 => Some(RGBColor(digit(0, 2)?, digit(1, 2)?, digit(2, 2)?)),
        3 => Some(RGBColor(digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17)),
        _ => None,
    }
}
