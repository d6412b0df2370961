//! Default keyword tables per primitive family.
//!
//! The registry is built once and only handed out by shared reference.

use crate::option::{OptionMap, OptionValue};
use lazy_static::lazy_static;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Line,
    Scatter,
    Fill,
    Rule,
    Bar,
    Box,
    Violin,
    Hist,
    Velocity,
    Text,
    Grid,
    Tick,
    Label,
    Title,
    Scale,
    Limit,
    Cycler,
}

fn table(entries: &[(&str, OptionValue)]) -> OptionMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn text(s: &str) -> OptionValue {
    OptionValue::Text(s.to_string())
}

fn num(v: f64) -> OptionValue {
    OptionValue::Number(v)
}

fn build_registry() -> HashMap<Family, OptionMap> {
    use OptionValue::{Bool, Null};

    let mut registry = HashMap::new();

    registry.insert(
        Family::Line,
        table(&[
            ("color", text("#2196f3")),
            ("linestyle", text("-")),
            ("linewidth", num(1.0)),
            ("alpha", num(1.0)),
            ("label", Null),
        ]),
    );
    registry.insert(
        Family::Scatter,
        table(&[
            ("color", text("#2196f3")),
            ("s", num(2.0)),
            ("alpha", num(1.0)),
            ("marker", text("o")),
            ("edgecolors", Null),
            ("linewidth", num(1.0)),
            ("linestyle", text("-")),
            ("label", Null),
        ]),
    );
    registry.insert(
        Family::Fill,
        table(&[
            ("color", text("green")),
            ("alpha", num(0.5)),
            ("hatch", Null),
            ("label", Null),
        ]),
    );
    registry.insert(
        Family::Rule,
        table(&[
            ("color", text("black")),
            ("linestyle", text("-")),
            ("linewidth", num(1.0)),
            ("alpha", num(1.0)),
        ]),
    );
    registry.insert(
        Family::Bar,
        table(&[
            ("color", Null),
            ("width", num(0.8)),
            ("alpha", num(1.0)),
            ("edgecolor", Null),
            ("linewidth", num(0.0)),
            ("align", text("center")),
        ]),
    );
    registry.insert(
        Family::Box,
        table(&[
            ("vert", Bool(true)),
            ("notch", Bool(false)),
            ("whis", num(1.5)),
            ("widths", num(0.5)),
            ("showfliers", Bool(true)),
            ("color", text("black")),
        ]),
    );
    registry.insert(
        Family::Violin,
        table(&[
            ("vert", Bool(true)),
            ("widths", num(0.5)),
            ("showmedians", Bool(false)),
            ("showextrema", Bool(true)),
            ("color", text("#2196f3")),
            ("alpha", num(0.5)),
        ]),
    );
    registry.insert(
        Family::Hist,
        table(&[
            ("bins", num(10.0)),
            ("density", Bool(false)),
            ("cumulative", Bool(false)),
            ("color", text("#2196f3")),
            ("alpha", num(1.0)),
            ("label", Null),
        ]),
    );
    registry.insert(
        Family::Velocity,
        table(&[
            ("scale", num(1.0)),
            ("scale_units", text("y")),
            ("alpha", num(0.3)),
            ("color", text("gray")),
            ("width", num(0.001)),
            ("headwidth", num(5.0)),
            ("headlength", num(10.0)),
        ]),
    );
    registry.insert(
        Family::Text,
        table(&[
            ("fontsize", num(12.0)),
            ("color", text("black")),
            ("ha", text("left")),
            ("va", text("bottom")),
            ("rotation", num(0.0)),
        ]),
    );
    registry.insert(
        Family::Grid,
        table(&[
            ("visible", Bool(true)),
            ("axis", text("both")),
            ("color", text("gray")),
            ("linestyle", text(":")),
            ("linewidth", num(1.0)),
        ]),
    );
    registry.insert(
        Family::Tick,
        table(&[
            ("axis", text("both")),
            ("labelsize", num(12.0)),
            ("rotation", Null),
            ("labelcolor", Null),
            ("direction", Null),
            ("length", Null),
            ("labelbottom", Null),
            ("labeltop", Null),
            ("labelleft", Null),
            ("labelright", Null),
            // strftime pattern for tick labels of time axes
            ("format", Null),
        ]),
    );
    registry.insert(Family::Label, table(&[("fontsize", num(16.0))]));
    registry.insert(
        Family::Title,
        table(&[("fontsize", num(16.0)), ("color", text("black"))]),
    );
    registry.insert(
        Family::Scale,
        table(&[("xscale", Null), ("yscale", Null)]),
    );
    registry.insert(Family::Limit, table(&[("xlim", Null), ("ylim", Null)]));
    registry.insert(Family::Cycler, table(&[("cycler", Null)]));

    registry
}

lazy_static! {
    static ref REGISTRY: HashMap<Family, OptionMap> = build_registry();
    static ref EMPTY: OptionMap = OptionMap::new();
}

/// Default keyword table for `family`.
pub fn defaults(family: Family) -> &'static OptionMap {
    REGISTRY.get(&family).unwrap_or(&EMPTY)
}

/// Defaults of `family` extended with extra recognized keys.
pub fn extended(family: Family, extra: &[(&str, OptionValue)]) -> OptionMap {
    let mut map = defaults(family).clone();
    for (k, v) in extra {
        map.insert(k.to_string(), v.clone());
    }
    map
}
