//! Layered axes style of a subplot.
//!
//! A subplot keeps a primary [`AxesStyle`] and a secondary diff. Every
//! registration merges its own style update into one of the two, and the
//! secondary axes are drawn with `primary ⊕ diff`.

use crate::error::{PlotError, Result};
use crate::option::{merge_into, options, OptionMap, OptionValue};

/// Axes-level settings applied after the entries of a subplot are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesStyle {
    pub title: OptionMap,
    /// `Null` or a list of colours.
    pub cycler: OptionValue,
    /// `Null` or a `[lo, hi]` list; either bound may be `Null`.
    pub xlim: OptionValue,
    pub ylim: OptionValue,
    /// Label style plus the `xlabel` / `ylabel` texts.
    pub label: OptionMap,
    /// `xscale` / `yscale`.
    pub scale: OptionMap,
    /// Tick parameters for both axes, then per axis on top.
    pub tick: OptionMap,
    pub xtick: OptionMap,
    pub ytick: OptionMap,
    pub grid: OptionMap,
    /// Free-form settings without a dedicated slot.
    pub style: OptionMap,
}

impl Default for AxesStyle {
    fn default() -> Self {
        AxesStyle {
            title: options([("fontsize", 16.into())]),
            cycler: OptionValue::Null,
            xlim: OptionValue::Null,
            ylim: OptionValue::Null,
            label: options([("fontsize", 16.into())]),
            scale: OptionMap::new(),
            tick: options([("labelsize", 14.into())]),
            xtick: OptionMap::new(),
            ytick: OptionMap::new(),
            grid: OptionMap::new(),
            style: options([("xTickRotation", 0.into())]),
        }
    }
}

impl AxesStyle {
    /// A style with every slot unset. Used for updates and the secondary
    /// diff.
    pub fn empty() -> Self {
        AxesStyle {
            title: OptionMap::new(),
            cycler: OptionValue::Null,
            xlim: OptionValue::Null,
            ylim: OptionValue::Null,
            label: OptionMap::new(),
            scale: OptionMap::new(),
            tick: OptionMap::new(),
            xtick: OptionMap::new(),
            ytick: OptionMap::new(),
            grid: OptionMap::new(),
            style: OptionMap::new(),
        }
    }

    /// Default style overridden by a flat option map.
    pub fn from_options(map: &OptionMap) -> Result<Self> {
        let mut style = AxesStyle::default();
        style.merge(&AxesStyle::update(map)?);
        Ok(style)
    }

    /// An update holding only what `map` sets. Keys naming a slot fill
    /// that slot, every other key lands in `style`.
    pub fn update(map: &OptionMap) -> Result<Self> {
        let mut update = AxesStyle::empty();
        for (key, value) in map {
            let slot = match key.as_str() {
                "title" => &mut update.title,
                "label" => &mut update.label,
                "scale" => &mut update.scale,
                "tick" => &mut update.tick,
                "xtick" => &mut update.xtick,
                "ytick" => &mut update.ytick,
                "grid" => &mut update.grid,
                "cycler" => {
                    update.cycler = value.clone();
                    continue;
                }
                "xlim" => {
                    update.xlim = value.clone();
                    continue;
                }
                "ylim" => {
                    update.ylim = value.clone();
                    continue;
                }
                _ => {
                    update.style.insert(key.clone(), value.clone());
                    continue;
                }
            };
            let entries = value.as_map().ok_or_else(|| {
                PlotError::config(format!("axes style '{}' must be a map, got {:?}", key, value))
            })?;
            merge_into(slot, entries);
        }
        Ok(update)
    }

    /// Overlay `update`: map slots merge key by key, scalar slots are
    /// replaced when the update sets them.
    pub fn merge(&mut self, update: &AxesStyle) {
        merge_into(&mut self.title, &update.title);
        merge_into(&mut self.label, &update.label);
        merge_into(&mut self.scale, &update.scale);
        merge_into(&mut self.tick, &update.tick);
        merge_into(&mut self.xtick, &update.xtick);
        merge_into(&mut self.ytick, &update.ytick);
        merge_into(&mut self.grid, &update.grid);
        merge_into(&mut self.style, &update.style);
        for (slot, value) in [
            (&mut self.cycler, &update.cycler),
            (&mut self.xlim, &update.xlim),
            (&mut self.ylim, &update.ylim),
        ] {
            if !value.is_null() {
                *slot = value.clone();
            }
        }
    }

    pub fn merged(&self, update: &AxesStyle) -> AxesStyle {
        let mut style = self.clone();
        style.merge(update);
        style
    }

    /// Tick parameters for `axis` ("both", "x" or "y"), each axis layered
    /// on the shared `tick` map.
    pub fn tick_options(&self, axis: &str) -> OptionMap {
        let mut map = self.tick.clone();
        match axis {
            "x" => {
                if let Some(rotation) = self.style.get("xTickRotation").and_then(OptionValue::as_f64) {
                    if rotation != 0.0 {
                        map.insert("rotation".to_string(), rotation.into());
                    }
                }
                merge_into(&mut map, &self.xtick);
            }
            "y" => merge_into(&mut map, &self.ytick),
            _ => {}
        }
        map.insert("axis".to_string(), axis.into());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::list;

    #[test]
    fn test_defaults() {
        let style = AxesStyle::default();
        assert_eq!(style.title["fontsize"], OptionValue::Number(16.0));
        assert_eq!(style.tick["labelsize"], OptionValue::Number(14.0));
        assert!(style.xlim.is_null());
        assert!(style.cycler.is_null());
    }

    #[test]
    fn test_merge_keeps_unrelated_keys() {
        let mut style = AxesStyle::default();
        let mut update = AxesStyle::empty();
        update.label.insert("ylabel".to_string(), "Depth".into());
        update.xlim = list([0.0, 5.0]);
        style.merge(&update);

        assert_eq!(style.label["fontsize"], OptionValue::Number(16.0));
        assert_eq!(style.label["ylabel"], OptionValue::from("Depth"));
        assert_eq!(style.xlim, list([0.0, 5.0]));

        // Unset scalar slots do not clear earlier values.
        style.merge(&AxesStyle::empty());
        assert_eq!(style.xlim, list([0.0, 5.0]));
    }

    #[test]
    fn test_from_options_routes_slots() {
        let map = options([
            ("label", OptionValue::Map(options([("fontsize", 10.into())]))),
            ("ylim", list([1.0, 2.0])),
            ("xFmt", "%H:%M".into()),
        ]);
        let style = AxesStyle::from_options(&map).unwrap();
        assert_eq!(style.label["fontsize"], OptionValue::Number(10.0));
        assert_eq!(style.ylim, list([1.0, 2.0]));
        assert_eq!(style.style["xFmt"], OptionValue::from("%H:%M"));
        assert_eq!(style.style["xTickRotation"], OptionValue::Number(0.0));
    }

    #[test]
    fn test_update_leaves_unset_slots_empty() {
        let update = AxesStyle::update(&options([("xlim", list([0.0, 1.0]))])).unwrap();
        assert!(update.title.is_empty());
        assert!(update.style.is_empty());
        assert_eq!(update.xlim, list([0.0, 1.0]));
    }

    #[test]
    fn test_from_options_rejects_non_map_slot() {
        let map = options([("grid", true.into())]);
        assert!(AxesStyle::from_options(&map).is_err());
    }

    #[test]
    fn test_tick_options_layered() {
        let mut style = AxesStyle::default();
        style.xtick.insert("labelsize".to_string(), 8.into());
        style.style.insert("xTickRotation".to_string(), 45.into());

        let x = style.tick_options("x");
        assert_eq!(x["labelsize"], OptionValue::Number(8.0));
        assert_eq!(x["rotation"], OptionValue::Number(45.0));
        assert_eq!(x["axis"], OptionValue::from("x"));

        let y = style.tick_options("y");
        assert_eq!(y["labelsize"], OptionValue::Number(14.0));
        assert!(!y.contains_key("rotation"));
    }
}
