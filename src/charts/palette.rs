//! Color palettes.
//!
//! Registry entries either name one of the qualitative/sequential palettes
//! below or list their own colors.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const PASTEL1: &[&str] = &[
    "rgb(251,180,174)",
    "rgb(179,205,227)",
    "rgb(204,235,197)",
    "rgb(222,203,228)",
    "rgb(254,217,166)",
    "rgb(255,255,204)",
    "rgb(229,216,189)",
    "rgb(253,218,236)",
    "rgb(242,242,242)",
];

pub const DARK24: &[&str] = &[
    "#2E91E5", "#E15F99", "#1CA71C", "#FB0D0D", "#DA16FF", "#222A2A", "#B68100", "#750D86",
    "#EB663B", "#511CFB", "#00A08B", "#FB00D1", "#FC0080", "#B2828D", "#6C7C32", "#778AAE",
    "#862A16", "#A777F1", "#620042", "#1616A7", "#DA60CA", "#6C4516", "#0D2A63", "#AF0038",
];

pub const PRISM: &[&str] = &[
    "rgb(95, 70, 144)",
    "rgb(29, 105, 150)",
    "rgb(56, 166, 165)",
    "rgb(15, 133, 84)",
    "rgb(115, 175, 72)",
    "rgb(237, 173, 8)",
    "rgb(225, 124, 5)",
    "rgb(204, 80, 62)",
    "rgb(148, 52, 110)",
    "rgb(111, 64, 112)",
    "rgb(102, 102, 102)",
];

pub const BURG: &[&str] = &[
    "rgb(255, 198, 196)",
    "rgb(244, 163, 168)",
    "rgb(227, 129, 145)",
    "rgb(204, 96, 125)",
    "rgb(173, 70, 108)",
    "rgb(139, 48, 88)",
    "rgb(103, 32, 68)",
];

/// Brand colors for treemap tiles
pub const BRAND_TILES: &[&str] = &[
    "#151c97", // dark blue
    "#f4e8d7", // sand
    "#e8ef50", // yellow
    "#f1461f", // red
    "#eb88dd", // pink
    "#7049ff", // violet
    "#b1e848", // light green
];

/// Score colors of the alternatives matrix, lowest impact first
pub const IMPACT_SCALE: &[&str] = &["#6ecb57", "#ffd336", "#ff7e36", "#f34620"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedPalette {
    Pastel1,
    Dark24,
    Prism,
    Burg,
    Brand,
}

impl NamedPalette {
    pub fn colors(self) -> &'static [&'static str] {
        match self {
            NamedPalette::Pastel1 => PASTEL1,
            NamedPalette::Dark24 => DARK24,
            NamedPalette::Prism => PRISM,
            NamedPalette::Burg => BURG,
            NamedPalette::Brand => BRAND_TILES,
        }
    }
}

/// A named palette or an explicit color list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Palette {
    Named(NamedPalette),
    Colors(Vec<String>),
}

impl Palette {
    pub fn custom(colors: &[&str]) -> Self {
        Palette::Colors(colors.iter().map(|c| c.to_string()).collect())
    }

    pub fn colors(&self) -> Vec<String> {
        match self {
            Palette::Named(named) => named.colors().iter().map(|c| c.to_string()).collect(),
            Palette::Colors(colors) => colors.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Palette::Colors(colors) if colors.is_empty())
    }

    /// Color `index`, wrapping around the palette.
    pub fn pick(&self, index: usize) -> String {
        let colors = self.colors();
        if colors.is_empty() {
            return "#000000".to_string();
        }
        colors[index % colors.len()].clone()
    }

    /// Plotly continuous colorscale spread evenly over `[0, 1]`.
    pub fn colorscale(&self) -> Value {
        continuous_scale(&self.colors())
    }
}

pub fn continuous_scale<S: AsRef<str>>(colors: &[S]) -> Value {
    match colors {
        [] => json!([]),
        [only] => json!([[0.0, only.as_ref()], [1.0, only.as_ref()]]),
        _ => {
            let last = (colors.len() - 1) as f64;
            Value::Array(
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| json!([i as f64 / last, c.as_ref()]))
                    .collect(),
            )
        }
    }
}
