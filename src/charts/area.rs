//! Filled area charts over a year axis.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::cmp::Ordering;

use super::palette::{NamedPalette, Palette};
use super::{
    BuildResult, Figure, Theme, base_layout, numbers, option_json, require_palette, require_text,
};
use crate::constants::GROUPED_AREA_COLOR;
use crate::data::numeric::NumberStyle;
use crate::data::{Cell, Dataset};

fn default_pastel() -> Palette {
    Palette::Named(NamedPalette::Pastel1)
}

fn default_dark24() -> Palette {
    Palette::Named(NamedPalette::Dark24)
}

fn default_grouped_color() -> String {
    GROUPED_AREA_COLOR.to_string()
}

/// One filled line of `y` over `x`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaSingleArgs {
    pub x: String,
    pub y: String,
    pub title: String,
    #[serde(default = "default_pastel")]
    pub palette: Palette,
    #[serde(default)]
    pub theme: Theme,
    /// Defaults to the `x` column name
    #[serde(default)]
    pub x_title: Option<String>,
    #[serde(default)]
    pub block_zoom: bool,
}

impl AreaSingleArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y", &self.y)?;
        require_palette("palette", &self.palette)
    }
}

/// Stacked areas, one per category of `color`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaOrderArgs {
    pub x: String,
    pub y: String,
    pub color: String,
    pub title: String,
    pub y_title: String,
    /// Rows with `x` below this value are dropped
    #[serde(default)]
    pub min_x: Option<f64>,
    /// Order categories by descending total
    #[serde(default)]
    pub reorder: bool,
    #[serde(default)]
    pub block_zoom: bool,
    #[serde(default = "default_dark24")]
    pub palette: Palette,
    #[serde(default)]
    pub theme: Theme,
}

impl AreaOrderArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y", &self.y)?;
        require_text("color", &self.color)?;
        require_palette("palette", &self.palette)
    }
}

/// Sum of `y` per `x`, drawn as a single area
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaGroupedArgs {
    pub x: String,
    pub y: String,
    pub title: String,
    pub legend_title: String,
    #[serde(default = "default_grouped_color")]
    pub color: String,
    #[serde(default)]
    pub theme: Theme,
}

impl AreaGroupedArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y", &self.y)?;
        require_text("color", &self.color)
    }
}

fn x_values(dataset: &Dataset, column: &str) -> BuildResult<Vec<Value>> {
    Ok(dataset.column(column)?.into_iter().map(Cell::to_json).collect())
}

fn hovertemplate(x: &str, y: &str) -> String {
    format!("{x}=%{{x}}<br>{y}=%{{y}}<extra></extra>")
}

pub(crate) fn area_single(dataset: &Dataset, args: &AreaSingleArgs) -> BuildResult<Figure> {
    let xs = x_values(dataset, &args.x)?;
    let ys = numbers(dataset, &args.y, NumberStyle::DecimalComma)?;

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "lines",
        "stackgroup": "1",
        "name": "",
        "showlegend": false,
        "x": xs,
        "y": ys.into_iter().map(option_json).collect::<Vec<_>>(),
        "line": {"color": args.palette.pick(0)},
        "fillcolor": args.palette.pick(0),
        "hovertemplate": hovertemplate(&args.x, &args.y),
    }));

    base_layout(&mut fig, args.theme, &args.title);
    fig.update_layout(json!({
        "xaxis": {"title": {"text": args.x_title.as_deref().unwrap_or(&args.x)}},
        "yaxis": {"title": {"text": args.y}, "exponentformat": "none"},
    }));
    if args.block_zoom {
        fig.lock_zoom();
    }
    Ok(fig)
}

pub(crate) fn area_order(dataset: &Dataset, args: &AreaOrderArgs) -> BuildResult<Figure> {
    let xs = x_values(dataset, &args.x)?;
    let ys = numbers(dataset, &args.y, NumberStyle::DecimalComma)?;
    let groups = dataset.texts(&args.color)?;

    let keep: Vec<bool> = match args.min_x {
        Some(min_x) => numbers(dataset, &args.x, NumberStyle::Plain)?
            .into_iter()
            .map(|x| x.is_some_and(|x| x >= min_x))
            .collect(),
        None => vec![true; dataset.row_count()],
    };

    // Categories in first-seen order with their totals
    let mut categories: Vec<(String, f64)> = Vec::new();
    for (row, group) in groups.iter().enumerate() {
        if !keep[row] {
            continue;
        }
        let value = ys[row].unwrap_or(0.0);
        match categories.iter_mut().find(|(name, _)| name == group) {
            Some((_, total)) => *total += value,
            None => categories.push((group.clone(), value)),
        }
    }
    if args.reorder {
        categories.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    }

    let mut fig = Figure::new();
    for (index, (category, _)) in categories.iter().enumerate() {
        let rows: Vec<usize> = (0..dataset.row_count())
            .filter(|&row| keep[row] && &groups[row] == category)
            .collect();
        let color = args.palette.pick(index);
        fig.add_trace(json!({
            "type": "scatter",
            "mode": "lines",
            "stackgroup": "1",
            "name": category,
            "legendgroup": category,
            "x": rows.iter().map(|&r| xs[r].clone()).collect::<Vec<_>>(),
            "y": rows.iter().map(|&r| option_json(ys[r])).collect::<Vec<_>>(),
            "line": {"color": color},
            "fillcolor": color,
            "hovertemplate": format!(
                "{}={}<br>{}=%{{x}}<br>{}=%{{y}}<extra></extra>",
                args.color, category, args.x, args.y
            ),
        }));
    }

    base_layout(&mut fig, args.theme, &args.title);
    fig.update_layout(json!({
        "xaxis": {"title": {"text": args.x}},
        "yaxis": {"title": {"text": args.y_title}, "exponentformat": "none"},
        "legend": {"title": {"text": args.color}},
        "updatemenus": [{
            "type": "buttons",
            "direction": "left",
            "buttons": [
                {"args": ["visible", "legendonly"], "label": "Deselect All", "method": "restyle"},
                {"args": ["visible", true], "label": "Select All", "method": "restyle"},
            ],
            "pad": {"r": 10, "t": 10},
            "showactive": false,
            "x": 1,
            "xanchor": "right",
            "y": 1.1,
            "yanchor": "top",
        }],
    }));
    if args.block_zoom {
        fig.lock_zoom();
    }
    Ok(fig)
}

pub(crate) fn area_grouped(dataset: &Dataset, args: &AreaGroupedArgs) -> BuildResult<Figure> {
    let xs = dataset.column(&args.x)?;
    let ys = numbers(dataset, &args.y, NumberStyle::DecimalComma)?;

    // (display text, axis value, numeric key, sum)
    let mut groups: Vec<(String, Value, Option<f64>, f64)> = Vec::new();
    for (row, cell) in xs.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let text = cell.to_text();
        let value = ys[row].unwrap_or(0.0);
        match groups.iter_mut().find(|g| g.0 == text) {
            Some(group) => group.3 += value,
            None => {
                let key = match cell {
                    Cell::Number(n) => Some(*n),
                    _ => None,
                };
                groups.push((text, cell.to_json(), key, value));
            }
        }
    }
    // Numbers ascending, then text keys in lexical order
    groups.sort_by(|a, b| match (a.2, b.2) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "lines",
        "fill": "tozeroy",
        "name": args.legend_title,
        "showlegend": true,
        "x": groups.iter().map(|g| g.1.clone()).collect::<Vec<_>>(),
        "y": groups.iter().map(|g| g.3).collect::<Vec<_>>(),
        "line": {"color": args.color},
        "hovertemplate": hovertemplate(&args.x, &args.y),
    }));

    base_layout(&mut fig, args.theme, &args.title);
    fig.update_layout(json!({
        "xaxis": {"title": {"text": args.x}},
        "yaxis": {"title": {"text": args.y}, "exponentformat": "none", "showgrid": true},
        "legend": {"title": {"text": args.legend_title}},
    }));
    Ok(fig)
}
