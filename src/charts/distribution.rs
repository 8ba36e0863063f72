//! Box plot, pie and treemap: charts about how a total is spread.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::palette::{NamedPalette, Palette};
use super::{
    BuildError, BuildResult, Figure, Theme, base_layout, descending_order, number_json, numbers,
    option_json, or_zero, require_palette, require_text,
};
use crate::data::Dataset;
use crate::data::numeric::NumberStyle;

fn default_pastel() -> Palette {
    Palette::Named(NamedPalette::Pastel1)
}

fn default_brand() -> Palette {
    Palette::Named(NamedPalette::Brand)
}

fn default_box_y_title() -> String {
    "Mortality Rate (%)".to_string()
}

fn default_total_label() -> String {
    "Millions tons of CO2 emitted".to_string()
}

fn default_text_size() -> u32 {
    16
}

fn default_rate_label() -> String {
    "Escape rate".to_string()
}

fn default_value_label() -> String {
    "Number of escapes".to_string()
}

fn default_production_label() -> String {
    "Production (tonnes)".to_string()
}

fn default_top_n() -> usize {
    6
}

fn default_treemap_height() -> u32 {
    400
}

fn default_treemap_width() -> u32 {
    500
}

/// Distribution of `y` per `x` category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxArgs {
    pub x: String,
    pub y: String,
    pub title: String,
    #[serde(default)]
    pub x_title: Option<String>,
    #[serde(default = "default_box_y_title")]
    pub y_title: String,
    #[serde(default)]
    pub block_zoom: bool,
    #[serde(default = "default_pastel")]
    pub palette: Palette,
}

impl BoxArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y", &self.y)?;
        require_palette("palette", &self.palette)
    }
}

/// Share of each row in the total of `values`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PieArgs {
    pub names: String,
    pub values: String,
    pub title: String,
    #[serde(default)]
    pub hover_columns: Vec<String>,
    #[serde(default = "default_brand")]
    pub colors: Palette,
    /// Unit text after the total, which is shown in millions
    #[serde(default = "default_total_label")]
    pub total_label: String,
    #[serde(default = "default_text_size")]
    pub text_size: u32,
}

impl PieArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("names", &self.names)?;
        require_text("values", &self.values)?;
        require_palette("colors", &self.colors)?;
        if self.text_size == 0 {
            return Err(BuildError::invalid("text_size", "must be positive"));
        }
        Ok(())
    }
}

/// Top rows as tiles plus an "Others" tile for the rest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreemapArgs {
    /// Tile size column
    pub value: String,
    /// Denominator of the rate of the "Others" tile
    pub base: String,
    /// Preformatted rate of each top row
    pub rate: String,
    pub production: String,
    pub name: String,
    pub title: String,
    #[serde(default = "default_rate_label")]
    pub rate_label: String,
    #[serde(default = "default_value_label")]
    pub value_label: String,
    #[serde(default = "default_production_label")]
    pub production_label: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_treemap_height")]
    pub height: u32,
    #[serde(default = "default_treemap_width")]
    pub width: u32,
    #[serde(default = "default_brand")]
    pub palette: Palette,
}

impl TreemapArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("value", &self.value)?;
        require_text("name", &self.name)?;
        require_palette("palette", &self.palette)?;
        if self.top_n == 0 {
            return Err(BuildError::invalid("top_n", "must be positive"));
        }
        if self.height == 0 || self.width == 0 {
            return Err(BuildError::invalid("height", "chart size must be positive"));
        }
        Ok(())
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

pub(crate) fn box_plot(dataset: &Dataset, args: &BoxArgs) -> BuildResult<Figure> {
    let categories = dataset.texts(&args.x)?;
    let ys = numbers(dataset, &args.y, NumberStyle::DecimalComma)?;

    // Category order by ascending median; categories without data go last
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (category, y) in categories.iter().zip(&ys) {
        let slot = match groups.iter().position(|(name, _)| name == category) {
            Some(i) => i,
            None => {
                groups.push((category.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(y) = y {
            groups[slot].1.push(*y);
        }
    }
    let mut ranked: Vec<(String, Option<f64>)> = groups
        .into_iter()
        .map(|(name, mut values)| {
            let m = median(&mut values);
            (name, m)
        })
        .collect();
    ranked.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    let order: Vec<String> = ranked.into_iter().map(|(name, _)| name).collect();

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "box",
        "name": "",
        "x": categories,
        "y": ys.into_iter().map(option_json).collect::<Vec<_>>(),
        "marker": {"color": args.palette.pick(0)},
        "hovertemplate": format!(
            "<b>%{{x}}</b><br><br>{}=%{{x}}<br>{}=%{{y}}<extra></extra>",
            args.x, args.y
        ),
    }));

    base_layout(&mut fig, Theme::SimpleWhite, &args.title);
    fig.update_layout(json!({
        "xaxis": {
            "title": {"text": args.x_title.as_deref().unwrap_or(&args.x)},
            "exponentformat": "none",
            "categoryorder": "array",
            "categoryarray": order,
        },
        "yaxis": {"title": {"text": args.y_title}},
    }));
    if args.block_zoom {
        fig.lock_zoom();
    }
    Ok(fig)
}

pub(crate) fn pie(dataset: &Dataset, args: &PieArgs) -> BuildResult<Figure> {
    let names = dataset.texts(&args.names)?;
    let values = or_zero(numbers(dataset, &args.values, NumberStyle::DecimalComma)?);
    let total: f64 = values.iter().sum();
    let percentages: Vec<f64> = values
        .iter()
        .map(|v| {
            if total == 0.0 {
                0.0
            } else {
                (v / total * 100.0 * 100.0).round() / 100.0
            }
        })
        .collect();

    let hover = args
        .hover_columns
        .iter()
        .map(|c| dataset.texts(c))
        .collect::<Result<Vec<_>, _>>()?;
    let customdata: Vec<Vec<String>> = (0..dataset.row_count())
        .map(|row| hover.iter().map(|col| col[row].clone()).collect())
        .collect();
    let extra: String = args
        .hover_columns
        .iter()
        .enumerate()
        .map(|(i, name)| format!("<br>{}=%{{customdata[{}]}}", name, i))
        .collect();

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "pie",
        "labels": names,
        "values": percentages,
        "customdata": customdata,
        "marker": {
            "colors": args.colors.colors(),
            "line": {"color": "#ffffff", "width": 2},
        },
        "textfont": {"size": args.text_size},
        "hovertemplate": format!("{}=%{{label}}<br>Percentage=%{{value}}{}<extra></extra>", args.names, extra),
    }));

    base_layout(&mut fig, Theme::SimpleWhite, &args.title);
    fig.update_layout(json!({
        "annotations": [{
            "x": 0,
            "y": 0,
            "text": format!("Total: {:.2} {}", total / 1_000_000.0, args.total_label),
            "showarrow": false,
            "font": {"size": 30},
        }],
    }));
    Ok(fig)
}

pub(crate) fn treemap(dataset: &Dataset, args: &TreemapArgs) -> BuildResult<Figure> {
    let names = dataset.texts(&args.name)?;
    let values = or_zero(numbers(dataset, &args.value, NumberStyle::DecimalComma)?);
    let bases = or_zero(numbers(dataset, &args.base, NumberStyle::DecimalComma)?);
    let production = or_zero(numbers(dataset, &args.production, NumberStyle::DecimalComma)?);
    let rates = dataset.texts(&args.rate)?;

    let order = descending_order(&values);
    let (top, rest) = order.split_at(order.len().min(args.top_n));

    // (name, rate text, value, production)
    let mut tiles: Vec<(String, String, f64, f64)> = top
        .iter()
        .map(|&r| (names[r].clone(), rates[r].clone(), values[r], production[r]))
        .collect();
    if !rest.is_empty() {
        let value: f64 = rest.iter().map(|&r| values[r]).sum();
        let base: f64 = rest.iter().map(|&r| bases[r]).sum();
        let prod: f64 = rest.iter().map(|&r| production[r]).sum();
        let ratio = if base == 0.0 { 0.0 } else { value / base };
        tiles.push(("Others".to_string(), format!("{:.2}%", ratio * 100.0), value, prod));
    }

    let root = args.title.clone();
    let total: f64 = tiles.iter().map(|t| t.2).sum();
    let mut ids = vec![root.clone()];
    let mut labels = vec![root.clone()];
    let mut parents = vec![String::new()];
    let mut tile_values: Vec<Value> = vec![number_json(total)];
    let mut customdata: Vec<Value> = vec![json!([total, Value::Null])];
    for (name, rate, value, prod) in &tiles {
        let label = format!("{} - {} = {}", name, args.rate_label, rate);
        ids.push(format!("{}/{}", root, label));
        labels.push(label);
        parents.push(root.clone());
        tile_values.push(number_json(*value));
        customdata.push(json!([value, prod]));
    }
    let colors: Vec<String> = (0..labels.len()).map(|i| args.palette.pick(i)).collect();

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "treemap",
        "ids": ids,
        "labels": labels,
        "parents": parents,
        "values": tile_values,
        "branchvalues": "total",
        "customdata": customdata,
        "root": {"color": "lightgrey"},
        "marker": {"colors": colors},
        "textfont": {"size": 14},
        "hovertemplate": format!(
            "<b>%{{label}}</b><br>{}=%{{value}}<br>{}=%{{customdata[1]:,}}<extra></extra>",
            args.value_label, args.production_label
        ),
    }));

    base_layout(&mut fig, Theme::None, &args.title);
    fig.update_layout(json!({
        "margin": {"t": 50, "l": 25, "r": 25, "b": 25},
        "showlegend": true,
        "width": args.width,
        "height": args.height,
    }));
    Ok(fig)
}
