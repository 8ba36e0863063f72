//! Ranked bar charts.
//!
//! The horizontal variants sort rows by descending value and pin that order
//! on the category axis, largest bar on top.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::palette::{NamedPalette, Palette};
use super::{
    BuildError, BuildResult, Figure, Theme, base_layout, descending_order, joined_labels,
    number_json, numbers, option_json, or_zero, pick, require_palette, require_text,
};
use crate::constants::{BAR_RANGE_HEADROOM, BRAND_BLUE, BRAND_RED};
use crate::data::Dataset;
use crate::data::numeric::{NumberStyle, format_money, format_thousands, is_approximate, parse_number};

fn default_burg() -> Palette {
    Palette::Named(NamedPalette::Burg)
}

fn default_pastel() -> Palette {
    Palette::Named(NamedPalette::Pastel1)
}

fn default_bar_color() -> String {
    BRAND_BLUE.to_string()
}

fn default_point_color() -> String {
    BRAND_RED.to_string()
}

fn default_true() -> bool {
    true
}

/// Horizontal bars colored by each row's share of the total
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorBarArgs {
    pub x: String,
    pub y1: String,
    pub y2: String,
    /// Column name the recomputed share is reported under
    pub share_column: String,
    pub title: String,
    #[serde(default)]
    pub x_title: Option<String>,
    #[serde(default)]
    pub y_title: Option<String>,
    #[serde(default = "default_burg")]
    pub palette: Palette,
    #[serde(default)]
    pub block_zoom: bool,
}

impl ColorBarArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y1", &self.y1)?;
        require_text("y2", &self.y2)?;
        require_text("share_column", &self.share_column)?;
        require_palette("palette", &self.palette)
    }
}

/// Vertical bars with a continuous color from a second column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientBarArgs {
    pub x: String,
    pub y: String,
    pub color: String,
    /// Display names for columns, by source column name
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    pub title: String,
    #[serde(default)]
    pub y_title: Option<String>,
    #[serde(default = "default_burg")]
    pub palette: Palette,
    #[serde(default)]
    pub theme: Theme,
}

impl GradientBarArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y", &self.y)?;
        require_text("color", &self.color)?;
        require_palette("palette", &self.palette)
    }

    fn display<'a>(&'a self, column: &'a str) -> &'a str {
        self.rename.get(column).map(String::as_str).unwrap_or(column)
    }
}

/// Single-color ranked bars with company facts on hover
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleBarArgs {
    pub x: String,
    pub y1: String,
    pub y2: String,
    /// Revenue column in dollars, shown as `$x.xM` / `$x.xB`
    pub revenue: String,
    /// Headcount column, shown with thousands separators
    pub employees: String,
    #[serde(default)]
    pub hover_columns: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub x_title: Option<String>,
    #[serde(default)]
    pub y_title: Option<String>,
    #[serde(default = "default_bar_color")]
    pub color: String,
    /// Read `~`-marked approximations in revenue and employees
    #[serde(default = "default_true")]
    pub fix_approx: bool,
    #[serde(default)]
    pub block_zoom: bool,
}

impl SimpleBarArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y1", &self.y1)?;
        require_text("revenue", &self.revenue)?;
        require_text("employees", &self.employees)?;
        require_text("color", &self.color)
    }
}

/// Ranked bars with one extra hover column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarArgs {
    pub x: String,
    pub y: String,
    pub hover_column: String,
    pub title: String,
    #[serde(default)]
    pub x_title: Option<String>,
    #[serde(default = "default_pastel")]
    pub palette: Palette,
}

impl BarArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x", &self.x)?;
        require_text("y", &self.y)?;
        require_palette("palette", &self.palette)
    }
}

/// Bars on the left axis and markers on a right axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoubleAxisBarArgs {
    pub x1: String,
    pub x2: String,
    pub y1: String,
    pub y2: String,
    #[serde(default)]
    pub hover_columns: Vec<String>,
    pub title: String,
    #[serde(default = "default_bar_color")]
    pub bar_color: String,
    pub bar_legend: String,
    #[serde(default = "default_point_color")]
    pub point_color: String,
    pub point_legend: String,
    #[serde(default)]
    pub x_title: Option<String>,
    #[serde(default)]
    pub y1_title: Option<String>,
    #[serde(default)]
    pub y2_title: Option<String>,
    #[serde(default)]
    pub block_zoom: bool,
}

impl DoubleAxisBarArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("x1", &self.x1)?;
        require_text("y1", &self.y1)?;
        require_text("y2", &self.y2)?;
        require_text("bar_color", &self.bar_color)?;
        require_text("point_color", &self.point_color)
    }
}

/// Axis range giving the outside labels of the longest bar some room.
fn value_range(values: &[f64]) -> Value {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        json!([0.0, max * BAR_RANGE_HEADROOM])
    } else {
        json!([0.0, 1.0])
    }
}

fn hover_rows(
    dataset: &Dataset,
    columns: &[String],
    order: &[usize],
) -> BuildResult<Vec<Vec<String>>> {
    let texts = columns
        .iter()
        .map(|c| dataset.texts(c))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(order
        .iter()
        .map(|&row| texts.iter().map(|col| col[row].clone()).collect())
        .collect())
}

fn hover_lines(columns: &[String], offset: usize) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| format!("<br>{}=%{{customdata[{}]}}", name, i + offset))
        .collect()
}

pub(crate) fn color_bar(dataset: &Dataset, args: &ColorBarArgs) -> BuildResult<Figure> {
    let values = or_zero(numbers(dataset, &args.x, NumberStyle::DecimalComma)?);
    let labels = joined_labels(dataset, &args.y1, &args.y2)?;

    let total: f64 = values.iter().sum();
    let shares: Vec<f64> = values
        .iter()
        .map(|v| if total == 0.0 { 0.0 } else { v / total })
        .collect();

    let order = descending_order(&values);
    let values = pick(&values, &order);
    let labels = pick(&labels, &order);
    let shares = pick(&shares, &order);

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "bar",
        "orientation": "h",
        "x": values,
        "y": labels,
        "marker": {"color": shares, "coloraxis": "coloraxis"},
        "customdata": shares.iter().map(|s| vec![*s]).collect::<Vec<_>>(),
        "texttemplate": "%{x:,.0f}",
        "textposition": "outside",
        "textangle": 0,
        "textfont": {"size": 12},
        "cliponaxis": false,
        "hovertemplate": format!(
            "<b>%{{y}}</b><br><br>{}=%{{x:,.0f}}<br>{}=%{{customdata[0]:.1%}}<extra></extra>",
            args.x, args.share_column
        ),
    }));

    base_layout(&mut fig, Theme::SimpleWhite, &args.title);
    fig.update_layout(json!({
        "xaxis": {
            "title": {"text": args.x_title.as_deref().unwrap_or(&args.x)},
            "exponentformat": "none",
            "range": value_range(&values),
        },
        "yaxis": {
            "title": {"text": args.y_title.as_deref().unwrap_or(&args.y1)},
            "tickfont": {"size": 13},
            "ticks": "",
            "categoryorder": "array",
            "categoryarray": labels,
            "autorange": "reversed",
        },
        "coloraxis": {
            "colorscale": args.palette.colorscale(),
            "colorbar": {"title": {"text": args.share_column}, "tickformat": "0%"},
        },
    }));
    if args.block_zoom {
        fig.lock_zoom();
    }
    Ok(fig)
}

pub(crate) fn gradient_bar(dataset: &Dataset, args: &GradientBarArgs) -> BuildResult<Figure> {
    let xs: Vec<Value> = dataset
        .column(&args.x)?
        .into_iter()
        .map(|c| c.to_json())
        .collect();
    let ys = numbers(dataset, &args.y, NumberStyle::DecimalComma)?;
    let colors = numbers(dataset, &args.color, NumberStyle::DecimalComma)?;

    let y_name = args.display(&args.y);
    let color_name = args.display(&args.color);

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "bar",
        "x": xs,
        "y": ys.into_iter().map(option_json).collect::<Vec<_>>(),
        "marker": {
            "color": colors.into_iter().map(option_json).collect::<Vec<_>>(),
            "coloraxis": "coloraxis",
        },
        "textposition": "outside",
        "textangle": 0,
        "textfont": {"size": 12},
        "cliponaxis": false,
        "hovertemplate": format!(
            "<b>%{{x}}</b><br><br>{}=%{{y:,.0f}}<br>{}=%{{marker.color:,.0f}}<extra></extra>",
            y_name, color_name
        ),
    }));

    base_layout(&mut fig, args.theme, &args.title);
    fig.update_layout(json!({
        "xaxis": {"title": {"text": args.display(&args.x)}, "exponentformat": "none"},
        "yaxis": {"title": {"text": args.y_title.as_deref().unwrap_or(y_name)}},
        "coloraxis": {
            "colorscale": args.palette.colorscale(),
            "colorbar": {"title": {"text": color_name}},
        },
    }));
    Ok(fig)
}

/// Format an amount cell, keeping a `~` on approximate figures.
fn format_amount(
    raw: &str,
    column: &str,
    row: usize,
    fix_approx: bool,
    format: fn(f64) -> String,
) -> BuildResult<String> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    let style = if fix_approx {
        NumberStyle::Approximate
    } else {
        NumberStyle::DecimalComma
    };
    let value = parse_number(raw, style).ok_or_else(|| BuildError::NotNumeric {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })?;
    let formatted = format(value);
    if fix_approx && is_approximate(raw) {
        Ok(format!("~{}", formatted))
    } else {
        Ok(formatted)
    }
}

pub(crate) fn simple_bar(dataset: &Dataset, args: &SimpleBarArgs) -> BuildResult<Figure> {
    let values = or_zero(numbers(dataset, &args.x, NumberStyle::Approximate)?);
    let labels = joined_labels(dataset, &args.y1, &args.y2)?;

    let revenues = dataset
        .texts(&args.revenue)?
        .iter()
        .enumerate()
        .map(|(row, raw)| format_amount(raw, &args.revenue, row, args.fix_approx, format_money))
        .collect::<BuildResult<Vec<_>>>()?;
    let employees = dataset
        .texts(&args.employees)?
        .iter()
        .enumerate()
        .map(|(row, raw)| {
            format_amount(raw, &args.employees, row, args.fix_approx, |v| {
                format_thousands(v, 0)
            })
        })
        .collect::<BuildResult<Vec<_>>>()?;

    let order = descending_order(&values);
    let mut customdata = hover_rows(dataset, &args.hover_columns, &order)?;
    for (row_data, &row) in customdata.iter_mut().zip(&order) {
        for (slot, column) in row_data.iter_mut().zip(&args.hover_columns) {
            if column == &args.revenue {
                *slot = revenues[row].clone();
            } else if column == &args.employees {
                *slot = employees[row].clone();
            }
        }
    }

    let values = pick(&values, &order);
    let labels = pick(&labels, &order);

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "bar",
        "orientation": "h",
        "x": values,
        "y": labels,
        "customdata": customdata,
        "marker": {"color": args.color},
        "texttemplate": "%{x:,.0f}",
        "textposition": "inside",
        "textangle": 0,
        "textfont": {"size": 12},
        "cliponaxis": false,
        "hovertemplate": format!(
            "<b>%{{y}}</b><br><br>{}=%{{x:,.0f}}{}<extra></extra>",
            args.x,
            hover_lines(&args.hover_columns, 0)
        ),
    }));

    base_layout(&mut fig, Theme::SimpleWhite, &args.title);
    fig.update_layout(json!({
        "xaxis": {
            "title": {"text": args.x_title.as_deref().unwrap_or(&args.x)},
            "exponentformat": "none",
        },
        "yaxis": {
            "title": {"text": args.y_title.as_deref().unwrap_or(&args.y1)},
            "tickfont": {"size": 13},
            "ticks": "",
            "categoryorder": "array",
            "categoryarray": labels,
            "autorange": "reversed",
        },
    }));
    if args.block_zoom {
        fig.lock_zoom();
    }
    Ok(fig)
}

pub(crate) fn bar(dataset: &Dataset, args: &BarArgs) -> BuildResult<Figure> {
    let values = or_zero(numbers(dataset, &args.x, NumberStyle::DecimalComma)?);
    let labels = dataset.texts(&args.y)?;
    let order = descending_order(&values);
    let customdata = hover_rows(dataset, std::slice::from_ref(&args.hover_column), &order)?;

    let values = pick(&values, &order);
    let labels = pick(&labels, &order);

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "bar",
        "orientation": "h",
        "x": values,
        "y": labels,
        "customdata": customdata,
        "marker": {"color": args.palette.pick(0)},
        "texttemplate": "%{x:,.0f}",
        "textposition": "outside",
        "textangle": 0,
        "textfont": {"size": 12},
        "cliponaxis": false,
        "hovertemplate": format!(
            "<b>%{{y}}</b><br><br>{}=%{{x:,.0f}}<br>{}=%{{customdata[0]}}<extra></extra>",
            args.x, args.hover_column
        ),
    }));

    base_layout(&mut fig, Theme::SimpleWhite, &args.title);
    fig.update_layout(json!({
        "xaxis": {
            "title": {"text": args.x_title.as_deref().unwrap_or(&args.x)},
            "exponentformat": "none",
            "range": value_range(&values),
        },
        "yaxis": {
            "title": {"text": args.y},
            "categoryorder": "array",
            "categoryarray": labels,
            "autorange": "reversed",
        },
    }));
    Ok(fig)
}

pub(crate) fn double_axis_bar(dataset: &Dataset, args: &DoubleAxisBarArgs) -> BuildResult<Figure> {
    let labels = joined_labels(dataset, &args.x1, &args.x2)?;
    let bars = or_zero(numbers(dataset, &args.y1, NumberStyle::DecimalComma)?);
    let points = numbers(dataset, &args.y2, NumberStyle::DecimalComma)?;

    let order = descending_order(&bars);
    let customdata = hover_rows(dataset, &args.hover_columns, &order)?;
    let labels = pick(&labels, &order);
    let bars = pick(&bars, &order);
    let points: Vec<Value> = pick(&points, &order).into_iter().map(option_json).collect();

    let extra = hover_lines(&args.hover_columns, 0);
    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "bar",
        "name": args.bar_legend,
        "x": labels,
        "y": bars.iter().copied().map(number_json).collect::<Vec<_>>(),
        "yaxis": "y",
        "marker": {"color": args.bar_color},
        "customdata": customdata,
        "hovertemplate": format!(
            "<b>%{{x}}</b><br><br>{}=%{{y:,.0f}}{}<extra></extra>",
            args.bar_legend, extra
        ),
    }));
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "markers",
        "name": args.point_legend,
        "x": labels,
        "y": points,
        "yaxis": "y2",
        "marker": {"color": args.point_color, "size": 10},
        "hovertemplate": format!(
            "<b>%{{x}}</b><br><br>{}=%{{y:,.1f}}<extra></extra>",
            args.point_legend
        ),
    }));

    base_layout(&mut fig, Theme::SimpleWhite, &args.title);
    fig.update_layout(json!({
        "xaxis": {
            "title": {"text": args.x_title.as_deref().unwrap_or(&args.x1)},
            "categoryorder": "array",
            "categoryarray": labels,
        },
        "yaxis": {
            "title": {"text": args.y1_title.as_deref().unwrap_or(&args.y1)},
            "exponentformat": "none",
        },
        "yaxis2": {
            "title": {"text": args.y2_title.as_deref().unwrap_or(&args.y2)},
            "overlaying": "y",
            "side": "right",
            "showgrid": false,
        },
        "legend": {"orientation": "h", "y": -0.2},
    }));
    if args.block_zoom {
        fig.lock_zoom();
    }
    Ok(fig)
}
