//! Chart builders
//!
//! Every builder is a pure function `build(&Dataset, &Args)` returning an
//! [`Artifact`]: a Plotly figure document for graphs, or a self-contained
//! HTML page for the Leaflet map. Builders never touch the filesystem and
//! never modify the dataset they are given.
//!
//! [`BuilderSpec`] ties a builder to its named arguments. It is what a
//! registry entry stores, and it serializes as
//! `{"builder": "color_bar", "args": {...}}` so catalogs can be loaded
//! from JSON with unknown argument names rejected.

mod area;
mod bars;
mod distribution;
mod error;
mod figure;
mod geo;
mod matrix;
mod palette;
mod ras_map;
mod theme;

pub use area::{AreaGroupedArgs, AreaOrderArgs, AreaSingleArgs};
pub use bars::{BarArgs, ColorBarArgs, DoubleAxisBarArgs, GradientBarArgs, SimpleBarArgs};
pub use distribution::{BoxArgs, PieArgs, TreemapArgs};
pub use error::{BuildError, BuildResult};
pub use figure::Figure;
pub use geo::AnimatedBubbleMapArgs;
pub use matrix::AlternativesMatrixArgs;
pub use palette::{NamedPalette, Palette};
pub use ras_map::RasBubbleMapArgs;
pub use theme::Theme;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::data::Dataset;
use crate::data::numeric::NumberStyle;

/// What a builder hands back
#[derive(Clone, Debug, PartialEq)]
pub enum Artifact {
    Chart(Figure),
    Html(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Chart,
    Html,
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Chart(_) => ArtifactKind::Chart,
            Artifact::Html(_) => ArtifactKind::Html,
        }
    }

    /// Serialized form returned to clients: figure JSON or the HTML page.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        match self {
            Artifact::Chart(figure) => figure.to_json(),
            Artifact::Html(html) => Ok(html.clone()),
        }
    }

    pub fn as_figure_mut(&mut self) -> Option<&mut Figure> {
        match self {
            Artifact::Chart(figure) => Some(figure),
            Artifact::Html(_) => None,
        }
    }
}

/// A builder together with its arguments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "builder", content = "args", rename_all = "snake_case")]
pub enum BuilderSpec {
    AreaSingle(AreaSingleArgs),
    AreaOrder(AreaOrderArgs),
    AreaGrouped(AreaGroupedArgs),
    ColorBar(ColorBarArgs),
    GradientBar(GradientBarArgs),
    SimpleBar(SimpleBarArgs),
    Bar(BarArgs),
    DoubleAxisBar(DoubleAxisBarArgs),
    Box(BoxArgs),
    Pie(PieArgs),
    Treemap(TreemapArgs),
    AlternativesMatrix(AlternativesMatrixArgs),
    AnimatedBubbleMap(AnimatedBubbleMapArgs),
    RasBubbleMap(RasBubbleMapArgs),
}

impl BuilderSpec {
    pub fn name(&self) -> &'static str {
        match self {
            BuilderSpec::AreaSingle(_) => "area_single",
            BuilderSpec::AreaOrder(_) => "area_order",
            BuilderSpec::AreaGrouped(_) => "area_grouped",
            BuilderSpec::ColorBar(_) => "color_bar",
            BuilderSpec::GradientBar(_) => "gradient_bar",
            BuilderSpec::SimpleBar(_) => "simple_bar",
            BuilderSpec::Bar(_) => "bar",
            BuilderSpec::DoubleAxisBar(_) => "double_axis_bar",
            BuilderSpec::Box(_) => "box",
            BuilderSpec::Pie(_) => "pie",
            BuilderSpec::Treemap(_) => "treemap",
            BuilderSpec::AlternativesMatrix(_) => "alternatives_matrix",
            BuilderSpec::AnimatedBubbleMap(_) => "animated_bubble_map",
            BuilderSpec::RasBubbleMap(_) => "ras_bubble_map",
        }
    }

    /// Kind of artifact `build` produces.
    pub fn artifact_kind(&self) -> ArtifactKind {
        match self {
            BuilderSpec::RasBubbleMap(_) => ArtifactKind::Html,
            _ => ArtifactKind::Chart,
        }
    }

    /// Check the arguments without looking at any data.
    pub fn validate(&self) -> BuildResult<()> {
        match self {
            BuilderSpec::AreaSingle(args) => args.validate(),
            BuilderSpec::AreaOrder(args) => args.validate(),
            BuilderSpec::AreaGrouped(args) => args.validate(),
            BuilderSpec::ColorBar(args) => args.validate(),
            BuilderSpec::GradientBar(args) => args.validate(),
            BuilderSpec::SimpleBar(args) => args.validate(),
            BuilderSpec::Bar(args) => args.validate(),
            BuilderSpec::DoubleAxisBar(args) => args.validate(),
            BuilderSpec::Box(args) => args.validate(),
            BuilderSpec::Pie(args) => args.validate(),
            BuilderSpec::Treemap(args) => args.validate(),
            BuilderSpec::AlternativesMatrix(args) => args.validate(),
            BuilderSpec::AnimatedBubbleMap(args) => args.validate(),
            BuilderSpec::RasBubbleMap(args) => args.validate(),
        }
    }

    pub fn build(&self, dataset: &Dataset) -> BuildResult<Artifact> {
        let figure = match self {
            BuilderSpec::AreaSingle(args) => area::area_single(dataset, args)?,
            BuilderSpec::AreaOrder(args) => area::area_order(dataset, args)?,
            BuilderSpec::AreaGrouped(args) => area::area_grouped(dataset, args)?,
            BuilderSpec::ColorBar(args) => bars::color_bar(dataset, args)?,
            BuilderSpec::GradientBar(args) => bars::gradient_bar(dataset, args)?,
            BuilderSpec::SimpleBar(args) => bars::simple_bar(dataset, args)?,
            BuilderSpec::Bar(args) => bars::bar(dataset, args)?,
            BuilderSpec::DoubleAxisBar(args) => bars::double_axis_bar(dataset, args)?,
            BuilderSpec::Box(args) => distribution::box_plot(dataset, args)?,
            BuilderSpec::Pie(args) => distribution::pie(dataset, args)?,
            BuilderSpec::Treemap(args) => distribution::treemap(dataset, args)?,
            BuilderSpec::AlternativesMatrix(args) => matrix::alternatives_matrix(dataset, args)?,
            BuilderSpec::AnimatedBubbleMap(args) => geo::animated_bubble_map(dataset, args)?,
            BuilderSpec::RasBubbleMap(args) => {
                return ras_map::ras_bubble_map(dataset, args).map(Artifact::Html);
            }
        };
        Ok(Artifact::Chart(figure))
    }
}

// ============================================================================
// Shared builder helpers
// ============================================================================

/// Template and title common to every chart.
pub(crate) fn base_layout(figure: &mut Figure, theme: Theme, title: &str) {
    if let Some(template) = theme.template() {
        figure.update_layout(json!({ "template": template }));
    }
    figure.update_layout(json!({ "title": { "text": title } }));
}

/// Missing values count as zero where a bar or a sum needs a number.
pub(crate) fn or_zero(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(0.0)).collect()
}

pub(crate) fn numbers(
    dataset: &Dataset,
    column: &str,
    style: NumberStyle,
) -> BuildResult<Vec<Option<f64>>> {
    Ok(dataset.numbers(column, style)?)
}

/// Row indices ordered by descending value; ties keep row order.
pub(crate) fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// `first + " " + second` per row, used for "Country Flag" labels.
pub(crate) fn joined_labels(
    dataset: &Dataset,
    first: &str,
    second: &str,
) -> BuildResult<Vec<String>> {
    let a = dataset.texts(first)?;
    let b = dataset.texts(second)?;
    Ok(a.into_iter()
        .zip(b)
        .map(|(a, b)| format!("{} {}", a, b).trim().to_string())
        .collect())
}

pub(crate) fn pick<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i].clone()).collect()
}

pub(crate) fn number_json(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub(crate) fn option_json(value: Option<f64>) -> Value {
    value.map(number_json).unwrap_or(Value::Null)
}

pub(crate) fn require_text(name: &'static str, value: &str) -> BuildResult<()> {
    if value.trim().is_empty() {
        Err(BuildError::invalid(name, "must not be empty"))
    } else {
        Ok(())
    }
}

pub(crate) fn require_palette(name: &'static str, palette: &Palette) -> BuildResult<()> {
    if palette.is_empty() {
        Err(BuildError::invalid(name, "palette has no colors"))
    } else {
        Ok(())
    }
}
