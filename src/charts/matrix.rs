//! Impact matrix of food alternatives to farmed salmon.
//!
//! The dataset supplies the labels and hover texts: its first column names
//! the criteria (rows), the remaining headers name the alternatives
//! (columns) and each cell explains the score at that position. Scores are
//! part of the arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::palette::{IMPACT_SCALE, continuous_scale};
use super::{BuildError, BuildResult, Figure};
use crate::constants::DEFAULT_HOVER_WRAP;
use crate::data::Dataset;

fn default_max_len() -> usize {
    DEFAULT_HOVER_WRAP
}

fn default_scores() -> Vec<Vec<u8>> {
    vec![
        vec![2, 2, 3, 2, 0, 0, 0, 0],
        vec![1, 1, 0, 1, 2, 2, 4, 4],
        vec![0, 0, 1, 1, 1, 1, 4, 1],
        vec![4, 2, 1, 2, 2, 2, 0, 0],
        vec![4, 3, 2, 2, 0, 0, 0, 0],
    ]
}

fn default_legend_low() -> String {
    "Very limited impact".to_string()
}

fn default_legend_high() -> String {
    "Very high impact".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternativesMatrixArgs {
    /// Hover text wrap width
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Column label wrap width, labels are left alone when unset
    #[serde(default)]
    pub max_len_col: Option<usize>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default = "default_legend_low")]
    pub legend_low: String,
    #[serde(default = "default_legend_high")]
    pub legend_high: String,
    #[serde(default)]
    pub hover_disable: bool,
    /// Raw scores, criteria by alternatives, each in `0..=4`
    #[serde(default = "default_scores")]
    pub scores: Vec<Vec<u8>>,
}

impl Default for AlternativesMatrixArgs {
    fn default() -> Self {
        Self {
            max_len: default_max_len(),
            max_len_col: None,
            width: None,
            height: None,
            legend_low: default_legend_low(),
            legend_high: default_legend_high(),
            hover_disable: false,
            scores: default_scores(),
        }
    }
}

impl AlternativesMatrixArgs {
    pub fn validate(&self) -> BuildResult<()> {
        if self.max_len == 0 {
            return Err(BuildError::invalid("max_len", "must be positive"));
        }
        if self.max_len_col == Some(0) {
            return Err(BuildError::invalid("max_len_col", "must be positive"));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(BuildError::invalid("width", "chart size must be positive"));
        }
        let Some(first) = self.scores.first() else {
            return Err(BuildError::invalid("scores", "matrix is empty"));
        };
        if self.scores.iter().any(|row| row.len() != first.len()) {
            return Err(BuildError::invalid("scores", "rows have different lengths"));
        }
        if self.scores.iter().flatten().any(|&s| s > 4) {
            return Err(BuildError::invalid("scores", "scores range from 0 to 4"));
        }
        Ok(())
    }
}

/// Greedy word wrap with `<br>` line breaks. Words longer than the width
/// stay whole.
pub(crate) fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("<br>")
}

/// Scores 0 and 1 share the best color; the others shift down by one.
fn collapse_score(score: u8) -> u8 {
    score.saturating_sub(1)
}

pub(crate) fn alternatives_matrix(
    dataset: &Dataset,
    args: &AlternativesMatrixArgs,
) -> BuildResult<Figure> {
    let Some(label_column) = dataset.headers.first() else {
        return Err(BuildError::Shape("dataset has no columns".to_string()));
    };
    let alternatives = &dataset.headers[1..];
    let criteria = dataset.texts(label_column)?;

    let rows = args.scores.len();
    let cols = args.scores.first().map_or(0, Vec::len);
    if criteria.len() != rows || alternatives.len() != cols {
        return Err(BuildError::Shape(format!(
            "scores are {}x{} but the dataset describes {}x{}",
            rows,
            cols,
            criteria.len(),
            alternatives.len()
        )));
    }

    let x_labels: Vec<String> = alternatives
        .iter()
        .map(|label| match args.max_len_col {
            Some(width) => wrap_text(label, width),
            None => label.clone(),
        })
        .collect();
    let z: Vec<Vec<u8>> = args
        .scores
        .iter()
        .map(|row| row.iter().copied().map(collapse_score).collect())
        .collect();
    let hover: Vec<Vec<String>> = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| wrap_text(&dataset.cell(r, c + 1).to_text(), args.max_len))
                .collect()
        })
        .collect();

    let mut trace = json!({
        "type": "heatmap",
        "x": x_labels,
        "y": criteria,
        "z": z,
        "customdata": hover,
        "xgap": 4,
        "ygap": 4,
        "zmin": 0,
        "zmax": IMPACT_SCALE.len() - 1,
        "colorscale": continuous_scale(IMPACT_SCALE),
        "showscale": false,
        "hovertemplate": "(%{y}, %{x}): %{customdata}<extra></extra>",
    });
    if args.hover_disable {
        trace["hovertemplate"] = Value::Null;
        trace["hoverinfo"] = json!("skip");
    }

    let mut fig = Figure::new();
    fig.add_trace(trace);
    fig.update_layout(json!({
        "yaxis": {"autorange": "reversed"},
        "xaxis": {"side": "top"},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "annotations": [
            {
                "text": args.legend_low,
                "xref": "paper", "yref": "paper",
                "x": 0, "y": -0.08,
                "xanchor": "left",
                "showarrow": false,
                "font": {"color": IMPACT_SCALE[0]},
            },
            {
                "text": args.legend_high,
                "xref": "paper", "yref": "paper",
                "x": 1, "y": -0.08,
                "xanchor": "right",
                "showarrow": false,
                "font": {"color": IMPACT_SCALE[IMPACT_SCALE.len() - 1]},
            },
        ],
    }));
    if let Some(width) = args.width {
        fig.update_layout(json!({"width": width}));
    }
    if let Some(height) = args.height {
        fig.update_layout(json!({"height": height}));
    }
    Ok(fig)
}
