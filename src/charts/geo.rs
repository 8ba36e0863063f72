use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::palette::{NamedPalette, Palette};
use super::{
    BuildError, BuildResult, Figure, Theme, base_layout, number_json, numbers, require_palette,
    require_text,
};
use crate::data::Dataset;
use crate::data::numeric::NumberStyle;

fn default_min_time() -> Option<f64> {
    Some(1980.0)
}

fn default_size_max() -> f64 {
    50.0
}

fn default_prism() -> Palette {
    Palette::Named(NamedPalette::Prism)
}

/// Bubbles on ISO-3 country codes, one animation frame per time value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimatedBubbleMapArgs {
    /// Column of ISO alpha-3 codes
    pub location: String,
    pub hover: String,
    pub time: String,
    pub size: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_min_time")]
    pub min_time: Option<f64>,
    /// Largest bubble diameter in pixels
    #[serde(default = "default_size_max")]
    pub size_max: f64,
    #[serde(default)]
    pub block_zoom: bool,
    #[serde(default = "default_prism")]
    pub palette: Palette,
}

impl AnimatedBubbleMapArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("location", &self.location)?;
        require_text("time", &self.time)?;
        require_text("size", &self.size)?;
        require_palette("palette", &self.palette)?;
        if self.size_max.is_nan() || self.size_max <= 0.0 {
            return Err(BuildError::invalid("size_max", "must be positive"));
        }
        Ok(())
    }
}

fn time_label(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{}", t as i64)
    } else {
        format!("{}", t)
    }
}

pub(crate) fn animated_bubble_map(
    dataset: &Dataset,
    args: &AnimatedBubbleMapArgs,
) -> BuildResult<Figure> {
    let locations = dataset.texts(&args.location)?;
    let hovers = dataset.texts(&args.hover)?;
    let times = numbers(dataset, &args.time, NumberStyle::Plain)?;
    let sizes = numbers(dataset, &args.size, NumberStyle::DecimalComma)?;

    let rows: Vec<usize> = (0..dataset.row_count())
        .filter(|&r| match (times[r], args.min_time) {
            (Some(t), Some(min)) => t >= min,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .collect();

    // Frames run from the latest year backwards
    let mut frame_times: Vec<f64> = Vec::new();
    for &r in &rows {
        if let Some(t) = times[r] {
            if !frame_times.contains(&t) {
                frame_times.push(t);
            }
        }
    }
    frame_times.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let max_size = rows
        .iter()
        .filter_map(|&r| sizes[r])
        .fold(0.0_f64, f64::max);
    let sizeref = if max_size > 0.0 {
        2.0 * max_size / (args.size_max * args.size_max)
    } else {
        1.0
    };
    let color = args.palette.pick(0);

    let trace_for = |t: f64| -> Value {
        let frame_rows: Vec<usize> = rows.iter().copied().filter(|&r| times[r] == Some(t)).collect();
        json!({
            "type": "scattergeo",
            "geo": "geo",
            "name": "",
            "showlegend": false,
            "locations": frame_rows.iter().map(|&r| locations[r].clone()).collect::<Vec<_>>(),
            "hovertext": frame_rows.iter().map(|&r| hovers[r].clone()).collect::<Vec<_>>(),
            "customdata": frame_rows.iter().map(|_| json!([time_label(t)])).collect::<Vec<_>>(),
            "marker": {
                "color": color,
                "size": frame_rows
                    .iter()
                    .map(|&r| number_json(sizes[r].unwrap_or(0.0)))
                    .collect::<Vec<_>>(),
                "sizemode": "area",
                "sizeref": sizeref,
            },
            "hovertemplate": format!(
                "<b>%{{hovertext}}</b><br><br>{}=%{{marker.size:,.0f}}<br>{}=%{{customdata[0]}}<extra></extra>",
                args.size, args.time
            ),
        })
    };

    let mut fig = Figure::new();
    if let Some(&first) = frame_times.first() {
        fig.add_trace(trace_for(first));
    }
    fig.frames = frame_times
        .iter()
        .map(|&t| json!({"name": time_label(t), "data": [trace_for(t)]}))
        .collect();

    let steps: Vec<Value> = frame_times
        .iter()
        .map(|&t| {
            let label = time_label(t);
            json!({
                "label": label,
                "method": "animate",
                "args": [[label], {
                    "frame": {"duration": 0, "redraw": true},
                    "mode": "immediate",
                    "fromcurrent": true,
                    "transition": {"duration": 0, "easing": "linear"},
                }],
            })
        })
        .collect();

    base_layout(&mut fig, Theme::SimpleWhite, args.title.as_deref().unwrap_or(""));
    fig.update_layout(json!({
        "geo": {
            "domain": {"x": [0.0, 1.0], "y": [0.0, 1.0]},
            "projection": {"type": "natural earth"},
            "showcountries": true,
        },
        "legend": {"itemsizing": "constant", "tracegrouporder": "grouped"},
        "margin": {"t": 60},
        "sliders": [{
            "active": 0,
            "currentvalue": {"prefix": format!("{}=", args.time)},
            "len": 0.9,
            "pad": {"b": 10, "t": 60},
            "x": 0.1,
            "xanchor": "left",
            "y": 0,
            "yanchor": "top",
            "steps": steps,
        }],
        "updatemenus": [{
            "type": "buttons",
            "direction": "left",
            "showactive": false,
            "x": 0.1,
            "xanchor": "right",
            "y": 0,
            "yanchor": "top",
            "pad": {"r": 10, "t": 70},
            "buttons": [
                {
                    "label": "&#9654;",
                    "method": "animate",
                    "args": [null, {
                        "frame": {"duration": 500, "redraw": true},
                        "mode": "immediate",
                        "fromcurrent": true,
                        "transition": {"duration": 500, "easing": "linear"},
                    }],
                },
                {
                    "label": "&#9724;",
                    "method": "animate",
                    "args": [[null], {
                        "frame": {"duration": 0, "redraw": true},
                        "mode": "immediate",
                        "fromcurrent": true,
                        "transition": {"duration": 0, "easing": "linear"},
                    }],
                },
            ],
        }],
    }));
    if args.block_zoom {
        fig.update_layout(json!({"dragmode": false}));
    }
    Ok(fig)
}
