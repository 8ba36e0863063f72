use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Layout template applied to every chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    SimpleWhite,
    /// No template; Plotly's client-side defaults apply
    None,
}

impl Theme {
    /// `layout.template` value, `None` when no template is set.
    pub fn template(self) -> Option<Value> {
        match self {
            Theme::SimpleWhite => Some(simple_white()),
            Theme::None => None,
        }
    }
}

fn simple_white() -> Value {
    let axis = json!({
        "automargin": true,
        "linecolor": "rgb(36,36,36)",
        "showgrid": false,
        "showline": true,
        "ticks": "outside",
        "title": {"standoff": 15},
        "zeroline": false,
    });
    json!({
        "layout": {
            "colorway": ["#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD",
                         "#8C564B", "#E377C2", "#7F7F7F", "#BCBD22", "#17BECF"],
            "font": {"color": "rgb(36,36,36)"},
            "hovermode": "closest",
            "paper_bgcolor": "white",
            "plot_bgcolor": "white",
            "xaxis": axis.clone(),
            "yaxis": axis,
            "geo": {
                "bgcolor": "white",
                "lakecolor": "white",
                "landcolor": "white",
                "showlakes": true,
                "showland": true,
                "subunitcolor": "white",
            },
            "coloraxis": {"colorbar": {"outlinewidth": 1, "tickcolor": "rgb(36,36,36)", "ticks": "outside"}},
        }
    })
}
