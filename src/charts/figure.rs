//! Plotly-compatible figure document.
//!
//! A [`Figure`] is the JSON a browser hands to `Plotly.newPlot`: a list of
//! traces, a layout object and optional animation frames. Builders assemble
//! traces with `serde_json::json!` and adjust the layout through
//! [`Figure::update_layout`], which deep-merges like Plotly's own
//! `update_layout`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Value>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trace(&mut self, trace: Value) -> &mut Self {
        self.data.push(trace);
        self
    }

    /// Deep-merge `patch` into the layout. Non-object values replace.
    pub fn update_layout(&mut self, patch: Value) -> &mut Self {
        if let Value::Object(map) = patch {
            for (key, value) in map {
                merge_into(self.layout.entry(key).or_insert(Value::Null), value);
            }
        }
        self
    }

    /// Disable pan and zoom on both cartesian axes.
    pub fn lock_zoom(&mut self) -> &mut Self {
        self.update_layout(serde_json::json!({
            "xaxis": {"fixedrange": true},
            "yaxis": {"fixedrange": true},
        }))
    }

    /// Follow a key path through the layout.
    pub fn layout_at(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.layout.get(*first)?;
        for key in rest {
            current = current.get(*key)?;
        }
        Some(current)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn merge_into(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                merge_into(existing.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}
